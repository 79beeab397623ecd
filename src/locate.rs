//! Where configuration files are looked for.

use std::path::PathBuf;

/// Class of directory a tier's file is searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationClass {
    /// Platform application-data directories.
    AppData,
    /// The user's home directory.
    Home,
}

/// Maps a location class and file name to an existing file.
///
/// [`StandardPaths`] consults the platform's conventional directories.
/// [`FixedPaths`] pins the directories explicitly, which keeps discovery
/// testable without touching the real home directory.
pub trait PathLocator {
    /// Returns the path of an existing file named `file_name` in the given
    /// class of directory, or `None` when no candidate exists.
    fn locate(&self, class: LocationClass, file_name: &str) -> Option<PathBuf>;
}

/// Locator backed by the platform's standard directories.
///
/// `AppData` probes [`dirs::data_dir`] then [`dirs::data_local_dir`];
/// `Home` probes [`dirs::home_dir`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPaths;

impl StandardPaths {
    pub fn new() -> Self {
        Self
    }
}

impl PathLocator for StandardPaths {
    fn locate(&self, class: LocationClass, file_name: &str) -> Option<PathBuf> {
        match class {
            LocationClass::AppData => dirs::data_dir()
                .into_iter()
                .chain(dirs::data_local_dir())
                .map(|dir| dir.join(file_name))
                .find(|path| path.is_file()),
            LocationClass::Home => dirs::home_dir()
                .map(|dir| dir.join(file_name))
                .filter(|path| path.is_file()),
        }
    }
}

/// Locator with explicitly pinned directories.
#[derive(Debug, Clone, Default)]
pub struct FixedPaths {
    /// Directory probed for the system tier.
    pub app_data: Option<PathBuf>,
    /// Directory probed for the user tier.
    pub home: Option<PathBuf>,
}

impl FixedPaths {
    /// Pins both directories at once.
    pub fn with_dirs(app_data: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            app_data: Some(app_data.into()),
            home: Some(home.into()),
        }
    }
}

impl PathLocator for FixedPaths {
    fn locate(&self, class: LocationClass, file_name: &str) -> Option<PathBuf> {
        let dir = match class {
            LocationClass::AppData => self.app_data.as_ref(),
            LocationClass::Home => self.home.as_ref(),
        }?;
        let path = dir.join(file_name);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_paths_find_only_existing_files() {
        let app_data = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        std::fs::write(app_data.path().join("app.ini"), "k = v\n").unwrap();

        let locator = FixedPaths::with_dirs(app_data.path(), home.path());
        assert_eq!(
            locator.locate(LocationClass::AppData, "app.ini"),
            Some(app_data.path().join("app.ini"))
        );
        assert_eq!(locator.locate(LocationClass::Home, "app.ini"), None);
    }

    #[test]
    fn fixed_paths_without_directories_find_nothing() {
        let locator = FixedPaths::default();
        assert_eq!(locator.locate(LocationClass::AppData, "app.ini"), None);
        assert_eq!(locator.locate(LocationClass::Home, "app.ini"), None);
    }

    #[test]
    fn directories_are_not_files() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("app.ini")).unwrap();

        let locator = FixedPaths {
            app_data: None,
            home: Some(home.path().to_path_buf()),
        };
        assert_eq!(locator.locate(LocationClass::Home, "app.ini"), None);
    }

    #[test]
    fn standard_paths_miss_an_unlikely_name() {
        let locator = StandardPaths::new();
        let name = "conftier-no-such-file-5c1d.ini";
        assert_eq!(locator.locate(LocationClass::AppData, name), None);
        assert_eq!(locator.locate(LocationClass::Home, name), None);
    }
}
