//! Storage backend abstraction over concrete file formats.

use std::path::Path;

use crate::error::ConfigError;
use crate::ini::IniStore;

/// Read access to one loaded configuration file.
///
/// Implementations keep a group stack: [`begin_group`](Self::begin_group)
/// and [`end_group`](Self::end_group) scope what the read methods see,
/// mirroring how grouped options are laid out in the file.
pub trait SettingsStore: Send + Sync {
    /// Enters `group`; subsequent reads resolve keys inside it.
    ///
    /// Returns `false` when the group cannot be entered.
    fn begin_group(&mut self, group: &str) -> bool;

    /// Leaves `group`. Returns `false` when `group` is not the innermost
    /// entered group.
    fn end_group(&mut self, group: &str) -> bool;

    /// Whether `key`, relative to the current group, has a value.
    fn has_key(&self, key: &str) -> bool;

    /// Reads `key` as a single string. Missing keys read as empty.
    fn read_string(&self, key: &str) -> String;

    /// Reads `key` as a list of strings. Missing keys read as empty.
    fn read_string_list(&self, key: &str) -> Vec<String>;

    /// Path of the file backing this store.
    fn location(&self) -> &Path;
}

/// Opens `path` with the backend selected by `format_hint`.
///
/// `"config"` and `"ini"` both select the INI backend; any other hint is
/// rejected without touching the file.
pub fn open(format_hint: &str, path: &Path) -> Result<Box<dyn SettingsStore>, ConfigError> {
    match format_hint {
        "config" | "ini" => Ok(Box::new(IniStore::open(path)?)),
        other => Err(ConfigError::FileNotLoadable {
            path: path.to_path_buf(),
            reason: format!("unknown format hint `{other}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_hint_is_rejected() {
        match open("yaml", Path::new("settings.yaml")) {
            Err(ConfigError::FileNotLoadable { path, reason }) => {
                assert_eq!(path, Path::new("settings.yaml"));
                assert!(reason.contains("yaml"));
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("yaml hint should have been rejected"),
        }
    }

    #[test]
    fn config_hint_opens_ini_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.ini");
        std::fs::write(&path, "answer = 42\n").unwrap();

        let store = open("config", &path).unwrap();
        assert_eq!(store.read_string("answer"), "42");
        assert_eq!(store.location(), path.as_path());
    }

    #[test]
    fn ini_hint_opens_ini_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.ini");
        std::fs::write(&path, "answer = 42\n").unwrap();

        assert!(open("ini", &path).is_ok());
    }
}
