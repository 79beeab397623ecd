//! Process-wide application identity.
//!
//! Discovery derives the configuration file name from the application
//! name. [`set_application_name`] pins the name once, typically early in
//! `main`; when nothing is pinned the executable's file stem stands in.

use std::sync::RwLock;

use crate::{CONFIG_FILE_EXT, DEFAULT_BASE_NAME};

static APP_NAME: RwLock<Option<String>> = RwLock::new(None);

/// Pins the process-wide application name used by discovery.
pub fn set_application_name(name: impl Into<String>) {
    if let Ok(mut slot) = APP_NAME.write() {
        *slot = Some(name.into());
    }
}

/// The pinned application name, the executable's file stem when nothing
/// is pinned, or the empty string when neither is available.
pub fn application_name() -> String {
    if let Ok(slot) = APP_NAME.read() {
        if let Some(name) = slot.as_deref() {
            return name.to_string();
        }
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

/// Derives a configuration file name from an application name.
///
/// Spaces become underscores and letters are lowercased; an empty name
/// falls back on the `config` base. The `.ini` extension is always
/// appended.
pub fn config_file_name(app_name: &str) -> String {
    let base = app_name.replace(' ', "_").to_lowercase();
    let mut file_name = if base.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        base
    };
    file_name.push_str(CONFIG_FILE_EXT);
    file_name
}
