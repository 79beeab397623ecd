//! Error kinds reported through the diagnostics sink.

use std::path::PathBuf;

use crate::store::Tier;

/// Everything that can go wrong while loading files, resolving options, or
/// picking a save target.
///
/// None of these abort an operation chain: the store reports them to the
/// caller's [`DiagnosticsSink`](crate::DiagnosticsSink) and keeps going, so
/// callers always end up with a best-effort merged view plus a boolean
/// status they may choose to escalate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The backend could not open the file, or its reserved top-level group
    /// could not be entered or left.
    #[error("cannot load configuration file {}: {reason}", .path.display())]
    FileNotLoadable { path: PathBuf, reason: String },

    /// The file carries a version marker that does not match this build.
    /// Non-fatal: the file is still used.
    #[error("configuration file {} has version {found}, this build expects {expected}", .path.display())]
    VersionMismatch {
        path: PathBuf,
        found: String,
        expected: String,
    },

    /// A required option was found in none of the loaded files.
    #[error("required option `{option}` was not found in any configuration file")]
    RequiredOptionMissing { option: String },

    /// A tier keyword was given as save target but no file is loaded there.
    #[error("no {tier} configuration file is loaded")]
    TierNotLoaded { tier: Tier },

    /// An explicit save-target path does not exist.
    #[error("configuration file {} does not exist", .path.display())]
    TargetNotFound { path: PathBuf },

    /// An explicit save-target path exists but could not be loaded.
    #[error("cannot use {} as the save target", .path.display())]
    TargetNotLoadable { path: PathBuf },

    /// The save target was the empty string.
    #[error("no configuration file specified")]
    NoTargetSpecified,
}
