//! Layered application options: tiered configuration-file discovery with
//! a unified typed view.
//!
//! An [`OptionStore`] loads up to three configuration files, called the
//! system, user, and local tiers. The system tier lives in the platform
//! application-data directories, the user tier in the home directory, and
//! the local tier in the process working directory. Applications declare
//! the options they expect as [`OptionDef`]s and batch-resolve them:
//! every loaded tier is probed in that fixed order, so a local value
//! overrides a user one, which overrides a system one. Options found
//! nowhere fall back on their declared default, or fail resolution when
//! marked required.
//!
//! The last loaded tier becomes the save target for future writes, and
//! [`OptionStore::set_current_config`] points it elsewhere. Problems are
//! reported through a [`DiagnosticsSink`] and returned as boolean status
//! instead of aborting, so a best-effort merged view is always available.
//!
//! # Resolving declared options
//!
//! ```
//! use conftier::{Diagnostics, OptionDefs, OptionStore};
//!
//! let mut store = OptionStore::new();
//! let mut diag = Diagnostics::new();
//!
//! let mut opts = OptionDefs::new();
//! opts.add("timeout", "net", "request timeout in seconds", ["30"]);
//! opts.add("verbose", "", "chatty output", ["false"]);
//!
//! // No files are loaded here, so every option falls back on its default.
//! assert!(store.read_options(&opts, &mut diag));
//! assert_eq!(store.value_int("net/timeout", 10), 30);
//! assert!(!store.value_bool("verbose", true));
//! ```
//!
//! # Discovering the tier files
//!
//! ```no_run
//! use conftier::{set_application_name, Diagnostics, OptionStore};
//!
//! set_application_name("My App");
//!
//! let mut store = OptionStore::new();
//! let mut diag = Diagnostics::new();
//!
//! // Probes for `my_app.ini` in the data directories, the home
//! // directory, and the working directory.
//! if !store.discover(None, &mut diag) {
//!     for error in diag.errors() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```

pub mod backend;
pub mod diag;
pub mod error;
pub mod identity;
pub mod ini;
pub mod locate;
pub mod options;
pub mod store;

pub use backend::SettingsStore;
pub use diag::{DiagEntry, Diagnostics, DiagnosticsSink};
pub use error::ConfigError;
pub use identity::{application_name, config_file_name, set_application_name};
pub use ini::IniStore;
pub use locate::{FixedPaths, LocationClass, PathLocator, StandardPaths};
pub use options::{OptionDef, OptionDefs};
pub use store::{OptionStore, Tier};

/// Reserved top-level group holding the version marker.
pub const GENERAL_GROUP: &str = "general";

/// Reserved version-marker key inside [`GENERAL_GROUP`].
pub const VERSION_KEY: &str = "perst_version";

/// Format hint handed to [`backend::open`] when loading tier files.
pub const CONFIG_FORMAT: &str = "config";

/// Base file name used when the application name is empty.
pub const DEFAULT_BASE_NAME: &str = "config";

/// Extension appended to derived configuration file names.
pub const CONFIG_FILE_EXT: &str = ".ini";
