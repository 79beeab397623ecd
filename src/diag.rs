//! Diagnostics collected while loading files and resolving options.
//!
//! Store operations never abort mid-way; they report what happened through
//! a [`DiagnosticsSink`] and return a boolean status. [`Diagnostics`] is
//! the bundled sink: it records entries in arrival order and mirrors them
//! to `tracing`, so callers get a log trail and an inspectable list from
//! the same run.

use crate::error::ConfigError;

/// Receives debug notes and errors from store operations.
pub trait DiagnosticsSink {
    /// Records a debug-level note about normal progress.
    fn add_debug(&mut self, message: String);

    /// Records an error. Operations continue after reporting one.
    fn add_error(&mut self, error: ConfigError);
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagEntry {
    Debug(String),
    Error(ConfigError),
}

/// The bundled sink: an ordered collection, mirrored to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<DiagEntry>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in arrival order.
    pub fn entries(&self) -> &[DiagEntry] {
        &self.entries
    }

    /// Only the debug notes, in order.
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            DiagEntry::Debug(message) => Some(message.as_str()),
            DiagEntry::Error(_) => None,
        })
    }

    /// Only the errors, in order.
    pub fn errors(&self) -> impl Iterator<Item = &ConfigError> {
        self.entries.iter().filter_map(|entry| match entry {
            DiagEntry::Error(error) => Some(error),
            DiagEntry::Debug(_) => None,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all recorded entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl DiagnosticsSink for Diagnostics {
    fn add_debug(&mut self, message: String) {
        tracing::debug!("{}", message);
        self.entries.push(DiagEntry::Debug(message));
    }

    fn add_error(&mut self, error: ConfigError) {
        tracing::error!("{}", error);
        self.entries.push(DiagEntry::Error(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_arrival_order() {
        let mut diag = Diagnostics::new();
        diag.add_debug("first".into());
        diag.add_error(ConfigError::NoTargetSpecified);
        diag.add_debug("second".into());

        assert_eq!(diag.len(), 3);
        assert_eq!(
            diag.entries(),
            [
                DiagEntry::Debug("first".into()),
                DiagEntry::Error(ConfigError::NoTargetSpecified),
                DiagEntry::Debug("second".into()),
            ]
        );
    }

    #[test]
    fn notes_and_errors_filter_by_kind() {
        let mut diag = Diagnostics::new();
        diag.add_debug("progress".into());
        diag.add_error(ConfigError::NoTargetSpecified);

        assert_eq!(diag.notes().collect::<Vec<_>>(), ["progress"]);
        assert_eq!(
            diag.errors().collect::<Vec<_>>(),
            [&ConfigError::NoTargetSpecified]
        );
    }

    #[test]
    fn has_errors_ignores_notes() {
        let mut diag = Diagnostics::new();
        diag.add_debug("just a note".into());
        assert!(!diag.has_errors());

        diag.add_error(ConfigError::NoTargetSpecified);
        assert!(diag.has_errors());
    }

    #[test]
    fn clear_empties_the_sink() {
        let mut diag = Diagnostics::new();
        diag.add_debug("note".into());
        diag.clear();
        assert!(diag.is_empty());
        assert!(!diag.has_errors());
    }
}
