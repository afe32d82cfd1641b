use bitflags::bitflags;
use serde::Serialize;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::warn;

/// The kind of condition a [`Diagnostic`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Elements in a list of children without an explicit key.
    MissingKey,
    /// Sibling elements sharing the same key.
    DuplicateKey,
    /// A prop failed its declared prop type.
    PropTypes,
    /// A ref could not be attached.
    Refs,
}

impl DiagnosticKind {
    fn category(self) -> DiagnosticCategories {
        match self {
            Self::MissingKey => DiagnosticCategories::MISSING_KEY,
            Self::DuplicateKey => DiagnosticCategories::DUPLICATE_KEY,
            Self::PropTypes => DiagnosticCategories::PROP_TYPES,
            Self::Refs => DiagnosticCategories::REFS,
        }
    }
}

bitflags! {
    /// A set of diagnostic kinds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DiagnosticCategories: u8 {
        /// See [`DiagnosticKind::MissingKey`].
        const MISSING_KEY = 0b0001;
        /// See [`DiagnosticKind::DuplicateKey`].
        const DUPLICATE_KEY = 0b0010;
        /// See [`DiagnosticKind::PropTypes`].
        const PROP_TYPES = 0b0100;
        /// See [`DiagnosticKind::Refs`].
        const REFS = 0b1000;
    }
}

/// An advisory message. Diagnostics never change the outcome of an operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What kind of condition was detected.
    pub kind: DiagnosticKind,
    /// The human-readable message.
    pub message: String,
}

/// Options for a [`Diagnostics`] store.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct DiagnosticsOptions {
    /// The kinds of diagnostics to emit. Others are dropped silently.
    pub categories: DiagnosticCategories,
    /// If `true`, a diagnostic is emitted at most once per identity.
    pub deduplicate: bool,
}

impl Default for DiagnosticsOptions {
    fn default() -> Self {
        Self {
            categories: DiagnosticCategories::all(),
            deduplicate: true,
        }
    }
}

#[derive(Default)]
struct DiagnosticsState {
    options: DiagnosticsOptions,
    seen: HashSet<(DiagnosticKind, String)>,
    recorded: Vec<Diagnostic>,
}

/// The advisory diagnostic channel.
///
/// A `Diagnostics` store is a cheap handle: clones share the same records and the same set of
/// identities already reported. Each emitted diagnostic is recorded and logged as a `tracing`
/// warning.
#[derive(Clone, Default)]
pub struct Diagnostics {
    state: Arc<Mutex<DiagnosticsState>>,
}

impl Diagnostics {
    /// Creates a store with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given options.
    pub fn with_options(options: DiagnosticsOptions) -> Self {
        Self {
            state: Arc::new(Mutex::new(DiagnosticsState {
                options,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DiagnosticsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emits a diagnostic unless its kind is disabled or, with de-duplication on, a diagnostic of
    /// the same kind and identity was already emitted. Returns `true` if it was emitted.
    pub fn emit(
        &self,
        kind: DiagnosticKind,
        identity: impl Into<String>,
        message: impl Into<String>,
    ) -> bool {
        let mut state = self.lock();
        if !state.options.categories.contains(kind.category()) {
            return false;
        }
        if !state.seen.insert((kind, identity.into())) && state.options.deduplicate {
            return false;
        }
        let message = message.into();
        warn!(?kind, "{}", message);
        state.recorded.push(Diagnostic { kind, message });
        true
    }

    /// Returns a copy of every diagnostic emitted so far.
    pub fn recorded(&self) -> Vec<Diagnostic> {
        self.lock().recorded.clone()
    }

    /// Returns the number of diagnostics emitted so far.
    pub fn len(&self) -> usize {
        self.lock().recorded.len()
    }

    /// Returns `true` if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.lock().recorded.is_empty()
    }

    /// Removes and returns the recorded diagnostics. Identities stay seen.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.lock().recorded)
    }

    /// Forgets every recorded diagnostic and every seen identity.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.seen.clear();
        state.recorded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicate() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.emit(DiagnosticKind::MissingKey, "Parent", "first"));
        assert!(!diagnostics.emit(DiagnosticKind::MissingKey, "Parent", "second"));
        assert!(diagnostics.emit(DiagnosticKind::Refs, "Parent", "third"));
        assert!(diagnostics.emit(DiagnosticKind::MissingKey, "Other", "fourth"));

        let messages: Vec<_> = diagnostics.recorded().into_iter().map(|d| d.message).collect();
        assert_eq!(messages, vec!["first", "third", "fourth"]);
    }

    #[test]
    fn test_reset_and_take() {
        let diagnostics = Diagnostics::new();
        let shared = diagnostics.clone();
        diagnostics.emit(DiagnosticKind::MissingKey, "a", "a");
        assert_eq!(shared.len(), 1);

        assert_eq!(shared.take().len(), 1);
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.emit(DiagnosticKind::MissingKey, "a", "a"));

        diagnostics.reset();
        assert!(diagnostics.emit(DiagnosticKind::MissingKey, "a", "a"));
    }

    #[test]
    fn test_options() {
        let mut options = DiagnosticsOptions::default();
        options.categories = DiagnosticCategories::PROP_TYPES;
        options.deduplicate = false;
        let diagnostics = Diagnostics::with_options(options);

        assert!(!diagnostics.emit(DiagnosticKind::MissingKey, "a", "a"));
        assert!(diagnostics.emit(DiagnosticKind::PropTypes, "b", "b"));
        assert!(diagnostics.emit(DiagnosticKind::PropTypes, "b", "b"));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_serialize() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::MissingKey,
            message: "m".to_owned(),
        };
        assert_eq!(
            serde_json::to_string(&diagnostic).unwrap(),
            r#"{"kind":"missing_key","message":"m"}"#
        );
    }
}
