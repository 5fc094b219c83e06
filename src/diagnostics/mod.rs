//! Diagnostics for non-fatal engine conditions
//!
//! Every pass in this crate keeps going when a single record is unusable.
//! What it skipped or substituted is reported here so the presentation
//! layer can decide whether to surface it.

use serde::{Deserialize, Serialize};

/// Severity level for a diagnostic
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// Error taxonomy for recoverable conditions
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A single note or syllable record was skipped or neutralised
    MalformedInput,
    /// A configuration value was replaced with its default
    ConfigurationError,
    /// Syllable and note counts disagree
    StructuralMismatch,
}

/// A single reported condition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Category of the condition
    pub kind: DiagnosticKind,
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Stable identifier (e.g., "unknown_pitch_spelling", "excess_syllables")
    pub code: String,
    /// `sequence_index` of the offending note, when there is one
    pub note_index: Option<usize>,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        kind: DiagnosticKind,
        severity: DiagnosticSeverity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            code: code.into(),
            note_index: None,
            message: message.into(),
        }
    }

    /// Malformed note or syllable record (always a warning)
    pub fn malformed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::MalformedInput, DiagnosticSeverity::Warning, code, message)
    }

    /// Configuration value replaced by a default
    pub fn configuration(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ConfigurationError, DiagnosticSeverity::Warning, code, message)
    }

    /// Count mismatch between syllables and notes
    pub fn mismatch(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::StructuralMismatch, DiagnosticSeverity::Info, code, message)
    }

    /// Attach the offending note
    pub fn at_note(mut self, note_index: usize) -> Self {
        self.note_index = Some(note_index);
        self
    }
}

/// Collection of diagnostics for one invocation
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    /// All diagnostics in the order they were raised
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create empty diagnostics
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        log::warn!("[{}] {}", diagnostic.code, diagnostic.message);
        self.items.push(diagnostic);
    }

    /// Extend with multiple diagnostics
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// All diagnostics of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    /// Check if any diagnostic carries the given code
    pub fn has_code(&self, code: &str) -> bool {
        self.items.iter().any(|d| d.code == code)
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Check if there are any diagnostics
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
