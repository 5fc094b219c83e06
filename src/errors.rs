//! Error types for the tablature engine
//!
//! Only the strict helpers return these. The layout, alignment and pattern
//! passes never fail: they neutralise the offending record and report a
//! diagnostic instead (see `crate::diagnostics`).

use thiserror::Error;

/// Errors raised by strict lookups and configuration parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Pitch spelling is not a letter name with a supported accidental
    #[error("Unknown pitch spelling: {0:?}")]
    UnknownPitchSpelling(String),

    /// Duration is zero or negative
    #[error("Non-positive duration {duration} on note {note_index}")]
    NonPositiveDuration { note_index: usize, duration: String },

    /// Tuning name is not in the catalog
    #[error("Unknown tuning system: {0:?}")]
    UnknownTuning(String),

    /// Requested string count is outside the supported range
    #[error("String count {requested} out of range (expected {min}..={max})")]
    StringCountOutOfRange { requested: usize, min: usize, max: usize },

    /// Octave number is outside the supported range
    #[error("Octave {octave} out of range (expected {min}..={max})")]
    OctaveOutOfRange { octave: i32, min: i32, max: i32 },

    /// Configuration document could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::InvalidConfig(err.to_string())
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(err: serde_yaml::Error) -> Self {
        EngineError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
