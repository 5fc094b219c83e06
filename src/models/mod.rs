//! Models module for the tablature engine
//!
//! This module contains the input records, pitch and tuning tables, and the
//! phonetic rule tables shared by the layout and pattern passes.

pub mod note;
pub mod phonetics;
pub mod pitch;
pub mod serde_helpers;
pub mod tuning;

use num_rational::Rational32;

/// Durations are exact fractions of a quarter note
pub type Rational = Rational32;

// Re-export commonly used types
pub use note::{duration_to_f64, Note, SlurRole, SyllableRecord};
pub use phonetics::{detect_tone, rhyme_family, PhoneticCache, Phonetics, Tone};
pub use pitch::{parse_pitch_name, pitch_cents, pitch_class_offset, Accidental, PitchSpelling};
pub use tuning::{generate_ladder, StringDefinition, TuningCatalog, TuningSystem, DEFAULT_TUNING};
