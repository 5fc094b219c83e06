//! Note stream records
//!
//! Notes and syllables arrive from an external parser and are never mutated
//! here. Derived data (positions, syllable ownership) lives in separate
//! structures keyed by `sequence_index`.

use serde::{Deserialize, Serialize};

use super::Rational;

/// Slur relationship of a grace note to its main note
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlurRole {
    #[default]
    None,
    /// Grace slurred into the following main note
    PreSlurGrace,
    /// Grace slurred out of the preceding main note
    PostSlurGrace,
}

/// One record of the parsed note stream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Note {
    /// Pitch class name ("C", "F#", "Bb"); `None` marks a rest
    #[serde(default)]
    pub pitch_class: Option<String>,

    /// Octave number (C3 is the reference pitch)
    #[serde(default)]
    pub octave: i32,

    /// Duration in quarter notes
    #[serde(with = "super::serde_helpers::rational")]
    pub duration: Rational,

    #[serde(default)]
    pub is_grace: bool,

    /// Syllable text attached by the parser, if any
    #[serde(default)]
    pub lyric: Option<String>,

    #[serde(default)]
    pub slur_role: SlurRole,

    /// Stable position in the original stream
    pub sequence_index: usize,
}

impl Note {
    /// Create a main note
    pub fn new(pitch_class: &str, octave: i32, duration: Rational, sequence_index: usize) -> Self {
        Self {
            pitch_class: Some(pitch_class.to_string()),
            octave,
            duration,
            is_grace: false,
            lyric: None,
            slur_role: SlurRole::None,
            sequence_index,
        }
    }

    /// Create a grace note
    pub fn grace(pitch_class: &str, octave: i32, duration: Rational, sequence_index: usize) -> Self {
        Self {
            is_grace: true,
            ..Self::new(pitch_class, octave, duration, sequence_index)
        }
    }

    /// Create a rest
    pub fn rest(duration: Rational, sequence_index: usize) -> Self {
        Self {
            pitch_class: None,
            ..Self::new("C", 0, duration, sequence_index)
        }
    }

    /// Builder: attach a parser lyric
    pub fn with_lyric(mut self, lyric: &str) -> Self {
        self.lyric = Some(lyric.to_string());
        self
    }

    /// Builder: set the slur role
    pub fn with_slur_role(mut self, slur_role: SlurRole) -> Self {
        self.slur_role = slur_role;
        self
    }

    pub fn is_rest(&self) -> bool {
        self.pitch_class.is_none()
    }

    /// Main (non-grace, pitched) note
    pub fn is_main(&self) -> bool {
        !self.is_grace && !self.is_rest()
    }

    /// Parser lyric, ignoring blank text
    pub fn lyric_text(&self) -> Option<&str> {
        self.lyric.as_deref().map(str::trim).filter(|text| !text.is_empty())
    }

    /// Full pitch notation (e.g., "D4"); empty for rests
    pub fn pitch_notation(&self) -> String {
        match &self.pitch_class {
            Some(pitch_class) => format!("{}{}", pitch_class, self.octave),
            None => String::new(),
        }
    }
}

/// One sung syllable from the lyric stream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SyllableRecord {
    pub syllable: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub phrase_id: String,
}

impl SyllableRecord {
    pub fn new(syllable: &str, translation: &str, phrase_id: &str) -> Self {
        Self {
            syllable: syllable.to_string(),
            translation: translation.to_string(),
            phrase_id: phrase_id.to_string(),
        }
    }
}

/// Convert a duration to a float for pixel arithmetic
pub fn duration_to_f64(duration: Rational) -> f64 {
    *duration.numer() as f64 / *duration.denom() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_json_accepts_float_duration() {
        let json = r#"{"pitch_class": "G", "octave": 4, "duration": 0.5, "is_grace": true, "sequence_index": 3}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.duration, Rational::new(1, 2));
        assert!(note.is_grace);
        assert_eq!(note.slur_role, SlurRole::None);
        assert_eq!(note.pitch_notation(), "G4");
    }

    #[test]
    fn test_note_without_pitch_is_rest() {
        let json = r#"{"duration": "3/2", "sequence_index": 0}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert!(note.is_rest());
        assert!(!note.is_main());
        assert_eq!(note.duration, Rational::new(3, 2));
    }

    #[test]
    fn test_blank_lyric_is_ignored() {
        let note = Note::new("C", 4, Rational::from_integer(1), 0).with_lyric("  ");
        assert_eq!(note.lyric_text(), None);
        let note = note.with_lyric(" la ");
        assert_eq!(note.lyric_text(), Some("la"));
    }

    #[test]
    fn test_duration_to_f64() {
        assert_eq!(duration_to_f64(Rational::new(3, 4)), 0.75);
    }
}
