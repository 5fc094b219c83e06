//! Pitch spelling and the pitch-cents resolver
//!
//! Cents are measured from C in the reference octave (octave 3). Pitch class
//! offsets are 0..=1100 in 100-cent steps; double accidentals wrap inside the
//! octave the same way the instrument charts spell them (e.g. `Cbb` sits at
//! 1000, `Dbb` at 0), so the octave number written on the note always wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// Octave whose C is 0 cents
pub const REFERENCE_OCTAVE: i32 = 3;

/// Cents in one octave
pub const CENTS_PER_OCTAVE: i32 = 1200;

/// Lowest octave a note may be written in
pub const MIN_OCTAVE: i32 = -1;

/// Highest octave a note may be written in
pub const MAX_OCTAVE: i32 = 10;

/// Accidental attached to a letter name
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    DoubleSharp,
    Flat,
    DoubleFlat,
}

impl Accidental {
    /// Parse an accidental marker ("", "#", "##", "x", "b", "bb")
    pub fn from_marker(marker: &str) -> Option<Accidental> {
        match marker {
            "" => Some(Accidental::Natural),
            "#" => Some(Accidental::Sharp),
            "##" | "x" => Some(Accidental::DoubleSharp),
            "b" => Some(Accidental::Flat),
            "bb" => Some(Accidental::DoubleFlat),
            _ => None,
        }
    }

    /// Get the cents offset of the accidental
    pub fn cents(&self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 100,
            Accidental::DoubleSharp => 200,
            Accidental::Flat => -100,
            Accidental::DoubleFlat => -200,
        }
    }

    /// Get the accidental symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
            Accidental::Flat => "b",
            Accidental::DoubleFlat => "bb",
        }
    }
}

/// A parsed pitch class spelling (letter + accidental)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PitchSpelling {
    /// Upper-case letter name, C through B
    pub letter: char,
    pub accidental: Accidental,
}

impl PitchSpelling {
    /// Parse a pitch class name such as "C", "F#", "Bb", "Gx" or "Ebb"
    pub fn parse(name: &str) -> Result<PitchSpelling> {
        let mut chars = name.trim().chars();
        let letter = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| matches!(c, 'C' | 'D' | 'E' | 'F' | 'G' | 'A' | 'B'))
            .ok_or_else(|| EngineError::UnknownPitchSpelling(name.to_string()))?;

        let accidental = Accidental::from_marker(chars.as_str())
            .ok_or_else(|| EngineError::UnknownPitchSpelling(name.to_string()))?;

        Ok(PitchSpelling { letter, accidental })
    }

    /// Cents of the natural letter above C
    fn letter_cents(&self) -> i32 {
        match self.letter {
            'C' => 0,
            'D' => 200,
            'E' => 400,
            'F' => 500,
            'G' => 700,
            'A' => 900,
            _ => 1100,
        }
    }

    /// Offset within the octave, 0..=1100
    pub fn offset(&self) -> i32 {
        (self.letter_cents() + self.accidental.cents()).rem_euclid(CENTS_PER_OCTAVE)
    }

    /// Semitone class 0..=11 (enharmonic spellings share a class)
    pub fn semitone(&self) -> u8 {
        (self.offset() / 100) as u8
    }

    /// Canonical spelling text
    pub fn notation(&self) -> String {
        format!("{}{}", self.letter, self.accidental.symbol())
    }
}

/// Map a pitch class name to its offset from C in cents (0..=1100)
pub fn pitch_class_offset(name: &str) -> Result<i32> {
    PitchSpelling::parse(name).map(|spelling| spelling.offset())
}

/// Resolve a pitch class name and octave to cents from C3
pub fn pitch_cents(name: &str, octave: i32) -> Result<i32> {
    Ok(pitch_class_offset(name)? + octave_cents(octave)?)
}

/// Cents contributed by the octave number alone
///
/// Only octaves in `MIN_OCTAVE..=MAX_OCTAVE` resolve.
pub fn octave_cents(octave: i32) -> Result<i32> {
    if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
        return Err(EngineError::OctaveOutOfRange {
            octave,
            min: MIN_OCTAVE,
            max: MAX_OCTAVE,
        });
    }
    Ok(CENTS_PER_OCTAVE * (octave - REFERENCE_OCTAVE))
}

/// Octave cents with overflow checks but no range limit
///
/// Used for string ladders, which may climb past the highest note octave.
pub fn checked_octave_cents(octave: i32) -> Option<i32> {
    octave
        .checked_sub(REFERENCE_OCTAVE)?
        .checked_mul(CENTS_PER_OCTAVE)
}

/// Resolve cents, substituting neutral values for malformed input
///
/// An unknown spelling keeps the octave and uses a 0 offset; an octave out
/// of range resolves to 0 cents outright. Returns the error alongside so the
/// caller can report it.
pub fn pitch_cents_or_neutral(name: &str, octave: i32) -> (i32, Option<EngineError>) {
    let octave_part = match octave_cents(octave) {
        Ok(cents) => cents,
        Err(err) => return (0, Some(err)),
    };
    match pitch_class_offset(name) {
        Ok(offset) => (offset + octave_part, None),
        Err(err) => (octave_part, Some(err)),
    }
}

static PITCH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Ga-g](?:##|bb|#|b|x)?)(-?\d+)$").expect("pitch name pattern is valid")
});

/// Split a combined pitch name such as "F#4" into class and octave
pub fn parse_pitch_name(text: &str) -> Result<(String, i32)> {
    let captures = PITCH_NAME
        .captures(text.trim())
        .ok_or_else(|| EngineError::UnknownPitchSpelling(text.to_string()))?;
    let octave = captures[2]
        .parse::<i32>()
        .map_err(|_| EngineError::UnknownPitchSpelling(text.to_string()))?;
    Ok((captures[1].to_string(), octave))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naturals() {
        assert_eq!(pitch_class_offset("C").unwrap(), 0);
        assert_eq!(pitch_class_offset("E").unwrap(), 400);
        assert_eq!(pitch_class_offset("F").unwrap(), 500);
        assert_eq!(pitch_class_offset("B").unwrap(), 1100);
    }

    #[test]
    fn test_enharmonic_spellings() {
        assert_eq!(pitch_class_offset("C#").unwrap(), pitch_class_offset("Db").unwrap());
        assert_eq!(pitch_class_offset("A#").unwrap(), 1000);
        assert_eq!(pitch_class_offset("Bb").unwrap(), 1000);
        assert_eq!(pitch_class_offset("F#").unwrap(), 600);
    }

    #[test]
    fn test_double_accidentals_wrap_within_octave() {
        assert_eq!(pitch_class_offset("C##").unwrap(), 200);
        assert_eq!(pitch_class_offset("Cx").unwrap(), 200);
        assert_eq!(pitch_class_offset("Dbb").unwrap(), 0);
        assert_eq!(pitch_class_offset("Cbb").unwrap(), 1000);
        assert_eq!(pitch_class_offset("Ax").unwrap(), 1100);
    }

    #[test]
    fn test_pitch_cents_uses_reference_octave() {
        assert_eq!(pitch_cents("C", 3).unwrap(), 0);
        assert_eq!(pitch_cents("D", 4).unwrap(), 1400);
        assert_eq!(pitch_cents("A", 2).unwrap(), -300);
    }

    #[test]
    fn test_unknown_spelling() {
        assert_eq!(
            pitch_class_offset("H"),
            Err(EngineError::UnknownPitchSpelling("H".to_string()))
        );
        assert!(pitch_class_offset("C###").is_err());
        assert!(pitch_class_offset("").is_err());
    }

    #[test]
    fn test_neutral_substitution_keeps_octave() {
        let (cents, err) = pitch_cents_or_neutral("Q", 4);
        assert_eq!(cents, 1200);
        assert!(err.is_some());

        let (cents, err) = pitch_cents_or_neutral("G", 4);
        assert_eq!(cents, 1900);
        assert!(err.is_none());
    }

    #[test]
    fn test_octave_range() {
        assert_eq!(octave_cents(MIN_OCTAVE).unwrap(), -4800);
        assert_eq!(octave_cents(MAX_OCTAVE).unwrap(), 8400);
        assert!(matches!(
            octave_cents(2_000_000),
            Err(EngineError::OctaveOutOfRange { octave: 2_000_000, .. })
        ));
        assert!(pitch_cents("C", i32::MIN).is_err());

        let (cents, err) = pitch_cents_or_neutral("C", i32::MAX);
        assert_eq!(cents, 0);
        assert!(matches!(err, Some(EngineError::OctaveOutOfRange { .. })));
    }

    #[test]
    fn test_checked_octave_cents() {
        assert_eq!(checked_octave_cents(16), Some(15600));
        assert_eq!(checked_octave_cents(2_000_000), None);
        assert_eq!(checked_octave_cents(i32::MIN), None);
    }

    #[test]
    fn test_parse_pitch_name() {
        assert_eq!(parse_pitch_name("F#4").unwrap(), ("F#".to_string(), 4));
        assert_eq!(parse_pitch_name("Bb3").unwrap(), ("Bb".to_string(), 3));
        assert_eq!(parse_pitch_name("C5").unwrap(), ("C".to_string(), 5));
        assert!(parse_pitch_name("X4").is_err());
        assert!(parse_pitch_name("C").is_err());
    }

    #[test]
    fn test_semitone_class() {
        assert_eq!(PitchSpelling::parse("Gb").unwrap().semitone(), 6);
        assert_eq!(PitchSpelling::parse("F#").unwrap().semitone(), 6);
        assert_eq!(PitchSpelling::parse("eb").unwrap().notation(), "Eb");
    }
}
