//! Open/bent classification against a string ladder
//!
//! A note is open when a string has its pitch class and octave. Anything
//! else is bent: the player presses the nearest string that sounds lower.

use serde::{Deserialize, Serialize};

use crate::models::{PitchSpelling, StringDefinition};

/// How a note is produced on the instrument
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Played on an open string (ordinal of that string)
    Open { string: usize },
    /// Produced by pressing a lower string; `None` when the note sits below
    /// every string and no press indicator can be drawn
    Bent { press_string: Option<usize> },
}

impl Classification {
    pub fn is_bent(&self) -> bool {
        matches!(self, Classification::Bent { .. })
    }

    /// Ordinal of the string pressed for a bent note
    pub fn press_string(&self) -> Option<usize> {
        match self {
            Classification::Bent { press_string } => *press_string,
            Classification::Open { .. } => None,
        }
    }
}

/// Find the open string matching a pitch class and octave
///
/// Enharmonic spellings match (F# and Gb are the same string).
pub fn find_open_string<'a>(
    pitch_class: &str,
    octave: i32,
    ladder: &'a [StringDefinition],
) -> Option<&'a StringDefinition> {
    let semitone = PitchSpelling::parse(pitch_class).ok()?.semitone();
    ladder
        .iter()
        .find(|string| string.octave == octave && string.semitone() == semitone)
}

/// String with the greatest `y` strictly below `y`
pub fn nearest_lower_string(ladder: &[StringDefinition], y: f64) -> Option<&StringDefinition> {
    ladder
        .iter()
        .filter(|string| string.y < y)
        .max_by(|a, b| a.y.total_cmp(&b.y))
}

/// Classify a note at vertical position `y`
pub fn classify(pitch_class: &str, octave: i32, y: f64, ladder: &[StringDefinition]) -> Classification {
    match find_open_string(pitch_class, octave, ladder) {
        Some(string) => Classification::Open { string: string.ordinal },
        None => Classification::Bent {
            press_string: nearest_lower_string(ladder, y).map(|string| string.ordinal),
        },
    }
}

/// 1-based visual position (top to bottom) of the string closest to `y`
pub fn nearest_string_position(ladder: &[StringDefinition], y: f64) -> Option<usize> {
    let mut by_height: Vec<&StringDefinition> = ladder.iter().collect();
    by_height.sort_by(|a, b| a.y.total_cmp(&b.y));

    by_height
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.y - y).abs().total_cmp(&(b.y - y).abs()))
        .map(|(index, _)| index + 1)
}
