//! Tablature Layout Engine
//!
//! This module turns a note stream into positioned notes on a string ladder:
//! everything a vector renderer needs (coordinates, open/bent state, press
//! strings) without any glyph or styling choices.

pub mod bent;
pub mod fingering;
pub mod positioning;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Note, Rational, StringDefinition};

pub use bent::{classify, find_open_string, nearest_lower_string, nearest_string_position, Classification};
pub use fingering::{assign_fingering, Finger};
pub use positioning::{position_notes, LayoutEngine};

/// Ornament size bucket for grace notes
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GraceKind {
    /// Sixteenth grace or shorter
    Sixteenth,
    /// Anything longer
    Eighth,
}

impl GraceKind {
    /// Bucket a grace duration; durations at or below `threshold` are sixteenths
    pub fn classify(duration: Rational, threshold: Rational) -> GraceKind {
        if duration <= threshold {
            GraceKind::Sixteenth
        } else {
            GraceKind::Eighth
        }
    }

    /// Symbol used in the duration projection
    pub fn symbol(&self) -> &'static str {
        match self {
            GraceKind::Sixteenth => "g16",
            GraceKind::Eighth => "g8",
        }
    }
}

/// A note with its derived tablature position
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PositionedNote {
    /// Source record, unchanged
    pub note: Note,

    pub x: f64,
    pub y: f64,

    /// Cents from C3 used for `y`
    pub cents: i32,

    /// Horizontal space taken before the next note
    pub advance: f64,

    pub is_bent: bool,

    /// Ordinal of the open string, for open notes
    pub open_string: Option<usize>,

    /// String pressed to reach a bent note
    pub press_string: Option<StringDefinition>,

    /// Bucket for grace notes; `None` for main notes
    pub grace_kind: Option<GraceKind>,

    /// 1-based visual position of the closest string
    pub string_position: Option<usize>,
}

impl PositionedNote {
    pub fn sequence_index(&self) -> usize {
        self.note.sequence_index
    }

    pub fn is_grace(&self) -> bool {
        self.note.is_grace
    }
}

/// Complete tablature layout for one note stream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Layout {
    /// Name of the tuning actually used
    pub tuning: String,

    /// String ladder, lowest first
    pub strings: Vec<StringDefinition>,

    /// Pitched notes in stream order
    pub notes: Vec<PositionedNote>,

    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// Ordinals of strings that are played open or pressed for a bent note
    pub fn used_strings(&self) -> BTreeSet<usize> {
        self.notes
            .iter()
            .filter_map(|note| {
                note.open_string
                    .or_else(|| note.press_string.as_ref().map(|s| s.ordinal))
            })
            .collect()
    }

    /// Number of bent main notes
    pub fn bent_main_notes(&self) -> usize {
        self.notes
            .iter()
            .filter(|note| note.is_bent && !note.is_grace())
            .count()
    }

    /// Look up a positioned note by its stream index
    ///
    /// Input streams are not required to be sorted by index.
    pub fn note_at(&self, sequence_index: usize) -> Option<&PositionedNote> {
        self.notes.iter().find(|note| note.sequence_index() == sequence_index)
    }
}
