//! Symbolic projections of the annotated note stream
//!
//! Each projection keeps only the notes for which its dimension is defined;
//! no placeholders are inserted.

use serde::{Deserialize, Serialize};

use super::Dimension;
use crate::layout::PositionedNote;
use crate::lyrics::Alignment;

/// One dimension of the stream as a symbol sequence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub dimension: Dimension,
    pub symbols: Vec<String>,
    /// `sequence_index` of the note behind each symbol
    pub note_indices: Vec<usize>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Duration symbol: grace bucket, or the rational duration in quarters
fn duration_symbol(note: &PositionedNote) -> String {
    match note.grace_kind {
        Some(kind) => kind.symbol().to_string(),
        None => note.note.duration.to_string(),
    }
}

/// Project positioned notes onto one dimension
pub fn project(dimension: Dimension, notes: &[PositionedNote], alignment: &Alignment) -> Projection {
    let (note_indices, symbols): (Vec<usize>, Vec<String>) = notes
        .iter()
        .filter_map(|note| {
            let index = note.sequence_index();
            let symbol = match dimension {
                Dimension::Pitch => Some(note.note.pitch_notation()),
                Dimension::Duration => Some(duration_symbol(note)),
                Dimension::Syllable => alignment.syllable_for(index).map(|s| s.syllable.clone()),
                Dimension::Tone => alignment.syllable_for(index).map(|s| s.tone.label().to_string()),
                Dimension::Rhyme => alignment.syllable_for(index).map(|s| s.rhyme_family.clone()),
            };
            symbol.map(|symbol| (index, symbol))
        })
        .unzip();

    Projection {
        dimension,
        symbols,
        note_indices,
    }
}
