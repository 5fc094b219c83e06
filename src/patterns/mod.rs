//! Pattern Index
//!
//! Five symbolic projections of the annotated note stream (pitch, duration,
//! syllable, tone, rhyme) and, for each, every contiguous window of every
//! length grouped by key. The index never ranks or prunes; the query methods
//! in [`queries`] and the context profiles in [`profiles`] are where
//! consumers filter.

pub mod index;
pub mod profiles;
pub mod projection;
pub mod queries;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::layout::Layout;
use crate::lyrics::Alignment;

pub use profiles::{
    interval_distribution, IntervalClass, IntervalDistribution, KeyRhymes, PhrasePosition, PositionProfile, RhymeCount,
};
pub use projection::{project, Projection};
pub use queries::{Section, SectionLabel, SharedWindow};

/// Separator between symbols of a window key
pub const KEY_SEPARATOR: &str = "→";

/// A symbolic dimension of the note stream
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Pitch,
    Duration,
    Syllable,
    Tone,
    Rhyme,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Pitch,
        Dimension::Duration,
        Dimension::Syllable,
        Dimension::Tone,
        Dimension::Rhyme,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Pitch => "pitch",
            Dimension::Duration => "duration",
            Dimension::Syllable => "syllable",
            Dimension::Tone => "tone",
            Dimension::Rhyme => "rhyme",
        }
    }
}

/// All occurrences of one window key
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PatternEntry {
    pub dimension: Dimension,
    pub length: usize,
    /// Window symbols joined with [`KEY_SEPARATOR`], for display
    ///
    /// Symbols may themselves contain the separator, so two entries can
    /// share a key; `symbols` is what identifies the window.
    pub key: String,
    pub symbols: Vec<String>,
    pub occurrence_count: usize,
    /// Offsets into the projection where the window starts
    pub start_positions: BTreeSet<usize>,
    /// `sequence_index` of the first note of each occurrence
    pub start_note_indices: Vec<usize>,
}

impl PatternEntry {
    pub fn is_repeating(&self) -> bool {
        self.occurrence_count >= 2
    }

    pub fn is_unique(&self) -> bool {
        self.occurrence_count == 1
    }

    /// Whether this entry is the window `symbols`
    pub fn matches(&self, symbols: &[&str]) -> bool {
        self.symbols.len() == symbols.len() && self.symbols.iter().zip(symbols).all(|(a, b)| a == b)
    }
}

/// Windows of one dimension, grouped by length
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DimensionIndex {
    pub projection: Projection,
    /// Window length → entries in first-occurrence order
    pub by_length: BTreeMap<usize, Vec<PatternEntry>>,
}

/// Complete repetition index over all dimensions
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct PatternIndex {
    pub dimensions: BTreeMap<Dimension, DimensionIndex>,
}

impl PatternIndex {
    /// Build the index from a layout and its syllable alignment
    pub fn build(layout: &Layout, alignment: &Alignment) -> Self {
        let projections = Dimension::ALL
            .iter()
            .map(|&dimension| project(dimension, &layout.notes, alignment));
        Self::from_projections(projections)
    }

    /// Build the index from ready-made projections
    pub fn from_projections(projections: impl IntoIterator<Item = Projection>) -> Self {
        let dimensions = projections
            .into_iter()
            .map(|projection| {
                let by_length = index::enumerate_windows(&projection)
                    .into_iter()
                    .enumerate()
                    .map(|(offset, entries)| (offset + 1, entries))
                    .collect();
                log::debug!(
                    "Indexed {} symbols of dimension {}",
                    projection.len(),
                    projection.dimension.name()
                );
                (projection.dimension, DimensionIndex { projection, by_length })
            })
            .collect();
        Self { dimensions }
    }

    pub fn projection(&self, dimension: Dimension) -> Option<&Projection> {
        self.dimensions.get(&dimension).map(|d| &d.projection)
    }

    /// Entries of one dimension and window length
    pub fn entries_at(&self, dimension: Dimension, length: usize) -> &[PatternEntry] {
        self.dimensions
            .get(&dimension)
            .and_then(|d| d.by_length.get(&length))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every entry of one dimension, shortest windows first
    pub fn entries(&self, dimension: Dimension) -> impl Iterator<Item = &PatternEntry> {
        self.dimensions
            .get(&dimension)
            .into_iter()
            .flat_map(|d| d.by_length.values())
            .flatten()
    }

    /// Look up a window by its symbols
    pub fn find(&self, dimension: Dimension, symbols: &[&str]) -> Option<&PatternEntry> {
        self.entries_at(dimension, symbols.len())
            .iter()
            .find(|entry| entry.matches(symbols))
    }

    pub fn total_entries(&self) -> usize {
        Dimension::ALL.iter().map(|&d| self.entries(d).count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::layout::LayoutEngine;
    use crate::lyrics::align_syllables;
    use crate::models::{Note, Rational, SyllableRecord};

    fn song() -> (Vec<Note>, Vec<SyllableRecord>) {
        let quarter = Rational::from_integer(1);
        let notes = ["C", "D", "E", "C", "D", "E", "G"]
            .iter()
            .enumerate()
            .map(|(i, pc)| Note::new(pc, 4, quarter, i))
            .collect();
        let syllables = ["ru", "con", "ơi", "ru", "con", "ngủ", "đi"]
            .iter()
            .map(|s| SyllableRecord::new(s, "", "p1"))
            .collect();
        (notes, syllables)
    }

    fn index_of(notes: &[Note], syllables: &[SyllableRecord]) -> PatternIndex {
        let mut diagnostics = Diagnostics::new();
        let layout = LayoutEngine::default().compute_layout(notes, &mut diagnostics);
        let alignment = align_syllables(notes, syllables, &mut diagnostics);
        PatternIndex::build(&layout, &alignment)
    }

    #[test]
    fn test_all_dimensions_indexed() {
        let (notes, syllables) = song();
        let index = index_of(&notes, &syllables);

        for dimension in Dimension::ALL {
            let projection = index.projection(dimension).unwrap();
            assert_eq!(projection.len(), 7, "{}", dimension.name());
            for length in 1..=7 {
                let total: usize = index
                    .entries_at(dimension, length)
                    .iter()
                    .map(|e| e.occurrence_count)
                    .sum();
                assert_eq!(total, 8 - length);
            }
        }
    }

    #[test]
    fn test_find_window() {
        let (notes, syllables) = song();
        let index = index_of(&notes, &syllables);

        let entry = index.find(Dimension::Pitch, &["C4", "D4", "E4"]).unwrap();
        assert_eq!(entry.occurrence_count, 2);
        assert_eq!(entry.start_note_indices, vec![0, 3]);
        assert_eq!(entry.symbols, vec!["C4", "D4", "E4"]);
        assert_eq!(entry.key, "C4→D4→E4");

        let ru_con = index.find(Dimension::Syllable, &["ru", "con"]).unwrap();
        assert!(ru_con.is_repeating());
        assert!(index.find(Dimension::Pitch, &["G4", "C4"]).is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = index_of(&[], &[]);
        assert_eq!(index.total_entries(), 0);
        assert!(index.entries_at(Dimension::Pitch, 1).is_empty());
    }
}
