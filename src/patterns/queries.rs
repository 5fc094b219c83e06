//! Consumer queries over a built pattern index
//!
//! Section detection reads the longest repeating pitch windows, motif queries
//! read short repeating windows, and cross-song comparison reads long
//! windows. None of these change the index itself.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::{Dimension, PatternEntry, PatternIndex};

/// Shortest window reported as a motif
pub const MOTIF_MIN_LENGTH: usize = 2;

/// Longest window reported as a motif
pub const MOTIF_MAX_LENGTH: usize = 3;

/// Role of one occurrence of a repeated passage
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SectionLabel {
    Opening,
    Refrain,
    Closing,
}

/// One occurrence of the song's longest repeated pitch passage
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub label: SectionLabel,
    pub key: String,
    pub length: usize,
    /// Offset into the pitch projection
    pub start_position: usize,
    pub start_note_index: usize,
    pub end_note_index: usize,
}

/// A window present in two indexes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SharedWindow {
    pub dimension: Dimension,
    pub length: usize,
    pub key: String,
    pub left_starts: BTreeSet<usize>,
    pub right_starts: BTreeSet<usize>,
}

impl PatternIndex {
    /// Entries occurring at least twice
    pub fn repeating(&self, dimension: Dimension) -> impl Iterator<Item = &PatternEntry> {
        self.entries(dimension).filter(|e| e.is_repeating())
    }

    /// Entries occurring exactly once
    pub fn unique(&self, dimension: Dimension) -> impl Iterator<Item = &PatternEntry> {
        self.entries(dimension).filter(|e| e.is_unique())
    }

    /// Repeating entries of the greatest length that has any
    pub fn longest_repeating(&self, dimension: Dimension) -> Vec<&PatternEntry> {
        let Some(length) = self.repeating(dimension).map(|e| e.length).max() else {
            return Vec::new();
        };
        self.entries_at(dimension, length)
            .iter()
            .filter(|e| e.is_repeating())
            .collect()
    }

    /// Label the occurrences of the longest repeated pitch passage
    ///
    /// The first occurrence opens, the last closes, and any in between are
    /// refrains. Sections are ordered by start.
    pub fn detect_sections(&self) -> Vec<Section> {
        let Some(projection) = self.projection(Dimension::Pitch) else {
            return Vec::new();
        };

        let mut sections: Vec<Section> = self
            .longest_repeating(Dimension::Pitch)
            .into_iter()
            .flat_map(|entry| {
                let last = entry.start_positions.len() - 1;
                entry
                    .start_positions
                    .iter()
                    .enumerate()
                    .map(move |(occurrence, &start)| {
                        let label = match occurrence {
                            0 => SectionLabel::Opening,
                            n if n == last => SectionLabel::Closing,
                            _ => SectionLabel::Refrain,
                        };
                        (entry, label, start)
                    })
            })
            .map(|(entry, label, start)| Section {
                label,
                key: entry.key.clone(),
                length: entry.length,
                start_position: start,
                start_note_index: projection.note_indices[start],
                end_note_index: projection.note_indices[start + entry.length - 1],
            })
            .collect();

        sections.sort_by(|a, b| (a.start_position, &a.key).cmp(&(b.start_position, &b.key)));
        sections
    }

    /// Short repeating windows of every dimension
    pub fn motifs(&self) -> Vec<&PatternEntry> {
        Dimension::ALL
            .iter()
            .flat_map(|&dimension| self.motifs_in(dimension))
            .collect()
    }

    /// Short repeating windows of one dimension
    pub fn motifs_in(&self, dimension: Dimension) -> Vec<&PatternEntry> {
        (MOTIF_MIN_LENGTH..=MOTIF_MAX_LENGTH)
            .flat_map(|length| self.entries_at(dimension, length))
            .filter(|e| e.is_repeating())
            .collect()
    }

    /// Unique windows of at least `min_length`, usable as a song fingerprint
    pub fn signature_windows(&self, dimension: Dimension, min_length: usize) -> Vec<&PatternEntry> {
        self.unique(dimension)
            .filter(|e| e.length >= min_length)
            .collect()
    }

    /// Windows of at least `min_length` that occur in both indexes
    pub fn shared_windows(
        &self,
        other: &PatternIndex,
        dimension: Dimension,
        min_length: usize,
    ) -> Vec<SharedWindow> {
        let theirs: HashMap<&[String], &PatternEntry> = other
            .entries(dimension)
            .filter(|e| e.length >= min_length)
            .map(|e| (e.symbols.as_slice(), e))
            .collect();

        self.entries(dimension)
            .filter(|e| e.length >= min_length)
            .filter_map(|mine| {
                theirs
                    .get(mine.symbols.as_slice())
                    .map(|their| SharedWindow {
                        dimension,
                        length: mine.length,
                        key: mine.key.clone(),
                        left_starts: mine.start_positions.clone(),
                        right_starts: their.start_positions.clone(),
                    })
            })
            .collect()
    }

    /// Fraction of distinct windows of one length present in both indexes
    pub fn shared_ratio(&self, other: &PatternIndex, dimension: Dimension, length: usize) -> f64 {
        let mine: BTreeSet<&[String]> = self.entries_at(dimension, length).iter().map(|e| e.symbols.as_slice()).collect();
        let theirs: BTreeSet<&[String]> = other.entries_at(dimension, length).iter().map(|e| e.symbols.as_slice()).collect();
        let union = mine.union(&theirs).count();
        if union == 0 {
            return 0.0;
        }
        mine.intersection(&theirs).count() as f64 / union as f64
    }
}
