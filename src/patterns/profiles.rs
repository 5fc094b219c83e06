//! Context profiles
//!
//! Interval classes between consecutive main notes, symbol counts by
//! position inside a phrase, and the rhyme families that carry a song's
//! form. Built from the index and alignment; nothing here changes either.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{Dimension, PatternIndex};
use crate::layout::PositionedNote;
use crate::lyrics::{group_by_phrase, Alignment};

/// Share of phrase endings above which a rhyme is structural
pub const STRUCTURAL_ENDING_SHARE: f64 = 0.75;

/// Share of all rhymes above which a rhyme heard in several positions is cohesive
pub const COHESIVE_SHARE: f64 = 0.2;

/// Share of all rhymes below which a rhyme is ornamental
pub const ORNAMENTAL_SHARE: f64 = 0.05;

/// Melodic interval size, direction ignored
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum IntervalClass {
    Unison,
    Second,
    Third,
    Fourth,
    Fifth,
    Larger,
}

impl IntervalClass {
    pub const ALL: [IntervalClass; 6] = [
        IntervalClass::Unison,
        IntervalClass::Second,
        IntervalClass::Third,
        IntervalClass::Fourth,
        IntervalClass::Fifth,
        IntervalClass::Larger,
    ];

    /// Class of a step of `semitones`, up or down
    pub fn classify(semitones: i32) -> IntervalClass {
        match semitones.unsigned_abs() {
            0 => IntervalClass::Unison,
            1..=2 => IntervalClass::Second,
            3..=4 => IntervalClass::Third,
            5..=6 => IntervalClass::Fourth,
            7..=8 => IntervalClass::Fifth,
            _ => IntervalClass::Larger,
        }
    }
}

/// Interval classes between consecutive main notes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct IntervalDistribution {
    /// Every class, including those never seen
    pub counts: BTreeMap<IntervalClass, usize>,
    pub transitions: usize,
}

impl IntervalDistribution {
    pub fn count(&self, class: IntervalClass) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }
}

/// Classify the step between each pair of consecutive main notes
///
/// Grace notes are skipped, so an ornament between two main notes does not
/// split their interval.
pub fn interval_distribution(notes: &[PositionedNote]) -> IntervalDistribution {
    let mut counts: BTreeMap<IntervalClass, usize> = IntervalClass::ALL.iter().map(|&class| (class, 0)).collect();
    let mains: Vec<&PositionedNote> = notes.iter().filter(|note| !note.is_grace()).collect();

    for pair in mains.windows(2) {
        let semitones = (pair[1].cents - pair[0].cents) / 100;
        *counts.entry(IntervalClass::classify(semitones)).or_insert(0) += 1;
    }

    IntervalDistribution {
        counts,
        transitions: mains.len().saturating_sub(1),
    }
}

/// Where a syllable stands inside its phrase
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PhrasePosition {
    Beginning,
    Middle,
    Ending,
}

impl PhrasePosition {
    pub const ALL: [PhrasePosition; 3] = [PhrasePosition::Beginning, PhrasePosition::Middle, PhrasePosition::Ending];

    /// Position of item `index` in a phrase of `len` items
    ///
    /// A one-syllable phrase only has a beginning.
    pub fn of(index: usize, len: usize) -> PhrasePosition {
        if index == 0 {
            PhrasePosition::Beginning
        } else if index + 1 == len {
            PhrasePosition::Ending
        } else {
            PhrasePosition::Middle
        }
    }
}

/// Symbol counts of one dimension at each phrase position
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PositionProfile {
    pub dimension: Dimension,
    pub counts: BTreeMap<PhrasePosition, BTreeMap<String, usize>>,
}

impl PositionProfile {
    pub fn count(&self, position: PhrasePosition, symbol: &str) -> usize {
        self.counts
            .get(&position)
            .and_then(|symbols| symbols.get(symbol))
            .copied()
            .unwrap_or(0)
    }

    /// Symbols at one position, most frequent first (ties by symbol)
    pub fn ranked(&self, position: PhrasePosition) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .get(&position)
            .into_iter()
            .flatten()
            .map(|(symbol, &count)| (symbol.as_str(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Count per symbol over all positions
    pub fn totals(&self) -> BTreeMap<&str, usize> {
        let mut totals = BTreeMap::new();
        for symbols in self.counts.values() {
            for (symbol, &count) in symbols {
                *totals.entry(symbol.as_str()).or_insert(0) += count;
            }
        }
        totals
    }

    pub fn position_total(&self, position: PhrasePosition) -> usize {
        self.counts.get(&position).map_or(0, |symbols| symbols.values().sum())
    }

    /// Number of positions at which `symbol` occurs
    pub fn positions_spanned(&self, symbol: &str) -> usize {
        self.counts
            .values()
            .filter(|symbols| symbols.contains_key(symbol))
            .count()
    }
}

/// A rhyme family and how often it is sung
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RhymeCount {
    pub rhyme: String,
    pub count: usize,
}

/// Rhyme families by the role they play in the song's form
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct KeyRhymes {
    /// Close most phrases
    pub structural: Vec<RhymeCount>,
    /// Frequent and heard in more than one phrase position
    pub cohesive: Vec<RhymeCount>,
    /// Rare
    pub ornamental: Vec<RhymeCount>,
    /// Most frequent phrase ending
    pub signature: Option<RhymeCount>,
}

impl KeyRhymes {
    /// Classify the rhyme families of a phrase-position profile
    ///
    /// Each list is ordered by count, most frequent first.
    pub fn from_profile(profile: &PositionProfile) -> Self {
        let mut ranked: Vec<(&str, usize)> = profile.totals().into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let total: usize = ranked.iter().map(|(_, count)| count).sum();
        let ending_total = profile.position_total(PhrasePosition::Ending);

        let structural = rhymes_where(&ranked, |rhyme, _| {
            share(profile.count(PhrasePosition::Ending, rhyme), ending_total) > STRUCTURAL_ENDING_SHARE
        });
        let cohesive = rhymes_where(&ranked, |rhyme, count| {
            share(count, total) > COHESIVE_SHARE && profile.positions_spanned(rhyme) >= 2
        });
        let ornamental = rhymes_where(&ranked, |_, count| share(count, total) < ORNAMENTAL_SHARE);
        let signature = profile
            .ranked(PhrasePosition::Ending)
            .first()
            .map(|&(rhyme, count)| RhymeCount {
                rhyme: rhyme.to_string(),
                count,
            });

        Self {
            structural,
            cohesive,
            ornamental,
            signature,
        }
    }
}

fn share(count: usize, of: usize) -> f64 {
    if of == 0 {
        return 0.0;
    }
    count as f64 / of as f64
}

fn rhymes_where(ranked: &[(&str, usize)], keep: impl Fn(&str, usize) -> bool) -> Vec<RhymeCount> {
    ranked
        .iter()
        .filter(|&&(rhyme, count)| keep(rhyme, count))
        .map(|&(rhyme, count)| RhymeCount {
            rhyme: rhyme.to_string(),
            count,
        })
        .collect()
}

impl PatternIndex {
    /// Count the symbols of `dimension` at the beginning, middle and end of
    /// every phrase
    ///
    /// Each aligned syllable stands at its owner note. Syllables whose owner
    /// has no symbol in the dimension are left out.
    pub fn phrase_position_profile(&self, dimension: Dimension, alignment: &Alignment) -> PositionProfile {
        let symbol_at: HashMap<usize, &str> = self
            .projection(dimension)
            .map(|projection| {
                projection
                    .note_indices
                    .iter()
                    .copied()
                    .zip(projection.symbols.iter().map(String::as_str))
                    .collect()
            })
            .unwrap_or_default();

        let mut counts: BTreeMap<PhrasePosition, BTreeMap<String, usize>> =
            PhrasePosition::ALL.iter().map(|&position| (position, BTreeMap::new())).collect();

        for phrase in group_by_phrase(alignment) {
            let len = phrase.syllable_indices.len();
            for (offset, &syllable_index) in phrase.syllable_indices.iter().enumerate() {
                let owner = alignment.syllables[syllable_index].owner_note_index;
                let Some(symbol) = symbol_at.get(&owner) else {
                    continue;
                };
                *counts
                    .entry(PhrasePosition::of(offset, len))
                    .or_default()
                    .entry(symbol.to_string())
                    .or_insert(0) += 1;
            }
        }

        PositionProfile { dimension, counts }
    }

    /// Profiles for every dimension
    pub fn phrase_position_profiles(&self, alignment: &Alignment) -> BTreeMap<Dimension, PositionProfile> {
        Dimension::ALL
            .iter()
            .map(|&dimension| (dimension, self.phrase_position_profile(dimension, alignment)))
            .collect()
    }

    /// Structural, cohesive, ornamental and signature rhyme families
    pub fn key_rhymes(&self, alignment: &Alignment) -> KeyRhymes {
        KeyRhymes::from_profile(&self.phrase_position_profile(Dimension::Rhyme, alignment))
    }
}
