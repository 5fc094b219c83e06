//! Syllable-to-note alignment
//!
//! Two passes. First, syllables are dealt 1:1 onto syllable slots in stream
//! order. Then a left-to-right fold carries the current syllable across
//! melisma continuations and grace notes, so every note ends up with at most
//! one syllable and every assigned syllable knows all the notes that carry it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::{Note, PhoneticCache, SyllableRecord, Tone};

/// A source syllable bound to the notes that sing it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AlignedSyllable {
    pub syllable: String,
    pub translation: String,
    pub phrase_id: String,

    /// `sequence_index` of the main note that starts the syllable
    pub owner_note_index: usize,

    /// Every note singing this syllable, owner included
    pub carrier_note_indices: BTreeSet<usize>,

    pub tone: Tone,
    pub rhyme_family: String,
}

/// Result of aligning one syllable stream to one note stream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Alignment {
    /// Assigned syllables in stream order
    pub syllables: Vec<AlignedSyllable>,

    /// Note `sequence_index` → index into `syllables`
    pub note_syllables: BTreeMap<usize, usize>,

    /// Syllables left over after every slot was filled
    pub unused_syllables: Vec<SyllableRecord>,

    /// Slots (by `sequence_index`) that received no syllable
    pub unassigned_slots: Vec<usize>,
}

impl Alignment {
    /// Syllable carried by a note, if any
    pub fn syllable_for(&self, sequence_index: usize) -> Option<&AlignedSyllable> {
        self.note_syllables
            .get(&sequence_index)
            .and_then(|&index| self.syllables.get(index))
    }

    pub fn is_complete(&self) -> bool {
        self.unused_syllables.is_empty() && self.unassigned_slots.is_empty()
    }
}

/// Role a note plays in the fold
#[derive(Debug, Clone, Copy, PartialEq)]
enum NoteRole {
    /// Main note that received syllable `n`
    Owner(usize),
    /// Slot that ran out of syllables
    EmptySlot,
    /// Lyric-less main note under a parser-lyric song
    Continuation,
    Grace,
    Rest,
}

/// Fold accumulator
#[derive(Debug, Default)]
struct AlignState {
    current: Option<usize>,
    note_syllables: BTreeMap<usize, usize>,
}

impl AlignState {
    fn step(mut self, (sequence_index, role): (usize, NoteRole)) -> Self {
        match role {
            NoteRole::Owner(syllable) => self.current = Some(syllable),
            NoteRole::EmptySlot => self.current = None,
            NoteRole::Continuation | NoteRole::Grace | NoteRole::Rest => {}
        }
        if role != NoteRole::Rest {
            if let Some(syllable) = self.current {
                self.note_syllables.insert(sequence_index, syllable);
            }
        }
        self
    }
}

/// Main notes that take a syllable of their own
///
/// When the parser attached lyrics to any main note, only those notes are
/// slots; otherwise every main note is.
fn syllable_slots(notes: &[Note]) -> Vec<usize> {
    let has_parser_lyrics = notes.iter().any(|n| n.is_main() && n.lyric_text().is_some());
    notes
        .iter()
        .filter(|n| n.is_main() && (!has_parser_lyrics || n.lyric_text().is_some()))
        .map(|n| n.sequence_index)
        .collect()
}

/// Align a syllable stream to a note stream
pub fn align_syllables(
    notes: &[Note],
    syllables: &[SyllableRecord],
    diagnostics: &mut Diagnostics,
) -> Alignment {
    let slots = syllable_slots(notes);
    let assigned = slots.len().min(syllables.len());

    let owners: HashMap<usize, usize> = slots
        .iter()
        .take(assigned)
        .enumerate()
        .map(|(syllable, &slot)| (slot, syllable))
        .collect();
    let empty_slots: BTreeSet<usize> = slots.iter().skip(assigned).copied().collect();

    let roles = notes.iter().map(|note| {
        let index = note.sequence_index;
        let role = if note.is_rest() {
            NoteRole::Rest
        } else if note.is_grace {
            NoteRole::Grace
        } else if let Some(&syllable) = owners.get(&index) {
            NoteRole::Owner(syllable)
        } else if empty_slots.contains(&index) {
            NoteRole::EmptySlot
        } else {
            NoteRole::Continuation
        };
        (index, role)
    });
    let state = roles.fold(AlignState::default(), AlignState::step);

    let mut carriers: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); assigned];
    for (&note, &syllable) in &state.note_syllables {
        carriers[syllable].insert(note);
    }

    let mut cache = PhoneticCache::new();
    let aligned: Vec<AlignedSyllable> = syllables
        .iter()
        .zip(slots.iter())
        .zip(carriers)
        .map(|((record, &owner), carrier_note_indices)| {
            let phonetics = cache.lookup(&record.syllable);
            AlignedSyllable {
                syllable: record.syllable.clone(),
                translation: record.translation.clone(),
                phrase_id: record.phrase_id.clone(),
                owner_note_index: owner,
                carrier_note_indices,
                tone: phonetics.tone,
                rhyme_family: phonetics.rhyme_family,
            }
        })
        .collect();

    let unused_syllables = syllables[assigned..].to_vec();
    let unassigned_slots: Vec<usize> = empty_slots.into_iter().collect();

    if !unused_syllables.is_empty() {
        diagnostics.add(Diagnostic::mismatch(
            "excess_syllables",
            format!(
                "{} syllables for {} slots; {} left unassigned",
                syllables.len(),
                slots.len(),
                unused_syllables.len()
            ),
        ));
    }
    if let Some(&first) = unassigned_slots.first() {
        diagnostics.add(
            Diagnostic::mismatch(
                "unassigned_slots",
                format!(
                    "{} slots for {} syllables; {} notes have no syllable",
                    slots.len(),
                    syllables.len(),
                    unassigned_slots.len()
                ),
            )
            .at_note(first),
        );
    }

    log::debug!(
        "Aligned {} syllables to {} slots ({} distinct phonetic lookups)",
        aligned.len(),
        slots.len(),
        cache.len()
    );

    Alignment {
        syllables: aligned,
        note_syllables: state.note_syllables,
        unused_syllables,
        unassigned_slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rational, SlurRole};

    fn quarter() -> Rational {
        Rational::from_integer(1)
    }

    fn records(texts: &[&str]) -> Vec<SyllableRecord> {
        texts.iter().map(|t| SyllableRecord::new(t, "", "p1")).collect()
    }

    #[test]
    fn test_one_syllable_per_main_note() {
        let notes = vec![
            Note::new("C", 4, quarter(), 0),
            Note::new("D", 4, quarter(), 1),
        ];
        let mut diagnostics = Diagnostics::new();
        let alignment = align_syllables(&notes, &records(&["Bà", "rằng"]), &mut diagnostics);

        assert_eq!(alignment.syllables.len(), 2);
        assert_eq!(alignment.syllable_for(1).map(|s| s.syllable.as_str()), Some("rằng"));
        assert_eq!(alignment.syllables[1].tone, Tone::Huyen);
        assert!(alignment.is_complete());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parser_lyrics_define_melisma() {
        // Note 1 has no parser lyric: it continues "rằng" from note 0
        let notes = vec![
            Note::new("C", 4, quarter(), 0).with_lyric("rằng"),
            Note::new("D", 4, quarter(), 1),
            Note::new("E", 4, quarter(), 2).with_lyric("xuân"),
        ];
        let mut diagnostics = Diagnostics::new();
        let alignment = align_syllables(&notes, &records(&["rằng", "xuân"]), &mut diagnostics);

        let first = &alignment.syllables[0];
        assert_eq!(first.owner_note_index, 0);
        assert_eq!(first.carrier_note_indices, BTreeSet::from([0, 1]));
        assert_eq!(alignment.syllables[1].owner_note_index, 2);
    }

    #[test]
    fn test_grace_inherits_current_syllable() {
        let notes = vec![
            Note::new("C", 4, quarter(), 0),
            Note::grace("E", 4, Rational::new(1, 8), 1).with_slur_role(SlurRole::PreSlurGrace),
            Note::new("D", 4, quarter(), 2),
            Note::grace("C", 4, Rational::new(1, 8), 3).with_slur_role(SlurRole::PostSlurGrace),
        ];
        let mut diagnostics = Diagnostics::new();
        let alignment = align_syllables(&notes, &records(&["ơi", "a"]), &mut diagnostics);

        assert_eq!(alignment.syllable_for(1).map(|s| s.syllable.as_str()), Some("ơi"));
        assert_eq!(alignment.syllable_for(3).map(|s| s.syllable.as_str()), Some("a"));
    }

    #[test]
    fn test_leading_grace_has_no_syllable() {
        let notes = vec![
            Note::grace("E", 4, Rational::new(1, 8), 0),
            Note::new("D", 4, quarter(), 1),
        ];
        let alignment = align_syllables(&notes, &records(&["a"]), &mut Diagnostics::new());
        assert!(alignment.syllable_for(0).is_none());
        assert!(alignment.syllable_for(1).is_some());
    }

    #[test]
    fn test_excess_syllables_reported() {
        let notes = vec![Note::new("C", 4, quarter(), 0)];
        let mut diagnostics = Diagnostics::new();
        let alignment = align_syllables(&notes, &records(&["a", "b", "c"]), &mut diagnostics);

        assert_eq!(alignment.syllables.len(), 1);
        assert_eq!(alignment.unused_syllables.len(), 2);
        assert!(diagnostics.has_code("excess_syllables"));
    }

    #[test]
    fn test_excess_slots_are_not_filled_with_last_syllable() {
        let notes = vec![
            Note::new("C", 4, quarter(), 0),
            Note::new("D", 4, quarter(), 1),
            Note::grace("E", 4, Rational::new(1, 8), 2),
        ];
        let mut diagnostics = Diagnostics::new();
        let alignment = align_syllables(&notes, &records(&["a"]), &mut diagnostics);

        assert!(alignment.syllable_for(1).is_none());
        assert!(alignment.syllable_for(2).is_none());
        assert_eq!(alignment.unassigned_slots, vec![1]);
        assert!(diagnostics.has_code("unassigned_slots"));
    }

    #[test]
    fn test_rests_carry_nothing() {
        let notes = vec![
            Note::new("C", 4, quarter(), 0),
            Note::rest(quarter(), 1),
            Note::new("D", 4, quarter(), 2),
        ];
        let alignment = align_syllables(&notes, &records(&["a", "b"]), &mut Diagnostics::new());
        assert!(alignment.syllable_for(1).is_none());
        assert_eq!(alignment.syllables[1].owner_note_index, 2);
    }
}
