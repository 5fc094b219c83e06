//! Lyrics: syllable alignment and the views built on it

pub mod alignment;

use serde::{Deserialize, Serialize};

use crate::models::Note;

pub use alignment::{align_syllables, AlignedSyllable, Alignment};

/// Syllables of one phrase, in stream order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PhraseGroup {
    pub phrase_id: String,
    /// Indices into `Alignment::syllables`
    pub syllable_indices: Vec<usize>,
}

/// Group aligned syllables by phrase, ordered by first appearance
pub fn group_by_phrase(alignment: &Alignment) -> Vec<PhraseGroup> {
    let mut groups: Vec<PhraseGroup> = Vec::new();
    for (index, syllable) in alignment.syllables.iter().enumerate() {
        match groups.iter_mut().find(|g| g.phrase_id == syllable.phrase_id) {
            Some(group) => group.syllable_indices.push(index),
            None => groups.push(PhraseGroup {
                phrase_id: syllable.phrase_id.clone(),
                syllable_indices: vec![index],
            }),
        }
    }
    groups
}

/// A syllable sung across several main notes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MelismaSpan {
    pub syllable_index: usize,
    pub syllable: String,
    /// `sequence_index` of each main note carrying the syllable
    pub main_note_indices: Vec<usize>,
}

/// Syllables carried by more than one main note
pub fn melisma_spans(notes: &[Note], alignment: &Alignment) -> Vec<MelismaSpan> {
    alignment
        .syllables
        .iter()
        .enumerate()
        .filter_map(|(syllable_index, syllable)| {
            let main_note_indices: Vec<usize> = notes
                .iter()
                .filter(|n| n.is_main() && syllable.carrier_note_indices.contains(&n.sequence_index))
                .map(|n| n.sequence_index)
                .collect();
            (main_note_indices.len() > 1).then(|| MelismaSpan {
                syllable_index,
                syllable: syllable.syllable.clone(),
                main_note_indices,
            })
        })
        .collect()
}
