//! Song analysis pipeline
//!
//! Runs layout, syllable alignment and pattern indexing for one song and
//! collects everything they report. Songs share nothing, so a batch is a
//! plain map over songs (on the rayon pool with the `parallel` feature).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::layout::{assign_fingering, position_notes, Finger, Layout, LayoutEngine};
use crate::lyrics::{align_syllables, group_by_phrase, melisma_spans, Alignment, MelismaSpan, PhraseGroup};
use crate::models::{Note, SyllableRecord, TuningCatalog};
use crate::patterns::{
    interval_distribution, Dimension, IntervalDistribution, KeyRhymes, PatternIndex, PositionProfile, Section,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One song's inputs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SongInput {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub syllables: Vec<SyllableRecord>,
    /// Tuning name; the configured tuning when absent
    #[serde(default)]
    pub tuning: Option<String>,
}

/// Everything derived from one song
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SongAnalysis {
    pub layout: Layout,
    /// Fingering hint per positioned note
    pub fingering: Vec<Option<Finger>>,
    pub alignment: Alignment,
    pub phrases: Vec<PhraseGroup>,
    pub melismas: Vec<MelismaSpan>,
    pub index: PatternIndex,
    pub sections: Vec<Section>,
    pub intervals: IntervalDistribution,
    /// Symbol counts at phrase beginnings, middles and endings
    pub phrase_profiles: BTreeMap<Dimension, PositionProfile>,
    pub key_rhymes: KeyRhymes,
    pub diagnostics: Diagnostics,
}

/// Analyze one song
pub fn analyze_song(engine: &LayoutEngine, song: &SongInput) -> SongAnalysis {
    let mut diagnostics = Diagnostics::new();

    let layout = match &song.tuning {
        Some(tuning) => engine.compute_layout_with_tuning(&song.notes, tuning, &mut diagnostics),
        None => engine.compute_layout(&song.notes, &mut diagnostics),
    };
    let fingering = assign_fingering(&layout.notes);

    let alignment = align_syllables(&song.notes, &song.syllables, &mut diagnostics);
    let phrases = group_by_phrase(&alignment);
    let melismas = melisma_spans(&song.notes, &alignment);

    let index = PatternIndex::build(&layout, &alignment);
    let sections = index.detect_sections();
    let intervals = interval_distribution(&layout.notes);
    let phrase_profiles = index.phrase_position_profiles(&alignment);
    let key_rhymes = index.key_rhymes(&alignment);

    log::debug!(
        "Analyzed song: {} notes, {} syllables, {} index entries, {} diagnostics",
        layout.notes.len(),
        alignment.syllables.len(),
        index.total_entries(),
        diagnostics.len()
    );

    SongAnalysis {
        layout,
        fingering,
        alignment,
        phrases,
        melismas,
        index,
        sections,
        intervals,
        phrase_profiles,
        key_rhymes,
        diagnostics,
    }
}

/// Analyze independent songs; output order follows input order
#[cfg(feature = "parallel")]
pub fn analyze_songs(engine: &LayoutEngine, songs: &[SongInput]) -> Vec<SongAnalysis> {
    songs.par_iter().map(|song| analyze_song(engine, song)).collect()
}

/// Analyze independent songs; output order follows input order
#[cfg(not(feature = "parallel"))]
pub fn analyze_songs(engine: &LayoutEngine, songs: &[SongInput]) -> Vec<SongAnalysis> {
    songs.iter().map(|song| analyze_song(engine, song)).collect()
}

/// Bent main-note count for one tuning
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TuningScore {
    pub tuning: String,
    pub bent_notes: usize,
}

/// Result of trying every catalog tuning on a song
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TuningSuggestion {
    /// Tuning with the fewest bent main notes (catalog order breaks ties)
    pub best: String,
    /// Scores in catalog order
    pub scores: Vec<TuningScore>,
}

/// Pick the catalog tuning that needs the fewest bent main notes
pub fn suggest_tuning(notes: &[Note], catalog: &TuningCatalog, config: &EngineConfig) -> TuningSuggestion {
    // Diagnostics from scoring passes are discarded
    let mut scratch = Diagnostics::new();
    let config = config.sanitized(&mut scratch);

    let scores: Vec<TuningScore> = catalog
        .tunings()
        .iter()
        .map(|tuning| {
            let layout = position_notes(notes, tuning, &config, &mut scratch);
            TuningScore {
                tuning: tuning.name.clone(),
                bent_notes: layout.bent_main_notes(),
            }
        })
        .collect();

    // min_by_key keeps the first minimum
    let best = scores
        .iter()
        .min_by_key(|score| score.bent_notes)
        .map_or_else(|| catalog.default_tuning().name.clone(), |score| score.tuning.clone());

    log::debug!("Suggested tuning {} out of {}", best, scores.len());

    TuningSuggestion { best, scores }
}
