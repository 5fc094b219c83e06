//! Dan Tranh WASM API
//!
//! JavaScript-facing wrappers over the layout engine, syllable aligner and
//! pattern index. Inputs and outputs cross the boundary as plain objects via
//! `serde-wasm-bindgen`; every call is independent.
//!
//! # Module Structure
//!
//! - `helpers`: serialization, configuration loading and error conversion

pub mod helpers;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analysis::{analyze_song as run_analysis, suggest_tuning as run_suggestion, SongInput};
use crate::diagnostics::Diagnostics;
use crate::layout::Layout;
use crate::lyrics::{align_syllables as run_alignment, Alignment};
use crate::models::{Note, SyllableRecord, TuningCatalog};
use crate::patterns::PatternIndex;

use helpers::{config_from_js, config_from_text, deserialize, engine_error, engine_for, serialize};

#[derive(Serialize)]
struct LayoutResponse {
    layout: Layout,
    diagnostics: Diagnostics,
}

#[derive(Serialize)]
struct AlignmentResponse {
    alignment: Alignment,
    diagnostics: Diagnostics,
}

#[derive(Serialize)]
struct IndexResponse {
    index: PatternIndex,
    diagnostics: Diagnostics,
}

/// Position a note stream on the string ladder
///
/// # Parameters
/// * `notes_js` - Array of note objects
/// * `tuning` - Catalog tuning name; the configured tuning when omitted
/// * `config_js` - Optional engine configuration object
///
/// # Returns
/// `{ layout, diagnostics }`
#[wasm_bindgen(js_name = layoutSong)]
pub fn layout_song(notes_js: JsValue, tuning: Option<String>, config_js: JsValue) -> Result<JsValue, JsValue> {
    let notes: Vec<Note> = deserialize(notes_js, "Invalid note stream")?;
    let engine = engine_for(config_from_js(config_js)?);

    let mut diagnostics = Diagnostics::new();
    let layout = match tuning {
        Some(name) => engine.compute_layout_with_tuning(&notes, &name, &mut diagnostics),
        None => engine.compute_layout(&notes, &mut diagnostics),
    };

    log::info!("layoutSong: {} notes on {}", layout.notes.len(), layout.tuning);
    serialize(&LayoutResponse { layout, diagnostics }, "Failed to serialize layout")
}

/// Align syllables to a note stream
///
/// # Returns
/// `{ alignment, diagnostics }`
#[wasm_bindgen(js_name = alignSyllables)]
pub fn align_syllables(notes_js: JsValue, syllables_js: JsValue) -> Result<JsValue, JsValue> {
    let notes: Vec<Note> = deserialize(notes_js, "Invalid note stream")?;
    let syllables: Vec<SyllableRecord> = deserialize(syllables_js, "Invalid syllable stream")?;

    let mut diagnostics = Diagnostics::new();
    let alignment = run_alignment(&notes, &syllables, &mut diagnostics);

    serialize(&AlignmentResponse { alignment, diagnostics }, "Failed to serialize alignment")
}

/// Build the full pattern index for one song
///
/// # Returns
/// `{ index, diagnostics }`
#[wasm_bindgen(js_name = buildPatternIndex)]
pub fn build_pattern_index(
    notes_js: JsValue,
    syllables_js: JsValue,
    tuning: Option<String>,
    config_js: JsValue,
) -> Result<JsValue, JsValue> {
    let notes: Vec<Note> = deserialize(notes_js, "Invalid note stream")?;
    let syllables: Vec<SyllableRecord> = deserialize(syllables_js, "Invalid syllable stream")?;
    let engine = engine_for(config_from_js(config_js)?);

    let mut diagnostics = Diagnostics::new();
    let layout = match tuning {
        Some(name) => engine.compute_layout_with_tuning(&notes, &name, &mut diagnostics),
        None => engine.compute_layout(&notes, &mut diagnostics),
    };
    let alignment = run_alignment(&notes, &syllables, &mut diagnostics);
    let index = PatternIndex::build(&layout, &alignment);

    log::info!("buildPatternIndex: {} entries", index.total_entries());
    serialize(&IndexResponse { index, diagnostics }, "Failed to serialize pattern index")
}

/// Run the whole pipeline for one song
///
/// # Parameters
/// * `song_js` - `{ notes, syllables?, tuning? }`
/// * `config_js` - Optional engine configuration object
#[wasm_bindgen(js_name = analyzeSong)]
pub fn analyze_song(song_js: JsValue, config_js: JsValue) -> Result<JsValue, JsValue> {
    let song: SongInput = deserialize(song_js, "Invalid song")?;
    let engine = engine_for(config_from_js(config_js)?);

    let analysis = run_analysis(&engine, &song);
    serialize(&analysis, "Failed to serialize analysis")
}

/// Score every catalog tuning by bent main notes
#[wasm_bindgen(js_name = suggestTuning)]
pub fn suggest_tuning(notes_js: JsValue, config_js: JsValue) -> Result<JsValue, JsValue> {
    let notes: Vec<Note> = deserialize(notes_js, "Invalid note stream")?;
    let config = config_from_js(config_js)?;

    let suggestion = run_suggestion(&notes, &TuningCatalog::builtin(), &config);
    serialize(&suggestion, "Failed to serialize tuning suggestion")
}

/// Built-in tunings as `{ name, label, pitch_classes }` objects
#[wasm_bindgen(js_name = listTunings)]
pub fn list_tunings() -> Result<js_sys::Array, JsValue> {
    let array = js_sys::Array::new();
    for tuning in TuningCatalog::builtin().tunings() {
        array.push(&serialize(tuning, "Failed to serialize tuning")?);
    }
    Ok(array)
}

/// Parse engine configuration text (JSON or YAML) into a config object
#[wasm_bindgen(js_name = parseEngineConfig)]
pub fn parse_engine_config(text: &str) -> Result<JsValue, JsValue> {
    let config = config_from_text(text).map_err(engine_error)?;
    serialize(&config, "Failed to serialize engine config")
}
