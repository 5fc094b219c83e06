//! Dan Tranh Tablature WASM Module
//!
//! Positions a parsed note stream on a dan tranh string ladder, aligns sung
//! syllables to notes, and indexes repeated pitch, rhythm and lyric patterns.
//! All passes are pure functions of their inputs.

pub mod analysis;
pub mod api;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod layout;
pub mod lyrics;
pub mod models;
pub mod patterns;

// Re-export commonly used types
pub use analysis::{analyze_song, analyze_songs, suggest_tuning, SongAnalysis, SongInput, TuningSuggestion};
pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity, Diagnostics};
pub use errors::{EngineError, Result};
pub use layout::{GraceKind, Layout, LayoutEngine, PositionedNote};
pub use lyrics::{align_syllables, AlignedSyllable, Alignment};
pub use models::{Note, Rational, SlurRole, StringDefinition, SyllableRecord, TuningCatalog, TuningSystem};
pub use patterns::{Dimension, PatternEntry, PatternIndex};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).ok();

    log::info!("Dan tranh WASM module initialized");
}
