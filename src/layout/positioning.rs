//! Positioning Engine
//!
//! Walks the note stream once. X accumulates durations from the left margin;
//! Y comes from the pitch-cents resolver. Grace notes advance the cursor by
//! a fixed increment instead of their duration.

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::EngineError;
use crate::models::pitch::pitch_cents_or_neutral;
use crate::models::{duration_to_f64, generate_ladder, Note, Rational, TuningCatalog, TuningSystem};

use super::bent::{classify, nearest_string_position, Classification};
use super::{GraceKind, Layout, PositionedNote};

/// Computes tablature layouts for one configuration and tuning catalog
///
/// Holds only immutable inputs; every call recomputes the full layout.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    config: EngineConfig,
    catalog: TuningCatalog,
}

impl LayoutEngine {
    /// Create a new layout engine
    pub fn new(config: EngineConfig, catalog: TuningCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TuningCatalog {
        &self.catalog
    }

    /// Lay out a note stream with the configured tuning
    pub fn compute_layout(&self, notes: &[Note], diagnostics: &mut Diagnostics) -> Layout {
        let config = self.config.sanitized(diagnostics);
        let tuning = self.catalog.resolve(&config.tuning, diagnostics);
        position_notes(notes, tuning, &config, diagnostics)
    }

    /// Lay out a note stream with an explicitly named tuning
    pub fn compute_layout_with_tuning(
        &self,
        notes: &[Note],
        tuning_name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Layout {
        let config = self.config.sanitized(diagnostics);
        let tuning = self.catalog.resolve(tuning_name, diagnostics);
        position_notes(notes, tuning, &config, diagnostics)
    }
}

/// Position every pitched note of the stream against a tuning
///
/// `config` is used as given; callers that accept user configuration should
/// pass it through [`EngineConfig::sanitized`] first.
pub fn position_notes(
    notes: &[Note],
    tuning: &TuningSystem,
    config: &EngineConfig,
    diagnostics: &mut Diagnostics,
) -> Layout {
    let strings = generate_ladder(tuning, config.string_count, config.start_octave, config);
    let mut positioned = Vec::with_capacity(notes.len());
    let mut cursor = config.left_margin;
    let mut rests = 0usize;

    for note in notes {
        let Some(pitch_class) = note.pitch_class.as_deref() else {
            rests += 1;
            continue;
        };

        let (cents, pitch_error) = pitch_cents_or_neutral(pitch_class, note.octave);
        if let Some(err) = pitch_error {
            let code = match err {
                EngineError::OctaveOutOfRange { .. } => "octave_out_of_range",
                _ => "unknown_pitch_spelling",
            };
            diagnostics.add(
                Diagnostic::malformed(code, format!("{}, using {} cents", err, cents)).at_note(note.sequence_index),
            );
        }
        let y = config.y_for_cents(cents);

        let advance = if note.is_grace {
            config.grace_increment
        } else {
            duration_to_f64(effective_duration(note, diagnostics)) * config.duration_multiplier
        };

        let classification = classify(pitch_class, note.octave, y, &strings);
        let press_string = classification
            .press_string()
            .and_then(|ordinal| strings.get(ordinal - 1).cloned());
        let open_string = match classification {
            Classification::Open { string } => Some(string),
            Classification::Bent { .. } => None,
        };

        positioned.push(PositionedNote {
            note: note.clone(),
            x: cursor,
            y,
            cents,
            advance,
            is_bent: classification.is_bent(),
            open_string,
            press_string,
            grace_kind: note
                .is_grace
                .then(|| GraceKind::classify(note.duration, config.grace_sixteenth_threshold)),
            string_position: nearest_string_position(&strings, y),
        });

        cursor += advance;
    }

    let width = match positioned.last() {
        Some(last) => last.x + last.advance + config.trailing_margin,
        None => config.empty_width,
    };
    let top_string = strings.iter().map(|s| s.y).fold(f64::MIN, f64::max);
    let height = config.canvas_height.max(top_string + config.bottom_margin);

    log::debug!(
        "Positioned {} notes ({} rests skipped) on {} strings of {}; width {}",
        positioned.len(),
        rests,
        strings.len(),
        tuning.name,
        width
    );

    Layout {
        tuning: tuning.name.clone(),
        strings,
        notes: positioned,
        width,
        height,
    }
}

/// Main-note duration, neutralising non-positive values to one quarter
fn effective_duration(note: &Note, diagnostics: &mut Diagnostics) -> Rational {
    if note.duration > Rational::from_integer(0) {
        return note.duration;
    }
    let err = EngineError::NonPositiveDuration {
        note_index: note.sequence_index,
        duration: note.duration.to_string(),
    };
    diagnostics.add(
        Diagnostic::malformed("non_positive_duration", format!("{}, using 1", err)).at_note(note.sequence_index),
    );
    Rational::from_integer(1)
}
