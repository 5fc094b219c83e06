//! Engine configuration
//!
//! All layout constants live here and are passed into every call. Nothing in
//! the crate reads a process-wide setting.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::{EngineError, Result};
use crate::models::tuning::DEFAULT_TUNING;
use crate::models::Rational;

/// Smallest and largest supported string ladder
pub const MIN_STRING_COUNT: usize = 1;
pub const MAX_STRING_COUNT: usize = 40;

/// Supported octaves for the lowest string
pub const MIN_START_OCTAVE: i32 = 0;
pub const MAX_START_OCTAVE: i32 = 8;

/// Configuration for layout and pattern calculations
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// X of the first note (room for string labels)
    pub left_margin: f64,

    /// Horizontal pixels per quarter note
    pub duration_multiplier: f64,

    /// Horizontal advance after a grace note
    pub grace_increment: f64,

    /// Padding after the last note
    pub trailing_margin: f64,

    /// Width reported for an empty note stream
    pub empty_width: f64,

    /// Canvas height
    pub canvas_height: f64,

    /// Minimum space below the highest string
    pub bottom_margin: f64,

    /// Y of the reference pitch (C3)
    pub base_y: f64,

    /// Vertical pixels per cent
    pub pixels_per_cent: f64,

    /// Octave of the lowest string
    pub start_octave: i32,

    /// Number of strings on the instrument
    pub string_count: usize,

    /// Grace notes at or below this duration are sixteenth graces
    #[serde(with = "crate::models::serde_helpers::rational")]
    pub grace_sixteenth_threshold: Rational,

    /// Tuning system name from the catalog
    pub tuning: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            left_margin: 150.0,
            duration_multiplier: 85.0,
            grace_increment: 25.0,
            trailing_margin: 400.0,
            empty_width: 2000.0,
            canvas_height: 800.0,
            bottom_margin: 100.0,
            base_y: 100.0,
            pixels_per_cent: 0.125,
            start_octave: 3,
            string_count: 17,
            grace_sixteenth_threshold: Rational::new(1, 4),
            tuning: DEFAULT_TUNING.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a YAML configuration; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Same configuration with a different tuning
    pub fn with_tuning(mut self, tuning: impl Into<String>) -> Self {
        self.tuning = tuning.into();
        self
    }

    /// Replace unusable values with their defaults
    ///
    /// Tuning names are resolved later by the catalog; this only checks
    /// numeric ranges.
    pub fn sanitized(&self, diagnostics: &mut Diagnostics) -> EngineConfig {
        let defaults = EngineConfig::default();
        let mut config = self.clone();

        if !(MIN_STRING_COUNT..=MAX_STRING_COUNT).contains(&config.string_count) {
            let err = EngineError::StringCountOutOfRange {
                requested: config.string_count,
                min: MIN_STRING_COUNT,
                max: MAX_STRING_COUNT,
            };
            diagnostics.add(Diagnostic::configuration(
                "string_count_out_of_range",
                format!("{}, using {}", err, defaults.string_count),
            ));
            config.string_count = defaults.string_count;
        }

        if !(MIN_START_OCTAVE..=MAX_START_OCTAVE).contains(&config.start_octave) {
            let err = EngineError::OctaveOutOfRange {
                octave: config.start_octave,
                min: MIN_START_OCTAVE,
                max: MAX_START_OCTAVE,
            };
            diagnostics.add(Diagnostic::configuration(
                "start_octave_out_of_range",
                format!("start_octave: {}, using {}", err, defaults.start_octave),
            ));
            config.start_octave = defaults.start_octave;
        }

        let mut check_positive = |name: &str, value: &mut f64, default: f64| {
            if !value.is_finite() || *value <= 0.0 {
                diagnostics.add(Diagnostic::configuration(
                    "non_positive_spacing",
                    format!("{} must be positive (got {}), using {}", name, value, default),
                ));
                *value = default;
            }
        };
        check_positive("duration_multiplier", &mut config.duration_multiplier, defaults.duration_multiplier);
        check_positive("grace_increment", &mut config.grace_increment, defaults.grace_increment);
        check_positive("pixels_per_cent", &mut config.pixels_per_cent, defaults.pixels_per_cent);
        check_positive("canvas_height", &mut config.canvas_height, defaults.canvas_height);
        check_positive("empty_width", &mut config.empty_width, defaults.empty_width);

        for (name, value, default) in [
            ("left_margin", &mut config.left_margin, defaults.left_margin),
            ("trailing_margin", &mut config.trailing_margin, defaults.trailing_margin),
            ("bottom_margin", &mut config.bottom_margin, defaults.bottom_margin),
            ("base_y", &mut config.base_y, defaults.base_y),
        ] {
            if !value.is_finite() {
                diagnostics.add(Diagnostic::configuration(
                    "non_finite_margin",
                    format!("{} is not finite, using {}", name, default),
                ));
                *value = default;
            }
        }

        config
    }

    /// Y coordinate for a cents value
    pub fn y_for_cents(&self, cents: i32) -> f64 {
        self.base_y + cents as f64 * self.pixels_per_cent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.left_margin, 150.0);
        assert_eq!(config.duration_multiplier, 85.0);
        assert_eq!(config.string_count, 17);
        assert_eq!(config.tuning, "C-D-E-G-A");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"grace_increment": 30, "tuning": "D-E-G-A-B"}"#).unwrap();
        assert_eq!(config.grace_increment, 30.0);
        assert_eq!(config.tuning, "D-E-G-A-B");
        assert_eq!(config.duration_multiplier, 85.0);
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "string_count: 21\ngrace_sixteenth_threshold: \"1/8\"\n";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.string_count, 21);
        assert_eq!(config.grace_sixteenth_threshold, Rational::new(1, 8));
    }

    #[test]
    fn test_invalid_config_is_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, crate::errors::EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_sanitized_replaces_bad_values() {
        let config = EngineConfig {
            string_count: 0,
            grace_increment: -5.0,
            ..EngineConfig::default()
        };
        let mut diagnostics = Diagnostics::new();
        let clean = config.sanitized(&mut diagnostics);

        assert_eq!(clean.string_count, 17);
        assert_eq!(clean.grace_increment, 25.0);
        assert!(diagnostics.has_code("string_count_out_of_range"));
        assert!(diagnostics.has_code("non_positive_spacing"));
    }

    #[test]
    fn test_sanitized_bounds_start_octave_and_canvas() {
        for start_octave in [2_000_000, -1, i32::MIN, MAX_START_OCTAVE + 1] {
            let config = EngineConfig {
                start_octave,
                ..EngineConfig::default()
            };
            let mut diagnostics = Diagnostics::new();
            assert_eq!(config.sanitized(&mut diagnostics).start_octave, 3);
            assert!(diagnostics.has_code("start_octave_out_of_range"), "{}", start_octave);
        }

        let config = EngineConfig {
            start_octave: MAX_START_OCTAVE,
            canvas_height: f64::INFINITY,
            empty_width: f64::NAN,
            ..EngineConfig::default()
        };
        let mut diagnostics = Diagnostics::new();
        let clean = config.sanitized(&mut diagnostics);
        assert_eq!(clean.start_octave, MAX_START_OCTAVE);
        assert_eq!(clean.canvas_height, 800.0);
        assert_eq!(clean.empty_width, 2000.0);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_y_for_cents() {
        let config = EngineConfig::default();
        assert_eq!(config.y_for_cents(0), 100.0);
        assert_eq!(config.y_for_cents(1400), 275.0);
    }
}
