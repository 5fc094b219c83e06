//! Tuning catalog and string ladder generation
//!
//! A tuning is one octave of a five-note cycle. The ladder repeats the cycle
//! upward from `start_octave` until the instrument's string count is reached.

use serde::{Deserialize, Serialize};

use super::pitch::{checked_octave_cents, PitchSpelling};
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::{EngineError, Result};

/// Name of the tuning used when a requested one is unknown
pub const DEFAULT_TUNING: &str = "C-D-E-G-A";

/// Pitch classes per tuning cycle
pub const TUNING_SIZE: usize = 5;

/// A named five-pitch-class tuning system
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TuningSystem {
    pub name: String,
    /// Descriptive label shown next to the name
    pub label: String,
    pub pitch_classes: Vec<String>,
}

impl TuningSystem {
    /// Create a tuning, validating the cycle length and spellings
    pub fn new(name: &str, label: &str, pitch_classes: &[&str]) -> Result<Self> {
        if pitch_classes.len() != TUNING_SIZE {
            return Err(EngineError::InvalidConfig(format!(
                "Tuning {} has {} pitch classes (expected {})",
                name,
                pitch_classes.len(),
                TUNING_SIZE
            )));
        }
        for pitch_class in pitch_classes {
            PitchSpelling::parse(pitch_class)?;
        }
        Ok(Self {
            name: name.to_string(),
            label: label.to_string(),
            pitch_classes: pitch_classes.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Parse the dash-separated catalog name ("C-D-E-G-A")
    pub fn from_name(name: &str) -> Result<Self> {
        let classes: Vec<&str> = name.split('-').map(str::trim).collect();
        Self::new(name, name, &classes)
    }
}

/// One string of the instrument
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StringDefinition {
    /// 1-based position from the lowest string
    pub ordinal: usize,
    pub pitch_class: String,
    pub octave: i32,
    /// Cents from C3
    pub cents: i32,
    pub y: f64,
}

impl StringDefinition {
    /// Full pitch notation (e.g., "E4")
    pub fn notation(&self) -> String {
        format!("{}{}", self.pitch_class, self.octave)
    }

    /// Semitone class of the open string
    pub fn semitone(&self) -> u8 {
        ((self.cents.rem_euclid(1200)) / 100) as u8
    }
}

/// Fixed set of tuning systems, passed into every call that needs one
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TuningCatalog {
    tunings: Vec<TuningSystem>,
}

impl TuningCatalog {
    /// Catalog from explicit tunings; the first one is the fallback
    pub fn new(tunings: Vec<TuningSystem>) -> Result<Self> {
        if tunings.is_empty() {
            return Err(EngineError::InvalidConfig("Tuning catalog is empty".to_string()));
        }
        Ok(Self { tunings })
    }

    /// The built-in dan tranh tunings
    pub fn builtin() -> Self {
        let entries: [(&str, &str, [&str; TUNING_SIZE]); 5] = [
            ("C-D-E-G-A", "Dan Tranh Standard", ["C", "D", "E", "G", "A"]),
            ("C-D-F-G-A", "Dan Tranh Southern", ["C", "D", "F", "G", "A"]),
            ("C-D-E-G-Bb", "Dan Tranh Central", ["C", "D", "E", "G", "Bb"]),
            ("C-Eb-F-G-Bb", "Ru Con", ["C", "Eb", "F", "G", "Bb"]),
            ("D-E-G-A-B", "Bac", ["D", "E", "G", "A", "B"]),
        ];
        let tunings = entries
            .iter()
            .map(|(name, label, classes)| TuningSystem {
                name: name.to_string(),
                label: label.to_string(),
                pitch_classes: classes.iter().map(|c| c.to_string()).collect(),
            })
            .collect();
        Self { tunings }
    }

    pub fn tunings(&self) -> &[TuningSystem] {
        &self.tunings
    }

    pub fn names(&self) -> Vec<String> {
        self.tunings.iter().map(|t| t.name.clone()).collect()
    }

    /// Fallback tuning (the default name if present, else the first entry)
    pub fn default_tuning(&self) -> &TuningSystem {
        self.tunings
            .iter()
            .find(|t| t.name == DEFAULT_TUNING)
            .unwrap_or(&self.tunings[0])
    }

    /// Strict lookup by name
    pub fn get(&self, name: &str) -> Result<&TuningSystem> {
        self.tunings
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| EngineError::UnknownTuning(name.to_string()))
    }

    /// Lookup by name, falling back to the default tuning
    pub fn resolve(&self, name: &str, diagnostics: &mut Diagnostics) -> &TuningSystem {
        match self.get(name) {
            Ok(tuning) => tuning,
            Err(err) => {
                let fallback = self.default_tuning();
                diagnostics.add(Diagnostic::configuration(
                    "unknown_tuning",
                    format!("{}, using {}", err, fallback.name),
                ));
                fallback
            }
        }
    }
}

impl Default for TuningCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Generate the string ladder for a tuning
///
/// The cycle repeats upward. A class that would not sound above the previous
/// string moves to the next octave, which is where an ascending cycle wraps;
/// `y` is therefore strictly increasing in ordinal for any tuning. The ladder
/// stops early if the octave arithmetic would overflow.
pub fn generate_ladder(
    tuning: &TuningSystem,
    string_count: usize,
    start_octave: i32,
    config: &EngineConfig,
) -> Vec<StringDefinition> {
    let spellings: Vec<(String, i32)> = tuning
        .pitch_classes
        .iter()
        .filter_map(|name| {
            PitchSpelling::parse(name)
                .ok()
                .map(|spelling| (name.clone(), spelling.offset()))
        })
        .collect();

    if spellings.is_empty() {
        return Vec::new();
    }

    let mut strings = Vec::with_capacity(string_count);
    let mut octave = start_octave;
    let mut previous: Option<i32> = None;

    for ordinal in 1..=string_count {
        let (pitch_class, offset) = &spellings[(ordinal - 1) % spellings.len()];

        let Some(cents) = ascending_cents(*offset, &mut octave, previous) else {
            log::warn!("String ladder stopped at {} strings: octave {} out of range", ordinal - 1, octave);
            break;
        };
        previous = Some(cents);

        strings.push(StringDefinition {
            ordinal,
            pitch_class: pitch_class.clone(),
            octave,
            cents,
            y: config.y_for_cents(cents),
        });
    }

    strings
}

/// Cents of `offset` in the lowest octave from `octave` upward that sounds
/// above `previous`; advances `octave` to match
fn ascending_cents(offset: i32, octave: &mut i32, previous: Option<i32>) -> Option<i32> {
    loop {
        let cents = checked_octave_cents(*octave)?.checked_add(offset)?;
        if previous.map_or(true, |prev| cents > prev) {
            return Some(cents);
        }
        *octave = octave.checked_add(1)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = TuningCatalog::builtin();
        assert_eq!(catalog.tunings().len(), 5);
        assert_eq!(catalog.default_tuning().name, DEFAULT_TUNING);
        for tuning in catalog.tunings() {
            assert_eq!(tuning.pitch_classes.len(), TUNING_SIZE);
            for class in &tuning.pitch_classes {
                assert!(PitchSpelling::parse(class).is_ok(), "{} in {}", class, tuning.name);
            }
        }
    }

    #[test]
    fn test_unknown_tuning_falls_back() {
        let catalog = TuningCatalog::builtin();
        let mut diagnostics = Diagnostics::new();
        let tuning = catalog.resolve("Z-Z-Z-Z-Z", &mut diagnostics);
        assert_eq!(tuning.name, DEFAULT_TUNING);
        assert!(diagnostics.has_code("unknown_tuning"));
        assert!(matches!(catalog.get("nope"), Err(EngineError::UnknownTuning(_))));
    }

    #[test]
    fn test_standard_ladder() {
        let catalog = TuningCatalog::builtin();
        let config = EngineConfig::default();
        let ladder = generate_ladder(catalog.default_tuning(), 17, 3, &config);

        assert_eq!(ladder.len(), 17);
        assert_eq!(ladder[0].notation(), "C3");
        assert_eq!(ladder[0].y, 100.0);
        assert_eq!(ladder[4].notation(), "A3");
        assert_eq!(ladder[5].notation(), "C4");
        assert_eq!(ladder[16].notation(), "D6");
        assert_eq!(ladder[16].ordinal, 17);
    }

    #[test]
    fn test_unordered_cycle_stays_ascending() {
        let tuning = TuningSystem::from_name("D-F-G-A-C").unwrap();
        let config = EngineConfig::default();
        let ladder = generate_ladder(&tuning, 12, 3, &config);

        assert_eq!(ladder[3].notation(), "A3");
        assert_eq!(ladder[4].notation(), "C4");
        assert_eq!(ladder[5].notation(), "D4");
        for pair in ladder.windows(2) {
            assert!(pair[1].y > pair[0].y);
        }
    }

    #[test]
    fn test_ladder_stops_before_overflow() {
        let catalog = TuningCatalog::builtin();
        let config = EngineConfig::default();

        assert!(generate_ladder(catalog.default_tuning(), 17, i32::MAX, &config).is_empty());
        assert!(generate_ladder(catalog.default_tuning(), 17, i32::MIN, &config).is_empty());

        let high = generate_ladder(catalog.default_tuning(), 40, 8, &config);
        assert_eq!(high.len(), 40);
        assert_eq!(high[39].octave, 15);
    }

    #[test]
    fn test_tuning_validation() {
        assert!(TuningSystem::new("bad", "bad", &["C", "D"]).is_err());
        assert!(TuningSystem::new("bad", "bad", &["C", "D", "E", "G", "H"]).is_err());
        assert!(TuningCatalog::new(Vec::new()).is_err());
    }
}
