//! Right-hand fingering hints
//!
//! Direction of travel on the ladder picks the finger: increasing `y` is
//! played with the index finger, decreasing with the thumb, and large leaps
//! with the middle finger. Inner notes of a repeated pitch get no label.

use serde::{Deserialize, Serialize};

use super::PositionedNote;

/// Vertical distance treated as the same pitch
pub const SAME_PITCH_TOLERANCE: f64 = 5.0;

/// Vertical distance above which the middle finger takes the note
pub const LEAP_THRESHOLD: f64 = 150.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Index,
    Thumb,
    Middle,
}

impl Finger {
    /// Single-letter label drawn under the note
    pub fn symbol(&self) -> &'static str {
        match self {
            Finger::Index => "i",
            Finger::Thumb => "t",
            Finger::Middle => "m",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Rising,
    Falling,
}

impl Direction {
    fn of(delta: f64) -> Direction {
        if delta > 0.0 {
            Direction::Rising
        } else {
            Direction::Falling
        }
    }
}

/// Finger for moving away from a note by `delta`
fn finger_towards(delta: f64) -> Finger {
    match Direction::of(delta) {
        Direction::Rising => Finger::Index,
        Direction::Falling if delta.abs() > LEAP_THRESHOLD => Finger::Middle,
        Direction::Falling => Finger::Thumb,
    }
}

/// `y` distance to the next note of a different pitch, if any
fn next_change(notes: &[PositionedNote], index: usize) -> Option<f64> {
    let y = notes[index].y;
    notes[index + 1..]
        .iter()
        .map(|note| note.y - y)
        .find(|delta| delta.abs() >= SAME_PITCH_TOLERANCE)
}

/// Fingering hint per positioned note, in order
pub fn assign_fingering(notes: &[PositionedNote]) -> Vec<Option<Finger>> {
    (0..notes.len())
        .map(|index| {
            let upcoming = next_change(notes, index);

            if index == 0 {
                return Some(match upcoming {
                    Some(delta) if delta < 0.0 => Finger::Thumb,
                    _ => Finger::Index,
                });
            }

            let arrival = notes[index].y - notes[index - 1].y;
            if arrival.abs() < SAME_PITCH_TOLERANCE {
                // Only the last note of a repeated run is labelled
                let run_ends = notes
                    .get(index + 1)
                    .map_or(false, |next| (next.y - notes[index].y).abs() >= SAME_PITCH_TOLERANCE);
                return if run_ends { upcoming.map(finger_towards) } else { None };
            }

            let current = Direction::of(arrival);
            match upcoming {
                Some(delta) if Direction::of(delta) != current => Some(finger_towards(delta)),
                _ => Some(match current {
                    Direction::Rising if arrival > LEAP_THRESHOLD => Finger::Middle,
                    Direction::Rising => Finger::Index,
                    Direction::Falling => Finger::Thumb,
                }),
            }
        })
        .collect()
}
