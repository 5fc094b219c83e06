// Pattern index completeness, section detection and cross-song queries

use dantranh_wasm::analysis::{analyze_song, SongInput};
use dantranh_wasm::lyrics::align_syllables;
use dantranh_wasm::models::{Note, Rational, SyllableRecord};
use dantranh_wasm::patterns::{Dimension, PatternIndex, SectionLabel};
use dantranh_wasm::{Diagnostics, LayoutEngine};

/// Verse, verse, bridge, verse: the verse is the longest repeated passage
fn lullaby() -> (Vec<Note>, Vec<SyllableRecord>) {
    let verse = [("C", 4), ("D", 4), ("E", 4), ("G", 4)];
    let bridge = [("A", 4), ("C", 5)];
    let words = ["ru", "hời", "ru", "hỡi", "là", "ru"];

    let mut pitches: Vec<(&str, i32)> = Vec::new();
    pitches.extend(verse);
    pitches.extend(verse);
    pitches.extend(bridge);
    pitches.extend(verse);

    let notes: Vec<Note> = pitches
        .iter()
        .enumerate()
        .map(|(i, (pc, octave))| {
            let duration = if i % 4 == 3 { Rational::new(3, 2) } else { Rational::from_integer(1) };
            Note::new(pc, *octave, duration, i)
        })
        .collect();
    let syllables = (0..notes.len())
        .map(|i| SyllableRecord::new(words[i % words.len()], "", &format!("p{}", i / 4)))
        .collect();
    (notes, syllables)
}

fn build(notes: &[Note], syllables: &[SyllableRecord]) -> PatternIndex {
    let mut diagnostics = Diagnostics::new();
    let layout = LayoutEngine::default().compute_layout(notes, &mut diagnostics);
    let alignment = align_syllables(notes, syllables, &mut diagnostics);
    PatternIndex::build(&layout, &alignment)
}

#[test]
fn test_counts_sum_to_window_total() {
    let (notes, syllables) = lullaby();
    let index = build(&notes, &syllables);

    for dimension in Dimension::ALL {
        let n = index.projection(dimension).unwrap().len();
        assert_eq!(n, notes.len());
        for length in 1..=n {
            let entries = index.entries_at(dimension, length);
            let total: usize = entries.iter().map(|e| e.occurrence_count).sum();
            assert_eq!(total, n - length + 1, "{} at length {}", dimension.name(), length);

            let mut windows: Vec<&[String]> = entries.iter().map(|e| e.symbols.as_slice()).collect();
            windows.sort();
            windows.dedup();
            assert_eq!(windows.len(), entries.len(), "windows are distinct");

            for entry in entries {
                assert_eq!(entry.start_positions.len(), entry.occurrence_count);
                assert_eq!(entry.start_note_indices.len(), entry.occurrence_count);
            }
        }
        assert!(index.entries_at(dimension, n + 1).is_empty());
    }
}

#[test]
fn test_sections_from_longest_pitch_repeat() {
    let (notes, syllables) = lullaby();
    let index = build(&notes, &syllables);

    let longest = index.longest_repeating(Dimension::Pitch);
    assert_eq!(longest.len(), 1);
    assert_eq!(longest[0].key, "C4→D4→E4→G4");

    let sections = index.detect_sections();
    let summary: Vec<(SectionLabel, usize)> = sections.iter().map(|s| (s.label, s.start_note_index)).collect();
    assert_eq!(
        summary,
        vec![
            (SectionLabel::Opening, 0),
            (SectionLabel::Refrain, 4),
            (SectionLabel::Closing, 10),
        ]
    );
    assert_eq!(sections[2].end_note_index, 13);
}

#[test]
fn test_duration_motif() {
    let (notes, syllables) = lullaby();
    let index = build(&notes, &syllables);

    let motif = index
        .find(Dimension::Duration, &["1", "1", "3/2"])
        .expect("the verse rhythm repeats");
    assert_eq!(motif.occurrence_count, 3);
    assert!(index.motifs_in(Dimension::Duration).contains(&motif));
}

#[test]
fn test_syllable_dimensions_skip_unsung_notes() {
    let (notes, syllables) = lullaby();
    let index = build(&notes, &syllables[..5]);

    assert_eq!(index.projection(Dimension::Pitch).unwrap().len(), notes.len());
    assert_eq!(index.projection(Dimension::Syllable).unwrap().len(), 5);
    assert_eq!(index.projection(Dimension::Tone).unwrap().symbols[1], "huyền");
}

#[test]
fn test_shared_windows_between_songs() {
    let (notes, syllables) = lullaby();
    let first = build(&notes, &syllables);
    let second = build(&notes[4..10], &syllables[4..10]);

    let shared = first.shared_windows(&second, Dimension::Pitch, 4);
    assert!(shared.iter().any(|w| w.key == "C4→D4→E4→G4"));
    assert!(shared.iter().all(|w| w.length >= 4));
    assert!(first.shared_ratio(&second, Dimension::Pitch, 1) > 0.0);
}

#[test]
fn test_index_is_idempotent() {
    let (notes, syllables) = lullaby();
    let song = SongInput {
        notes,
        syllables,
        tuning: None,
    };
    let engine = LayoutEngine::default();

    let first = serde_json::to_string(&analyze_song(&engine, &song)).unwrap();
    let second = serde_json::to_string(&analyze_song(&engine, &song)).unwrap();
    assert_eq!(first, second);
}
