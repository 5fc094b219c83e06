//! Exhaustive window enumeration

use std::collections::{BTreeSet, HashMap};

use super::projection::Projection;
use super::{PatternEntry, KEY_SEPARATOR};

/// Every window of every length of a projection, grouped by key
///
/// Returns one list per length, index 0 holding length 1. Entries within a
/// length are ordered by first occurrence.
pub fn enumerate_windows(projection: &Projection) -> Vec<Vec<PatternEntry>> {
    let n = projection.len();
    (1..=n)
        .map(|length| enumerate_length(projection, length))
        .collect()
}

/// All windows of one length
pub fn enumerate_length(projection: &Projection, length: usize) -> Vec<PatternEntry> {
    let mut entries: Vec<PatternEntry> = Vec::new();
    // Grouped on the symbols themselves; the joined key is display only
    let mut by_window: HashMap<&[String], usize> = HashMap::new();

    if length == 0 || length > projection.len() {
        return entries;
    }

    for (start, window) in projection.symbols.windows(length).enumerate() {
        let note_index = projection.note_indices[start];

        match by_window.get(window) {
            Some(&slot) => {
                let entry = &mut entries[slot];
                entry.occurrence_count += 1;
                entry.start_positions.insert(start);
                entry.start_note_indices.push(note_index);
            }
            None => {
                by_window.insert(window, entries.len());
                entries.push(PatternEntry {
                    dimension: projection.dimension,
                    length,
                    key: window.join(KEY_SEPARATOR),
                    symbols: window.to_vec(),
                    occurrence_count: 1,
                    start_positions: BTreeSet::from([start]),
                    start_note_indices: vec![note_index],
                });
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::Dimension;

    fn projection(symbols: &[&str]) -> Projection {
        Projection {
            dimension: Dimension::Pitch,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            note_indices: (0..symbols.len()).map(|i| i * 10).collect(),
        }
    }

    #[test]
    fn test_counts_cover_every_window() {
        let p = projection(&["C4", "D4", "C4", "D4", "E4"]);
        let all = enumerate_windows(&p);

        assert_eq!(all.len(), 5);
        for (offset, entries) in all.iter().enumerate() {
            let length = offset + 1;
            let total: usize = entries.iter().map(|e| e.occurrence_count).sum();
            assert_eq!(total, p.len() - length + 1);
        }
    }

    #[test]
    fn test_grouping_and_start_positions() {
        let p = projection(&["C4", "D4", "C4", "D4", "E4"]);
        let pairs = enumerate_length(&p, 2);

        let keys: Vec<&str> = pairs.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["C4→D4", "D4→C4", "D4→E4"]);
        assert_eq!(pairs[0].occurrence_count, 2);
        assert_eq!(pairs[0].start_positions, BTreeSet::from([0, 2]));
        assert_eq!(pairs[0].start_note_indices, vec![0, 20]);
        assert!(pairs[0].is_repeating());
        assert!(pairs[2].is_unique());
    }

    #[test]
    fn test_separator_inside_symbols_stays_distinct() {
        let p = projection(&["a→b", "c", "a", "b→c"]);
        let pairs = enumerate_length(&p, 2);

        // "a→b","c" and "a","b→c" render the same key but are different windows
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].key, pairs[2].key);
        assert_ne!(pairs[0].symbols, pairs[2].symbols);
        assert!(pairs.iter().all(|e| e.is_unique()));
    }

    #[test]
    fn test_out_of_range_lengths() {
        let p = projection(&["C4"]);
        assert!(enumerate_length(&p, 0).is_empty());
        assert!(enumerate_length(&p, 2).is_empty());
        assert!(enumerate_windows(&projection(&[])).is_empty());
    }
}
