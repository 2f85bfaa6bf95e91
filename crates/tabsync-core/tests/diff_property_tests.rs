// Property tests for the hash + diff kernel: hash determinism across column
// order, diff completeness, and no-op idempotence over arbitrary row sets.

use proptest::prelude::*;
use tabsync_core::diff::compute_diff;
use tabsync_core::hash::hash_row;
use tabsync_core::model::{Row, RowProvenance, SnapshotEntry};

const COLUMNS: [&str; 3] = ["name", "age", "city"];

fn columns() -> Vec<String> {
    COLUMNS.iter().map(|s| s.to_string()).collect()
}

fn cell_value() -> impl Strategy<Value = String> {
    // Includes the empty string so empty vs. missing normalization is hit.
    prop_oneof![Just(String::new()), "[a-z0-9 ]{1,12}"]
}

fn arb_row() -> impl Strategy<Value = Row> {
    proptest::collection::vec(cell_value(), COLUMNS.len()).prop_map(|values| {
        Row::from_pairs(COLUMNS.iter().zip(values).map(|(c, v)| (c.to_string(), v)))
    })
}

fn snapshot_from_rows(rows: &[Row]) -> Vec<SnapshotEntry> {
    let cols = columns();
    rows.iter()
        .enumerate()
        .map(|(i, row)| SnapshotEntry {
            id: i as i64 + 1,
            row: row.clone(),
            content_hash: hash_row(row, &cols),
            revision: 1,
            source: RowProvenance::Sheet,
            deleted_at: None,
        })
        .collect()
}

proptest! {
    #[test]
    fn hash_is_independent_of_column_order(row in arb_row()) {
        let forward = columns();
        let mut reversed = columns();
        reversed.reverse();
        prop_assert_eq!(hash_row(&row, &forward), hash_row(&row, &reversed));
    }

    #[test]
    fn hash_distinguishes_changed_values(row in arb_row(), extra in "[a-z]{1,8}") {
        let cols = columns();
        let mut changed = row.clone();
        let appended = format!("{}{}", row.get("name"), extra);
        changed.set("name", appended);
        prop_assert_ne!(hash_row(&row, &cols), hash_row(&changed, &cols));
    }

    #[test]
    fn diff_classifies_every_position_exactly_once(
        source in proptest::collection::vec(arb_row(), 0..8),
        stored in proptest::collection::vec(arb_row(), 0..8),
    ) {
        let cols = columns();
        let snapshot = snapshot_from_rows(&stored);
        let diff = compute_diff(&source, &snapshot, &cols);
        let classified =
            diff.inserts.len() + diff.updates.len() + diff.deletes.len() + diff.unchanged;
        prop_assert_eq!(classified, source.len().max(snapshot.len()));
    }

    #[test]
    fn diff_of_snapshot_against_itself_is_empty(
        rows in proptest::collection::vec(arb_row(), 0..8),
    ) {
        let cols = columns();
        let snapshot = snapshot_from_rows(&rows);
        let diff = compute_diff(&rows, &snapshot, &cols);
        prop_assert!(diff.is_empty());
        prop_assert_eq!(diff.unchanged, rows.len());
    }
}
