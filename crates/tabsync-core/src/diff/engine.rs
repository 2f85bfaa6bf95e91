//! Diff computation engine.
//!
//! The core entry point is [`compute_diff`], which aligns freshly fetched
//! source rows against the stored snapshot by position and classifies every
//! position as insert, update, delete, or unchanged.

use crate::diff::model::{DeleteOp, InsertOp, RowDiff, UpdateOp};
use crate::hash::hash_row;
use crate::model::{Row, SnapshotEntry};

/// Content hash of a snapshot entry, recomputed when the stored hash is
/// absent (e.g. a row inserted manually without one).
fn entry_hash(entry: &SnapshotEntry, columns: &[String]) -> String {
    if entry.content_hash.is_empty() {
        hash_row(&entry.row, columns)
    } else {
        entry.content_hash.clone()
    }
}

/// Compute the diff between source rows and snapshot entries.
///
/// Pure function: never mutates its inputs, never performs I/O. Callers
/// supply `snapshot` as the active entries in ascending-`id` order (the
/// canonical positional order); `source_rows` in fetched order.
///
/// Positional alignment: for every index up to the longer side's length,
/// - present only in source → insert
/// - present only in snapshot → delete
/// - present in both with differing hashes → update
/// - present in both with equal hashes → unchanged
///
/// Completeness: `inserts + updates + deletes + unchanged ==
/// max(source_rows.len(), snapshot.len())`.
///
/// Known structural limitation of positional matching: a single row inserted
/// or removed mid-sequence shifts every subsequent position and is observed
/// as a cascade of updates plus one tail insert/delete, not as one insert or
/// delete.
pub fn compute_diff(
    source_rows: &[Row],
    snapshot: &[SnapshotEntry],
    columns: &[String],
) -> RowDiff {
    let source_hashes: Vec<String> = source_rows
        .iter()
        .map(|row| hash_row(row, columns))
        .collect();
    let snapshot_hashes: Vec<String> = snapshot
        .iter()
        .map(|entry| entry_hash(entry, columns))
        .collect();

    let mut diff = RowDiff::default();
    let upper = source_rows.len().max(snapshot.len());

    for position in 0..upper {
        match (source_rows.get(position), snapshot.get(position)) {
            (Some(row), None) => diff.inserts.push(InsertOp {
                position,
                row: row.clone(),
                content_hash: source_hashes[position].clone(),
            }),
            (None, Some(entry)) => diff.deletes.push(DeleteOp {
                position,
                entry_id: entry.id,
                content_hash: snapshot_hashes[position].clone(),
            }),
            (Some(row), Some(entry)) => {
                if source_hashes[position] == snapshot_hashes[position] {
                    diff.unchanged += 1;
                } else {
                    diff.updates.push(UpdateOp {
                        position,
                        entry_id: entry.id,
                        row: row.clone(),
                        content_hash: source_hashes[position].clone(),
                    });
                }
            }
            (None, None) => unreachable!("position bounded by max of both lengths"),
        }
    }

    tracing::debug!(
        inserts = diff.inserts.len(),
        updates = diff.updates.len(),
        deletes = diff.deletes.len(),
        unchanged = diff.unchanged,
        "Computed diff"
    );

    diff
}
