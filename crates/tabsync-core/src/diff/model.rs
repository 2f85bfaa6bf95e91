//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Each op carries enough information to apply itself independently: the
//! target row content, its freshly computed hash, and (for updates/deletes)
//! the matched snapshot entry's id.

use crate::model::Row;
use serde::{Deserialize, Serialize};

/// A row present in the source but not in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertOp {
    /// 0-based position in the fetched source order
    pub position: usize,
    /// Row content to insert
    pub row: Row,
    /// Freshly computed content hash of `row`
    pub content_hash: String,
}

/// A row present in both sides whose content hash differs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateOp {
    /// 0-based position in both orderings
    pub position: usize,
    /// `id` of the matched snapshot entry
    pub entry_id: i64,
    /// New row content
    pub row: Row,
    /// Freshly computed content hash of `row`
    pub content_hash: String,
}

/// A snapshot entry with no counterpart position in the source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteOp {
    /// 0-based position in the snapshot ordering
    pub position: usize,
    /// `id` of the snapshot entry to tombstone
    pub entry_id: i64,
    /// The entry's content hash at diff time
    pub content_hash: String,
}

/// The computed difference between source rows and a snapshot.
///
/// The three op lists are disjoint by construction (each position lands in
/// exactly one bucket), so application order matters only for determinism.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RowDiff {
    /// Rows to insert, in source-position order
    pub inserts: Vec<InsertOp>,
    /// Rows to rewrite in place, in position order
    pub updates: Vec<UpdateOp>,
    /// Entries to tombstone, in position order
    pub deletes: Vec<DeleteOp>,
    /// Positions where both sides matched by hash
    pub unchanged: usize,
}

impl RowDiff {
    /// True when the diff would not mutate the snapshot at all
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Total number of mutating operations
    pub fn total_changes(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.deletes.len()
    }
}
