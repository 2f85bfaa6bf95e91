//! Row and snapshot entry models.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! `Row` stores its values in a `BTreeMap` for deterministic serialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of tabular data: column name → scalar string value.
///
/// Rows carry no intrinsic identity; a row's position in the fetched order is
/// its identity for diffing purposes. A column that is absent behaves exactly
/// like one holding the empty string — `get` returns `""` for both, and the
/// row hasher treats them identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    values: BTreeMap<String, String>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs
    pub fn from_pairs<I, C, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(c, v)| (c.into(), v.into()))
                .collect(),
        }
    }

    /// Set a column's value
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Get a column's value; absent columns read as the empty string
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// True if the row has no values at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The underlying column → value map
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

/// Provenance tag on a snapshot entry.
///
/// Reconciliation stamps `Sheet`; anything written to the snapshot table
/// outside a pass (direct SQL, admin edits) is `Manual`. A manual entry keeps
/// its tag until the next pass touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowProvenance {
    Sheet,
    Manual,
}

impl RowProvenance {
    /// TEXT form stored in the `source` column
    pub fn as_str(&self) -> &'static str {
        match self {
            RowProvenance::Sheet => "sheet",
            RowProvenance::Manual => "manual",
        }
    }

    /// Parse the stored TEXT form; unknown tags read as `Manual` so that
    /// unrecognized writers are never mistaken for reconciled data.
    pub fn parse(s: &str) -> Self {
        match s {
            "sheet" => RowProvenance::Sheet,
            _ => RowProvenance::Manual,
        }
    }
}

impl std::fmt::Display for RowProvenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The persisted counterpart of a [`Row`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Store-assigned surrogate key: monotonically increasing, immutable,
    /// never reused. Ascending `id` over active entries is the canonical
    /// positional order.
    pub id: i64,
    /// Current column values
    pub row: Row,
    /// Hex SHA-256 over the row's current column values
    pub content_hash: String,
    /// Revision of the last pass that touched this entry
    pub revision: i64,
    /// Provenance of the current values
    pub source: RowProvenance,
    /// Tombstone timestamp (epoch ms); `None` means active
    pub deleted_at: Option<i64>,
}

impl SnapshotEntry {
    /// True when the entry has not been tombstoned
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_absent_column_reads_empty() {
        let row = Row::from_pairs([("name", "Al")]);
        assert_eq!(row.get("name"), "Al");
        assert_eq!(row.get("age"), "");
    }

    #[test]
    fn test_row_equality_ignores_insertion_order() {
        let a = Row::from_pairs([("name", "Al"), ("age", "30")]);
        let b = Row::from_pairs([("age", "30"), ("name", "Al")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_provenance_roundtrip() {
        assert_eq!(RowProvenance::parse("sheet"), RowProvenance::Sheet);
        assert_eq!(RowProvenance::parse("manual"), RowProvenance::Manual);
        assert_eq!(RowProvenance::parse("something-else"), RowProvenance::Manual);
        assert_eq!(RowProvenance::Sheet.as_str(), "sheet");
    }

    #[test]
    fn test_entry_active_flag() {
        let entry = SnapshotEntry {
            id: 1,
            row: Row::new(),
            content_hash: String::new(),
            revision: 1,
            source: RowProvenance::Sheet,
            deleted_at: None,
        };
        assert!(entry.is_active());

        let tombstone = SnapshotEntry {
            deleted_at: Some(1_700_000_000_000),
            ..entry
        };
        assert!(!tombstone.is_active());
    }
}
