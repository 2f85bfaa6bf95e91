//! Row content hashing.
//!
//! Provides the deterministic SHA-256 digest over a row's column values that
//! the diff engine uses to distinguish "unchanged" from "changed-in-place".
//!
//! ## Determinism Guarantees
//!
//! - Same column→value content → same digest, regardless of column order
//!   (columns are sorted alphabetically before hashing)
//! - Any differing value (including empty ↔ non-empty) → different digest
//! - Missing column and empty-string column hash identically

use crate::model::Row;
use sha2::{Digest, Sha256};

/// Separator between `column:value` units in the canonical representation.
///
/// ASCII unit separator; not expected to occur in cell values.
const UNIT_SEPARATOR: char = '\u{1f}';

/// Compute the content hash of a row over the given columns.
///
/// Builds a canonical representation by sorting `columns` alphabetically
/// (source header order is display-only, never hash input), rendering each as
/// `"column:value"` with missing values normalized to the empty string, and
/// joining with [`UNIT_SEPARATOR`]. The SHA-256 digest of that string is
/// returned hex-encoded (64 characters).
///
/// Pure: no side effects, no I/O.
///
/// ## Example
///
/// ```
/// use tabsync_core::hash::hash_row;
/// use tabsync_core::model::Row;
///
/// let columns = vec!["name".to_string(), "age".to_string()];
/// let row = Row::from_pairs([("name", "Al"), ("age", "30")]);
/// let digest = hash_row(&row, &columns);
/// assert_eq!(digest.len(), 64); // SHA256 hex length
/// ```
pub fn hash_row(row: &Row, columns: &[String]) -> String {
    let mut sorted: Vec<&String> = columns.iter().collect();
    sorted.sort();

    let canonical = sorted
        .iter()
        .map(|column| format!("{}:{}", column, row.get(column)))
        .collect::<Vec<_>>()
        .join(&UNIT_SEPARATOR.to_string());

    hash_string(&canonical)
}

/// Hash a string using SHA-256.
///
/// Internal helper for deterministic digest computation.
fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hash_deterministic() {
        let cols = columns(&["name", "age"]);
        let row = Row::from_pairs([("name", "Al"), ("age", "30")]);
        assert_eq!(hash_row(&row, &cols), hash_row(&row, &cols));
    }

    #[test]
    fn test_hash_ignores_header_order() {
        let row = Row::from_pairs([("name", "Al"), ("age", "30")]);
        let forward = hash_row(&row, &columns(&["name", "age"]));
        let reversed = hash_row(&row, &columns(&["age", "name"]));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_hash_changes_with_any_value() {
        let cols = columns(&["name", "age"]);
        let a = Row::from_pairs([("name", "Al"), ("age", "30")]);
        let b = Row::from_pairs([("name", "Al"), ("age", "31")]);
        assert_ne!(hash_row(&a, &cols), hash_row(&b, &cols));
    }

    #[test]
    fn test_missing_and_empty_hash_identically() {
        let cols = columns(&["name", "age"]);
        let missing = Row::from_pairs([("name", "Al")]);
        let empty = Row::from_pairs([("name", "Al"), ("age", "")]);
        assert_eq!(hash_row(&missing, &cols), hash_row(&empty, &cols));
    }

    #[test]
    fn test_empty_vs_nonempty_differ() {
        let cols = columns(&["name"]);
        let empty = Row::from_pairs([("name", "")]);
        let nonempty = Row::from_pairs([("name", "x")]);
        assert_ne!(hash_row(&empty, &cols), hash_row(&nonempty, &cols));
    }

    #[test]
    fn test_extra_row_values_outside_columns_ignored() {
        let cols = columns(&["name"]);
        let plain = Row::from_pairs([("name", "Al")]);
        let extra = Row::from_pairs([("name", "Al"), ("stray", "zzz")]);
        assert_eq!(hash_row(&plain, &cols), hash_row(&extra, &cols));
    }
}
