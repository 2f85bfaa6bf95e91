//! Physical schema mapping and drift detection.
//!
//! Each source key owns one snapshot table whose name is derived from the
//! sanitized key. The table carries the user data columns (all TEXT) plus
//! the system columns this crate stamps on every write. Provisioning is an
//! external concern; this module only introspects and refuses to run against
//! a table that lacks what a call needs.

use crate::errors::{from_rusqlite, schema_mismatch, table_missing, Result};
use rusqlite::Connection;
use tabsync_core_types::SourceKey;

/// System columns every snapshot table must provide alongside the data columns.
pub const SYSTEM_COLUMNS: [&str; 5] = ["id", "content_hash", "revision", "source", "deleted_at"];

/// Physical table name for a source key.
pub fn snapshot_table_name(key: &SourceKey) -> String {
    format!("sheet_{}", key.sanitized())
}

/// Quote an identifier for embedding in dynamic SQL.
///
/// Data column names come from an external header row, so they are always
/// quoted; embedded double quotes are doubled per SQL rules.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// List a table's physical column names via `PRAGMA table_info`.
///
/// Returns an empty list when the table does not exist (SQLite reports no
/// rows rather than an error).
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;

    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(columns)
}

/// Verify the physical table can hold the given data columns.
///
/// Checks both the system columns and every requested data column, before
/// any mutation is attempted. Returns the physical column list so callers
/// can reuse it without a second PRAGMA.
///
/// # Errors
///
/// - `NotFound` — the snapshot table has not been provisioned
/// - `SchemaMismatch` — the table exists but lacks one or more expected
///   columns; the message names all of them
pub fn ensure_schema(conn: &Connection, table: &str, columns: &[String]) -> Result<Vec<String>> {
    let physical = table_columns(conn, table)?;
    if physical.is_empty() {
        return Err(table_missing(table));
    }

    let mut missing: Vec<String> = SYSTEM_COLUMNS
        .iter()
        .filter(|c| !physical.iter().any(|p| p == *c))
        .map(|c| c.to_string())
        .collect();
    missing.extend(
        columns
            .iter()
            .filter(|c| !physical.contains(c))
            .cloned(),
    );

    if !missing.is_empty() {
        return Err(schema_mismatch(table, &missing));
    }

    Ok(physical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE sheet_roster (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                age TEXT,
                content_hash TEXT,
                revision INTEGER,
                source TEXT,
                deleted_at INTEGER
            )",
        )
        .unwrap();
        conn
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_name_from_key() {
        let key = SourceKey::new("Team Roster");
        assert_eq!(snapshot_table_name(&key), "sheet_team_roster");
    }

    #[test]
    fn test_quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("plain"), "\"plain\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_ensure_schema_accepts_matching_table() {
        let conn = setup_conn();
        let physical = ensure_schema(&conn, "sheet_roster", &cols(&["name", "age"])).unwrap();
        assert!(physical.contains(&"content_hash".to_string()));
    }

    #[test]
    fn test_ensure_schema_rejects_missing_data_column() {
        let conn = setup_conn();
        let err = ensure_schema(&conn, "sheet_roster", &cols(&["name", "email"])).unwrap_err();
        assert_eq!(
            err.kind(),
            tabsync_core::errors::TsErrorKind::SchemaMismatch
        );
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_ensure_schema_rejects_absent_table() {
        let conn = setup_conn();
        let err = ensure_schema(&conn, "sheet_nope", &cols(&["name"])).unwrap_err();
        assert_eq!(err.kind(), tabsync_core::errors::TsErrorKind::NotFound);
    }
}
