//! Read-only snapshot query operations.
//!
//! Resolves a source key to its active snapshot entries without mutating any
//! state. Reads are tolerant of schema drift: data columns absent from the
//! physical table are surfaced as empty strings rather than failing the call.

use crate::errors::{from_rusqlite, table_missing, Result};
use crate::schema::{quote_ident, snapshot_table_name, table_columns};
use rusqlite::Connection;
use tabsync_core::model::{Row, RowProvenance, SnapshotEntry};
use tabsync_core_types::SourceKey;

/// Fetch all active entries for a source key, ordered ascending by `id`.
///
/// The ascending-`id` ordering over active entries is the canonical
/// positional order the diff engine aligns against. Only columns present in
/// both `columns` and the physical table are selected; the rest read as
/// empty strings through [`Row::get`].
///
/// # Errors
///
/// - `NotFound` — the snapshot table has not been provisioned
/// - `Persistence` — SQLite query failed
pub fn get_snapshot(
    conn: &Connection,
    key: &SourceKey,
    columns: &[String],
) -> Result<Vec<SnapshotEntry>> {
    let table = snapshot_table_name(key);
    let physical = table_columns(conn, &table)?;
    if physical.is_empty() {
        return Err(table_missing(&table));
    }

    let data_cols: Vec<&String> = columns.iter().filter(|c| physical.contains(c)).collect();

    let mut select_list = vec![
        "id".to_string(),
        "content_hash".to_string(),
        "revision".to_string(),
        "source".to_string(),
        "deleted_at".to_string(),
    ];
    select_list.extend(data_cols.iter().map(|c| quote_ident(c)));

    let sql = format!(
        "SELECT {} FROM {} WHERE deleted_at IS NULL ORDER BY id ASC",
        select_list.join(", "),
        quote_ident(&table)
    );

    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let entries = stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let content_hash: Option<String> = row.get(1)?;
            let revision: Option<i64> = row.get(2)?;
            let source: Option<String> = row.get(3)?;
            let deleted_at: Option<i64> = row.get(4)?;

            let mut values = Row::new();
            for (offset, column) in data_cols.iter().enumerate() {
                let value: Option<String> = row.get(5 + offset)?;
                values.set(column.as_str(), value.unwrap_or_default());
            }

            Ok(SnapshotEntry {
                id,
                row: values,
                content_hash: content_hash.unwrap_or_default(),
                revision: revision.unwrap_or(0),
                source: RowProvenance::parse(source.as_deref().unwrap_or("")),
                deleted_at,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(entries)
}

/// Highest revision ever stamped on the key's snapshot table.
///
/// Tombstones count: a later pass must never stamp a revision at or below
/// one already present, even if every row carrying it has since been
/// tombstoned. Returns 0 for a table with no rows.
pub fn current_revision(conn: &Connection, key: &SourceKey) -> Result<i64> {
    let table = snapshot_table_name(key);
    let sql = format!(
        "SELECT COALESCE(MAX(revision), 0) FROM {}",
        quote_ident(&table)
    );

    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(from_rusqlite)
}
