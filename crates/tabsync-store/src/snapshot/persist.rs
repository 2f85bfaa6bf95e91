//! Snapshot write operations: bulk seed and transactional diff application.
//!
//! Both entry points share the same failure contract: schema drift is
//! detected before any mutation, individual row failures are counted as
//! skipped without aborting the batch, and a failure at the transaction
//! boundary rolls everything back and propagates.

use crate::errors::{transaction_failed, Result};
use crate::schema::{ensure_schema, quote_ident, snapshot_table_name};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction};
use serde::{Deserialize, Serialize};
use tabsync_core::diff::RowDiff;
use tabsync_core::hash::hash_row;
use tabsync_core::model::{Row, RowProvenance};
use tabsync_core_types::SourceKey;

/// Revision stamped on every entry created by the first-reconciliation seed.
pub const SEED_REVISION: i64 = 1;

/// Result of a bulk seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOutcome {
    /// Rows inserted as new active entries
    pub inserted: usize,
    /// Rows whose individual insert failed
    pub skipped: usize,
}

/// Result of applying a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// New active entries created
    pub inserted: usize,
    /// Entries rewritten in place
    pub updated: usize,
    /// Entries tombstoned
    pub deleted: usize,
    /// Operations that failed individually or matched no active entry
    pub skipped: usize,
}

/// Build the INSERT statement for one snapshot table.
fn insert_sql(table: &str, columns: &[String]) -> String {
    let mut cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    cols.extend(
        ["content_hash", "revision", "source", "deleted_at"]
            .iter()
            .map(|c| c.to_string()),
    );
    let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        cols.join(", "),
        placeholders.join(", ")
    )
}

/// Parameter vector matching [`insert_sql`]: data values, then hash,
/// revision, provenance, and a NULL tombstone.
fn insert_params(row: &Row, columns: &[String], content_hash: &str, revision: i64) -> Vec<Value> {
    let mut params: Vec<Value> = columns
        .iter()
        .map(|c| Value::from(row.get(c).to_string()))
        .collect();
    params.push(Value::from(content_hash.to_string()));
    params.push(Value::from(revision));
    params.push(Value::from(RowProvenance::Sheet.as_str().to_string()));
    params.push(Value::Null);
    params
}

/// Insert one row, returning false (and logging) on individual failure.
fn try_insert_row(
    tx: &Transaction,
    sql: &str,
    row: &Row,
    columns: &[String],
    content_hash: &str,
    revision: i64,
    position: usize,
) -> bool {
    match tx.execute(sql, params_from_iter(insert_params(row, columns, content_hash, revision))) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(
                position = position,
                error = %e,
                "Row insert failed, skipping"
            );
            false
        }
    }
}

/// Bulk-seed the snapshot for a key's first reconciliation.
///
/// Inserts every row as a new active entry with `revision = 1`,
/// `source = "sheet"`, and a freshly computed content hash. Per-row insert
/// failures are counted as `skipped` and do not abort the remaining
/// insertions: one malformed row should not block the rest of a large sheet
/// from being captured.
///
/// ## Errors
///
/// - `NotFound` / `SchemaMismatch` — table absent or missing columns,
///   detected before any mutation
/// - `Transaction` — the commit itself failed; nothing was persisted
pub fn store_snapshot(
    conn: &mut Connection,
    key: &SourceKey,
    columns: &[String],
    rows: &[Row],
) -> Result<SeedOutcome> {
    let table = snapshot_table_name(key);
    ensure_schema(conn, &table, columns)?;

    let tx = conn
        .transaction()
        .map_err(|e| transaction_failed("store_snapshot", e))?;

    let sql = insert_sql(&table, columns);
    let mut outcome = SeedOutcome::default();

    for (position, row) in rows.iter().enumerate() {
        let content_hash = hash_row(row, columns);
        if try_insert_row(&tx, &sql, row, columns, &content_hash, SEED_REVISION, position) {
            outcome.inserted += 1;
        } else {
            outcome.skipped += 1;
        }
    }

    tx.commit()
        .map_err(|e| transaction_failed("store_snapshot", e))?;

    tracing::debug!(
        source_key = %key,
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        "Seeded snapshot"
    );

    Ok(outcome)
}

/// Apply a computed diff in one all-or-nothing transaction.
///
/// Operations run in the fixed order updates → inserts → deletes; the three
/// sets are disjoint by construction, so the order matters only for
/// determinism. Every touched entry is stamped with `revision` and
/// `source = "sheet"`. Updates and deletes are guarded by
/// `deleted_at IS NULL`: an entry tombstoned since the diff was computed is
/// counted as skipped, not resurrected.
///
/// `now_ms` becomes the `deleted_at` timestamp of every tombstone created by
/// this call.
///
/// ## Errors
///
/// - `NotFound` / `SchemaMismatch` — detected before any mutation
/// - `Transaction` — commit failure; the whole diff rolls back
pub fn apply_diff(
    conn: &mut Connection,
    key: &SourceKey,
    columns: &[String],
    diff: &RowDiff,
    revision: i64,
    now_ms: i64,
) -> Result<ApplyOutcome> {
    let table = snapshot_table_name(key);
    ensure_schema(conn, &table, columns)?;

    let tx = conn
        .transaction()
        .map_err(|e| transaction_failed("apply_diff", e))?;

    let mut outcome = ApplyOutcome::default();

    // Updates
    let set_list: Vec<String> = columns
        .iter()
        .map(|c| format!("{} = ?", quote_ident(c)))
        .collect();
    let update_sql = format!(
        "UPDATE {} SET {}, content_hash = ?, revision = ?, source = ? \
         WHERE id = ? AND deleted_at IS NULL",
        quote_ident(&table),
        set_list.join(", ")
    );
    for op in &diff.updates {
        let mut params: Vec<Value> = columns
            .iter()
            .map(|c| Value::from(op.row.get(c).to_string()))
            .collect();
        params.push(Value::from(op.content_hash.clone()));
        params.push(Value::from(revision));
        params.push(Value::from(RowProvenance::Sheet.as_str().to_string()));
        params.push(Value::from(op.entry_id));

        match tx.execute(&update_sql, params_from_iter(params)) {
            Ok(0) => {
                tracing::warn!(
                    entry_id = op.entry_id,
                    "Update matched no active entry, skipping"
                );
                outcome.skipped += 1;
            }
            Ok(_) => outcome.updated += 1,
            Err(e) => {
                tracing::warn!(entry_id = op.entry_id, error = %e, "Row update failed, skipping");
                outcome.skipped += 1;
            }
        }
    }

    // Inserts
    let sql = insert_sql(&table, columns);
    for op in &diff.inserts {
        if try_insert_row(&tx, &sql, &op.row, columns, &op.content_hash, revision, op.position) {
            outcome.inserted += 1;
        } else {
            outcome.skipped += 1;
        }
    }

    // Deletes: tombstone, never physical removal
    let delete_sql = format!(
        "UPDATE {} SET deleted_at = ?1, revision = ?2 WHERE id = ?3 AND deleted_at IS NULL",
        quote_ident(&table)
    );
    for op in &diff.deletes {
        match tx.execute(&delete_sql, rusqlite::params![now_ms, revision, op.entry_id]) {
            Ok(0) => {
                tracing::warn!(
                    entry_id = op.entry_id,
                    "Delete matched no active entry, skipping"
                );
                outcome.skipped += 1;
            }
            Ok(_) => outcome.deleted += 1,
            Err(e) => {
                tracing::warn!(entry_id = op.entry_id, error = %e, "Row delete failed, skipping");
                outcome.skipped += 1;
            }
        }
    }

    tx.commit()
        .map_err(|e| transaction_failed("apply_diff", e))?;

    tracing::debug!(
        source_key = %key,
        revision = revision,
        inserted = outcome.inserted,
        updated = outcome.updated,
        deleted = outcome.deleted,
        skipped = outcome.skipped,
        "Applied diff"
    );

    Ok(outcome)
}
