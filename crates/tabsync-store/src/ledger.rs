//! Sync pass ledger.
//!
//! One row per committed reconciliation pass, keyed by a UUIDv7 pass id the
//! engine generates. The ledger is the audit counterpart to the per-row
//! `revision` stamps: given a revision number, the matching ledger row says
//! when the pass ran and what it changed.

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tabsync_core_types::SourceKey;

/// Ledger record for one committed reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord {
    /// Engine-generated UUIDv7 identifier for the pass
    pub pass_id: String,
    /// Raw source key the pass reconciled
    pub source_key: String,
    /// Revision stamped on every row the pass touched
    pub revision: i64,
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub unchanged: usize,
    /// True when this pass was the first-reconciliation bulk seed
    pub seeded: bool,
    /// Pass start, epoch milliseconds
    pub started_at: i64,
    /// Pass end, epoch milliseconds
    pub finished_at: i64,
}

/// Insert a pass record into the ledger.
pub fn record_pass(conn: &Connection, record: &PassRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO sync_passes (
            pass_id, source_key, revision,
            inserted, updated, deleted, skipped, unchanged,
            seeded, started_at, finished_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            record.pass_id,
            record.source_key,
            record.revision,
            record.inserted as i64,
            record.updated as i64,
            record.deleted as i64,
            record.skipped as i64,
            record.unchanged as i64,
            if record.seeded { 1 } else { 0 },
            record.started_at,
            record.finished_at,
        ],
    )
    .map_err(from_rusqlite)?;

    tracing::debug!(
        pass_id = %record.pass_id,
        source_key = %record.source_key,
        revision = record.revision,
        "Recorded sync pass"
    );

    Ok(())
}

/// List all recorded passes for a source key, oldest first.
pub fn list_passes(conn: &Connection, key: &SourceKey) -> Result<Vec<PassRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT pass_id, source_key, revision,
                    inserted, updated, deleted, skipped, unchanged,
                    seeded, started_at, finished_at
             FROM sync_passes
             WHERE source_key = ?1
             ORDER BY revision, started_at",
        )
        .map_err(from_rusqlite)?;

    let records = stmt
        .query_map([key.as_str()], |row| {
            Ok(PassRecord {
                pass_id: row.get(0)?,
                source_key: row.get(1)?,
                revision: row.get(2)?,
                inserted: row.get::<_, i64>(3)? as usize,
                updated: row.get::<_, i64>(4)? as usize,
                deleted: row.get::<_, i64>(5)? as usize,
                skipped: row.get::<_, i64>(6)? as usize,
                unchanged: row.get::<_, i64>(7)? as usize,
                seeded: row.get::<_, i64>(8)? != 0,
                started_at: row.get(9)?,
                finished_at: row.get(10)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(records)
}
