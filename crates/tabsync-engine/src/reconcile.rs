//! Reconciliation pass orchestration.
//!
//! ## Pass pipeline (in order):
//! 1. Acquire the key's sync lock (fail fast or bounded wait)
//! 2. Fetch the source's current state (failure aborts, snapshot untouched)
//! 3. Read the active snapshot
//! 4. Empty snapshot → bulk seed at revision 1
//! 5. Otherwise compute the diff; an empty diff short-circuits with no
//!    transaction and no revision bump
//! 6. Non-empty diff → apply at `current_revision + 1`
//! 7. Record the pass in the ledger (only after a successful commit, so a
//!    rolled-back pass leaves no ledger row)
//!
//! The lock is released by guard drop on every exit path.

use crate::coordinator::{SyncCoordinator, DEFAULT_LOCK_WAIT};
use crate::source::RowSource;
use rusqlite::Connection;
use std::time::Duration;
use tabsync_core::diff::compute_diff;
use tabsync_core::errors::Result;
use tabsync_core_types::SourceKey;
use tabsync_store::ledger::{record_pass, PassRecord};
use tabsync_store::snapshot::persist::SEED_REVISION;
use tabsync_store::snapshot::{apply_diff, current_revision, get_snapshot, store_snapshot};
use uuid::Uuid;

/// Options for one reconciliation pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// If true, wait up to `lock_timeout` for an in-flight pass instead of
    /// failing fast on contention
    pub wait_for_lock: bool,
    /// Bounded wait window when `wait_for_lock` is set
    pub lock_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            wait_for_lock: false,
            lock_timeout: DEFAULT_LOCK_WAIT,
        }
    }
}

/// Result of one completed reconciliation pass.
///
/// This is the payload a caller relays to notification listeners; delivery
/// itself is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPassResult {
    /// UUIDv7 identifier of the pass (matches the ledger row)
    pub pass_id: String,
    /// Revision stamped on every entry this pass touched; for a no-op pass,
    /// the snapshot's current revision
    pub revision: i64,
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub unchanged: usize,
    /// True when this pass was the first-reconciliation bulk seed
    pub seeded: bool,
}

/// Run one reconciliation pass for a source key.
///
/// Holds the key's sync lock for the whole pass: within a key, passes are
/// totally ordered by lock acquisition, and pass N+1 cannot begin applying
/// until pass N's transaction committed or rolled back. Distinct keys
/// reconcile fully concurrently.
///
/// ## Errors
///
/// - `LockContention` — another pass holds the key (after the bounded wait,
///   when one was requested); retryable
/// - `SourceFetch` — the fetch collaborator failed; snapshot untouched
/// - `InvalidInput` — the fetched header list violates the inbound contract
/// - `NotFound` / `SchemaMismatch` — snapshot table missing or drifted
/// - `Transaction` — the apply/seed commit failed; snapshot untouched
pub fn run_sync_pass(
    conn: &mut Connection,
    coordinator: &SyncCoordinator,
    source: &dyn RowSource,
    key: &SourceKey,
    options: &SyncOptions,
) -> Result<SyncPassResult> {
    let started_at = chrono::Utc::now().timestamp_millis();

    let _guard = if options.wait_for_lock {
        coordinator.acquire_with_wait(key, options.lock_timeout)?
    } else {
        coordinator.acquire(key)?
    };

    let data = source.fetch(key)?;
    data.validate()?;

    let snapshot = get_snapshot(conn, key, &data.columns)?;

    let pass_id = Uuid::now_v7().to_string();
    let result = if snapshot.is_empty() {
        let outcome = store_snapshot(conn, key, &data.columns, &data.rows)?;
        SyncPassResult {
            pass_id: pass_id.clone(),
            revision: SEED_REVISION,
            inserted: outcome.inserted,
            updated: 0,
            deleted: 0,
            skipped: outcome.skipped,
            unchanged: 0,
            seeded: true,
        }
    } else {
        let diff = compute_diff(&data.rows, &snapshot, &data.columns);

        if diff.is_empty() {
            tracing::debug!(source_key = %key, unchanged = diff.unchanged, "No changes");
            SyncPassResult {
                pass_id: pass_id.clone(),
                revision: current_revision(conn, key)?,
                inserted: 0,
                updated: 0,
                deleted: 0,
                skipped: 0,
                unchanged: diff.unchanged,
                seeded: false,
            }
        } else {
            let revision = current_revision(conn, key)? + 1;
            let now_ms = chrono::Utc::now().timestamp_millis();
            let outcome = apply_diff(conn, key, &data.columns, &diff, revision, now_ms)?;
            SyncPassResult {
                pass_id: pass_id.clone(),
                revision,
                inserted: outcome.inserted,
                updated: outcome.updated,
                deleted: outcome.deleted,
                skipped: outcome.skipped,
                unchanged: diff.unchanged,
                seeded: false,
            }
        }
    };

    let finished_at = chrono::Utc::now().timestamp_millis();
    record_pass(
        conn,
        &PassRecord {
            pass_id,
            source_key: key.as_str().to_string(),
            revision: result.revision,
            inserted: result.inserted,
            updated: result.updated,
            deleted: result.deleted,
            skipped: result.skipped,
            unchanged: result.unchanged,
            seeded: result.seeded,
            started_at,
            finished_at,
        },
    )?;

    tracing::info!(
        source_key = %key,
        revision = result.revision,
        inserted = result.inserted,
        updated = result.updated,
        deleted = result.deleted,
        skipped = result.skipped,
        unchanged = result.unchanged,
        seeded = result.seeded,
        "Reconciliation pass complete"
    );

    Ok(result)
}
