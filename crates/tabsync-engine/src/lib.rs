//! TabSync Engine - Reconciliation orchestration
//!
//! Wires the pure kernel and the store into complete reconciliation passes:
//! - `SyncCoordinator`: advisory per-key mutual exclusion (single process)
//! - `RowSource`: the boundary trait for the external tabular source
//! - `run_sync_pass`: fetch → diff → apply → ledger for one source key
//!
//! Passes for distinct keys run fully concurrently; passes for the same key
//! are totally ordered by lock acquisition.

pub mod coordinator;
pub mod reconcile;
pub mod source;

pub use coordinator::{SyncCoordinator, SyncGuard, DEFAULT_LOCK_WAIT};
pub use reconcile::{run_sync_pass, SyncOptions, SyncPassResult};
pub use source::{RowSource, TableData};
