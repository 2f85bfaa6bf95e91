//! Snapshot table operations: read, bulk seed, transactional diff apply.

pub mod persist;
pub mod query;

pub use persist::{apply_diff, store_snapshot, ApplyOutcome, SeedOutcome};
pub use query::{current_revision, get_snapshot};
