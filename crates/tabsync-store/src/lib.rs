//! TabSync Store - SQLite persistence layer
//!
//! Provides:
//! - Connection helpers and pragmas
//! - Embedded migrations framework (schema_version bookkeeping + checksums)
//! - The snapshot table contract: read, bulk seed, transactional diff apply
//! - The sync pass ledger
//!
//! One physical table per source key holds the user data columns (TEXT) plus
//! the system columns `id`, `content_hash`, `revision`, `source`,
//! `deleted_at`. Provisioning those tables is out of scope; this crate
//! detects schema drift instead of repairing it.

pub mod db;
pub mod errors;
pub mod ledger;
pub mod migrations;
pub mod schema;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use snapshot::{ApplyOutcome, SeedOutcome};
