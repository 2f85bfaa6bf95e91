//! Migrations framework
//!
//! Embedded SQL migrations with checksums and idempotent application.
//! Migrations cover this crate's own bookkeeping tables (the pass ledger);
//! per-source snapshot tables are provisioned externally and never migrated
//! here.

pub mod checksums;
pub mod embedded;
pub mod runner;

pub use runner::apply_migrations;
