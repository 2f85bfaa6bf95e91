//! Error handling for tabsync-store
//!
//! Wraps the tabsync-core error facility with store-specific constructors.

use tabsync_core::errors::{TsError, TsErrorKind};

/// Result type alias using TsError
pub type Result<T> = std::result::Result<T, TsError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> TsError {
    TsError::new(TsErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a schema-mismatch error naming the columns the physical table lacks
pub fn schema_mismatch(table: &str, missing: &[String]) -> TsError {
    TsError::new(TsErrorKind::SchemaMismatch)
        .with_op("ensure_schema")
        .with_message(format!(
            "Table {} is missing expected columns: {}",
            table,
            missing.join(", ")
        ))
}

/// Create an error for a snapshot table that has not been provisioned
pub fn table_missing(table: &str) -> TsError {
    TsError::new(TsErrorKind::NotFound)
        .with_op("ensure_schema")
        .with_message(format!("Snapshot table {} does not exist", table))
}

/// Create a transaction-boundary error (begin/commit failure)
pub fn transaction_failed(op: &str, err: rusqlite::Error) -> TsError {
    TsError::new(TsErrorKind::Transaction)
        .with_op(op)
        .with_message(err.to_string())
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> TsError {
    TsError::new(TsErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}
