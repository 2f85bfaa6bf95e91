// Shared test fixtures: a provisioned on-disk repo and deterministic
// RowSource fakes.

use rusqlite::Connection;
use tabsync_core::errors::FetchError;
use tabsync_core::model::Row;
use tabsync_core_types::SourceKey;
use tabsync_engine::source::{RowSource, TableData};
use tempfile::TempDir;

pub fn setup_test_repo() -> (TempDir, Connection, SourceKey, Vec<String>) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let mut conn = tabsync_store::db::open(&db_path).unwrap();

    tabsync_store::migrations::apply_migrations(&mut conn).unwrap();

    // Provision the snapshot table the way the out-of-scope schema layer
    // would: data columns as TEXT plus the system columns.
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

    let columns = vec!["name".to_string(), "age".to_string()];
    (temp_dir, conn, SourceKey::new("roster"), columns)
}

/// Source that always returns the same fetched state.
pub struct StaticSource {
    pub data: TableData,
}

impl StaticSource {
    pub fn new(columns: &[String], rows: Vec<Row>) -> Self {
        Self {
            data: TableData {
                columns: columns.to_vec(),
                rows,
            },
        }
    }
}

impl RowSource for StaticSource {
    fn fetch(&self, _key: &SourceKey) -> Result<TableData, FetchError> {
        Ok(self.data.clone())
    }
}

/// Source whose backend is always down.
pub struct FailingSource;

impl RowSource for FailingSource {
    fn fetch(&self, _key: &SourceKey) -> Result<TableData, FetchError> {
        Err(FetchError::Unavailable {
            reason: "connection refused".to_string(),
        })
    }
}
