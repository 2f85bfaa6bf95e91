//! The boundary contract with the external tabular source.
//!
//! Fetching lives outside this workspace (spreadsheet APIs, auth, sessions);
//! the engine only sees the trait below. Implementations return the source's
//! current state as an ordered header list plus rows in source order.

use tabsync_core::errors::{FetchError, Result, TsError, TsErrorKind};
use tabsync_core::model::Row;
use tabsync_core_types::SourceKey;

/// One fetched tabular state: ordered headers plus rows in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    /// Header names; non-empty, unique, order-significant for display only
    pub columns: Vec<String>,
    /// Rows in fetched order; may be empty
    pub rows: Vec<Row>,
}

impl TableData {
    /// Check the inbound contract: at least one column, no duplicates.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` — empty header list or duplicate column name
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(TsError::new(TsErrorKind::InvalidInput)
                .with_op("validate_table_data")
                .with_message("Source returned an empty header list"));
        }

        let mut seen = std::collections::HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(TsError::new(TsErrorKind::InvalidInput)
                    .with_op("validate_table_data")
                    .with_message(format!("Duplicate column name: {}", column)));
            }
        }

        Ok(())
    }
}

/// Source-fetch collaborator.
///
/// Implementations may block on network I/O. A fetch failure aborts the
/// reconciliation pass before any diff or apply step.
pub trait RowSource {
    /// Fetch the source's current tabular state for a key.
    fn fetch(&self, key: &SourceKey) -> std::result::Result<TableData, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_unique_columns() {
        let data = TableData {
            columns: vec!["name".to_string(), "age".to_string()],
            rows: vec![],
        };
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_headers() {
        let data = TableData {
            columns: vec![],
            rows: vec![],
        };
        let err = data.validate().unwrap_err();
        assert_eq!(err.kind(), TsErrorKind::InvalidInput);
    }

    #[test]
    fn test_validate_rejects_duplicate_column() {
        let data = TableData {
            columns: vec!["name".to_string(), "name".to_string()],
            rows: vec![],
        };
        assert!(data.validate().is_err());
    }
}
