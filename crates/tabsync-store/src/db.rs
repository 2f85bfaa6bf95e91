//! Database connection management
//!
//! Opens and configures the SQLite connection shared by the snapshot tables
//! and the sync pass ledger.

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply connection pragmas: WAL journaling and busy timeout.
///
/// Reconciliation passes hold short write transactions; WAL keeps concurrent
/// readers of other source tables unblocked while one pass commits.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(from_rusqlite)?;

    conn.pragma_update(None, "busy_timeout", 5_000)
        .map_err(from_rusqlite)?;

    Ok(())
}
