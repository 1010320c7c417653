//! Single write connection behind a mutex. All writes are serialized here,
//! which is what makes per-capsule counter updates safe.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use strata_core::errors::{StorageError, StrataResult};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> StrataResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> StrataResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> StrataResult<T>
    where
        F: FnOnce(&Connection) -> StrataResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| StorageError::LockPoisoned {
            details: e.to_string(),
        })?;
        f(&guard)
    }
}
