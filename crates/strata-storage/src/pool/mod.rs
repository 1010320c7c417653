//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use strata_core::errors::StrataResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file. The writer is
    /// opened first so the schema exists before readers attach.
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> StrataResult<Self> {
        let writer = WriteConnection::open(path, busy_timeout_ms)?;
        let readers = ReadPool::open(path, read_pool_size, busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory pool. Readers here are isolated databases, so the
    /// engine routes reads through the writer in this mode.
    pub fn open_in_memory() -> StrataResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: ReadPool::empty(),
            db_path: None,
        })
    }
}
