//! # strata-storage
//!
//! SQLite persistence for capsules, embeddings, the reinforcement graph,
//! conflicts, duplicate clusters, activations, jobs, and the run trace log.
//! One serialized writer plus a round-robin read pool (WAL mode).

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use strata_core::errors::{StorageError, StrataError};

/// Wrap a message as a storage error.
pub(crate) fn to_storage_err(message: String) -> StrataError {
    StrataError::StorageError(StorageError::SqliteError { message })
}
