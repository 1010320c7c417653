mod config_error;
mod embedding_error;
mod graph_error;
mod maintenance_error;
mod storage_error;
mod worker_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use graph_error::GraphError;
pub use maintenance_error::MaintenanceError;
pub use storage_error::StorageError;
pub use worker_error::WorkerError;

use crate::capsule::CapsuleId;

/// Top-level error type for the Strata engine.
#[derive(Debug, thiserror::Error)]
pub enum StrataError {
    #[error("capsule not found: {id}")]
    CapsuleNotFound { id: CapsuleId },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("worker error: {0}")]
    WorkerError(#[from] WorkerError),

    #[error("maintenance error: {0}")]
    MaintenanceError(#[from] MaintenanceError),

    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("validation error: {reason}")]
    ValidationError { reason: String },
}

impl StrataError {
    /// True for errors the worker dispatcher recovers from by running locally.
    pub fn is_worker_failure(&self) -> bool {
        matches!(self, StrataError::WorkerError(_))
    }
}

/// Convenience alias used throughout the workspace.
pub type StrataResult<T> = Result<T, StrataError>;
