/// Embedding provider errors. Ingestion and queries fail closed on any of these.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("batch size mismatch: sent {sent} texts, received {received} vectors")]
    BatchMismatch { sent: usize, received: usize },

    #[error("provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },
}
