use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider: "hashing" (offline, deterministic) or "ollama" (HTTP).
    pub provider: String,
    /// Output dimensionality.
    pub dimensions: usize,
    /// Model name sent to HTTP providers.
    pub model: String,
    /// Base URL of the HTTP provider.
    pub endpoint: String,
    /// HTTP request timeout (seconds).
    pub timeout_secs: u64,
    /// Number of query embeddings kept in memory.
    pub query_cache_capacity: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            endpoint: defaults::DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            timeout_secs: defaults::DEFAULT_EMBEDDING_TIMEOUT_SECS,
            query_cache_capacity: defaults::DEFAULT_QUERY_CACHE_CAPACITY,
        }
    }
}
