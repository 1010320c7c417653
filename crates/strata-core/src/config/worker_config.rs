use serde::{Deserialize, Serialize};

use super::defaults;

/// Worker offload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker base URLs, tried round-robin. Empty means local-only.
    pub urls: Vec<String>,
    /// Per-attempt timeout (seconds).
    pub timeout_secs: u64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Initial backoff between attempts (milliseconds, doubles each retry).
    pub backoff_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            timeout_secs: defaults::DEFAULT_WORKER_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_WORKER_MAX_RETRIES,
            backoff_ms: defaults::DEFAULT_WORKER_BACKOFF_MS,
        }
    }
}
