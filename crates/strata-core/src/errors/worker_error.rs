/// Worker transport errors. Always recovered by running the job locally.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("no worker available: {reason}")]
    Unavailable { reason: String },

    #[error("worker at {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("transport failure: {reason}")]
    Transport { reason: String },

    #[error("worker rejected job with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
