use crate::errors::StrataResult;
use crate::models::WorkerRequest;

/// Delivers a job to an external worker and returns its JSON result.
///
/// Implementations report "no workers" as `WorkerError::Unavailable`.
/// Callers treat that exactly like a timeout or transport failure.
pub trait IWorkerTransport: Send + Sync {
    fn execute(&self, request: &WorkerRequest) -> StrataResult<serde_json::Value>;

    /// Number of workers this transport can reach.
    fn worker_count(&self) -> usize;

    fn name(&self) -> &str;
}
