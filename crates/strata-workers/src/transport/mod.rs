#[cfg(feature = "http")]
pub mod http;

use std::sync::Arc;

use strata_core::config::WorkerConfig;
use strata_core::errors::{StrataResult, WorkerError};
use strata_core::models::WorkerRequest;
use strata_core::traits::IWorkerTransport;

/// Transport for deployments without workers. Every call is `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWorkers;

impl IWorkerTransport for NoWorkers {
    fn execute(&self, request: &WorkerRequest) -> StrataResult<serde_json::Value> {
        Err(WorkerError::Unavailable {
            reason: format!("no workers configured for {}", request.job_type),
        }
        .into())
    }

    fn worker_count(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// HTTP transport when URLs are configured and the `http` feature is on,
/// otherwise [`NoWorkers`].
pub fn transport_from_config(config: &WorkerConfig) -> StrataResult<Arc<dyn IWorkerTransport>> {
    if config.urls.is_empty() {
        return Ok(Arc::new(NoWorkers));
    }
    #[cfg(feature = "http")]
    {
        Ok(Arc::new(http::HttpWorkerTransport::new(config)?))
    }
    #[cfg(not(feature = "http"))]
    {
        tracing::warn!(
            urls = config.urls.len(),
            "worker URLs configured but the http feature is disabled; running locally"
        );
        Ok(Arc::new(NoWorkers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_workers_is_unavailable() {
        let request = WorkerRequest {
            job_type: "memory_maintenance".to_string(),
            payload: json!({}),
            priority: 4,
        };
        let err = NoWorkers.execute(&request).unwrap_err();
        assert!(err.is_worker_failure());
        assert_eq!(NoWorkers.worker_count(), 0);
    }

    #[test]
    fn empty_config_means_no_workers() {
        let transport = transport_from_config(&WorkerConfig::default()).unwrap();
        assert_eq!(transport.name(), "none");
    }
}
