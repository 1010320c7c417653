use std::sync::Arc;

use strata_core::errors::{StrataError, StrataResult};
use strata_core::models::WorkerNode;
use strata_core::traits::IJobStorage;

/// Registered worker nodes. Registration is bookkeeping only; routing uses
/// the configured transport URLs.
pub struct WorkerRegistry {
    jobs: Arc<dyn IJobStorage>,
}

impl WorkerRegistry {
    pub fn new(jobs: Arc<dyn IJobStorage>) -> Self {
        Self { jobs }
    }

    pub fn register(
        &self,
        name: &str,
        url: &str,
        capabilities: &[String],
    ) -> StrataResult<WorkerNode> {
        let name = name.trim();
        let url = url.trim().trim_end_matches('/');
        if name.is_empty() || url.is_empty() {
            return Err(StrataError::ValidationError {
                reason: "worker name and url are required".to_string(),
            });
        }
        let node = self.jobs.register_worker(name, url, capabilities)?;
        tracing::info!(worker = %node.name, url = %node.url, "worker registered");
        Ok(node)
    }

    /// In registration order.
    pub fn list(&self) -> StrataResult<Vec<WorkerNode>> {
        self.jobs.list_workers()
    }
}
