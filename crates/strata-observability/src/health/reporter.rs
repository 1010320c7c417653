//! Aggregate memory health report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strata_core::capsule::MemoryLayer;
use strata_core::errors::StrataResult;
use strata_core::models::{JobStatus, MemoryMaintenanceJob};
use strata_core::traits::IMemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    /// The most recent maintenance job failed or recorded per-capsule errors.
    Degraded,
}

/// Store-wide counts plus recent maintenance history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryHealthReport {
    pub status: HealthStatus,
    pub total_capsules: usize,
    /// Keyed by layer name, every layer present.
    pub layer_counts: BTreeMap<String, usize>,
    /// `L0_HOT` + `L1_SHORT`.
    pub hot_count: usize,
    /// `L5_COLD`.
    pub cold_count: usize,
    pub conflict_count: usize,
    /// Clusters with more than one member.
    pub duplicate_cluster_count: usize,
    pub edge_count: usize,
    pub runs_with_activations: usize,
    pub recent_jobs: Vec<MemoryMaintenanceJob>,
    pub generated_at: DateTime<Utc>,
}

pub struct HealthReporter;

impl HealthReporter {
    /// Collect a report from the store.
    pub fn collect(
        store: &dyn IMemoryStore,
        recent_jobs: usize,
    ) -> StrataResult<MemoryHealthReport> {
        let counts = store.count_by_layer()?;
        let count_of = |layer: MemoryLayer| {
            counts
                .iter()
                .find(|(l, _)| *l == layer)
                .map(|(_, n)| *n)
                .unwrap_or(0)
        };

        let recent_jobs = store.recent_maintenance_jobs(recent_jobs)?;
        let status = Self::derive_status(&recent_jobs);

        Ok(MemoryHealthReport {
            status,
            total_capsules: counts.iter().map(|(_, n)| n).sum(),
            layer_counts: counts
                .iter()
                .map(|(layer, n)| (layer.as_str().to_string(), *n))
                .collect(),
            hot_count: count_of(MemoryLayer::L0Hot) + count_of(MemoryLayer::L1Short),
            cold_count: count_of(MemoryLayer::L5Cold),
            conflict_count: store.conflict_count()?,
            duplicate_cluster_count: store.list_duplicate_clusters(2)?.len(),
            edge_count: store.edge_count()?,
            runs_with_activations: store.runs_with_activations()?,
            recent_jobs,
            generated_at: Utc::now(),
        })
    }

    fn derive_status(recent_jobs: &[MemoryMaintenanceJob]) -> HealthStatus {
        match recent_jobs.first() {
            Some(job) if job.status == JobStatus::Failed || job.details.errors > 0 => {
                HealthStatus::Degraded
            }
            _ => HealthStatus::Healthy,
        }
    }
}
