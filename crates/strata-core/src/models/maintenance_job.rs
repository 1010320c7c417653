use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::RunId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Done,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "done" => JobStatus::Done,
            "cancelled" => JobStatus::Cancelled,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Running,
        }
    }
}

/// Tally of what one sweep changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceDetails {
    pub scanned: usize,
    pub promoted: usize,
    pub demoted: usize,
    pub archived: usize,
    pub refined: usize,
    pub duplicates: usize,
    pub weak_edges_pruned: usize,
    pub conflicts_detected: usize,
    pub errors: usize,
    /// Dispatch status reported by the worker transport, if delegation was tried.
    pub worker_status: Option<String>,
}

/// Bookkeeping for one maintenance run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMaintenanceJob {
    pub id: i64,
    pub run_id: Option<RunId>,
    pub job_type: String,
    pub status: JobStatus,
    pub used_worker: bool,
    pub details: MaintenanceDetails,
    /// Last per-capsule failure, if any.
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}
