use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job handed to the worker transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    #[serde(rename = "type")]
    pub job_type: String,
    pub payload: serde_json::Value,
    pub priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Queued,
    Done,
    Failed,
    FallbackLocal,
}

impl DispatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchStatus::Queued => "queued",
            DispatchStatus::Done => "done",
            DispatchStatus::Failed => "failed",
            DispatchStatus::FallbackLocal => "fallback_local",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "done" => DispatchStatus::Done,
            "failed" => DispatchStatus::Failed,
            "fallback_local" => DispatchStatus::FallbackLocal,
            _ => DispatchStatus::Queued,
        }
    }
}

/// What the dispatcher tells its caller. Anything other than `Done` means
/// the caller runs the job itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub status: DispatchStatus,
    pub result: Option<serde_json::Value>,
    pub used_fallback_local: bool,
    pub error: Option<String>,
    pub job_id: Option<i64>,
}

/// Persisted record of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerJob {
    pub id: i64,
    pub job_type: String,
    pub payload: serde_json::Value,
    pub priority: u8,
    pub status: DispatchStatus,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub used_fallback_local: bool,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// A registered external worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerNode {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub capabilities: Vec<String>,
    pub registered_at: DateTime<Utc>,
}
