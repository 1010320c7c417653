use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::RunId;

/// Structured events written to the trace sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventType {
    MemoryLayerQuery,
    ContextAdmission,
    MemoryPromotion,
    MemoryDemotion,
    MemoryArchival,
    MemoryRefinement,
    GraphRerank,
    MaintenanceSummary,
    MemoryConflictDetected,
    DuplicateCapsuleDetected,
    MemoryUsefulnessUpdate,
    WorkerDispatch,
}

impl TraceEventType {
    /// Events shown in a run's memory trace.
    pub const MEMORY_EVENTS: [TraceEventType; 11] = [
        TraceEventType::MemoryLayerQuery,
        TraceEventType::ContextAdmission,
        TraceEventType::MemoryPromotion,
        TraceEventType::MemoryDemotion,
        TraceEventType::MemoryArchival,
        TraceEventType::MemoryRefinement,
        TraceEventType::GraphRerank,
        TraceEventType::MaintenanceSummary,
        TraceEventType::MemoryConflictDetected,
        TraceEventType::DuplicateCapsuleDetected,
        TraceEventType::MemoryUsefulnessUpdate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TraceEventType::MemoryLayerQuery => "memory_layer_query",
            TraceEventType::ContextAdmission => "context_admission",
            TraceEventType::MemoryPromotion => "memory_promotion",
            TraceEventType::MemoryDemotion => "memory_demotion",
            TraceEventType::MemoryArchival => "memory_archival",
            TraceEventType::MemoryRefinement => "memory_refinement",
            TraceEventType::GraphRerank => "graph_rerank",
            TraceEventType::MaintenanceSummary => "maintenance_summary",
            TraceEventType::MemoryConflictDetected => "memory_conflict_detected",
            TraceEventType::DuplicateCapsuleDetected => "duplicate_capsule_detected",
            TraceEventType::MemoryUsefulnessUpdate => "memory_usefulness_update",
            TraceEventType::WorkerDispatch => "worker_dispatch",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::MEMORY_EVENTS
            .into_iter()
            .chain(std::iter::once(TraceEventType::WorkerDispatch))
            .find(|e| e.as_str() == s)
    }

    pub fn is_memory_event(self) -> bool {
        Self::MEMORY_EVENTS.contains(&self)
    }
}

impl fmt::Display for TraceEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event waiting to be appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTraceEvent {
    pub run_id: Option<RunId>,
    pub event_type: TraceEventType,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub id: i64,
    pub run_id: Option<RunId>,
    pub event_type: TraceEventType,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
