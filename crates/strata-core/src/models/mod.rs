//! Records persisted next to capsules: edges, conflicts, duplicate clusters,
//! activations, usefulness metrics, jobs, summaries, trace events, workers.

mod activation;
mod conflict;
mod duplicate;
mod edge;
mod maintenance_job;
mod score_breakdown;
mod summary;
mod trace_event;
mod usefulness;
mod worker;

pub use activation::{AdmissionKind, AdmissionReason, ContextActivation};
pub use conflict::{ConflictStatus, MemoryConflict};
pub use duplicate::DuplicateCluster;
pub use edge::{EdgeReinforcement, EdgeType, MemoryEdge};
pub use maintenance_job::{JobStatus, MaintenanceDetails, MemoryMaintenanceJob};
pub use score_breakdown::{FactorContribution, ScoreBreakdown};
pub use summary::MemorySummary;
pub use trace_event::{NewTraceEvent, TraceEvent, TraceEventType};
pub use usefulness::{FeedbackDelta, MemoryUsefulnessMetric};
pub use worker::{DispatchOutcome, DispatchStatus, WorkerJob, WorkerNode, WorkerRequest};
