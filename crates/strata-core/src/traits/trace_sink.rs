use crate::capsule::RunId;
use crate::errors::StrataResult;
use crate::models::{NewTraceEvent, TraceEvent};

/// Append-only event log keyed by run id.
pub trait ITraceSink: Send + Sync {
    fn append(&self, event: &NewTraceEvent) -> StrataResult<i64>;

    /// Events for a run, oldest first.
    fn events_for_run(&self, run_id: RunId, limit: usize) -> StrataResult<Vec<TraceEvent>>;
}
