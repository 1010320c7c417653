//! TraceRecorder: writes run trace events to the sink and mirrors them to logs.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use strata_core::capsule::RunId;
use strata_core::errors::StrataResult;
use strata_core::models::{NewTraceEvent, TraceEvent, TraceEventType};
use strata_core::traits::ITraceSink;

/// Records trace events. A failed sink write is logged and swallowed so
/// tracing never fails the operation being traced.
#[derive(Clone)]
pub struct TraceRecorder {
    sink: Arc<dyn ITraceSink>,
}

impl TraceRecorder {
    pub fn new(sink: Arc<dyn ITraceSink>) -> Self {
        Self { sink }
    }

    /// Append one event. Returns its id, or `None` if the sink failed.
    pub fn record(
        &self,
        run_id: Option<RunId>,
        event_type: TraceEventType,
        payload: Value,
    ) -> Option<i64> {
        tracing::info!(
            event = event_type.as_str(),
            run_id = ?run_id,
            "trace event"
        );
        let event = NewTraceEvent {
            run_id,
            event_type,
            payload,
            created_at: Utc::now(),
        };
        match self.sink.append(&event) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    event = event_type.as_str(),
                    error = %e,
                    "failed to persist trace event"
                );
                None
            }
        }
    }

    /// All events for a run, oldest first.
    pub fn events_for_run(&self, run_id: RunId, limit: usize) -> StrataResult<Vec<TraceEvent>> {
        self.sink.events_for_run(run_id, limit)
    }

    /// Events for a run restricted to the memory event allowlist.
    pub fn memory_trace(&self, run_id: RunId, limit: usize) -> StrataResult<Vec<TraceEvent>> {
        Ok(self
            .sink
            .events_for_run(run_id, limit)?
            .into_iter()
            .filter(|e| e.event_type.is_memory_event())
            .collect())
    }
}
