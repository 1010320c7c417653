//! In-process trace sink backed by a DashMap keyed by run id.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use strata_core::capsule::RunId;
use strata_core::errors::StrataResult;
use strata_core::models::{NewTraceEvent, TraceEvent};
use strata_core::traits::ITraceSink;

/// Non-persistent trace sink for tests and embedded use.
pub struct InMemoryTraceSink {
    events: DashMap<Option<RunId>, Vec<TraceEvent>>,
    next_id: AtomicI64,
}

impl InMemoryTraceSink {
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Total number of events across all runs.
    pub fn len(&self) -> usize {
        self.events.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTraceSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ITraceSink for InMemoryTraceSink {
    fn append(&self, event: &NewTraceEvent) -> StrataResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.events.entry(event.run_id).or_default().push(TraceEvent {
            id,
            run_id: event.run_id,
            event_type: event.event_type,
            payload: event.payload.clone(),
            created_at: event.created_at,
        });
        Ok(id)
    }

    fn events_for_run(&self, run_id: RunId, limit: usize) -> StrataResult<Vec<TraceEvent>> {
        Ok(self
            .events
            .get(&Some(run_id))
            .map(|events| events.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
