//! WorkerDispatcher: records every dispatch and turns any transport failure
//! into a `fallback_local` outcome.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use strata_core::errors::{StrataError, StrataResult, WorkerError};
use strata_core::models::{DispatchOutcome, DispatchStatus, TraceEventType, WorkerRequest};
use strata_core::traits::{IJobStorage, IWorkerTransport};
use strata_observability::tracing_setup::events;
use strata_observability::TraceRecorder;

pub struct WorkerDispatcher {
    transport: Arc<dyn IWorkerTransport>,
    jobs: Arc<dyn IJobStorage>,
    recorder: Option<TraceRecorder>,
}

impl WorkerDispatcher {
    pub fn new(transport: Arc<dyn IWorkerTransport>, jobs: Arc<dyn IJobStorage>) -> Self {
        Self {
            transport,
            jobs,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: TraceRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.transport.worker_count()
    }

    /// Hand a job to the transport. Only storage errors are returned as
    /// `Err`; worker problems come back as a non-`Done` outcome and the
    /// caller must run the job itself.
    pub fn dispatch(
        &self,
        job_type: &str,
        payload: serde_json::Value,
        priority: u8,
    ) -> StrataResult<DispatchOutcome> {
        let request = WorkerRequest {
            job_type: job_type.to_string(),
            payload,
            priority,
        };
        let mut job = self.jobs.insert_worker_job(&request)?;

        match self.transport.execute(&request) {
            Ok(result) => {
                job.status = DispatchStatus::Done;
                job.result = Some(result);
            }
            Err(StrataError::WorkerError(WorkerError::Rejected { status, body })) => {
                job.status = DispatchStatus::Failed;
                job.used_fallback_local = true;
                job.error = Some(format!("http {status}: {body}"));
            }
            Err(e) => {
                job.status = DispatchStatus::FallbackLocal;
                job.used_fallback_local = true;
                job.result = Some(json!({ "mode": "local" }));
                job.error = Some(e.to_string());
            }
        }
        job.finished_at = Some(Utc::now());
        self.jobs.finish_worker_job(&job)?;

        if job.used_fallback_local {
            events::worker_fallback(job_type, job.error.as_deref().unwrap_or("unknown"));
        } else {
            tracing::info!(job_id = job.id, job_type, "job executed by worker");
        }
        if let Some(recorder) = &self.recorder {
            recorder.record(
                request.payload.get("run_id").and_then(|v| v.as_i64()),
                TraceEventType::WorkerDispatch,
                json!({
                    "job_id": job.id,
                    "job_type": job_type,
                    "transport": self.transport.name(),
                    "status": job.status.as_str(),
                    "used_fallback_local": job.used_fallback_local,
                    "error": job.error,
                }),
            );
        }

        Ok(DispatchOutcome {
            status: job.status,
            result: job.result,
            used_fallback_local: job.used_fallback_local,
            error: job.error,
            job_id: Some(job.id),
        })
    }
}
