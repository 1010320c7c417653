//! MaintenanceEngine: single-flight lifecycle sweep with worker delegation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use strata_core::capsule::{Capsule, CapsuleId, RunId};
use strata_core::config::MaintenanceConfig;
use strata_core::constants::{MAINTENANCE_JOB_PRIORITY, MAINTENANCE_JOB_TYPE};
use strata_core::errors::{EmbeddingError, MaintenanceError, StrataError, StrataResult};
use strata_core::models::{
    DispatchStatus, JobStatus, MaintenanceDetails, MemoryMaintenanceJob, MemorySummary,
    TraceEventType,
};
use strata_core::traits::{IEmbeddingProvider, IMemoryStore};
use strata_graph::GraphEngine;
use strata_observability::maintenance_span;
use strata_observability::tracing_setup::events;
use strata_observability::TraceRecorder;
use strata_validation::ValidationEngine;
use strata_workers::WorkerDispatcher;

use crate::cancellation::CancellationToken;
use crate::refinement::{self, RefinementOutcome};
use crate::transitions::{self, Transition, TransitionKind};
use crate::utility::utility;

pub struct MaintenanceEngine {
    store: Arc<dyn IMemoryStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    graph: Arc<GraphEngine>,
    validation: Arc<ValidationEngine>,
    dispatcher: Option<Arc<WorkerDispatcher>>,
    recorder: TraceRecorder,
    config: MaintenanceConfig,
    /// Guard: only one sweep can run at a time.
    is_running: Arc<AtomicBool>,
}

impl MaintenanceEngine {
    pub fn new(
        store: Arc<dyn IMemoryStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        graph: Arc<GraphEngine>,
        validation: Arc<ValidationEngine>,
        recorder: TraceRecorder,
        config: MaintenanceConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            graph,
            validation,
            dispatcher: None,
            recorder,
            config,
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<WorkerDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn config(&self) -> &MaintenanceConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Move a capsule one tier hotter. `None` if it is already `L0_HOT`.
    pub fn promote(&self, id: CapsuleId) -> StrataResult<Option<Transition>> {
        self.manual(id, TransitionKind::Promote)
    }

    /// Move a capsule one tier colder. `None` if it is already `L5_COLD`.
    pub fn demote(&self, id: CapsuleId) -> StrataResult<Option<Transition>> {
        self.manual(id, TransitionKind::Demote)
    }

    fn manual(&self, id: CapsuleId, kind: TransitionKind) -> StrataResult<Option<Transition>> {
        let capsule = self.load(id)?;
        let Some(transition) = transitions::manual(&capsule, kind) else {
            tracing::debug!(
                capsule_id = id,
                layer = %capsule.layer,
                kind = kind.as_str(),
                "no tier to move to"
            );
            return Ok(None);
        };
        self.apply(&capsule, &transition)?;
        Ok(Some(transition))
    }

    /// Refine on demand. `None` when the capsule is not eligible, was
    /// already refined, or does not split into at least two sentences.
    pub fn refine(&self, id: CapsuleId) -> StrataResult<Option<RefinementOutcome>> {
        let capsule = self.load(id)?;
        self.check_lineage(&capsule)?;
        if !refinement::is_refinable(&capsule, &self.config) {
            return Ok(None);
        }
        if !self.store.children_of(id)?.is_empty() {
            tracing::debug!(capsule_id = id, "already refined");
            return Ok(None);
        }
        self.refine_capsule(&capsule)
    }

    /// Run one sweep. With `try_worker` the sweep is first offered to the
    /// worker pool; anything but a `done` dispatch runs it here. A concurrent
    /// call fails with [`MaintenanceError::AlreadyRunning`].
    pub fn run_maintenance(
        &self,
        run_id: Option<RunId>,
        try_worker: bool,
        cancel: &CancellationToken,
    ) -> StrataResult<MemoryMaintenanceJob> {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MaintenanceError::AlreadyRunning.into());
        }

        let result = self.sweep(run_id, try_worker, cancel);

        self.is_running.store(false, Ordering::SeqCst);
        result
    }

    fn sweep(
        &self,
        run_id: Option<RunId>,
        try_worker: bool,
        cancel: &CancellationToken,
    ) -> StrataResult<MemoryMaintenanceJob> {
        let span = maintenance_span!(run_id);
        let _guard = span.enter();

        let mut job = self.store.create_maintenance_job(run_id, MAINTENANCE_JOB_TYPE)?;

        let delegated = match (try_worker, &self.dispatcher) {
            (true, Some(dispatcher)) => {
                let status = match dispatcher.dispatch(
                    MAINTENANCE_JOB_TYPE,
                    json!({ "run_id": run_id, "job_id": job.id }),
                    MAINTENANCE_JOB_PRIORITY,
                ) {
                    Ok(outcome) => outcome.status,
                    Err(e) => {
                        tracing::warn!(job_id = job.id, error = %e, "worker dispatch failed");
                        DispatchStatus::FallbackLocal
                    }
                };
                job.details.worker_status = Some(status.as_str().to_string());
                status == DispatchStatus::Done
            }
            _ => false,
        };

        if delegated {
            job.used_worker = true;
            job.status = JobStatus::Done;
        } else if let Err(e) = self.sweep_locally(&mut job, run_id, cancel) {
            job.status = JobStatus::Failed;
            job.error = Some(e.to_string());
            job.finished_at = Some(Utc::now());
            self.store.finish_maintenance_job(&job)?;
            events::maintenance_finished(
                job.id,
                job.status.as_str(),
                job.details.scanned,
                job.details.errors,
            );
            return Err(e);
        }

        job.finished_at = Some(Utc::now());
        self.store.finish_maintenance_job(&job)?;
        events::maintenance_finished(
            job.id,
            job.status.as_str(),
            job.details.scanned,
            job.details.errors,
        );
        self.recorder.record(
            run_id,
            TraceEventType::MaintenanceSummary,
            json!({
                "job_id": job.id,
                "status": job.status.as_str(),
                "used_worker": job.used_worker,
                "details": job.details,
                "error": job.error,
            }),
        );
        Ok(job)
    }

    /// Per-capsule failures are counted and logged; only the initial listing
    /// aborts the sweep.
    fn sweep_locally(
        &self,
        job: &mut MemoryMaintenanceJob,
        run_id: Option<RunId>,
        cancel: &CancellationToken,
    ) -> StrataResult<()> {
        let capsules = self.store.list_capsules(run_id, true)?;
        let now = Utc::now();

        for capsule in &capsules {
            if cancel.is_cancelled() {
                tracing::info!(
                    job_id = job.id,
                    scanned = job.details.scanned,
                    "maintenance cancelled"
                );
                job.status = JobStatus::Cancelled;
                return Ok(());
            }
            job.details.scanned += 1;
            if let Err(e) = self.maintain_capsule(capsule, &mut job.details, now) {
                tracing::warn!(
                    capsule_id = capsule.id,
                    error = %e,
                    "maintenance failed on capsule"
                );
                job.details.errors += 1;
                job.error = Some(e.to_string());
            }
        }

        match self.validation.refresh_duplicates() {
            Ok(n) => job.details.duplicates = n,
            Err(e) => Self::note_step_error(job, "duplicate refresh", e),
        }
        match self.graph.prune() {
            Ok(n) => job.details.weak_edges_pruned = n,
            Err(e) => Self::note_step_error(job, "edge pruning", e),
        }
        if let Some(run_id) = run_id {
            match self.validation.detect_conflicts(run_id) {
                Ok(conflicts) => job.details.conflicts_detected = conflicts.len(),
                Err(e) => Self::note_step_error(job, "conflict detection", e),
            }
        }
        job.status = JobStatus::Done;
        Ok(())
    }

    fn note_step_error(job: &mut MemoryMaintenanceJob, step: &str, e: StrataError) {
        tracing::warn!(step, error = %e, "maintenance step failed");
        job.details.errors += 1;
        job.error = Some(format!("{step}: {e}"));
    }

    fn maintain_capsule(
        &self,
        capsule: &Capsule,
        details: &mut MaintenanceDetails,
        now: DateTime<Utc>,
    ) -> StrataResult<()> {
        self.check_lineage(capsule)?;

        let score = utility(capsule);
        if let Some(transition) = transitions::plan(capsule, score, &self.config, now) {
            self.apply(capsule, &transition)?;
            match transition.kind {
                TransitionKind::Promote => details.promoted += 1,
                TransitionKind::Demote => details.demoted += 1,
                TransitionKind::Archive => details.archived += 1,
            }
        }

        if refinement::is_sweep_refinable(capsule, &self.config)
            && self.store.children_of(capsule.id)?.is_empty()
            && self.refine_capsule(capsule)?.is_some()
        {
            details.refined += 1;
        }
        Ok(())
    }

    fn apply(&self, capsule: &Capsule, transition: &Transition) -> StrataResult<()> {
        self.store
            .set_layer(transition.capsule_id, transition.to, transition.archive_status())?;
        events::capsule_transitioned(
            transition.capsule_id,
            transition.from,
            transition.to,
            transition.kind.as_str(),
        );
        self.recorder.record(
            Some(capsule.run_id),
            transition.kind.trace_event(),
            json!({
                "capsule_id": transition.capsule_id,
                "from": transition.from.as_str(),
                "to": transition.to.as_str(),
                "kind": transition.kind.as_str(),
                "utility": transition.utility,
                "archive_status": transition.archive_status().as_str(),
            }),
        );
        Ok(())
    }

    fn refine_capsule(&self, capsule: &Capsule) -> StrataResult<Option<RefinementOutcome>> {
        let Some(plan) = refinement::plan(capsule, &self.config) else {
            tracing::debug!(capsule_id = capsule.id, "too few sentences to refine");
            return Ok(None);
        };
        let rows = plan.into_rows();
        let texts: Vec<String> = rows.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::BatchMismatch {
                sent: texts.len(),
                received: vectors.len(),
            }
            .into());
        }

        let rows: Vec<_> = rows.into_iter().zip(vectors).collect();
        let model = format!("{}-{}", self.embedder.name(), self.embedder.dimensions());
        let mut ids = self.store.insert_capsules(&rows, &model)?;
        let Some(summary_id) = ids.pop() else {
            return Err(MaintenanceError::RefinementFailed {
                id: capsule.id,
                reason: "store returned no ids".to_string(),
            }
            .into());
        };
        let child_ids = ids;

        self.store.insert_summary(&MemorySummary {
            id: 0,
            capsule_id: capsule.id,
            summary_capsule_id: summary_id,
            child_ids: child_ids.clone(),
            created_at: Utc::now(),
        })?;
        for derived in child_ids.iter().chain(std::iter::once(&summary_id)) {
            self.graph.link_refinement(capsule.id, *derived, capsule.trust_score)?;
        }

        self.recorder.record(
            Some(capsule.run_id),
            TraceEventType::MemoryRefinement,
            json!({
                "capsule_id": capsule.id,
                "child_ids": child_ids,
                "summary_id": summary_id,
                "lineage_root_id": capsule.lineage_root(),
                "reason": if capsule.contradiction_flag { "contradiction" } else { "length" },
                "chars": capsule.text.chars().count(),
            }),
        );
        tracing::info!(
            capsule_id = capsule.id,
            children = child_ids.len(),
            summary_id,
            "capsule refined"
        );

        Ok(Some(RefinementOutcome {
            parent_id: capsule.id,
            child_ids,
            summary_id,
        }))
    }

    /// Parent and root pointers must resolve to stored capsules.
    fn check_lineage(&self, capsule: &Capsule) -> StrataResult<()> {
        let pointers = [
            ("parent", capsule.parent_capsule_id),
            ("lineage root", capsule.lineage_root_id),
        ];
        for (label, pointer) in pointers {
            let Some(target) = pointer else { continue };
            if target == capsule.id {
                continue;
            }
            if self.store.get_capsule(target)?.is_none() {
                return Err(MaintenanceError::CorruptLineage {
                    id: capsule.id,
                    reason: format!("{label} {target} does not exist"),
                }
                .into());
            }
        }
        Ok(())
    }

    fn load(&self, id: CapsuleId) -> StrataResult<Capsule> {
        self.store
            .get_capsule(id)?
            .ok_or(StrataError::CapsuleNotFound { id })
    }
}
