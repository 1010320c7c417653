//! MemoryRuntime: owns the store and all engines.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use strata_core::capsule::{Capsule, CapsuleId, RunId};
use strata_core::config::StrataConfig;
use strata_core::constants::MAX_CONFLICT_LISTING;
use strata_core::errors::{StrataError, StrataResult};
use strata_core::models::{
    ContextActivation, DuplicateCluster, MemoryConflict, MemoryEdge, MemoryMaintenanceJob,
    MemoryUsefulnessMetric, TraceEvent, TraceEventType, WorkerNode,
};
use strata_core::traits::{
    IActivationStorage, ICapsuleStorage, IEdgeStorage, IEmbeddingProvider, ITraceSink,
    IWorkerTransport,
};
use strata_embeddings::EmbeddingEngine;
use strata_graph::GraphEngine;
use strata_ingest::{IngestEngine, IngestOutcome, IngestRequest};
use strata_maintenance::{
    CancellationToken, MaintenanceEngine, MaintenanceSchedule, RefinementOutcome, Transition,
};
use strata_observability::tracing_setup::init_tracing;
use strata_observability::{HealthReporter, MemoryHealthReport, TraceRecorder};
use strata_retrieval::{
    CapsuleMatch, FeedbackRecorder, FeedbackRequest, RetrievalEngine, RetrievedItem, SearchRequest,
};
use strata_scoring::ScoringEngine;
use strata_storage::StorageEngine;
use strata_validation::ValidationEngine;
use strata_workers::{transport_from_config, WorkerDispatcher, WorkerRegistry};

use crate::views::{CapsuleDetail, Lineage};

/// Maintenance jobs included in a health report.
const HEALTH_RECENT_JOBS: usize = 10;

/// Options for building a runtime.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// SQLite database path. Overrides `storage.db_path`.
    pub db_path: Option<PathBuf>,
    /// TOML configuration. If None, uses defaults.
    pub config_toml: Option<String>,
    /// Apply `STRATA_*` environment overrides on top of the TOML.
    pub env_overrides: bool,
    /// Open `storage.db_path` when no explicit path is given. Otherwise the
    /// store is in-memory.
    pub persist: bool,
}

/// The memory subsystem facade. Every operation is synchronous and safe to
/// call from several threads.
pub struct MemoryRuntime {
    config: StrataConfig,
    store: Arc<StorageEngine>,
    ingest: IngestEngine,
    retrieval: RetrievalEngine,
    feedback: FeedbackRecorder,
    graph: Arc<GraphEngine>,
    validation: Arc<ValidationEngine>,
    maintenance: MaintenanceEngine,
    registry: WorkerRegistry,
    schedule: Mutex<MaintenanceSchedule>,
}

impl MemoryRuntime {
    /// Build from options: parse config, open the store, create the
    /// configured embedding provider and worker transport.
    pub fn new(opts: RuntimeOptions) -> StrataResult<Self> {
        let mut config = match &opts.config_toml {
            Some(toml_str) => StrataConfig::from_toml(toml_str)?,
            None => StrataConfig::default(),
        };
        if opts.env_overrides {
            config.apply_env_overrides();
        }
        init_tracing(&config.observability);

        let db_path = opts
            .db_path
            .clone()
            .or_else(|| opts.persist.then(|| PathBuf::from(&config.storage.db_path)));
        let store = match &db_path {
            Some(path) => StorageEngine::open_with(path, &config.storage)?,
            None => StorageEngine::open_in_memory()?,
        };
        let embedder = EmbeddingEngine::new(&config.embedding)?;
        let transport = transport_from_config(&config.workers)?;

        Ok(Self::with_components(config, Arc::new(store), Arc::new(embedder), transport))
    }

    /// Wire the engines around an existing store, embedder and transport.
    pub fn with_components(
        config: StrataConfig,
        store: Arc<StorageEngine>,
        embedder: Arc<dyn IEmbeddingProvider>,
        transport: Arc<dyn IWorkerTransport>,
    ) -> Self {
        let recorder = TraceRecorder::new(store.clone());

        let graph = Arc::new(GraphEngine::new(store.clone(), store.clone(), config.graph.clone()));
        let validation = Arc::new(
            ValidationEngine::new(store.clone(), store.clone(), config.validation.clone())
                .with_recorder(recorder.clone()),
        );
        let ingest = IngestEngine::new(store.clone(), embedder.clone(), config.ingest.clone());
        let retrieval = RetrievalEngine::new(
            store.clone(),
            store.clone(),
            embedder.clone(),
            ScoringEngine::new(config.scoring.clone()),
            graph.clone(),
            config.admission.clone(),
            recorder.clone(),
        );
        let feedback = FeedbackRecorder::new(store.clone(), store.clone(), recorder.clone());
        let dispatcher =
            WorkerDispatcher::new(transport, store.clone()).with_recorder(recorder.clone());
        let maintenance = MaintenanceEngine::new(
            store.clone(),
            embedder,
            graph.clone(),
            validation.clone(),
            recorder,
            config.maintenance.clone(),
        )
        .with_dispatcher(Arc::new(dispatcher));
        let registry = WorkerRegistry::new(store.clone());
        let schedule = Mutex::new(MaintenanceSchedule::new(config.maintenance.interval_secs));

        Self {
            config,
            store,
            ingest,
            retrieval,
            feedback,
            graph,
            validation,
            maintenance,
            registry,
            schedule,
        }
    }

    pub fn config(&self) -> &StrataConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<StorageEngine> {
        &self.store
    }

    // ── Query API ────────────────────────────────────────────────────────

    /// Chunk, embed and store a document, then place every new capsule in
    /// its duplicate cluster.
    pub fn ingest(&self, request: &IngestRequest) -> StrataResult<IngestOutcome> {
        let outcome = self.ingest.ingest(request)?;
        for capsule in self.store.get_capsules(&outcome.capsule_ids)? {
            if let Err(e) = self.validation.assign_duplicate(&capsule) {
                tracing::warn!(capsule_id = capsule.id, error = %e, "duplicate assignment failed");
            }
        }
        Ok(outcome)
    }

    pub fn search(&self, request: &SearchRequest) -> StrataResult<Vec<RetrievedItem>> {
        self.retrieval.search(request)
    }

    /// Cosine-only ranking. Writes nothing.
    pub fn search_capsules(
        &self,
        query: &str,
        run_id: Option<RunId>,
        limit: usize,
    ) -> StrataResult<Vec<CapsuleMatch>> {
        self.retrieval.search_capsules(query, run_id, limit)
    }

    pub fn record_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> StrataResult<Vec<MemoryUsefulnessMetric>> {
        self.feedback.record(request)
    }

    pub fn promote(&self, id: CapsuleId) -> StrataResult<Option<Transition>> {
        self.maintenance.promote(id)
    }

    pub fn demote(&self, id: CapsuleId) -> StrataResult<Option<Transition>> {
        self.maintenance.demote(id)
    }

    pub fn refine(&self, id: CapsuleId) -> StrataResult<Option<RefinementOutcome>> {
        self.maintenance.refine(id)
    }

    pub fn run_maintenance(
        &self,
        run_id: Option<RunId>,
        try_worker: bool,
    ) -> StrataResult<MemoryMaintenanceJob> {
        self.run_maintenance_with(run_id, try_worker, &CancellationToken::new())
    }

    /// Like [`run_maintenance`](Self::run_maintenance) with a caller-held
    /// cancellation token.
    pub fn run_maintenance_with(
        &self,
        run_id: Option<RunId>,
        try_worker: bool,
        cancel: &CancellationToken,
    ) -> StrataResult<MemoryMaintenanceJob> {
        let job = self.maintenance.run_maintenance(run_id, try_worker, cancel)?;
        self.schedule_guard().mark_run(job.started_at);
        Ok(job)
    }

    /// Run a store-wide sweep if the schedule interval has elapsed.
    pub fn run_maintenance_if_due(
        &self,
        now: DateTime<Utc>,
    ) -> StrataResult<Option<MemoryMaintenanceJob>> {
        {
            let mut schedule = self.schedule_guard();
            if !schedule.is_due(now) {
                return Ok(None);
            }
            schedule.mark_run(now);
        }
        self.maintenance
            .run_maintenance(None, true, &CancellationToken::new())
            .map(Some)
    }

    fn schedule_guard(&self) -> std::sync::MutexGuard<'_, MaintenanceSchedule> {
        self.schedule.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Inspection ───────────────────────────────────────────────────────

    pub fn capsule_detail(&self, id: CapsuleId) -> StrataResult<CapsuleDetail> {
        let capsule = self.load(id)?;
        Ok(CapsuleDetail {
            state: self.store.get_state(id)?,
            children: self.store.children_of(id)?,
            edges: self.store.edges_for(id)?,
            summary: self.store.summary_for(id)?,
            capsule,
        })
    }

    /// The lineage `id` belongs to, starting from its root.
    pub fn lineage(&self, id: CapsuleId) -> StrataResult<Lineage> {
        let capsule = self.load(id)?;
        let root_id = capsule.lineage_root();
        let root = if root_id == id { capsule } else { self.load(root_id)? };
        Ok(Lineage {
            members: self.store.lineage_members(root_id)?,
            root,
        })
    }

    /// Incident edges, heaviest first.
    pub fn neighbors(&self, id: CapsuleId) -> StrataResult<Vec<MemoryEdge>> {
        self.load(id)?;
        self.graph.neighbors(id)
    }

    /// Context activations for a run, most recent first.
    pub fn run_contexts(
        &self,
        run_id: RunId,
        limit: usize,
    ) -> StrataResult<Vec<ContextActivation>> {
        self.store.activations_for_run(run_id, limit)
    }

    /// Memory events traced for a run, oldest first.
    pub fn memory_trace(&self, run_id: RunId, limit: usize) -> StrataResult<Vec<TraceEvent>> {
        let events = self.store.events_for_run(run_id, limit)?;
        Ok(events
            .into_iter()
            .filter(|e| TraceEventType::MEMORY_EVENTS.contains(&e.event_type))
            .collect())
    }

    pub fn health(&self) -> StrataResult<MemoryHealthReport> {
        HealthReporter::collect(self.store.as_ref(), HEALTH_RECENT_JOBS)
    }

    pub fn conflicts(&self, limit: usize) -> StrataResult<Vec<MemoryConflict>> {
        self.validation.list_conflicts(limit.min(MAX_CONFLICT_LISTING))
    }

    pub fn duplicates(&self) -> StrataResult<Vec<DuplicateCluster>> {
        self.validation.list_duplicates()
    }

    /// Recompute duplicate clusters over recent capsules. Returns the number
    /// of capsules in multi-member clusters.
    pub fn refresh_duplicates(&self) -> StrataResult<usize> {
        self.validation.refresh_duplicates()
    }

    // ── Workers ──────────────────────────────────────────────────────────

    pub fn register_worker(
        &self,
        name: &str,
        url: &str,
        capabilities: &[String],
    ) -> StrataResult<WorkerNode> {
        self.registry.register(name, url, capabilities)
    }

    pub fn list_workers(&self) -> StrataResult<Vec<WorkerNode>> {
        self.registry.list()
    }

    fn load(&self, id: CapsuleId) -> StrataResult<Capsule> {
        self.store
            .get_capsule(id)?
            .ok_or(StrataError::CapsuleNotFound { id })
    }
}
