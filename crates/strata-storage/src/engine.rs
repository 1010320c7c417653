//! StorageEngine: owns the ConnectionPool and implements every storage trait
//! plus the trace sink.

use std::path::Path;

use chrono::{DateTime, Utc};

use strata_core::capsule::{
    ArchiveStatus, Capsule, CapsuleEmbedding, CapsuleId, MemoryCapsuleState, MemoryLayer,
    NewCapsule, RunId,
};
use strata_core::config::StorageConfig;
use strata_core::errors::StrataResult;
use strata_core::models::{
    ContextActivation, DuplicateCluster, EdgeReinforcement, FeedbackDelta, MemoryConflict,
    MemoryEdge, MemoryMaintenanceJob, MemorySummary, MemoryUsefulnessMetric, NewTraceEvent,
    TraceEvent, WorkerJob, WorkerNode, WorkerRequest,
};
use strata_core::traits::{
    IActivationStorage, ICapsuleStorage, IConflictStorage, IEdgeStorage, IJobStorage, ITraceSink,
};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{
    activation_ops, capsule_crud, capsule_query, conflict_ops, counters, duplicate_ops, edge_ops,
    job_ops, trace_ops,
};

/// The main storage engine.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, reads go to the read pool (file-backed mode).
    /// When false, reads go through the writer, because in-memory read
    /// connections would be isolated databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk with default pool settings.
    pub fn open(path: &Path) -> StrataResult<Self> {
        Self::open_with(path, &StorageConfig::default())
    }

    /// Open a file-backed engine using the given pool settings.
    pub fn open_with(path: &Path, config: &StorageConfig) -> StrataResult<Self> {
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        tracing::debug!(path = %path.display(), "opened file-backed store");
        Ok(engine)
    }

    /// Open an in-memory storage engine.
    pub fn open_in_memory() -> StrataResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations. Idempotent.
    fn initialize(&self) -> StrataResult<()> {
        self.pool.writer.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Current schema version.
    pub fn schema_version(&self) -> StrataResult<u32> {
        self.pool.writer.with_conn(migrations::current_version)
    }

    /// Whether the writer runs in WAL mode. False for in-memory stores.
    pub fn wal_enabled(&self) -> StrataResult<bool> {
        self.pool.writer.with_conn(crate::pool::pragmas::verify_wal_mode)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn with_reader<F, T>(&self, f: F) -> StrataResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> StrataResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

impl ICapsuleStorage for StorageEngine {
    fn insert_capsules(
        &self,
        capsules: &[(NewCapsule, Vec<f32>)],
        model: &str,
    ) -> StrataResult<Vec<CapsuleId>> {
        self.pool
            .writer
            .with_conn(|conn| capsule_crud::insert_capsules(conn, capsules, model))
    }

    fn get_capsule(&self, id: CapsuleId) -> StrataResult<Option<Capsule>> {
        self.with_reader(|conn| capsule_crud::get_capsule(conn, id))
    }

    fn get_capsules(&self, ids: &[CapsuleId]) -> StrataResult<Vec<Capsule>> {
        self.with_reader(|conn| capsule_crud::get_capsules(conn, ids))
    }

    fn list_capsules(
        &self,
        run_id: Option<RunId>,
        include_cold: bool,
    ) -> StrataResult<Vec<Capsule>> {
        self.with_reader(|conn| capsule_query::list_capsules(conn, run_id, include_cold))
    }

    fn recent_capsules(&self, run_id: Option<RunId>, limit: usize) -> StrataResult<Vec<Capsule>> {
        self.with_reader(|conn| capsule_query::recent_capsules(conn, run_id, limit))
    }

    fn candidates(&self, run_id: Option<RunId>) -> StrataResult<Vec<(Capsule, Vec<f32>)>> {
        self.with_reader(|conn| capsule_query::candidates(conn, run_id))
    }

    fn get_embedding(&self, id: CapsuleId) -> StrataResult<Option<CapsuleEmbedding>> {
        self.with_reader(|conn| capsule_crud::get_embedding(conn, id))
    }

    fn get_state(&self, id: CapsuleId) -> StrataResult<Option<MemoryCapsuleState>> {
        self.with_reader(|conn| capsule_crud::get_state(conn, id))
    }

    fn children_of(&self, id: CapsuleId) -> StrataResult<Vec<Capsule>> {
        self.with_reader(|conn| capsule_query::children_of(conn, id))
    }

    fn lineage_members(&self, root_id: CapsuleId) -> StrataResult<Vec<Capsule>> {
        self.with_reader(|conn| capsule_query::lineage_members(conn, root_id))
    }

    fn set_layer(
        &self,
        id: CapsuleId,
        layer: MemoryLayer,
        status: ArchiveStatus,
    ) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| capsule_crud::set_layer(conn, id, layer, status))
    }

    fn set_contradiction_flag(&self, id: CapsuleId, flag: bool) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| capsule_crud::set_contradiction_flag(conn, id, flag))
    }

    fn set_duplicate(
        &self,
        id: CapsuleId,
        cluster_id: i64,
        duplicate_score: f64,
    ) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| capsule_crud::set_duplicate(conn, id, cluster_id, duplicate_score))
    }

    fn record_retrieval(
        &self,
        id: CapsuleId,
        recency_nudge: f64,
        at: DateTime<Utc>,
    ) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| counters::record_retrieval(conn, id, recency_nudge, at))
    }

    fn apply_feedback(
        &self,
        id: CapsuleId,
        delta: &FeedbackDelta,
        at: DateTime<Utc>,
    ) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| counters::apply_feedback(conn, id, delta, at))
    }

    fn count_by_layer(&self) -> StrataResult<Vec<(MemoryLayer, usize)>> {
        self.with_reader(capsule_query::count_by_layer)
    }

    fn capsule_count(&self) -> StrataResult<usize> {
        self.with_reader(capsule_query::capsule_count)
    }
}

impl IActivationStorage for StorageEngine {
    fn insert_activation(&self, activation: &ContextActivation) -> StrataResult<i64> {
        self.pool
            .writer
            .with_conn(|conn| activation_ops::insert_activation(conn, activation))
    }

    fn activations_for_run(
        &self,
        run_id: RunId,
        limit: usize,
    ) -> StrataResult<Vec<ContextActivation>> {
        self.with_reader(|conn| activation_ops::activations_for_run(conn, run_id, limit))
    }

    fn runs_with_activations(&self) -> StrataResult<usize> {
        self.with_reader(activation_ops::runs_with_activations)
    }

    fn get_usefulness(
        &self,
        run_id: RunId,
        capsule_id: CapsuleId,
    ) -> StrataResult<Option<MemoryUsefulnessMetric>> {
        // Read-modify-write callers must see their own writes.
        self.pool
            .writer
            .with_conn(|conn| activation_ops::get_usefulness(conn, run_id, capsule_id))
    }

    fn upsert_usefulness(&self, metric: &MemoryUsefulnessMetric) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| activation_ops::upsert_usefulness(conn, metric))
    }

    fn insert_summary(&self, summary: &MemorySummary) -> StrataResult<i64> {
        self.pool
            .writer
            .with_conn(|conn| activation_ops::insert_summary(conn, summary))
    }

    fn summary_for(&self, capsule_id: CapsuleId) -> StrataResult<Option<MemorySummary>> {
        self.with_reader(|conn| activation_ops::summary_for(conn, capsule_id))
    }
}

impl IEdgeStorage for StorageEngine {
    fn upsert_edge(&self, reinforcement: &EdgeReinforcement) -> StrataResult<MemoryEdge> {
        self.pool
            .writer
            .with_conn(|conn| edge_ops::upsert_edge(conn, reinforcement))
    }

    fn edges_touching(&self, ids: &[CapsuleId]) -> StrataResult<Vec<MemoryEdge>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.with_reader(|conn| edge_ops::edges_touching(conn, ids))
    }

    fn edges_for(&self, id: CapsuleId) -> StrataResult<Vec<MemoryEdge>> {
        self.with_reader(|conn| edge_ops::edges_for(conn, id))
    }

    fn prune_edges(&self, max_weight: f64, min_usage: u64) -> StrataResult<usize> {
        self.pool
            .writer
            .with_conn(|conn| edge_ops::prune_edges(conn, max_weight, min_usage))
    }

    fn edge_count(&self) -> StrataResult<usize> {
        self.with_reader(edge_ops::edge_count)
    }
}

impl IConflictStorage for StorageEngine {
    fn upsert_conflict(
        &self,
        left: CapsuleId,
        right: CapsuleId,
        score: f64,
        detail: &serde_json::Value,
    ) -> StrataResult<MemoryConflict> {
        self.pool
            .writer
            .with_conn(|conn| conflict_ops::upsert_conflict(conn, left, right, score, detail))
    }

    fn list_conflicts(&self, limit: usize) -> StrataResult<Vec<MemoryConflict>> {
        self.with_reader(|conn| conflict_ops::list_conflicts(conn, limit))
    }

    fn conflict_count(&self) -> StrataResult<usize> {
        self.with_reader(conflict_ops::conflict_count)
    }

    fn join_duplicate_cluster(
        &self,
        hash_key: &str,
        capsule_id: CapsuleId,
    ) -> StrataResult<DuplicateCluster> {
        self.pool
            .writer
            .with_conn(|conn| duplicate_ops::join_cluster(conn, hash_key, capsule_id))
    }

    fn list_duplicate_clusters(&self, min_size: usize) -> StrataResult<Vec<DuplicateCluster>> {
        self.with_reader(|conn| duplicate_ops::list_clusters(conn, min_size))
    }
}

impl IJobStorage for StorageEngine {
    fn create_maintenance_job(
        &self,
        run_id: Option<RunId>,
        job_type: &str,
    ) -> StrataResult<MemoryMaintenanceJob> {
        self.pool
            .writer
            .with_conn(|conn| job_ops::create_maintenance_job(conn, run_id, job_type))
    }

    fn finish_maintenance_job(&self, job: &MemoryMaintenanceJob) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| job_ops::finish_maintenance_job(conn, job))
    }

    fn recent_maintenance_jobs(&self, limit: usize) -> StrataResult<Vec<MemoryMaintenanceJob>> {
        self.with_reader(|conn| job_ops::recent_maintenance_jobs(conn, limit))
    }

    fn insert_worker_job(&self, request: &WorkerRequest) -> StrataResult<WorkerJob> {
        self.pool
            .writer
            .with_conn(|conn| job_ops::insert_worker_job(conn, request))
    }

    fn finish_worker_job(&self, job: &WorkerJob) -> StrataResult<()> {
        self.pool
            .writer
            .with_conn(|conn| job_ops::finish_worker_job(conn, job))
    }

    fn recent_worker_jobs(&self, limit: usize) -> StrataResult<Vec<WorkerJob>> {
        self.with_reader(|conn| job_ops::recent_worker_jobs(conn, limit))
    }

    fn register_worker(
        &self,
        name: &str,
        url: &str,
        capabilities: &[String],
    ) -> StrataResult<WorkerNode> {
        self.pool
            .writer
            .with_conn(|conn| job_ops::register_worker(conn, name, url, capabilities))
    }

    fn list_workers(&self) -> StrataResult<Vec<WorkerNode>> {
        self.with_reader(job_ops::list_workers)
    }
}

impl ITraceSink for StorageEngine {
    fn append(&self, event: &NewTraceEvent) -> StrataResult<i64> {
        self.pool
            .writer
            .with_conn(|conn| trace_ops::append_event(conn, event))
    }

    fn events_for_run(&self, run_id: RunId, limit: usize) -> StrataResult<Vec<TraceEvent>> {
        self.with_reader(|conn| trace_ops::events_for_run(conn, run_id, limit))
    }
}
