use chrono::{DateTime, Utc};

use crate::capsule::{
    ArchiveStatus, Capsule, CapsuleEmbedding, CapsuleId, MemoryCapsuleState, MemoryLayer,
    NewCapsule, RunId,
};
use crate::errors::StrataResult;
use crate::models::{
    ContextActivation, DuplicateCluster, EdgeReinforcement, FeedbackDelta, MemoryConflict,
    MemoryEdge, MemoryMaintenanceJob, MemorySummary, MemoryUsefulnessMetric, WorkerJob,
    WorkerNode, WorkerRequest,
};

/// Capsule records, their embeddings, and their counters.
pub trait ICapsuleStorage: Send + Sync {
    // --- Create ---
    /// Insert capsules with their embeddings in one transaction. Returns ids in input order.
    fn insert_capsules(
        &self,
        capsules: &[(NewCapsule, Vec<f32>)],
        model: &str,
    ) -> StrataResult<Vec<CapsuleId>>;

    // --- Read ---
    fn get_capsule(&self, id: CapsuleId) -> StrataResult<Option<Capsule>>;
    fn get_capsules(&self, ids: &[CapsuleId]) -> StrataResult<Vec<Capsule>>;
    /// All capsules, optionally for one run, ordered by id.
    fn list_capsules(
        &self,
        run_id: Option<RunId>,
        include_cold: bool,
    ) -> StrataResult<Vec<Capsule>>;
    /// Most recent capsules first.
    fn recent_capsules(&self, run_id: Option<RunId>, limit: usize) -> StrataResult<Vec<Capsule>>;
    /// Active capsules with their vectors: the retrieval candidate pool.
    fn candidates(&self, run_id: Option<RunId>) -> StrataResult<Vec<(Capsule, Vec<f32>)>>;
    fn get_embedding(&self, id: CapsuleId) -> StrataResult<Option<CapsuleEmbedding>>;
    fn get_state(&self, id: CapsuleId) -> StrataResult<Option<MemoryCapsuleState>>;
    fn children_of(&self, id: CapsuleId) -> StrataResult<Vec<Capsule>>;
    /// Capsules whose lineage root is `root_id`, excluding the root itself.
    fn lineage_members(&self, root_id: CapsuleId) -> StrataResult<Vec<Capsule>>;

    // --- Mutate ---
    /// Fails with `CapsuleNotFound` for unknown ids.
    fn set_layer(
        &self,
        id: CapsuleId,
        layer: MemoryLayer,
        status: ArchiveStatus,
    ) -> StrataResult<()>;
    fn set_contradiction_flag(&self, id: CapsuleId, flag: bool) -> StrataResult<()>;
    fn set_duplicate(
        &self,
        id: CapsuleId,
        cluster_id: i64,
        duplicate_score: f64,
    ) -> StrataResult<()>;
    /// Atomic `retrieval_count += 1` and recency nudge on both capsule and state.
    fn record_retrieval(
        &self,
        id: CapsuleId,
        recency_nudge: f64,
        at: DateTime<Utc>,
    ) -> StrataResult<()>;
    /// Atomic counter increments and clamped score deltas.
    fn apply_feedback(
        &self,
        id: CapsuleId,
        delta: &FeedbackDelta,
        at: DateTime<Utc>,
    ) -> StrataResult<()>;

    // --- Aggregation ---
    fn count_by_layer(&self) -> StrataResult<Vec<(MemoryLayer, usize)>>;
    fn capsule_count(&self) -> StrataResult<usize>;
}

/// Activations, usefulness metrics, and refinement summaries.
pub trait IActivationStorage: Send + Sync {
    fn insert_activation(&self, activation: &ContextActivation) -> StrataResult<i64>;
    /// Most recent first.
    fn activations_for_run(
        &self,
        run_id: RunId,
        limit: usize,
    ) -> StrataResult<Vec<ContextActivation>>;
    fn runs_with_activations(&self) -> StrataResult<usize>;
    fn get_usefulness(
        &self,
        run_id: RunId,
        capsule_id: CapsuleId,
    ) -> StrataResult<Option<MemoryUsefulnessMetric>>;
    fn upsert_usefulness(&self, metric: &MemoryUsefulnessMetric) -> StrataResult<()>;
    fn insert_summary(&self, summary: &MemorySummary) -> StrataResult<i64>;
    fn summary_for(&self, capsule_id: CapsuleId) -> StrataResult<Option<MemorySummary>>;
}

/// The reinforcement graph's adjacency index.
pub trait IEdgeStorage: Send + Sync {
    /// Insert or max-merge an edge keyed by (from, to, type), incrementing usage.
    fn upsert_edge(&self, reinforcement: &EdgeReinforcement) -> StrataResult<MemoryEdge>;
    /// Edges with either endpoint in `ids`.
    fn edges_touching(&self, ids: &[CapsuleId]) -> StrataResult<Vec<MemoryEdge>>;
    /// Incident edges, heaviest first.
    fn edges_for(&self, id: CapsuleId) -> StrataResult<Vec<MemoryEdge>>;
    /// Delete edges with `weight < max_weight` and `usage_count < min_usage`.
    fn prune_edges(&self, max_weight: f64, min_usage: u64) -> StrataResult<usize>;
    fn edge_count(&self) -> StrataResult<usize>;
}

/// Conflicts and duplicate clusters.
pub trait IConflictStorage: Send + Sync {
    /// Idempotent per ordered pair; keeps the highest score.
    fn upsert_conflict(
        &self,
        left: CapsuleId,
        right: CapsuleId,
        score: f64,
        detail: &serde_json::Value,
    ) -> StrataResult<MemoryConflict>;
    /// Highest score first.
    fn list_conflicts(&self, limit: usize) -> StrataResult<Vec<MemoryConflict>>;
    fn conflict_count(&self) -> StrataResult<usize>;
    /// Create the cluster for `hash_key` or add `capsule_id` to it.
    fn join_duplicate_cluster(
        &self,
        hash_key: &str,
        capsule_id: CapsuleId,
    ) -> StrataResult<DuplicateCluster>;
    fn list_duplicate_clusters(&self, min_size: usize) -> StrataResult<Vec<DuplicateCluster>>;
}

/// Maintenance jobs, worker jobs, and worker registrations.
pub trait IJobStorage: Send + Sync {
    fn create_maintenance_job(
        &self,
        run_id: Option<RunId>,
        job_type: &str,
    ) -> StrataResult<MemoryMaintenanceJob>;
    fn finish_maintenance_job(&self, job: &MemoryMaintenanceJob) -> StrataResult<()>;
    /// Most recent first.
    fn recent_maintenance_jobs(&self, limit: usize) -> StrataResult<Vec<MemoryMaintenanceJob>>;
    fn insert_worker_job(&self, request: &WorkerRequest) -> StrataResult<WorkerJob>;
    fn finish_worker_job(&self, job: &WorkerJob) -> StrataResult<()>;
    /// Most recent first.
    fn recent_worker_jobs(&self, limit: usize) -> StrataResult<Vec<WorkerJob>>;
    fn register_worker(
        &self,
        name: &str,
        url: &str,
        capabilities: &[String],
    ) -> StrataResult<WorkerNode>;
    fn list_workers(&self) -> StrataResult<Vec<WorkerNode>>;
}

/// Everything the engine needs from persistence.
pub trait IMemoryStore:
    ICapsuleStorage + IActivationStorage + IEdgeStorage + IConflictStorage + IJobStorage
{
}

impl<T> IMemoryStore for T where
    T: ICapsuleStorage + IActivationStorage + IEdgeStorage + IConflictStorage + IJobStorage
{
}
