//! ValidationEngine: conflict detection and duplicate clustering over the store.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use strata_core::capsule::{Capsule, RunId};
use strata_core::config::ValidationConfig;
use strata_core::constants::MAX_CONFLICT_LISTING;
use strata_core::errors::StrataResult;
use strata_core::models::{DuplicateCluster, MemoryConflict, TraceEventType};
use strata_core::traits::{ICapsuleStorage, IConflictStorage};
use strata_observability::tracing_setup::events;
use strata_observability::TraceRecorder;

use crate::canonical::canonical_hash;
use crate::contradiction::{ContradictionClassifier, ContradictionScore, HeuristicClassifier};
use crate::duplicates::{self, DuplicateAssignment};

pub struct ValidationEngine {
    capsules: Arc<dyn ICapsuleStorage>,
    conflicts: Arc<dyn IConflictStorage>,
    classifier: Box<dyn ContradictionClassifier>,
    recorder: Option<TraceRecorder>,
    config: ValidationConfig,
}

impl ValidationEngine {
    pub fn new(
        capsules: Arc<dyn ICapsuleStorage>,
        conflicts: Arc<dyn IConflictStorage>,
        config: ValidationConfig,
    ) -> Self {
        Self {
            capsules,
            conflicts,
            classifier: Box::new(HeuristicClassifier::new(config.clone())),
            recorder: None,
            config,
        }
    }

    /// Swap the contradiction classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn ContradictionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Emit conflict and duplicate trace events through `recorder`.
    pub fn with_recorder(mut self, recorder: TraceRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn contradiction(&self, a: &Capsule, b: &Capsule) -> ContradictionScore {
        self.classifier.score(a, b)
    }

    /// Compare the run's most recent capsules, each with the next few, and
    /// record pairs at or above the threshold. Exact duplicates are not
    /// conflicts and are skipped.
    pub fn detect_conflicts(&self, run_id: RunId) -> StrataResult<Vec<MemoryConflict>> {
        let rows = self
            .capsules
            .recent_capsules(Some(run_id), self.config.conflict_window)?;
        let hashes: Vec<String> = rows.iter().map(|c| canonical_hash(&c.text)).collect();

        let mut found = Vec::new();
        for (i, left) in rows.iter().enumerate() {
            let end = (i + 1 + self.config.conflict_lookahead).min(rows.len());
            for j in (i + 1)..end {
                if hashes[i] == hashes[j] {
                    continue;
                }
                let right = &rows[j];
                let verdict = self.classifier.score(left, right);
                if verdict.score < self.config.contradiction_threshold {
                    continue;
                }
                let detail = json!({
                    "run_id": run_id,
                    "overlap": verdict.overlap,
                    "polarity_differs": verdict.polarity_differs,
                    "layers_differ": verdict.layers_differ,
                    "classifier": self.classifier.name(),
                });
                let conflict =
                    self.conflicts
                        .upsert_conflict(left.id, right.id, verdict.score, &detail)?;
                self.capsules.set_contradiction_flag(left.id, true)?;
                self.capsules.set_contradiction_flag(right.id, true)?;
                events::conflict_detected(left.id, right.id, verdict.score);
                self.trace(
                    Some(run_id),
                    TraceEventType::MemoryConflictDetected,
                    json!({
                        "conflict_id": conflict.id,
                        "left_capsule_id": left.id,
                        "right_capsule_id": right.id,
                        "score": conflict.conflict_score,
                    }),
                );
                found.push(conflict);
            }
        }
        Ok(found)
    }

    /// Place a capsule in the cluster for its canonical hash. When the
    /// cluster holds more than one capsule every member gets the duplicate
    /// score, which never decreases.
    pub fn assign_duplicate(&self, capsule: &Capsule) -> StrataResult<DuplicateAssignment> {
        let hash = canonical_hash(&capsule.text);
        let cluster = self.conflicts.join_duplicate_cluster(&hash, capsule.id)?;
        let score = duplicates::member_score(cluster.cluster_size, self.config.duplicate_score);
        let newly_joined = capsule.duplicate_cluster_id != Some(cluster.id);

        if cluster.has_duplicates() {
            for member in &cluster.member_ids {
                self.capsules.set_duplicate(*member, cluster.id, score)?;
            }
        } else {
            self.capsules.set_duplicate(capsule.id, cluster.id, score)?;
        }

        let assignment = DuplicateAssignment {
            cluster,
            newly_joined,
            duplicate_score: score,
        };
        if assignment.is_new_duplicate() {
            tracing::debug!(
                capsule_id = capsule.id,
                cluster_id = assignment.cluster.id,
                size = assignment.cluster.cluster_size,
                "duplicate capsule"
            );
            self.trace(
                Some(capsule.run_id),
                TraceEventType::DuplicateCapsuleDetected,
                json!({
                    "capsule_id": capsule.id,
                    "cluster_id": assignment.cluster.id,
                    "canonical_capsule_id": assignment.cluster.canonical_capsule_id,
                    "cluster_size": assignment.cluster.cluster_size,
                }),
            );
        }
        Ok(assignment)
    }

    /// Re-cluster the most recent capsules, oldest first so the earliest copy
    /// stays canonical. Returns how many sit in a multi-member cluster.
    pub fn refresh_duplicates(&self) -> StrataResult<usize> {
        let recent = self
            .capsules
            .recent_capsules(None, self.config.duplicate_refresh_limit)?;
        let mut sizes: HashMap<i64, usize> = HashMap::new();
        let mut memberships = Vec::with_capacity(recent.len());
        for capsule in recent.iter().rev() {
            let assignment = self.assign_duplicate(capsule)?;
            sizes.insert(assignment.cluster.id, assignment.cluster.cluster_size);
            memberships.push(assignment.cluster.id);
        }
        Ok(memberships
            .iter()
            .filter(|id| sizes.get(id).copied().unwrap_or(0) > 1)
            .count())
    }

    /// Highest-scoring conflicts first, capped at the listing limit.
    pub fn list_conflicts(&self, limit: usize) -> StrataResult<Vec<MemoryConflict>> {
        self.conflicts
            .list_conflicts(limit.min(MAX_CONFLICT_LISTING))
    }

    /// Clusters with more than one member, largest first.
    pub fn list_duplicates(&self) -> StrataResult<Vec<DuplicateCluster>> {
        self.conflicts.list_duplicate_clusters(2)
    }

    fn trace(&self, run_id: Option<RunId>, event: TraceEventType, payload: serde_json::Value) {
        if let Some(recorder) = &self.recorder {
            recorder.record(run_id, event, payload);
        }
    }
}
