use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ArchiveStatus, CapsuleId, DecayClass, MemoryLayer, RunId};
use crate::config::defaults;
use crate::constants::SOURCE_TYPE_CHUNK;

/// A stored capsule with its lifecycle metadata.
///
/// Capsules are never deleted by the engine. Maintenance relabels them
/// (layer, archive status) and refinement derives children from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub id: CapsuleId,
    pub run_id: RunId,
    pub attachment_id: Option<i64>,
    /// Free-form source label, e.g. `attachment`, `tool`, `profile`.
    pub source: String,
    /// How the capsule was produced: chunk, summary, refinement, refinement_summary.
    pub source_type: String,
    pub chunk_index: u32,
    pub text: String,
    pub tags: Vec<String>,
    pub project_key: Option<String>,
    pub session_key: Option<String>,
    pub is_summary: bool,
    pub layer: MemoryLayer,
    pub decay_class: DecayClass,
    pub archive_status: ArchiveStatus,
    pub confidence: f64,
    pub consolidation_score: f64,
    pub trust_score: f64,
    pub recency_score: f64,
    pub retrieval_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub contradiction_flag: bool,
    pub duplicate_cluster_id: Option<i64>,
    pub duplicate_score: f64,
    pub parent_capsule_id: Option<CapsuleId>,
    pub lineage_root_id: Option<CapsuleId>,
    pub created_from_run_id: Option<RunId>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Capsule {
    /// Cold capsules are excluded from default retrieval.
    pub fn is_cold(&self) -> bool {
        self.archive_status == ArchiveStatus::Cold
    }

    /// Root of this capsule's lineage: its recorded root, or itself.
    pub fn lineage_root(&self) -> CapsuleId {
        self.lineage_root_id.unwrap_or(self.id)
    }
}

/// A capsule that has not been persisted yet. The store assigns the id
/// and zeroes the counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCapsule {
    pub run_id: RunId,
    pub attachment_id: Option<i64>,
    pub source: String,
    pub source_type: String,
    pub chunk_index: u32,
    pub text: String,
    pub tags: Vec<String>,
    pub project_key: Option<String>,
    pub session_key: Option<String>,
    pub is_summary: bool,
    pub layer: MemoryLayer,
    pub decay_class: DecayClass,
    pub archive_status: ArchiveStatus,
    pub confidence: f64,
    pub consolidation_score: f64,
    pub trust_score: f64,
    pub recency_score: f64,
    pub parent_capsule_id: Option<CapsuleId>,
    pub lineage_root_id: Option<CapsuleId>,
    pub created_from_run_id: Option<RunId>,
    pub created_at: DateTime<Utc>,
}

impl NewCapsule {
    /// A session-layer chunk with default scores, created now.
    pub fn new(run_id: RunId, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            run_id,
            attachment_id: None,
            source: source.into(),
            source_type: SOURCE_TYPE_CHUNK.to_string(),
            chunk_index: 0,
            text: text.into(),
            tags: Vec::new(),
            project_key: None,
            session_key: None,
            is_summary: false,
            layer: MemoryLayer::L2Session,
            decay_class: DecayClass::Medium,
            archive_status: ArchiveStatus::Active,
            confidence: defaults::DEFAULT_CAPSULE_CONFIDENCE,
            consolidation_score: defaults::DEFAULT_CAPSULE_CONSOLIDATION,
            trust_score: defaults::DEFAULT_CAPSULE_TRUST,
            recency_score: defaults::DEFAULT_CAPSULE_RECENCY,
            parent_capsule_id: None,
            lineage_root_id: None,
            created_from_run_id: Some(run_id),
            created_at: Utc::now(),
        }
    }

    /// Set the layer. `L5_COLD` also sets the archive status to cold.
    pub fn with_layer(mut self, layer: MemoryLayer) -> Self {
        self.layer = layer;
        self.archive_status = if layer == MemoryLayer::L5Cold {
            ArchiveStatus::Cold
        } else {
            ArchiveStatus::Active
        };
        self
    }

    pub fn with_decay_class(mut self, decay_class: DecayClass) -> Self {
        self.decay_class = decay_class;
        self
    }

    pub fn with_keys(mut self, project_key: Option<String>, session_key: Option<String>) -> Self {
        self.project_key = project_key;
        self.session_key = session_key;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_scores(mut self, confidence: f64, consolidation: f64, trust: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self.consolidation_score = consolidation.clamp(0.0, 1.0);
        self.trust_score = trust.clamp(0.0, 1.0);
        self
    }
}
