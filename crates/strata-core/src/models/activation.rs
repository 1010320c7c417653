use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FactorContribution, ScoreBreakdown};
use crate::capsule::{CapsuleId, MemoryLayer, RunId};

/// Why a capsule made it into the admitted set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionKind {
    /// Scored above the minimum threshold.
    ScoreAboveThreshold,
    /// Nothing passed the threshold; best available candidates were used.
    BestAvailableFallback,
    /// Surfaced by graph rerank rather than by similarity.
    GraphAssociation,
}

/// Structured reason attached to every activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionReason {
    pub admission: AdmissionKind,
    pub layer_budget: usize,
    /// Admissions already granted to this layer, including this one.
    pub layer_slot: usize,
    pub rank_score: f64,
    pub dominant_factors: Vec<FactorContribution>,
    pub factors: ScoreBreakdown,
}

/// Append-only audit row: one per admission decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextActivation {
    pub id: i64,
    pub run_id: Option<RunId>,
    pub capsule_id: CapsuleId,
    pub query_text: String,
    pub score: f64,
    pub layer: MemoryLayer,
    pub reason: AdmissionReason,
    pub created_at: DateTime<Utc>,
}
