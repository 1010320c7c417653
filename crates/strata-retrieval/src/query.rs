use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use strata_core::capsule::{CapsuleId, MemoryLayer, RunId};
use strata_core::models::{AdmissionKind, FactorContribution, ScoreBreakdown};

/// One query against the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query_text: String,
    /// Restrict candidates to one run.
    pub run_id: Option<RunId>,
    /// Defaults to the configured `top_k`.
    pub top_k: Option<usize>,
    /// Per-source multipliers. Missing sources weigh 1.0.
    pub source_weights: HashMap<String, f64>,
    pub project_key: Option<String>,
    pub session_key: Option<String>,
}

impl SearchRequest {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            ..Default::default()
        }
    }

    pub fn for_run(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_source_weight(mut self, source: impl Into<String>, weight: f64) -> Self {
        self.source_weights.insert(source.into(), weight);
        self
    }

    pub fn with_keys(mut self, project_key: Option<String>, session_key: Option<String>) -> Self {
        self.project_key = project_key;
        self.session_key = session_key;
        self
    }
}

/// An admitted capsule as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedItem {
    pub capsule_id: CapsuleId,
    pub run_id: RunId,
    pub text: String,
    pub source: String,
    pub layer: MemoryLayer,
    pub is_summary: bool,
    pub score: f64,
    pub admission: AdmissionKind,
    pub dominant_factors: Vec<FactorContribution>,
    pub breakdown: ScoreBreakdown,
}

/// Plain cosine match from [`search_capsules`](crate::RetrievalEngine::search_capsules).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsuleMatch {
    pub capsule_id: CapsuleId,
    pub run_id: RunId,
    pub text: String,
    pub source: String,
    pub score: f64,
}
