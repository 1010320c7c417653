use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::{CapsuleId, RunId};

/// Running feedback tally for one capsule within one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsefulnessMetric {
    pub run_id: RunId,
    pub capsule_id: CapsuleId,
    pub retrieved_count: u64,
    pub used_count: u64,
    pub unused_count: u64,
    pub helped_final_answer_score: f64,
    pub helped_tool_execution_score: f64,
    pub contradiction_penalty: f64,
    pub stale_penalty: f64,
    pub confidence_gain: f64,
    pub updated_at: DateTime<Utc>,
}

impl MemoryUsefulnessMetric {
    pub fn empty(run_id: RunId, capsule_id: CapsuleId, at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            capsule_id,
            retrieved_count: 0,
            used_count: 0,
            unused_count: 0,
            helped_final_answer_score: 0.0,
            helped_tool_execution_score: 0.0,
            contradiction_penalty: 0.0,
            stale_penalty: 0.0,
            confidence_gain: 0.0,
            updated_at: at,
        }
    }
}

/// Counter and score deltas applied atomically to a capsule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackDelta {
    pub success: u64,
    pub failure: u64,
    pub trust: f64,
    pub consolidation: f64,
}
