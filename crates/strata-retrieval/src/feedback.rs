//! Usefulness feedback: how a run actually used what it retrieved.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use strata_core::capsule::{CapsuleId, RunId};
use strata_core::errors::StrataResult;
use strata_core::models::{FeedbackDelta, MemoryUsefulnessMetric, TraceEventType};
use strata_core::traits::{IActivationStorage, ICapsuleStorage};
use strata_observability::TraceRecorder;

const USED_TRUST_GAIN: f64 = 0.02;
const UNUSED_TRUST_LOSS: f64 = 0.01;
const STALE_PENALTY_STEP: f64 = 0.03;
const CONTRADICTION_PENALTY_STEP: f64 = 0.08;
const FINAL_ANSWER_STEP: f64 = 0.1;
const TOOL_EXECUTION_STEP: f64 = 0.08;
const CONSOLIDATION_RATE: f64 = 0.04;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub run_id: RunId,
    pub retrieved_ids: Vec<CapsuleId>,
    pub used_ids: Vec<CapsuleId>,
    pub helped_final_answer: bool,
    pub helped_tool_execution: bool,
}

pub struct FeedbackRecorder {
    capsules: Arc<dyn ICapsuleStorage>,
    activations: Arc<dyn IActivationStorage>,
    recorder: TraceRecorder,
}

impl FeedbackRecorder {
    pub fn new(
        capsules: Arc<dyn ICapsuleStorage>,
        activations: Arc<dyn IActivationStorage>,
        recorder: TraceRecorder,
    ) -> Self {
        Self {
            capsules,
            activations,
            recorder,
        }
    }

    /// Fold one round of feedback into capsule scores and the per-run
    /// usefulness metrics. Unknown ids are skipped. Returns the updated metrics.
    pub fn record(&self, request: &FeedbackRequest) -> StrataResult<Vec<MemoryUsefulnessMetric>> {
        let now = Utc::now();
        let used: HashSet<CapsuleId> = request.used_ids.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut updated = Vec::new();

        for &id in &request.retrieved_ids {
            if !seen.insert(id) {
                continue;
            }
            let Some(capsule) = self.capsules.get_capsule(id)? else {
                tracing::debug!(capsule_id = id, "feedback for unknown capsule skipped");
                continue;
            };
            let mut metric = self
                .activations
                .get_usefulness(request.run_id, id)?
                .unwrap_or_else(|| MemoryUsefulnessMetric::empty(request.run_id, id, now));
            let mut delta = FeedbackDelta::default();

            metric.retrieved_count += 1;
            if used.contains(&id) {
                metric.used_count += 1;
                delta.success = 1;
                delta.trust = USED_TRUST_GAIN;
                if request.helped_final_answer {
                    metric.helped_final_answer_score =
                        (metric.helped_final_answer_score + FINAL_ANSWER_STEP).min(1.0);
                }
                if request.helped_tool_execution {
                    metric.helped_tool_execution_score =
                        (metric.helped_tool_execution_score + TOOL_EXECUTION_STEP).min(1.0);
                }
            } else {
                metric.unused_count += 1;
                delta.failure = 1;
                delta.trust = -UNUSED_TRUST_LOSS;
                metric.stale_penalty = (metric.stale_penalty + STALE_PENALTY_STEP).min(1.0);
            }
            if capsule.contradiction_flag {
                metric.contradiction_penalty =
                    (metric.contradiction_penalty + CONTRADICTION_PENALTY_STEP).min(1.0);
            }
            metric.confidence_gain = (metric.helped_final_answer_score
                - metric.contradiction_penalty
                - metric.stale_penalty)
                .clamp(-1.0, 1.0);
            delta.consolidation = CONSOLIDATION_RATE * metric.confidence_gain;
            metric.updated_at = now;

            self.capsules.apply_feedback(id, &delta, now)?;
            self.activations.upsert_usefulness(&metric)?;
            updated.push(metric);
        }

        self.recorder.record(
            Some(request.run_id),
            TraceEventType::MemoryUsefulnessUpdate,
            json!({
                "retrieved": request.retrieved_ids.len(),
                "used": request.used_ids.len(),
                "updated": updated.len(),
                "helped_final_answer": request.helped_final_answer,
                "helped_tool_execution": request.helped_tool_execution,
            }),
        );
        tracing::info!(run_id = request.run_id, updated = updated.len(), "feedback recorded");
        Ok(updated)
    }
}
