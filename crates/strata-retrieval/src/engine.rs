//! RetrievalEngine: the full query pipeline.
//!
//! embed → score active candidates → threshold (with fallback) → layer band →
//! graph rerank → re-rank by score → duplicate suppression → budgeted
//! admission → activations, counters, traces → co-retrieval reinforcement.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use strata_core::capsule::RunId;
use strata_core::config::AdmissionConfig;
use strata_core::errors::StrataResult;
use strata_core::models::{
    AdmissionKind, ContextActivation, FactorContribution, ScoreBreakdown, TraceEventType,
};
use strata_core::traits::{IActivationStorage, ICapsuleStorage, IEmbeddingProvider};
use strata_graph::GraphEngine;
use strata_observability::retrieval_span;
use strata_observability::tracing_setup::events;
use strata_observability::TraceRecorder;
use strata_scoring::factors::semantic;
use strata_scoring::{QueryContext, ScoredCapsule, ScoringEngine};
use strata_validation::duplicates;

use crate::admission::{reason, AdmissionController, AdmittedCandidate, RankedCandidate};
use crate::banding;
use crate::query::{CapsuleMatch, RetrievedItem, SearchRequest};

pub struct RetrievalEngine {
    capsules: Arc<dyn ICapsuleStorage>,
    activations: Arc<dyn IActivationStorage>,
    embedder: Arc<dyn IEmbeddingProvider>,
    scoring: ScoringEngine,
    graph: Arc<GraphEngine>,
    admission: AdmissionController,
    recorder: TraceRecorder,
}

impl RetrievalEngine {
    pub fn new(
        capsules: Arc<dyn ICapsuleStorage>,
        activations: Arc<dyn IActivationStorage>,
        embedder: Arc<dyn IEmbeddingProvider>,
        scoring: ScoringEngine,
        graph: Arc<GraphEngine>,
        config: AdmissionConfig,
        recorder: TraceRecorder,
    ) -> Self {
        Self {
            capsules,
            activations,
            embedder,
            scoring,
            graph,
            admission: AdmissionController::new(config),
            recorder,
        }
    }

    pub fn config(&self) -> &AdmissionConfig {
        self.admission.config()
    }

    /// Run a query and admit results. Embedding failures propagate; an empty
    /// store or `top_k == 0` yields no results.
    pub fn search(&self, request: &SearchRequest) -> StrataResult<Vec<RetrievedItem>> {
        let config = self.admission.config();
        let top_k = request.top_k.unwrap_or(config.top_k);
        let span = retrieval_span!(request.run_id, top_k);
        let _guard = span.enter();

        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(&request.query_text)?;
        let ctx = QueryContext::new(query_vector)
            .with_keys(request.project_key.clone(), request.session_key.clone());

        let pool: Vec<_> = self
            .capsules
            .candidates(request.run_id)?
            .into_iter()
            .filter(|(c, _)| !c.is_cold())
            .collect();
        let scored = self
            .scoring
            .score_batch(&pool, &ctx, &request.source_weights);
        let candidate_count = scored.len();

        let (passed, kind) = banding::apply_threshold(scored, config.min_score);
        let passed_count = if kind == AdmissionKind::BestAvailableFallback {
            0
        } else {
            passed.len()
        };
        let band_size = top_k.saturating_mul(config.band_multiplier.max(1));
        let band = banding::band(passed, band_size);
        let band_len = band.len();

        let mut ranked: Vec<RankedCandidate> = band
            .into_iter()
            .map(|scored| RankedCandidate { scored, kind })
            .collect();
        if config.graph_rerank && !ranked.is_empty() {
            self.apply_graph_rerank(request.run_id, &mut ranked)?;
        }
        ranked.sort_by(|a, b| banding::by_score_then_layer(&a.scored, &b.scored));

        let (ranked, suppressed) = duplicates::suppress(ranked, |r| &r.scored.capsule);
        if suppressed > 0 {
            debug!(suppressed, "duplicate candidates suppressed");
        }

        let admitted = self.admission.admit(ranked, top_k);
        let items = self.record_admissions(request, &admitted)?;

        let mut per_layer: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &items {
            *per_layer.entry(item.layer.as_str()).or_insert(0) += 1;
        }
        self.recorder.record(
            request.run_id,
            TraceEventType::MemoryLayerQuery,
            json!({
                "query": request.query_text,
                "top_k": top_k,
                "candidates": candidate_count,
                "passed_threshold": passed_count,
                "band": band_len,
                "suppressed_duplicates": suppressed,
                "admitted": items.len(),
                "fallback": kind == AdmissionKind::BestAvailableFallback,
                "layers": per_layer,
            }),
        );

        let admitted_ids: Vec<_> = items.iter().map(|i| i.capsule_id).collect();
        if let Err(e) = self.graph.reinforce_co_retrieval(&admitted_ids) {
            warn!(error = %e, "co-retrieval reinforcement failed");
        }

        events::context_admitted(request.run_id, candidate_count, items.len());
        Ok(items)
    }

    /// Rank capsules by cosine similarity alone. Read-only.
    pub fn search_capsules(
        &self,
        query: &str,
        run_id: Option<RunId>,
        limit: usize,
    ) -> StrataResult<Vec<CapsuleMatch>> {
        let query_vector = self.embedder.embed(query)?;
        let mut matches: Vec<CapsuleMatch> = self
            .capsules
            .candidates(run_id)?
            .into_iter()
            .map(|(capsule, vector)| CapsuleMatch {
                score: semantic::cosine(&query_vector, &vector),
                capsule_id: capsule.id,
                run_id: capsule.run_id,
                text: capsule.text,
                source: capsule.source,
            })
            .collect();
        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.capsule_id.cmp(&b.capsule_id))
        });
        matches.truncate(limit.max(1));
        Ok(matches)
    }

    fn apply_graph_rerank(
        &self,
        run_id: Option<RunId>,
        ranked: &mut Vec<RankedCandidate>,
    ) -> StrataResult<()> {
        let base: Vec<_> = ranked
            .iter()
            .map(|r| (r.scored.capsule.id, r.scored.score))
            .collect();
        let rerank = self.graph.rerank(&base)?;
        if !rerank.changed() {
            return Ok(());
        }

        for candidate in ranked.iter_mut() {
            if let Some(boost) = rerank.boosts.get(&candidate.scored.capsule.id) {
                let scored = &mut candidate.scored;
                scored.breakdown.graph_boost = *boost;
                scored.score += boost;
                scored.breakdown.final_score = scored.score;
            }
        }
        for (capsule, score) in &rerank.neighbors {
            let breakdown = ScoreBreakdown {
                layer_weight: self.scoring.config().layer_weight(capsule.layer),
                source_weight: 1.0,
                graph_boost: *score,
                contributions: vec![FactorContribution {
                    factor: "graph_association".to_string(),
                    value: *score,
                    contribution: *score,
                }],
                final_score: *score,
                ..Default::default()
            };
            ranked.push(RankedCandidate {
                scored: ScoredCapsule {
                    capsule: capsule.clone(),
                    score: *score,
                    breakdown,
                },
                kind: AdmissionKind::GraphAssociation,
            });
        }

        self.recorder.record(
            run_id,
            TraceEventType::GraphRerank,
            json!({
                "boosted": rerank.boosts,
                "neighbors": rerank
                    .neighbors
                    .iter()
                    .map(|(c, s)| json!({ "capsule_id": c.id, "score": s }))
                    .collect::<Vec<_>>(),
                "edges_considered": rerank.edges_considered,
            }),
        );
        Ok(())
    }

    fn record_admissions(
        &self,
        request: &SearchRequest,
        admitted: &[AdmittedCandidate],
    ) -> StrataResult<Vec<RetrievedItem>> {
        let config = self.admission.config();
        let now = Utc::now();
        let mut items = Vec::with_capacity(admitted.len());

        for entry in admitted {
            let scored = &entry.candidate.scored;
            let capsule = &scored.capsule;
            let reason = reason::build(entry, config.dominant_factors);
            let activation = ContextActivation {
                id: 0,
                run_id: request.run_id,
                capsule_id: capsule.id,
                query_text: request.query_text.clone(),
                score: scored.score,
                layer: capsule.layer,
                reason: reason.clone(),
                created_at: now,
            };
            self.activations.insert_activation(&activation)?;
            self.capsules
                .record_retrieval(capsule.id, config.recency_nudge, now)?;

            self.recorder.record(
                request.run_id,
                TraceEventType::ContextAdmission,
                json!({
                    "capsule_id": capsule.id,
                    "layer": capsule.layer.as_str(),
                    "score": scored.score,
                    "admission": reason.admission,
                    "layer_budget": reason.layer_budget,
                    "layer_slot": reason.layer_slot,
                    "dominant_factors": reason.dominant_factors,
                }),
            );

            items.push(RetrievedItem {
                capsule_id: capsule.id,
                run_id: capsule.run_id,
                text: capsule.text.clone(),
                source: capsule.source.clone(),
                layer: capsule.layer,
                is_summary: capsule.is_summary,
                score: scored.score,
                admission: reason.admission,
                dominant_factors: reason.dominant_factors,
                breakdown: reason.factors,
            });
        }
        Ok(items)
    }
}
