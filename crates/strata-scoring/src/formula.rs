use strata_core::capsule::Capsule;
use strata_core::config::ScoringConfig;
use strata_core::models::{FactorContribution, ScoreBreakdown};

use crate::factors::{self, QueryContext};

/// Weighted blend of six positive factors, penalties subtracted afterwards,
/// scaled by the layer weight.
///
/// ```text
/// blend = 0.46·semantic + 0.17·decay + 0.08·access
///       + 0.08·trust + 0.08·consolidation + 0.07·min(1, project_match)
/// final = max(0, blend − duplicate_penalty − conflict_penalty) × layer_weight
/// ```
pub fn compute_breakdown(
    capsule: &Capsule,
    vector: &[f32],
    ctx: &QueryContext,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let w = &config.weights;

    let semantic = factors::semantic::cosine(&ctx.query_vector, vector);
    let decay_base = config.decay_base(capsule.decay_class);
    let decay = factors::temporal::calculate(capsule, decay_base, ctx.now);
    let access = factors::access::calculate(capsule.retrieval_count, config.access_saturation);
    let trust = capsule.trust_score.clamp(0.0, 1.0);
    let consolidation = capsule.consolidation_score.clamp(0.0, 1.0);
    let project_match = factors::affinity::project_match(capsule, ctx, config);

    let contributions = vec![
        contribution("semantic", semantic, w.semantic),
        contribution("decay", decay, w.decay),
        contribution("access", access, w.access),
        contribution("trust", trust, w.trust),
        contribution("consolidation", consolidation, w.consolidation),
        contribution("project_match", project_match.min(1.0), w.project),
    ];
    let blend: f64 = contributions.iter().map(|c| c.contribution).sum();

    let duplicate_penalty = factors::penalties::duplicate(capsule, config);
    let conflict_penalty = factors::penalties::conflict(capsule, config);
    let layer_weight = config.layer_weight(capsule.layer);
    let final_score = (blend - duplicate_penalty - conflict_penalty).max(0.0) * layer_weight;

    ScoreBreakdown {
        semantic,
        decay,
        access,
        trust,
        consolidation,
        project_match,
        layer_weight,
        duplicate_penalty,
        conflict_penalty,
        blend,
        source_weight: 1.0,
        graph_boost: 0.0,
        contributions,
        final_score,
    }
}

/// Final score only.
pub fn compute(
    capsule: &Capsule,
    vector: &[f32],
    ctx: &QueryContext,
    config: &ScoringConfig,
) -> f64 {
    compute_breakdown(capsule, vector, ctx, config).final_score
}

fn contribution(factor: &str, value: f64, weight: f64) -> FactorContribution {
    FactorContribution {
        factor: factor.to_string(),
        value,
        contribution: value * weight,
    }
}
