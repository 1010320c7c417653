//! Refinement: split an oversized or contradicted capsule into lineage-linked
//! children plus a summary. The parent is kept.

pub mod splitter;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use strata_core::capsule::{Capsule, CapsuleId, DecayClass, MemoryLayer, NewCapsule};
use strata_core::config::MaintenanceConfig;
use strata_core::constants::{SOURCE_TYPE_REFINEMENT, SOURCE_TYPE_REFINEMENT_SUMMARY};

/// Ids written by one refinement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementOutcome {
    pub parent_id: CapsuleId,
    pub child_ids: Vec<CapsuleId>,
    pub summary_id: CapsuleId,
}

/// Unsaved capsules derived from one parent.
#[derive(Debug, Clone)]
pub struct RefinementPlan {
    pub children: Vec<NewCapsule>,
    pub summary: NewCapsule,
}

impl RefinementPlan {
    /// Children first, summary last.
    pub fn into_rows(self) -> Vec<NewCapsule> {
        let mut rows = self.children;
        rows.push(self.summary);
        rows
    }
}

/// On-demand eligibility: long text or a contradiction flag.
pub fn is_refinable(capsule: &Capsule, config: &MaintenanceConfig) -> bool {
    capsule.contradiction_flag || capsule.text.chars().count() >= config.refine_min_chars
}

/// Sweep eligibility: active and strictly over the sweep length.
pub fn is_sweep_refinable(capsule: &Capsule, config: &MaintenanceConfig) -> bool {
    config.refine_on_sweep
        && !capsule.is_cold()
        && capsule.text.chars().count() > config.sweep_refine_min_chars
}

/// Plan the split. `None` when the text yields fewer than two sentences.
pub fn plan(capsule: &Capsule, config: &MaintenanceConfig) -> Option<RefinementPlan> {
    let sentences = splitter::split_sentences(&capsule.text);
    if sentences.len() < 2 {
        return None;
    }
    let now = Utc::now();
    let root = capsule.lineage_root();

    let derive = |text: String, source_type: &str| {
        let mut derived = NewCapsule::new(capsule.run_id, text, capsule.source.as_str())
            .with_keys(capsule.project_key.clone(), capsule.session_key.clone())
            .with_created_at(now);
        derived.attachment_id = capsule.attachment_id;
        derived.tags = capsule.tags.clone();
        derived.source_type = source_type.to_string();
        derived.trust_score = capsule.trust_score;
        derived.parent_capsule_id = Some(capsule.id);
        derived.lineage_root_id = Some(root);
        derived
    };

    let children = group(&sentences, config.refine_max_children)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let text = splitter::truncate_chars(&text, config.child_max_chars);
            let mut child = derive(text, SOURCE_TYPE_REFINEMENT)
                .with_layer(MemoryLayer::L2Session)
                .with_decay_class(DecayClass::Medium);
            child.chunk_index = i as u32;
            child.confidence = (capsule.confidence * 0.95).max(0.45);
            child.consolidation_score = (capsule.consolidation_score * 0.9).max(0.45);
            child
        })
        .collect();

    let lead = sentences
        .iter()
        .take(config.summary_sentences.max(1))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let lead = splitter::truncate_chars(&lead, config.summary_max_chars);
    let mut summary = derive(lead, SOURCE_TYPE_REFINEMENT_SUMMARY)
        .with_layer(MemoryLayer::L1Short)
        .with_decay_class(DecayClass::Long);
    summary.is_summary = true;
    summary.confidence = (capsule.confidence + 0.1).min(1.0);
    summary.consolidation_score = (capsule.consolidation_score + 0.2).min(1.0);

    Some(RefinementPlan { children, summary })
}

/// Pack sentences into at most `max_groups` contiguous groups of near-equal
/// sentence count.
fn group(sentences: &[String], max_groups: usize) -> Vec<String> {
    let groups = max_groups.clamp(1, sentences.len());
    let per_group = sentences.len().div_ceil(groups);
    sentences.chunks(per_group).map(|chunk| chunk.join(" ")).collect()
}
