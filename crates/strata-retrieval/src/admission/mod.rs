//! Greedy, layer-budgeted admission.

pub mod reason;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use strata_core::capsule::MemoryLayer;
use strata_core::config::AdmissionConfig;
use strata_core::models::AdmissionKind;
use strata_scoring::ScoredCapsule;

/// A ranked candidate with how it got into the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub scored: ScoredCapsule,
    pub kind: AdmissionKind,
}

/// A candidate that won a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmittedCandidate {
    pub candidate: RankedCandidate,
    pub layer_budget: usize,
    /// 1-based position within its layer's budget.
    pub layer_slot: usize,
}

pub struct AdmissionController {
    config: AdmissionConfig,
}

impl AdmissionController {
    pub fn new(config: AdmissionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Effective global cap for a query asking for `top_k` results.
    pub fn cap(&self, top_k: usize) -> usize {
        top_k.min(self.config.max_active_contexts)
    }

    /// Walk `ranked` in order, admitting while the global cap holds and the
    /// candidate's layer is under budget. Skipped candidates do not stop the walk.
    pub fn admit(&self, ranked: Vec<RankedCandidate>, top_k: usize) -> Vec<AdmittedCandidate> {
        let cap = self.cap(top_k);
        let mut per_layer: HashMap<MemoryLayer, usize> = HashMap::new();
        let mut admitted = Vec::with_capacity(cap);

        for candidate in ranked {
            if admitted.len() >= cap {
                break;
            }
            let layer = candidate.scored.capsule.layer;
            let budget = self.config.layer_budget(layer);
            let used = per_layer.entry(layer).or_insert(0);
            if *used >= budget {
                continue;
            }
            *used += 1;
            admitted.push(AdmittedCandidate {
                candidate,
                layer_budget: budget,
                layer_slot: *used,
            });
        }
        admitted
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(AdmissionConfig::default())
    }
}
