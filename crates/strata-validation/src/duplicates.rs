//! Duplicate clusters keyed by canonical hash, and retrieval-time suppression.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use strata_core::capsule::Capsule;
use strata_core::models::DuplicateCluster;

use crate::canonical::canonical_hash;

/// Result of placing one capsule in its cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateAssignment {
    pub cluster: DuplicateCluster,
    /// The capsule was not in this cluster before.
    pub newly_joined: bool,
    /// Duplicate score written to the members.
    pub duplicate_score: f64,
}

impl DuplicateAssignment {
    /// A capsule joined a cluster that already held a different text copy.
    pub fn is_new_duplicate(&self) -> bool {
        self.newly_joined && self.cluster.has_duplicates()
    }
}

/// Score for members of a cluster of `cluster_size`.
pub fn member_score(cluster_size: usize, duplicate_score: f64) -> f64 {
    if cluster_size > 1 {
        duplicate_score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Keep the first item per canonical hash. Input must already be in
/// preference order. Returns the kept items and how many were dropped.
pub fn suppress<T, F>(items: Vec<T>, capsule_of: F) -> (Vec<T>, usize)
where
    F: Fn(&T) -> &Capsule,
{
    let mut seen_hashes = HashSet::new();
    let mut seen_clusters = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = 0;
    for item in items {
        let capsule = capsule_of(&item);
        let fresh_hash = seen_hashes.insert(canonical_hash(&capsule.text));
        let fresh_cluster = match capsule.duplicate_cluster_id {
            Some(cluster) => seen_clusters.insert(cluster),
            None => true,
        };
        if fresh_hash && fresh_cluster {
            kept.push(item);
        } else {
            dropped += 1;
        }
    }
    (kept, dropped)
}
