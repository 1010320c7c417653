//! Prune weak, rarely used edges.

use strata_core::config::GraphConfig;
use strata_core::errors::StrataResult;
use strata_core::models::MemoryEdge;
use strata_core::traits::IEdgeStorage;

/// An edge is prunable when it is both light and rarely used.
pub fn is_prunable(edge: &MemoryEdge, config: &GraphConfig) -> bool {
    edge.weight < config.prune_weight_below && edge.usage_count < config.prune_usage_below
}

/// Delete every prunable edge. Returns the number removed.
pub fn prune_weak_edges(store: &dyn IEdgeStorage, config: &GraphConfig) -> StrataResult<usize> {
    let removed = store.prune_edges(config.prune_weight_below, config.prune_usage_below)?;
    if removed > 0 {
        tracing::debug!(removed, "pruned weak edges");
    }
    Ok(removed)
}
