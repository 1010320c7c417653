use chrono::Utc;
use proptest::prelude::*;
use strata_core::config::GraphConfig;
use strata_core::models::{EdgeType, MemoryEdge};
use strata_graph::rerank::rerank;
use strata_graph::AffinityGraph;

fn arb_edge() -> impl Strategy<Value = MemoryEdge> {
    (1i64..8, 1i64..8, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0).prop_map(|(from, to, w, c, t)| {
        MemoryEdge {
            id: 0,
            from_capsule_id: from,
            to_capsule_id: to,
            edge_type: EdgeType::CoRetrieval,
            weight: w,
            confidence: c,
            trust_score: t,
            usage_count: 1,
            created_at: Utc::now(),
            last_reinforced_at: Utc::now(),
        }
    })
}

// ── Boosts are non-negative and bounded by the source mass ───────────────

proptest! {
    #[test]
    fn boosts_are_bounded(
        edges in prop::collection::vec(arb_edge(), 0..20),
        scores in prop::collection::vec(0.0f64..2.0, 4),
    ) {
        let graph = AffinityGraph::from_edges(&edges);
        let base: Vec<(i64, f64)> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| (i as i64 + 1, *s))
            .collect();
        let config = GraphConfig::default();
        let out = rerank(&graph, &base, &config);

        let total_mass: f64 =
            base.iter().map(|(_, s)| s).sum::<f64>() * edges.len() as f64 * config.boost_factor;
        for boost in out.boosts.values().chain(out.neighbors.values()) {
            prop_assert!(*boost >= 0.0);
            prop_assert!(*boost <= total_mass + 1e-9);
        }
        for id in out.neighbors.keys() {
            prop_assert!(!base.iter().any(|(b, _)| b == id));
        }
    }
}
