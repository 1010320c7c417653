use chrono::{Duration, Utc};
use proptest::prelude::*;
use strata_core::capsule::{DecayClass, MemoryLayer};
use strata_scoring::{QueryContext, ScoringEngine};
use test_fixtures::{make_capsule_at, unit_vector};

fn arb_decay_class() -> impl Strategy<Value = DecayClass> {
    prop_oneof![
        Just(DecayClass::Short),
        Just(DecayClass::Medium),
        Just(DecayClass::Long),
    ]
}

fn arb_layer() -> impl Strategy<Value = MemoryLayer> {
    (0usize..6).prop_map(|i| MemoryLayer::ALL[i])
}

// ── More recent never scores lower ───────────────────────────────────────

proptest! {
    #[test]
    fn recency_is_monotonic(
        class in arb_decay_class(),
        layer in arb_layer(),
        newer_hours in 0i64..5_000,
        gap_hours in 0i64..5_000,
        axis in 0usize..4,
    ) {
        let engine = ScoringEngine::default();
        let now = Utc::now();
        let mut newer = make_capsule_at(1, "same", layer, now - Duration::hours(newer_hours));
        newer.decay_class = class;
        let mut older = newer.clone();
        older.created_at = newer.created_at - Duration::hours(gap_hours);

        let ctx = QueryContext::new(unit_vector(4, 0)).at(now);
        let v = unit_vector(4, axis);
        let (a, _) = engine.score(&newer, &v, &ctx);
        let (b, _) = engine.score(&older, &v, &ctx);
        prop_assert!(a >= b);
    }
}

// ── Scores are finite and never negative ─────────────────────────────────

proptest! {
    #[test]
    fn score_is_non_negative(
        trust in 0.0f64..1.0,
        consolidation in 0.0f64..1.0,
        dup in 0.0f64..1.0,
        flagged in any::<bool>(),
        retrievals in 0u64..100,
        layer in arb_layer(),
        q in prop::collection::vec(-1.0f32..1.0, 1..8),
        v in prop::collection::vec(-1.0f32..1.0, 0..8),
    ) {
        let engine = ScoringEngine::default();
        let mut capsule = make_capsule_at(1, "x", layer, Utc::now());
        capsule.trust_score = trust;
        capsule.consolidation_score = consolidation;
        capsule.duplicate_score = dup;
        capsule.contradiction_flag = flagged;
        capsule.retrieval_count = retrievals;

        let (score, b) = engine.score(&capsule, &v, &QueryContext::new(q));
        prop_assert!(score.is_finite());
        prop_assert!(score >= 0.0);
        prop_assert!((0.0..=1.0).contains(&b.semantic));
    }
}
