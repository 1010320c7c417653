use strata_core::capsule::Capsule;

/// `mean((success − failure) / max(1, retrievals), trust, consolidation)`.
pub fn utility(capsule: &Capsule) -> f64 {
    let outcome = (capsule.success_count as f64 - capsule.failure_count as f64)
        / capsule.retrieval_count.max(1) as f64;
    let trust = capsule.trust_score.clamp(0.0, 1.0);
    let consolidation = capsule.consolidation_score.clamp(0.0, 1.0);
    (outcome + trust + consolidation) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::capsule::MemoryLayer;
    use test_fixtures::make_capsule;

    #[test]
    fn fresh_capsule_is_neutral() {
        let c = make_capsule(1, "x", MemoryLayer::L2Session);
        assert!((utility(&c) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn outcomes_are_normalized_by_retrievals() {
        let mut c = make_capsule(1, "x", MemoryLayer::L2Session);
        c.retrieval_count = 4;
        c.success_count = 4;
        c.trust_score = 0.8;
        c.consolidation_score = 0.7;
        assert!((utility(&c) - 2.5 / 3.0).abs() < 1e-12);

        c.success_count = 0;
        c.failure_count = 4;
        c.trust_score = 0.1;
        c.consolidation_score = 0.1;
        assert!(utility(&c) < 0.0);
    }
}
