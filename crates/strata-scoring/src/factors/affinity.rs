use strata_core::capsule::Capsule;
use strata_core::config::ScoringConfig;

use super::QueryContext;

/// Project affinity. A project match returns the configured boost (above 1
/// by default); otherwise a session match returns the session value.
pub fn project_match(capsule: &Capsule, ctx: &QueryContext, config: &ScoringConfig) -> f64 {
    if keys_match(capsule.project_key.as_deref(), ctx.project_key.as_deref()) {
        config.project_match_boost
    } else if keys_match(capsule.session_key.as_deref(), ctx.session_key.as_deref()) {
        config.session_match
    } else {
        0.0
    }
}

fn keys_match(stored: Option<&str>, query: Option<&str>) -> bool {
    matches!((stored, query), (Some(a), Some(b)) if !a.is_empty() && a == b)
}
