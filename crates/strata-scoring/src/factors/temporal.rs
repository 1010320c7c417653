use chrono::{DateTime, Utc};

use strata_core::capsule::Capsule;

/// Temporal decay factor: `base ^ hours_since_creation`.
///
/// Range: 0.0 – 1.0. Capsules created in the future count as brand new.
pub fn calculate(capsule: &Capsule, base: f64, now: DateTime<Utc>) -> f64 {
    let hours = (now - capsule.created_at).num_seconds().max(0) as f64 / 3600.0;
    base.clamp(0.0, 1.0).powf(hours)
}
