//! Single-step layer transitions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use strata_core::capsule::{ArchiveStatus, Capsule, CapsuleId, MemoryLayer};
use strata_core::config::MaintenanceConfig;
use strata_core::models::TraceEventType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Promote,
    Demote,
    /// Age-driven descent of durable/sparse capsules toward cold storage.
    Archive,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Promote => "promote",
            TransitionKind::Demote => "demote",
            TransitionKind::Archive => "archive",
        }
    }

    pub fn trace_event(self) -> TraceEventType {
        match self {
            TransitionKind::Promote => TraceEventType::MemoryPromotion,
            TransitionKind::Demote => TraceEventType::MemoryDemotion,
            TransitionKind::Archive => TraceEventType::MemoryArchival,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub capsule_id: CapsuleId,
    pub from: MemoryLayer,
    pub to: MemoryLayer,
    pub kind: TransitionKind,
    pub utility: Option<f64>,
}

impl Transition {
    /// `L5_COLD` is always cold; every other layer is active.
    pub fn archive_status(&self) -> ArchiveStatus {
        if self.to == MemoryLayer::L5Cold {
            ArchiveStatus::Cold
        } else {
            ArchiveStatus::Active
        }
    }
}

/// The one transition a sweep applies to `capsule`, if any. Archive descent
/// wins over promotion, promotion over demotion.
pub fn plan(
    capsule: &Capsule,
    utility: f64,
    config: &MaintenanceConfig,
    now: DateTime<Utc>,
) -> Option<Transition> {
    let from = capsule.layer;
    let make = |to: MemoryLayer, kind| Transition {
        capsule_id: capsule.id,
        from,
        to,
        kind,
        utility: Some(utility),
    };

    let stale = now - capsule.created_at > Duration::days(config.archive_after_days);
    if stale {
        match from {
            MemoryLayer::L3Durable | MemoryLayer::L4Sparse => {
                return from.colder().map(|to| make(to, TransitionKind::Archive));
            }
            // Archived and past retention: only a manual promote revives it.
            MemoryLayer::L5Cold => return None,
            _ => {}
        }
    }
    if utility >= config.promote_threshold {
        if let Some(to) = from.hotter() {
            return Some(make(to, TransitionKind::Promote));
        }
    }
    if utility <= config.demote_threshold {
        if let Some(to) = from.colder() {
            return Some(make(to, TransitionKind::Demote));
        }
    }
    None
}

/// A manual one-tier move. `None` at either end of the order.
pub fn manual(capsule: &Capsule, kind: TransitionKind) -> Option<Transition> {
    let to = match kind {
        TransitionKind::Promote => capsule.layer.hotter(),
        TransitionKind::Demote | TransitionKind::Archive => capsule.layer.colder(),
    }?;
    Some(Transition {
        capsule_id: capsule.id,
        from: capsule.layer,
        to,
        kind,
        utility: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::{make_capsule, make_capsule_at};

    fn config() -> MaintenanceConfig {
        MaintenanceConfig::default()
    }

    #[test]
    fn high_utility_promotes_one_tier() {
        let c = make_capsule(1, "x", MemoryLayer::L3Durable);
        let t = plan(&c, 0.9, &config(), Utc::now()).unwrap();
        assert_eq!(
            (t.from, t.to, t.kind),
            (MemoryLayer::L3Durable, MemoryLayer::L2Session, TransitionKind::Promote)
        );
        let hot = make_capsule(2, "x", MemoryLayer::L0Hot);
        assert!(plan(&hot, 0.9, &config(), Utc::now()).is_none());
    }

    #[test]
    fn low_utility_demotes_into_cold() {
        let c = make_capsule(1, "x", MemoryLayer::L4Sparse);
        let t = plan(&c, 0.1, &config(), Utc::now()).unwrap();
        assert_eq!(t.to, MemoryLayer::L5Cold);
        assert_eq!(t.archive_status(), ArchiveStatus::Cold);
        let cold = make_capsule(2, "x", MemoryLayer::L5Cold);
        assert!(plan(&cold, 0.1, &config(), Utc::now()).is_none());
    }

    #[test]
    fn neutral_utility_stays() {
        let c = make_capsule(1, "x", MemoryLayer::L2Session);
        assert!(plan(&c, 0.4, &config(), Utc::now()).is_none());
    }

    #[test]
    fn stale_durable_descends_even_when_useful() {
        let old = Utc::now() - Duration::days(45);
        let durable = make_capsule_at(1, "x", MemoryLayer::L3Durable, old);
        let t = plan(&durable, 0.95, &config(), Utc::now()).unwrap();
        assert_eq!((t.to, t.kind), (MemoryLayer::L4Sparse, TransitionKind::Archive));

        let sparse = make_capsule_at(2, "x", MemoryLayer::L4Sparse, old);
        let t = plan(&sparse, 0.5, &config(), Utc::now()).unwrap();
        assert_eq!(t.to, MemoryLayer::L5Cold);

        let session = make_capsule_at(3, "x", MemoryLayer::L2Session, old);
        assert!(plan(&session, 0.5, &config(), Utc::now()).is_none());
    }

    #[test]
    fn stale_cold_capsule_is_never_promoted() {
        let old = Utc::now() - Duration::days(45);
        let cold = make_capsule_at(1, "x", MemoryLayer::L5Cold, old);
        assert!(plan(&cold, 0.95, &config(), Utc::now()).is_none());

        let fresh = make_capsule(2, "x", MemoryLayer::L5Cold);
        let t = plan(&fresh, 0.95, &config(), Utc::now()).unwrap();
        assert_eq!(t.to, MemoryLayer::L4Sparse);
    }

    #[test]
    fn promotion_out_of_cold_reactivates() {
        let c = make_capsule(1, "x", MemoryLayer::L5Cold);
        let t = manual(&c, TransitionKind::Promote).unwrap();
        assert_eq!(t.to, MemoryLayer::L4Sparse);
        assert_eq!(t.archive_status(), ArchiveStatus::Active);
    }
}
