//! # strata-maintenance
//!
//! The lifecycle sweep. Each pass recomputes utility per capsule and moves it
//! at most one tier, archives stale durable memories, splits oversized or
//! contradicted capsules into lineage-linked children, refreshes duplicate
//! clusters, prunes weak edges, and re-runs conflict detection for a run.
//!
//! A sweep may be offered to an external worker first; any worker failure
//! falls back to running it here.

pub mod cancellation;
pub mod engine;
pub mod refinement;
pub mod schedule;
pub mod transitions;
pub mod utility;

pub use cancellation::CancellationToken;
pub use engine::MaintenanceEngine;
pub use refinement::RefinementOutcome;
pub use schedule::MaintenanceSchedule;
pub use transitions::{Transition, TransitionKind};
