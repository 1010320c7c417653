//! # strata-runtime
//!
//! [`MemoryRuntime`] owns the capsule store and every engine, and exposes the
//! memory query API: ingest, search, feedback, lifecycle operations and the
//! read-only inspection views.

pub mod runtime;
pub mod views;

pub use runtime::{MemoryRuntime, RuntimeOptions};
pub use views::{CapsuleDetail, Lineage};
