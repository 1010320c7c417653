//! # strata-observability
//!
//! Two separate channels:
//! - the **run trace**: structured events persisted through an [`ITraceSink`]
//!   and read back per run ([`TraceRecorder`]);
//! - **logs**: `tracing` spans and events, installed by
//!   [`tracing_setup::init_tracing`].
//!
//! Plus the memory health report.
//!
//! [`ITraceSink`]: strata_core::traits::ITraceSink

pub mod health;
pub mod memory_sink;
pub mod recorder;
pub mod tracing_setup;

pub use health::{HealthReporter, HealthStatus, MemoryHealthReport};
pub use memory_sink::InMemoryTraceSink;
pub use recorder::TraceRecorder;
