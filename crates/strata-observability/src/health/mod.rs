//! Memory health reporting.

mod reporter;

pub use reporter::{HealthReporter, HealthStatus, MemoryHealthReport};
