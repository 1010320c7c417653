use serde::{Deserialize, Serialize};

use super::defaults;

/// Logging and trace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `STRATA_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines.
    pub json_logs: bool,
    /// Maintenance jobs included in the health report.
    pub health_recent_jobs: usize,
    /// Maximum events returned for a run trace.
    pub trace_limit: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
            health_recent_jobs: defaults::DEFAULT_HEALTH_RECENT_JOBS,
            trace_limit: defaults::DEFAULT_TRACE_LIMIT,
        }
    }
}
