use serde::{Deserialize, Serialize};

use super::defaults;

/// Lifecycle maintenance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Utility at or above which a capsule moves one tier hotter.
    pub promote_threshold: f64,
    /// Utility at or below which a capsule moves one tier colder.
    pub demote_threshold: f64,
    /// Durable/sparse capsules older than this descend toward `L5_COLD`.
    pub archive_after_days: i64,
    /// Text length that makes a capsule refinable on demand.
    pub refine_min_chars: usize,
    /// Text length that makes a capsule refinable during a sweep.
    pub sweep_refine_min_chars: usize,
    /// Refine during sweeps.
    pub refine_on_sweep: bool,
    pub refine_max_children: usize,
    pub child_max_chars: usize,
    pub summary_max_chars: usize,
    /// Leading chunks joined into the refinement summary.
    pub summary_sentences: usize,
    /// Timer interval for scheduled sweeps (seconds).
    pub interval_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            promote_threshold: defaults::DEFAULT_PROMOTE_THRESHOLD,
            demote_threshold: defaults::DEFAULT_DEMOTE_THRESHOLD,
            archive_after_days: defaults::DEFAULT_ARCHIVE_AFTER_DAYS,
            refine_min_chars: defaults::DEFAULT_REFINE_MIN_CHARS,
            sweep_refine_min_chars: defaults::DEFAULT_SWEEP_REFINE_MIN_CHARS,
            refine_on_sweep: true,
            refine_max_children: defaults::DEFAULT_REFINE_MAX_CHILDREN,
            child_max_chars: defaults::DEFAULT_CHILD_MAX_CHARS,
            summary_max_chars: defaults::DEFAULT_SUMMARY_MAX_CHARS,
            summary_sentences: defaults::DEFAULT_SUMMARY_SENTENCES,
            interval_secs: defaults::DEFAULT_MAINTENANCE_INTERVAL_SECS,
        }
    }
}
