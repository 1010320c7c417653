use serde::{Deserialize, Serialize};

use super::defaults;

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Chunking and initial-layer policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Sliding window size (chars).
    pub window_chars: usize,
    /// Overlap between consecutive windows (chars).
    pub overlap_chars: usize,
    /// Documents longer than this get a leading summary window.
    pub summary_threshold_chars: usize,
    /// Size of the summary window (chars).
    pub summary_window_chars: usize,
    /// Sources that start in `L0_HOT`.
    pub ephemeral_sources: Vec<String>,
    /// Sources that start in `L3_DURABLE`.
    pub durable_sources: Vec<String>,
    /// Bulk-document sources; long ones start in `L5_COLD`.
    pub bulk_sources: Vec<String>,
}

impl IngestConfig {
    /// Cursor advance between windows. Never zero.
    pub fn step(&self) -> usize {
        self.window_chars.saturating_sub(self.overlap_chars).max(1)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            window_chars: defaults::DEFAULT_WINDOW_CHARS,
            overlap_chars: defaults::DEFAULT_OVERLAP_CHARS,
            summary_threshold_chars: defaults::DEFAULT_SUMMARY_THRESHOLD_CHARS,
            summary_window_chars: defaults::DEFAULT_SUMMARY_WINDOW_CHARS,
            ephemeral_sources: to_strings(defaults::DEFAULT_EPHEMERAL_SOURCES),
            durable_sources: to_strings(defaults::DEFAULT_DURABLE_SOURCES),
            bulk_sources: to_strings(defaults::DEFAULT_BULK_SOURCES),
        }
    }
}
