//! Initial layer and decay class for freshly ingested capsules.
//!
//! Ephemeral sources stay hot, profile-like sources stay durable, and bulk
//! documents longer than the summary threshold start cold.

use strata_core::capsule::{DecayClass, MemoryLayer};
use strata_core::config::IngestConfig;

/// Source-label classification, built once from [`IngestConfig`].
#[derive(Debug, Clone)]
pub struct LayerPolicy {
    ephemeral: Vec<String>,
    durable: Vec<String>,
    bulk: Vec<String>,
    long_document_chars: usize,
}

impl LayerPolicy {
    pub fn new(config: &IngestConfig) -> Self {
        let lower = |items: &[String]| -> Vec<String> {
            items.iter().map(|s| s.trim().to_lowercase()).collect()
        };
        Self {
            ephemeral: lower(&config.ephemeral_sources),
            durable: lower(&config.durable_sources),
            bulk: lower(&config.bulk_sources),
            long_document_chars: config.summary_threshold_chars,
        }
    }

    /// Layer for a chunk of a document whose normalized length is `document_chars`.
    pub fn initial_layer(
        &self,
        source: &str,
        is_summary: bool,
        document_chars: usize,
    ) -> MemoryLayer {
        let source = source.trim().to_lowercase();
        if matches_any(&source, &self.ephemeral) {
            MemoryLayer::L0Hot
        } else if is_summary {
            MemoryLayer::L1Short
        } else if matches_any(&source, &self.durable) {
            MemoryLayer::L3Durable
        } else if matches_any(&source, &self.bulk) && document_chars > self.long_document_chars {
            MemoryLayer::L5Cold
        } else {
            MemoryLayer::L2Session
        }
    }

    pub fn decay_class(&self, source: &str, is_summary: bool) -> DecayClass {
        let source = source.trim().to_lowercase();
        if matches_any(&source, &self.ephemeral) {
            DecayClass::Short
        } else if is_summary {
            DecayClass::Medium
        } else if matches_any(&source, &self.durable) || matches_any(&source, &self.bulk) {
            DecayClass::Long
        } else {
            DecayClass::Medium
        }
    }
}

impl Default for LayerPolicy {
    fn default() -> Self {
        Self::new(&IngestConfig::default())
    }
}

/// Exact label, or the label followed by `_` / `:` (e.g. `tool_output`, `file:report.pdf`).
fn matches_any(source: &str, labels: &[String]) -> bool {
    labels.iter().any(|label| {
        source == label
            || source
                .strip_prefix(label.as_str())
                .is_some_and(|rest| rest.starts_with('_') || rest.starts_with(':'))
    })
}
