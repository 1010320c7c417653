pub mod admission_config;
pub mod defaults;
pub mod embedding_config;
pub mod graph_config;
pub mod ingest_config;
pub mod layer_map;
pub mod maintenance_config;
pub mod observability_config;
pub mod scoring_config;
pub mod storage_config;
pub mod validation_config;
pub mod worker_config;

pub use admission_config::AdmissionConfig;
pub use embedding_config::EmbeddingConfig;
pub use graph_config::GraphConfig;
pub use ingest_config::IngestConfig;
pub use maintenance_config::MaintenanceConfig;
pub use observability_config::ObservabilityConfig;
pub use scoring_config::{ScoringConfig, ScoringWeights};
pub use storage_config::StorageConfig;
pub use validation_config::ValidationConfig;
pub use worker_config::WorkerConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, StrataResult};

/// Environment variable holding a JSON object of layer weights.
pub const ENV_LAYER_WEIGHTS: &str = "STRATA_LAYER_WEIGHTS";
/// Environment variable holding a JSON object of layer budgets.
pub const ENV_LAYER_BUDGETS: &str = "STRATA_LAYER_BUDGETS";
/// Environment variable holding comma-separated worker URLs.
pub const ENV_WORKER_URLS: &str = "STRATA_WORKER_URLS";
/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "STRATA_DB_PATH";

/// Top-level configuration aggregating all subsystem configs.
///
/// Built once and handed to each component at construction; nothing reads
/// configuration from global state afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub ingest: IngestConfig,
    pub scoring: ScoringConfig,
    pub admission: AdmissionConfig,
    pub graph: GraphConfig,
    pub validation: ValidationConfig,
    pub maintenance: MaintenanceConfig,
    pub workers: WorkerConfig,
    pub observability: ObservabilityConfig,
}

impl StrataConfig {
    /// Load config from a TOML string. Missing fields use defaults.
    pub fn from_toml(toml_str: &str) -> StrataResult<Self> {
        toml::from_str(toml_str).map_err(|e| {
            ConfigError::Malformed {
                field: "strata config".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Like [`from_toml`](Self::from_toml), but falls back to defaults on malformed input.
    pub fn from_toml_lenient(toml_str: &str) -> Self {
        Self::from_toml(toml_str).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "malformed configuration, using defaults");
            Self::default()
        })
    }

    /// Apply `STRATA_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Malformed values are logged
    /// and leave the existing setting untouched.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_LAYER_WEIGHTS) {
            match layer_map::parse_json::<f64>(ENV_LAYER_WEIGHTS, &raw) {
                Ok(map) => self.scoring.layer_weights = map,
                Err(e) => tracing::warn!(error = %e, "ignoring layer weight override"),
            }
        }
        if let Some(raw) = lookup(ENV_LAYER_BUDGETS) {
            match layer_map::parse_json::<usize>(ENV_LAYER_BUDGETS, &raw) {
                Ok(map) => self.admission.layer_budgets = map,
                Err(e) => tracing::warn!(error = %e, "ignoring layer budget override"),
            }
        }
        if let Some(raw) = lookup(ENV_WORKER_URLS) {
            self.workers.urls = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/').to_string())
                .collect();
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            if !path.trim().is_empty() {
                self.storage.db_path = path;
            }
        }
    }
}
