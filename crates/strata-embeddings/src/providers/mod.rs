//! Provider construction from config.

pub mod hashing;
#[cfg(feature = "http")]
pub mod ollama;

pub use hashing::HashingProvider;
#[cfg(feature = "http")]
pub use ollama::OllamaProvider;

use strata_core::config::EmbeddingConfig;
use strata_core::errors::{ConfigError, StrataResult};
use strata_core::traits::IEmbeddingProvider;
use tracing::info;

/// Build the configured provider. Unknown names are a configuration error;
/// an unreachable HTTP provider is returned anyway and fails per call.
pub fn create_provider(config: &EmbeddingConfig) -> StrataResult<Box<dyn IEmbeddingProvider>> {
    match config.provider.as_str() {
        "hashing" => Ok(Box::new(HashingProvider::new(config.dimensions))),
        #[cfg(feature = "http")]
        "ollama" => {
            let provider = OllamaProvider::new(config)?;
            let healthy = provider.health_check();
            info!(model = %config.model, healthy, "ollama provider configured");
            Ok(Box::new(provider))
        }
        other => {
            info!(provider = other, "unsupported embedding provider");
            Err(ConfigError::UnknownVariant {
                field: "embedding.provider".to_string(),
                value: other.to_string(),
            }
            .into())
        }
    }
}
