//! Ollama HTTP embedding provider (`POST {endpoint}/api/embed`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use strata_core::config::EmbeddingConfig;
use strata_core::errors::{EmbeddingError, StrataResult};
use strata_core::traits::IEmbeddingProvider;

pub struct OllamaProvider {
    base_url: String,
    model: String,
    dimensions: usize,
    client: reqwest::blocking::Client,
    available: AtomicBool,
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> StrataResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: format!("ollama: {e}"),
            })?;
        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            client,
            available: AtomicBool::new(false),
        })
    }

    /// Probe `/api/tags`. The provider refuses requests until this passes.
    pub fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let ok = match self.client.get(&url).send() {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "ollama health check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "ollama unreachable");
                false
            }
        };
        self.available.store(ok, Ordering::Relaxed);
        if ok {
            debug!(model = %self.model, "ollama health check passed");
        }
        ok
    }

    fn request_embeddings(&self, texts: &[String]) -> StrataResult<Vec<Vec<f32>>> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
            }
            .into());
        }

        let url = format!("{}/api/embed", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&OllamaEmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("ollama HTTP error: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("ollama returned {status}: {body}"),
            }
            .into());
        }

        let parsed: OllamaEmbedResponse =
            response.json().map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("ollama JSON parse error: {e}"),
            })?;

        Ok(parsed
            .embeddings
            .into_iter()
            .map(|mut v| {
                v.resize(self.dimensions, 0.0);
                v
            })
            .collect())
    }
}

impl IEmbeddingProvider for OllamaProvider {
    fn embed(&self, text: &str) -> StrataResult<Vec<f32>> {
        let results = self.request_embeddings(&[text.to_string()])?;
        results.into_iter().next().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty ollama response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> StrataResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}
