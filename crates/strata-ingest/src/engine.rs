//! IngestEngine: chunk, classify, embed in one batch, store atomically.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use strata_core::capsule::{CapsuleId, NewCapsule, RunId};
use strata_core::config::IngestConfig;
use strata_core::constants::{SOURCE_TYPE_CHUNK, SOURCE_TYPE_SUMMARY};
use strata_core::errors::{EmbeddingError, StrataResult};
use strata_core::traits::{ICapsuleStorage, IEmbeddingProvider};
use strata_observability::ingest_span;
use strata_observability::tracing_setup::events;

use crate::chunker;
use crate::layer_policy::LayerPolicy;

/// One document to ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    pub run_id: RunId,
    pub text: String,
    pub source: String,
    pub attachment_id: Option<i64>,
    pub tags: Vec<String>,
    pub project_key: Option<String>,
    pub session_key: Option<String>,
}

impl IngestRequest {
    pub fn new(run_id: RunId, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            run_id,
            text: text.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_attachment(mut self, attachment_id: i64) -> Self {
        self.attachment_id = Some(attachment_id);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_keys(mut self, project_key: Option<String>, session_key: Option<String>) -> Self {
        self.project_key = project_key;
        self.session_key = session_key;
        self
    }
}

/// Ids created by one ingestion, in chunk order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub capsule_ids: Vec<CapsuleId>,
    pub summary_id: Option<CapsuleId>,
}

impl IngestOutcome {
    pub fn created(&self) -> usize {
        self.capsule_ids.len()
    }
}

pub struct IngestEngine {
    store: Arc<dyn ICapsuleStorage>,
    embedder: Arc<dyn IEmbeddingProvider>,
    config: IngestConfig,
    policy: LayerPolicy,
}

impl IngestEngine {
    pub fn new(
        store: Arc<dyn ICapsuleStorage>,
        embedder: Arc<dyn IEmbeddingProvider>,
        config: IngestConfig,
    ) -> Self {
        let policy = LayerPolicy::new(&config);
        Self {
            store,
            embedder,
            config,
            policy,
        }
    }

    pub fn policy(&self) -> &LayerPolicy {
        &self.policy
    }

    /// Ingest one document. Empty text creates nothing. Embedding failures
    /// propagate and leave the store untouched.
    pub fn ingest(&self, request: &IngestRequest) -> StrataResult<IngestOutcome> {
        let span = ingest_span!(request.run_id, request.source);
        let _guard = span.enter();

        let planned = chunker::plan(&request.text, &self.config);
        if planned.is_empty() {
            tracing::debug!(run_id = request.run_id, "empty document, nothing to ingest");
            return Ok(IngestOutcome::default());
        }
        let document_chars = chunker::normalize_whitespace(&request.text).chars().count();

        let texts: Vec<String> = planned.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::BatchMismatch {
                sent: texts.len(),
                received: vectors.len(),
            }
            .into());
        }

        let rows: Vec<(NewCapsule, Vec<f32>)> = planned
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                let layer =
                    self.policy
                        .initial_layer(&request.source, chunk.is_summary, document_chars);
                let decay = self.policy.decay_class(&request.source, chunk.is_summary);
                let mut capsule =
                    NewCapsule::new(request.run_id, chunk.text, request.source.as_str())
                        .with_layer(layer)
                        .with_decay_class(decay)
                        .with_keys(request.project_key.clone(), request.session_key.clone());
                capsule.attachment_id = request.attachment_id;
                capsule.tags = request.tags.clone();
                capsule.chunk_index = chunk.chunk_index;
                capsule.is_summary = chunk.is_summary;
                capsule.source_type = if chunk.is_summary {
                    SOURCE_TYPE_SUMMARY
                } else {
                    SOURCE_TYPE_CHUNK
                }
                .to_string();
                (capsule, vector)
            })
            .collect();

        let model = format!("{}-{}", self.embedder.name(), self.embedder.dimensions());
        let capsule_ids = self.store.insert_capsules(&rows, &model)?;
        let summary_id = rows
            .iter()
            .zip(&capsule_ids)
            .find(|((capsule, _), _)| capsule.is_summary)
            .map(|(_, id)| *id);

        events::capsules_ingested(request.run_id, &request.source, capsule_ids.len());
        Ok(IngestOutcome {
            capsule_ids,
            summary_id,
        })
    }
}
