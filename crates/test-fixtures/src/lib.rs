//! Test fixtures shared across the workspace: golden JSON datasets, capsule
//! builders, a deterministic embedder, and scripted worker transports.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use strata_core::capsule::{ArchiveStatus, Capsule, DecayClass, MemoryLayer, NewCapsule};
use strata_core::errors::{EmbeddingError, StrataResult, WorkerError};
use strata_core::models::WorkerRequest;
use strata_core::traits::{IEmbeddingProvider, IWorkerTransport};

// =============================================================================
// Golden fixtures
// =============================================================================

/// Root of the golden fixture directory.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load and deserialize a JSON fixture file.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> anyhow::Result<T> {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse fixture {}", path.display()))
}

/// Load a fixture file as raw JSON.
pub fn load_fixture_value(relative_path: &str) -> anyhow::Result<serde_json::Value> {
    load_fixture(relative_path)
}

// =============================================================================
// Capsule builders
// =============================================================================

/// An unsaved chat capsule for run `run_id`.
pub fn make_new_capsule(run_id: i64, text: &str) -> NewCapsule {
    NewCapsule::new(run_id, text, "chat")
}

/// A stored-looking capsule for pure scoring/graph tests.
pub fn make_capsule(id: i64, text: &str, layer: MemoryLayer) -> Capsule {
    make_capsule_at(id, text, layer, Utc::now())
}

/// Like [`make_capsule`] with an explicit creation time.
pub fn make_capsule_at(
    id: i64,
    text: &str,
    layer: MemoryLayer,
    created_at: DateTime<Utc>,
) -> Capsule {
    Capsule {
        id,
        run_id: 1,
        attachment_id: None,
        source: "chat".to_string(),
        source_type: "chunk".to_string(),
        chunk_index: 0,
        text: text.to_string(),
        tags: Vec::new(),
        project_key: None,
        session_key: None,
        is_summary: false,
        layer,
        decay_class: DecayClass::Medium,
        archive_status: if layer == MemoryLayer::L5Cold {
            ArchiveStatus::Cold
        } else {
            ArchiveStatus::Active
        },
        confidence: 0.6,
        consolidation_score: 0.5,
        trust_score: 0.5,
        recency_score: 1.0,
        retrieval_count: 0,
        success_count: 0,
        failure_count: 0,
        contradiction_flag: false,
        duplicate_cluster_id: None,
        duplicate_score: 0.0,
        parent_capsule_id: None,
        lineage_root_id: None,
        created_from_run_id: Some(1),
        created_at,
        last_accessed_at: None,
        last_used_at: None,
    }
}

/// A one-hot vector.
pub fn unit_vector(dims: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims.max(1)];
    let len = v.len();
    v[axis % len] = 1.0;
    v
}

/// Text of roughly `len` characters made of distinct numbered sentences.
pub fn long_text(len: usize) -> String {
    let mut out = String::with_capacity(len + 64);
    let mut i = 0;
    while out.len() < len {
        out.push_str(&format!("Sentence number {i} records a distinct observation. "));
        i += 1;
    }
    out.truncate(len);
    out
}

// =============================================================================
// StaticEmbedder
// =============================================================================

/// Deterministic embedder. Registered texts map to fixed vectors; any other
/// text becomes a normalized bag of words over byte-sum buckets.
pub struct StaticEmbedder {
    dims: usize,
    fixed: HashMap<String, Vec<f32>>,
    fail: bool,
    batch_calls: AtomicUsize,
}

impl StaticEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims: dims.max(1),
            fixed: HashMap::new(),
            fail: false,
            batch_calls: AtomicUsize::new(0),
        }
    }

    /// An embedder whose every call fails with `ProviderUnavailable`.
    pub fn failing(dims: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(dims)
        }
    }

    /// Pin the vector returned for `text`.
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.fixed.insert(text.to_string(), vector);
        self
    }

    /// Number of `embed_batch` calls so far.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::Relaxed)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.fixed.get(text) {
            return v.clone();
        }
        let mut v = vec![0.0f32; self.dims];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let bucket = word.bytes().map(|b| b as usize).sum::<usize>() % self.dims;
            v[bucket] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }

    fn unavailable() -> strata_core::errors::StrataError {
        EmbeddingError::ProviderUnavailable {
            provider: "static-failing".to_string(),
        }
        .into()
    }
}

impl IEmbeddingProvider for StaticEmbedder {
    fn embed(&self, text: &str) -> StrataResult<Vec<f32>> {
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> StrataResult<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "static"
    }

    fn is_available(&self) -> bool {
        !self.fail
    }
}

// =============================================================================
// Worker transports
// =============================================================================

/// Worker transport that replays scripted results in order and records
/// every request. When the script runs out it reports `Unavailable`.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<StrataResult<serde_json::Value>>>,
    requests: Mutex<Vec<WorkerRequest>>,
    workers: usize,
}

impl ScriptedTransport {
    pub fn new(script: Vec<StrataResult<serde_json::Value>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            workers: 1,
        }
    }

    /// Every call succeeds with `result`.
    pub fn always_ok(result: serde_json::Value, calls: usize) -> Self {
        Self::new((0..calls).map(|_| Ok(result.clone())).collect())
    }

    /// Every call times out.
    pub fn always_timeout(calls: usize) -> Self {
        Self::new(
            (0..calls)
                .map(|_| {
                    Err(WorkerError::Timeout {
                        url: "http://worker.test".to_string(),
                        timeout_ms: 12_000,
                    }
                    .into())
                })
                .collect(),
        )
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<WorkerRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl IWorkerTransport for ScriptedTransport {
    fn execute(&self, request: &WorkerRequest) -> StrataResult<serde_json::Value> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.unwrap_or_else(|| {
            Err(WorkerError::Unavailable {
                reason: "script exhausted".to_string(),
            }
            .into())
        })
    }

    fn worker_count(&self) -> usize {
        self.workers
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
