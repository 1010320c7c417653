// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "strata.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashing";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 256;
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "http://127.0.0.1:11434";
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_QUERY_CACHE_CAPACITY: u64 = 2_048;

// --- Capsules ---
pub const DEFAULT_CAPSULE_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_CAPSULE_CONSOLIDATION: f64 = 0.5;
pub const DEFAULT_CAPSULE_TRUST: f64 = 0.5;
pub const DEFAULT_CAPSULE_RECENCY: f64 = 1.0;

// --- Ingestion ---
pub const DEFAULT_WINDOW_CHARS: usize = 850;
pub const DEFAULT_OVERLAP_CHARS: usize = 150;
pub const DEFAULT_SUMMARY_THRESHOLD_CHARS: usize = 4_000;
pub const DEFAULT_SUMMARY_WINDOW_CHARS: usize = 1_000;
pub const DEFAULT_EPHEMERAL_SOURCES: &[&str] =
    &["ephemeral", "tool", "tool_output", "scratch", "scratchpad"];
pub const DEFAULT_DURABLE_SOURCES: &[&str] = &["identity", "profile", "preference", "persona"];
pub const DEFAULT_BULK_SOURCES: &[&str] = &["attachment", "extract", "document", "file", "upload"];

// --- Scoring ---
pub const DEFAULT_WEIGHT_SEMANTIC: f64 = 0.46;
pub const DEFAULT_WEIGHT_DECAY: f64 = 0.17;
pub const DEFAULT_WEIGHT_ACCESS: f64 = 0.08;
pub const DEFAULT_WEIGHT_TRUST: f64 = 0.08;
pub const DEFAULT_WEIGHT_CONSOLIDATION: f64 = 0.08;
pub const DEFAULT_WEIGHT_PROJECT: f64 = 0.07;
pub const DEFAULT_DECAY_BASE_SHORT: f64 = 0.98;
pub const DEFAULT_DECAY_BASE_MEDIUM: f64 = 0.995;
pub const DEFAULT_DECAY_BASE_LONG: f64 = 0.999;
pub const DEFAULT_ACCESS_SATURATION: f64 = 16.0;
pub const DEFAULT_PROJECT_MATCH_BOOST: f64 = 1.25;
pub const DEFAULT_SESSION_MATCH: f64 = 0.8;
pub const DEFAULT_DUPLICATE_PENALTY_WEIGHT: f64 = 0.15;
pub const DEFAULT_CONFLICT_PENALTY: f64 = 0.10;
pub const DEFAULT_LAYER_WEIGHTS: [(&str, f64); 6] = [
    ("L0_HOT", 1.15),
    ("L1_SHORT", 1.08),
    ("L2_SESSION", 1.0),
    ("L3_DURABLE", 0.95),
    ("L4_SPARSE", 0.85),
    ("L5_COLD", 0.6),
];

// --- Admission ---
pub const DEFAULT_MAX_ACTIVE_CONTEXTS: usize = 8;
pub const DEFAULT_TOP_K: usize = 6;
pub const DEFAULT_MIN_SCORE: f64 = 0.10;
pub const DEFAULT_BAND_MULTIPLIER: usize = 3;
pub const DEFAULT_RECENCY_NUDGE: f64 = 0.03;
pub const DEFAULT_DOMINANT_FACTORS: usize = 3;
pub const DEFAULT_LAYER_BUDGETS: [(&str, usize); 6] = [
    ("L0_HOT", 3),
    ("L1_SHORT", 3),
    ("L2_SESSION", 4),
    ("L3_DURABLE", 3),
    ("L4_SPARSE", 2),
    ("L5_COLD", 1),
];

// --- Graph ---
pub const DEFAULT_GRAPH_BOOST_FACTOR: f64 = 0.12;
pub const DEFAULT_NEIGHBOR_ADMISSION_FACTOR: f64 = 0.85;
pub const DEFAULT_EDGE_TRUST_FLOOR: f64 = 0.25;
pub const DEFAULT_CO_RETRIEVAL_FAN: usize = 4;
pub const DEFAULT_CO_RETRIEVAL_WEIGHT: f64 = 0.65;
pub const DEFAULT_CO_RETRIEVAL_CONFIDENCE: f64 = 0.65;
pub const DEFAULT_CO_RETRIEVAL_TRUST: f64 = 0.5;
pub const DEFAULT_REFINEMENT_EDGE_WEIGHT: f64 = 0.6;
pub const DEFAULT_PRUNE_WEIGHT_BELOW: f64 = 0.18;
pub const DEFAULT_PRUNE_USAGE_BELOW: u64 = 2;

// --- Validation ---
pub const DEFAULT_CONTRADICTION_THRESHOLD: f64 = 0.55;
pub const DEFAULT_JACCARD_WEIGHT: f64 = 0.6;
pub const DEFAULT_POLARITY_WEIGHT: f64 = 0.35;
pub const DEFAULT_LAYER_GAP_PENALTY: f64 = 0.15;
pub const DEFAULT_CONFLICT_WINDOW: usize = 30;
pub const DEFAULT_CONFLICT_LOOKAHEAD: usize = 7;
pub const DEFAULT_DUPLICATE_SCORE: f64 = 0.35;
pub const DEFAULT_DUPLICATE_REFRESH_LIMIT: usize = 200;
pub const DEFAULT_NEGATION_MARKERS: &[&str] =
    &[" not ", "n't ", " never ", " no ", " cannot ", " fail ", " false "];

// --- Maintenance ---
pub const DEFAULT_PROMOTE_THRESHOLD: f64 = 0.68;
pub const DEFAULT_DEMOTE_THRESHOLD: f64 = 0.22;
pub const DEFAULT_ARCHIVE_AFTER_DAYS: i64 = 30;
pub const DEFAULT_REFINE_MIN_CHARS: usize = 2_200;
pub const DEFAULT_SWEEP_REFINE_MIN_CHARS: usize = 2_600;
pub const DEFAULT_REFINE_MAX_CHILDREN: usize = 6;
pub const DEFAULT_CHILD_MAX_CHARS: usize = 1_000;
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 900;
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;
pub const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 3_600; // 1 hour

// --- Workers ---
pub const DEFAULT_WORKER_TIMEOUT_SECS: u64 = 12;
pub const DEFAULT_WORKER_MAX_RETRIES: u32 = 1;
pub const DEFAULT_WORKER_BACKOFF_MS: u64 = 250;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_HEALTH_RECENT_JOBS: usize = 10;
pub const DEFAULT_TRACE_LIMIT: usize = 500;
