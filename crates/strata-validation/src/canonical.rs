//! Canonical text form, its hash, and token-set overlap.

use std::collections::HashSet;

/// Number of hex chars kept from the blake3 digest.
pub const HASH_KEY_LEN: usize = 16;

/// Lowercase and collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Duplicate-cluster key: the first 16 hex chars of blake3 over the normalized text.
pub fn canonical_hash(text: &str) -> String {
    let digest = blake3::hash(normalize_text(text).as_bytes()).to_hex();
    digest.as_str()[..HASH_KEY_LEN].to_string()
}

/// Whitespace tokens of the normalized text.
pub fn tokens(text: &str) -> HashSet<String> {
    normalize_text(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Token-set Jaccard overlap. 0 when either side is empty.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let (sa, sb) = (tokens(a), tokens(b));
    if sa.is_empty() || sb.is_empty() {
        return 0.0;
    }
    let inter = sa.intersection(&sb).count();
    let union = sa.union(&sb).count();
    inter as f64 / union.max(1) as f64
}
