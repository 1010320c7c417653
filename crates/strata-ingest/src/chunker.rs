//! Whitespace normalization and char-based sliding windows.

use strata_core::config::IngestConfig;

/// One window cut from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChunk {
    pub text: String,
    pub chunk_index: u32,
    pub is_summary: bool,
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` into windows of `window` chars, advancing by `step`.
/// The last window always ends at the end of the text.
pub fn sliding_windows(text: &str, window: usize, step: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    let window = window.max(1);
    let step = step.max(1);

    let mut out = Vec::new();
    let mut cursor = 0;
    loop {
        let end = (cursor + window).min(chars.len());
        out.push(chars[cursor..end].iter().collect::<String>());
        if end == chars.len() {
            break;
        }
        cursor += step;
    }
    out
}

/// Plan the chunks for one document. Long documents get a leading summary
/// window; chunk indices count the summary as index 0.
pub fn plan(text: &str, config: &IngestConfig) -> Vec<PlannedChunk> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    if normalized.chars().count() > config.summary_threshold_chars {
        chunks.push(PlannedChunk {
            text: normalized.chars().take(config.summary_window_chars.max(1)).collect(),
            chunk_index: 0,
            is_summary: true,
        });
    }

    let offset = chunks.len() as u32;
    chunks.extend(
        sliding_windows(&normalized, config.window_chars, config.step())
            .into_iter()
            .enumerate()
            .map(|(i, text)| PlannedChunk {
                text,
                chunk_index: offset + i as u32,
                is_summary: false,
            }),
    );
    chunks
}
