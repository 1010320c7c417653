use crate::canonical::normalize_text;

/// Whether the normalized, space-padded text contains any negation marker.
/// Markers carry their own padding (`" not "`, `"n't "`).
pub fn is_negative(text: &str, markers: &[String]) -> bool {
    let padded = format!(" {} ", normalize_text(text));
    markers.iter().any(|m| padded.contains(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::config::ValidationConfig;

    #[test]
    fn detects_markers_at_edges() {
        let markers = ValidationConfig::default().negation_markers;
        assert!(is_negative("Never deploy on Friday", &markers));
        assert!(is_negative("it doesn't work", &markers));
        assert!(is_negative("answer: no", &markers));
        assert!(!is_negative("notable knowledge", &markers));
    }
}
