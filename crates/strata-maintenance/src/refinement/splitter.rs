//! Sentence splitting for refinement.

/// Split text into sentences at `.`, `!` or `?` followed by whitespace or
/// end of input. Pieces of two characters or fewer are dropped. Line breaks
/// are treated as spaces.
pub fn split_sentences(text: &str) -> Vec<String> {
    let flat = text.replace(['\r', '\n'], " ");
    let chars: Vec<char> = flat.chars().collect();
    let len = chars.len();

    let mut sentences = Vec::new();
    let mut current = String::new();
    for i in 0..len {
        current.push(chars[i]);
        if !matches!(chars[i], '.' | '!' | '?') {
            continue;
        }
        let at_end = i + 1 >= len;
        if at_end || chars[i + 1].is_whitespace() {
            push_piece(&mut sentences, &current);
            current.clear();
        }
    }
    push_piece(&mut sentences, &current);
    sentences
}

fn push_piece(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if trimmed.chars().count() > 2 {
        out.push(trimmed.to_string());
    }
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let sentences = split_sentences("Is this working? Yes it is! Final sentence.");
        assert_eq!(sentences, vec!["Is this working?", "Yes it is!", "Final sentence."]);
    }

    #[test]
    fn keeps_decimals_and_trailing_text() {
        let sentences = split_sentences("Version 2.5 shipped.\nNo trailing stop");
        assert_eq!(sentences, vec!["Version 2.5 shipped.", "No trailing stop"]);
    }

    #[test]
    fn drops_tiny_fragments() {
        assert_eq!(
            split_sentences("Ok. A. Real sentence here."),
            vec!["Ok.", "Real sentence here."]
        );
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
