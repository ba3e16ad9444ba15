//! Text helpers that count characters rather than bytes.

/// Return the first `max_chars` characters of `text` (UTF-8 safe).
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("hello", 3), "hel");
        assert_eq!(take_chars("hello", 5), "hello");
        assert_eq!(take_chars("hello", 10), "hello");
        assert_eq!(take_chars("", 3), "");
        assert_eq!(take_chars("hello", 0), "");
    }

    #[test]
    fn test_take_chars_multibyte() {
        // Counts characters, not bytes
        assert_eq!(take_chars("héllo wörld", 7), "héllo w");
        assert_eq!(take_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  Natural\nLanguage \t Processing "),
            "Natural Language Processing"
        );
        assert_eq!(collapse_whitespace("   "), "");
    }
}
