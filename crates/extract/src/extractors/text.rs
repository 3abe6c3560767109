// ABOUTME: Small string helpers shared by the field extractors.
// ABOUTME: Whitespace normalization, empty filtering, and char-safe truncation.

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes whitespace and returns `None` when nothing is left.
pub fn clean_text(s: &str) -> Option<String> {
    let normalized = normalize_whitespace(s);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Truncates to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
