// ABOUTME: Size extraction from raw HTML using ordered regex heuristics.
// ABOUTME: The first capture shorter than 10 characters wins.

use once_cell::sync::Lazy;
use regex::Regex;

/// Captures must be strictly shorter than this many characters.
pub const MAX_SIZE_LEN: usize = 10;

// Tried in order; only the first match of each pattern is considered.
static SIZE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // labelled size, not part of `font-size` and friends
        r"(?i)(?:^|[^\w-])size\b[:\s]*(XXXL|XXL|XL|XS|S|M|L|\d+)\b",
        // a text node holding only a size token, e.g. size picker buttons
        r">\s*(XXXL|XXL|XL|XS|S|M|L)\s*<",
        r"(?i)(\d+)\s*(?:US|EU|UK)?\s*size",
        // embedded JSON
        r#"(?i)"size"[:\s]*"([^"]+)""#,
        r#"(?i)"size"[:\s]*(\d+)"#,
        // attributes
        r#"(?i)data-size[=:]\s*["']?([^"'\s]+)"#,
        r#"(?i)itemprop=["']size["'][^>]*content=["']([^"']+)["']"#,
        // selected option in a size picker
        r"(?i)selected[^>]*size[^>]*>(XXXL|XXL|XL|XS|S|M|L|\d+)\b",
        r"(?i)size-option[^>]*selected[^>]*>(XXXL|XXL|XL|XS|S|M|L|\d+)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub fn from_html(html: &str) -> Option<String> {
    SIZE_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(html)?;
        let value = caps.get(1)?.as_str().trim();
        if !value.is_empty() && value.chars().count() < MAX_SIZE_LEN {
            Some(value.to_string())
        } else {
            None
        }
    })
}
