// ABOUTME: Brand extraction from structured data, meta tags, text heuristics, and the URL host.
// ABOUTME: Applies length limits so stray regex captures are rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use url::{Host, Url};

use crate::extractors::meta::{itemprop_brand_text, MetaTags};
use crate::extractors::structured::named_field;
use crate::extractors::text::{clean_text, truncate_chars};

/// Longest brand kept on a record.
pub const MAX_BRAND_LEN: usize = 50;

pub const BRAND_META_KEYS: &[&str] = &["product:brand", "og:brand", "brand"];

// Tried in order over `html + " " + title`.
static BRAND_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)brand[:\s]*["']?([^"'\s<]+)"#,
        r"by\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        r#"(?i)manufacturer[:\s]*["']?([^"'\s<]+)"#,
        r#"(?i)itemprop=["']brand["'][^>]*content=["']([^"']+)["']"#,
        r#"(?i)"brand"[:\s]*"([^"]+)""#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Trims a candidate and enforces the brand length rules.
pub fn normalize_brand(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw)?;
    if cleaned.chars().count() <= 1 {
        return None;
    }
    Some(truncate_chars(&cleaned, MAX_BRAND_LEN).trim_end().to_string())
}

pub fn from_structured(node: &Value) -> Option<String> {
    ["brand", "manufacturer"]
        .iter()
        .filter_map(|key| named_field(node, key))
        .find_map(|b| normalize_brand(&b))
}

pub fn from_meta(meta: &MetaTags, doc: &Html) -> Option<String> {
    BRAND_META_KEYS
        .iter()
        .filter_map(|key| meta.get(key))
        .find_map(normalize_brand)
        .or_else(|| itemprop_brand_text(doc).and_then(|b| normalize_brand(&b)))
}

/// Runs the text heuristics over the page HTML and title.
pub fn from_text(html: &str, title: Option<&str>) -> Option<String> {
    let text = format!("{} {}", html, title.unwrap_or(""));
    BRAND_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(&text)?;
        let capture = caps.get(1)?.as_str();
        let len = capture.chars().count();
        if len > 1 && len < MAX_BRAND_LEN {
            normalize_brand(capture)
        } else {
            None
        }
    })
}

/// Derives a brand from the host name, e.g. `www.gymshark.com` -> `Gymshark`.
pub fn from_domain(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    let host = match url.host()? {
        Host::Domain(domain) => domain.to_ascii_lowercase(),
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let label = host.split('.').next()?;
    if label.chars().count() <= 1 || label == "localhost" {
        return None;
    }
    let mut chars = label.chars();
    let first = chars.next()?;
    let capitalized: String = first.to_uppercase().chain(chars).collect();
    normalize_brand(&capitalized)
}
