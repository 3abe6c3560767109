// ABOUTME: Price extraction from structured data, product meta tags, and regex heuristics.
// ABOUTME: Normalizes numeric strings and enforces the (0, 100000) sanity range.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::extractors::meta::MetaTags;
use crate::extractors::structured;
use crate::product::sane_price;

/// Meta keys carrying a product price, in priority order.
pub const PRICE_META_KEYS: &[&str] = &["product:price:amount", "product:price", "og:price:amount"];

// Tried in order; only the first match of each pattern is considered.
static PRICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // currency symbols
        r"[\$£€¥]\s*(\d+\.?\d*)",
        r"(?i)price[:\s]*[\$£€¥]?\s*(\d+\.?\d*)",
        r"(\d+\.?\d*)\s*[\$£€¥]",
        // embedded JSON
        r#"(?i)"price"[:\s]*"([^"]+)""#,
        r#"(?i)"price"[:\s]*(\d+\.?\d*)"#,
        r#"(?i)priceAmount["\s:]+(\d+\.?\d*)"#,
        r#"(?i)"amount"[:\s]*(\d+\.?\d*)"#,
        // marketplace markup
        r"(?i)a-price-whole[^>]*>(\d+)",
        r"(?i)a-price-fraction[^>]*>(\d+)",
        r"(?i)product-price[^>]*>[\$£€¥]?\s*(\d+\.?\d*)",
        r"(?i)price[^>]*class[^>]*>[\$£€¥]?\s*(\d+\.?\d*)",
        // generic attributes
        r#"(?i)class="[^"]*price[^"]*"[^>]*>[\$£€¥]?\s*(\d+\.?\d*)"#,
        r#"(?i)data-price[=:]\s*["']?(\d+\.?\d*)"#,
        r#"(?i)priceValue[=:]\s*["']?(\d+\.?\d*)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Parses a price string after stripping everything but digits and dots.
///
/// Mirrors a lenient float parse: `"1,299.00 USD"` becomes `1299.0`, and
/// `"12.34.56"` becomes `12.34`.
pub fn parse_price_str(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let number = leading_number(&digits)?;
    number.parse::<f64>().ok()
}

/// Longest leading `digits[.digits]` prefix; `"12."` yields `"12"`.
fn leading_number(s: &str) -> Option<&str> {
    let int_len = s.chars().take_while(|c| c.is_ascii_digit()).count();
    let rest = &s[int_len..];
    let frac_len = rest
        .strip_prefix('.')
        .map(|r| r.chars().take_while(|c| c.is_ascii_digit()).count())
        .unwrap_or(0);
    if frac_len > 0 {
        return Some(&s[..int_len + 1 + frac_len]);
    }
    if int_len > 0 {
        return Some(&s[..int_len]);
    }
    None
}

/// Converts a JSON price (number or string) into a sane price.
pub fn price_from_json(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(sane_price),
        Value::String(s) => parse_price_str(s).and_then(sane_price),
        _ => None,
    }
}

pub fn from_structured(node: &Value) -> Option<f64> {
    structured::price_values(node)
        .into_iter()
        .find_map(price_from_json)
}

pub fn from_meta(meta: &MetaTags) -> Option<f64> {
    PRICE_META_KEYS
        .iter()
        .filter_map(|key| meta.get(key))
        .find_map(|raw| parse_price_str(raw).and_then(sane_price))
}

/// Runs the regex heuristics over raw HTML.
pub fn from_html(html: &str) -> Option<f64> {
    PRICE_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(html)?;
        parse_price_str(caps.get(1)?.as_str()).and_then(sane_price)
    })
}
