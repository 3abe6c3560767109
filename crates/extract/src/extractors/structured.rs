// ABOUTME: JSON-LD structured-data reader for product pages.
// ABOUTME: Collects ld+json blocks, selects the Product node, and reads typed fields from it.

//! Structured data (JSON-LD) support.
//!
//! Every `<script type="application/ld+json">` body is parsed independently;
//! blocks that are not valid JSON are skipped. Top-level arrays and `@graph`
//! holders are flattened into a candidate list, then one node is selected:
//!
//! 1. the first node typed `Product`;
//! 2. otherwise the first `ItemList` whose first element is (or wraps) a `Product`;
//! 3. otherwise the first candidate of the first parseable block.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::extractors::text::clean_text;

static LD_JSON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

/// Parsed JSON-LD blocks, in document order.
#[derive(Debug, Clone, Default)]
pub struct StructuredData {
    blocks: Vec<Vec<Value>>,
}

impl StructuredData {
    /// Collects and parses all ld+json scripts of a document.
    pub fn from_document(doc: &Html) -> Self {
        let mut blocks = Vec::new();
        for script in doc.select(&LD_JSON_SELECTOR) {
            let text = script.text().collect::<String>();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => blocks.push(candidates(value)),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping invalid ld+json block");
                }
            }
        }
        Self { blocks }
    }

    /// Selects the node that describes the product.
    pub fn product(&self) -> Option<&Value> {
        let all = || self.blocks.iter().flatten();

        all()
            .find(|node| is_product(node))
            .or_else(|| all().find_map(item_list_product))
            .or_else(|| self.blocks.iter().find_map(|block| block.first()))
    }
}

/// Flattens a parsed block into its candidate nodes.
fn candidates(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(candidates).collect(),
        Value::Object(mut map) => match map.remove("@graph") {
            Some(Value::Array(graph)) => graph.into_iter().flat_map(candidates).collect(),
            Some(other) => {
                map.insert("@graph".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    }
}

/// Compares a schema.org type name ignoring case and the schema.org namespace.
fn type_name_matches(name: &str, expected: &str) -> bool {
    let trimmed = name.trim();
    let lower = trimmed.to_ascii_lowercase();
    let local = lower
        .strip_prefix("http://schema.org/")
        .or_else(|| lower.strip_prefix("https://schema.org/"))
        .unwrap_or(&lower);
    local.eq_ignore_ascii_case(expected)
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => type_name_matches(s, expected),
        Value::Array(arr) => arr.iter().any(|v| matches_type(v, expected)),
        _ => false,
    }
}

fn has_type(node: &Value, expected: &str) -> bool {
    node.get("@type")
        .map_or(false, |t| matches_type(t, expected))
}

fn is_product(node: &Value) -> bool {
    has_type(node, "Product")
}

fn item_list_product(node: &Value) -> Option<&Value> {
    if !has_type(node, "ItemList") {
        return None;
    }
    let first = node.get("itemListElement")?.as_array()?.first()?;
    match first.get("item") {
        Some(item) if is_product(item) => Some(item),
        _ if is_product(first) => Some(first),
        _ => None,
    }
}

/// Reads a string property, trimmed and non-empty.
pub fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).and_then(clean_text)
}

/// Reads a property that is either a string or an object carrying `name`.
pub fn named_field(node: &Value, key: &str) -> Option<String> {
    match node.get(key)? {
        Value::String(s) => clean_text(s),
        Value::Object(map) => map.get("name").and_then(Value::as_str).and_then(clean_text),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) => clean_text(s),
            Value::Object(map) => map.get("name").and_then(Value::as_str).and_then(clean_text),
            _ => None,
        }),
        _ => None,
    }
}

/// Collects image URLs from `image`, which may be a string, an ImageObject, or an array.
pub fn image_urls(node: &Value) -> Vec<String> {
    fn from_value(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => {
                if let Some(url) = clean_text(s) {
                    out.push(url);
                }
            }
            Value::Object(map) => {
                if let Some(url) = ["url", "contentUrl"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str).and_then(clean_text))
                {
                    out.push(url);
                }
            }
            Value::Array(items) => {
                for item in items {
                    from_value(item, out);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    if let Some(image) = node.get("image") {
        from_value(image, &mut out);
    }
    out
}

/// Returns raw price values from `offers` (object or array) followed by top-level `price`.
pub fn price_values(node: &Value) -> Vec<&Value> {
    let mut values = Vec::new();
    let offers: Vec<&Value> = match node.get("offers") {
        Some(Value::Array(arr)) => arr.iter().collect(),
        Some(offer @ Value::Object(_)) => vec![offer],
        _ => Vec::new(),
    };
    for offer in offers {
        for key in ["price", "lowPrice"] {
            if let Some(v) = offer.get(key) {
                values.push(v);
            }
        }
    }
    if let Some(v) = node.get("price") {
        values.push(v);
    }
    values
}
