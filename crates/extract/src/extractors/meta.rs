// ABOUTME: Meta-tag reader for Open Graph, product, and itemprop meta tags.
// ABOUTME: Indexes every <meta> by property/name/itemprop so field extractors can look keys up in order.

//! Meta tag extraction.
//!
//! Key behaviors:
//! - A `<meta>` is indexed under each of its `property`, `name`, and `itemprop`
//!   attributes (lowercased), so `property="og:title"` and `name="og:title"`
//!   resolve to the same key.
//! - The first non-empty `content` for a key wins.
//! - `first_of` tries keys in order and returns the first hit.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::extractors::text::clean_text;

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[content]").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static ITEMPROP_BRAND_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemprop='brand']").unwrap());

const KEY_ATTRS: [&str; 3] = ["property", "name", "itemprop"];

/// Meta tag contents keyed by lowercased property/name/itemprop.
#[derive(Debug, Clone, Default)]
pub struct MetaTags {
    values: HashMap<String, String>,
}

impl MetaTags {
    pub fn from_document(doc: &Html) -> Self {
        let mut values = HashMap::new();
        for el in doc.select(&META_SELECTOR) {
            let Some(content) = el.value().attr("content").and_then(clean_text) else {
                continue;
            };
            for attr in KEY_ATTRS {
                if let Some(key) = el.value().attr(attr) {
                    let key = key.trim().to_ascii_lowercase();
                    if !key.is_empty() {
                        values.entry(key).or_insert_with(|| content.clone());
                    }
                }
            }
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the content of the first key present.
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.get(k)).map(str::to_string)
    }

    /// True when at least one `og:*` tag carries content.
    pub fn has_open_graph(&self) -> bool {
        self.values.keys().any(|k| k.starts_with("og:"))
    }
}

/// Text of the document `<title>`, whitespace normalized.
pub fn document_title(doc: &Html) -> Option<String> {
    doc.select(&TITLE_SELECTOR)
        .find_map(|el| clean_text(&el.text().collect::<String>()))
}

/// Text of the first non-meta element marked `itemprop="brand"`.
pub fn itemprop_brand_text(doc: &Html) -> Option<String> {
    doc.select(&ITEMPROP_BRAND_SELECTOR)
        .filter(|el| el.value().name() != "meta")
        .find_map(|el| {
            el.value()
                .attr("content")
                .and_then(clean_text)
                .or_else(|| clean_text(&el.text().collect::<String>()))
        })
}
