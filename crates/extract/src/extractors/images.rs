// ABOUTME: Product image collection from structured data, meta tags, and raw markup.
// ABOUTME: Scans img/lazy-load/srcset attributes and CSS backgrounds with keyword filters and a 5-image cap.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::product::MAX_IMAGES;

static IMG_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img[^>]+(src|data-src|data-lazy-src|data-original|data-srcset|srcset|data-image|data-product-image)=["']([^"']+)["'][^>]*>"#).unwrap()
});
static BACKGROUND_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)background-image[^:]*:\s*url\(["']?([^"')]+)["']?\)"#).unwrap()
});
static IMG_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif)").unwrap());
static BACKGROUND_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp)").unwrap());

/// Substrings that mark site chrome rather than product shots.
const EXCLUDE_KEYWORDS: &[&str] = &[
    "icon", "logo", "avatar", "favicon", "badge", "button", "arrow",
];
const INCLUDE_KEYWORDS: &[&str] = &["product", "item", "image", "photo", "picture", "gallery"];
const BACKGROUND_KEYWORDS: &[&str] = &["product", "item"];

static EXCLUDE_AC: Lazy<AhoCorasick> = Lazy::new(|| case_insensitive(EXCLUDE_KEYWORDS));
static INCLUDE_AC: Lazy<AhoCorasick> = Lazy::new(|| case_insensitive(INCLUDE_KEYWORDS));
static BACKGROUND_AC: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(BACKGROUND_KEYWORDS).unwrap()
});

fn case_insensitive(patterns: &[&str]) -> AhoCorasick {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(patterns)
        .unwrap()
}

/// Ordered, deduplicated image list capped at [`MAX_IMAGES`].
#[derive(Debug, Clone)]
pub struct ImageCollector {
    base: Option<Url>,
    images: Vec<String>,
}

impl ImageCollector {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: Url::parse(base_url).ok(),
            images: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.images.len() >= MAX_IMAGES
    }

    /// Resolves and appends a candidate. Returns false when the candidate was dropped.
    pub fn push(&mut self, raw: &str) -> bool {
        if self.is_full() {
            return false;
        }
        let Some(resolved) = self.resolve(raw) else {
            return false;
        };
        if self.images.contains(&resolved) {
            return false;
        }
        self.images.push(resolved);
        true
    }

    /// Appends structured-data or meta-tag images, which skip the keyword filters.
    pub fn extend_declared<I, S>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for candidate in candidates {
            if self.is_full() {
                break;
            }
            self.push(candidate.as_ref());
        }
    }

    /// Scans `<img>` tags for product images.
    pub fn scan_img_tags(&mut self, html: &str) {
        for caps in IMG_ATTR_RE.captures_iter(html) {
            if self.is_full() {
                break;
            }
            let (Some(attr), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            // Only srcset lists carry width or density descriptors.
            let src = if attr.as_str().to_ascii_lowercase().ends_with("srcset") {
                pick_srcset_candidate(value.as_str())
            } else {
                value.as_str().trim()
            };
            if is_product_image(src) {
                self.push(src);
            }
        }
    }

    /// Scans inline CSS `background-image: url(...)` declarations.
    pub fn scan_backgrounds(&mut self, html: &str) {
        for caps in BACKGROUND_IMAGE_RE.captures_iter(html) {
            if self.is_full() {
                break;
            }
            let Some(src) = caps.get(1).map(|m| m.as_str().trim()) else {
                continue;
            };
            if src.is_empty() || is_data_uri(src) {
                continue;
            }
            if BACKGROUND_AC.is_match(src) || BACKGROUND_EXTENSION_RE.is_match(src) {
                self.push(src);
            }
        }
    }

    pub fn into_images(self) -> Vec<String> {
        self.images
    }

    fn resolve(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() || is_data_uri(raw) {
            return None;
        }
        let resolved = match &self.base {
            Some(base) => base.join(raw).ok()?,
            None => Url::parse(raw).ok()?,
        };
        match resolved.scheme() {
            "http" | "https" => Some(resolved.to_string()),
            _ => None,
        }
    }
}

fn is_data_uri(src: &str) -> bool {
    src.trim_start()
        .get(..5)
        .map_or(false, |p| p.eq_ignore_ascii_case("data:"))
}

/// Takes the last entry of a srcset list and drops its size descriptor.
fn pick_srcset_candidate(value: &str) -> &str {
    let candidate = value.rsplit(',').next().unwrap_or(value).trim();
    candidate.split_whitespace().next().unwrap_or("")
}

/// Applies the exclusion and inclusion keyword filters to a raw image URL.
fn is_product_image(src: &str) -> bool {
    if src.is_empty() || is_data_uri(src) {
        return false;
    }
    if EXCLUDE_AC.is_match(src) {
        return false;
    }
    INCLUDE_AC.is_match(src) || IMG_EXTENSION_RE.is_match(src)
}
