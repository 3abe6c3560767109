// ABOUTME: Product extraction pipeline combining structured data, meta tags, and regex heuristics.
// ABOUTME: Each field is resolved by an ordered chain of sources; the first non-empty value wins.

//! Content extraction module.
//!
//! The pipeline parses the document once, reads the JSON-LD product node and
//! the meta tags, then resolves each field independently:
//!
//! | Field | Sources, in order |
//! |---|---|
//! | title | JSON-LD `name`, `og:title`, `<title>` |
//! | description | JSON-LD `description`, `og:description`, `description` |
//! | images | JSON-LD `image`, `og:image`, `<img>` scan, CSS backgrounds |
//! | price | JSON-LD offers/price, product price meta, regex |
//! | brand | JSON-LD brand/manufacturer, brand meta, regex, URL host (opt-in) |
//! | category | JSON-LD category/productCategory/@type, keyword vocabulary |
//! | color | JSON-LD color / color meta, delimited palette scan |
//! | size | regex over raw HTML |
//!
//! Submodules:
//! - `structured`: JSON-LD block parsing and Product selection.
//! - `meta`: meta tag index and `<title>` reader.
//! - `images`, `price`, `brand`, `category`, `color`, `size`: per-field sources.

pub mod brand;
pub mod category;
pub mod color;
pub mod images;
pub mod meta;
pub mod price;
pub mod size;
pub mod structured;
pub mod text;

use scraper::Html;

use crate::extractors::images::ImageCollector;
use crate::extractors::meta::{document_title, MetaTags};
use crate::extractors::structured::{image_urls, string_field, StructuredData};
use crate::product::{ExtractedProduct, ExtractionMetadata};

/// Knobs for a single extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Fall back to a brand derived from the URL host (`www.acme.com` -> `Acme`).
    pub brand_from_domain: bool,
}

/// Extracts product data from a page with default options.
///
/// Never fails: a page with no recognizable signals yields a record whose
/// fields are all empty.
pub fn extract(html: &str, base_url: &str) -> ExtractedProduct {
    extract_with(html, base_url, &ExtractOptions::default())
}

/// Extracts product data from a page.
pub fn extract_with(html: &str, base_url: &str, opts: &ExtractOptions) -> ExtractedProduct {
    let doc = Html::parse_document(html);
    let structured = StructuredData::from_document(&doc);
    let product = structured.product();
    let meta = MetaTags::from_document(&doc);

    let title = product
        .and_then(|p| string_field(p, "name"))
        .or_else(|| meta.first_of(&["og:title"]))
        .or_else(|| document_title(&doc));

    let description = product
        .and_then(|p| string_field(p, "description"))
        .or_else(|| meta.first_of(&["og:description", "description"]));

    let mut collector = ImageCollector::new(base_url);
    if let Some(p) = product {
        collector.extend_declared(image_urls(p));
    }
    if let Some(og_image) = meta.get("og:image") {
        collector.extend_declared([og_image]);
    }
    collector.scan_img_tags(html);
    collector.scan_backgrounds(html);
    let images = collector.into_images();

    let price = product
        .and_then(price::from_structured)
        .or_else(|| price::from_meta(&meta))
        .or_else(|| price::from_html(html));

    let brand = product
        .and_then(brand::from_structured)
        .or_else(|| brand::from_meta(&meta, &doc))
        .or_else(|| brand::from_text(html, title.as_deref()))
        .or_else(|| {
            if opts.brand_from_domain {
                brand::from_domain(base_url)
            } else {
                None
            }
        });

    let category = product
        .and_then(category::from_structured)
        .or_else(|| category::infer(base_url, title.as_deref(), description.as_deref()));

    let color = color::from_declared(product, &meta)
        .or_else(|| color::from_text(html, title.as_deref(), description.as_deref()));

    let size = size::from_html(html);

    tracing::debug!(
        url = base_url,
        has_structured_data = product.is_some(),
        images = images.len(),
        price = ?price,
        "extracted product fields"
    );

    let metadata = ExtractionMetadata {
        url: base_url.to_string(),
        extracted: true,
        has_structured_data: product.is_some(),
        has_open_graph: meta.has_open_graph(),
        image_count: images.len(),
    };

    ExtractedProduct {
        images,
        title,
        description,
        price,
        brand,
        category,
        color,
        size,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Category, Color};
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://shop.test/p/1";

    #[test]
    fn test_json_ld_product_scenario() {
        let html = r#"<html><head><script type="application/ld+json">{"@type":"Product","name":"Blue Hoodie","offers":{"price":"49.99"}}</script></head><body></body></html>"#;
        let product = extract(html, BASE);
        assert_eq!(product.title.as_deref(), Some("Blue Hoodie"));
        assert_eq!(product.price, Some(49.99));
        assert_eq!(product.category, Some(Category::Tops));
        assert!(product.metadata.has_structured_data);
        assert!(!product.metadata.has_open_graph);
    }

    #[test]
    fn test_og_image_resolved_against_base() {
        let html = r#"<html><head><meta property="og:image" content="/img/shirt.jpg"></head><body></body></html>"#;
        let product = extract(html, BASE);
        assert_eq!(product.images, vec!["https://shop.test/img/shirt.jpg"]);
        assert_eq!(product.metadata.image_count, 1);
        assert!(product.metadata.has_open_graph);
        assert!(!product.metadata.has_structured_data);
    }

    #[test]
    fn test_structured_name_beats_og_title() {
        let html = r#"<html><head>
            <meta property="og:title" content="OG Title">
            <title>Doc Title</title>
            <script type="application/ld+json">{"@type":"Product","name":"LD Name"}</script>
        </head></html>"#;
        assert_eq!(extract(html, BASE).title.as_deref(), Some("LD Name"));
    }

    #[test]
    fn test_title_falls_back_to_og_then_title_tag() {
        let html = r#"<html><head><meta name="og:title" content="Named OG"><title>Doc</title></head></html>"#;
        assert_eq!(extract(html, BASE).title.as_deref(), Some("Named OG"));

        let html = "<html><head><title>\n  Doc Title \n</title></head></html>";
        assert_eq!(extract(html, BASE).title.as_deref(), Some("Doc Title"));
    }

    #[test]
    fn test_description_order() {
        let html = r#"<html><head>
            <meta name="description" content="Plain description">
            <meta property="og:description" content="OG description">
        </head></html>"#;
        assert_eq!(
            extract(html, BASE).description.as_deref(),
            Some("OG description")
        );
    }

    #[test]
    fn test_malformed_json_ld_falls_back() {
        let html = r#"<html><head>
            <script type="application/ld+json">{not valid json}</script>
            <meta property="og:title" content="Fallback Title">
            <meta property="product:price:amount" content="19.99">
        </head><body><p>size: XL</p></body></html>"#;
        let product = extract(html, BASE);
        assert_eq!(product.title.as_deref(), Some("Fallback Title"));
        assert_eq!(product.price, Some(19.99));
        assert_eq!(product.size.as_deref(), Some("XL"));
        assert!(!product.metadata.has_structured_data);
    }

    #[test]
    fn test_logo_icon_never_included() {
        let html = r#"<html><body><img src="https://cdn.test/logo-icon.png"></body></html>"#;
        let product = extract(html, BASE);
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_images_merge_sources_in_order() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://shop.test/img/og.jpg">
            <script type="application/ld+json">{"@type":"Product","image":["/img/ld-1.jpg","/img/og.jpg"]}</script>
        </head><body>
            <img src="/img/product-2.jpg">
            <img src="/img/ld-1.jpg">
            <img src="/img/product-3.jpg">
            <img src="/img/product-4.jpg">
            <img src="/img/product-5.jpg">
        </body></html>"#;
        let product = extract(html, BASE);
        assert_eq!(
            product.images,
            vec![
                "https://shop.test/img/ld-1.jpg",
                "https://shop.test/img/og.jpg",
                "https://shop.test/img/product-2.jpg",
                "https://shop.test/img/product-3.jpg",
                "https://shop.test/img/product-4.jpg",
            ]
        );
    }

    #[test]
    fn test_color_and_brand_from_meta() {
        let html = r#"<html><head>
            <meta property="product:color" content="Heather Grey">
            <meta property="product:brand" content=" Acme ">
        </head></html>"#;
        let product = extract(html, BASE);
        assert_eq!(product.color, Some(Color::Gray));
        assert_eq!(product.brand.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_brand_from_domain_opt_in() {
        let html = "<html><body><p>plain</p></body></html>";
        assert_eq!(extract(html, "https://www.gymshark.com/p/1").brand, None);

        let opts = ExtractOptions {
            brand_from_domain: true,
        };
        assert_eq!(
            extract_with(html, "https://www.gymshark.com/p/1", &opts)
                .brand
                .as_deref(),
            Some("Gymshark")
        );
    }

    #[test]
    fn test_empty_input_degrades_to_empty_record() {
        let product = extract("", BASE);
        assert!(product.is_empty());
        assert_eq!(product.metadata.url, BASE);
        assert!(product.metadata.extracted);
        assert_eq!(product.metadata.image_count, 0);
    }

    #[test]
    fn test_garbage_input_does_not_panic() {
        let inputs = [
            "<<<>>><img src=",
            "<script type=\"application/ld+json\">[[[",
            "<meta property=\"og:image\" content=\"http://[::1\">",
            "\u{0}\u{feff}<title>",
        ];
        for html in inputs {
            let product = extract(html, BASE);
            assert!(product.images.len() <= 5);
        }
    }

    #[test]
    fn test_idempotent() {
        let html = r#"<html><head><title>Red Sneaker</title></head>
            <body><img src="/img/product.jpg"><p>$59.00</p><p>size: 10</p></body></html>"#;
        assert_eq!(extract(html, BASE), extract(html, BASE));
    }
}
