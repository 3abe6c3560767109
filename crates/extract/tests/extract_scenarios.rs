// ABOUTME: Scenario tests running the extractor over realistic storefront markup.
// ABOUTME: Covers source priority, image caps, price sanity, and palette canonicalization.

use closet_extract::{extract, extract_with, Category, Color, ExtractOptions};
use pretty_assertions::assert_eq;

const SHOPIFY_STYLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Everyday Tee – Heather Grey | Northwind</title>
  <meta property="og:title" content="Everyday Tee">
  <meta property="og:description" content="Soft cotton jersey tee.">
  <meta property="og:image" content="//cdn.northwind.test/files/everyday-tee-front.jpg">
  <meta property="product:price:amount" content="32.00">
  <script type="application/ld+json">
  {
    "@context": "https://schema.org",
    "@graph": [
      {"@type": "Organization", "name": "Northwind"},
      {
        "@type": "Product",
        "name": "Everyday Tee",
        "description": "Soft cotton jersey tee.",
        "brand": {"@type": "Brand", "name": "Northwind"},
        "color": "Heather Grey",
        "image": [
          "https://cdn.northwind.test/files/everyday-tee-front.jpg",
          "https://cdn.northwind.test/files/everyday-tee-back.jpg"
        ],
        "offers": [{"@type": "Offer", "price": 28.5, "priceCurrency": "USD"}]
      }
    ]
  }
  </script>
</head>
<body>
  <img src="/assets/logo.svg" alt="Northwind">
  <img data-src="https://cdn.northwind.test/files/product-detail-1.jpg">
  <img srcset="https://cdn.northwind.test/files/product-detail-2.jpg 480w, https://cdn.northwind.test/files/product-detail-2@2x.jpg 960w">
  <div class="sizes"><button>S</button><button>M</button></div>
</body>
</html>"#;

#[test]
fn graph_product_wins_over_meta() {
    let product = extract(SHOPIFY_STYLE, "https://northwind.test/products/everyday-tee");

    assert_eq!(product.title.as_deref(), Some("Everyday Tee"));
    assert_eq!(
        product.description.as_deref(),
        Some("Soft cotton jersey tee.")
    );
    assert_eq!(product.price, Some(28.5));
    assert_eq!(product.brand.as_deref(), Some("Northwind"));
    assert_eq!(product.color, Some(Color::Gray));
    assert_eq!(product.category, Some(Category::Tops));
    assert_eq!(product.size.as_deref(), Some("S"));
    assert!(product.metadata.has_structured_data);
    assert!(product.metadata.has_open_graph);
}

#[test]
fn images_are_ordered_deduplicated_and_filtered() {
    let product = extract(SHOPIFY_STYLE, "https://northwind.test/products/everyday-tee");

    assert_eq!(
        product.images,
        vec![
            "https://cdn.northwind.test/files/everyday-tee-front.jpg",
            "https://cdn.northwind.test/files/everyday-tee-back.jpg",
            "https://cdn.northwind.test/files/product-detail-1.jpg",
            "https://cdn.northwind.test/files/product-detail-2@2x.jpg",
        ]
    );
    assert_eq!(product.metadata.image_count, 4);
}

#[test]
fn image_list_is_capped_at_five() {
    let mut html = String::from("<html><body>");
    for i in 0..12 {
        html.push_str(&format!(r#"<img src="/media/product-{}.jpg">"#, i));
    }
    html.push_str("</body></html>");

    let product = extract(&html, "https://shop.test/p/1");
    assert_eq!(product.images.len(), 5);
    assert_eq!(product.images[0], "https://shop.test/media/product-0.jpg");
    assert_eq!(product.images[4], "https://shop.test/media/product-4.jpg");
}

#[test]
fn data_uris_never_appear() {
    let html = r#"<html><head>
        <meta property="og:image" content="data:image/png;base64,iVBORw0KGgo=">
    </head><body>
        <img src="data:image/gif;base64,R0lGODlhAQABAAAAACw=">
        <div style="background-image: url('data:image/png;base64,AAAA')"></div>
    </body></html>"#;
    let product = extract(html, "https://shop.test/p/1");
    assert!(product.images.is_empty());
}

#[test]
fn out_of_range_prices_are_dropped() {
    let html = r#"<html><head>
        <script type="application/ld+json">{"@type":"Product","name":"Gold Watch","offers":{"price":"250000"}}</script>
    </head><body><span class="price">$129.00</span></body></html>"#;
    let product = extract(html, "https://shop.test/p/watch");
    assert_eq!(product.price, Some(129.0));
    assert_eq!(product.category, Some(Category::Accessories));
}

#[test]
fn zero_price_everywhere_is_none() {
    let html = r#"<html><head>
        <meta property="product:price:amount" content="0.00">
    </head><body><p>Free gift</p></body></html>"#;
    assert_eq!(extract(html, "https://shop.test/p/gift").price, None);
}

#[test]
fn item_list_falls_back_to_first_product() {
    let html = r#"<html><head><script type="application/ld+json">
        {"@type":"ItemList","itemListElement":[
            {"@type":"ListItem","position":1,"item":{"@type":"Product","name":"Canvas Tote","offers":{"lowPrice":"18"}}}
        ]}
    </script></head></html>"#;
    let product = extract(html, "https://shop.test/c/bags");
    assert_eq!(product.category, Some(Category::Accessories));
    assert!(product.metadata.has_structured_data);
}

#[test]
fn colors_are_canonical_palette_values() {
    let html = r#"<html><head><title>Relaxed Shirt in multi-color print</title></head></html>"#;
    let product = extract(html, "https://shop.test/p/shirt");
    assert_eq!(product.color, Some(Color::Multicolor));

    let json = serde_json::to_value(&product).unwrap();
    assert_eq!(json["color"], "multicolor");
}

#[test]
fn record_serializes_with_metadata_keys() {
    let product = extract("<html></html>", "https://shop.test/p/1");
    let json = serde_json::to_value(&product).unwrap();

    assert_eq!(json["images"], serde_json::json!([]));
    assert!(json["title"].is_null());
    assert!(json["price"].is_null());
    assert_eq!(json["metadata"]["url"], "https://shop.test/p/1");
    assert_eq!(json["metadata"]["extracted"], true);
    assert_eq!(json["metadata"]["hasJsonLd"], false);
    assert_eq!(json["metadata"]["hasOpenGraph"], false);
    assert_eq!(json["metadata"]["imageCount"], 0);
}

#[test]
fn domain_brand_only_when_enabled() {
    let html = "<html><head><title>Linen Trousers</title></head></html>";
    let url = "https://www.everlane.com/products/linen-trousers";

    assert_eq!(extract(html, url).brand, None);

    let opts = ExtractOptions {
        brand_from_domain: true,
    };
    assert_eq!(
        extract_with(html, url, &opts).brand.as_deref(),
        Some("Everlane")
    );
}
