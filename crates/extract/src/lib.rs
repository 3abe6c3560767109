// ABOUTME: Main library entry point for the closet product extractor.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ExtractedProduct, FetchError, ErrorCode, extract.

//! Closet - extracts clothing product data from shopping pages.
//!
//! The extractor turns raw HTML plus the page URL into an
//! [`ExtractedProduct`]: up to five images, title, description, price,
//! brand, category, color, and size. Structured data (JSON-LD) is preferred,
//! then meta tags, then text heuristics.
//!
//! # Example
//!
//! ```no_run
//! use closet_extract::{Client, FetchError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), FetchError> {
//!     let client = Client::builder().build();
//!     let product = client.extract_url("https://shop.example.com/p/hoodie").await?;
//!     println!("{:?} {:?}", product.title, product.price);
//!     Ok(())
//! }
//! ```
//!
//! Extraction alone is synchronous and infallible:
//!
//! ```
//! let html = r#"<script type="application/ld+json">{"@type":"Product","name":"Blue Hoodie"}</script>"#;
//! let product = closet_extract::extract(html, "https://shop.test/p/1");
//! assert_eq!(product.title.as_deref(), Some("Blue Hoodie"));
//! ```

pub mod client;
pub mod error;
pub mod extractors;
pub mod options;
pub mod product;
pub mod resource;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, FetchError};
pub use crate::extractors::{extract, extract_with, ExtractOptions};
pub use crate::options::{ClientBuilder, FetchMode, Options};
pub use crate::product::{Category, Color, ExtractedProduct, ExtractionMetadata};

/// Result alias for fallible client operations.
pub type Result<T> = std::result::Result<T, FetchError>;
