// ABOUTME: ExtractedProduct record holding product data recovered from a page.
// ABOUTME: Defines the Category and Color enums plus extraction metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) for an accepted price.
pub const MAX_PRICE: f64 = 100_000.0;

/// Maximum number of images kept on a record.
pub const MAX_IMAGES: usize = 5;

/// Clothing category inferred for a product.
///
/// Declaration order is significant: when several categories match the same
/// text, the earliest one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Shoes,
    Outerwear,
    Accessories,
}

impl Category {
    /// All categories in priority order.
    pub const ALL: [Category; 5] = [
        Category::Tops,
        Category::Bottoms,
        Category::Shoes,
        Category::Outerwear,
        Category::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Shoes => "shoes",
            Category::Outerwear => "outerwear",
            Category::Accessories => "accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named color from the fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Gray,
    Navy,
    Blue,
    Red,
    Green,
    Yellow,
    Orange,
    Pink,
    Purple,
    Brown,
    Beige,
    Multicolor,
    Burgundy,
    Maroon,
    Teal,
    Cyan,
    Lime,
    Olive,
    Tan,
    Khaki,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Gray => "gray",
            Color::Navy => "navy",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Brown => "brown",
            Color::Beige => "beige",
            Color::Multicolor => "multicolor",
            Color::Burgundy => "burgundy",
            Color::Maroon => "maroon",
            Color::Teal => "teal",
            Color::Cyan => "cyan",
            Color::Lime => "lime",
            Color::Olive => "olive",
            Color::Tan => "tan",
            Color::Khaki => "khaki",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance details attached to every extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub url: String,
    pub extracted: bool,
    #[serde(rename = "hasJsonLd")]
    pub has_structured_data: bool,
    pub has_open_graph: bool,
    pub image_count: usize,
}

/// Product data recovered from a single page.
///
/// Every field is independently optional; an empty record is a valid result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExtractedProduct {
    pub images: Vec<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub brand: Option<String>,
    pub category: Option<Category>,
    pub color: Option<Color>,
    pub size: Option<String>,
    pub metadata: ExtractionMetadata,
}

impl ExtractedProduct {
    /// Returns true if no product field was recovered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
            && self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.brand.is_none()
            && self.category.is_none()
            && self.color.is_none()
            && self.size.is_none()
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }
}

/// Returns the price if it lies strictly inside `(0, MAX_PRICE)`.
pub fn sane_price(value: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 && value < MAX_PRICE {
        Some(value)
    } else {
        None
    }
}
