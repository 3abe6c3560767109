// ABOUTME: Clothing category inference from structured category fields and keyword vocabularies.
// ABOUTME: Categories are checked in enum order; the first one with a matching keyword wins.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::product::Category;

const TOPS: &[&str] = &[
    "shirt", "top", "blouse", "t-shirt", "tee", "sweater", "hoodie", "tank", "crop", "bra",
    "sports bra", "jogger", "polo", "henley", "turtleneck", "sweatshirt", "long sleeve",
    "short sleeve", "tank top", "crop top", "bodysuit", "camisole", "blazer", "cardigan",
    "pullover", "crewneck", "v-neck", "tunic",
];
const BOTTOMS: &[&str] = &[
    "pants", "jeans", "trousers", "shorts", "skirt", "leggings", "tights", "joggers",
    "sweatpants", "chinos", "cargo", "capri", "culottes", "palazzo", "wide leg",
    "straight leg", "skinny", "bootcut", "flare", "cropped pants",
];
const SHOES: &[&str] = &[
    "shoe", "sneaker", "boot", "sandal", "heel", "slipper", "sneakers", "trainer",
    "running shoe", "athletic shoe", "dress shoe", "loafer", "oxford", "moccasin", "flats",
    "pumps", "stilettos", "wedges", "espadrilles", "mules", "clogs",
];
const OUTERWEAR: &[&str] = &[
    "coat", "jacket", "parka", "blazer", "cardigan", "vest", "windbreaker", "bomber",
    "denim jacket", "leather jacket", "trench", "peacoat", "puffer", "fleece", "hoodie",
    "sweatshirt", "pullover", "zip-up", "anorak",
];
const ACCESSORIES: &[&str] = &[
    "bag", "hat", "belt", "watch", "jewelry", "scarf", "gloves", "headband", "socks",
    "sunglasses", "wallet", "backpack", "purse", "tote", "clutch", "necklace", "bracelet",
    "earrings", "ring", "tie", "bow tie", "cufflinks",
];

static VOCABULARY: Lazy<Vec<(Category, AhoCorasick)>> = Lazy::new(|| {
    Category::ALL
        .iter()
        .map(|category| {
            let ac = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(keywords(*category))
                .unwrap();
            (*category, ac)
        })
        .collect()
});

/// Keyword vocabulary for a category.
pub fn keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Tops => TOPS,
        Category::Bottoms => BOTTOMS,
        Category::Shoes => SHOES,
        Category::Outerwear => OUTERWEAR,
        Category::Accessories => ACCESSORIES,
    }
}

/// Maps a free-form category label (e.g. a schema.org `category`) to a category.
pub fn map_label(label: &str) -> Option<Category> {
    let lower = label.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    if has(&["top", "shirt", "blouse"]) {
        Some(Category::Tops)
    } else if has(&["bottom", "pant", "trouser"]) {
        Some(Category::Bottoms)
    } else if has(&["shoe", "footwear"]) {
        Some(Category::Shoes)
    } else if has(&["outerwear", "jacket", "coat"]) {
        Some(Category::Outerwear)
    } else if has(&["accessor"]) {
        Some(Category::Accessories)
    } else {
        None
    }
}

fn labels(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Object(map) => map.get("name").and_then(Value::as_str).into_iter().collect(),
        Value::Array(items) => items.iter().flat_map(labels).collect(),
        _ => Vec::new(),
    }
}

/// Reads `category`, `productCategory`, then `@type` and maps the first usable label.
pub fn from_structured(node: &Value) -> Option<Category> {
    ["category", "productCategory", "@type"]
        .iter()
        .filter_map(|key| node.get(*key))
        .flat_map(labels)
        .find_map(map_label)
}

/// Keyword match over the page URL, title, and description.
pub fn infer(url: &str, title: Option<&str>, description: Option<&str>) -> Option<Category> {
    let text = format!(
        "{} {} {}",
        url,
        title.unwrap_or(""),
        description.unwrap_or("")
    );
    VOCABULARY
        .iter()
        .find(|(_, ac)| ac.is_match(&text))
        .map(|(category, _)| *category)
}
