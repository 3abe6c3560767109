// ABOUTME: Color extraction against the fixed palette, from explicit declarations or page text.
// ABOUTME: Canonicalizes grey to gray and multi-color to multicolor.

use serde_json::Value;

use crate::extractors::meta::MetaTags;
use crate::extractors::structured::named_field;
use crate::product::Color;

/// Search terms in scan order with the palette color each one maps to.
pub const COLOR_TERMS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("white", Color::White),
    ("gray", Color::Gray),
    ("grey", Color::Gray),
    ("navy", Color::Navy),
    ("blue", Color::Blue),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("orange", Color::Orange),
    ("pink", Color::Pink),
    ("purple", Color::Purple),
    ("brown", Color::Brown),
    ("beige", Color::Beige),
    ("multicolor", Color::Multicolor),
    ("multi-color", Color::Multicolor),
    ("burgundy", Color::Burgundy),
    ("maroon", Color::Maroon),
    ("teal", Color::Teal),
    ("cyan", Color::Cyan),
    ("lime", Color::Lime),
    ("olive", Color::Olive),
    ("tan", Color::Tan),
    ("khaki", Color::Khaki),
];

pub const COLOR_META_KEYS: &[&str] = &["product:color", "color"];

/// Maps an explicit color declaration by plain substring match.
pub fn match_declared(value: &str) -> Option<Color> {
    let lower = value.to_lowercase();
    COLOR_TERMS
        .iter()
        .find(|(term, _)| lower.contains(term))
        .map(|(_, color)| *color)
}

/// Reads the structured `color` property, then the color meta tags.
pub fn from_declared(node: Option<&Value>, meta: &MetaTags) -> Option<Color> {
    node.and_then(|n| named_field(n, "color"))
        .and_then(|c| match_declared(&c))
        .or_else(|| {
            COLOR_META_KEYS
                .iter()
                .filter_map(|key| meta.get(key))
                .find_map(match_declared)
        })
}

/// Scans page text for a palette term surrounded by delimiters.
///
/// A term counts when it appears as ` term `, `-term-`, or at the very end
/// after a space, which keeps words like "redirect" or "tangent" out.
pub fn from_text(html: &str, title: Option<&str>, description: Option<&str>) -> Option<Color> {
    let text = format!(
        "{} {} {}",
        html,
        title.unwrap_or(""),
        description.unwrap_or("")
    )
    .to_lowercase();

    COLOR_TERMS
        .iter()
        .find(|(term, _)| {
            text.contains(&format!(" {} ", term))
                || text.contains(&format!("-{}-", term))
                || text.ends_with(&format!(" {}", term))
        })
        .map(|(_, color)| *color)
}
