//! Maps a disposal point's category tag to the color and icon of its map pin.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Pin tint understood by the presentation layer.
pub enum ColorToken {
    /// Batteries.
    Orange,
    /// Organic waste.
    Brown,
    /// Bottle return machines, pet waste bins.
    Green,
    /// Mixed waste.
    Gray,
    /// Municipal points, toner returns.
    Black,
    /// Paper.
    Blue,
    /// Plastics.
    Yellow,
    /// Unrecognized categories.
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
/// How a pin is drawn.
pub struct AppearanceStyle {
    /// Pin tint.
    pub color: ColorToken,
    /// Icon identifier rendered inside the pin.
    pub icon: &'static str,
}

/// Style for categories missing from [`APPEARANCE_TABLE`].
pub const FALLBACK_STYLE: AppearanceStyle = AppearanceStyle {
    color: ColorToken::Red,
    icon: "warning",
};

/// Known category tags and their styles. Extend here when the backend adds a category.
pub const APPEARANCE_TABLE: &[(&str, AppearanceStyle)] = &[
    ("batteries", style(ColorToken::Orange, "battery")),
    ("bio", style(ColorToken::Brown, "leaf")),
    ("bottleMachine", style(ColorToken::Green, "bottle-return")),
    ("mixed", style(ColorToken::Gray, "box")),
    ("municipal", style(ColorToken::Black, "building")),
    ("paper", style(ColorToken::Blue, "document")),
    ("petFeces", style(ColorToken::Green, "paw")),
    ("plastic", style(ColorToken::Yellow, "bag")),
    ("toners", style(ColorToken::Black, "printer")),
];

const fn style(color: ColorToken, icon: &'static str) -> AppearanceStyle {
    AppearanceStyle { color, icon }
}

/// Style for a category tag. Tags match case-sensitively; unknown tags get [`FALLBACK_STYLE`].
#[must_use]
pub fn project(category: &str) -> AppearanceStyle {
    APPEARANCE_TABLE
        .iter()
        .find(|(tag, _)| *tag == category)
        .map_or(FALLBACK_STYLE, |(_, found)| *found)
}

/// Category tags with a dedicated style.
pub fn known_categories() -> impl Iterator<Item = &'static str> {
    APPEARANCE_TABLE.iter().map(|(tag, _)| *tag)
}
