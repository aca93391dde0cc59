//! Colors of the circuit editor
//!
//! Components and ports name their colors as strings, either from a small
//! palette of named colors or as `#rrggbb` hex.

use egui::Color32;

/// Shared color constants
pub mod colors {
    use egui::Color32;

    /// Canvas background
    pub const CANVAS_BG: Color32 = Color32::from_rgb(18, 18, 24);
    /// Background grid lines
    pub const GRID: Color32 = Color32::from_rgb(32, 32, 40);
    /// Component body
    pub const BODY_FILL: Color32 = Color32::from_rgb(40, 40, 45);
    /// Component outline, also the fallback for unknown component colors
    pub const BODY_STROKE: Color32 = Color32::from_rgb(80, 80, 90);
    /// Component title text
    pub const TITLE_TEXT: Color32 = Color32::WHITE;
    /// Wire color when neither the port nor the config resolve to a color
    pub const WIRE_FALLBACK: Color32 = Color32::from_rgb(0xff, 0x00, 0xa8);
}

/// Resolve a color name or `#rrggbb` / `#rrggbbaa` hex string
pub fn parse_color(name: &str) -> Option<Color32> {
    let name = name.trim();
    if name.starts_with('#') {
        return ecolor::Color32::from_hex(name).ok();
    }
    let color = match name.to_ascii_lowercase().as_str() {
        "black" => Color32::from_rgb(0x1b, 0x1c, 0x1d),
        "white" => Color32::from_rgb(0xff, 0xff, 0xff),
        "red" => Color32::from_rgb(0xdb, 0x28, 0x28),
        "orange" => Color32::from_rgb(0xf3, 0x71, 0x27),
        "yellow" => Color32::from_rgb(0xfb, 0xd6, 0x08),
        "olive" => Color32::from_rgb(0xcb, 0xe4, 0x1c),
        "green" => Color32::from_rgb(0x25, 0xca, 0x4c),
        "teal" => Color32::from_rgb(0x00, 0xd6, 0xcc),
        "blue" => Color32::from_rgb(0x2e, 0x93, 0xde),
        "violet" => Color32::from_rgb(0x7c, 0x4d, 0xd8),
        "purple" => Color32::from_rgb(0xc0, 0x3f, 0xd8),
        "pink" => Color32::from_rgb(0xe0, 0x3e, 0x9b),
        "brown" => Color32::from_rgb(0xa5, 0x67, 0x3f),
        "grey" | "gray" => Color32::from_rgb(0x76, 0x76, 0x76),
        "transparent" => Color32::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}

/// Resolve a color, falling back to `fallback` for unknown names
pub fn color_or(name: &str, fallback: Color32) -> Color32 {
    parse_color(name).unwrap_or(fallback)
}
