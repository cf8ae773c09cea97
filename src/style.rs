use serde::Deserialize;
use tiny_skia::Color;

/// Colour palette loaded from a `.theme` resource. Colours are `RRGGBBAA`
/// hex strings, an optional leading `#` is accepted.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Style {
    pub background: String,
    pub border_color: String,
    pub search_background: String,
    pub text: String,
    pub secondary_text: String,
    pub placeholder: String,
    pub selection_background: String,
    pub selection_text: String,
    pub marker: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: "282828ff".to_string(),
            border_color: "504945ff".to_string(),
            search_background: "3c3836ff".to_string(),
            text: "ebdbb2ff".to_string(),
            secondary_text: "a89984ff".to_string(),
            placeholder: "7c6f64ff".to_string(),
            selection_background: "458588ff".to_string(),
            selection_text: "fbf1c7ff".to_string(),
            marker: "b8bb26ff".to_string(),
        }
    }
}

impl Style {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 8 || !hex.is_ascii() {
            return Color::BLACK;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);

        Color::from_rgba8(r, g, b, a)
    }
}
