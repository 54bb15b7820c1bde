// Color palette for categories and series

use tracing::debug;

use crate::config::PALETTE;
use crate::ir::Color;
use crate::parser::parse_color;

/// Color palette cycled by category/series index
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    /// The fixed five-color dashboard palette
    pub fn dashboard() -> Self {
        ColorPalette::from_hex(&PALETTE)
    }

    /// Build from hex strings, skipping any that do not parse
    pub fn from_hex(colors: &[&str]) -> Self {
        let colors: Vec<Color> = colors.iter().filter_map(|c| parse_color(c)).collect();
        ColorPalette {
            colors: if colors.is_empty() { vec![Color::rgb(0x11, 0x9d, 0x9d)] } else { colors },
        }
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// Palette color for `index`, unless data colors are enabled and `data_color`
    /// parses. Malformed data colors fall back silently.
    pub fn resolve(&self, index: usize, data_color: Option<&str>, prioritize_data_color: bool) -> Color {
        if prioritize_data_color {
            if let Some(raw) = data_color {
                match parse_color(raw) {
                    Some(color) => return color,
                    None => debug!(color = raw, "unrecognised data color, using palette"),
                }
            }
        }
        self.get_color(index)
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        ColorPalette::dashboard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_palette() {
        let palette = ColorPalette::dashboard();
        assert_eq!(palette.get_color(0), Color::rgb(0x11, 0x9d, 0x9d));
        assert_eq!(palette.get_color(4), Color::rgb(0x4d, 0x60, 0x63));
        // Test wrapping
        assert_eq!(palette.get_color(5), palette.get_color(0));
        assert_eq!(palette.get_color(11), palette.get_color(1));
    }

    #[test]
    fn test_resolve_ignores_data_color_when_disabled() {
        let palette = ColorPalette::dashboard();
        assert_eq!(palette.resolve(1, Some("#ff0000"), false), palette.get_color(1));
    }

    #[test]
    fn test_resolve_prefers_valid_data_color() {
        let palette = ColorPalette::dashboard();
        assert_eq!(palette.resolve(1, Some("#ff0000"), true), Color::rgb(255, 0, 0));
        assert_eq!(palette.resolve(1, Some("rgb(0, 0, 255)"), true), Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_resolve_malformed_falls_back() {
        let palette = ColorPalette::dashboard();
        assert_eq!(palette.resolve(2, Some("crimson"), true), palette.get_color(2));
        assert_eq!(palette.resolve(3, None, true), palette.get_color(3));
    }

    #[test]
    fn test_from_hex_never_empty() {
        let palette = ColorPalette::from_hex(&["nope"]);
        assert_eq!(palette.get_color(7), Color::rgb(0x11, 0x9d, 0x9d));
    }
}
