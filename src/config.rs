// Compile-time chart constants and per-render options

use serde::Serialize;

/// Fixed series/category palette, cycled by index.
pub const PALETTE: [&str; 5] = ["#119d9d", "#48aeb3", "#1a686c", "#8cd7d6", "#4d6063"];

/// Draw a legend above the chart.
pub const SHOW_LEGEND: bool = true;

/// Prefer a valid `Color` field from the data over the palette.
pub const PRIORITIZE_DATA_COLOR: bool = false;

/// Approximate number of ticks on the value axis.
pub const TARGET_TICK_COUNT: f64 = 8.0;

/// Headroom above the largest value so the tallest mark never touches the top.
pub const HEADROOM: f64 = 1.15;

/// Bars at or above this fraction of the maximum carry their value label inside.
pub const LABEL_INSIDE_THRESHOLD: f64 = 0.15;

/// Legend entries past this many are dropped.
pub const LEGEND_ENTRY_CAP: usize = 12;

/// Wrapped category labels keep at most this many lines.
pub const CATEGORY_LABEL_LINE_CAP: usize = 3;

/// The layout was designed at this size; everything scales relative to it.
pub const BASELINE_WIDTH: f64 = 900.0;
pub const BASELINE_HEIGHT: f64 = 350.0;

/// Series name used when rows carry no `Series` field.
pub const DEFAULT_SERIES: &str = "Series";

/// Y-axis title used when the payload does not label the value field.
pub const DEFAULT_VALUE_LABEL: &str = "Value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// One bar per row, sorted by value
    Bar,
    /// One line per series over a shared x-domain
    Line,
}

/// Switches that vary between renders. Defaults come from the constants above.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub show_legend: bool,
    pub prioritize_data_color: bool,
    /// Y-axis title
    pub value_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            show_legend: SHOW_LEGEND,
            prioritize_data_color: PRIORITIZE_DATA_COLOR,
            value_label: DEFAULT_VALUE_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_follow_constants() {
        let options = ChartOptions::default();
        assert_eq!(options.show_legend, SHOW_LEGEND);
        assert_eq!(options.prioritize_data_color, PRIORITIZE_DATA_COLOR);
        assert_eq!(options.value_label, "Value");
    }
}
