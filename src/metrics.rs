// Responsive sizing: every visual metric is round(base * scale)

use crate::config::{ChartMode, BASELINE_HEIGHT, BASELINE_WIDTH};
use crate::ir::{CanvasSize, Margins};

pub const TICK_FONT: f64 = 22.0;
pub const AXIS_TITLE_FONT: f64 = 40.0;
pub const BAR_VALUE_FONT: f64 = 34.0;
pub const POINT_VALUE_FONT: f64 = 24.0;
pub const CATEGORY_FONT: f64 = 20.0;
pub const X_LABEL_FONT: f64 = 18.0;
pub const CATEGORY_LINE_HEIGHT: f64 = 22.0;
pub const LEGEND_FONT: f64 = 16.0;
pub const PLACEHOLDER_FONT: f64 = 20.0;

/// Clamped ratio of the canvas to the 900x350 design size
pub fn scale_factor(canvas: CanvasSize) -> f64 {
    (canvas.width / BASELINE_WIDTH)
        .min(canvas.height / BASELINE_HEIGHT)
        .clamp(0.75, 3.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub scale: f64,
}

impl Metrics {
    pub fn new(scale: f64) -> Self {
        Metrics { scale }
    }

    pub fn for_canvas(canvas: CanvasSize) -> Self {
        Metrics::new(scale_factor(canvas))
    }

    /// Scale a base pixel value
    pub fn px(&self, base: f64) -> f64 {
        (base * self.scale).round()
    }

    pub fn margins(&self, mode: ChartMode) -> Margins {
        let (bottom, left) = match mode {
            // Room for three lines of wrapped category labels
            ChartMode::Bar => (180.0, 100.0),
            ChartMode::Line => (80.0, 90.0),
        };
        Margins {
            top: self.px(24.0),
            right: self.px(28.0),
            bottom: self.px(bottom),
            left: self.px(left),
        }
    }

    pub fn stroke_width(&self) -> f64 {
        self.px(2.0).max(1.0)
    }

    pub fn dash_unit(&self) -> f64 {
        self.px(6.0).max(2.0)
    }

    pub fn marker_radius(&self) -> f64 {
        self.px(7.0).max(3.0)
    }
}
