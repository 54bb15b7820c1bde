// Legend layout: greedy left-to-right swatch packing with a background box

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::LEGEND_ENTRY_CAP;
use crate::ir::{Color, LegendBackground, LegendEntry, LegendItem, LegendPlan, Margins, Rect, TextAnchor, TextLabel};
use crate::metrics::{Metrics, LEGEND_FONT};
use crate::text::estimate_text_width;

/// Measurement passes allowed before the estimated background is kept
pub const REMEASURE_ATTEMPTS: usize = 3;

/// Where the legend may go: its top-left origin and the width it wraps at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendArea {
    pub x: f64,
    pub y: f64,
    pub wrap_width: f64,
}

impl LegendArea {
    /// Just above the plot area, slightly indented from its left edge
    pub fn above_plot(margins: &Margins, plot: &Rect, metrics: &Metrics) -> Self {
        LegendArea {
            x: plot.x + metrics.px(16.0),
            y: (margins.top - metrics.px(10.0)).max(0.0),
            wrap_width: plot.width,
        }
    }
}

/// Unique names in first-appearance order, at most twelve. Later duplicates
/// and entries past the cap are dropped silently.
pub fn collect_entries<I, S>(pairs: I) -> Vec<LegendEntry>
where
    I: IntoIterator<Item = (S, Color)>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|(name, _)| seen.insert(name.as_ref().to_string()))
        .take(LEGEND_ENTRY_CAP)
        .map(|(name, color)| LegendEntry {
            name: name.as_ref().to_string(),
            color,
        })
        .collect()
}

pub fn layout_legend(entries: &[LegendEntry], area: LegendArea, metrics: &Metrics) -> LegendPlan {
    let entries = collect_entries(entries.iter().map(|e| (e.name.as_str(), e.color)));

    let swatch = metrics.px(14.0);
    let label_pad = metrics.px(10.0);
    let row_pad = metrics.px(8.0);
    let gap = metrics.px(18.0);
    let font_size = metrics.px(LEGEND_FONT);
    let limit = area.x + area.wrap_width;

    let mut x_cur = area.x;
    let mut y_cur = area.y;
    let mut items = Vec::with_capacity(entries.len());

    for entry in entries {
        let label_width = estimate_text_width(&entry.name, font_size).round().max(swatch);
        let item_width = swatch + label_pad + label_width;

        let label = TextLabel::new(
            entry.name.clone(),
            x_cur + swatch + label_pad,
            y_cur + (swatch * 0.78).round(),
            font_size,
        )
        .bold()
        .color(Color::rgb(0x33, 0x33, 0x33))
        .anchor(TextAnchor::Start);

        items.push(LegendItem {
            entry,
            swatch: Rect::new(x_cur, y_cur, swatch, swatch),
            swatch_radius: metrics.px(3.0),
            label,
            label_width,
        });

        // Wrap once the cursor has run past the row, so an item may overhang it
        x_cur += item_width + gap;
        if x_cur > limit {
            x_cur = area.x;
            y_cur += swatch + row_pad;
        }
    }

    let padding_x = metrics.px(10.0);
    let padding_y = metrics.px(6.0);
    let background = LegendBackground {
        rect: estimated_bounds(&items).inflate(padding_x, padding_y),
        radius: metrics.px(10.0),
        fill: Color::WHITE,
        stroke: Color::rgb(0xd0, 0xd0, 0xd0),
        stroke_width: metrics.stroke_width(),
        padding_x,
        padding_y,
    };

    debug!(items = items.len(), rows = row_count(&items), "laid out legend");

    LegendPlan {
        items,
        background,
        measured: false,
    }
}

/// Union of the heuristic item extents
pub fn estimated_bounds(items: &[LegendItem]) -> Rect {
    items
        .iter()
        .map(LegendItem::bounds)
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default()
}

fn row_count(items: &[LegendItem]) -> usize {
    let mut rows: Vec<f64> = items.iter().map(|i| i.swatch.y).collect();
    rows.dedup();
    rows.len()
}

/// Real measurement of the painted legend. May report a zero-sized box while
/// fonts are not yet available on the surface.
pub trait BoundsMeasurer {
    fn measure(&mut self, legend: &LegendPlan) -> Rect;
}

impl<F> BoundsMeasurer for F
where
    F: FnMut(&LegendPlan) -> Rect,
{
    fn measure(&mut self, legend: &LegendPlan) -> Rect {
        self(legend)
    }
}

/// Re-fit the background box to measured bounds.
///
/// Asks the measurer up to three times and stops at the first non-zero size. If
/// every answer is empty the estimated box stays. Returns the number of
/// attempts made.
pub fn refine_legend_background<P>(legend: &mut LegendPlan, measurer: &mut P) -> usize
where
    P: BoundsMeasurer + ?Sized,
{
    for attempt in 1..=REMEASURE_ATTEMPTS {
        let measured = measurer.measure(legend);
        if !measured.is_empty() {
            let bg = &mut legend.background;
            bg.rect = measured.inflate(bg.padding_x, bg.padding_y);
            legend.measured = true;
            debug!(attempt, width = measured.width, height = measured.height, "legend measured");
            return attempt;
        }
        debug!(attempt, "legend measured zero size");
    }

    warn!(attempts = REMEASURE_ATTEMPTS, "legend never measured, keeping estimated background");
    REMEASURE_ATTEMPTS
}
