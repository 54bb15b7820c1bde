use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::{ChartMode, BASELINE_HEIGHT, BASELINE_WIDTH, DEFAULT_SERIES};

// =============================================================================
// Phase 1: Input
// =============================================================================

/// One input record after extraction from the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    /// Category (bar mode) or x-value (line mode)
    pub category: String,
    pub value: f64,
    pub series: Option<String>,
    /// Raw color string, validated only when data colors are enabled
    pub color: Option<String>,
}

impl DataRow {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        DataRow {
            category: category.into(),
            value,
            series: None,
            color: None,
        }
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Grouping key; rows without a series share the implicit one
    pub fn series_key(&self) -> &str {
        self.series.as_deref().unwrap_or(DEFAULT_SERIES)
    }
}

/// Drawable surface size in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const FALLBACK: CanvasSize = CanvasSize {
        width: BASELINE_WIDTH,
        height: BASELINE_HEIGHT,
    };

    pub fn new(width: f64, height: f64) -> Self {
        CanvasSize { width, height }
    }

    /// Host-declared size first, then the container's measured size, then 900x350.
    /// Each dimension falls back on its own.
    pub fn resolve(host: Option<CanvasSize>, container: Option<CanvasSize>) -> CanvasSize {
        let pick = |get: fn(&CanvasSize) -> f64, fallback: f64| {
            host.map(|s| get(&s))
                .filter(|v| v.is_finite() && *v > 0.0)
                .or_else(|| container.map(|s| get(&s)).filter(|v| v.is_finite() && *v > 0.0))
                .unwrap_or(fallback)
        };

        CanvasSize {
            width: pick(|s| s.width, BASELINE_WIDTH),
            height: pick(|s| s.height, BASELINE_HEIGHT),
        }
    }
}

// =============================================================================
// Phase 2: Grouping
// =============================================================================

/// A point of a series, tied to its slot in the shared x-domain.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub x_index: usize,
    pub x: String,
    pub y: f64,
    pub color: Option<String>,
}

/// Named group of rows forming one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// Ordered by `x_index`
    pub points: Vec<SeriesPoint>,
}

/// All series of a line chart plus the x-domain they share.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    pub x_domain: Vec<String>,
    pub series: Vec<Series>,
}

// =============================================================================
// Phase 3: Scaling
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scale {
    pub raw_max: f64,
    /// Axis ceiling, always > 0
    pub nice_max: f64,
    pub tick_step: f64,
    /// 0, step, 2*step, ... up to nice_max
    pub ticks: Vec<f64>,
}

impl Scale {
    /// Fraction of the axis covered by `value`, clamped to [0, 1]
    pub fn fraction(&self, value: f64) -> f64 {
        (value / self.nice_max).clamp(0.0, 1.0)
    }
}

// =============================================================================
// Phase 4: Render plan
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// Grow by `dx` on the left and right and `dy` on the top and bottom
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x - dx, self.y - dy, self.width + dx * 2.0, self.height + dy * 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

/// A piece of text. `y` is the baseline of the first line; further lines
/// step down by `line_height`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub weight: FontWeight,
    pub color: Color,
    pub anchor: TextAnchor,
    /// Degrees around (x, y); -90 reads bottom to top
    pub rotation: f64,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, x: f64, y: f64, font_size: f64) -> Self {
        TextLabel {
            lines: vec![text.into()],
            x,
            y,
            font_size,
            line_height: font_size,
            weight: FontWeight::Normal,
            color: Color::rgb(0x33, 0x33, 0x33),
            anchor: TextAnchor::Middle,
            rotation: 0.0,
        }
    }

    pub fn wrapped(lines: Vec<String>, x: f64, y: f64, font_size: f64, line_height: f64) -> Self {
        TextLabel {
            lines,
            line_height,
            ..TextLabel::new(String::new(), x, y, font_size)
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Dashed horizontal gridline at a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLine {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub dash: f64,
    pub stroke_width: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub y: f64,
    pub label: TextLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPlacement {
    /// Inside the bar near its top, light text
    Inside,
    /// Above the bar, dark text
    Outside,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub category: String,
    pub value: f64,
    pub color: Color,
    pub rect: Rect,
    /// Radius of the two top corners; the bottom is square
    pub corner_radius: f64,
    pub placement: LabelPlacement,
    pub value_label: TextLabel,
    pub category_label: TextLabel,
}

impl Bar {
    /// Outline with rounded top corners, each corner approximated by
    /// `segments` steps of its quadratic curve.
    pub fn outline(&self, segments: usize) -> Vec<(f64, f64)> {
        let Rect { x, y, width, height } = self.rect;
        let r = self.corner_radius.min(height / 2.0).min(width / 2.0).max(0.0);
        let (x1, y1) = (x + width, y + height);
        let segments = segments.max(1);

        let mut points = vec![(x, y1), (x1, y1), (x1, y + r)];
        points.extend(quad_curve((x1, y + r), (x1, y), (x1 - r, y), segments));
        points.push((x + r, y));
        points.extend(quad_curve((x + r, y), (x, y), (x, y + r), segments));
        points.dedup();
        points
    }
}

/// Points of a quadratic bezier after its start point.
fn quad_curve(p0: (f64, f64), c: (f64, f64), p1: (f64, f64), segments: usize) -> Vec<(f64, f64)> {
    (1..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let u = 1.0 - t;
            (
                u * u * p0.0 + 2.0 * u * t * c.0 + t * t * p1.0,
                u * u * p0.1 + 2.0 * u * t * c.1 + t * t * p1.1,
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x_index: usize,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub color: Color,
    pub label: TextLabel,
}

/// One line: a polyline through its markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPlot {
    pub name: String,
    pub color: Color,
    /// Equal to the marker diameter so the line reads as connected discs
    pub stroke_width: f64,
    pub marker_radius: f64,
    pub points: Vec<PlotPoint>,
}

impl SeriesPlot {
    pub fn polyline(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.y)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Marks {
    Bars { bars: Vec<Bar> },
    Lines { x_labels: Vec<TextLabel>, series: Vec<SeriesPlot> },
}

/// Axis furniture shared by both chart modes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub margins: Margins,
    /// Plot area inside the margins
    pub plot: Rect,
    pub grid: Vec<GridLine>,
    pub ticks: Vec<Tick>,
    pub y_title: TextLabel,
}

/// A (name, color) pair shown as swatch + label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub entry: LegendEntry,
    pub swatch: Rect,
    pub swatch_radius: f64,
    pub label: TextLabel,
    /// Heuristic label width used for packing
    pub label_width: f64,
}

impl LegendItem {
    /// Estimated extent of swatch + label
    pub fn bounds(&self) -> Rect {
        let label = Rect::new(
            self.label.x,
            self.label.y - self.label.font_size,
            self.label_width,
            self.label.font_size,
        );
        self.swatch.union(&label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendBackground {
    pub rect: Rect,
    pub radius: f64,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub padding_x: f64,
    pub padding_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendPlan {
    pub items: Vec<LegendItem>,
    pub background: LegendBackground,
    /// Whether the background came from a real measurement rather than the estimate
    pub measured: bool,
}

impl LegendPlan {
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.entry.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlan {
    pub mode: ChartMode,
    /// Responsive sizing factor every metric was multiplied by
    pub scale_factor: f64,
    pub scale: Scale,
    pub frame: Frame,
    pub marks: Marks,
    pub legend: Option<LegendPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanBody {
    Chart(ChartPlan),
    /// Zero rows: a single centred message
    Empty { message: TextLabel },
    /// Layout failed: headline plus the error text
    Fault { title: TextLabel, detail: TextLabel },
}

/// Everything a painter needs. Background is always opaque.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub body: PlanBody,
}

impl RenderPlan {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, PlanBody::Empty { .. })
    }

    pub fn is_fault(&self) -> bool {
        matches!(self.body, PlanBody::Fault { .. })
    }

    pub fn chart(&self) -> Option<&ChartPlan> {
        match &self.body {
            PlanBody::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    /// Every text element in paint order
    pub fn labels(&self) -> Vec<&TextLabel> {
        match &self.body {
            PlanBody::Empty { message } => vec![message],
            PlanBody::Fault { title, detail } => vec![title, detail],
            PlanBody::Chart(chart) => {
                let mut labels: Vec<&TextLabel> = chart.frame.ticks.iter().map(|t| &t.label).collect();
                match &chart.marks {
                    Marks::Bars { bars } => {
                        for bar in bars {
                            labels.push(&bar.value_label);
                            labels.push(&bar.category_label);
                        }
                    }
                    Marks::Lines { x_labels, series } => {
                        labels.extend(x_labels.iter());
                        labels.extend(series.iter().flat_map(|s| s.points.iter().map(|p| &p.label)));
                    }
                }
                labels.push(&chart.frame.y_title);
                if let Some(legend) = &chart.legend {
                    labels.extend(legend.items.iter().map(|i| &i.label));
                }
                labels
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(rect: Rect, corner_radius: f64) -> Bar {
        Bar {
            category: "A".to_string(),
            value: 1.0,
            color: Color::WHITE,
            rect,
            corner_radius,
            placement: LabelPlacement::Inside,
            value_label: TextLabel::new("1", 0.0, 0.0, 10.0),
            category_label: TextLabel::new("A", 0.0, 0.0, 10.0),
        }
    }

    #[test]
    fn test_resolve_prefers_host_size() {
        let size = CanvasSize::resolve(
            Some(CanvasSize::new(1200.0, 500.0)),
            Some(CanvasSize::new(300.0, 200.0)),
        );
        assert_eq!(size, CanvasSize::new(1200.0, 500.0));
    }

    #[test]
    fn test_resolve_falls_back_per_dimension() {
        let size = CanvasSize::resolve(
            Some(CanvasSize::new(0.0, 500.0)),
            Some(CanvasSize::new(640.0, -1.0)),
        );
        assert_eq!(size, CanvasSize::new(640.0, 500.0));

        let size = CanvasSize::resolve(None, None);
        assert_eq!(size, CanvasSize::FALLBACK);
    }

    #[test]
    fn test_color_display_is_hex() {
        assert_eq!(Color::rgb(17, 157, 157).to_string(), "#119d9d");
        assert_eq!(serde_json::to_string(&Color::WHITE).unwrap(), "\"#ffffff\"");
    }

    #[test]
    fn test_rect_union_and_inflate() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 20.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 25.0, 15.0));
        assert_eq!(a.inflate(2.0, 1.0), Rect::new(-2.0, -1.0, 14.0, 12.0));
        assert!(Rect::default().is_empty());
    }

    #[test]
    fn test_bar_outline_rounds_top_only() {
        let bar = make_bar(Rect::new(10.0, 20.0, 40.0, 100.0), 5.0);
        let outline = bar.outline(4);

        // Square bottom corners come first
        assert_eq!(outline[0], (10.0, 120.0));
        assert_eq!(outline[1], (50.0, 120.0));
        // Top corners are cut: the exact corner point is never on the outline
        assert!(!outline.contains(&(10.0, 20.0)));
        assert!(!outline.contains(&(50.0, 20.0)));
        assert!(outline.contains(&(45.0, 20.0)));
        assert_eq!(*outline.last().unwrap(), (10.0, 25.0));
        // Never leaves the bar rectangle
        assert!(outline.iter().all(|&(x, y)| (10.0..=50.0).contains(&x) && (20.0..=120.0).contains(&y)));
    }

    #[test]
    fn test_bar_outline_radius_clamped_to_height() {
        let bar = make_bar(Rect::new(0.0, 0.0, 40.0, 4.0), 10.0);
        let outline = bar.outline(2);
        assert!(outline.iter().all(|&(_, y)| (0.0..=4.0).contains(&y)));
    }
}
