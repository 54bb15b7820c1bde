use tracing::debug;

use crate::config::{ChartMode, ChartOptions, CATEGORY_LABEL_LINE_CAP, LABEL_INSIDE_THRESHOLD};
use crate::error::LayoutError;
use crate::ir::{
    Bar, CanvasSize, ChartPlan, Color, DataRow, Frame, GridLine, LabelPlacement, Margins, Marks, PlanBody,
    PlotPoint, Rect, RenderPlan, Scale, SeriesPlot, TextAnchor, TextLabel, Tick,
};
use crate::legend::{collect_entries, layout_legend, LegendArea};
use crate::metrics::{
    Metrics, AXIS_TITLE_FONT, BAR_VALUE_FONT, CATEGORY_FONT, CATEGORY_LINE_HEIGHT, PLACEHOLDER_FONT,
    POINT_VALUE_FONT, TICK_FONT, X_LABEL_FONT,
};
use crate::palette::ColorPalette;
use crate::parser::parse_color;
use crate::scale::compute_scale;
use crate::text::{max_chars_for_width, wrap_label};
use crate::transform::{group_series, sort_by_value_desc};

const TEXT_DARK: Color = Color::rgb(0x33, 0x33, 0x33);
const TEXT_MUTED: Color = Color::rgb(0x40, 0x40, 0x40);
const GRID: Color = Color::rgb(0xc0, 0xc0, 0xc0);

/// Bar-chart layout: one bar per row, largest first.
pub fn layout_categorical_chart(
    rows: &[DataRow],
    canvas: CanvasSize,
    options: &ChartOptions,
) -> Result<RenderPlan, LayoutError> {
    validate_canvas(canvas)?;
    if rows.is_empty() {
        return Ok(empty_plan(canvas));
    }

    let metrics = Metrics::for_canvas(canvas);
    let margins = metrics.margins(ChartMode::Bar);
    let plot = plot_area(canvas, &margins);

    // Colors follow the input order, before sorting
    let palette = ColorPalette::dashboard();
    let sorted = sort_by_value_desc(rows);
    let colors: Vec<Color> = sorted
        .iter()
        .map(|(idx, row)| palette.resolve(*idx, row.color.as_deref(), options.prioritize_data_color))
        .collect();

    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let scale = compute_scale(&values);
    let frame = build_frame(&scale, margins, plot, &metrics, &options.value_label);

    let step_x = plot.width / sorted.len() as f64;
    let bar_width = (step_x * 0.72).floor().max(8.0);
    let value_font = metrics.px(BAR_VALUE_FONT);
    let category_font = metrics.px(CATEGORY_FONT);
    let inside_pad = (value_font * 0.9 + 10.0 * metrics.scale).round();
    let outside_pad = metrics.px(10.0);

    let bars: Vec<Bar> = sorted
        .iter()
        .zip(&colors)
        .enumerate()
        .map(|(i, ((_, row), color))| {
            let x = plot.x + i as f64 * step_x + ((step_x - bar_width) / 2.0).floor();
            let height = scale.fraction(row.value) * plot.height;
            let y = plot.bottom() - height;
            let cx = x + bar_width / 2.0;

            let placement = label_placement(row.value, scale.raw_max);
            let value_label = match placement {
                LabelPlacement::Inside => TextLabel::new(
                    format_value(row.value),
                    cx,
                    (plot.y + inside_pad).max(y + inside_pad),
                    value_font,
                )
                .color(Color::WHITE),
                LabelPlacement::Outside => {
                    TextLabel::new(format_value(row.value), cx, (y - outside_pad).max(0.0), value_font)
                        .color(TEXT_MUTED)
                }
            }
            .bold();

            let lines = wrap_label(
                &row.category,
                max_chars_for_width(bar_width, category_font),
                CATEGORY_LABEL_LINE_CAP,
            );
            let category_label = TextLabel::wrapped(
                lines,
                cx,
                plot.bottom() + metrics.px(28.0),
                category_font,
                metrics.px(CATEGORY_LINE_HEIGHT),
            )
            .color(TEXT_DARK);

            Bar {
                category: row.category.clone(),
                value: row.value,
                color: *color,
                rect: Rect::new(x, y, bar_width, height),
                corner_radius: (bar_width / 8.0).floor().max(2.0),
                placement,
                value_label,
                category_label,
            }
        })
        .collect();

    let legend = options.show_legend.then(|| {
        let entries = collect_entries(bars.iter().map(|b| (b.category.as_str(), b.color)));
        layout_legend(&entries, LegendArea::above_plot(&margins, &plot, &metrics), &metrics)
    });

    debug!(bars = bars.len(), bar_width, scale = metrics.scale, "laid out bar chart");

    Ok(chart_plan(
        canvas,
        ChartPlan {
            mode: ChartMode::Bar,
            scale_factor: metrics.scale,
            scale,
            frame,
            marks: Marks::Bars { bars },
            legend,
        },
    ))
}

/// Line-chart layout: one polyline per series over a shared x-domain.
pub fn layout_series_chart(
    rows: &[DataRow],
    canvas: CanvasSize,
    options: &ChartOptions,
) -> Result<RenderPlan, LayoutError> {
    validate_canvas(canvas)?;
    if rows.is_empty() {
        return Ok(empty_plan(canvas));
    }

    let metrics = Metrics::for_canvas(canvas);
    let margins = metrics.margins(ChartMode::Line);
    let plot = plot_area(canvas, &margins);

    let set = group_series(rows);
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let scale = compute_scale(&values);
    let frame = build_frame(&scale, margins, plot, &metrics, &options.value_label);

    // Endpoints sit on the plot edges; a single x sits on the left edge
    let step_x = plot.width / set.x_domain.len().saturating_sub(1).max(1) as f64;
    let x_at = |index: usize| plot.x + index as f64 * step_x;

    let x_labels: Vec<TextLabel> = set
        .x_domain
        .iter()
        .enumerate()
        .map(|(i, x)| {
            TextLabel::new(x.clone(), x_at(i), plot.bottom() + metrics.px(28.0), metrics.px(X_LABEL_FONT))
                .color(TEXT_DARK)
        })
        .collect();

    let palette = ColorPalette::dashboard();
    let marker_radius = metrics.marker_radius();
    let label_lift = (marker_radius + 6.0 * metrics.scale).round();
    let value_font = metrics.px(POINT_VALUE_FONT);

    let series: Vec<SeriesPlot> = set
        .series
        .iter()
        .enumerate()
        .map(|(si, s)| {
            let data_color = |raw: Option<&str>| {
                if options.prioritize_data_color {
                    raw.and_then(parse_color)
                } else {
                    None
                }
            };
            let color = s
                .points
                .iter()
                .find_map(|p| data_color(p.color.as_deref()))
                .unwrap_or_else(|| palette.get_color(si));

            let points = s
                .points
                .iter()
                .map(|p| {
                    let x = x_at(p.x_index);
                    let y = plot.bottom() - scale.fraction(p.y) * plot.height;
                    PlotPoint {
                        x_index: p.x_index,
                        x,
                        y,
                        value: p.y,
                        color: data_color(p.color.as_deref()).unwrap_or_else(|| palette.get_color(si)),
                        label: TextLabel::new(format_value(p.y), x, y - label_lift, value_font)
                            .bold()
                            .color(TEXT_MUTED),
                    }
                })
                .collect();

            SeriesPlot {
                name: s.name.clone(),
                color,
                stroke_width: marker_radius * 2.0,
                marker_radius,
                points,
            }
        })
        .collect();

    let legend = options.show_legend.then(|| {
        let entries = collect_entries(series.iter().map(|s| (s.name.as_str(), s.color)));
        layout_legend(&entries, LegendArea::above_plot(&margins, &plot, &metrics), &metrics)
    });

    debug!(
        series = series.len(),
        x_values = set.x_domain.len(),
        scale = metrics.scale,
        "laid out line chart"
    );

    Ok(chart_plan(
        canvas,
        ChartPlan {
            mode: ChartMode::Line,
            scale_factor: metrics.scale,
            scale,
            frame,
            marks: Marks::Lines { x_labels, series },
            legend,
        },
    ))
}

/// "No data" centred on an opaque canvas
pub fn empty_plan(canvas: CanvasSize) -> RenderPlan {
    let metrics = Metrics::for_canvas(canvas);
    let message = TextLabel::new(
        "No data",
        (canvas.width / 2.0).round(),
        (canvas.height / 2.0).round(),
        metrics.px(PLACEHOLDER_FONT),
    )
    .bold()
    .color(Color::rgb(0x77, 0x77, 0x77));

    RenderPlan {
        width: canvas.width,
        height: canvas.height,
        background: Color::WHITE,
        body: PlanBody::Empty { message },
    }
}

/// Value label policy: tall bars carry the label inside
pub fn label_placement(value: f64, raw_max: f64) -> LabelPlacement {
    let ratio = if raw_max != 0.0 { value / raw_max } else { 0.0 };
    if ratio >= LABEL_INSIDE_THRESHOLD {
        LabelPlacement::Inside
    } else {
        LabelPlacement::Outside
    }
}

/// Values are shown rounded to whole numbers, halves rounding up
pub fn format_value(value: f64) -> String {
    format!("{}", (value + 0.5).floor())
}

fn chart_plan(canvas: CanvasSize, chart: ChartPlan) -> RenderPlan {
    RenderPlan {
        width: canvas.width,
        height: canvas.height,
        background: Color::WHITE,
        body: PlanBody::Chart(chart),
    }
}

fn validate_canvas(canvas: CanvasSize) -> Result<(), LayoutError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(canvas.width) && valid(canvas.height) {
        Ok(())
    } else {
        Err(LayoutError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        })
    }
}

/// Area inside the margins, never narrower or shorter than 1px
fn plot_area(canvas: CanvasSize, margins: &Margins) -> Rect {
    Rect::new(
        margins.left,
        margins.top,
        (canvas.width - margins.left - margins.right).max(1.0),
        (canvas.height - margins.top - margins.bottom).max(1.0),
    )
}

/// Gridlines, tick labels and the rotated y-axis title
fn build_frame(scale: &Scale, margins: Margins, plot: Rect, metrics: &Metrics, value_label: &str) -> Frame {
    let dash = metrics.dash_unit();
    let stroke_width = metrics.stroke_width();
    let tick_font = metrics.px(TICK_FONT);

    let (grid, ticks): (Vec<GridLine>, Vec<Tick>) = scale
        .ticks
        .iter()
        .map(|&t| {
            let y = plot.bottom() - (t / scale.nice_max) * plot.height;
            let line = GridLine {
                x1: plot.x,
                x2: plot.right(),
                y,
                dash,
                stroke_width,
                color: GRID,
            };
            let tick = Tick {
                value: t,
                y,
                label: TextLabel::new(format_value(t), plot.x - metrics.px(12.0), y + metrics.px(5.0), tick_font)
                    .anchor(TextAnchor::End)
                    .color(TEXT_MUTED),
            };
            (line, tick)
        })
        .unzip();

    let title_x = metrics.px(34.0);
    let y_title = TextLabel::new(value_label, title_x, plot.y + plot.height / 2.0, metrics.px(AXIS_TITLE_FONT))
        .bold()
        .color(TEXT_DARK)
        .rotated(-90.0);

    Frame {
        margins,
        plot,
        grid,
        ticks,
        y_title,
    }
}
