// plotters painter for render plans, encoded to PNG

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, error};

use crate::ir::{
    CanvasSize, ChartPlan, FontWeight, Frame, LegendPlan, Marks, PlanBody, Rect, RenderPlan, TextAnchor,
    TextLabel,
};
use crate::legend::refine_legend_background;
use crate::runtime::fault_plan;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Segments per rounded corner
const CORNER_SEGMENTS: usize = 6;

/// Paint a plan, never leaving the surface blank: a painting fault paints the
/// error panel instead, and if that fails too the bare background is encoded.
pub fn paint_png_or_placeholder(plan: &RenderPlan) -> Result<Vec<u8>> {
    paint_with_fallback(plan, paint_png)
}

fn paint_with_fallback<F>(plan: &RenderPlan, paint: F) -> Result<Vec<u8>>
where
    F: Fn(&RenderPlan) -> Result<Vec<u8>>,
{
    let err = match paint(plan) {
        Ok(png) => return Ok(png),
        Err(err) => err,
    };
    error!(error = %format!("{:#}", err), "painting failed, drawing error panel");

    let fault = fault_plan(CanvasSize::new(plan.width, plan.height), &err.to_string());
    match paint(&fault) {
        Ok(png) => Ok(png),
        Err(err) => {
            error!(error = %format!("{:#}", err), "error panel failed, emitting background only");
            blank_png(&fault)
        }
    }
}

/// The plan's background with nothing drawn on it
fn blank_png(plan: &RenderPlan) -> Result<Vec<u8>> {
    let (width, height) = pixel_size(plan);
    let bg = plan.background;
    let buffer: Vec<u8> = std::iter::repeat([bg.r, bg.g, bg.b])
        .take((width * height) as usize)
        .flatten()
        .collect();
    encode_png(&buffer, width, height)
}

fn pixel_size(plan: &RenderPlan) -> (u32, u32) {
    (plan.width.round().max(1.0) as u32, plan.height.round().max(1.0) as u32)
}

/// Paint any plan (chart, "No data", error) and encode it as PNG.
pub fn paint_png(plan: &RenderPlan) -> Result<Vec<u8>> {
    let (width, height) = pixel_size(plan);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();

        root.fill(&to_rgb(plan.background))
            .context("Failed to fill background")?;

        match &plan.body {
            PlanBody::Chart(chart) => paint_chart(&root, chart)?,
            PlanBody::Empty { message } => draw_label(&root, message)?,
            PlanBody::Fault { title, detail } => {
                draw_label(&root, title)?;
                draw_label(&root, detail)?;
            }
        }

        root.present().context("Failed to present drawing")?;
    }

    encode_png(&buffer, width, height)
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn paint_chart(root: &Area, chart: &ChartPlan) -> Result<()> {
    paint_frame(root, &chart.frame)?;

    match &chart.marks {
        Marks::Bars { bars } => {
            for bar in bars {
                if bar.rect.height > 0.0 {
                    let outline: Vec<(i32, i32)> = bar.outline(CORNER_SEGMENTS).into_iter().map(|(x, y)| pt(x, y)).collect();
                    root.draw(&Polygon::new(outline, to_rgb(bar.color).filled()))
                        .context("Failed to draw bar")?;
                }
                draw_label(root, &bar.value_label)?;
                draw_label(root, &bar.category_label)?;
            }
        }
        Marks::Lines { x_labels, series } => {
            for label in x_labels {
                draw_label(root, label)?;
            }
            for s in series {
                let style = to_rgb(s.color).stroke_width(s.stroke_width.round() as u32);
                let path: Vec<(i32, i32)> = s.polyline().into_iter().map(|(x, y)| pt(x, y)).collect();
                root.draw(&PathElement::new(path, style))
                    .context("Failed to draw series line")?;

                for p in &s.points {
                    root.draw(&Circle::new(pt(p.x, p.y), s.marker_radius.round() as i32, to_rgb(p.color).filled()))
                        .context("Failed to draw marker")?;
                    draw_label(root, &p.label)?;
                }
            }
        }
    }

    if let Some(legend) = &chart.legend {
        // Fit the background to real text extents before painting it
        let mut legend = legend.clone();
        let mut measurer = |l: &LegendPlan| measure_legend(root, l);
        let attempts = refine_legend_background(&mut legend, &mut measurer);
        debug!(attempts, measured = legend.measured, "legend refined");
        paint_legend(root, &legend)?;
    }

    Ok(())
}

fn paint_frame(root: &Area, frame: &Frame) -> Result<()> {
    for line in &frame.grid {
        let style = to_rgb(line.color).stroke_width(line.stroke_width.round() as u32);
        for (x1, x2) in dash_segments(line.x1, line.x2, line.dash) {
            root.draw(&PathElement::new(vec![pt(x1, line.y), pt(x2, line.y)], style))
                .context("Failed to draw gridline")?;
        }
    }
    for tick in &frame.ticks {
        draw_label(root, &tick.label)?;
    }
    draw_label(root, &frame.y_title)
}

fn paint_legend(root: &Area, legend: &LegendPlan) -> Result<()> {
    let bg = &legend.background;
    let outline = rounded_rect(&bg.rect, bg.radius);
    root.draw(&Polygon::new(outline.clone(), to_rgb(bg.fill).filled()))
        .context("Failed to draw legend background")?;

    let mut border = outline;
    if let Some(first) = border.first().copied() {
        border.push(first);
    }
    root.draw(&PathElement::new(border, to_rgb(bg.stroke).stroke_width(bg.stroke_width.round() as u32)))
        .context("Failed to draw legend border")?;

    for item in &legend.items {
        root.draw(&Polygon::new(
            rounded_rect(&item.swatch, item.swatch_radius),
            to_rgb(item.entry.color).filled(),
        ))
        .context("Failed to draw legend swatch")?;
        draw_label(root, &item.label)?;
    }
    Ok(())
}

/// Real extents of the legend items, or an empty rect when text cannot be measured
fn measure_legend(root: &Area, legend: &LegendPlan) -> Rect {
    let extents: Option<Vec<Rect>> = legend
        .items
        .iter()
        .map(|item| {
            let label = &item.label;
            let (w, h) = root.estimate_text_size(&label.text(), &text_style(label)).ok()?;
            if w == 0 || h == 0 {
                return None;
            }
            let text = Rect::new(label.x, label.y - h as f64, w as f64, h as f64);
            Some(item.swatch.union(&text))
        })
        .collect();

    extents
        .and_then(|rects| rects.into_iter().reduce(|a, b| a.union(&b)))
        .unwrap_or_default()
}

fn draw_label(root: &Area, label: &TextLabel) -> Result<()> {
    let style = text_style(label);
    for (i, line) in label.lines.iter().enumerate() {
        let y = label.y + i as f64 * label.line_height;
        root.draw(&Text::new(line.clone(), pt(label.x, y), style.clone()))
            .context("Failed to draw text")?;
    }
    Ok(())
}

fn text_style(label: &TextLabel) -> TextStyle<'static> {
    let weight = match label.weight {
        FontWeight::Normal => FontStyle::Normal,
        FontWeight::Bold => FontStyle::Bold,
    };
    let h_pos = match label.anchor {
        TextAnchor::Start => HPos::Left,
        TextAnchor::Middle => HPos::Center,
        TextAnchor::End => HPos::Right,
    };

    let style = FontDesc::new(FontFamily::SansSerif, label.font_size, weight)
        .color(&to_rgb(label.color))
        .pos(Pos::new(h_pos, VPos::Bottom));

    if label.rotation != 0.0 {
        style.transform(FontTransform::Rotate270)
    } else {
        style
    }
}

fn to_rgb(color: crate::ir::Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn pt(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// On/off runs of `dash` pixels from `x1` to `x2`
fn dash_segments(x1: f64, x2: f64, dash: f64) -> Vec<(f64, f64)> {
    if dash <= 0.0 {
        return vec![(x1, x2)];
    }
    let mut segments = Vec::new();
    let mut x = x1;
    while x < x2 {
        segments.push((x, (x + dash).min(x2)));
        x += dash * 2.0;
    }
    segments
}

/// Closed outline of a rectangle with all four corners rounded
fn rounded_rect(rect: &Rect, radius: f64) -> Vec<(i32, i32)> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let corners = [
        (rect.right() - r, rect.y + r, -90.0),
        (rect.right() - r, rect.bottom() - r, 0.0),
        (rect.x + r, rect.bottom() - r, 90.0),
        (rect.x + r, rect.y + r, 180.0),
    ];

    let mut points: Vec<(i32, i32)> = corners
        .iter()
        .flat_map(|&(cx, cy, start)| {
            (0..=CORNER_SEGMENTS).map(move |i| {
                let angle = (start + 90.0 * i as f64 / CORNER_SEGMENTS as f64).to_radians();
                pt(cx + r * angle.cos(), cy + r * angle.sin())
            })
        })
        .collect();
    points.dedup();
    points
}
