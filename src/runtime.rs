// Render boundary: picks the layout strategy and turns faults into placeholders

use tracing::{debug, error};

use crate::compiler::{layout_categorical_chart, layout_series_chart};
use crate::config::{ChartMode, ChartOptions};
use crate::error::LayoutError;
use crate::ir::{CanvasSize, Color, DataRow, PlanBody, RenderPlan, TextLabel};
use crate::payload::{extract_rows, Payload};

pub const FAULT_TITLE: &str = "Visualization error. Check console for details.";

/// Render a payload to a plan. Never fails: layout faults become the error
/// placeholder and empty input becomes "No data".
pub fn render(
    payload: &Payload,
    mode: ChartMode,
    host_size: Option<CanvasSize>,
    options: &ChartOptions,
) -> RenderPlan {
    // 1. Canvas from host, then container, then the fallback size
    let canvas = CanvasSize::resolve(host_size, payload.size);

    // 2. The payload's field label wins over the default y-axis title
    let options = ChartOptions {
        value_label: payload
            .value_label
            .clone()
            .unwrap_or_else(|| options.value_label.clone()),
        ..options.clone()
    };

    // 3. Rows and layout
    let rows = extract_rows(payload, mode);
    debug!(?mode, rows = rows.len(), width = canvas.width, height = canvas.height, "rendering");

    layout_or_fault(renderer_for(mode).as_ref(), &rows, canvas, &options)
}

/// Run a layout strategy, swapping any fault for the error placeholder
fn layout_or_fault(renderer: &dyn Renderer, rows: &[DataRow], canvas: CanvasSize, options: &ChartOptions) -> RenderPlan {
    match renderer.layout(rows, canvas, options) {
        Ok(plan) => plan,
        Err(err) => {
            error!(error = %err, "layout failed");
            fault_plan(canvas, &err.to_string())
        }
    }
}

/// Trait for the chart layout strategies
trait Renderer {
    fn layout(&self, rows: &[DataRow], canvas: CanvasSize, options: &ChartOptions) -> Result<RenderPlan, LayoutError>;
}

struct CategoricalRenderer;
impl Renderer for CategoricalRenderer {
    fn layout(&self, rows: &[DataRow], canvas: CanvasSize, options: &ChartOptions) -> Result<RenderPlan, LayoutError> {
        layout_categorical_chart(rows, canvas, options)
    }
}

struct SeriesRenderer;
impl Renderer for SeriesRenderer {
    fn layout(&self, rows: &[DataRow], canvas: CanvasSize, options: &ChartOptions) -> Result<RenderPlan, LayoutError> {
        layout_series_chart(rows, canvas, options)
    }
}

fn renderer_for(mode: ChartMode) -> Box<dyn Renderer> {
    match mode {
        ChartMode::Bar => Box::new(CategoricalRenderer),
        ChartMode::Line => Box::new(SeriesRenderer),
    }
}

/// Error placeholder: a red headline above centre and the message below it.
/// Unusable canvas sizes fall back to 900x350.
pub fn fault_plan(canvas: CanvasSize, message: &str) -> RenderPlan {
    let canvas = CanvasSize::resolve(Some(canvas), None);
    let cx = (canvas.width / 2.0).round();
    let cy = canvas.height / 2.0;

    let title = TextLabel::new(FAULT_TITLE, cx, (cy - 20.0).round(), 16.0)
        .bold()
        .color(Color::rgb(0xdd, 0x33, 0x33));
    let detail = TextLabel::new(format!("Error: {}", message), cx, (cy + 10.0).round(), 12.0)
        .color(Color::rgb(0x66, 0x66, 0x66));

    RenderPlan {
        width: canvas.width,
        height: canvas.height,
        background: Color::WHITE,
        body: PlanBody::Fault { title, detail },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::parse_payload;

    fn payload(text: &str) -> Payload {
        parse_payload(text, None).unwrap()
    }

    #[test]
    fn test_render_bar_payload() {
        let p = payload("Category,Value\nA,23\nB,45\nC,12\n");
        let plan = render(&p, ChartMode::Bar, None, &ChartOptions::default());
        let chart = plan.chart().expect("chart plan");
        assert_eq!(chart.mode, ChartMode::Bar);
        assert_eq!(chart.scale.nice_max, 52.0);
        assert_eq!((plan.width, plan.height), (900.0, 350.0));
    }

    #[test]
    fn test_render_uses_field_label() {
        let p = payload(r#"{"fields": {"Value": {"label": "Vakanču skaits"}}, "tables": {"DEFAULT": [{"Category": "A", "Value": 1}]}}"#);
        let plan = render(&p, ChartMode::Bar, None, &ChartOptions::default());
        assert_eq!(plan.chart().unwrap().frame.y_title.lines, vec!["Vakanču skaits"]);

        let p = payload("Category,Value\nA,1\n");
        let plan = render(&p, ChartMode::Bar, None, &ChartOptions::default());
        assert_eq!(plan.chart().unwrap().frame.y_title.lines, vec!["Value"]);
    }

    #[test]
    fn test_render_size_fallback_chain() {
        let p = payload(r#"{"tables": {"DEFAULT": [{"X": "Jan", "Value": 1}]}, "width": 1200, "height": 500}"#);

        let plan = render(&p, ChartMode::Line, None, &ChartOptions::default());
        assert_eq!((plan.width, plan.height), (1200.0, 500.0));

        let plan = render(&p, ChartMode::Line, Some(CanvasSize::new(700.0, 0.0)), &ChartOptions::default());
        assert_eq!((plan.width, plan.height), (700.0, 500.0));
    }

    #[test]
    fn test_render_empty_payload() {
        let plan = render(&Payload::default(), ChartMode::Line, None, &ChartOptions::default());
        assert!(plan.is_empty());
    }

    struct BrokenRenderer;
    impl Renderer for BrokenRenderer {
        fn layout(&self, _: &[DataRow], canvas: CanvasSize, _: &ChartOptions) -> Result<RenderPlan, LayoutError> {
            Err(LayoutError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            })
        }
    }

    #[test]
    fn test_render_small_canvas_is_not_a_fault() {
        let p = payload("Category,Value\nA,1\n");
        let plan = render(&p, ChartMode::Bar, Some(CanvasSize::new(100.0, 100.0)), &ChartOptions::default());
        assert!(plan.chart().is_some());
    }

    #[test]
    fn test_layout_fault_becomes_placeholder() {
        let rows = vec![DataRow::new("A", 1.0)];
        let plan = layout_or_fault(&BrokenRenderer, &rows, CanvasSize::new(100.0, 100.0), &ChartOptions::default());
        assert!(plan.is_fault());

        let labels = plan.labels();
        assert_eq!(labels[0].lines, vec![FAULT_TITLE]);
        assert_eq!(labels[0].y, 30.0);
        assert!(labels[1].text().starts_with("Error: "));
        assert_eq!(labels[1].y, 60.0);
        assert_eq!(plan.background, Color::WHITE);
    }

    #[test]
    fn test_fault_plan_with_unusable_canvas() {
        let plan = fault_plan(CanvasSize::new(f64::NAN, -1.0), "boom");
        assert_eq!((plan.width, plan.height), (900.0, 350.0));
        assert_eq!(plan.labels()[1].lines, vec!["Error: boom"]);
    }
}
