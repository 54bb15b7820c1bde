use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashviz::config::{ChartMode, ChartOptions, PRIORITIZE_DATA_COLOR, SHOW_LEGEND};
use dashviz::graph;
use dashviz::ir::CanvasSize;
use dashviz::parser::parse_size;
use dashviz::payload::{self, PayloadFormat};
use dashviz::runtime;
use dashviz::sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Emit {
    /// PNG bytes
    Png,
    /// The render plan as JSON
    Plan,
}

#[derive(Parser, Debug)]
#[command(name = "dashviz")]
#[command(about = "Lay out and render dashboard bar and line charts", long_about = None)]
struct Args {
    #[arg(short = 'm', long = "mode", value_enum, help = "Chart type")]
    mode: ChartMode,

    #[arg(short = 'i', long = "input", help = "Payload file (reads stdin when omitted)")]
    input: Option<PathBuf>,

    #[arg(short = 'f', long = "format", value_enum, help = "Payload format (detected when omitted)")]
    format: Option<PayloadFormat>,

    #[arg(long = "width", help = "Canvas width in pixels")]
    width: Option<f64>,

    #[arg(long = "height", help = "Canvas height in pixels")]
    height: Option<f64>,

    #[arg(long = "size", value_parser = parse_size, help = "Canvas size as WIDTHxHEIGHT")]
    size: Option<CanvasSize>,

    #[arg(long = "emit", value_enum, default_value = "png", help = "Output kind")]
    emit: Emit,

    #[arg(long = "prioritize-data-color", help = "Use valid row colors instead of the palette")]
    prioritize_data_color: bool,

    #[arg(long = "no-legend", help = "Hide the legend")]
    no_legend: bool,

    #[arg(long = "sample", help = "Ignore input and render the built-in sample data")]
    sample: bool,
}

impl Args {
    /// Explicit --width/--height beat --size; anything missing falls back later
    fn host_size(&self) -> Option<CanvasSize> {
        let width = self.width.or(self.size.map(|s| s.width));
        let height = self.height.or(self.size.map(|s| s.height));
        match (width, height) {
            (None, None) => None,
            (w, h) => Some(CanvasSize::new(w.unwrap_or(0.0), h.unwrap_or(0.0))),
        }
    }

    fn options(&self) -> ChartOptions {
        ChartOptions {
            show_legend: SHOW_LEGEND && !self.no_legend,
            prioritize_data_color: PRIORITIZE_DATA_COLOR || self.prioritize_data_color,
            ..ChartOptions::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let payload = if args.sample {
        sample::sample_payload(args.mode)
    } else if let Some(path) = &args.input {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        payload::read_payload(file, args.format).context("Failed to read payload")?
    } else {
        payload::read_payload_from_stdin(args.format).context("Failed to read payload from stdin")?
    };

    let plan = runtime::render(&payload, args.mode, args.host_size(), &args.options());

    let bytes = match args.emit {
        Emit::Png => graph::paint_png_or_placeholder(&plan).context("Failed to paint chart")?,
        Emit::Plan => serde_json::to_vec_pretty(&plan).context("Failed to serialize plan")?,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
