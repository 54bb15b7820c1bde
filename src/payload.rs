// Payload reading: host rows (CSV or JSON) into DataRows

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::{self, Read};
use tracing::{debug, warn};

use crate::config::ChartMode;
use crate::ir::{CanvasSize, DataRow};

/// A row as delivered by the host: field name to value.
pub type Record = Map<String, Value>;

/// Rows plus the bits of host metadata the renderers use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub rows: Vec<Record>,
    /// Label of the Value field, used as the y-axis title
    pub value_label: Option<String>,
    /// Size measured on the container, if the payload carries one
    pub size: Option<CanvasSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PayloadFormat {
    Csv,
    Json,
}

impl PayloadFormat {
    /// JSON when the text opens with `{` or `[`, CSV otherwise
    pub fn detect(text: &str) -> Self {
        match text.trim_start().chars().next() {
            Some('{') | Some('[') => PayloadFormat::Json,
            _ => PayloadFormat::Csv,
        }
    }
}

pub fn read_payload_from_stdin(format: Option<PayloadFormat>) -> Result<Payload> {
    read_payload(io::stdin(), format)
}

pub fn read_payload<R: Read>(mut reader: R, format: Option<PayloadFormat>) -> Result<Payload> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read payload")?;

    parse_payload(&text, format)
}

pub fn parse_payload(text: &str, format: Option<PayloadFormat>) -> Result<Payload> {
    let format = format.unwrap_or_else(|| PayloadFormat::detect(text));
    debug!(?format, bytes = text.len(), "parsing payload");

    match format {
        PayloadFormat::Csv => parse_csv(text),
        PayloadFormat::Json => parse_json(text),
    }
}

/// Header row names the fields; every cell arrives as a string.
pub fn parse_csv(text: &str) -> Result<Payload> {
    if text.trim().is_empty() {
        return Ok(Payload::default());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(Payload {
        rows,
        ..Payload::default()
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    Rows(Vec<Record>),
    Host(HostPayload),
}

#[derive(Deserialize)]
struct HostPayload {
    #[serde(default)]
    fields: Fields,
    #[serde(default)]
    tables: Tables,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Deserialize, Default)]
struct Tables {
    #[serde(rename = "DEFAULT", default)]
    default: Vec<Record>,
}

#[derive(Deserialize, Default)]
struct Fields {
    #[serde(rename = "Value")]
    value: Option<FieldInfo>,
}

#[derive(Deserialize)]
struct FieldInfo {
    label: Option<String>,
}

/// Either a bare array of rows or the host shape
/// `{"fields": {"Value": {"label": ..}}, "tables": {"DEFAULT": [..]}, "width": .., "height": ..}`.
pub fn parse_json(text: &str) -> Result<Payload> {
    let payload: JsonPayload = serde_json::from_str(text).context("Failed to parse JSON payload")?;

    Ok(match payload {
        JsonPayload::Rows(rows) => Payload {
            rows,
            ..Payload::default()
        },
        JsonPayload::Host(host) => {
            let size = match (host.width, host.height) {
                (None, None) => None,
                (w, h) => Some(CanvasSize::new(w.unwrap_or(0.0), h.unwrap_or(0.0))),
            };
            Payload {
                rows: host.tables.default,
                value_label: host.fields.value.and_then(|f| f.label).filter(|l| !l.is_empty()),
                size,
            }
        }
    })
}

/// Field names holding the category (bar) or x-value (line)
fn category_keys(mode: ChartMode) -> &'static [&'static str] {
    match mode {
        ChartMode::Bar => &["Category", "category"],
        ChartMode::Line => &["X", "x"],
    }
}

/// Pull typed rows out of the payload. Never fails: bad values become 0,
/// missing categories become "".
pub fn extract_rows(payload: &Payload, mode: ChartMode) -> Vec<DataRow> {
    payload
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, record)| {
            let raw_value = lookup(record, &["Value", "value"]);
            let value = coerce_number(raw_value);
            if let Some(raw) = raw_value.filter(|v| value == 0.0 && !is_zero_like(v)) {
                warn!(row = row_idx + 1, raw = %raw, "non-numeric value coerced to 0");
            }

            DataRow {
                category: lookup(record, category_keys(mode))
                    .map(coerce_string)
                    .unwrap_or_default(),
                value,
                series: lookup(record, &["Series"]).map(coerce_string).filter(|s| !s.is_empty()),
                color: lookup_text(record, &["Color", "color"]),
            }
        })
        .collect()
}

/// First key present with a non-null value
fn lookup<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| !v.is_null())
}

/// Numeric coercion: numbers pass through, numeric text parses, booleans
/// are 1/0, everything else (including NaN and infinities) is 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    };

    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Values that legitimately coerce to 0 and need no warning
fn is_zero_like(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty() || s.trim().parse::<f64>() == Ok(0.0),
        Value::Number(_) | Value::Bool(false) | Value::Null => true,
        _ => false,
    }
}

/// First key holding non-empty text; an empty `Color` does not hide `color`
fn lookup_text(record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .map(coerce_string)
        .find(|s| !s.is_empty())
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
