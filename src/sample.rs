// Built-in development payloads, used only with --sample

use serde_json::{json, Value};

use crate::config::ChartMode;
use crate::payload::{Payload, Record};

/// The development dataset for each chart mode
pub fn sample_payload(mode: ChartMode) -> Payload {
    match mode {
        ChartMode::Bar => Payload {
            rows: [
                ("Sabiedrība ar ierobežotu atbildību \"LPP Latvia ltd\"", 77),
                ("SIA \"APRANGA LV\"", 44),
                ("SPORTLAND, Sabiedrība ar ierobežotu atbildību", 28),
                ("Sabiedrība ar ierobežotu atbildību \"New Yorker Latvija\"", 28),
                ("SIA \"Stockmann\"", 21),
                ("SIA \"Lindex Latvia\"", 16),
                ("POLDMA KAUBANDUSE AKTSIASELTS filiāle Latvijā", 10),
                ("SIA WEEKEND LATVIA", 10),
                ("SIA \"CCC Shoes Latvia\"", 9),
                ("SIA \"Eiropas Apavi\"", 6),
                ("SIA Danbalt Footwear", 5),
            ]
            .into_iter()
            .map(|(category, value)| record(json!({ "Category": category, "Value": value })))
            .collect(),
            value_label: Some("Vakanču skaits".to_string()),
            size: None,
        },
        ChartMode::Line => Payload {
            rows: [
                ("Jan", 10, "A"),
                ("Feb", 15, "A"),
                ("Mar", 9, "A"),
                ("Jan", 8, "B"),
                ("Feb", 12, "B"),
                ("Mar", 14, "B"),
            ]
            .into_iter()
            .map(|(x, value, series)| record(json!({ "X": x, "Value": value, "Series": series })))
            .collect(),
            value_label: Some("Value".to_string()),
            size: None,
        },
    }
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::extract_rows;

    #[test]
    fn test_bar_sample() {
        let payload = sample_payload(ChartMode::Bar);
        let rows = extract_rows(&payload, ChartMode::Bar);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].value, 77.0);
        assert_eq!(rows[10].category, "SIA Danbalt Footwear");
        assert_eq!(payload.value_label.as_deref(), Some("Vakanču skaits"));
    }

    #[test]
    fn test_line_sample() {
        let payload = sample_payload(ChartMode::Line);
        let rows = extract_rows(&payload, ChartMode::Line);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[3].category, "Jan");
        assert_eq!(rows[3].series.as_deref(), Some("B"));
    }
}
