use std::collections::HashMap;

use crate::ir::{DataRow, Series, SeriesPoint, SeriesSet};

/// Rows ordered by value, largest first, each paired with its input index.
/// Ties keep their input order.
pub fn sort_by_value_desc(rows: &[DataRow]) -> Vec<(usize, &DataRow)> {
    let mut indexed: Vec<(usize, &DataRow)> = rows.iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.value.total_cmp(&a.1.value));
    indexed
}

/// Group rows into series over a shared x-domain.
///
/// The domain lists distinct x-values in first-appearance order across all
/// rows, series appear in the order their key is first seen, and every series'
/// points follow the domain order. A series lacking some x simply has no point
/// there.
pub fn group_series(rows: &[DataRow]) -> SeriesSet {
    // 1. Shared x-domain
    let mut x_index: HashMap<&str, usize> = HashMap::new();
    let mut x_domain = Vec::new();
    for row in rows {
        if !x_index.contains_key(row.category.as_str()) {
            x_index.insert(row.category.as_str(), x_domain.len());
            x_domain.push(row.category.clone());
        }
    }

    // 2. Group by series key
    let mut series_index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<Series> = Vec::new();
    for row in rows {
        let key = row.series_key();
        let slot = *series_index.entry(key).or_insert_with(|| {
            series.push(Series {
                name: key.to_string(),
                points: Vec::new(),
            });
            series.len() - 1
        });

        series[slot].points.push(SeriesPoint {
            x_index: x_index[row.category.as_str()],
            x: row.category.clone(),
            y: row.value,
            color: row.color.clone(),
        });
    }

    // 3. Order points along the domain
    for s in &mut series {
        s.points.sort_by_key(|p| p.x_index);
    }

    SeriesSet { x_domain, series }
}
