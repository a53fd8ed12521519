//! Histogram and frequency-table builders.

use crate::types::{ChartConfig, ChartKind, ChartPoint, Value};
use std::collections::HashMap;

/// Number of histogram bins for `count` values: `ceil(sqrt(count))` clamped to `[min, max]`.
///
/// The bounds are taken in either order and the result is at least 1.
pub(crate) fn bin_count(count: usize, min: usize, max: usize) -> usize {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    ((count as f64).sqrt().ceil() as usize)
        .max(low)
        .min(high)
        .max(1)
}

/// Equal-width histogram over `values`.
///
/// Bins are half-open `[lo, hi)` except the last, which also takes every
/// value at or above its lower bound so the maximum is always counted.
/// A zero range uses a bin width of 1. Returns `None` for no values.
pub(crate) fn histogram(
    column: &str,
    values: &[f64],
    bins: usize,
    color: &str,
) -> Option<ChartConfig> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = match (max - min) / bins as f64 {
        w if w > 0.0 && w.is_finite() => w,
        _ => 1.0,
    };

    let data = (0..bins)
        .map(|i| {
            let lo = min + i as f64 * width;
            let hi = lo + width;
            let last = i == bins - 1;
            let count = values
                .iter()
                .filter(|&&v| v >= lo && (last || v < hi))
                .count();
            ChartPoint::new(format!("{:.1}", lo + 0.0), count)
        })
        .collect();

    Some(ChartConfig {
        kind: ChartKind::Histogram,
        title: format!("Distribution of {}", column),
        data_key: column.to_string(),
        data,
        color: color.to_string(),
    })
}

/// Frequency table of rendered cell values, most frequent first.
///
/// Absent cells count under `placeholder`. Ties keep first-seen order.
pub(crate) fn frequency_table<'a>(
    column: &str,
    cells: impl Iterator<Item = &'a Value>,
    placeholder: &str,
    top: usize,
    color: &str,
) -> ChartConfig {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for cell in cells {
        let key = match cell {
            Value::Absent => placeholder.to_string(),
            other => other.render(),
        };
        match index.get(&key) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(top);

    ChartConfig {
        kind: ChartKind::Bar,
        title: format!("Top values of {}", column),
        data_key: column.to_string(),
        data: order
            .into_iter()
            .map(|(name, value)| ChartPoint::new(name, value))
            .collect(),
        color: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==================== bin_count tests ====================

    #[test]
    fn test_bin_count_bounds() {
        assert_eq!(bin_count(1, 5, 15), 5);
        assert_eq!(bin_count(36, 5, 15), 6);
        assert_eq!(bin_count(37, 5, 15), 7);
        assert_eq!(bin_count(10_000, 5, 15), 15);
    }

    #[test]
    fn test_bin_count_inverted_or_zero_bounds() {
        assert_eq!(bin_count(1, 15, 5), 5);
        assert_eq!(bin_count(10_000, 15, 5), 15);
        assert_eq!(bin_count(0, 0, 0), 1);
    }

    // ==================== histogram tests ====================

    #[test]
    fn test_histogram_bins_and_labels() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let chart = histogram("v", &values, 5, "red").unwrap();

        assert_eq!(chart.kind, ChartKind::Histogram);
        assert_eq!(chart.title, "Distribution of v");
        let labels: Vec<&str> = chart.data.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(labels, vec!["0.0", "2.0", "4.0", "6.0", "8.0"]);
        let counts: Vec<usize> = chart.data.iter().map(|p| p.value).collect();
        // Last bin is closed and holds 8, 9 and 10
        assert_eq!(counts, vec![2, 2, 2, 2, 3]);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = vec![0.1, 0.7, 1.3, 2.9, 3.3, 9.99, 4.2];
        let chart = histogram("v", &values, 5, "red").unwrap();
        let total: usize = chart.data.iter().map(|p| p.value).sum();
        assert_eq!(total, values.len());
    }

    #[test]
    fn test_histogram_single_valued_column() {
        let chart = histogram("v", &[3.0, 3.0, 3.0], 5, "red").unwrap();
        assert_eq!(chart.data[0].name, "3.0");
        assert_eq!(chart.data[0].value, 3);
        assert_eq!(chart.data[1].name, "4.0");
        assert_eq!(chart.data[1].value, 0);
    }

    #[test]
    fn test_histogram_empty() {
        assert_eq!(histogram("v", &[], 5, "red"), None);
    }

    // ==================== frequency_table tests ====================

    #[test]
    fn test_frequency_table_orders_by_count_then_first_seen() {
        let cells = vec![
            Value::from("b"),
            Value::from("a"),
            Value::from("c"),
            Value::from("a"),
            Value::from("c"),
            Value::from("d"),
        ];
        let chart = frequency_table("k", cells.iter(), "Unknown", 10, "blue");

        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.title, "Top values of k");
        assert_eq!(
            chart.data,
            vec![
                ChartPoint::new("a", 2),
                ChartPoint::new("c", 2),
                ChartPoint::new("b", 1),
                ChartPoint::new("d", 1),
            ]
        );
    }

    #[test]
    fn test_frequency_table_truncates_and_renders_absent() {
        let cells: Vec<Value> = (0..12)
            .map(|i| Value::from(format!("v{i}")))
            .chain([Value::Absent, Value::Absent])
            .collect();
        let chart = frequency_table("k", cells.iter(), "Unknown", 10, "blue");

        assert_eq!(chart.data.len(), 10);
        assert_eq!(chart.data[0], ChartPoint::new("Unknown", 2));
    }
}
