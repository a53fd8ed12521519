//! Descriptive statistics over a column's numeric values.

use crate::types::ColumnStats;
use crate::utils::{median_of_sorted, nearest_rank, sorted_values};

/// Arithmetic mean. `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N).
pub(crate) fn population_std(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Third standardized moment. Exactly 0 when `std` is 0.
pub(crate) fn skewness(values: &[f64], mean: f64, std: f64) -> f64 {
    if std == 0.0 || values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / values.len() as f64
}

/// Describe a column, or `None` when it has no numeric values.
pub(crate) fn describe_column(column: &str, values: Vec<f64>) -> Option<ColumnStats> {
    let sorted = sorted_values(values);
    let mean = mean(&sorted)?;
    let std = population_std(&sorted, mean);

    Some(ColumnStats {
        column: column.to_string(),
        mean,
        median: median_of_sorted(&sorted)?,
        std,
        min: *sorted.first()?,
        max: *sorted.last()?,
        q1: nearest_rank(&sorted, 0.25)?,
        q3: nearest_rank(&sorted, 0.75)?,
        skewness: skewness(&sorted, mean, std),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==================== describe_column tests ====================

    #[test]
    fn test_describe_column_with_outlier() {
        let stats = describe_column("v", vec![1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();

        assert_eq!(stats.mean, 22.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 100.0);
        assert!((stats.std - 39.01).abs() < 0.01);
        assert!(stats.skewness > 1.0);
        assert!(stats.has_outliers(1.5));
    }

    #[test]
    fn test_describe_column_even_length_median_averages() {
        let stats = describe_column("v", vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
    }

    #[test]
    fn test_describe_constant_column() {
        let stats = describe_column("v", vec![5.0, 5.0, 5.0]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.q1, stats.q3);
        assert!(!stats.has_outliers(1.5));
    }

    #[test]
    fn test_describe_single_value() {
        let stats = describe_column("v", vec![7.0]).unwrap();
        assert_eq!(stats.min, 7.0);
        assert_eq!(stats.q3, 7.0);
        assert_eq!(stats.skewness, 0.0);
    }

    #[test]
    fn test_describe_empty_column() {
        assert_eq!(describe_column("v", Vec::new()), None);
    }

    #[test]
    fn test_left_skew_is_negative() {
        let values = vec![-100.0, 1.0, 2.0, 3.0, 4.0];
        let m = mean(&values).unwrap();
        let s = population_std(&values, m);
        assert!(skewness(&values, m, s) < -1.0);
    }

    #[test]
    fn test_order_invariant_holds() {
        let stats = describe_column("v", vec![9.0, -3.0, 0.5, 12.0, 7.0, 7.0, 2.0]).unwrap();
        assert!(stats.min <= stats.q1);
        assert!(stats.q1 <= stats.median);
        assert!(stats.median <= stats.q3);
        assert!(stats.q3 <= stats.max);
        assert!(stats.std >= 0.0);
    }
}
