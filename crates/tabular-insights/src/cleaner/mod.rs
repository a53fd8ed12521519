//! Data cleaning module for preprocessing datasets.
//!
//! This module provides functionality for:
//! - Classifying every column as numeric or categorical
//! - Removing rows whose every cell is missing
//! - Imputing missing cells (raw median or placeholder)
//! - Coercing parseable cells of numeric columns to numbers
//!
//! The cleaner never mutates its input; it returns a new dataset.

use crate::config::PipelineConfig;
use crate::imputers::{FillStrategy, StatisticalImputer};
use crate::profiler::DataProfiler;
use crate::types::{CleaningResult, Dataset, Row};
use tracing::{debug, info};

/// Data cleaner for automatic dataset cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a raw dataset.
    ///
    /// Column profiles and fill values are computed over the raw rows, before
    /// any row is removed. A dataset without columns yields an empty column
    /// list and removes nothing.
    pub fn clean(raw: &Dataset, config: &PipelineConfig) -> CleaningResult {
        info!(
            "Cleaning {} rows across {} columns...",
            raw.row_count(),
            raw.column_count()
        );

        let columns = DataProfiler::profile_dataset(raw, config);
        let strategies: Vec<FillStrategy> = columns
            .iter()
            .map(|info| StatisticalImputer::strategy_for(info, raw, config))
            .collect();

        let mut rows = Vec::with_capacity(raw.row_count());
        let mut rows_removed = 0;
        let mut values_filled = 0;

        for row in &raw.rows {
            if Self::is_empty_row(row, &raw.headers) {
                rows_removed += 1;
                continue;
            }

            let mut cleaned = Row::new();
            for (header, strategy) in raw.headers.iter().zip(&strategies) {
                let (value, filled) = StatisticalImputer::impute_cell(row.get(header), strategy);
                if filled {
                    values_filled += 1;
                }
                cleaned.insert(header.as_str(), value);
            }
            rows.push(cleaned);
        }

        debug!(
            "Removed {} empty rows, imputed {} cells",
            rows_removed, values_filled
        );

        CleaningResult {
            cleaned: Dataset::new(raw.headers.clone(), rows),
            columns,
            rows_removed,
            values_filled,
            original_row_count: raw.row_count(),
        }
    }

    /// True when every header's cell is missing. Rows of a header-less
    /// dataset are never considered empty.
    fn is_empty_row(row: &Row, headers: &[String]) -> bool {
        !headers.is_empty() && headers.iter().all(|h| row.get(h).is_missing())
    }

    /// One-line stage log for a cleaning result.
    pub fn summary(result: &CleaningResult) -> String {
        format!(
            "Removed {} rows, filled {} values",
            result.rows_removed, result.values_filled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnType, Value};
    use pretty_assertions::assert_eq;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    // ==================== Row removal ====================

    #[test]
    fn test_clean_removes_fully_empty_rows() {
        let raw = Dataset::new(
            headers(&["a", "b"]),
            vec![
                Row::new().with("a", 1.0).with("b", "x"),
                Row::new().with("a", 3.0).with("b", "y"),
                Row::new().with("a", "").with("b", ""),
            ],
        );

        let result = DataCleaner::clean(&raw, &PipelineConfig::default());

        assert_eq!(result.rows_removed, 1);
        assert_eq!(result.values_filled, 0);
        assert_eq!(result.original_row_count, 3);
        assert_eq!(result.cleaned_row_count(), 2);
        assert_eq!(result.columns[0].column_type, ColumnType::Numeric);
        assert_eq!(DataCleaner::summary(&result), "Removed 1 rows, filled 0 values");
    }

    #[test]
    fn test_clean_row_with_one_value_is_kept() {
        let raw = Dataset::new(
            headers(&["a", "b"]),
            vec![Row::new().with("a", "").with("b", "x")],
        );
        let result = DataCleaner::clean(&raw, &PipelineConfig::default());
        assert_eq!(result.rows_removed, 0);
        assert_eq!(result.values_filled, 1);
    }

    // ==================== Imputation ====================

    #[test]
    fn test_clean_uses_raw_median() {
        // Raw parseable values sorted: [1, 2, 10]; upper middle is 2
        let raw = Dataset::new(
            headers(&["n", "c"]),
            vec![
                Row::new().with("n", 10.0).with("c", "p"),
                Row::new().with("n", 1.0).with("c", ""),
                Row::new().with("n", "").with("c", "q"),
                Row::new().with("n", "2").with("c", "p"),
            ],
        );

        let result = DataCleaner::clean(&raw, &PipelineConfig::default());

        assert_eq!(result.values_filled, 2);
        assert_eq!(result.cleaned.rows[2].get("n"), &Value::Number(2.0));
        assert_eq!(result.cleaned.rows[1].get("c"), &Value::from("Unknown"));
        // Text that parses in a numeric column becomes a number
        assert_eq!(result.cleaned.rows[3].get("n"), &Value::Number(2.0));
    }

    #[test]
    fn test_clean_custom_placeholder() {
        let raw = Dataset::new(
            headers(&["c"]),
            vec![Row::new().with("c", "a"), Row::new().with("c", "")],
        );
        let config = PipelineConfig::builder()
            .missing_placeholder("Missing")
            .build()
            .unwrap();

        let result = DataCleaner::clean(&raw, &config);

        // Row 2 is fully empty and dropped before filling
        assert_eq!(result.rows_removed, 1);
        assert_eq!(result.values_filled, 0);
        assert_eq!(result.cleaned.rows[0].get("c"), &Value::from("a"));

        let raw = Dataset::new(
            headers(&["c", "d"]),
            vec![Row::new().with("c", "").with("d", "z")],
        );
        let result = DataCleaner::clean(&raw, &config);
        assert_eq!(result.cleaned.rows[0].get("c"), &Value::from("Missing"));
    }

    #[test]
    fn test_clean_keeps_unparsable_residue() {
        let raw = Dataset::new(
            headers(&["n"]),
            vec![
                Row::new().with("n", 1.0),
                Row::new().with("n", 2.0),
                Row::new().with("n", 3.0),
                Row::new().with("n", "N/A"),
            ],
        );
        let result = DataCleaner::clean(&raw, &PipelineConfig::default());

        assert!(result.columns[0].is_numeric());
        assert_eq!(result.columns[0].missing_count, 0);
        assert_eq!(result.cleaned.rows[3].get("n"), &Value::from("N/A"));
    }

    // ==================== Edge cases ====================

    #[test]
    fn test_clean_zero_columns() {
        let raw = Dataset::new(Vec::new(), vec![Row::new(), Row::new()]);
        let result = DataCleaner::clean(&raw, &PipelineConfig::default());

        assert!(result.columns.is_empty());
        assert_eq!(result.rows_removed, 0);
        assert_eq!(result.cleaned_row_count(), 2);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let raw = Dataset::new(
            headers(&["a", "b"]),
            vec![
                Row::new().with("a", 1.0).with("b", ""),
                Row::new().with("a", "").with("b", "y"),
                Row::new(),
            ],
        );
        let config = PipelineConfig::default();

        let first = DataCleaner::clean(&raw, &config);
        let second = DataCleaner::clean(&first.cleaned, &config);

        assert_eq!(second.rows_removed, 0);
        assert_eq!(second.values_filled, 0);
        assert_eq!(second.cleaned, first.cleaned);
    }

    #[test]
    fn test_clean_conserves_row_count() {
        let raw = Dataset::new(
            headers(&["a"]),
            vec![
                Row::new().with("a", ""),
                Row::new().with("a", 5.0),
                Row::new(),
            ],
        );
        let result = DataCleaner::clean(&raw, &PipelineConfig::default());
        assert_eq!(
            result.rows_removed + result.cleaned_row_count(),
            result.original_row_count
        );
    }
}
