//! Statistical imputation methods.
//!
//! Provides the raw-median fill for numeric columns and the constant
//! placeholder fill for categorical columns.

use crate::config::PipelineConfig;
use crate::types::{ColumnInfo, ColumnType, Dataset, Value};
use crate::utils::{sorted_values, upper_median_of_sorted};

/// How missing cells of one column are filled.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStrategy {
    /// Numeric column: fill with this median and coerce parseable cells to numbers.
    Median(f64),
    /// Categorical column: fill with this text.
    Placeholder(String),
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Median of the parseable values of `column` over the given rows.
    ///
    /// Takes the upper-middle element of the sorted values without averaging,
    /// and 0 when nothing parses. Callers pass the raw dataset so the fill
    /// value does not depend on which rows are later removed.
    pub fn raw_median(dataset: &Dataset, column: &str) -> f64 {
        let values: Vec<f64> = dataset
            .column(column)
            .filter(|cell| !cell.is_missing())
            .filter_map(Value::as_number)
            .collect();
        upper_median_of_sorted(&sorted_values(values)).unwrap_or(0.0)
    }

    /// Pick the fill strategy for a profiled column.
    pub fn strategy_for(info: &ColumnInfo, raw: &Dataset, config: &PipelineConfig) -> FillStrategy {
        match info.column_type {
            ColumnType::Numeric => FillStrategy::Median(Self::raw_median(raw, &info.name)),
            ColumnType::Categorical => {
                FillStrategy::Placeholder(config.missing_placeholder.clone())
            }
        }
    }

    /// Produce the cleaned form of one cell.
    ///
    /// Returns the new value and whether it was imputed.
    pub fn impute_cell(cell: &Value, strategy: &FillStrategy) -> (Value, bool) {
        if cell.is_missing() {
            let filled = match strategy {
                FillStrategy::Median(median) => Value::Number(*median),
                FillStrategy::Placeholder(text) => Value::Text(text.clone()),
            };
            return (filled, true);
        }

        match strategy {
            FillStrategy::Median(_) => match cell.as_number() {
                Some(number) => (Value::Number(number), false),
                // Unparsable residue is kept verbatim
                None => (cell.clone(), false),
            },
            FillStrategy::Placeholder(_) => (cell.clone(), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;
    use pretty_assertions::assert_eq;

    fn dataset(values: Vec<Value>) -> Dataset {
        Dataset::new(
            vec!["v".to_string()],
            values.into_iter().map(|v| Row::new().with("v", v)).collect(),
        )
    }

    // ==================== raw_median tests ====================

    #[test]
    fn test_raw_median_takes_upper_middle() {
        let ds = dataset(vec![
            Value::from(4.0),
            Value::from(1.0),
            Value::from(3.0),
            Value::from(2.0),
        ]);
        assert_eq!(StatisticalImputer::raw_median(&ds, "v"), 3.0);
    }

    #[test]
    fn test_raw_median_skips_missing_and_text() {
        let ds = dataset(vec![
            Value::from("5"),
            Value::from(""),
            Value::from("N/A"),
            Value::from(1.0),
            Value::from(9.0),
        ]);
        assert_eq!(StatisticalImputer::raw_median(&ds, "v"), 5.0);
    }

    #[test]
    fn test_raw_median_defaults_to_zero() {
        let ds = dataset(vec![Value::from("x"), Value::Absent]);
        assert_eq!(StatisticalImputer::raw_median(&ds, "v"), 0.0);
    }

    // ==================== impute_cell tests ====================

    #[test]
    fn test_impute_numeric_cell() {
        let strategy = FillStrategy::Median(2.5);
        assert_eq!(
            StatisticalImputer::impute_cell(&Value::Absent, &strategy),
            (Value::Number(2.5), true)
        );
        assert_eq!(
            StatisticalImputer::impute_cell(&Value::from(" 7 "), &strategy),
            (Value::Number(7.0), false)
        );
        assert_eq!(
            StatisticalImputer::impute_cell(&Value::from("N/A"), &strategy),
            (Value::from("N/A"), false)
        );
    }

    #[test]
    fn test_impute_categorical_cell() {
        let strategy = FillStrategy::Placeholder("Unknown".to_string());
        assert_eq!(
            StatisticalImputer::impute_cell(&Value::from(""), &strategy),
            (Value::from("Unknown"), true)
        );
        // Numeric-looking text in a categorical column is not coerced
        assert_eq!(
            StatisticalImputer::impute_cell(&Value::from("42"), &strategy),
            (Value::from("42"), false)
        );
    }
}
