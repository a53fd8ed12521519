//! Numeric vs. categorical classification of a single column.

use crate::types::{ColumnType, Value};
use std::collections::HashSet;

/// Counts gathered from one pass over a column's raw cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ColumnCounts {
    pub total: usize,
    pub missing: usize,
    pub numeric: usize,
    pub unique: usize,
}

impl ColumnCounts {
    pub fn non_missing(&self) -> usize {
        self.total - self.missing
    }

    /// Share of non-missing cells that parse as numbers.
    pub fn numeric_ratio(&self) -> f64 {
        match self.non_missing() {
            0 => 0.0,
            n => self.numeric as f64 / n as f64,
        }
    }
}

/// Scan cells once, counting missing, numeric and distinct rendered values.
pub(crate) fn count_cells<'a>(cells: impl Iterator<Item = &'a Value>) -> ColumnCounts {
    let mut counts = ColumnCounts::default();
    let mut distinct: HashSet<String> = HashSet::new();

    for cell in cells {
        counts.total += 1;
        if cell.is_missing() {
            counts.missing += 1;
            continue;
        }
        if cell.as_number().is_some() {
            counts.numeric += 1;
        }
        distinct.insert(cell.render());
    }

    counts.unique = distinct.len();
    counts
}

/// A column is numeric when it has at least one non-missing cell and the
/// numeric share of those cells is strictly above `ratio_threshold`.
pub(crate) fn infer_column_type(counts: &ColumnCounts, ratio_threshold: f64) -> ColumnType {
    if counts.non_missing() > 0 && counts.numeric_ratio() > ratio_threshold {
        ColumnType::Numeric
    } else {
        ColumnType::Categorical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cells(values: Vec<Value>) -> ColumnCounts {
        count_cells(values.iter())
    }

    // ==================== count_cells tests ====================

    #[test]
    fn test_count_cells_mixed() {
        let counts = cells(vec![
            Value::from(1.0),
            Value::from("2"),
            Value::from("N/A"),
            Value::from(""),
            Value::Absent,
        ]);
        assert_eq!(
            counts,
            ColumnCounts {
                total: 5,
                missing: 2,
                numeric: 2,
                unique: 3,
            }
        );
    }

    #[test]
    fn test_count_cells_unique_uses_rendered_form() {
        // 1.0 and "1" render identically
        let counts = cells(vec![Value::from(1.0), Value::from("1"), Value::from("1.5")]);
        assert_eq!(counts.unique, 2);
    }

    #[test]
    fn test_count_cells_whitespace_is_present_but_not_numeric() {
        let counts = cells(vec![Value::from(" "), Value::from(3.0)]);
        assert_eq!(counts.missing, 0);
        assert_eq!(counts.numeric, 1);
    }

    // ==================== infer_column_type tests ====================

    #[test]
    fn test_infer_numeric_tolerates_minority_text() {
        let counts = cells(vec![
            Value::from(1.0),
            Value::from(2.0),
            Value::from(3.0),
            Value::from("N/A"),
        ]);
        assert_eq!(infer_column_type(&counts, 0.7), ColumnType::Numeric);
    }

    #[test]
    fn test_infer_ratio_at_threshold_is_categorical() {
        // 7 of 10 is not strictly above 0.7
        let mut values: Vec<Value> = (0..7).map(|i| Value::from(i as f64)).collect();
        values.extend((0..3).map(|_| Value::from("x")));
        let counts = cells(values);
        assert_eq!(infer_column_type(&counts, 0.7), ColumnType::Categorical);
    }

    #[test]
    fn test_infer_all_missing_is_categorical() {
        let counts = cells(vec![Value::Absent, Value::from("")]);
        assert_eq!(infer_column_type(&counts, 0.7), ColumnType::Categorical);
    }

    #[test]
    fn test_infer_text_is_categorical() {
        let counts = cells(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(infer_column_type(&counts, 0.7), ColumnType::Categorical);
    }
}
