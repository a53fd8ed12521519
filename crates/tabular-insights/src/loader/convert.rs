//! Conversion between polars DataFrames and the row-oriented [`Dataset`].

use super::csv::csv_cell;
use crate::error::Result;
use crate::types::{Dataset, Row, Value};
use polars::prelude::*;

/// How string cells are carried into the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextCells {
    /// Keep them as text.
    Verbatim,
    /// Turn decimal literals into numbers, as for raw CSV columns.
    Typed,
}

/// Convert a DataFrame into a dataset, preserving column order.
///
/// Numeric cells become [`Value::Number`], strings become [`Value::Text`],
/// nulls become [`Value::Absent`]. Booleans and every other dtype are
/// carried as text in their display form.
pub fn dataframe_to_dataset(df: &DataFrame) -> Result<Dataset> {
    frame_to_dataset(df, TextCells::Verbatim)
}

/// Convert a DataFrame read from CSV, where every column is text, into a
/// dataset whose numeric-looking cells are numbers.
pub(crate) fn csv_frame_to_dataset(df: &DataFrame) -> Result<Dataset> {
    frame_to_dataset(df, TextCells::Typed)
}

fn frame_to_dataset(df: &DataFrame, text_cells: TextCells) -> Result<Dataset> {
    let height = df.height();
    let mut rows = vec![Row::new(); height];
    let mut headers = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        let series = col.as_materialized_series();
        let cells = series_to_values(series, text_cells)?;

        for (row, value) in rows.iter_mut().zip(cells) {
            row.insert(name.clone(), value);
        }
        headers.push(name);
    }

    Ok(Dataset::new(headers, rows))
}

fn series_to_values(series: &Series, text_cells: TextCells) -> Result<Vec<Value>> {
    let dtype = series.dtype();

    let values = if dtype.is_primitive_numeric() {
        let floats = series.cast(&DataType::Float64)?;
        floats.f64()?.into_iter().map(Value::from).collect()
    } else if dtype == &DataType::String {
        series
            .str()?
            .into_iter()
            .map(|v| match (v, text_cells) {
                (None, _) => Value::Absent,
                (Some(s), TextCells::Typed) => csv_cell(s),
                (Some(s), TextCells::Verbatim) => Value::Text(s.to_string()),
            })
            .collect()
    } else if dtype == &DataType::Boolean {
        series
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| Value::Text(b.to_string())).unwrap_or(Value::Absent))
            .collect()
    } else {
        let as_text = series.cast(&DataType::String)?;
        as_text
            .str()?
            .into_iter()
            .map(|v| v.map(|s| Value::Text(s.to_string())).unwrap_or(Value::Absent))
            .collect()
    };

    Ok(values)
}

/// Convert a dataset back into a DataFrame for export.
///
/// A column whose non-missing cells are all numbers becomes `Float64`;
/// any other column becomes `String`. Absent cells become nulls.
pub fn dataset_to_dataframe(dataset: &Dataset) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(dataset.column_count());

    for header in &dataset.headers {
        let all_numeric = dataset
            .column(header)
            .all(|v| matches!(v, Value::Number(_) | Value::Absent));

        let column = if all_numeric {
            let values: Vec<Option<f64>> = dataset
                .column(header)
                .map(|v| match v {
                    Value::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            Column::new(header.as_str().into(), values)
        } else {
            let values: Vec<Option<String>> = dataset
                .column(header)
                .map(|v| match v {
                    Value::Absent => None,
                    other => Some(other.render()),
                })
                .collect();
            Column::new(header.as_str().into(), values)
        };
        columns.push(column);
    }

    Ok(DataFrame::new(columns)?)
}
