//! Data model shared by all pipeline stages.
//!
//! Raw input is a [`Dataset`]: header names in source order plus rows that
//! map a header to a [`Value`]. Every stage output is a plain serializable
//! structure with no behavior beyond convenience accessors; outputs are
//! never mutated after the producing stage returns them.

use crate::pipeline::StageState;
use crate::utils::{parse_number, round_to, serialize_round1, serialize_round2, serialize_round3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Cell values, rows and datasets
// ============================================================================

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Absent,
}

static ABSENT: Value = Value::Absent;

impl Value {
    /// A cell is missing when it is absent or holds the empty string.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Text(text) => text.is_empty(),
            Value::Number(_) => false,
        }
    }

    /// Numeric reading of the cell: numbers as-is, text when it parses as a decimal literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) => None,
            Value::Text(text) => parse_number(text),
            Value::Absent => None,
        }
    }

    /// String representation used for distinct counting and frequency tables.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(text) => f.write_str(text),
            Value::Absent => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}

/// A row maps column names to cells. Columns without an entry read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(HashMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell for `column`, or [`Value::Absent`] when the row has no entry.
    pub fn get(&self, column: &str) -> &Value {
        self.0.get(column).unwrap_or(&ABSENT)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Ordered rows plus ordered header names. Header order is stable across stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cells of one column, in row order.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Convert into a polars DataFrame, e.g. for CSV export.
    pub fn to_dataframe(&self) -> crate::error::Result<polars::prelude::DataFrame> {
        crate::loader::dataset_to_dataframe(self)
    }
}

// ============================================================================
// Loader output
// ============================================================================

/// Output of the loader stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderResult {
    pub dataset: Dataset,
    pub row_count: usize,
    pub column_count: usize,
}

// ============================================================================
// Cleaner output
// ============================================================================

/// Inferred column kind. Downstream stages dispatch on this tag only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => f.write_str("numeric"),
            ColumnType::Categorical => f.write_str("categorical"),
        }
    }
}

/// Per-column metadata computed over the raw dataset.
///
/// `missing_count <= total_rows` and `unique_count <= total_rows - missing_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub missing_count: usize,
    pub unique_count: usize,
}

impl ColumnInfo {
    pub fn is_numeric(&self) -> bool {
        self.column_type == ColumnType::Numeric
    }

    pub fn is_categorical(&self) -> bool {
        self.column_type == ColumnType::Categorical
    }
}

/// Output of the cleaner stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningResult {
    pub cleaned: Dataset,
    pub columns: Vec<ColumnInfo>,
    pub rows_removed: usize,
    pub values_filled: usize,
    pub original_row_count: usize,
}

impl CleaningResult {
    pub fn cleaned_row_count(&self) -> usize {
        self.cleaned.row_count()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.is_categorical())
    }
}

// ============================================================================
// Statistics output
// ============================================================================

/// Descriptive statistics of one numeric column.
///
/// Values are kept at full precision; serialization rounds everything except
/// `min` and `max` to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    #[serde(serialize_with = "serialize_round2")]
    pub mean: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub median: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub std: f64,
    pub min: f64,
    pub max: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub q1: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub q3: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub skewness: f64,
}

impl ColumnStats {
    /// Interquartile range of the quartiles as reported (2 decimals).
    pub fn iqr(&self) -> f64 {
        round_to(self.q3, 2) - round_to(self.q1, 2)
    }

    /// Tukey fences `(Q1 - k*IQR, Q3 + k*IQR)` over the reported quartiles.
    /// `min` and `max` are compared unrounded.
    pub fn fences(&self, multiplier: f64) -> (f64, f64) {
        let iqr = self.iqr();
        (
            round_to(self.q1, 2) - multiplier * iqr,
            round_to(self.q3, 2) + multiplier * iqr,
        )
    }

    /// True when the minimum or maximum lies outside the Tukey fences.
    pub fn has_outliers(&self, multiplier: f64) -> bool {
        let (lower, upper) = self.fences(multiplier);
        self.min < lower || self.max > upper
    }

    pub fn rounded_skewness(&self) -> f64 {
        round_to(self.skewness, 2)
    }
}

/// Pearson correlation of two numeric columns; `col1` precedes `col2` in header order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub col1: String,
    pub col2: String,
    #[serde(serialize_with = "serialize_round3")]
    pub value: f64,
}

impl CorrelationPair {
    pub fn rounded_value(&self) -> f64 {
        round_to(self.value, 3)
    }
}

/// Missing-value count of one column in the original dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub column: String,
    pub missing: usize,
    #[serde(serialize_with = "serialize_round1")]
    pub percent: f64,
}

/// Output of the statistics stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub statistics: Vec<ColumnStats>,
    pub correlations: Vec<CorrelationPair>,
    pub missing_report: Vec<MissingEntry>,
}

impl AnalysisResult {
    pub fn total_missing(&self) -> usize {
        self.missing_report.iter().map(|entry| entry.missing).sum()
    }

    pub fn stats_for(&self, column: &str) -> Option<&ColumnStats> {
        self.statistics.iter().find(|s| s.column == column)
    }
}

// ============================================================================
// Aggregator output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Bar,
}

/// One bar of a chart: a bin label or category with its count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: usize,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Chart-ready data for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub data_key: String,
    pub data: Vec<ChartPoint>,
    pub color: String,
}

/// Output of the aggregator stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationResult {
    pub charts: Vec<ChartConfig>,
}

// ============================================================================
// Insight output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Dataset,
    Features,
    Quality,
    Observation,
}

/// A human-readable finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
}

impl Insight {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: InsightCategory,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
        }
    }
}

/// Output of the insight stage. Order is rule precedence, not a score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    pub insights: Vec<Insight>,
}

impl InsightResult {
    pub fn titles(&self) -> Vec<&str> {
        self.insights.iter().map(|i| i.title.as_str()).collect()
    }

    pub fn find(&self, title: &str) -> Option<&Insight> {
        self.insights.iter().find(|i| i.title == title)
    }
}

// ============================================================================
// Pipeline output
// ============================================================================

/// Everything a successful run produced, plus the final stage states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub loader: LoaderResult,
    pub cleaning: CleaningResult,
    pub analysis: AnalysisResult,
    pub visualization: VisualizationResult,
    pub insights: InsightResult,
    pub stages: Vec<StageState>,
    pub duration_ms: u64,
}
