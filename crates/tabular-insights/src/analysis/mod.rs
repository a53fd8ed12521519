//! Statistics engine: descriptive statistics, correlations and the
//! missing-value report.
//!
//! Statistics and correlations cover numeric columns only. The missing
//! report covers every column and reads the counts captured by the cleaner,
//! so it describes the original dataset rather than the imputed one.

mod correlation;
mod statistics;

use crate::config::PipelineConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{AnalysisResult, ColumnInfo, Dataset, MissingEntry, Value};
use tracing::{debug, info, warn};

use correlation::top_correlations;
use statistics::describe_column;

/// Statistics engine over a cleaned dataset.
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Analyze a cleaned dataset.
    ///
    /// `original_row_count` is the row count before cleaning; missing
    /// percentages are relative to it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ColumnNotFound`] when a column descriptor
    /// names a header the dataset does not have.
    pub fn analyze(
        cleaned: &Dataset,
        columns: &[ColumnInfo],
        original_row_count: usize,
        config: &PipelineConfig,
    ) -> Result<AnalysisResult> {
        info!("Analyzing {} columns...", columns.len());

        if let Some(unknown) = columns.iter().find(|c| !cleaned.has_column(&c.name)) {
            return Err(AnalysisError::ColumnNotFound(unknown.name.clone()));
        }

        let numeric: Vec<&ColumnInfo> = columns.iter().filter(|c| c.is_numeric()).collect();

        let mut statistics = Vec::with_capacity(numeric.len());
        for info in &numeric {
            let values: Vec<f64> = cleaned.column(&info.name).filter_map(Value::as_number).collect();
            match describe_column(&info.name, values) {
                Some(stats) => {
                    debug!(
                        "Column '{}': mean={:.2}, std={:.2}, skewness={:.2}",
                        stats.column, stats.mean, stats.std, stats.skewness
                    );
                    statistics.push(stats);
                }
                None => warn!("Numeric column '{}' has no parseable values", info.name),
            }
        }

        // Row-aligned vectors; unparsable cells become NaN and void their pairs
        let aligned: Vec<(String, Vec<f64>)> = numeric
            .iter()
            .map(|info| {
                let values = cleaned
                    .column(&info.name)
                    .map(|cell| cell.as_number().unwrap_or(f64::NAN))
                    .collect();
                (info.name.clone(), values)
            })
            .collect();
        let correlations = top_correlations(&aligned, config.max_correlations);

        let missing_report = Self::missing_report(columns, original_row_count);

        Ok(AnalysisResult {
            statistics,
            correlations,
            missing_report,
        })
    }

    /// Per-column missing counts as a share of the original row count.
    pub fn missing_report(columns: &[ColumnInfo], original_row_count: usize) -> Vec<MissingEntry> {
        columns
            .iter()
            .map(|info| MissingEntry {
                column: info.name.clone(),
                missing: info.missing_count,
                percent: if original_row_count == 0 {
                    0.0
                } else {
                    info.missing_count as f64 / original_row_count as f64 * 100.0
                },
            })
            .collect()
    }

    /// One-line stage log for an analysis result.
    pub fn summary(result: &AnalysisResult) -> String {
        format!("Computed stats for {} numeric columns", result.statistics.len())
    }
}
