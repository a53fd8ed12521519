use crate::error::{AnalysisError, Result, ResultExt};
use crate::pipeline::StageState;
use crate::types::{
    AnalysisResult, ChartConfig, ColumnInfo, ColumnType, Dataset, Insight, PipelineReport,
};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Comprehensive Report Types
// ============================================================================

/// Comprehensive report merging every stage output for CLI and library output.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path or label of the input
    pub input_file: String,
    /// Path of the exported cleaned dataset (if written)
    pub output_file: Option<String>,

    /// Shape before and after cleaning
    pub dataset: DatasetSummary,
    /// Per-column type and counts, in header order
    pub columns: Vec<ColumnInfo>,
    /// What the cleaner changed
    pub cleaning: CleaningSummary,
    /// Statistics, correlations and the missing report
    pub analysis: AnalysisResult,
    /// Chart-ready data
    pub charts: Vec<ChartConfig>,
    /// Findings in rule order
    pub insights: Vec<Insight>,
    /// Final status and log of every stage
    pub stages: Vec<StageState>,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

/// Dataset shape summary for the comprehensive report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Original shape (rows, columns)
    pub original_shape: (usize, usize),
    /// Shape after cleaning
    pub cleaned_shape: (usize, usize),
    pub numeric_columns: usize,
    pub categorical_columns: usize,
}

/// Cleaning summary for the comprehensive report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub rows_removed: usize,
    /// Percentage of original rows removed
    pub rows_removed_percent: f64,
    pub values_filled: usize,
}

/// Writes reports and cleaned datasets to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator writing under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build a comprehensive report from a pipeline run.
    pub fn build_comprehensive_report(
        input_file: &str,
        output_file: Option<&str>,
        report: &PipelineReport,
    ) -> ComprehensiveReport {
        let cleaning = &report.cleaning;
        let count_of = |kind: ColumnType| {
            cleaning
                .columns
                .iter()
                .filter(|c| c.column_type == kind)
                .count()
        };

        let rows_removed_percent = if cleaning.original_row_count > 0 {
            cleaning.rows_removed as f64 / cleaning.original_row_count as f64 * 100.0
        } else {
            0.0
        };

        ComprehensiveReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            dataset: DatasetSummary {
                original_shape: (report.loader.row_count, report.loader.column_count),
                cleaned_shape: (
                    cleaning.cleaned_row_count(),
                    cleaning.cleaned.column_count(),
                ),
                numeric_columns: count_of(ColumnType::Numeric),
                categorical_columns: count_of(ColumnType::Categorical),
            },
            columns: cleaning.columns.clone(),
            cleaning: CleaningSummary {
                rows_removed: cleaning.rows_removed,
                rows_removed_percent,
                values_filled: cleaning.values_filled,
            },
            analysis: report.analysis.clone(),
            charts: report.visualization.charts.clone(),
            insights: report.insights.insights.clone(),
            stages: report.stages.clone(),
            duration_ms: report.duration_ms,
        }
    }

    /// Write a comprehensive report to a JSON file.
    ///
    /// If `report_base_name` is "sales", the file will be "sales_report.json".
    pub fn write_report_to_file(
        &self,
        report: &ComprehensiveReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)
            .context(format!("Failed to create {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Export a cleaned dataset as `<base>_cleaned.csv`.
    pub fn export_cleaned_csv(&self, dataset: &Dataset, base_name: &str) -> Result<PathBuf> {
        let mut df = dataset.to_dataframe()?;

        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(format!("{}_cleaned.csv", base_name));
        let mut file = File::create(&output_path)
            .context(format!("Failed to create {}", output_path.display()))?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .map_err(|e| AnalysisError::ReportGenerationFailed(e.to_string()))?;

        info!("Cleaned dataset saved: {}", output_path.display());

        Ok(output_path)
    }
}

/// Base name for output files: the input file stem, or "dataset".
pub fn output_base_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("dataset")
        .to_string()
}
