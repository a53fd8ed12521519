//! Loader stage: turns a data source into a [`Dataset`].
//!
//! The loader is the intake boundary of the pipeline. It either produces
//! the header/row shape every later stage works on, or fails with an input
//! error when the source is empty or cannot be decoded. File parsing is
//! delegated to polars.

mod convert;
mod csv;

pub use convert::{dataframe_to_dataset, dataset_to_dataframe};
use convert::csv_frame_to_dataset;
pub use csv::{read_csv_file, read_csv_str};

use crate::error::{AnalysisError, Result};
use crate::types::{Dataset, LoaderResult, Row};
use polars::prelude::DataFrame;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the pipeline reads its dataset from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A CSV file with a header row.
    Csv(PathBuf),
    /// CSV content already held in memory.
    CsvText(String),
    /// An already-materialized polars DataFrame.
    DataFrame(DataFrame),
    /// Headers and rows built by the caller.
    Records { headers: Vec<String>, rows: Vec<Row> },
}

impl DataSource {
    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self::Csv(path.into())
    }

    pub fn records(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self::Records { headers, rows }
    }

    /// Short label for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Csv(path) => path.display().to_string(),
            Self::CsvText(_) => "<csv text>".to_string(),
            Self::DataFrame(_) => "<dataframe>".to_string(),
            Self::Records { .. } => "<records>".to_string(),
        }
    }
}

impl From<Dataset> for DataSource {
    fn from(dataset: Dataset) -> Self {
        Self::Records {
            headers: dataset.headers,
            rows: dataset.rows,
        }
    }
}

/// Loader for every [`DataSource`] variant.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a source into a dataset.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::EmptyDataset`] when the source has no data rows.
    /// - [`AnalysisError::CsvParse`] when CSV content cannot be decoded.
    /// - [`AnalysisError::InvalidInput`] when record headers are blank or repeated.
    pub fn load(source: DataSource) -> Result<LoaderResult> {
        let label = source.describe();
        info!("Loading dataset from: {}", label);

        let dataset = match source {
            DataSource::Csv(path) => csv_frame_to_dataset(&read_csv_file(&path)?)?,
            DataSource::CsvText(content) => csv_frame_to_dataset(&read_csv_str(&content)?)?,
            DataSource::DataFrame(df) => dataframe_to_dataset(&df)?,
            DataSource::Records { headers, rows } => {
                validate_headers(&headers)?;
                Dataset::new(headers, rows)
            }
        };

        if dataset.row_count() == 0 {
            return Err(AnalysisError::EmptyDataset);
        }

        debug!("Headers: {:?}", dataset.headers);

        Ok(LoaderResult {
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            dataset,
        })
    }

    /// One-line stage log for a loader result.
    pub fn summary(result: &LoaderResult) -> String {
        format!(
            "Loaded {} rows, {} columns",
            result.row_count, result.column_count
        )
    }
}

fn validate_headers(headers: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(headers.len());
    for header in headers {
        if header.trim().is_empty() {
            return Err(AnalysisError::InvalidInput(
                "column names must not be blank".to_string(),
            ));
        }
        if !seen.insert(header.as_str()) {
            return Err(AnalysisError::InvalidInput(format!(
                "duplicate column name '{}'",
                header
            )));
        }
    }
    Ok(())
}
