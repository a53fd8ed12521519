//! Error types for the analysis pipeline.
//!
//! Two families of failure exist: input errors raised while loading the
//! dataset, and stage failures raised by any later stage. Both are terminal
//! for a run. Unparsable cell values are never errors; they are treated as
//! absent by the stages that need numbers.
//!
//! Errors are serializable so a UI can display them next to the stage log.

use crate::pipeline::PipelineStage;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The source produced no data rows.
    #[error("Dataset is empty or invalid.")]
    EmptyDataset,

    /// The CSV source could not be decoded.
    #[error("CSV parsing failed: {0}")]
    CsvParse(String),

    /// The in-memory source does not have the expected shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stage failed; the pipeline halted at this stage.
    #[error("Stage '{stage}' failed: {source}")]
    StageFailed {
        stage: PipelineStage,
        #[source]
        source: Box<AnalysisError>,
    },

    /// The run was cancelled between two stages.
    #[error("Pipeline cancelled")]
    Cancelled,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Report or export writing failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Attribute an error to the stage that was running when it occurred.
    pub fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            // Cancellation and already-attributed failures pass through untouched.
            Self::Cancelled | Self::StageFailed { .. } => self,
            other => Self::StageFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::CsvParse(_) => "CSV_PARSE_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::StageFailed { source, .. } => match source.as_ref() {
                inner if inner.is_input_error() => inner.error_code(),
                _ => "STAGE_FAILED",
            },
            Self::Cancelled => "CANCELLED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// The stage a failure is attributed to, if any.
    pub fn failed_stage(&self) -> Option<PipelineStage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            Self::WithContext { source, .. } => source.failed_stage(),
            _ => None,
        }
    }

    /// Check if this error is an input error (empty or unparsable source).
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::EmptyDataset | Self::CsvParse(_) | Self::InvalidInput(_) => true,
            Self::StageFailed { source, .. } | Self::WithContext { source, .. } => {
                source.is_input_error()
            }
            _ => false,
        }
    }

    /// Check if this error represents a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(AnalysisError::EmptyDataset.error_code(), "EMPTY_DATASET");
        assert_eq!(AnalysisError::Cancelled.error_code(), "CANCELLED");
        assert_eq!(
            AnalysisError::ColumnNotFound("age".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_empty_dataset_message() {
        assert_eq!(
            AnalysisError::EmptyDataset.to_string(),
            "Dataset is empty or invalid."
        );
    }

    #[test]
    fn test_in_stage_wraps_once() {
        let error = AnalysisError::InvalidInput("bad".to_string())
            .in_stage(PipelineStage::Cleaner)
            .in_stage(PipelineStage::Analysis);

        assert_eq!(error.failed_stage(), Some(PipelineStage::Cleaner));
        assert!(error.to_string().contains("cleaner"));
    }

    #[test]
    fn test_in_stage_keeps_cancellation() {
        let error = AnalysisError::Cancelled.in_stage(PipelineStage::Loader);
        assert!(error.is_cancelled());
        assert_eq!(error.failed_stage(), None);
    }

    #[test]
    fn test_input_error_code_survives_stage_attribution() {
        let error = AnalysisError::EmptyDataset.in_stage(PipelineStage::Loader);
        assert!(error.is_input_error());
        assert_eq!(error.error_code(), "EMPTY_DATASET");

        let error = AnalysisError::ColumnNotFound("x".to_string()).in_stage(PipelineStage::Analysis);
        assert!(!error.is_input_error());
        assert_eq!(error.error_code(), "STAGE_FAILED");
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::CsvParse("unterminated quote".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("CSV_PARSE_ERROR"));
        assert!(json.contains("unterminated quote"));
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::ColumnNotFound("price".to_string()).with_context("During export");
        assert!(error.to_string().contains("During export"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
