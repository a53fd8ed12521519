//! Tabular Insights Library
//!
//! An automated exploratory-analysis pipeline for tabular data built with
//! Rust and Polars.
//!
//! # Overview
//!
//! A dataset runs through five stages, strictly in order:
//!
//! - **Loader**: CSV, DataFrame or in-memory records into headers and rows
//! - **Cleaner**: numeric/categorical inference, empty-row removal, imputation
//! - **Analysis**: descriptive statistics, Pearson correlations, missing report
//! - **Visualization**: histogram bins and top-N frequency tables
//! - **Insights**: fixed-order, rule-based findings in plain language
//!
//! Every stage output is a plain serializable structure.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabular_insights::{DataSource, Pipeline};
//!
//! let report = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("{}: {:?} {}", update.stage.display_name(), update.status,
//!                  update.log.unwrap_or_default());
//!     })
//!     .build()?
//!     .process(DataSource::csv("data.csv"))?;
//!
//! for insight in &report.insights.insights {
//!     println!("{}: {}", insight.title, insight.description);
//! }
//! ```
//!
//! # Configuration
//!
//! Every threshold is exposed on [`PipelineConfig`]; defaults reproduce the
//! fixed constants in [`config`].
//!
//! ```rust,ignore
//! use tabular_insights::PipelineConfig;
//!
//! let config = PipelineConfig::builder()
//!     .numeric_ratio_threshold(0.8)
//!     .skewness_threshold(0.75)
//!     .iqr_multiplier(3.0)
//!     .build()?;
//! ```
//!
//! # Running stages directly
//!
//! Each stage is also callable on its own:
//!
//! ```rust,ignore
//! use tabular_insights::{DataCleaner, PipelineConfig, StatisticsEngine};
//!
//! let config = PipelineConfig::default();
//! let cleaning = DataCleaner::clean(&dataset, &config);
//! let analysis = StatisticsEngine::analyze(
//!     &cleaning.cleaned,
//!     &cleaning.columns,
//!     cleaning.original_row_count,
//!     &config,
//! )?;
//! ```

pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod insights;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;
pub mod visualization;

// Re-exports for convenient access
pub use analysis::StatisticsEngine;
pub use cleaner::DataCleaner;
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{AnalysisError, ResultExt};
pub use imputers::{FillStrategy, StatisticalImputer};
pub use insights::InsightEngine;
pub use loader::{DataSource, DatasetLoader};
pub use pipeline::{
    CancellationToken, ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage,
    ProgressReporter, StageState, StageStatus, StageUpdate,
};
pub use profiler::DataProfiler;
pub use reporting::{CleaningSummary, ComprehensiveReport, DatasetSummary, ReportGenerator};
pub use types::{
    AnalysisResult, ChartConfig, ChartKind, ChartPoint, CleaningResult, ColumnInfo, ColumnStats,
    ColumnType, CorrelationPair, Dataset, Insight, InsightCategory, InsightResult, LoaderResult,
    MissingEntry, PipelineReport, Row, Value, VisualizationResult,
};
pub use utils::{parse_number, round_to};
pub use visualization::{ChartAggregator, PALETTE};
