//! Stage orchestrator.
//!
//! This module provides the `Pipeline` struct and builder that run the
//! loader, cleaner, analysis, visualization and insight stages in order.

use crate::analysis::StatisticsEngine;
use crate::cleaner::DataCleaner;
use crate::config::PipelineConfig;
use crate::error::{AnalysisError, Result};
use crate::insights::InsightEngine;
use crate::loader::{DataSource, DatasetLoader};
use crate::pipeline::progress::{
    CancellationToken, ClosureProgressReporter, PipelineStage, ProgressReporter, StageState,
    StageStatus, StageUpdate,
};
use crate::types::PipelineReport;
use crate::visualization::ChartAggregator;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_insights::{DataSource, Pipeline, PipelineConfig};
///
/// let report = Pipeline::builder()
///     .config(PipelineConfig::builder().skewness_threshold(0.8).build()?)
///     .on_progress(|update| {
///         println!("{:>20} {:?}", update.stage.display_name(), update.status);
///     })
///     .build()?
///     .process(DataSource::csv("sales.csv"))?;
///
/// for insight in &report.insights.insights {
///     println!("{}: {}", insight.title, insight.description);
/// }
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: CancellationToken,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The validated configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over `source`.
    ///
    /// Each stage consumes the complete output of the previous one. The
    /// first failure halts the run: the failing stage is marked
    /// [`StageStatus::Error`] with the error message as its log, and later
    /// stages stay pending.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::StageFailed`] naming the stage that failed; input
    ///   errors keep their code and [`AnalysisError::is_input_error`].
    /// - [`AnalysisError::Cancelled`] when the token was cancelled before a
    ///   stage started.
    pub fn process(&self, source: DataSource) -> Result<PipelineReport> {
        let start_time = Instant::now();
        let mut stages = StageState::initial();

        info!("Starting analysis pipeline on {}", source.describe());

        match self.process_internal(source, &mut stages) {
            Ok(mut report) => {
                report.duration_ms = start_time.elapsed().as_millis() as u64;
                info!("Pipeline completed in {} ms", report.duration_ms);
                Ok(report)
            }
            Err(e) => {
                if e.is_cancelled() {
                    info!("Pipeline cancelled");
                } else {
                    error!("Pipeline error: {}", e);
                }
                Err(e)
            }
        }
    }

    fn process_internal(
        &self,
        source: DataSource,
        stages: &mut [StageState],
    ) -> Result<PipelineReport> {
        let config = &self.config;

        let loader = self.run_stage(
            stages,
            PipelineStage::Loader,
            || DatasetLoader::load(source),
            DatasetLoader::summary,
        )?;

        let cleaning = self.run_stage(
            stages,
            PipelineStage::Cleaner,
            || Ok(DataCleaner::clean(&loader.dataset, config)),
            DataCleaner::summary,
        )?;

        let analysis = self.run_stage(
            stages,
            PipelineStage::Analysis,
            || {
                StatisticsEngine::analyze(
                    &cleaning.cleaned,
                    &cleaning.columns,
                    cleaning.original_row_count,
                    config,
                )
            },
            StatisticsEngine::summary,
        )?;

        let visualization = self.run_stage(
            stages,
            PipelineStage::Visualization,
            || ChartAggregator::aggregate(&cleaning.cleaned, &cleaning.columns, config),
            ChartAggregator::summary,
        )?;

        let insights = self.run_stage(
            stages,
            PipelineStage::Insights,
            || {
                Ok(InsightEngine::derive_insights(
                    &cleaning.columns,
                    &cleaning,
                    &analysis,
                    config,
                ))
            },
            InsightEngine::summary,
        )?;

        Ok(PipelineReport {
            loader,
            cleaning,
            analysis,
            visualization,
            insights,
            stages: stages.to_vec(),
            duration_ms: 0,
        })
    }

    /// Run one stage: check cancellation, mark it running, execute, then
    /// mark it done with its summary log or errored with the error message.
    fn run_stage<T>(
        &self,
        stages: &mut [StageState],
        stage: PipelineStage,
        work: impl FnOnce() -> Result<T>,
        summarize: impl FnOnce(&T) -> String,
    ) -> Result<T> {
        self.check_cancelled()?;

        self.transition(stages, stage, StageStatus::Running, None);
        debug!("Stage '{}' running", stage);

        match work() {
            Ok(output) => {
                let log = summarize(&output);
                info!("{}: {}", stage.display_name(), log);
                self.transition(stages, stage, StageStatus::Done, Some(log));
                Ok(output)
            }
            Err(e) => {
                error!("{} failed: {}", stage.display_name(), e);
                self.transition(stages, stage, StageStatus::Error, Some(e.to_string()));
                Err(e.in_stage(stage))
            }
        }
    }

    /// Record a status change and notify the reporter.
    fn transition(
        &self,
        stages: &mut [StageState],
        stage: PipelineStage,
        status: StageStatus,
        log: Option<String>,
    ) {
        if let Some(state) = stages.iter_mut().find(|s| s.stage == stage) {
            state.status = status;
            state.log = log.clone();
        }
        self.report_progress(StageUpdate::new(stage, status, log));
    }

    /// Check if cancellation has been requested.
    fn check_cancelled(&self) -> Result<()> {
        if self.cancellation_token.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        Ok(())
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: StageUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Builder for creating a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: Option<CancellationToken>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving stage transitions.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let pipeline = Pipeline::builder()
    ///     .on_progress(|update| {
    ///         println!("[{:.0}%] {}: {:?}", update.progress * 100.0, update.stage, update.status);
    ///     })
    ///     .build()?;
    /// ```
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(StageUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Set a cancellation token for stopping the pipeline between stages.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            cancellation_token: self.cancellation_token.unwrap_or_default(),
        })
    }
}
