//! Progress reporting and cancellation support for the analysis pipeline.
//!
//! The orchestrator emits one [`StageUpdate`] every time a stage changes
//! status. Cancellation is cooperative and is only observed between stages.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabular_insights::{CancellationToken, DataSource, Pipeline};
//!
//! let token = CancellationToken::new();
//! let token_clone = token.clone();
//!
//! // In another thread
//! std::thread::spawn(move || token_clone.cancel());
//!
//! let report = Pipeline::builder()
//!     .cancellation_token(token)
//!     .on_progress(|update| {
//!         println!("[{}] {:?} {}", update.stage, update.status, update.log.unwrap_or_default());
//!     })
//!     .build()?
//!     .process(DataSource::csv("data.csv"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stages of the analysis pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Parsing the source into headers and rows
    Loader,
    /// Type inference, empty-row removal and imputation
    Cleaner,
    /// Descriptive statistics and correlations
    Analysis,
    /// Histogram and frequency-table preparation
    Visualization,
    /// Rule-based findings
    Insights,
}

impl PipelineStage {
    /// Every stage in execution order.
    pub const ALL: [PipelineStage; 5] = [
        Self::Loader,
        Self::Cleaner,
        Self::Analysis,
        Self::Visualization,
        Self::Insights,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loader => "Data Loader",
            Self::Cleaner => "Data Cleaning",
            Self::Analysis => "Analysis",
            Self::Visualization => "Visualization",
            Self::Insights => "Insight Generation",
        }
    }

    /// Stable identifier used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loader => "loader",
            Self::Cleaner => "cleaner",
            Self::Analysis => "analysis",
            Self::Visualization => "visualization",
            Self::Insights => "insights",
        }
    }

    /// Share of the overall run attributed to this stage (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loader => 0.20,
            Self::Cleaner => 0.25,
            Self::Analysis => 0.30,
            Self::Visualization => 0.15,
            Self::Insights => 0.10,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        Self::ALL
            .iter()
            .take_while(|s| *s != self)
            .map(|s| s.weight())
            .sum()
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Done,
    Error,
}

/// Status and last log line of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    pub stage: PipelineStage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

impl StageState {
    pub fn pending(stage: PipelineStage) -> Self {
        Self {
            stage,
            status: StageStatus::Pending,
            log: None,
        }
    }

    /// Initial state list: every stage pending, in execution order.
    pub fn initial() -> Vec<StageState> {
        PipelineStage::ALL.iter().map(|s| Self::pending(*s)).collect()
    }
}

/// Notification sent after a stage changes status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageUpdate {
    /// Stage that transitioned
    pub stage: PipelineStage,

    /// New status of the stage
    pub status: StageStatus,

    /// One-line human-readable log, e.g. "Removed 12 rows, filled 47 values"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,
}

impl StageUpdate {
    /// Creates an update; overall progress is derived from the stage and status.
    pub fn new(stage: PipelineStage, status: StageStatus, log: Option<String>) -> Self {
        let progress = match status {
            StageStatus::Done => stage.base_progress() + stage.weight(),
            _ => stage.base_progress(),
        };
        Self {
            stage,
            status,
            log,
            progress: progress.clamp(0.0, 1.0),
        }
    }
}

/// Trait for receiving stage transitions during a run.
///
/// Implementations must be `Send + Sync` so a pipeline running on a worker
/// thread can report to a UI thread.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_insights::{ProgressReporter, StageUpdate};
/// use std::sync::mpsc::Sender;
/// use std::sync::Mutex;
///
/// struct ChannelReporter(Mutex<Sender<StageUpdate>>);
///
/// impl ProgressReporter for ChannelReporter {
///     fn report(&self, update: StageUpdate) {
///         if let Ok(tx) = self.0.lock() {
///             tx.send(update).ok();
///         }
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called once per stage transition. Implementations should not block.
    fn report(&self, update: StageUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(StageUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(StageUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(StageUpdate) + Send + Sync,
{
    fn report(&self, update: StageUpdate) {
        (self.callback)(update);
    }
}

/// Token for cancelling a pipeline run.
///
/// Clones share one atomic flag, so [`cancel()`](Self::cancel) may be called
/// from any thread. The pipeline checks the flag before each stage starts
/// and returns [`AnalysisError::Cancelled`](crate::error::AnalysisError::Cancelled)
/// once it is set; a stage that already started runs to completion.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);
static_assertions::assert_impl_all!(StageUpdate: Send, Sync);
static_assertions::assert_impl_all!(StageState: Send, Sync);

impl CancellationToken {
    /// Creates a new cancellation token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation of the pipeline.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once this token or any clone was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear the flag so the token can be reused for another run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_cancellation_token_clone_shares_state() {
        let token1 = CancellationToken::new();
        let token2 = token1.clone();
        assert!(!token2.is_cancelled());

        token1.cancel();
        assert!(token2.is_cancelled());

        token2.reset();
        assert!(!token1.is_cancelled());
    }

    #[test]
    fn test_cancellation_across_threads() {
        let token = CancellationToken::new();
        let token_clone = token.clone();

        let handle = std::thread::spawn(move || token_clone.cancel());
        handle.join().expect("Thread should not panic");

        assert!(token.is_cancelled());
    }

    #[test]
    fn test_stage_display_names() {
        assert_eq!(PipelineStage::Loader.display_name(), "Data Loader");
        assert_eq!(PipelineStage::Cleaner.display_name(), "Data Cleaning");
        assert_eq!(PipelineStage::Insights.display_name(), "Insight Generation");
        assert_eq!(PipelineStage::Visualization.to_string(), "visualization");
    }

    #[test]
    fn test_stage_weights_sum_to_one() {
        let total: f32 = PipelineStage::ALL.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert_eq!(PipelineStage::Loader.base_progress(), 0.0);
        assert!((PipelineStage::Analysis.base_progress() - 0.45).abs() < 1e-5);
    }

    #[test]
    fn test_stage_update_progress() {
        let running = StageUpdate::new(PipelineStage::Cleaner, StageStatus::Running, None);
        let done = StageUpdate::new(
            PipelineStage::Insights,
            StageStatus::Done,
            Some("Generated 3 insights".to_string()),
        );
        assert!((running.progress - 0.20).abs() < 1e-5);
        assert!((done.progress - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_initial_states_all_pending() {
        let states = StageState::initial();
        assert_eq!(states.len(), 5);
        assert!(states.iter().all(|s| s.status == StageStatus::Pending));
        assert_eq!(states[4].stage, PipelineStage::Insights);
    }

    #[test]
    fn test_stage_update_json_shape() {
        let update = StageUpdate::new(
            PipelineStage::Cleaner,
            StageStatus::Done,
            Some("Removed 1 rows, filled 0 values".to_string()),
        );
        let json = serde_json::to_string(&update).expect("Should serialize");

        assert!(json.contains("\"stage\":\"cleaner\""));
        assert!(json.contains("\"status\":\"done\""));
        assert!(json.contains("\"log\":\"Removed 1 rows, filled 0 values\""));
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        reporter.report(StageUpdate::new(PipelineStage::Loader, StageStatus::Running, None));
        reporter.report(StageUpdate::new(PipelineStage::Loader, StageStatus::Done, None));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }
}
