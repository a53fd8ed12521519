//! Configuration types for the analysis pipeline.
//!
//! Every threshold used by the stages is an empirically fixed constant.
//! They are exposed here as tunable fields whose defaults reproduce the
//! reference behavior exactly; `PipelineConfig::default()` is the
//! parity configuration.

use serde::{Deserialize, Serialize};

/// Share of non-missing values that must parse as numbers for a column to be numeric.
pub const NUMERIC_RATIO_THRESHOLD: f64 = 0.7;

/// Placeholder written into missing categorical cells.
pub const MISSING_PLACEHOLDER: &str = "Unknown";

/// Number of numeric columns that get a histogram.
pub const MAX_HISTOGRAMS: usize = 4;

/// Lower bound of the histogram bin count.
pub const MIN_HISTOGRAM_BINS: usize = 5;

/// Upper bound of the histogram bin count.
pub const MAX_HISTOGRAM_BINS: usize = 15;

/// Number of categorical columns that get a frequency chart.
pub const MAX_BAR_CHARTS: usize = 3;

/// Categorical columns with more distinct values than this are not charted.
pub const MAX_CATEGORICAL_UNIQUE: usize = 50;

/// Number of entries kept in a frequency table.
pub const TOP_CATEGORIES: usize = 10;

/// Number of correlation pairs kept in the analysis output.
pub const MAX_CORRELATIONS: usize = 10;

/// Absolute skewness above which a distribution is reported as skewed.
pub const SKEWNESS_THRESHOLD: f64 = 1.0;

/// Absolute correlation above which a pair is reported as notable.
pub const CORRELATION_THRESHOLD: f64 = 0.5;

/// Number of notable correlation pairs spelled out in the insight text.
pub const MAX_LISTED_CORRELATIONS: usize = 3;

/// Tukey fence multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Configuration for the analysis pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_insights::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .correlation_threshold(0.6)
///     .max_histograms(6)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum `numeric / non-missing` ratio (exclusive) for a numeric column.
    /// Default: 0.7
    pub numeric_ratio_threshold: f64,

    /// Value used to fill missing categorical cells.
    /// Default: "Unknown"
    pub missing_placeholder: String,

    /// Maximum number of histograms (first numeric columns in header order).
    /// Default: 4
    pub max_histograms: usize,

    /// Minimum number of histogram bins.
    /// Default: 5
    pub min_histogram_bins: usize,

    /// Maximum number of histogram bins.
    /// Default: 15
    pub max_histogram_bins: usize,

    /// Maximum number of categorical frequency charts.
    /// Default: 3
    pub max_bar_charts: usize,

    /// Maximum unique count for a categorical column to be charted.
    /// Default: 50
    pub max_categorical_unique: usize,

    /// Number of entries kept in each frequency table.
    /// Default: 10
    pub top_categories: usize,

    /// Number of correlation pairs kept after ranking.
    /// Default: 10
    pub max_correlations: usize,

    /// Absolute skewness threshold (exclusive) for the skew insight.
    /// Default: 1.0
    pub skewness_threshold: f64,

    /// Absolute correlation threshold (exclusive) for the correlation insight.
    /// Default: 0.5
    pub correlation_threshold: f64,

    /// Number of notable pairs listed in the correlation insight.
    /// Default: 3
    pub max_listed_correlations: usize,

    /// Tukey fence multiplier for the outlier insight.
    /// Default: 1.5
    pub iqr_multiplier: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            numeric_ratio_threshold: NUMERIC_RATIO_THRESHOLD,
            missing_placeholder: MISSING_PLACEHOLDER.to_string(),
            max_histograms: MAX_HISTOGRAMS,
            min_histogram_bins: MIN_HISTOGRAM_BINS,
            max_histogram_bins: MAX_HISTOGRAM_BINS,
            max_bar_charts: MAX_BAR_CHARTS,
            max_categorical_unique: MAX_CATEGORICAL_UNIQUE,
            top_categories: TOP_CATEGORIES,
            max_correlations: MAX_CORRELATIONS,
            skewness_threshold: SKEWNESS_THRESHOLD,
            correlation_threshold: CORRELATION_THRESHOLD,
            max_listed_correlations: MAX_LISTED_CORRELATIONS,
            iqr_multiplier: IQR_MULTIPLIER,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.numeric_ratio_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "numeric_ratio_threshold".to_string(),
                value: self.numeric_ratio_threshold,
            });
        }

        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "correlation_threshold".to_string(),
                value: self.correlation_threshold,
            });
        }

        if !(self.skewness_threshold >= 0.0 && self.skewness_threshold.is_finite()) {
            return Err(ConfigValidationError::NegativeValue {
                field: "skewness_threshold".to_string(),
                value: self.skewness_threshold,
            });
        }

        if !(self.iqr_multiplier >= 0.0 && self.iqr_multiplier.is_finite()) {
            return Err(ConfigValidationError::NegativeValue {
                field: "iqr_multiplier".to_string(),
                value: self.iqr_multiplier,
            });
        }

        if self.min_histogram_bins == 0 || self.min_histogram_bins > self.max_histogram_bins {
            return Err(ConfigValidationError::InvalidBinRange {
                min: self.min_histogram_bins,
                max: self.max_histogram_bins,
            });
        }

        if self.max_categorical_unique < 2 {
            return Err(ConfigValidationError::InvalidCount {
                field: "max_categorical_unique".to_string(),
                value: self.max_categorical_unique,
                minimum: 2,
            });
        }

        if self.top_categories == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "top_categories".to_string(),
                value: self.top_categories,
                minimum: 1,
            });
        }

        if self.max_listed_correlations == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "max_listed_correlations".to_string(),
                value: self.max_listed_correlations,
                minimum: 1,
            });
        }

        if self.missing_placeholder.is_empty() {
            return Err(ConfigValidationError::EmptyPlaceholder);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be a finite, non-negative number)")]
    NegativeValue { field: String, value: f64 },

    #[error("Invalid histogram bin range: {min}..={max} (min must be at least 1 and not exceed max)")]
    InvalidBinRange { min: usize, max: usize },

    #[error("Invalid value for '{field}': {value} (must be at least {minimum})")]
    InvalidCount {
        field: String,
        value: usize,
        minimum: usize,
    },

    #[error("Missing-value placeholder must not be empty")]
    EmptyPlaceholder,
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    numeric_ratio_threshold: Option<f64>,
    missing_placeholder: Option<String>,
    max_histograms: Option<usize>,
    histogram_bins: Option<(usize, usize)>,
    max_bar_charts: Option<usize>,
    max_categorical_unique: Option<usize>,
    top_categories: Option<usize>,
    max_correlations: Option<usize>,
    skewness_threshold: Option<f64>,
    correlation_threshold: Option<f64>,
    max_listed_correlations: Option<usize>,
    iqr_multiplier: Option<f64>,
}

impl PipelineConfigBuilder {
    /// Set the numeric classification ratio.
    ///
    /// # Arguments
    /// * `ratio` - Value between 0.0 and 1.0 (e.g., 0.7 = more than 70% numeric)
    pub fn numeric_ratio_threshold(mut self, ratio: f64) -> Self {
        self.numeric_ratio_threshold = Some(ratio);
        self
    }

    /// Set the placeholder used for missing categorical values.
    pub fn missing_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.missing_placeholder = Some(placeholder.into());
        self
    }

    /// Set how many numeric columns get a histogram.
    pub fn max_histograms(mut self, count: usize) -> Self {
        self.max_histograms = Some(count);
        self
    }

    /// Set the inclusive bounds of the histogram bin count.
    pub fn histogram_bins(mut self, min: usize, max: usize) -> Self {
        self.histogram_bins = Some((min, max));
        self
    }

    /// Set how many categorical columns get a frequency chart.
    pub fn max_bar_charts(mut self, count: usize) -> Self {
        self.max_bar_charts = Some(count);
        self
    }

    /// Set the unique-count ceiling for charted categorical columns.
    pub fn max_categorical_unique(mut self, count: usize) -> Self {
        self.max_categorical_unique = Some(count);
        self
    }

    /// Set how many entries each frequency table keeps.
    pub fn top_categories(mut self, count: usize) -> Self {
        self.top_categories = Some(count);
        self
    }

    /// Set how many correlation pairs are kept.
    pub fn max_correlations(mut self, count: usize) -> Self {
        self.max_correlations = Some(count);
        self
    }

    /// Set the absolute skewness threshold.
    pub fn skewness_threshold(mut self, threshold: f64) -> Self {
        self.skewness_threshold = Some(threshold);
        self
    }

    /// Set the absolute correlation threshold.
    pub fn correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = Some(threshold);
        self
    }

    /// Set how many notable pairs the correlation insight lists.
    pub fn max_listed_correlations(mut self, count: usize) -> Self {
        self.max_listed_correlations = Some(count);
        self
    }

    /// Set the Tukey fence multiplier.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let (min_bins, max_bins) = self
            .histogram_bins
            .unwrap_or((MIN_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS));

        let config = PipelineConfig {
            numeric_ratio_threshold: self
                .numeric_ratio_threshold
                .unwrap_or(NUMERIC_RATIO_THRESHOLD),
            missing_placeholder: self
                .missing_placeholder
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string()),
            max_histograms: self.max_histograms.unwrap_or(MAX_HISTOGRAMS),
            min_histogram_bins: min_bins,
            max_histogram_bins: max_bins,
            max_bar_charts: self.max_bar_charts.unwrap_or(MAX_BAR_CHARTS),
            max_categorical_unique: self
                .max_categorical_unique
                .unwrap_or(MAX_CATEGORICAL_UNIQUE),
            top_categories: self.top_categories.unwrap_or(TOP_CATEGORIES),
            max_correlations: self.max_correlations.unwrap_or(MAX_CORRELATIONS),
            skewness_threshold: self.skewness_threshold.unwrap_or(SKEWNESS_THRESHOLD),
            correlation_threshold: self.correlation_threshold.unwrap_or(CORRELATION_THRESHOLD),
            max_listed_correlations: self
                .max_listed_correlations
                .unwrap_or(MAX_LISTED_CORRELATIONS),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(IQR_MULTIPLIER),
        };

        config.validate()?;
        Ok(config)
    }
}
