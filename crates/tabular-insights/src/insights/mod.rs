//! Insight engine: rule-based findings over cleaning and analysis output.
//!
//! Rules run in a fixed order and each appends at most one insight. The
//! first three always fire; the observation rules fire only when their
//! condition holds. Nothing is scored or reordered.

mod rules;

use crate::config::PipelineConfig;
use crate::types::{AnalysisResult, CleaningResult, ColumnInfo, InsightResult};
use tracing::info;

/// Rule-based insight engine.
pub struct InsightEngine;

impl InsightEngine {
    /// Derive insights in rule order: overview, features, quality, skew,
    /// correlations, outliers.
    pub fn derive_insights(
        columns: &[ColumnInfo],
        cleaning: &CleaningResult,
        analysis: &AnalysisResult,
        config: &PipelineConfig,
    ) -> InsightResult {
        let mut insights = vec![
            rules::dataset_overview(columns, cleaning),
            rules::feature_breakdown(columns),
            rules::data_quality(columns, cleaning, analysis),
        ];
        insights.extend(rules::skewed_distributions(analysis, config.skewness_threshold));
        insights.extend(rules::notable_correlations(
            analysis,
            config.correlation_threshold,
            config.max_listed_correlations,
        ));
        insights.extend(rules::potential_outliers(analysis, config.iqr_multiplier));

        info!("Derived {} insights", insights.len());
        InsightResult { insights }
    }

    /// One-line stage log for an insight result.
    pub fn summary(result: &InsightResult) -> String {
        format!("Generated {} insights", result.insights.len())
    }
}
