//! Individual insight rules.

use crate::types::{
    AnalysisResult, CleaningResult, ColumnInfo, Insight, InsightCategory,
};
use crate::utils::plural;

pub(crate) fn dataset_overview(columns: &[ColumnInfo], cleaning: &CleaningResult) -> Insight {
    Insight::new(
        "Dataset Overview",
        format!(
            "The dataset contains {} rows and {} columns after cleaning ({} rows removed, {} missing values imputed).",
            cleaning.cleaned_row_count(),
            columns.len(),
            cleaning.rows_removed,
            cleaning.values_filled
        ),
        InsightCategory::Dataset,
    )
}

pub(crate) fn feature_breakdown(columns: &[ColumnInfo]) -> Insight {
    let numeric: Vec<&str> = columns
        .iter()
        .filter(|c| c.is_numeric())
        .map(|c| c.name.as_str())
        .collect();
    let categorical = columns.iter().filter(|c| c.is_categorical()).count();

    Insight::new(
        "Feature Breakdown",
        format!(
            "Found {} numeric feature{} ({}) and {} categorical feature{}.",
            numeric.len(),
            plural(numeric.len()),
            numeric.join(", "),
            categorical,
            plural(categorical)
        ),
        InsightCategory::Features,
    )
}

/// Missing cells relative to `original rows x columns` of the raw dataset.
pub(crate) fn data_quality(
    columns: &[ColumnInfo],
    cleaning: &CleaningResult,
    analysis: &AnalysisResult,
) -> Insight {
    let total_missing = analysis.total_missing();
    let total_cells = cleaning.original_row_count * columns.len();

    let description = if total_missing == 0 {
        "Excellent data quality: no missing values detected in the original dataset.".to_string()
    } else {
        let percent = if total_cells == 0 {
            0.0
        } else {
            total_missing as f64 / total_cells as f64 * 100.0
        };
        format!(
            "{} missing values detected ({:.1}% of all data cells). All have been imputed during cleaning.",
            total_missing, percent
        )
    };

    Insight::new("Data Quality", description, InsightCategory::Quality)
}

pub(crate) fn skewed_distributions(analysis: &AnalysisResult, threshold: f64) -> Option<Insight> {
    let skewed: Vec<String> = analysis
        .statistics
        .iter()
        .map(|s| (s.column.as_str(), s.rounded_skewness()))
        .filter(|(_, skew)| skew.abs() > threshold)
        .map(|(column, skew)| {
            let direction = if skew > 0.0 { "right" } else { "left" };
            format!("{} ({}-skewed, {})", column, direction, skew)
        })
        .collect();

    if skewed.is_empty() {
        return None;
    }

    let count = skewed.len();
    Some(Insight::new(
        "Skewed Distributions",
        format!(
            "{} column{} show{} significant skewness: {}. Consider log-transformation for modelling.",
            count,
            plural(count),
            if count == 1 { "s" } else { "" },
            skewed.join(", ")
        ),
        InsightCategory::Observation,
    ))
}

pub(crate) fn notable_correlations(
    analysis: &AnalysisResult,
    threshold: f64,
    listed: usize,
) -> Option<Insight> {
    let strong: Vec<_> = analysis
        .correlations
        .iter()
        .filter(|c| c.rounded_value().abs() > threshold)
        .collect();

    if strong.is_empty() {
        return None;
    }

    let shown: Vec<String> = strong
        .iter()
        .take(listed)
        .map(|c| format!("{} ↔ {} ({})", c.col1, c.col2, c.rounded_value()))
        .collect();

    Some(Insight::new(
        "Notable Correlations",
        format!(
            "{} strong correlation{} found: {}.",
            strong.len(),
            plural(strong.len()),
            shown.join(", ")
        ),
        InsightCategory::Observation,
    ))
}

/// Columns whose min or max lies outside the Tukey fences.
pub(crate) fn potential_outliers(analysis: &AnalysisResult, multiplier: f64) -> Option<Insight> {
    let flagged: Vec<&str> = analysis
        .statistics
        .iter()
        .filter(|s| s.has_outliers(multiplier))
        .map(|s| s.column.as_str())
        .collect();

    if flagged.is_empty() {
        return None;
    }

    Some(Insight::new(
        "Potential Outliers",
        format!(
            "{} column{} may contain outliers based on IQR analysis: {}.",
            flagged.len(),
            plural(flagged.len()),
            flagged.join(", ")
        ),
        InsightCategory::Observation,
    ))
}
