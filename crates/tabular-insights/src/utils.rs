//! Shared utilities for the analysis pipeline.
//!
//! Numeric parsing, rounding for display, and order statistics over sorted
//! slices live here so every stage agrees on the same definitions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serializer;

// =============================================================================
// Numeric Parsing
// =============================================================================

// Plain decimal literal: optional sign, digits with optional fraction, optional exponent.
static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("Invalid regex: decimal literal")
});

/// Parse text as a real number.
///
/// Surrounding whitespace is ignored. Only decimal literals are accepted;
/// spellings such as `NaN`, `inf` or `Infinity` and whitespace-only text are
/// not numbers.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_insights::utils::parse_number;
///
/// assert_eq!(parse_number(" 4.5 "), Some(4.5));
/// assert_eq!(parse_number("1e3"), Some(1000.0));
/// assert_eq!(parse_number("N/A"), None);
/// ```
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !DECIMAL_LITERAL.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

// =============================================================================
// Rounding
// =============================================================================

/// Round to a fixed number of decimals, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // Avoid emitting -0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub(crate) fn serialize_round1<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 1))
}

pub(crate) fn serialize_round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

pub(crate) fn serialize_round3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 3))
}

// =============================================================================
// Order Statistics
// =============================================================================

/// Sort finite values ascending.
pub fn sorted_values(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Sorted-midpoint median; even lengths average the two centre values.
pub fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Upper-middle element `sorted[floor(n / 2)]`, without averaging.
pub fn upper_median_of_sorted(sorted: &[f64]) -> Option<f64> {
    sorted.get(sorted.len() / 2).copied()
}

/// Nearest-rank percentile: `sorted[floor(p * n)]`, no interpolation.
pub fn nearest_rank(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((p * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    Some(sorted[idx])
}

/// Plural suffix helper for count-based messages.
pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

// =============================================================================
// Tests
// =============================================================================
