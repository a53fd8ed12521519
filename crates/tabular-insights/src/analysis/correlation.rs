//! Pairwise Pearson correlation over row-aligned numeric columns.

use crate::types::CorrelationPair;

/// Pearson product-moment correlation of two equal-length vectors.
///
/// Returns `None` when the result is undefined: empty input, mismatched
/// lengths or non-finite cells. A zero-variance side yields `Some(0.0)`.
pub(crate) fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return None;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut dx = 0.0;
    let mut dy = 0.0;
    for (a, b) in x.iter().zip(y) {
        numerator += (a - mean_x) * (b - mean_y);
        dx += (a - mean_x).powi(2);
        dy += (b - mean_y).powi(2);
    }

    let denominator = (dx * dy).sqrt();
    if denominator == 0.0 {
        return Some(0.0);
    }
    let r = numerator / denominator;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Correlate every pair `i < j` of the given columns and keep the `limit`
/// strongest by absolute value. Ties keep enumeration order.
///
/// Each column is a name plus its row-aligned values; unparsable cells are
/// represented as NaN and make the pair undefined.
pub(crate) fn top_correlations(columns: &[(String, Vec<f64>)], limit: usize) -> Vec<CorrelationPair> {
    let mut pairs = Vec::new();

    for (i, (name_x, x)) in columns.iter().enumerate() {
        for (name_y, y) in &columns[i + 1..] {
            if let Some(value) = pearson(x, y) {
                pairs.push(CorrelationPair {
                    col1: name_x.clone(),
                    col2: name_y.clone(),
                    value,
                });
            }
        }
    }

    rank_by_magnitude(&mut pairs, limit);
    pairs
}

/// Order pairs by reported magnitude, `|r|` at 3 decimals, strongest first,
/// and keep `limit`. Pairs that report the same magnitude keep their order.
pub(crate) fn rank_by_magnitude(pairs: &mut Vec<CorrelationPair>, limit: usize) {
    pairs.sort_by(|a, b| {
        let a = a.rounded_value().abs();
        let b = b.rounded_value().abs();
        b.total_cmp(&a)
    });
    pairs.truncate(limit);
}
