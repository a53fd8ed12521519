//! Column profiling for raw datasets.
//!
//! Profiling scans every header once over the raw rows and produces a
//! [`ColumnInfo`] carrying the inferred type, the missing count and the
//! distinct count. Profiles are computed before any row is removed, so they
//! describe the original dataset.

mod type_inference;

use type_inference::{count_cells, infer_column_type};

use crate::config::PipelineConfig;
use crate::types::{ColumnInfo, Dataset};
use tracing::debug;

/// Data profiler for classifying the columns of a dataset.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column, in header order.
    pub fn profile_dataset(dataset: &Dataset, config: &PipelineConfig) -> Vec<ColumnInfo> {
        dataset
            .headers
            .iter()
            .map(|name| Self::profile_column(dataset, name, config))
            .collect()
    }

    /// Profile a single column by name. Unknown names profile as fully missing.
    pub fn profile_column(dataset: &Dataset, name: &str, config: &PipelineConfig) -> ColumnInfo {
        let counts = count_cells(dataset.column(name));
        let column_type = infer_column_type(&counts, config.numeric_ratio_threshold);

        debug!(
            "Column '{}': {} ({} missing, {} numeric, {} unique)",
            name, column_type, counts.missing, counts.numeric, counts.unique
        );

        ColumnInfo {
            name: name.to_string(),
            column_type,
            missing_count: counts.missing,
            unique_count: counts.unique,
        }
    }
}
