//! Aggregator: turns a cleaned dataset into chart-ready data.
//!
//! Histograms are built for the first numeric columns and frequency tables
//! for the first displayable categorical columns, both in header order.
//! Output depends only on the cleaned rows and the column descriptors.

mod charts;

use crate::config::PipelineConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{ColumnInfo, Dataset, Value, VisualizationResult};
use tracing::{debug, info, warn};

use charts::{bin_count, frequency_table, histogram};

/// Round-robin chart palette.
pub const PALETTE: [&str; 6] = [
    "hsl(221, 83%, 53%)",
    "hsl(262, 83%, 58%)",
    "hsl(142, 71%, 45%)",
    "hsl(38, 92%, 50%)",
    "hsl(0, 84%, 60%)",
    "hsl(199, 89%, 48%)",
];

/// Chart data aggregator.
pub struct ChartAggregator;

impl ChartAggregator {
    /// Build histograms, then frequency tables.
    ///
    /// Colors come from [`PALETTE`] through one counter shared by both
    /// passes, so numeric charts take the first indices.
    pub fn aggregate(
        cleaned: &Dataset,
        columns: &[ColumnInfo],
        config: &PipelineConfig,
    ) -> Result<VisualizationResult> {
        if let Some(unknown) = columns.iter().find(|c| !cleaned.has_column(&c.name)) {
            return Err(AnalysisError::ColumnNotFound(unknown.name.clone()));
        }

        let mut charts = Vec::new();
        let mut color_index = 0usize;

        for info in columns.iter().filter(|c| c.is_numeric()).take(config.max_histograms) {
            let values: Vec<f64> = cleaned.column(&info.name).filter_map(Value::as_number).collect();
            let bins = bin_count(
                values.len(),
                config.min_histogram_bins,
                config.max_histogram_bins,
            );

            match histogram(&info.name, &values, bins, PALETTE[color_index % PALETTE.len()]) {
                Some(chart) => {
                    debug!("Histogram for '{}' with {} bins", info.name, bins);
                    charts.push(chart);
                    color_index += 1;
                }
                None => warn!("Skipping histogram for '{}': no numeric values", info.name),
            }
        }

        let displayable = columns.iter().filter(|c| {
            c.is_categorical() && c.unique_count > 1 && c.unique_count <= config.max_categorical_unique
        });
        for info in displayable.take(config.max_bar_charts) {
            debug!("Frequency table for '{}'", info.name);
            charts.push(frequency_table(
                &info.name,
                cleaned.column(&info.name),
                &config.missing_placeholder,
                config.top_categories,
                PALETTE[color_index % PALETTE.len()],
            ));
            color_index += 1;
        }

        info!("Built {} charts", charts.len());
        Ok(VisualizationResult { charts })
    }

    /// One-line stage log for an aggregation result.
    pub fn summary(result: &VisualizationResult) -> String {
        format!("Generated {} charts", result.charts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::DataCleaner;
    use crate::types::{ChartKind, CleaningResult, Row};
    use pretty_assertions::assert_eq;

    fn clean(headers: &[&str], rows: Vec<Row>) -> CleaningResult {
        let raw = Dataset::new(headers.iter().map(|s| s.to_string()).collect(), rows);
        DataCleaner::clean(&raw, &PipelineConfig::default())
    }

    fn aggregate(result: &CleaningResult) -> VisualizationResult {
        ChartAggregator::aggregate(&result.cleaned, &result.columns, &PipelineConfig::default())
            .unwrap()
    }

    #[test]
    fn test_aggregate_limits_and_order() {
        let headers = ["n1", "n2", "n3", "n4", "n5", "c1", "c2", "c3", "c4"];
        let rows = (0..6)
            .map(|i| {
                let mut row = Row::new();
                for h in &headers[..5] {
                    row.insert(*h, i as f64);
                }
                for h in &headers[5..] {
                    row.insert(*h, if i % 2 == 0 { "even" } else { "odd" });
                }
                row
            })
            .collect();
        let result = aggregate(&clean(&headers, rows));

        assert_eq!(result.charts.len(), 7);
        let keys: Vec<&str> = result.charts.iter().map(|c| c.data_key.as_str()).collect();
        assert_eq!(keys, vec!["n1", "n2", "n3", "n4", "c1", "c2", "c3"]);
        assert_eq!(result.charts[3].kind, ChartKind::Histogram);
        assert_eq!(result.charts[4].kind, ChartKind::Bar);
        // Shared counter wraps around the palette
        assert_eq!(result.charts[4].color, PALETTE[4]);
        assert_eq!(result.charts[6].color, PALETTE[0]);
        assert_eq!(ChartAggregator::summary(&result), "Generated 7 charts");
    }

    #[test]
    fn test_aggregate_skips_single_valued_category() {
        let cleaned = clean(
            &["const", "kind"],
            vec![
                Row::new().with("const", "same").with("kind", "a"),
                Row::new().with("const", "same").with("kind", "b"),
            ],
        );
        let result = aggregate(&cleaned);

        assert_eq!(result.charts.len(), 1);
        assert_eq!(result.charts[0].data_key, "kind");
        assert_eq!(result.charts[0].color, PALETTE[0]);
    }

    #[test]
    fn test_aggregate_skips_high_cardinality_category() {
        let rows = (0..51)
            .map(|i| Row::new().with("id", format!("id-{i}")))
            .collect();
        let result = aggregate(&clean(&["id"], rows));
        assert!(result.charts.is_empty());
    }

    #[test]
    fn test_aggregate_placeholder_counts_in_bar_chart() {
        let cleaned = clean(
            &["kind", "n"],
            vec![
                Row::new().with("kind", "a").with("n", 1.0),
                Row::new().with("kind", "").with("n", 2.0),
                Row::new().with("kind", "b").with("n", 3.0),
                Row::new().with("kind", "").with("n", 4.0),
            ],
        );
        let result = aggregate(&cleaned);

        let bar = result.charts.iter().find(|c| c.kind == ChartKind::Bar).unwrap();
        assert_eq!(bar.data[0].name, "Unknown");
        assert_eq!(bar.data[0].value, 2);
    }

    #[test]
    fn test_aggregate_histogram_bin_count_clamped() {
        let rows = (0..100).map(|i| Row::new().with("n", i as f64)).collect();
        let result = aggregate(&clean(&["n"], rows));
        assert_eq!(result.charts[0].data.len(), 10);
        let total: usize = result.charts[0].data.iter().map(|p| p.value).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_aggregate_unvalidated_bin_range_does_not_panic() {
        let config = PipelineConfig {
            min_histogram_bins: 15,
            max_histogram_bins: 5,
            ..Default::default()
        };
        let rows = (0..100).map(|i| Row::new().with("n", i as f64)).collect();
        let cleaned = clean(&["n"], rows);

        let result =
            ChartAggregator::aggregate(&cleaned.cleaned, &cleaned.columns, &config).unwrap();

        assert_eq!(result.charts[0].data.len(), 10);
    }
}
