//! CLI entry point for the tabular insights pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::Path;
use tabular_insights::config::{
    CORRELATION_THRESHOLD, IQR_MULTIPLIER, NUMERIC_RATIO_THRESHOLD, SKEWNESS_THRESHOLD,
};
use tabular_insights::reporting::output_base_name;
use tabular_insights::{
    ComprehensiveReport, DataSource, Pipeline, PipelineConfig, PipelineReport, ReportGenerator,
    StageStatus,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Automated exploratory analysis for tabular data",
    long_about = "Loads a CSV file, cleans it, computes descriptive statistics and \
                  correlations, prepares chart data and derives plain-language insights.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable summary\n  \
                  tabular-insights -i data.csv\n\n  \
                  # Full report as JSON on stdout\n  \
                  tabular-insights -i data.csv --json | jq .insights\n\n  \
                  # Write the report and the cleaned CSV to results/\n  \
                  tabular-insights -i data.csv -o results/ --emit-report --export-cleaned"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for written files
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the cleaned dataset to the output directory as <input_name>_cleaned.csv
    #[arg(long)]
    export_cleaned: bool,

    /// Share of parseable cells a column needs to be treated as numeric
    #[arg(long, default_value_t = NUMERIC_RATIO_THRESHOLD)]
    numeric_ratio: f64,

    /// Absolute skewness above which a column is reported as skewed
    #[arg(long, default_value_t = SKEWNESS_THRESHOLD)]
    skewness_threshold: f64,

    /// Absolute correlation above which a pair is reported
    #[arg(long, default_value_t = CORRELATION_THRESHOLD)]
    correlation_threshold: f64,

    /// IQR multiplier for the outlier fences
    #[arg(long, default_value_t = IQR_MULTIPLIER)]
    iqr_multiplier: f64,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = PipelineConfig::builder()
        .numeric_ratio_threshold(args.numeric_ratio)
        .skewness_threshold(args.skewness_threshold)
        .correlation_threshold(args.correlation_threshold)
        .iqr_multiplier(args.iqr_multiplier)
        .build()?;

    let pipeline = build_pipeline(&args, config)?;

    run_pipeline(pipeline, &args)
}

fn build_pipeline(args: &Args, config: PipelineConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {:?} {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.status,
                update.log.as_deref().unwrap_or_default()
            );
        });
    }

    Ok(builder.build()?)
}

/// Run pipeline and print results
fn run_pipeline(pipeline: Pipeline, args: &Args) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Starting analysis of {}", args.input);
    info!("{}", "=".repeat(80));

    match pipeline.process(DataSource::csv(&args.input)) {
        Ok(result) => handle_pipeline_output(&result, args),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file
/// - `--export-cleaned`: Write the cleaned dataset as CSV
fn handle_pipeline_output(result: &PipelineReport, args: &Args) -> Result<()> {
    let base_name = output_base_name(Path::new(&args.input));
    let generator = ReportGenerator::new(&args.output);

    let output_file = if args.export_cleaned {
        let path = generator.export_cleaned_csv(&result.cleaning.cleaned, &base_name)?;
        Some(path.display().to_string())
    } else {
        None
    };

    let report =
        ReportGenerator::build_comprehensive_report(&args.input, output_file.as_deref(), result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &base_name)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn status_label(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Pending => "pending",
        StageStatus::Running => "running",
        StageStatus::Done => "done",
        StageStatus::Error => "error",
    }
}

/// Print a human-readable summary of the analysis.
///
/// Uses `println!` so the summary is visible regardless of log level.
fn print_human_readable_summary(report: &ComprehensiveReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("DATASET");
    println!("{}", "-".repeat(40));
    println!("  File: {}", report.input_file);
    println!(
        "  Original: {} rows x {} columns",
        report.dataset.original_shape.0, report.dataset.original_shape.1
    );
    println!(
        "  Cleaned:  {} rows x {} columns",
        report.dataset.cleaned_shape.0, report.dataset.cleaned_shape.1
    );
    println!(
        "  Columns:  {} numeric, {} categorical",
        report.dataset.numeric_columns, report.dataset.categorical_columns
    );
    println!(
        "  Removed {} rows ({:.1}%), filled {} values",
        report.cleaning.rows_removed,
        report.cleaning.rows_removed_percent,
        report.cleaning.values_filled
    );
    println!();

    println!("STAGES");
    println!("{}", "-".repeat(40));
    for state in &report.stages {
        println!(
            "  {:<20} {:<8} {}",
            state.stage.display_name(),
            status_label(state.status),
            state.log.as_deref().unwrap_or_default()
        );
    }
    println!();

    if !report.analysis.statistics.is_empty() {
        println!("STATISTICS");
        println!("{}", "-".repeat(40));
        println!(
            "{:<20} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}",
            "Column", "Mean", "Median", "Std", "Min", "Max", "Skew"
        );
        println!("{}", "-".repeat(84));
        for stats in &report.analysis.statistics {
            println!(
                "{:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8.2}",
                truncate_str(&stats.column, 19),
                stats.mean,
                stats.median,
                stats.std,
                stats.min,
                stats.max,
                stats.skewness
            );
        }
        println!();
    }

    if !report.analysis.correlations.is_empty() {
        println!("TOP CORRELATIONS");
        println!("{}", "-".repeat(40));
        for pair in &report.analysis.correlations {
            println!("  {} / {}: {:.3}", pair.col1, pair.col2, pair.value);
        }
        println!();
    }

    println!("INSIGHTS");
    println!("{}", "-".repeat(40));
    for insight in &report.insights {
        println!("  - {}", insight.title);
        println!("    {}", insight.description);
    }
    println!();

    if let Some(ref output_file) = report.output_file {
        println!("Cleaned dataset: {}", output_file);
    }
    println!("Charts prepared: {}", report.charts.len());
    println!("Completed in {} ms", report.duration_ms);
    println!("{}", "=".repeat(80));
}
