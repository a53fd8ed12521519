//! Report generation module.
//!
//! This module provides the combined run report and writes it, along with
//! the cleaned dataset, to disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabular_insights::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_comprehensive_report("data/sales.csv", None, &pipeline_report);
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "sales")?;
//! ```

mod generator;

pub use generator::{
    CleaningSummary, ComprehensiveReport, DatasetSummary, ReportGenerator, output_base_name,
};
