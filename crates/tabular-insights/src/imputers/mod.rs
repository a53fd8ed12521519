//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with the raw-data median, categorical columns
//! with a fixed placeholder.

mod statistical;

pub use statistical::{FillStrategy, StatisticalImputer};
