//! CSV intake through polars.
//!
//! Every column is read as text. Deciding what is a number is the job of
//! [`csv_cell`] and of the cleaner's ratio rule, never of the parser, so a
//! stray `N/A` deep in a numeric column cannot fail the load.

use crate::error::{AnalysisError, Result};
use crate::types::Value;
use crate::utils::parse_number;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: char = '\u{feff}';

/// Quote characters tried in order: standard double quotes, then none for
/// files with unbalanced quoting.
const QUOTE_ATTEMPTS: [Option<u8>; 2] = [Some(b'"'), None];

/// Read a CSV file with a header row. Every column comes back as `String`.
pub fn read_csv_file(path: &Path) -> Result<DataFrame> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AnalysisError::CsvParse(format!("cannot read {}: {}", path.display(), e))
    })?;
    read_csv_str(&content)
}

/// Read CSV content held in memory. Every column comes back as `String`.
///
/// A leading byte-order mark, carriage returns and whitespace-only lines
/// are dropped before parsing. Parsing with double-quote handling is tried
/// first and parsing without quote handling second; the first error is
/// reported when both fail.
pub fn read_csv_str(content: &str) -> Result<DataFrame> {
    let normalized = normalize(content);
    let mut first_error = None;

    for quote in QUOTE_ATTEMPTS {
        match parse_as_text(&normalized, quote) {
            Ok(df) => return Ok(df),
            Err(e) => {
                debug!("CSV parse with quote {:?} failed: {}", quote.map(char::from), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    let message = first_error.map(|e| e.to_string()).unwrap_or_default();
    warn!("CSV content could not be parsed: {}", message);
    Err(AnalysisError::CsvParse(message))
}

/// Typed reading of one CSV cell: decimal literals become numbers, any
/// other text is kept verbatim.
pub(crate) fn csv_cell(text: &str) -> Value {
    parse_number(text)
        .map(Value::Number)
        .unwrap_or_else(|| Value::Text(text.to_string()))
}

fn parse_as_text(content: &str, quote: Option<u8>) -> PolarsResult<DataFrame> {
    let cursor = Cursor::new(content.as_bytes().to_vec());
    CsvReadOptions::default()
        .with_has_header(true)
        // Zero rows of inference reads every column as String
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(quote))
        .into_reader_with_file_handle(cursor)
        .finish()
}

fn normalize(content: &str) -> String {
    content
        .trim_start_matches(UTF8_BOM)
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
