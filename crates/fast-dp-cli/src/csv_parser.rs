//! CSV parsing module for reading one numeric column.
//!
//! # Column Detection
//!
//! Unless a column is named explicitly, the parser picks the first header
//! (case-insensitive) among `value`, `close`, `price`, `x`, and otherwise the
//! leftmost column whose cells all parse as numbers.
//!
//! Empty cells are read as NaN. A blank line between data rows is a row of
//! empty cells, so in a one-column file it is one NaN; blank lines after the
//! last row are ignored. Date columns (`date`, `time`, `datetime`,
//! `timestamp`, `dt`) are kept as row labels for row-aligned output and never
//! parsed as numbers.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{CliError, Result};

/// Header names tried, in order, when no column is given.
pub const PREFERRED_COLUMNS: &[&str] = &["value", "close", "price", "x"];

/// One parsed CSV column.
#[derive(Debug, Clone, PartialEq)]
enum Column {
    /// Every cell so far parsed as a number.
    Numeric(Vec<f64>),
    /// A cell failed to parse; the first failure is kept for reporting.
    Invalid { line: usize, message: String },
}

/// Parsed CSV data.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Column headers from the CSV.
    pub headers: Vec<String>,
    /// Date column values (if found).
    pub dates: Option<Vec<String>>,
    /// Number of rows parsed.
    pub row_count: usize,
    columns: Vec<Option<Column>>,
}

impl ParsedCsv {
    /// Index of the header matching `name` (case-insensitive).
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers
            .iter()
            .position(|h| normalize_header(h) == wanted)
    }

    /// Values of a named column.
    ///
    /// # Errors
    ///
    /// Returns `CliError::ColumnNotFound` if no such non-date column exists,
    /// or `CliError::CsvParseError` if one of its cells is not a number.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        let column = self
            .column_index(name)
            .and_then(|idx| self.columns[idx].as_ref())
            .ok_or_else(|| self.not_found(Some(name)))?;
        match column {
            Column::Numeric(values) => Ok(values),
            Column::Invalid { line, message } => Err(CliError::CsvParseError {
                message: format!("column '{name}': {message}"),
                line: Some(*line),
            }),
        }
    }

    /// Values of the auto-detected column, with its header.
    ///
    /// # Errors
    ///
    /// Returns `CliError::ColumnNotFound` if no column is numeric, or
    /// `CliError::CsvParseError` if a preferred column holds a non-number.
    pub fn detect(&self) -> Result<(&str, &[f64])> {
        for preferred in PREFERRED_COLUMNS {
            if let Some(idx) = self.column_index(preferred) {
                if self.columns[idx].is_some() {
                    return self.named(preferred);
                }
            }
        }

        self.columns
            .iter()
            .enumerate()
            .find_map(|(idx, column)| match column {
                Some(Column::Numeric(values)) => {
                    Some((self.headers[idx].as_str(), values.as_slice()))
                }
                _ => None,
            })
            .ok_or_else(|| self.not_found(None))
    }

    /// Values of `name` if given, otherwise of the auto-detected column.
    ///
    /// # Errors
    ///
    /// See [`ParsedCsv::column`] and [`ParsedCsv::detect`].
    pub fn select(&self, name: Option<&str>) -> Result<(&str, &[f64])> {
        match name {
            Some(name) => self.named(name),
            None => self.detect(),
        }
    }

    fn named(&self, name: &str) -> Result<(&str, &[f64])> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| self.not_found(Some(name)))?;
        Ok((self.headers[idx].as_str(), self.column(name)?))
    }

    fn not_found(&self, requested: Option<&str>) -> CliError {
        CliError::ColumnNotFound {
            requested: requested.map(String::from),
            available: self.headers.clone(),
        }
    }
}

/// Normalize a column header name for matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Check if a header represents a date column.
fn is_date_column(header: &str) -> bool {
    let normalized = normalize_header(header);
    matches!(
        normalized.as_str(),
        "date" | "time" | "datetime" | "timestamp" | "dt"
    )
}

/// Parse a string value to f64, treating empty as NaN.
fn parse_value(value: &str) -> std::result::Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Ok(f64::NAN)
    } else {
        trimmed
            .parse::<f64>()
            .map_err(|_| format!("cannot parse '{trimmed}' as number"))
    }
}

/// Parse a CSV file, or stdin when `path` is `-`.
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be opened, or
/// `CliError::CsvParseError` if the CSV is malformed.
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<ParsedCsv> {
    let path = path.as_ref();
    if path == Path::new("-") {
        return parse_csv_from_reader(io::stdin().lock());
    }
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    parse_csv_from_reader(BufReader::new(file))
}

/// Rewrite blank data lines as an explicit empty field.
///
/// The csv reader skips blank lines outright, which would drop the row and
/// shift every later value against the date column. Lines inside a quoted
/// field are left alone, as are blank lines after the last row.
fn fill_blank_lines(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let mut text = String::with_capacity(raw.len() + 2);
    let mut in_quotes = false;
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 && !in_quotes && line.trim().is_empty() {
            text.push_str("\"\"");
        } else {
            text.push_str(line);
        }
        text.push('\n');
        if line.matches('"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
    }
    text
}

/// Parse CSV data from a reader.
///
/// # Errors
///
/// Returns `CliError::IoError` if the input cannot be read as UTF-8, or
/// `CliError::CsvParseError` if the header row is missing or a record is
/// malformed.
pub fn parse_csv_from_reader<R: Read>(mut reader: R) -> Result<ParsedCsv> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    let text = fill_blank_lines(&raw);

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(1),
        })?
        .iter()
        .map(String::from)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CliError::CsvParseError {
            message: "CSV file has no headers".to_string(),
            line: Some(1),
        });
    }

    let date_column_idx = headers.iter().position(|h| is_date_column(h));
    let mut columns: Vec<Option<Column>> = (0..headers.len())
        .map(|idx| (Some(idx) != date_column_idx).then(|| Column::Numeric(Vec::new())))
        .collect();
    let mut dates: Vec<String> = Vec::new();

    let mut row_count = 0;
    for (line_idx, result) in csv_reader.records().enumerate() {
        // +2 for the header row and 0-indexing
        let line = line_idx + 2;
        let record = result.map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(line),
        })?;

        if let Some(date_idx) = date_column_idx {
            dates.push(record.get(date_idx).unwrap_or("").to_string());
        }

        for (col_idx, column) in columns.iter_mut().enumerate() {
            let Some(Column::Numeric(values)) = column else {
                continue;
            };
            match parse_value(record.get(col_idx).unwrap_or("")) {
                Ok(value) => values.push(value),
                Err(message) => *column = Some(Column::Invalid { line, message }),
            }
        }

        row_count += 1;
    }

    debug!(
        columns = headers.len(),
        rows = row_count,
        dated = date_column_idx.is_some(),
        "parsed csv"
    );

    Ok(ParsedCsv {
        headers,
        dates: date_column_idx.map(|_| dates),
        row_count,
        columns,
    })
}
