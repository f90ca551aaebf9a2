//! CSV output module for writing results.
//!
//! NaN values are written as empty cells, which the parser reads back as
//! NaN. Row-aligned results (rolling mean, transform) carry the input's date
//! column when it has one.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use fast_dp::stats::Statistics;

use crate::error::{CliError, Result};

/// Output destination: either stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputDest {
    /// Destination for an optional `-o` path.
    #[must_use]
    pub fn from_path(path: Option<&str>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_string()))
    }

    /// Create a writer for this output destination.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IoError` if the file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| CliError::IoError {
                    source: e,
                    path: Some(path.clone()),
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Format one cell; NaN becomes an empty cell.
fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Write a single column of values.
///
/// When `dates` is given, a `date` column is written first; rows beyond the
/// end of `dates` get an empty date cell.
///
/// # Errors
///
/// Returns `CliError::IoError` if writing fails.
pub fn write_column(
    values: &[f64],
    header: &str,
    dates: Option<&[String]>,
    dest: &OutputDest,
) -> Result<()> {
    let mut writer = dest.writer()?;

    if dates.is_some() {
        writeln!(writer, "date,{header}")?;
    } else {
        writeln!(writer, "{header}")?;
    }

    for (i, &value) in values.iter().enumerate() {
        if let Some(dates) = dates {
            write!(writer, "{},", dates.get(i).map_or("", String::as_str))?;
        }
        writeln!(writer, "{}", cell(value))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write mean, median and standard deviation as one row.
///
/// # Errors
///
/// Returns `CliError::IoError` if writing fails.
pub fn write_stats(stats: &Statistics<f64>, dest: &OutputDest) -> Result<()> {
    let mut writer = dest.writer()?;
    writeln!(writer, "mean,median,std_dev")?;
    writeln!(
        writer,
        "{},{},{}",
        cell(stats.mean),
        cell(stats.median),
        cell(stats.std_dev)
    )?;
    writer.flush()?;
    Ok(())
}

/// Write `(rank, value)` pairs, one per row.
///
/// # Errors
///
/// Returns `CliError::IoError` if writing fails.
pub fn write_percentiles(rows: &[(f64, f64)], dest: &OutputDest) -> Result<()> {
    let mut writer = dest.writer()?;
    writeln!(writer, "rank,value")?;
    for &(rank, value) in rows {
        writeln!(writer, "{rank},{}", cell(value))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a single column to a file path.
///
/// # Errors
///
/// Returns `CliError::IoError` if writing fails.
pub fn write_to_file<P: AsRef<Path>>(
    values: &[f64],
    header: &str,
    dates: Option<&[String]>,
    path: P,
) -> Result<()> {
    let dest = OutputDest::File(path.as_ref().display().to_string());
    write_column(values, header, dates, &dest)
}
