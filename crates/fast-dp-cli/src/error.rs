//! CLI error types for file I/O, CSV parsing, argument and engine errors.
//!
//! Every message says what went wrong and, where it can, how to fix it.

use std::fmt;
use std::io;

/// CLI error type encompassing all possible error conditions.
#[derive(Debug)]
pub enum CliError {
    /// An I/O error occurred while reading or writing files.
    IoError {
        /// The underlying I/O error.
        source: io::Error,
        /// Path that caused the error, if known.
        path: Option<String>,
    },
    /// An error occurred while parsing CSV data.
    CsvParseError {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred, if known.
        line: Option<usize>,
    },
    /// No usable numeric column was found.
    ColumnNotFound {
        /// The column that was asked for with `--column`, if any.
        requested: Option<String>,
        /// Headers present in the file.
        available: Vec<String>,
    },
    /// The engine rejected the data or a parameter.
    EngineError {
        /// The underlying fast-dp error.
        source: fast_dp::Error,
    },
    /// An invalid argument was provided.
    InvalidArgument {
        /// Name of the invalid argument.
        argument: String,
        /// Description of why it's invalid.
        reason: String,
        /// Suggestion for valid values.
        suggestion: Option<String>,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError { source, path } => {
                if let Some(p) = path {
                    write!(f, "I/O error with file '{p}': {source}. ")?;
                    write!(f, "Check that the path exists and is accessible.")
                } else {
                    write!(f, "I/O error: {source}")
                }
            }
            Self::CsvParseError { message, line } => {
                if let Some(l) = line {
                    write!(f, "CSV parse error on line {l}: {message}. ")?;
                } else {
                    write!(f, "CSV parse error: {message}. ")?;
                }
                write!(f, "Ensure the selected column holds only numbers or empty cells.")
            }
            Self::ColumnNotFound {
                requested,
                available,
            } => {
                match requested {
                    Some(name) => write!(f, "column '{name}' not found or not numeric")?,
                    None => write!(f, "no numeric column found")?,
                }
                write!(f, ". Available columns: {}", available.join(", "))?;
                write!(f, ". Use -c/--column to pick one.")
            }
            Self::EngineError { source } => {
                write!(f, "Computation error: {source}")
            }
            Self::InvalidArgument {
                argument,
                reason,
                suggestion,
            } => {
                write!(f, "Invalid argument '{argument}': {reason}")?;
                if let Some(s) = suggestion {
                    write!(f, ". {s}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::EngineError { source } => Some(source),
            Self::CsvParseError { .. } | Self::ColumnNotFound { .. } | Self::InvalidArgument { .. } => {
                None
            }
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            source: err,
            path: None,
        }
    }
}

impl From<fast_dp::Error> for CliError {
    fn from(err: fast_dp::Error) -> Self {
        Self::EngineError { source: err }
    }
}

impl From<csv::Error> for CliError {
    #[allow(clippy::cast_possible_truncation)]
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line() as usize);
        Self::CsvParseError {
            message: err.to_string(),
            line,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
