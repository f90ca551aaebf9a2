//! CLI argument parsing module.
//!
//! The CLI follows the pattern: `fast-dp <command> <input.csv> [params] [-o output.csv]`
//!
//! # Examples
//!
//! ```bash
//! # Mean, median and standard deviation of the auto-detected column
//! fast-dp stats input.csv
//!
//! # The 21 standard percentiles, or a chosen set
//! fast-dp percentiles input.csv
//! fast-dp percentiles input.csv --ranks 25,50,75
//!
//! # Moving average of width 20 on the `close` column, written to a file
//! fast-dp rolling-mean input.csv 20 -c close -o output.csv
//!
//! # Read from stdin
//! cat input.csv | fast-dp sort -
//! ```

use clap::{ArgAction, Parser, Subcommand};

use crate::error::{CliError, Result};

/// fast-dp: bulk statistics over CSV columns
#[derive(Parser, Debug)]
#[command(name = "fast-dp")]
#[command(author, version, about = "Bulk statistics, sorting and windowed means over CSV data")]
#[command(long_about = "fast-dp reads one numeric column from a CSV file (or stdin when \
    the input is '-') and writes the result as CSV to a file or stdout. The column is \
    auto-detected unless -c/--column is given.")]
pub struct Args {
    /// The command to run
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Mean, median and population standard deviation
    Stats {
        /// Input CSV file ('-' for stdin)
        input: String,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Column to read (auto-detected if not specified)
        #[arg(short, long)]
        column: Option<String>,
    },

    /// Ascending sort with NaN last
    Sort {
        /// Input CSV file ('-' for stdin)
        input: String,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Column to read
        #[arg(short, long)]
        column: Option<String>,
    },

    /// Percentiles with linear interpolation
    Percentiles {
        /// Input CSV file ('-' for stdin)
        input: String,

        /// Comma-separated ranks in [0, 100] (defaults to 0,5,...,100)
        #[arg(short, long)]
        ranks: Option<String>,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Column to read
        #[arg(short, long)]
        column: Option<String>,
    },

    /// Left-clamped moving average
    RollingMean {
        /// Input CSV file ('-' for stdin)
        input: String,

        /// Window width
        #[arg(allow_negative_numbers = true)]
        width: i64,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Column to read
        #[arg(short, long)]
        column: Option<String>,
    },

    /// Multiply every value by a factor
    Transform {
        /// Input CSV file ('-' for stdin)
        input: String,

        /// Scale factor
        #[arg(allow_negative_numbers = true)]
        factor: f64,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Column to read
        #[arg(short, long)]
        column: Option<String>,
    },

    /// Keep values strictly greater than a threshold
    Filter {
        /// Input CSV file ('-' for stdin)
        input: String,

        /// Threshold (exclusive)
        #[arg(allow_negative_numbers = true)]
        threshold: f64,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Column to read
        #[arg(short, long)]
        column: Option<String>,
    },
}

impl Args {
    /// Get the input file path for the command.
    #[must_use]
    pub fn input_path(&self) -> &str {
        match &self.command {
            Command::Stats { input, .. }
            | Command::Sort { input, .. }
            | Command::Percentiles { input, .. }
            | Command::RollingMean { input, .. }
            | Command::Transform { input, .. }
            | Command::Filter { input, .. } => input,
        }
    }

    /// Get the output file path, if one was given.
    #[must_use]
    pub fn output_path(&self) -> Option<&str> {
        match &self.command {
            Command::Stats { output, .. }
            | Command::Sort { output, .. }
            | Command::Percentiles { output, .. }
            | Command::RollingMean { output, .. }
            | Command::Transform { output, .. }
            | Command::Filter { output, .. } => output.as_deref(),
        }
    }

    /// Get the explicitly selected column, if one was given.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match &self.command {
            Command::Stats { column, .. }
            | Command::Sort { column, .. }
            | Command::Percentiles { column, .. }
            | Command::RollingMean { column, .. }
            | Command::Transform { column, .. }
            | Command::Filter { column, .. } => column.as_deref(),
        }
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Parse a comma-separated list of percentile ranks.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if a rank is not a number, lies
/// outside `[0, 100]`, or the list is empty.
pub fn parse_ranks(params: &str) -> Result<Vec<f64>> {
    let mut ranks = Vec::new();
    for part in params.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let rank = part.parse::<f64>().map_err(|_| CliError::InvalidArgument {
            argument: "ranks".to_string(),
            reason: format!("cannot parse '{part}' as number"),
            suggestion: Some("Use values like 25,50,75".to_string()),
        })?;
        if !(0.0..=100.0).contains(&rank) {
            return Err(CliError::InvalidArgument {
                argument: "ranks".to_string(),
                reason: format!("rank {rank} is outside [0, 100]"),
                suggestion: Some("Use values between 0 and 100".to_string()),
            });
        }
        ranks.push(rank);
    }

    if ranks.is_empty() {
        return Err(CliError::InvalidArgument {
            argument: "ranks".to_string(),
            reason: "no ranks given".to_string(),
            suggestion: Some("Use values like 25,50,75".to_string()),
        });
    }

    Ok(ranks)
}
