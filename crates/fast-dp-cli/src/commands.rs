//! Command dispatch: read the input column, run one engine, write CSV.

use fast_dp::percentile::{percentile_of_sorted, percentiles_of_sorted};
use fast_dp::DataProcessor;
use tracing::{debug, info};

use crate::args::{parse_ranks, Args, Command};
use crate::csv_parser::parse_csv;
use crate::csv_writer::{write_column, write_percentiles, write_stats, OutputDest};
use crate::error::Result;

/// Run the command described by `args`.
///
/// # Errors
///
/// Returns any I/O, CSV, argument or engine error; nothing is written to the
/// destination when the engine rejects the input.
pub fn run(args: &Args) -> Result<()> {
    let processor = DataProcessor::new();
    let parsed = parse_csv(args.input_path())?;
    let (column, values) = parsed.select(args.column())?;
    let dest = OutputDest::from_path(args.output_path());
    info!(
        input = args.input_path(),
        column,
        rows = values.len(),
        "read input column"
    );

    match &args.command {
        Command::Stats { .. } => {
            let stats = processor.stats(values)?;
            write_stats(&stats, &dest)
        }
        Command::Sort { .. } => {
            let sorted = processor.sorted_copy(values);
            write_column(&sorted, column, None, &dest)
        }
        Command::Percentiles { ranks, .. } => {
            let sorted = processor.sorted_copy(values);
            let rows = match ranks {
                Some(ranks) => parse_ranks(ranks)?
                    .into_iter()
                    .map(|rank| -> Result<(f64, f64)> {
                        Ok((rank, percentile_of_sorted(&sorted, rank)?))
                    })
                    .collect::<Result<Vec<_>>>()?,
                None => percentiles_of_sorted(&sorted)?
                    .iter()
                    .map(|(rank, value)| (f64::from(rank), value))
                    .collect(),
            };
            write_percentiles(&rows, &dest)
        }
        Command::RollingMean { width, .. } => {
            let width = fast_dp::window_from_i64(*width)?;
            let means = processor.rolling_mean(values, width)?;
            let header = format!("{column}_mean_{width}");
            write_column(&means, &header, parsed.dates.as_deref(), &dest)
        }
        Command::Transform { factor, .. } => {
            let scaled = processor.transform(values, *factor);
            write_column(&scaled, column, parsed.dates.as_deref(), &dest)
        }
        Command::Filter { threshold, .. } => {
            let kept = processor.filter(values, *threshold);
            debug!(kept = kept.len(), dropped = values.len() - kept.len(), "filtered");
            write_column(&kept, column, None, &dest)
        }
    }
}
