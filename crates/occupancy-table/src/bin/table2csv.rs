use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDateTime, Timelike};
use clap::{Args, Parser, Subcommand};
use occupancy_table::{
    ExtractError, ExtractionReport, TIMESTAMP_FORMAT, extract_observations, read_html_file,
    write_records_csv,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "table2csv",
    version,
    about = "Extract the area occupancy table from a saved HTML page into CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract occupancy rows and write them as log-formatted CSV.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input HTML path (a rendered page snapshot).
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: PathBuf,

    /// Capture timestamp as YYYY-MM-DD HH:MM:SS; defaults to local now.
    #[arg(long)]
    timestamp: Option<String>,

    /// Print every skipped row and parse warning.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_timestamp(value: Option<&str>) -> Result<NaiveDateTime> {
    match value {
        Some(raw) => NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
            .map_err(|error| anyhow!("invalid --timestamp '{raw}': {error}")),
        None => Local::now()
            .naive_local()
            .with_nanosecond(0)
            .ok_or_else(|| anyhow!("failed to truncate local time to seconds")),
    }
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    eprintln!(
        "table {} of {}: {} row(s) kept, {} skipped",
        report.table_index + 1,
        report.candidate_count,
        report.row_count,
        report.skipped_count
    );
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} table={}: {warning}",
                warning.code(),
                warning.table_index()
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let captured_at = parse_timestamp(args.timestamp.as_deref())?;
    let document = read_html_file(&args.input)?;
    let (records, report) = extract_observations(&document, captured_at)?;
    write_records_csv(&args.output, &records)?;
    Ok(report)
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("occupancy_table=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args)
            .with_context(|| format!("failed to extract occupancy from '{}'", args.input.display()))
        {
            Ok(report) => {
                log_report(&report, args.verbose);
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                let structure_changed = error
                    .downcast_ref::<ExtractError>()
                    .is_some_and(ExtractError::is_structure_changed);
                if structure_changed {
                    ExitCode::from(2)
                } else {
                    ExitCode::from(1)
                }
            }
        },
    }
}
