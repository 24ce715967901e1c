use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use isportsman_occupancy::config::{ReportConfig, ScrapeConfig};
use isportsman_occupancy::error::AppError;
use isportsman_occupancy::models::{
    DEFAULT_DASHBOARD_TITLE, DEFAULT_LOG_PATH, DEFAULT_NAVIGATION_TIMEOUT_SECONDS,
    DEFAULT_SETTLE_DELAY_SECONDS, DEFAULT_SITE_DIR, DEFAULT_SOURCE_URL, DEFAULT_TIMEZONE,
};
use isportsman_occupancy::{report, scheduled_scrape};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "occupancy",
    version,
    about = "Record facility occupancy snapshots and build the dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the areas page once and append the observations to the log.
    Scrape(ScrapeArgs),
    /// Rebuild the static dashboard from the whole log.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
struct ScrapeArgs {
    /// Page listing area occupancy.
    #[arg(long, env = "SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    source_url: String,

    /// CSV log that observations are appended to.
    #[arg(long, env = "OCCUPANCY_LOG", default_value = DEFAULT_LOG_PATH)]
    log: PathBuf,

    /// IANA timezone for capture timestamps.
    #[arg(long, env = "OCCUPANCY_TZ", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Maximum seconds to wait for the page to load.
    #[arg(long, default_value_t = DEFAULT_NAVIGATION_TIMEOUT_SECONDS)]
    timeout_secs: u64,

    /// Seconds of client-side rendering the browser allows before reading the page.
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY_SECONDS)]
    settle_secs: u64,

    /// Headless Chromium-family browser that renders the page. Without it the
    /// page is fetched over plain HTTP.
    #[arg(long, env = "OCCUPANCY_BROWSER")]
    browser: Option<PathBuf>,

    /// Read a pre-rendered HTML snapshot instead of fetching the page.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// CSV log to summarize.
    #[arg(long, env = "OCCUPANCY_LOG", default_value = DEFAULT_LOG_PATH)]
    log: PathBuf,

    /// Output directory for the static site.
    #[arg(long, env = "SITE_DIR", default_value = DEFAULT_SITE_DIR)]
    site_dir: PathBuf,

    /// Dashboard page title.
    #[arg(long, default_value = DEFAULT_DASHBOARD_TITLE)]
    title: String,
}

fn scrape_config(args: &ScrapeArgs) -> Result<ScrapeConfig, AppError> {
    Ok(
        ScrapeConfig::new(&args.source_url, args.log.clone(), &args.timezone)?
            .with_timeouts(
                Duration::from_secs(args.timeout_secs),
                Duration::from_secs(args.settle_secs),
            )
            .with_browser(args.browser.clone())
            .with_snapshot(args.snapshot.clone()),
    )
}

fn run_scrape(args: &ScrapeArgs) -> Result<()> {
    let config = scrape_config(args)?;
    let summary = scheduled_scrape(&config)
        .with_context(|| format!("scrape of '{}' failed", config.source_url))?;
    eprintln!(
        "appended {} observation(s) at {} ({} row(s) skipped)",
        summary.appended, summary.captured_at, summary.skipped
    );
    Ok(())
}

fn run_report(args: &ReportArgs) -> Result<()> {
    let config = ReportConfig {
        log_path: args.log.clone(),
        site_dir: args.site_dir.clone(),
        title: args.title.clone(),
    };
    let summary = report::build_site(&config)
        .with_context(|| format!("failed to build dashboard from '{}'", config.log_path.display()))?;
    eprintln!(
        "dashboard written to {} ({} sample(s), {} area(s))",
        config.site_dir.display(),
        summary.samples,
        summary.areas_tracked
    );
    Ok(())
}

fn exit_code(error: &anyhow::Error) -> ExitCode {
    let code = error
        .downcast_ref::<AppError>()
        .map_or(1, AppError::exit_code);
    ExitCode::from(code)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("isportsman_occupancy=info,occupancy_table=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Scrape(args) => run_scrape(args),
        Commands::Report(args) => run_report(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            exit_code(&error)
        }
    }
}
