pub mod config;
pub mod dashboard;
pub mod error;
pub mod log_sink;
pub mod models;
pub mod report;
pub mod scrape_pipeline;
pub mod source_scraper;

use chrono::Utc;

use crate::config::ScrapeConfig;
use crate::error::AppError;
use crate::log_sink::CsvLogSink;
use crate::models::ScrapeSummary;
use crate::source_scraper::{BrowserPageSource, HttpPageSource, PageSource, SnapshotPageSource};

fn page_source(config: &ScrapeConfig) -> Result<Box<dyn PageSource>, AppError> {
    if let Some(path) = &config.snapshot_path {
        return Ok(Box::new(SnapshotPageSource::new(path.clone())));
    }
    if let Some(program) = &config.browser_path {
        return Ok(Box::new(BrowserPageSource::new(
            program.clone(),
            config.navigation_timeout,
            config.settle_delay,
        )));
    }
    Ok(Box::new(HttpPageSource::new(config.navigation_timeout)?))
}

/// Scheduled entry point: builds the configured page source and log sink,
/// then runs one scrape.
///
/// A snapshot takes precedence over a browser, and a browser over a plain
/// HTTP fetch.
pub fn scheduled_scrape(config: &ScrapeConfig) -> Result<ScrapeSummary, AppError> {
    let source = page_source(config)?;
    let mut sink = CsvLogSink::new(config.log_path.clone());

    scrape_pipeline::run_scrape(config, source.as_ref(), &mut sink, Utc::now())
}
