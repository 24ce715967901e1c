use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use occupancy_table::{ExtractionReport, extract_observations};
use tracing::{error, info, warn};

use crate::config::ScrapeConfig;
use crate::error::AppError;
use crate::log_sink::LogSink;
use crate::models::ScrapeSummary;
use crate::source_scraper::PageSource;

/// Wall-clock time in `timezone`, truncated to whole seconds.
pub fn capture_timestamp(now: DateTime<Utc>, timezone: Tz) -> NaiveDateTime {
    now.with_timezone(&timezone).naive_local().trunc_subsecs(0)
}

fn log_extraction(report: &ExtractionReport) {
    info!(
        candidates = report.candidate_count,
        table = report.table_index,
        rows = report.row_count,
        skipped = report.skipped_count,
        "occupancy table extracted"
    );
    for warning in &report.warnings {
        warn!(
            code = ?warning.code(),
            table = warning.table_index(),
            "{warning}"
        );
    }
}

/// One scrape run: timestamp, render, extract, then a single append.
///
/// Nothing is appended unless extraction produced at least one record.
pub fn run_scrape(
    config: &ScrapeConfig,
    source: &dyn PageSource,
    sink: &mut dyn LogSink,
    now: DateTime<Utc>,
) -> Result<ScrapeSummary, AppError> {
    let captured_at = capture_timestamp(now, config.timezone);

    let document = source.render(&config.source_url)?;
    let (records, report) = extract_observations(&document, captured_at).map_err(|error| {
        error!(url = %config.source_url, %error, "could not locate the occupancy table");
        AppError::from(error)
    })?;
    log_extraction(&report);

    let appended = sink.append_batch(&records)?;
    Ok(ScrapeSummary {
        captured_at,
        appended,
        skipped: report.skipped_count,
        table_index: report.table_index,
    })
}
