use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use occupancy_table::{LOG_HEADERS, TIMESTAMP_FORMAT, format_occupancy, parse_occupancy};
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::dashboard;
use crate::error::AppError;
use crate::models::{
    AreaAverage, DashboardSummary, HourlyAverage, LEAST_USED_AREA_LIMIT, LogEntry,
};

struct LogColumns {
    timestamp: Option<usize>,
    area: Option<usize>,
    occupancy: Option<usize>,
    status: Option<usize>,
}

impl LogColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);
        Self {
            timestamp: find(LOG_HEADERS[0]),
            area: find(LOG_HEADERS[1]),
            occupancy: find(LOG_HEADERS[2]),
            status: find(LOG_HEADERS[3]),
        }
    }
}

fn field(record: &StringRecord, index: Option<usize>) -> &str {
    index
        .and_then(|index| record.get(index))
        .map_or("", str::trim)
}

fn coerce_entry(record: &StringRecord, columns: &LogColumns) -> Option<LogEntry> {
    let captured_at =
        NaiveDateTime::parse_from_str(field(record, columns.timestamp), TIMESTAMP_FORMAT).ok()?;
    let area = field(record, columns.area);
    if area.is_empty() {
        return None;
    }

    Some(LogEntry {
        captured_at,
        area: area.to_string(),
        occupancy: parse_occupancy(field(record, columns.occupancy)),
        status: field(record, columns.status).to_string(),
    })
}

fn read_error(error: csv::Error) -> AppError {
    AppError::Report(format!("failed to read log: {error}"))
}

/// Reads a log, dropping rows that are not UTF-8 or whose timestamp or area
/// cannot be used.
pub fn parse_log<R: Read>(reader: R) -> Result<Vec<LogEntry>, AppError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.byte_headers().map_err(read_error)?.clone();
    let columns = LogColumns::from_headers(&StringRecord::from_byte_record_lossy(headers));

    let mut entries = Vec::new();
    let mut dropped = 0_usize;
    for record in reader.byte_records() {
        let record = record.map_err(read_error)?;
        let decoded = StringRecord::from_byte_record(record).ok();
        match decoded.and_then(|record| coerce_entry(&record, &columns)) {
            Some(entry) => entries.push(entry),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, "dropped unusable log rows");
    }
    Ok(entries)
}

pub fn load_log_entries(path: &Path) -> Result<Vec<LogEntry>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = fs::File::open(path).map_err(|error| {
        AppError::Report(format!("failed to open log '{}': {error}", path.display()))
    })?;
    parse_log(file)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Some(values.iter().sum::<f64>() / count)
}

fn grouped_means<K: Ord + Clone>(
    entries: &[LogEntry],
    key: impl Fn(&LogEntry) -> K,
) -> BTreeMap<K, Option<f64>> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for entry in entries {
        let values = groups.entry(key(entry)).or_default();
        if let Some(value) = entry.occupancy {
            values.push(value);
        }
    }
    groups
        .into_iter()
        .map(|(key, values)| (key, mean(&values)))
        .collect()
}

fn ascending_missing_last(left: Option<f64>, right: Option<f64>) -> std::cmp::Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

#[must_use]
pub fn summarize(entries: &[LogEntry]) -> DashboardSummary {
    let latest_timestamp = entries.iter().map(|entry| entry.captured_at).max();
    let areas_tracked = entries
        .iter()
        .map(|entry| entry.area.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let mut average_by_area = grouped_means(entries, |entry| entry.area.clone())
        .into_iter()
        .map(|(area, average_occupancy)| AreaAverage {
            area,
            average_occupancy,
        })
        .collect::<Vec<_>>();
    average_by_area.sort_by(|left, right| {
        ascending_missing_last(left.average_occupancy, right.average_occupancy)
    });

    let hourly_by_area = grouped_means(entries, |entry| {
        (entry.area.clone(), entry.captured_at.format("%H:%M").to_string())
    })
    .into_iter()
    .map(|((area, hour), average_occupancy)| HourlyAverage {
        area,
        hour,
        average_occupancy,
    })
    .collect();

    let mut latest_snapshot = latest_timestamp
        .map(|latest| {
            entries
                .iter()
                .filter(|entry| entry.captured_at == latest)
                .cloned()
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    latest_snapshot.sort_by(|left, right| left.area.cmp(&right.area));

    let least_used_areas = average_by_area
        .iter()
        .take(LEAST_USED_AREA_LIMIT)
        .map(|average| average.area.clone())
        .collect();

    DashboardSummary {
        latest_timestamp,
        areas_tracked,
        samples: entries.len(),
        average_by_area,
        hourly_by_area,
        latest_snapshot,
        least_used_areas,
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map(format_occupancy).unwrap_or_default()
}

fn write_error(error: impl std::fmt::Display) -> AppError {
    AppError::Report(format!("failed to write report output: {error}"))
}

fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), AppError> {
    fs::write(path, contents)
        .map_err(|error| AppError::Report(format!("failed to write '{}': {error}", path.display())))
}

pub fn averages_csv(summary: &DashboardSummary) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer
        .write_record(["Area", "AvgOccupancy"])
        .map_err(write_error)?;
    for average in &summary.average_by_area {
        writer
            .write_record([
                average.area.clone(),
                optional_number(average.average_occupancy),
            ])
            .map_err(write_error)?;
    }
    finish_csv(writer)
}

pub fn latest_snapshot_csv(summary: &DashboardSummary) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(LOG_HEADERS).map_err(write_error)?;
    for entry in &summary.latest_snapshot {
        writer
            .write_record([
                entry.captured_at.format(TIMESTAMP_FORMAT).to_string(),
                entry.area.clone(),
                optional_number(entry.occupancy),
                entry.status.clone(),
            ])
            .map_err(write_error)?;
    }
    finish_csv(writer)
}

fn finish_csv(mut writer: csv::Writer<Vec<u8>>) -> Result<String, AppError> {
    writer.flush().map_err(write_error)?;
    let bytes = writer
        .into_inner()
        .map_err(|error| write_error(error.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|error| AppError::Report(format!("invalid utf-8 csv output: {error}")))
}

/// Rebuilds the static site from the full log.
pub fn build_site(config: &ReportConfig) -> Result<DashboardSummary, AppError> {
    let entries = load_log_entries(&config.log_path)?;
    let summary = summarize(&entries);
    fs::create_dir_all(&config.site_dir).map_err(|error| {
        AppError::Report(format!(
            "failed to create site directory '{}': {error}",
            config.site_dir.display()
        ))
    })?;

    let index = config.site_dir.join("index.html");
    if summary.is_empty() {
        write_artifact(&index, dashboard::render_empty(&config.title))?;
        info!(site = %config.site_dir.display(), "log is empty; wrote placeholder dashboard");
        return Ok(summary);
    }

    let source_label = config.log_path.file_stem().map_or_else(
        || config.log_path.display().to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    );

    write_artifact(&config.site_dir.join("avg_by_area.csv"), averages_csv(&summary)?)?;
    write_artifact(
        &config.site_dir.join("latest_snapshot.csv"),
        latest_snapshot_csv(&summary)?,
    )?;
    write_artifact(
        &config.site_dir.join("summary.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;
    write_artifact(
        &index,
        dashboard::render_dashboard(&summary, &config.title, &source_label),
    )?;

    info!(
        site = %config.site_dir.display(),
        samples = summary.samples,
        areas = summary.areas_tracked,
        "dashboard built"
    );
    Ok(summary)
}
