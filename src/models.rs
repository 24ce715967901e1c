use chrono::NaiveDateTime;
use serde::Serialize;

pub const DEFAULT_SOURCE_URL: &str = "https://westpoint.isportsman.net/Areas.aspx";
pub const DEFAULT_LOG_PATH: &str = "OccupancyLog.csv";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_NAVIGATION_TIMEOUT_SECONDS: u64 = 90;
pub const DEFAULT_SETTLE_DELAY_SECONDS: u64 = 3;
pub const DEFAULT_SITE_DIR: &str = "site";
pub const DEFAULT_DASHBOARD_TITLE: &str = "iSportsman Occupancy Dashboard";
pub const LEAST_USED_AREA_LIMIT: usize = 8;

/// Outcome of one successful scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub captured_at: NaiveDateTime,
    pub appended: usize,
    pub skipped: usize,
    pub table_index: usize,
}

/// A log row after the downstream coercions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LogEntry {
    pub captured_at: NaiveDateTime,
    pub area: String,
    pub occupancy: Option<f64>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AreaAverage {
    pub area: String,
    pub average_occupancy: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HourlyAverage {
    pub area: String,
    pub hour: String,
    pub average_occupancy: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub latest_timestamp: Option<NaiveDateTime>,
    pub areas_tracked: usize,
    pub samples: usize,
    pub average_by_area: Vec<AreaAverage>,
    pub hourly_by_area: Vec<HourlyAverage>,
    pub latest_snapshot: Vec<LogEntry>,
    pub least_used_areas: Vec<String>,
}

impl DashboardSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }
}
