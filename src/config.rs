use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use url::Url;

use crate::error::AppError;
use crate::models::{
    DEFAULT_DASHBOARD_TITLE, DEFAULT_LOG_PATH, DEFAULT_NAVIGATION_TIMEOUT_SECONDS,
    DEFAULT_SETTLE_DELAY_SECONDS, DEFAULT_SITE_DIR, DEFAULT_SOURCE_URL, DEFAULT_TIMEZONE,
};

/// Everything a scrape run needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    pub source_url: Url,
    pub log_path: PathBuf,
    pub timezone: Tz,
    pub navigation_timeout: Duration,
    /// Client-side rendering time granted to the headless browser. Plain HTTP
    /// fetches run no scripts and ignore it.
    pub settle_delay: Duration,
    /// Headless Chromium-family browser used to render `source_url`.
    pub browser_path: Option<PathBuf>,
    /// Pre-rendered page to read instead of fetching `source_url`.
    pub snapshot_path: Option<PathBuf>,
}

impl ScrapeConfig {
    pub fn new(source_url: &str, log_path: PathBuf, timezone: &str) -> Result<Self, AppError> {
        Ok(Self {
            source_url: parse_source_url(source_url)?,
            log_path,
            timezone: parse_timezone(timezone)?,
            navigation_timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECONDS),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_DELAY_SECONDS),
            browser_path: None,
            snapshot_path: None,
        })
    }

    #[must_use]
    pub fn with_timeouts(mut self, navigation_timeout: Duration, settle_delay: Duration) -> Self {
        self.navigation_timeout = navigation_timeout;
        self.settle_delay = settle_delay;
        self
    }

    #[must_use]
    pub fn with_browser(mut self, browser_path: Option<PathBuf>) -> Self {
        self.browser_path = browser_path;
        self
    }

    #[must_use]
    pub fn with_snapshot(mut self, snapshot_path: Option<PathBuf>) -> Self {
        self.snapshot_path = snapshot_path;
        self
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            source_url: Url::parse(DEFAULT_SOURCE_URL).expect("hardcoded source URL is valid"),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            timezone: chrono_tz::America::New_York,
            navigation_timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECONDS),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_DELAY_SECONDS),
            browser_path: None,
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub log_path: PathBuf,
    pub site_dir: PathBuf,
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            title: DEFAULT_DASHBOARD_TITLE.to_string(),
        }
    }
}

pub fn parse_source_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "source URL must be http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

pub fn parse_timezone(raw: &str) -> Result<Tz, AppError> {
    let name = raw.trim();
    let name = if name.is_empty() { DEFAULT_TIMEZONE } else { name };
    name.parse::<Tz>()
        .map_err(|error| AppError::Config(format!("invalid timezone '{name}': {error}")))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ScrapeConfig, parse_source_url, parse_timezone};

    #[test]
    fn rejects_non_http_sources() {
        let error = parse_source_url("file:///tmp/areas.html").expect_err("file URL rejected");
        assert_eq!(error.code(), "config_error");
    }

    #[test]
    fn blank_timezone_uses_default() {
        assert_eq!(
            parse_timezone("  ").expect("default timezone"),
            chrono_tz::America::New_York
        );
    }

    #[test]
    fn unknown_timezone_is_config_error() {
        let error = ScrapeConfig::new(
            "https://example.com/Areas.aspx",
            PathBuf::from("log.csv"),
            "Mars/Olympus",
        )
        .expect_err("unknown zone rejected");
        assert_eq!(error.code(), "config_error");
    }
}
