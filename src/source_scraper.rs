use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use occupancy_table::{RenderedDocument, read_html_document};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::AppError;

const USER_AGENT: &str = concat!("isportsman-occupancy/", env!("CARGO_PKG_VERSION"));
const BROWSER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Supplies a rendered snapshot of the target page.
pub trait PageSource {
    fn render(&self, url: &Url) -> Result<RenderedDocument, AppError>;
}

/// Fetches the served HTML over HTTP without running any scripts. The client
/// lives as long as the source and is released when the source is dropped.
#[derive(Debug)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(navigation_timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(navigation_timeout)
            .connect_timeout(navigation_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    fn fetch_html(&self, url: &Url) -> Result<String, AppError> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(AppError::SourceUnreachable(format!(
                "failed to fetch source page: status {}",
                status.as_u16()
            )));
        }

        let html = response.text()?;
        if html.trim().is_empty() {
            return Err(AppError::SourceUnreachable(
                "fetched source page is empty".to_string(),
            ));
        }
        Ok(html)
    }
}

impl PageSource for HttpPageSource {
    fn render(&self, url: &Url) -> Result<RenderedDocument, AppError> {
        let html = self.fetch_html(url)?;
        let document = read_html_document(&html);
        info!(
            url = %url,
            bytes = html.len(),
            tables = document.tables.len(),
            "fetched source page"
        );
        Ok(document)
    }
}

/// Renders the page in a headless Chromium-family browser and reads the dumped
/// DOM. The settle delay is handed to the browser as its virtual time budget,
/// so client-side scripts run before the DOM is captured. The browser process
/// is killed once the navigation timeout plus the settle delay has elapsed.
#[derive(Debug, Clone)]
pub struct BrowserPageSource {
    program: PathBuf,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserPageSource {
    #[must_use]
    pub fn new(program: PathBuf, navigation_timeout: Duration, settle_delay: Duration) -> Self {
        Self {
            program,
            navigation_timeout,
            settle_delay,
        }
    }

    fn command(&self, url: &Url) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg(format!("--timeout={}", self.navigation_timeout.as_millis()))
            .arg(format!(
                "--virtual-time-budget={}",
                self.settle_delay.as_millis()
            ))
            .arg("--dump-dom")
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        command
    }

    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus, AppError> {
        let limit = self.navigation_timeout + self.settle_delay;
        let deadline = Instant::now() + limit;
        loop {
            let polled = child.try_wait().map_err(|error| {
                AppError::SourceUnreachable(format!("failed to wait for browser: {error}"))
            })?;
            if let Some(status) = polled {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                if let Err(error) = child.kill() {
                    warn!(%error, "failed to kill browser after timeout");
                }
                if let Err(error) = child.wait() {
                    warn!(%error, "failed to reap browser after timeout");
                }
                return Err(AppError::SourceUnreachable(format!(
                    "browser did not finish rendering within {limit:?}"
                )));
            }
            thread::sleep(BROWSER_POLL_INTERVAL);
        }
    }

    fn dump_dom(&self, url: &Url) -> Result<String, AppError> {
        let mut child = self.command(url).spawn().map_err(|error| {
            AppError::SourceUnreachable(format!(
                "failed to launch browser '{}': {error}",
                self.program.display()
            ))
        })?;
        let Some(mut stdout) = child.stdout.take() else {
            return Err(AppError::Internal("browser stdout was not captured".to_string()));
        };
        let reader = thread::spawn(move || {
            let mut html = String::new();
            stdout.read_to_string(&mut html).map(|_| html)
        });

        debug!(
            program = %self.program.display(),
            settle = ?self.settle_delay,
            "rendering page in headless browser"
        );
        let status = self.wait_with_deadline(&mut child)?;
        if !status.success() {
            return Err(AppError::SourceUnreachable(format!(
                "browser exited with {status}"
            )));
        }

        let html = reader
            .join()
            .map_err(|_| AppError::Internal("browser output reader panicked".to_string()))?
            .map_err(|error| {
                AppError::SourceUnreachable(format!("failed to read browser output: {error}"))
            })?;
        if html.trim().is_empty() {
            return Err(AppError::SourceUnreachable(
                "browser produced an empty page".to_string(),
            ));
        }
        Ok(html)
    }
}

impl PageSource for BrowserPageSource {
    fn render(&self, url: &Url) -> Result<RenderedDocument, AppError> {
        let html = self.dump_dom(url)?;
        let document = read_html_document(&html);
        info!(
            url = %url,
            bytes = html.len(),
            tables = document.tables.len(),
            "rendered source page"
        );
        Ok(document)
    }
}

/// Reads a page already rendered by an external headless browser.
#[derive(Debug, Clone)]
pub struct SnapshotPageSource {
    path: PathBuf,
}

impl SnapshotPageSource {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PageSource for SnapshotPageSource {
    fn render(&self, url: &Url) -> Result<RenderedDocument, AppError> {
        let html = std::fs::read_to_string(&self.path).map_err(|error| {
            AppError::SourceUnreachable(format!(
                "failed to read page snapshot '{}': {error}",
                self.path.display()
            ))
        })?;

        let document = read_html_document(&html);
        info!(
            url = %url,
            snapshot = %self.path.display(),
            tables = document.tables.len(),
            "loaded page snapshot"
        );
        Ok(document)
    }
}
