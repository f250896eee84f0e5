//! Browser automation using chromiumoxide.

use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::{StatsError, StatsResult};

/// Interval between checks for the results table
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Bound on reading the HTML of a loaded page
const CONTENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Headless Chrome session used for all page fetches of one run
pub struct Browser {
    browser: ChromeBrowser,
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a new headless browser instance
    pub async fn launch(config: &ScraperConfig) -> StatsResult<Self> {
        let chrome_path = config
            .chrome_path
            .clone()
            .unwrap_or_else(|| default_chrome_path().to_string());

        let browser_config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .no_sandbox()
            .disable_default_args()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-plugins")
            .arg("--disable-default-apps")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--disable-background-timer-throttling")
            .arg("--disable-renderer-backgrounding")
            .arg("--no-first-run")
            .arg("--mute-audio")
            .window_size(1920, 1080)
            .build()
            .map_err(|e| StatsError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = ChromeBrowser::launch(browser_config)
            .await
            .map_err(|e| StatsError::Browser(format!("Failed to launch browser: {}", e)))?;

        // Handler must keep running for the browser to respond
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {}", e);
                }
            }
        });

        Ok(Self { browser, handle })
    }

    /// Load `url` and return its HTML once a `<table>` is present.
    ///
    /// Navigation and the table wait share one `timeout` deadline. The tab is
    /// closed on every path, including timeouts.
    pub async fn fetch_page(&self, url: &str, timeout: Duration) -> StatsResult<String> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| StatsError::Browser(format!("Failed to open page: {}", e)))?;

        let loaded = Self::load(&page, url, timeout).await;
        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }
        loaded
    }

    async fn load(page: &Page, url: &str, timeout: Duration) -> StatsResult<String> {
        let deadline = Instant::now() + timeout;
        within(deadline, "Navigation", page.goto(url)).await?;
        Self::wait_for_table(page, deadline, timeout).await?;
        within(Instant::now() + CONTENT_TIMEOUT, "Reading page content", page.content()).await
    }

    async fn wait_for_table(page: &Page, deadline: Instant, timeout: Duration) -> StatsResult<()> {
        loop {
            if within(deadline, "Table lookup", page.find_element("table")).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(StatsError::Browser(format!(
                    "No results table after {:?}",
                    timeout
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Close the browser
    pub async fn close(mut self) {
        let _ = self.browser.close().await;
        self.handle.abort();
    }
}

/// Run one browser operation, failing once `deadline` passes
async fn within<T, E: Display>(
    deadline: Instant,
    what: &str,
    operation: impl Future<Output = Result<T, E>>,
) -> StatsResult<T> {
    match tokio::time::timeout_at(deadline, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StatsError::Browser(format!("{} failed: {}", what, e))),
        Err(_) => Err(StatsError::Browser(format!("{} timed out", what))),
    }
}

fn default_chrome_path() -> &'static str {
    if cfg!(target_os = "macos") {
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"
    } else if cfg!(target_os = "windows") {
        "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe"
    } else {
        "/usr/bin/google-chrome"
    }
}
