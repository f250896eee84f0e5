//! Page-fetch seam between the sync pipeline and the browser.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::debug;

use super::browser::Browser;
use super::parsers::table;
use super::rate_limiter::RateLimiter;
use super::stats_url;
use crate::config::AppConfig;
use crate::error::{StatsError, StatsResult};
use crate::retry::{with_backoff, RetryPolicy};
use crate::types::Category;

/// One page of one category's result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub category: Category,
    /// 1-based page index
    pub page: u32,
    /// Earliest innings date to include
    pub since: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedPage {
    Content(String),
    /// Page index is past the end of the result set
    EndOfData,
}

/// Source of raw result pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page. Exhausted retries surface as `StatsError::FetchFailure`.
    async fn fetch_page(&self, request: &PageRequest) -> StatsResult<FetchedPage>;
}

/// Decide whether fetched HTML still holds results for `page`
pub fn classify(html: String, page: u32) -> FetchedPage {
    if let Some((_, total)) = table::page_count(&html) {
        if page > total {
            return FetchedPage::EndOfData;
        }
    }
    if table::data_rows(&html).is_empty() {
        return FetchedPage::EndOfData;
    }
    FetchedPage::Content(html)
}

/// Production fetcher backed by headless Chrome
pub struct BrowserFetcher {
    browser: Browser,
    limiter: RateLimiter,
    policy: RetryPolicy,
    base_url: String,
    page_timeout: Duration,
}

impl BrowserFetcher {
    pub async fn launch(config: &AppConfig) -> StatsResult<Self> {
        let policy = RetryPolicy::from(&config.retry);
        let browser = with_backoff(&policy, "browser launch", || Browser::launch(&config.scraper))
            .await
            .map_err(|(e, _)| e)?;

        Ok(Self {
            browser,
            limiter: RateLimiter::from_config(&config.scraper),
            policy,
            base_url: config.scraper.base_url.clone(),
            page_timeout: Duration::from_secs(config.scraper.page_timeout_secs),
        })
    }

    pub async fn close(self) {
        self.browser.close().await;
    }

    async fn fetch_once(&self, url: &str) -> StatsResult<String> {
        self.limiter.acquire().await;
        self.browser.fetch_page(url, self.page_timeout).await
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> StatsResult<FetchedPage> {
        let url = stats_url(&self.base_url, request.category, request.since, request.page);
        debug!("Fetching {}", url);

        let label = format!("{} page {}", request.category, request.page);
        let html = with_backoff(&self.policy, &label, || self.fetch_once(&url))
            .await
            .map_err(|(e, attempts)| StatsError::FetchFailure {
                category: request.category,
                page: request.page,
                message: format!("{} (after {} attempts)", e, attempts),
            })?;

        Ok(classify(html, request.page))
    }
}
