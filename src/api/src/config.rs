//! Configuration for the cricket stats scraper.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/cricket_stats.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chrome executable; platform default when unset
    #[serde(default)]
    pub chrome_path: Option<String>,
    /// Earliest date ever scraped; resume point for an empty table
    #[serde(default = "default_epoch_start")]
    pub epoch_start: NaiveDate,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: f64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,
}

fn default_base_url() -> String {
    "https://stats.espncricinfo.com".to_string()
}

fn default_epoch_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 8, 13).unwrap_or_default()
}

fn default_max_pages() -> u32 {
    500
}

fn default_page_timeout_secs() -> u64 {
    30
}

fn default_requests_per_minute() -> u32 {
    20
}

fn default_min_delay_secs() -> f64 {
    1.0
}

fn default_max_delay_secs() -> f64 {
    3.0
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chrome_path: None,
            epoch_start: default_epoch_start(),
            max_pages: default_max_pages(),
            page_timeout_secs: default_page_timeout_secs(),
            requests_per_minute: default_requests_per_minute(),
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

/// Backoff settings for page fetches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `cricket` config file and the environment
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("cricket").required(false))
            // CRICKET__DATABASE__PATH, CRICKET__SCRAPER__MAX_PAGES, ...
            .add_source(
                config::Environment::with_prefix("CRICKET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
