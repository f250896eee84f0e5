//! Error kinds surfaced by the scrape pipeline and the query engine.

use crate::types::Category;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Page could not be fetched after the bounded retries. Retryable by the caller.
    #[error("failed to fetch {category} page {page}: {message}")]
    FetchFailure {
        category: Category,
        page: u32,
        message: String,
    },

    /// Single browser operation failed; folded into `FetchFailure` by the fetcher.
    #[error("browser error: {0}")]
    Browser(String),

    #[error("no {role} rows found for player '{player}'")]
    NotFound { role: &'static str, player: String },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),
}

impl StatsError {
    pub fn not_found(role: &'static str, player: &str) -> Self {
        StatsError::NotFound {
            role,
            player: player.to_string(),
        }
    }

    /// Whether an outer scheduler should retry the whole invocation
    pub fn is_retryable(&self) -> bool {
        matches!(self, StatsError::FetchFailure { .. } | StatsError::Browser(_))
    }
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
