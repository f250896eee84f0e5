//! Web scraper module for the Cricinfo statistics engine
//!
//! Provides browser automation, the page-fetch seam used by the sync
//! pipeline, and HTML table extraction.

pub mod browser;
pub mod fetcher;
pub mod parsers;
pub mod rate_limiter;

pub use fetcher::{BrowserFetcher, FetchedPage, PageFetcher, PageRequest};

use chrono::NaiveDate;

use crate::types::Category;

/// Upper bound of the date span; the engine requires one
const SPAN_MAX: &str = "13+Aug+2050";

/// Format a date the way the engine expects in `spanmin1` (13+Aug+2022)
pub fn span_date(date: NaiveDate) -> String {
    date.format("%d+%b+%Y").to_string()
}

/// Build a Test-match innings list URL for one category and page.
///
/// Results are restricted to innings on or after `since` and ordered by
/// start date, newest first.
pub fn stats_url(base_url: &str, category: Category, since: NaiveDate, page: u32) -> String {
    format!(
        "{}/ci/engine/stats/index.html?class=1;home_or_away=1;home_or_away=2;home_or_away=3;\
         orderby=start;orderbyad=reverse;page={};result=1;result=2;result=3;result=4;\
         spanmin1={};spanmax1={};spanval1=span;template=results;type={};view=innings",
        base_url.trim_end_matches('/'),
        page,
        span_date(since),
        SPAN_MAX,
        category.engine_type()
    )
}

/// Full country name for an engine team code; unknown codes pass through.
pub fn country_name(code: &str) -> &str {
    match code {
        "IND" => "India",
        "PAK" => "Pakistan",
        "AUS" => "Australia",
        "ENG" => "England",
        "BAN" => "Bangladesh",
        "AFG" => "Afghanistan",
        "IRE" => "Ireland",
        "SA" => "South Africa",
        "SL" => "Sri Lanka",
        "NZ" => "New Zealand",
        "WI" => "West Indies",
        "ZIM" => "Zimbabwe",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_date() {
        let date = NaiveDate::from_ymd_opt(2022, 8, 3).unwrap();
        assert_eq!(span_date(date), "03+Aug+2022");
    }

    #[test]
    fn test_stats_url() {
        let since = NaiveDate::from_ymd_opt(2022, 8, 13).unwrap();
        let url = stats_url("https://stats.espncricinfo.com/", Category::Batting, since, 3);

        assert!(url.starts_with("https://stats.espncricinfo.com/ci/engine/stats/index.html?class=1;"));
        assert!(url.contains(";page=3;"));
        assert!(url.contains(";orderby=start;orderbyad=reverse;"));
        assert!(url.contains("spanmin1=13+Aug+2022;spanmax1=13+Aug+2050"));
        assert!(url.ends_with("type=batting;view=innings"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_country_name() {
        assert_eq!(country_name("SA"), "South Africa");
        assert_eq!(country_name("WI"), "West Indies");
        assert_eq!(country_name("NL"), "NL");
    }
}
