//! Incremental scrape-and-upsert pipeline
//!
//! For each category: pick the resume point from the watermark of the last
//! completed sync, walk result pages newest first, extract rows, drop stale
//! and already-stored keys and commit each page's fresh rows as one batch.
//! The watermark advances only once a walk completes, so a run interrupted
//! after committing newer pages is resumed from the same point.

pub mod dedup;
pub mod planner;

pub use dedup::{partition, Partition};
pub use planner::{resume_point, PageOutcome, StopReason, SyncPlan};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::error::StatsResult;
use crate::scraper::parsers::extract;
use crate::scraper::{FetchedPage, PageFetcher, PageRequest};
use crate::storage::StatsRepository;
use crate::types::{Category, Record};

/// Counters for one category run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub category: Category,
    pub resume_from: NaiveDate,
    pub pages_fetched: u32,
    pub extracted: usize,
    pub parse_skipped: usize,
    /// Rows dated before the resume point
    pub stale: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub stop: Option<StopReason>,
}

impl SyncReport {
    fn new(category: Category, resume_from: NaiveDate) -> Self {
        Self {
            category,
            resume_from,
            pages_fetched: 0,
            extracted: 0,
            parse_skipped: 0,
            stale: 0,
            inserted: 0,
            duplicates: 0,
            stop: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFailure {
    pub category: Category,
    pub error: String,
    pub retryable: bool,
}

/// Result of a multi-category run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncSummary {
    pub reports: Vec<SyncReport>,
    pub failures: Vec<CategoryFailure>,
}

impl SyncSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives the fetch, extract, dedup and persist steps
pub struct Syncer<'a> {
    fetcher: &'a dyn PageFetcher,
    epoch: NaiveDate,
    max_pages: u32,
}

impl<'a> Syncer<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, epoch: NaiveDate, max_pages: u32) -> Self {
        Self {
            fetcher,
            epoch,
            max_pages,
        }
    }

    pub fn from_config(fetcher: &'a dyn PageFetcher, config: &ScraperConfig) -> Self {
        Self::new(fetcher, config.epoch_start, config.max_pages)
    }

    /// Sync one category. Pages committed before a failure stay committed.
    pub async fn run(&self, repo: &mut StatsRepository, category: Category) -> StatsResult<SyncReport> {
        let resume = resume_point(repo.watermark(category)?, self.epoch);
        let mut existing = repo.keys_since(category, resume)?;
        let mut plan = SyncPlan::new(resume, self.max_pages);
        let mut report = SyncReport::new(category, resume);

        info!(
            "Syncing {} from {} ({} keys already stored on or after)",
            category,
            resume,
            existing.len()
        );

        while let Some(page) = plan.next_page() {
            let request = PageRequest {
                category,
                page,
                since: resume,
            };

            let html = match self.fetcher.fetch_page(&request).await? {
                FetchedPage::Content(html) => html,
                FetchedPage::EndOfData => {
                    plan.observe(&PageOutcome {
                        end_of_data: true,
                        ..Default::default()
                    });
                    continue;
                }
            };
            report.pages_fetched += 1;

            let extraction = extract(category, &html);
            let extracted = extraction.records.len();
            let (current, stale): (Vec<Record>, Vec<Record>) = extraction
                .records
                .into_iter()
                .partition(|r| r.date() >= resume);

            let Partition { fresh, duplicates } = partition(&existing, current);
            let outcome = if fresh.is_empty() {
                Default::default()
            } else {
                repo.insert_batch(&fresh)?
            };
            existing.extend(fresh.iter().map(Record::key));

            report.extracted += extracted;
            report.parse_skipped += extraction.skipped;
            report.stale += stale.len();
            report.inserted += outcome.inserted;
            report.duplicates += duplicates + outcome.skipped;

            info!(
                "{} page {}: extracted={} skipped={} stale={} inserted={} duplicates={}",
                category,
                page,
                extracted,
                extraction.skipped,
                stale.len(),
                outcome.inserted,
                duplicates + outcome.skipped
            );

            plan.observe(&PageOutcome {
                newest_date: extraction.newest_date,
                end_of_data: extraction.total_pages.is_some_and(|total| page >= total),
            });
        }

        report.stop = plan.stop_reason();
        if report.stop.is_some_and(|stop| stop.is_complete()) {
            if let Some(latest) = repo.latest_date(category)? {
                repo.set_watermark(category, latest)?;
            }
        }
        info!(
            "{} done: {} pages, {} inserted, {} duplicates, stop={:?}",
            category, report.pages_fetched, report.inserted, report.duplicates, report.stop
        );
        Ok(report)
    }

    /// Sync categories one after another; a failed category does not stop the rest.
    pub async fn run_all(&self, repo: &mut StatsRepository, categories: &[Category]) -> SyncSummary {
        let mut summary = SyncSummary::default();

        for &category in categories {
            match self.run(repo, category).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    warn!("{} sync failed: {}", category, e);
                    summary.failures.push(CategoryFailure {
                        category,
                        retryable: e.is_retryable(),
                        error: e.to_string(),
                    });
                }
            }
        }
        summary
    }
}
