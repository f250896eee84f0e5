//! Decides where an incremental scrape starts and when it stops.

use chrono::NaiveDate;
use serde::Serialize;

/// First date to fetch: the watermark of the last completed sync, never
/// earlier than `epoch`.
///
/// Inclusive; rows on that date are fetched again and removed by dedup.
pub fn resume_point(watermark: Option<NaiveDate>, epoch: NaiveDate) -> NaiveDate {
    watermark.map_or(epoch, |latest| latest.max(epoch))
}

/// What one page contributed, reported back to the plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    pub newest_date: Option<NaiveDate>,
    pub end_of_data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndOfData,
    /// Page reached dates already covered by the store
    CaughtUp,
    PageLimit,
}

impl StopReason {
    /// Whether every row newer than the resume point was walked
    pub fn is_complete(&self) -> bool {
        matches!(self, StopReason::EndOfData | StopReason::CaughtUp)
    }
}

/// Page walk for one category
#[derive(Debug, Clone)]
pub struct SyncPlan {
    resume: NaiveDate,
    max_pages: u32,
    next: u32,
    stop: Option<StopReason>,
}

impl SyncPlan {
    pub fn new(resume: NaiveDate, max_pages: u32) -> Self {
        Self {
            resume,
            max_pages,
            next: 1,
            stop: None,
        }
    }

    /// Next page index to fetch, or `None` once the plan has stopped
    pub fn next_page(&mut self) -> Option<u32> {
        if self.stop.is_some() {
            return None;
        }
        if self.next > self.max_pages {
            self.stop = Some(StopReason::PageLimit);
            return None;
        }
        let page = self.next;
        self.next += 1;
        Some(page)
    }

    /// Record the outcome of the page last returned by `next_page`
    pub fn observe(&mut self, outcome: &PageOutcome) {
        if self.stop.is_some() {
            return;
        }
        self.stop = if outcome.end_of_data {
            Some(StopReason::EndOfData)
        } else if outcome.newest_date.map_or(true, |d| d <= self.resume) {
            Some(StopReason::CaughtUp)
        } else {
            None
        };
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }
}
