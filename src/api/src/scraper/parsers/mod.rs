//! HTML parsers for Cricinfo stats engine result pages.

pub mod batting;
pub mod bowling;
pub mod fields;
pub mod table;
pub mod team;

pub use batting::BattingParser;
pub use bowling::BowlingParser;
pub use team::TeamParser;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::types::{Category, Record};

/// Typed rows pulled from one results page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub records: Vec<Record>,
    /// Data rows that were too short or missing a required field
    pub skipped: usize,
    /// From the "Page X of Y" banner when present
    pub total_pages: Option<u32>,
    pub newest_date: Option<NaiveDate>,
}

/// Match identity columns shared by every layout: the last three cells.
pub(crate) struct MatchCells<'a> {
    pub opposition: &'a str,
    pub ground: &'a str,
    pub date: &'a str,
}

impl<'a> MatchCells<'a> {
    pub fn from_row(cells: &'a [String]) -> Option<Self> {
        match cells {
            [.., opposition, ground, date] => Some(Self {
                opposition,
                ground,
                date,
            }),
            _ => None,
        }
    }
}

/// Parse one page of `category` results into typed records.
pub fn extract(category: Category, html: &str) -> Extraction {
    let rows = table::data_rows(html);
    let mut extraction = Extraction {
        total_pages: table::page_count(html).map(|(_, total)| total),
        ..Default::default()
    };

    for cells in &rows {
        let record = if cells.len() < category.min_columns() {
            None
        } else {
            match category {
                Category::Team => TeamParser::parse_row(cells).map(Record::Team),
                Category::Batting => BattingParser::parse_row(cells).map(Record::Batting),
                Category::Bowling => BowlingParser::parse_row(cells).map(Record::Bowling),
            }
        };

        match record {
            Some(record) => extraction.records.push(record),
            None => {
                debug!("Skipping {} row: {:?}", category, cells);
                extraction.skipped += 1;
            }
        }
    }

    extraction.newest_date = extraction.records.iter().map(Record::date).max();
    extraction
}
