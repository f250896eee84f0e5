//! Year-by-year batting progression.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::{average, Analytics};
use crate::error::StatsResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearProgress {
    pub year: i32,
    pub matches: usize,
    pub innings: usize,
    pub runs: u32,
    pub outs: u32,
    pub highest: u32,
    pub cumulative_runs: u32,
    pub cumulative_outs: u32,
    pub cumulative_average: Option<f64>,
    pub career_highest: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingProgression {
    pub player: String,
    pub years: Vec<YearProgress>,
}

#[derive(Default)]
struct Year<'r> {
    matches: HashSet<(&'r str, NaiveDate)>,
    innings: usize,
    runs: u32,
    outs: u32,
    highest: u32,
}

impl<'a> Analytics<'a> {
    pub fn batting_progression(&self, player: &str) -> StatsResult<BattingProgression> {
        let rows = self.batting_rows(player)?;

        let mut by_year: BTreeMap<i32, Year<'_>> = BTreeMap::new();
        for row in &rows {
            let year = by_year.entry(row.date.year()).or_default();
            year.matches.insert((row.ground.as_str(), row.date));
            year.innings += 1;
            year.runs += row.runs;
            year.outs += u32::from(!row.not_out);
            year.highest = year.highest.max(row.runs);
        }

        let mut cumulative_runs = 0;
        let mut cumulative_outs = 0;
        let mut career_highest = 0;
        let years = by_year
            .into_iter()
            .map(|(year, y)| {
                cumulative_runs += y.runs;
                cumulative_outs += y.outs;
                career_highest = career_highest.max(y.highest);
                YearProgress {
                    year,
                    matches: y.matches.len(),
                    innings: y.innings,
                    runs: y.runs,
                    outs: y.outs,
                    highest: y.highest,
                    cumulative_runs,
                    cumulative_outs,
                    cumulative_average: average(cumulative_runs, cumulative_outs),
                    career_highest,
                }
            })
            .collect();

        Ok(BattingProgression {
            player: player.to_string(),
            years,
        })
    }
}
