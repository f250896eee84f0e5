//! Team results in matches where a player hit a runs or wickets threshold.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{round2, Analytics};
use crate::error::StatsResult;
use crate::types::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Threshold {
    /// Runs in a single innings
    MinRuns(u32),
    /// Wickets in a single innings
    MinWickets(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCorrelation {
    pub player: String,
    pub threshold: Threshold,
    /// Distinct matches where the threshold was reached
    pub qualifying_matches: usize,
    /// Qualifying matches with a stored team result
    pub matched_results: usize,
    pub results: BTreeMap<MatchResult, usize>,
    /// Share of `matched_results`, in percent
    pub percentages: BTreeMap<MatchResult, f64>,
}

/// (team, opposition, ground, date)
type MatchKey = (Option<String>, String, String, NaiveDate);

impl<'a> Analytics<'a> {
    /// Tabulate the player's team results over matches where they reached `threshold`.
    pub fn outcome_correlation(&self, player: &str, threshold: Threshold) -> StatsResult<OutcomeCorrelation> {
        let matches: BTreeSet<MatchKey> = match threshold {
            Threshold::MinRuns(min) => self
                .batting_rows(player)?
                .into_iter()
                .filter(|r| r.runs >= min)
                .map(|r| (r.team, r.opposition, r.ground, r.date))
                .collect(),
            Threshold::MinWickets(min) => self
                .bowling_rows(player)?
                .into_iter()
                .filter(|r| r.wickets >= min)
                .map(|r| (r.team, r.opposition, r.ground, r.date))
                .collect(),
        };

        let mut results: BTreeMap<MatchResult, usize> = BTreeMap::new();
        for (team, opposition, ground, date) in &matches {
            let rows = self.repo.team_rows_for_match(opposition, ground, *date)?;
            let result = rows
                .iter()
                .find(|row| team.as_deref().map_or(true, |t| row.team == t))
                .map(|row| row.result);

            match result {
                Some(result) => *results.entry(result).or_default() += 1,
                None => debug!("No team result for {} v {} at {} on {}", player, opposition, ground, date),
            }
        }

        let matched_results: usize = results.values().sum();
        let percentages = results
            .iter()
            .map(|(&result, &count)| (result, round2(count as f64 * 100.0 / matched_results as f64)))
            .collect();

        Ok(OutcomeCorrelation {
            player: player.to_string(),
            threshold,
            qualifying_matches: matches.len(),
            matched_results,
            results,
            percentages,
        })
    }
}
