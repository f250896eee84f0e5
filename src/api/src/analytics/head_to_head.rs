//! Batsman against bowler, matched on the matches both played.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::{average, Analytics};
use crate::error::StatsResult;
use crate::types::BattingInningsRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InningsSummary {
    pub innings: usize,
    pub runs: u32,
    pub outs: u32,
    pub average: Option<f64>,
}

impl InningsSummary {
    fn from_rows<'r>(rows: impl IntoIterator<Item = &'r BattingInningsRecord>) -> Self {
        let mut summary = Self::default();
        for row in rows {
            summary.innings += 1;
            summary.runs += row.runs;
            summary.outs += u32::from(!row.not_out);
        }
        summary.average = average(summary.runs, summary.outs);
        summary
    }
}

/// A batsman innings in a match the bowler also bowled in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encounter {
    pub ground: String,
    pub date: NaiveDate,
    pub innings: u8,
    pub runs: u32,
    pub balls_faced: Option<u32>,
    pub not_out: bool,
    /// Bowler's match totals across their innings
    pub bowler_wickets: u32,
    pub bowler_runs_conceded: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub batsman: String,
    pub bowler: String,
    pub bowler_team: Option<String>,
    pub encounters: Vec<Encounter>,
    /// Every innings against the bowler's team
    pub against_team: InningsSummary,
    pub with_bowler: InningsSummary,
    pub without_bowler: InningsSummary,
}

impl<'a> Analytics<'a> {
    /// Compare a batsman's record against a bowler's team with and without the bowler playing.
    pub fn head_to_head(&self, batsman: &str, bowler: &str) -> StatsResult<HeadToHead> {
        let batting = self.batting_rows(batsman)?;
        let bowling = self.bowling_rows(bowler)?;
        let bowler_team = bowling[0].team.clone();
        let batsman_team = batting.iter().find_map(|r| r.team.as_deref());

        // (ground, date) -> (wickets, runs conceded) in matches against the batsman's side
        let mut bowled: HashMap<(&str, NaiveDate), (u32, u32)> = HashMap::new();
        for row in &bowling {
            if batsman_team.is_some_and(|team| team != row.opposition) {
                continue;
            }
            let entry = bowled.entry((row.ground.as_str(), row.date)).or_default();
            entry.0 += row.wickets;
            entry.1 += row.runs_conceded;
        }

        let against: Vec<&BattingInningsRecord> = batting
            .iter()
            .filter(|r| bowler_team.as_deref().map_or(true, |team| r.opposition == team))
            .collect();

        let mut encounters = Vec::new();
        let mut with = Vec::new();
        let mut without = Vec::new();
        for &row in &against {
            match bowled.get(&(row.ground.as_str(), row.date)) {
                Some(&(wickets, runs_conceded)) => {
                    encounters.push(Encounter {
                        ground: row.ground.clone(),
                        date: row.date,
                        innings: row.innings,
                        runs: row.runs,
                        balls_faced: row.balls_faced,
                        not_out: row.not_out,
                        bowler_wickets: wickets,
                        bowler_runs_conceded: runs_conceded,
                    });
                    with.push(row);
                }
                None => without.push(row),
            }
        }

        Ok(HeadToHead {
            batsman: batsman.to_string(),
            bowler: bowler.to_string(),
            bowler_team,
            encounters,
            against_team: InningsSummary::from_rows(against.iter().copied()),
            with_bowler: InningsSummary::from_rows(with),
            without_bowler: InningsSummary::from_rows(without),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use crate::storage::repository::fixtures::{batting, bowling, date};
    use crate::storage::StatsRepository;
    use crate::types::Record;

    fn seeded_repo() -> StatsRepository {
        let mut repo = StatsRepository::in_memory().unwrap();
        repo.insert_batch(&[
            Record::Batting(batting("JE Root", "India", "Chennai", date(2023, 2, 1), 50)),
            Record::Batting(batting("JE Root", "India", "Delhi", date(2023, 2, 9), 20)),
            Record::Batting(batting("JE Root", "India", "Ranchi", date(2023, 2, 23), 100)),
            Record::Batting(batting("JE Root", "Australia", "Lord's", date(2023, 6, 28), 10)),
            Record::Bowling(bowling("R Ashwin", "England", "Chennai", date(2023, 2, 1), 3)),
            Record::Bowling(bowling("R Ashwin", "England", "Delhi", date(2023, 2, 9), 1)),
            Record::Bowling(bowling("R Ashwin", "Australia", "Ranchi", date(2023, 2, 23), 4)),
        ])
        .unwrap();
        repo
    }

    #[test]
    fn test_with_and_without_bowler() {
        let repo = seeded_repo();
        let h2h = Analytics::new(&repo).head_to_head("JE Root", "R Ashwin").unwrap();

        assert_eq!(h2h.bowler_team.as_deref(), Some("India"));
        assert_eq!(h2h.encounters.len(), 2);
        assert_eq!(h2h.encounters[0].bowler_wickets, 3);
        assert_eq!(h2h.encounters[0].bowler_runs_conceded, 60);

        assert_eq!(h2h.against_team.innings, 3);
        assert_eq!(h2h.against_team.runs, 170);
        assert_eq!(h2h.with_bowler.runs, 70);
        assert_eq!(h2h.with_bowler.average, Some(35.0));
        assert_eq!(h2h.without_bowler.innings, 1);
        assert_eq!(h2h.without_bowler.average, Some(100.0));
    }

    #[test]
    fn test_never_met_is_empty() {
        let mut repo = seeded_repo();
        repo.insert_batch(&[Record::Bowling(bowling(
            "Kuldeep Yadav",
            "Bangladesh",
            "Chattogram",
            date(2022, 12, 14),
            8,
        ))])
        .unwrap();

        let h2h = Analytics::new(&repo).head_to_head("JE Root", "Kuldeep Yadav").unwrap();
        assert!(h2h.encounters.is_empty());
        assert_eq!(h2h.with_bowler, InningsSummary::default());
    }

    #[test]
    fn test_missing_players() {
        let repo = seeded_repo();
        let analytics = Analytics::new(&repo);

        assert!(matches!(
            analytics.head_to_head("Nobody", "R Ashwin"),
            Err(StatsError::NotFound { role: "batting", .. })
        ));
        assert!(matches!(
            analytics.head_to_head("JE Root", "Nobody"),
            Err(StatsError::NotFound { role: "bowling", .. })
        ));
    }
}
