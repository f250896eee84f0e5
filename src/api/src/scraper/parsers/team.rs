//! Team innings rows.
//!
//! Layout: Team, Score, Overs, RPO, Lead, Inns, Result, -, Opposition, Ground, Start Date

use super::fields;
use super::MatchCells;
use crate::types::{MatchResult, TeamMatchRecord};

pub struct TeamParser;

impl TeamParser {
    /// `None` when a required field (team, score, innings, result, match identity) is missing
    pub fn parse_row(cells: &[String]) -> Option<TeamMatchRecord> {
        let m = MatchCells::from_row(cells)?;
        let team = fields::value(&cells[0])?.to_string();
        let score = fields::score(&cells[1])?;

        Some(TeamMatchRecord {
            team,
            opposition: fields::opposition(m.opposition)?,
            ground: fields::value(m.ground)?.to_string(),
            date: fields::date(m.date)?,
            score: score.runs,
            wickets: score.wickets,
            overs: fields::overs(&cells[2]),
            run_rate: fields::float(&cells[3]),
            lead: fields::int(&cells[4]),
            innings: fields::innings(&cells[5])?,
            declared: score.declared,
            result: MatchResult::parse(&cells[6])?,
        })
    }
}
