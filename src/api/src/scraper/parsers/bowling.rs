//! Bowling innings rows.
//!
//! Layout: Player, Overs, Mdns, Runs, Wkts, Econ, Inns, -, Opposition, Ground, Start Date

use super::fields;
use super::MatchCells;
use crate::types::BowlingInningsRecord;

pub struct BowlingParser;

impl BowlingParser {
    pub fn parse_row(cells: &[String]) -> Option<BowlingInningsRecord> {
        let m = MatchCells::from_row(cells)?;
        let (player, team) = fields::player_and_team(&cells[0])?;

        Some(BowlingInningsRecord {
            player,
            team,
            opposition: fields::opposition(m.opposition)?,
            ground: fields::value(m.ground)?.to_string(),
            date: fields::date(m.date)?,
            overs: fields::overs(&cells[1])?,
            maidens: fields::uint(&cells[2]),
            runs_conceded: fields::uint(&cells[3])?,
            wickets: fields::uint(&cells[4])?,
            economy: fields::float(&cells[5]),
            innings: fields::innings(&cells[6])?,
        })
    }
}
