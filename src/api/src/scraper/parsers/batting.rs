//! Batting innings rows.
//!
//! Layout: Player, Runs, Mins, BF, 4s, 6s, SR, Inns, -, Opposition, Ground, Start Date

use super::fields;
use super::MatchCells;
use crate::types::BattingInningsRecord;

pub struct BattingParser;

impl BattingParser {
    /// `None` for did-not-bat rows and rows missing runs, innings or match identity
    pub fn parse_row(cells: &[String]) -> Option<BattingInningsRecord> {
        let m = MatchCells::from_row(cells)?;
        let (player, team) = fields::player_and_team(&cells[0])?;
        let (runs, not_out) = fields::runs(&cells[1])?;

        Some(BattingInningsRecord {
            player,
            team,
            opposition: fields::opposition(m.opposition)?,
            ground: fields::value(m.ground)?.to_string(),
            date: fields::date(m.date)?,
            runs,
            balls_faced: fields::uint(&cells[3]),
            strike_rate: fields::float(&cells[6]),
            fours: fields::uint(&cells[4]),
            sixes: fields::uint(&cells[5]),
            not_out,
            innings: fields::innings(&cells[7])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parse_not_out_innings() {
        let cells = row(&[
            "JE Root (ENG)", "118*", "312", "152", "7", "4", "77.63", "1", "", "v Australia",
            "Birmingham", "16 Jun 2023",
        ]);
        let record = BattingParser::parse_row(&cells).unwrap();

        assert_eq!(record.player, "JE Root");
        assert_eq!(record.team.as_deref(), Some("England"));
        assert_eq!(record.opposition, "Australia");
        assert_eq!(record.runs, 118);
        assert!(record.not_out);
        assert_eq!(record.balls_faced, Some(152));
        assert_eq!(record.sixes, Some(4));
        assert_eq!(record.strike_rate, Some(77.63));
    }

    #[test]
    fn test_missing_minutes_and_rate() {
        let cells = row(&[
            "NM Lyon (AUS)", "0", "-", "3", "0", "0", "-", "2", "", "v England", "Lord's",
            "28 Jun 2023",
        ]);
        let record = BattingParser::parse_row(&cells).unwrap();

        assert_eq!(record.runs, 0);
        assert!(!record.not_out);
        assert_eq!(record.strike_rate, None);
        assert_eq!(record.effective_strike_rate(), Some(0.0));
    }

    #[test]
    fn test_did_not_bat_rejected() {
        for runs in ["DNB", "TDNB", "absent", "sub"] {
            let cells = row(&[
                "JM Anderson (ENG)", runs, "-", "-", "-", "-", "-", "2", "", "v Australia",
                "Birmingham", "16 Jun 2023",
            ]);
            assert!(BattingParser::parse_row(&cells).is_none());
        }
    }
}
