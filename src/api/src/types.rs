//! Domain types for scraped cricket statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statistics category; each has its own source pages and table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Team,
    Batting,
    Bowling,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Team, Category::Batting, Category::Bowling];

    /// Table name in the store
    pub fn table(&self) -> &'static str {
        match self {
            Category::Team => "team",
            Category::Batting => "batting",
            Category::Bowling => "bowling",
        }
    }

    /// Column holding the natural key subject (team or player)
    pub fn subject_column(&self) -> &'static str {
        match self {
            Category::Team => "team",
            Category::Batting | Category::Bowling => "player",
        }
    }

    /// Value of the stats engine `type=` parameter
    pub fn engine_type(&self) -> &'static str {
        self.table()
    }

    /// Minimum number of cells for a data row
    pub fn min_columns(&self) -> usize {
        match self {
            Category::Team => 11,
            Category::Batting => 12,
            Category::Bowling => 11,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "team" => Ok(Category::Team),
            "batting" => Ok(Category::Batting),
            "bowling" => Ok(Category::Bowling),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Match result from the team's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
    Tie,
    NoResult,
}

impl MatchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Loss => "loss",
            MatchResult::Draw => "draw",
            MatchResult::Tie => "tie",
            MatchResult::NoResult => "no_result",
        }
    }

    /// Parse either the site's wording (`won`, `lost`, `n/r`) or the stored form.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "won" | "win" => Some(MatchResult::Win),
            "lost" | "loss" => Some(MatchResult::Loss),
            "draw" | "drawn" => Some(MatchResult::Draw),
            "tied" | "tie" => Some(MatchResult::Tie),
            "n/r" | "nr" | "no result" | "no_result" | "aban" | "canc" => {
                Some(MatchResult::NoResult)
            }
            _ => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a real-world innings row, used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub subject: String,
    pub opposition: String,
    pub ground: String,
    pub date: NaiveDate,
    pub innings: u8,
}

/// One team innings in a match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMatchRecord {
    pub team: String,
    pub opposition: String,
    pub ground: String,
    pub date: NaiveDate,
    pub score: u32,
    pub wickets: u8,
    pub overs: Option<f64>,
    pub run_rate: Option<f64>,
    pub lead: Option<i32>,
    pub innings: u8,
    pub declared: bool,
    pub result: MatchResult,
}

/// One batting innings by a player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingInningsRecord {
    pub player: String,
    pub team: Option<String>,
    pub opposition: String,
    pub ground: String,
    pub date: NaiveDate,
    pub runs: u32,
    pub balls_faced: Option<u32>,
    pub strike_rate: Option<f64>,
    pub fours: Option<u32>,
    pub sixes: Option<u32>,
    pub not_out: bool,
    pub innings: u8,
}

impl BattingInningsRecord {
    /// Strike rate as scraped, or runs per 100 balls when the page left it blank.
    pub fn effective_strike_rate(&self) -> Option<f64> {
        self.strike_rate.or_else(|| match self.balls_faced {
            Some(balls) if balls > 0 => Some(self.runs as f64 * 100.0 / balls as f64),
            _ => None,
        })
    }
}

/// One bowling innings by a player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingInningsRecord {
    pub player: String,
    pub team: Option<String>,
    pub opposition: String,
    pub ground: String,
    pub date: NaiveDate,
    /// Completed overs plus the fraction of the over bowled (5.2 -> 5.333..)
    pub overs: f64,
    pub maidens: Option<u32>,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy: Option<f64>,
    pub innings: u8,
}

impl BowlingInningsRecord {
    pub fn effective_economy(&self) -> Option<f64> {
        self.economy.or_else(|| {
            if self.overs > 0.0 {
                Some(self.runs_conceded as f64 / self.overs)
            } else {
                None
            }
        })
    }
}

/// A scraped row of any category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Record {
    Team(TeamMatchRecord),
    Batting(BattingInningsRecord),
    Bowling(BowlingInningsRecord),
}

impl Record {
    pub fn category(&self) -> Category {
        match self {
            Record::Team(_) => Category::Team,
            Record::Batting(_) => Category::Batting,
            Record::Bowling(_) => Category::Bowling,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Record::Team(r) => r.date,
            Record::Batting(r) => r.date,
            Record::Bowling(r) => r.date,
        }
    }

    pub fn key(&self) -> NaturalKey {
        let (subject, opposition, ground, date, innings) = match self {
            Record::Team(r) => (&r.team, &r.opposition, &r.ground, r.date, r.innings),
            Record::Batting(r) => (&r.player, &r.opposition, &r.ground, r.date, r.innings),
            Record::Bowling(r) => (&r.player, &r.opposition, &r.ground, r.date, r.innings),
        };
        NaturalKey {
            subject: subject.clone(),
            opposition: opposition.clone(),
            ground: ground.clone(),
            date,
            innings,
        }
    }
}
