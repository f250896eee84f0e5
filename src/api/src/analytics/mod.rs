//! Read-only analytical queries over stored innings rows
//!
//! Every query names a player. A player with no stored rows for the role
//! queried is `StatsError::NotFound`; filters that exclude every row give an
//! empty result instead.

pub mod by_country;
pub mod head_to_head;
pub mod outcomes;
pub mod progression;

pub use by_country::Grouping;
pub use outcomes::Threshold;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StatsError, StatsResult};
use crate::storage::StatsRepository;
use crate::types::{BattingInningsRecord, BowlingInningsRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Batting,
    Bowling,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Batting => "batting",
            Role::Bowling => "bowling",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batting" => Ok(Role::Batting),
            "bowling" => Ok(Role::Bowling),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Query engine over a repository
pub struct Analytics<'a> {
    repo: &'a StatsRepository,
}

impl<'a> Analytics<'a> {
    pub fn new(repo: &'a StatsRepository) -> Self {
        Self { repo }
    }

    fn batting_rows(&self, player: &str) -> StatsResult<Vec<BattingInningsRecord>> {
        let rows = self.repo.batting_rows(player)?;
        if rows.is_empty() {
            return Err(StatsError::not_found(Role::Batting.as_str(), player));
        }
        Ok(rows)
    }

    fn bowling_rows(&self, player: &str) -> StatsResult<Vec<BowlingInningsRecord>> {
        let rows = self.repo.bowling_rows(player)?;
        if rows.is_empty() {
            return Err(StatsError::not_found(Role::Bowling.as_str(), player));
        }
        Ok(rows)
    }
}

/// Runs per dismissal, or runs conceded per wicket; undefined with no dismissals
pub(crate) fn average(runs: u32, dismissals: u32) -> Option<f64> {
    (dismissals > 0).then(|| round2(runs as f64 / dismissals as f64))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
