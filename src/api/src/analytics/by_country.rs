//! Per-country breakdown of a player's batting or bowling.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use super::{average, round2, Analytics, Role};
use crate::error::StatsResult;
use crate::types::TeamMatchRecord;

/// What a "country" means for grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// The team played against
    #[default]
    Opposition,
    /// The country the ground is in
    Host,
}

impl FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opposition" => Ok(Grouping::Opposition),
            "host" => Ok(Grouping::Host),
            other => Err(format!("unknown grouping: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryGroup {
    pub country: String,
    pub innings: usize,
    /// Distinct (ground, date) matches
    pub matches: usize,
    /// Runs scored (batting) or wickets taken (bowling)
    pub total: u32,
    /// `total` per innings
    pub mean: f64,
    /// Runs per dismissal (batting) or runs conceded per wicket (bowling)
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryBreakdown {
    pub player: String,
    pub team: Option<String>,
    pub role: Role,
    pub grouping: Grouping,
    pub groups: Vec<CountryGroup>,
}

/// One innings reduced to what the breakdown needs
struct Line<'r> {
    opposition: &'r str,
    ground: &'r str,
    date: NaiveDate,
    value: u32,
    average_runs: u32,
    dismissals: u32,
}

#[derive(Default)]
struct Accumulator<'r> {
    innings: usize,
    matches: HashSet<(&'r str, NaiveDate)>,
    total: u32,
    average_runs: u32,
    dismissals: u32,
}

/// Host country per ground: the team most often seen there, as either side.
///
/// Ties go to the alphabetically first team.
pub fn ground_hosts(team_rows: &[TeamMatchRecord]) -> HashMap<String, String> {
    let mut counts: HashMap<&str, HashMap<&str, usize>> = HashMap::new();
    for row in team_rows {
        let seen = counts.entry(row.ground.as_str()).or_default();
        *seen.entry(row.team.as_str()).or_default() += 1;
        *seen.entry(row.opposition.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .filter_map(|(ground, teams)| {
            teams
                .into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(team, _)| (ground.to_string(), team.to_string()))
        })
        .collect()
}

impl<'a> Analytics<'a> {
    /// Group a player's innings by opposition or host country.
    ///
    /// With `Grouping::Host`, innings at grounds missing from the team table
    /// are left out.
    pub fn by_country(&self, player: &str, role: Role, grouping: Grouping) -> StatsResult<CountryBreakdown> {
        let batting;
        let bowling;
        let (team, lines): (Option<String>, Vec<Line<'_>>) = match role {
            Role::Batting => {
                batting = self.batting_rows(player)?;
                let lines = batting
                    .iter()
                    .map(|r| Line {
                        opposition: &r.opposition,
                        ground: &r.ground,
                        date: r.date,
                        value: r.runs,
                        average_runs: r.runs,
                        dismissals: u32::from(!r.not_out),
                    })
                    .collect();
                (batting[0].team.clone(), lines)
            }
            Role::Bowling => {
                bowling = self.bowling_rows(player)?;
                let lines = bowling
                    .iter()
                    .map(|r| Line {
                        opposition: &r.opposition,
                        ground: &r.ground,
                        date: r.date,
                        value: r.wickets,
                        average_runs: r.runs_conceded,
                        dismissals: r.wickets,
                    })
                    .collect();
                (bowling[0].team.clone(), lines)
            }
        };

        let hosts = match grouping {
            Grouping::Opposition => HashMap::new(),
            Grouping::Host => ground_hosts(&self.repo.team_rows()?),
        };

        let mut acc: BTreeMap<&str, Accumulator<'_>> = BTreeMap::new();
        for line in &lines {
            let country = match grouping {
                Grouping::Opposition => line.opposition,
                Grouping::Host => match hosts.get(line.ground) {
                    Some(host) => host.as_str(),
                    None => continue,
                },
            };
            let entry = acc.entry(country).or_default();
            entry.innings += 1;
            entry.matches.insert((line.ground, line.date));
            entry.total += line.value;
            entry.average_runs += line.average_runs;
            entry.dismissals += line.dismissals;
        }

        let mut groups: Vec<CountryGroup> = acc
            .into_iter()
            .map(|(country, a)| CountryGroup {
                country: country.to_string(),
                innings: a.innings,
                matches: a.matches.len(),
                total: a.total,
                mean: round2(a.total as f64 / a.innings as f64),
                average: average(a.average_runs, a.dismissals),
            })
            .collect();
        sort_groups(&mut groups, role);

        Ok(CountryBreakdown {
            player: player.to_string(),
            team,
            role,
            grouping,
            groups,
        })
    }
}

/// Best first: highest batting average, lowest bowling average; undefined last
fn sort_groups(groups: &mut [CountryGroup], role: Role) {
    groups.sort_by(|a, b| {
        let by_average = match (a.average, b.average) {
            (Some(x), Some(y)) => match role {
                Role::Batting => y.total_cmp(&x),
                Role::Bowling => x.total_cmp(&y),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        by_average.then_with(|| a.country.cmp(&b.country))
    });
}
