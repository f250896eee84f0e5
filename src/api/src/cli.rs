//! CLI commands for cricket-stats.
//!
//! `scrape` runs the incremental sync; the remaining commands query the
//! store and print JSON to stdout.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::analytics::{Analytics, Grouping, Role, Threshold};
use crate::config::AppConfig;
use crate::scraper::BrowserFetcher;
use crate::storage::StatsRepository;
use crate::sync::Syncer;
use crate::types::Category;

#[derive(Parser)]
#[command(name = "cricket-stats")]
#[command(version, about = "Test cricket innings scraper and statistics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch new innings rows and store them
    Scrape {
        /// Categories to sync (team, batting, bowling, all)
        #[arg(value_name = "CATEGORY", default_value = "all")]
        categories: Vec<String>,
    },

    /// List stored players for a category
    Players {
        #[arg(short, long, default_value = "batting")]
        category: Category,
    },

    /// Row counts per table
    Counts,

    /// Player figures grouped by country
    ByCountry {
        #[arg(short, long)]
        player: String,

        /// batting or bowling
        #[arg(short, long, default_value = "batting")]
        role: Role,

        /// opposition or host
        #[arg(short, long, default_value = "opposition")]
        group_by: Grouping,
    },

    /// Batsman record against a bowler's team, with and without the bowler
    HeadToHead {
        #[arg(long)]
        batsman: String,

        #[arg(long)]
        bowler: String,
    },

    /// Team results in matches where the player reached a threshold
    Outcomes {
        #[arg(short, long)]
        player: String,

        /// Minimum runs in an innings
        #[arg(long, conflicts_with = "min_wickets", required_unless_present = "min_wickets")]
        min_runs: Option<u32>,

        /// Minimum wickets in an innings
        #[arg(long)]
        min_wickets: Option<u32>,
    },

    /// Yearly and cumulative batting figures
    Progression {
        #[arg(short, long)]
        player: String,
    },
}

/// Run the incremental scrape for the requested categories.
///
/// Fails if any category failed, after the others have run.
pub async fn run_scrape(config: &AppConfig, categories: &[String]) -> anyhow::Result<()> {
    let categories = parse_categories(categories)?;
    let mut repo = open_repository(config)?;

    tracing::info!("Launching browser");
    let fetcher = BrowserFetcher::launch(config)
        .await
        .context("Failed to start browser")?;

    let summary = Syncer::from_config(&fetcher, &config.scraper)
        .run_all(&mut repo, &categories)
        .await;
    fetcher.close().await;

    print_json(&summary)?;

    if !summary.is_success() {
        let failed: Vec<String> = summary
            .failures
            .iter()
            .map(|f| f.category.to_string())
            .collect();
        bail!("Sync failed for: {}", failed.join(", "));
    }
    Ok(())
}

pub fn run_players(config: &AppConfig, category: Category) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    print_json(&repo.players(category)?)
}

pub fn run_counts(config: &AppConfig) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    let mut counts = BTreeMap::new();
    for category in Category::ALL {
        counts.insert(category, repo.count(category)?);
    }
    print_json(&counts)
}

pub fn run_by_country(config: &AppConfig, player: &str, role: Role, grouping: Grouping) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    print_json(&Analytics::new(&repo).by_country(player, role, grouping)?)
}

pub fn run_head_to_head(config: &AppConfig, batsman: &str, bowler: &str) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    print_json(&Analytics::new(&repo).head_to_head(batsman, bowler)?)
}

pub fn run_outcomes(
    config: &AppConfig,
    player: &str,
    min_runs: Option<u32>,
    min_wickets: Option<u32>,
) -> anyhow::Result<()> {
    let threshold = match (min_runs, min_wickets) {
        (Some(runs), _) => Threshold::MinRuns(runs),
        (None, Some(wickets)) => Threshold::MinWickets(wickets),
        (None, None) => bail!("Either --min-runs or --min-wickets is required"),
    };
    let repo = open_repository(config)?;
    print_json(&Analytics::new(&repo).outcome_correlation(player, threshold)?)
}

pub fn run_progression(config: &AppConfig, player: &str) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    print_json(&Analytics::new(&repo).batting_progression(player)?)
}

fn open_repository(config: &AppConfig) -> anyhow::Result<StatsRepository> {
    tracing::debug!("Opening database: {}", config.database.path);
    StatsRepository::new(Path::new(&config.database.path))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Expand `all` and drop repeats, keeping the order given
fn parse_categories(args: &[String]) -> anyhow::Result<Vec<Category>> {
    let mut categories = Vec::new();
    for arg in args {
        let expanded = if arg.eq_ignore_ascii_case("all") {
            Category::ALL.to_vec()
        } else {
            vec![arg.parse::<Category>().map_err(anyhow::Error::msg)?]
        };
        for category in expanded {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
    }
    Ok(categories)
}
