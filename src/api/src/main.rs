//! Cricket stats scraper
//!
//! Incrementally scrapes Test innings statistics into SQLite and answers
//! analytical queries over them.

mod analytics;
mod cli;
mod config;
mod error;
mod retry;
mod scraper;
mod storage;
mod sync;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries JSON results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cricket_stats=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Scrape { categories } => cli::run_scrape(&config, &categories).await,
        Commands::Players { category } => cli::run_players(&config, category),
        Commands::Counts => cli::run_counts(&config),
        Commands::ByCountry {
            player,
            role,
            group_by,
        } => cli::run_by_country(&config, &player, role, group_by),
        Commands::HeadToHead { batsman, bowler } => cli::run_head_to_head(&config, &batsman, &bowler),
        Commands::Outcomes {
            player,
            min_runs,
            min_wickets,
        } => cli::run_outcomes(&config, &player, min_runs, min_wickets),
        Commands::Progression { player } => cli::run_progression(&config, &player),
    }
}
