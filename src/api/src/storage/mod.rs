//! SQLite storage for scraped cricket statistics
//!
//! Provides persistent, deduplicated storage for team, batting and
//! bowling innings rows.

pub mod repository;
pub mod schema;

pub use repository::StatsRepository;
