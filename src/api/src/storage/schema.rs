//! SQLite schema for scraped innings statistics
//!
//! Tables:
//! - team: one row per team innings, with the match result
//! - batting: one row per batting innings
//! - bowling: one row per bowling innings
//! - sync_state: per-category watermark of the last completed sync
//!
//! Each table is unique on its natural key
//! (subject, opposition, ground, start_date, innings).

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS team (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            team TEXT NOT NULL,
            opposition TEXT NOT NULL,
            ground TEXT NOT NULL,
            start_date TEXT NOT NULL,
            innings INTEGER NOT NULL,
            score INTEGER NOT NULL CHECK (score >= 0),
            wickets INTEGER NOT NULL CHECK (wickets >= 0),
            overs REAL CHECK (overs IS NULL OR overs >= 0),
            run_rate REAL,
            lead INTEGER,
            declared INTEGER NOT NULL DEFAULT 0,
            result TEXT NOT NULL,
            scraped_at TEXT DEFAULT (datetime('now')),
            UNIQUE(team, opposition, ground, start_date, innings)
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS batting (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player TEXT NOT NULL,
            team TEXT,
            opposition TEXT NOT NULL,
            ground TEXT NOT NULL,
            start_date TEXT NOT NULL,
            innings INTEGER NOT NULL,
            runs INTEGER NOT NULL CHECK (runs >= 0),
            balls_faced INTEGER CHECK (balls_faced IS NULL OR balls_faced >= 0),
            strike_rate REAL,
            fours INTEGER,
            sixes INTEGER,
            not_out INTEGER NOT NULL DEFAULT 0,
            scraped_at TEXT DEFAULT (datetime('now')),
            UNIQUE(player, opposition, ground, start_date, innings)
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS bowling (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player TEXT NOT NULL,
            team TEXT,
            opposition TEXT NOT NULL,
            ground TEXT NOT NULL,
            start_date TEXT NOT NULL,
            innings INTEGER NOT NULL,
            overs REAL NOT NULL CHECK (overs >= 0),
            maidens INTEGER,
            runs_conceded INTEGER NOT NULL CHECK (runs_conceded >= 0),
            wickets INTEGER NOT NULL CHECK (wickets >= 0),
            economy REAL,
            scraped_at TEXT DEFAULT (datetime('now')),
            UNIQUE(player, opposition, ground, start_date, innings)
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS sync_state (
            category TEXT PRIMARY KEY,
            watermark TEXT NOT NULL,
            completed_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    // Resume queries and per-player reads
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_team_date ON team(start_date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_team_match ON team(ground, start_date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_batting_date ON batting(start_date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_batting_player ON batting(player)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bowling_date ON bowling(start_date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bowling_player ON bowling(player)",
        [],
    )?;

    Ok(())
}
