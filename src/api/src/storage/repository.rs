//! SQLite repository for scraped innings statistics

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use super::schema::create_tables;
use crate::error::StatsResult;
use crate::types::{
    BattingInningsRecord, BowlingInningsRecord, Category, MatchResult, NaturalKey, Record,
    TeamMatchRecord,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of inserting one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertOutcome {
    pub inserted: usize,
    /// Rows whose natural key was already stored
    pub skipped: usize,
}

/// Repository for team, batting and bowling rows
pub struct StatsRepository {
    conn: Connection,
}

impl StatsRepository {
    /// Open the database at `db_path`, creating directories and tables if needed
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create database directory")?;
            }
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;

        // Readers should not block the weekly writer
        conn.pragma_update(None, "journal_mode", "WAL")?;

        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> StatsResult<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    // ==================== Insert Operations ====================

    /// Insert a batch of records in one transaction.
    ///
    /// Existing natural keys are ignored, never updated. Any other failure
    /// rolls back the whole batch.
    pub fn insert_batch(&mut self, records: &[Record]) -> StatsResult<InsertOutcome> {
        let tx = self.conn.transaction()?;
        let mut outcome = InsertOutcome::default();

        for record in records {
            let changed = match record {
                Record::Team(r) => insert_team(&tx, r)?,
                Record::Batting(r) => insert_batting(&tx, r)?,
                Record::Bowling(r) => insert_bowling(&tx, r)?,
            };
            if changed > 0 {
                outcome.inserted += 1;
            } else {
                outcome.skipped += 1;
            }
        }

        tx.commit()?;
        Ok(outcome)
    }

    // ==================== Sync Queries ====================

    /// Most recent stored date for a category (for resume capability)
    pub fn latest_date(&self, category: Category) -> StatsResult<Option<NaiveDate>> {
        let sql = format!("SELECT MAX(start_date) FROM {}", category.table());
        let latest: Option<String> = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(latest.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()))
    }

    /// Newest date covered by the last completed sync of a category
    pub fn watermark(&self, category: Category) -> StatsResult<Option<NaiveDate>> {
        let watermark: Option<String> = self
            .conn
            .query_row(
                "SELECT watermark FROM sync_state WHERE category = ?1",
                [category.table()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(watermark.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()))
    }

    /// Record a completed sync. The watermark never moves backwards.
    pub fn set_watermark(&self, category: Category, date: NaiveDate) -> StatsResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO sync_state (category, watermark) VALUES (?1, ?2)
            ON CONFLICT(category) DO UPDATE SET
                watermark = MAX(watermark, excluded.watermark),
                completed_at = datetime('now')
            "#,
            params![category.table(), date.format(DATE_FORMAT).to_string()],
        )?;
        Ok(())
    }

    /// Natural keys stored on or after `since`
    pub fn keys_since(&self, category: Category, since: NaiveDate) -> StatsResult<HashSet<NaturalKey>> {
        let sql = format!(
            "SELECT {}, opposition, ground, start_date, innings FROM {} WHERE start_date >= ?1",
            category.subject_column(),
            category.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let keys = stmt
            .query_map([since.format(DATE_FORMAT).to_string()], |row| {
                Ok(NaturalKey {
                    subject: row.get(0)?,
                    opposition: row.get(1)?,
                    ground: row.get(2)?,
                    date: date_column(row, 3)?,
                    innings: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(keys)
    }

    pub fn count(&self, category: Category) -> StatsResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", category.table());
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Distinct subjects (players, or teams for the team table), sorted
    pub fn players(&self, category: Category) -> StatsResult<Vec<String>> {
        let column = category.subject_column();
        let sql = format!(
            "SELECT DISTINCT {col} FROM {table} ORDER BY {col}",
            col = column,
            table = category.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let players = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(players)
    }

    // ==================== Analytics Reads ====================

    /// Batting innings for a player in scrape order
    pub fn batting_rows(&self, player: &str) -> StatsResult<Vec<BattingInningsRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, team, opposition, ground, start_date, runs, balls_faced,
                   strike_rate, fours, sixes, not_out, innings
            FROM batting
            WHERE player = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([player], |row| {
                Ok(BattingInningsRecord {
                    player: row.get(0)?,
                    team: row.get(1)?,
                    opposition: row.get(2)?,
                    ground: row.get(3)?,
                    date: date_column(row, 4)?,
                    runs: row.get(5)?,
                    balls_faced: row.get(6)?,
                    strike_rate: row.get(7)?,
                    fours: row.get(8)?,
                    sixes: row.get(9)?,
                    not_out: row.get(10)?,
                    innings: row.get(11)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Bowling innings for a player in scrape order
    pub fn bowling_rows(&self, player: &str) -> StatsResult<Vec<BowlingInningsRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, team, opposition, ground, start_date, overs, maidens,
                   runs_conceded, wickets, economy, innings
            FROM bowling
            WHERE player = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([player], |row| {
                Ok(BowlingInningsRecord {
                    player: row.get(0)?,
                    team: row.get(1)?,
                    opposition: row.get(2)?,
                    ground: row.get(3)?,
                    date: date_column(row, 4)?,
                    overs: row.get(5)?,
                    maidens: row.get(6)?,
                    runs_conceded: row.get(7)?,
                    wickets: row.get(8)?,
                    economy: row.get(9)?,
                    innings: row.get(10)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// All team innings; used to derive the host country of each ground
    pub fn team_rows(&self) -> StatsResult<Vec<TeamMatchRecord>> {
        self.query_team_rows("", &[])
    }

    /// Team innings of the side that played `opposition` at `ground` on `date`
    pub fn team_rows_for_match(
        &self,
        opposition: &str,
        ground: &str,
        date: NaiveDate,
    ) -> StatsResult<Vec<TeamMatchRecord>> {
        let date = date.format(DATE_FORMAT).to_string();
        self.query_team_rows(
            "WHERE opposition = ?1 AND ground = ?2 AND start_date = ?3",
            &[&opposition, &ground, &date],
        )
    }

    fn query_team_rows(
        &self,
        filter: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> StatsResult<Vec<TeamMatchRecord>> {
        let sql = format!(
            r#"
            SELECT team, opposition, ground, start_date, score, wickets, overs,
                   run_rate, lead, innings, declared, result
            FROM team
            {}
            ORDER BY id
            "#,
            filter
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt
            .query_map(args, |row| {
                let result: String = row.get(11)?;
                let result = MatchResult::parse(&result).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        11,
                        Type::Text,
                        format!("unknown match result: {}", result).into(),
                    )
                })?;

                Ok(TeamMatchRecord {
                    team: row.get(0)?,
                    opposition: row.get(1)?,
                    ground: row.get(2)?,
                    date: date_column(row, 3)?,
                    score: row.get(4)?,
                    wickets: row.get(5)?,
                    overs: row.get(6)?,
                    run_rate: row.get(7)?,
                    lead: row.get(8)?,
                    innings: row.get(9)?,
                    declared: row.get(10)?,
                    result,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn insert_team(tx: &Transaction<'_>, r: &TeamMatchRecord) -> rusqlite::Result<usize> {
    tx.execute(
        r#"
        INSERT OR IGNORE INTO team
        (team, opposition, ground, start_date, innings, score, wickets, overs,
         run_rate, lead, declared, result)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            r.team,
            r.opposition,
            r.ground,
            r.date.format(DATE_FORMAT).to_string(),
            r.innings,
            r.score,
            r.wickets,
            r.overs,
            r.run_rate,
            r.lead,
            r.declared,
            r.result.as_str(),
        ],
    )
}

fn insert_batting(tx: &Transaction<'_>, r: &BattingInningsRecord) -> rusqlite::Result<usize> {
    tx.execute(
        r#"
        INSERT OR IGNORE INTO batting
        (player, team, opposition, ground, start_date, innings, runs, balls_faced,
         strike_rate, fours, sixes, not_out)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            r.player,
            r.team,
            r.opposition,
            r.ground,
            r.date.format(DATE_FORMAT).to_string(),
            r.innings,
            r.runs,
            r.balls_faced,
            r.effective_strike_rate(),
            r.fours,
            r.sixes,
            r.not_out,
        ],
    )
}

fn insert_bowling(tx: &Transaction<'_>, r: &BowlingInningsRecord) -> rusqlite::Result<usize> {
    tx.execute(
        r#"
        INSERT OR IGNORE INTO bowling
        (player, team, opposition, ground, start_date, innings, overs, maidens,
         runs_conceded, wickets, economy)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            r.player,
            r.team,
            r.opposition,
            r.ground,
            r.date.format(DATE_FORMAT).to_string(),
            r.innings,
            r.overs,
            r.maidens,
            r.runs_conceded,
            r.wickets,
            r.effective_economy(),
        ],
    )
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_insert_and_read_batting() {
        let mut repo = StatsRepository::in_memory().unwrap();
        let rows = vec![
            Record::Batting(batting("JE Root", "India", "Lord's", date(2023, 7, 1), 80)),
            Record::Batting(batting("JE Root", "India", "Leeds", date(2023, 7, 8), 12)),
        ];

        let outcome = repo.insert_batch(&rows).unwrap();
        assert_eq!(outcome, InsertOutcome { inserted: 2, skipped: 0 });

        let stored = repo.batting_rows("JE Root").unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].runs, 80);
        assert_eq!(stored[0].strike_rate, Some(80.0));
        assert_eq!(stored[1].ground, "Leeds");
    }

    #[test]
    fn test_duplicate_key_keeps_first_row() {
        let mut repo = StatsRepository::in_memory().unwrap();
        let first = batting("JE Root", "India", "Lord's", date(2023, 7, 1), 80);
        let mut second = first.clone();
        second.runs = 3;

        repo.insert_batch(&[Record::Batting(first)]).unwrap();
        let outcome = repo.insert_batch(&[Record::Batting(second)]).unwrap();

        assert_eq!(outcome, InsertOutcome { inserted: 0, skipped: 1 });
        assert_eq!(repo.count(Category::Batting).unwrap(), 1);
        assert_eq!(repo.batting_rows("JE Root").unwrap()[0].runs, 80);
    }

    #[test]
    fn test_failed_batch_is_rolled_back() {
        let mut repo = StatsRepository::in_memory().unwrap();
        repo.conn
            .execute_batch(
                "CREATE TRIGGER reject_poison BEFORE INSERT ON batting
                 WHEN NEW.player = 'Poison'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let committed = vec![Record::Batting(batting("Earlier", "India", "Lord's", date(2023, 6, 1), 5))];
        repo.insert_batch(&committed).unwrap();

        let batch = vec![
            Record::Batting(batting("JE Root", "India", "Lord's", date(2023, 7, 1), 80)),
            Record::Batting(batting("Poison", "India", "Lord's", date(2023, 7, 1), 1)),
        ];
        let result = repo.insert_batch(&batch);

        assert!(matches!(result, Err(crate::error::StatsError::StoreUnavailable(_))));
        // Earlier batch survives, the failed one leaves nothing behind
        assert_eq!(repo.count(Category::Batting).unwrap(), 1);
        assert!(repo.batting_rows("JE Root").unwrap().is_empty());
    }

    #[test]
    fn test_latest_date_per_category() {
        let mut repo = StatsRepository::in_memory().unwrap();
        assert!(repo.latest_date(Category::Team).unwrap().is_none());

        repo.insert_batch(&[
            Record::Team(team("India", "Australia", "Delhi", date(2023, 2, 17), MatchResult::Win)),
            Record::Team(team("India", "Australia", "Indore", date(2023, 3, 1), MatchResult::Loss)),
            Record::Bowling(bowling("R Ashwin", "Australia", "Delhi", date(2023, 2, 17), 3)),
        ])
        .unwrap();

        assert_eq!(repo.latest_date(Category::Team).unwrap(), Some(date(2023, 3, 1)));
        assert_eq!(repo.latest_date(Category::Bowling).unwrap(), Some(date(2023, 2, 17)));
        assert!(repo.latest_date(Category::Batting).unwrap().is_none());
    }

    #[test]
    fn test_watermark_per_category() {
        let repo = StatsRepository::in_memory().unwrap();
        assert!(repo.watermark(Category::Batting).unwrap().is_none());

        repo.set_watermark(Category::Batting, date(2023, 6, 16)).unwrap();
        repo.set_watermark(Category::Batting, date(2023, 6, 1)).unwrap();

        assert_eq!(repo.watermark(Category::Batting).unwrap(), Some(date(2023, 6, 16)));
        assert!(repo.watermark(Category::Team).unwrap().is_none());
    }

    #[test]
    fn test_keys_since() {
        let mut repo = StatsRepository::in_memory().unwrap();
        repo.insert_batch(&[
            Record::Bowling(bowling("R Ashwin", "Australia", "Delhi", date(2023, 2, 17), 3)),
            Record::Bowling(bowling("R Ashwin", "Australia", "Indore", date(2023, 3, 1), 1)),
        ])
        .unwrap();

        let keys = repo.keys_since(Category::Bowling, date(2023, 3, 1)).unwrap();
        assert_eq!(keys.len(), 1);
        let key = keys.into_iter().next().unwrap();
        assert_eq!(key.subject, "R Ashwin");
        assert_eq!(key.ground, "Indore");
        assert_eq!(key.innings, 2);
    }

    #[test]
    fn test_players_and_team_rows() {
        let mut repo = StatsRepository::in_memory().unwrap();
        repo.insert_batch(&[
            Record::Bowling(bowling("R Ashwin", "Australia", "Delhi", date(2023, 2, 17), 3)),
            Record::Bowling(bowling("RA Jadeja", "Australia", "Delhi", date(2023, 2, 17), 7)),
            Record::Bowling(bowling("R Ashwin", "Australia", "Indore", date(2023, 3, 1), 1)),
            Record::Team(team("India", "Australia", "Delhi", date(2023, 2, 17), MatchResult::Win)),
        ])
        .unwrap();

        assert_eq!(
            repo.players(Category::Bowling).unwrap(),
            vec!["R Ashwin".to_string(), "RA Jadeja".to_string()]
        );

        let rows = repo
            .team_rows_for_match("Australia", "Delhi", date(2023, 2, 17))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].result, MatchResult::Win);
        assert!(repo
            .team_rows_for_match("Australia", "Delhi", date(2023, 2, 18))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_new_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.db");

        let repo = StatsRepository::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(repo.count(Category::Team).unwrap(), 0);
    }
}
