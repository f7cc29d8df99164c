// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Database module - per-race SQLite storage
//!
//! One database file per race: a `runners` table mirroring the roster and an
//! append-only `results` log. The connection mutex is the single
//! serialization point for appends, so sequence ids are strictly increasing
//! even when more than one input source records finishes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::QueryError;
use crate::roster::Runner;

/// Placeholder name/team for finishes whose bib has no roster entry
pub const UNKNOWN: &str = "UNKNOWN";

/// One recorded finish, immutable after insert
///
/// The sequence id is assigned by the store and is the definitive finish
/// order; bib 0 marks an unknown finisher pending manual correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishEvent {
    pub sequence: i64,
    pub bib: u32,
    pub elapsed: f64,
    pub race_date: NaiveDate,
}

/// A finish row joined against the roster for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedFinish {
    pub sequence: i64,
    pub bib: u32,
    pub name: String,
    pub team: String,
    pub elapsed: f64,
}

/// Race database handle
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create a race database file
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        "#,
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.create_tables()?;

        info!("Race database opened at {:?}", path);
        Ok(db)
    }

    /// Open an in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.create_tables()?;
        Ok(db)
    }

    /// Create database tables
    fn create_tables(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Roster mirror, upserted on import
            CREATE TABLE IF NOT EXISTS runners (
                bib INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                team TEXT NOT NULL,
                tag TEXT
            );

            -- Append-only finish log; id is the finish sequence
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                bib INTEGER NOT NULL,
                elapsed REAL NOT NULL,
                race_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_results_elapsed ON results(elapsed);
        "#,
        )?;

        Ok(())
    }

    /// Bulk upsert runners in one transaction
    pub fn upsert_runners(&self, runners: &[Runner]) -> Result<usize> {
        let conn = self.conn.lock().unwrap();

        let tx = conn.unchecked_transaction()?;
        let mut count = 0;

        for runner in runners {
            tx.execute(
                "INSERT OR REPLACE INTO runners (bib, name, team, tag) VALUES (?1, ?2, ?3, ?4)",
                params![runner.bib, runner.name, runner.team, runner.tag],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// All roster entries currently in the database
    ///
    /// Used to rebuild the in-memory directory when reopening a race file.
    pub fn load_runners(&self) -> Result<Vec<Runner>, QueryError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare("SELECT bib, name, team, tag FROM runners ORDER BY bib ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Runner {
                bib: row.get(0)?,
                name: row.get(1)?,
                team: row.get(2)?,
                tag: row.get(3)?,
            })
        })?;

        let mut runners = Vec::new();
        for row in rows {
            runners.push(row?);
        }

        Ok(runners)
    }

    /// Append one finish and return it with its assigned sequence id
    ///
    /// Insert and sequence assignment happen under one lock acquisition.
    pub fn append(
        &self,
        bib: u32,
        elapsed: f64,
        race_date: NaiveDate,
    ) -> Result<FinishEvent, QueryError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO results (bib, elapsed, race_date) VALUES (?1, ?2, ?3)",
            params![bib, elapsed, race_date.format("%Y-%m-%d").to_string()],
        )?;

        Ok(FinishEvent {
            sequence: conn.last_insert_rowid(),
            bib,
            elapsed,
            race_date,
        })
    }

    /// One consistent snapshot of all finishes joined against the roster
    ///
    /// Ordered by ascending elapsed time, ties broken by insertion sequence.
    /// Finishes with no roster entry surface with name/team "UNKNOWN" rather
    /// than being dropped.
    pub fn joined_by_elapsed(&self) -> Result<Vec<JoinedFinish>, QueryError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT
                results.id,
                results.bib,
                COALESCE(runners.name, 'UNKNOWN'),
                COALESCE(runners.team, 'UNKNOWN'),
                results.elapsed
            FROM results
            LEFT JOIN runners ON results.bib = runners.bib
            ORDER BY results.elapsed ASC, results.id ASC
        "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(JoinedFinish {
                sequence: row.get(0)?,
                bib: row.get(1)?,
                name: row.get(2)?,
                team: row.get(3)?,
                elapsed: row.get(4)?,
            })
        })?;

        let mut finishes = Vec::new();
        for row in rows {
            finishes.push(row?);
        }

        Ok(finishes)
    }

    /// All finishes in insertion order
    pub fn events_in_finish_order(&self) -> Result<Vec<FinishEvent>, QueryError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt =
            conn.prepare("SELECT id, bib, elapsed, race_date FROM results ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            let date: String = row.get(3)?;
            let race_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(FinishEvent {
                sequence: row.get(0)?,
                bib: row.get(1)?,
                elapsed: row.get(2)?,
                race_date,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }

        Ok(events)
    }

    /// Number of recorded finishes
    pub fn event_count(&self) -> Result<u64, QueryError> {
        let conn = self.conn.lock().unwrap();

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Path for a new race database: `YYYYMMDD-NN-race.db` under `data_dir`
///
/// NN is a two-digit sequence unique for the calendar day; the first race of
/// the day gets 01.
pub fn next_race_db_path(data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;

    let today = Local::now().format("%Y%m%d").to_string();
    let prefix = format!("{}-", today);

    let mut max_seq = 0u32;
    for entry in std::fs::read_dir(data_dir)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        if let Some(seq) = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix("-race.db"))
            .and_then(|seq| seq.parse::<u32>().ok())
        {
            max_seq = max_seq.max(seq);
        }
    }

    Ok(data_dir.join(format!("{}-{:02}-race.db", today, max_seq + 1)))
}
