// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Race engine - the contract surface consumed by the shell
//!
//! Owns the clock, the roster directory, the race database and the finish
//! recorder, and exposes clock control, finish recording, the two reports and
//! the roster views. One engine instance corresponds to one race database.

use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use super::RaceSummary;
use crate::clock::{ClockState, RaceClock};
use crate::db::{Database, FinishEvent};
use crate::error::{ClockError, QueryError, RecordError};
use crate::recorder::{FinishCue, FinishRecorder};
use crate::roster::{Runner, RunnerDirectory};
use crate::scoring::{self, RankedFinish, TeamScoreEntry};

/// Orchestrator for one race
pub struct RaceEngine {
    db: Arc<Database>,
    clock: Arc<RaceClock>,
    directory: RwLock<RunnerDirectory>,
    recorder: FinishRecorder,
}

impl RaceEngine {
    /// Open a race database file and build an engine around it
    ///
    /// Any roster already stored in the file is loaded into the directory, so
    /// reopening an earlier race restores its runners.
    pub fn open(path: &Path, cue: Box<dyn FinishCue>) -> Result<Self> {
        let db = Arc::new(Database::open(path)?);
        Self::with_database(db, cue)
    }

    /// Engine over an in-memory database, used by tests
    pub fn open_in_memory(cue: Box<dyn FinishCue>) -> Result<Self> {
        let db = Arc::new(Database::open_in_memory()?);
        Self::with_database(db, cue)
    }

    fn with_database(db: Arc<Database>, cue: Box<dyn FinishCue>) -> Result<Self> {
        let mut directory = RunnerDirectory::new();
        let stored = db.load_runners()?;
        if !stored.is_empty() {
            let count = directory.load(stored);
            info!("Restored {} runners from the race database", count);
        }

        let clock = Arc::new(RaceClock::new());
        let recorder = FinishRecorder::with_cue(clock.clone(), db.clone(), cue);

        Ok(Self {
            db,
            clock,
            directory: RwLock::new(directory),
            recorder,
        })
    }

    /// Bulk upsert runners into the directory and its database mirror
    ///
    /// Rejected while the race is running: the roster is read-only during
    /// timing and corrections happen out of band.
    pub fn load_runners(&self, runners: Vec<Runner>) -> Result<usize> {
        if self.clock.is_running() {
            bail!("roster is frozen while the race is running");
        }

        self.db.upsert_runners(&runners)?;
        let count = self.directory.write().unwrap().load(runners);
        info!("Roster updated: {} entries applied", count);
        Ok(count)
    }

    /// Start the race clock
    pub fn start(&self) -> Result<DateTime<Utc>, ClockError> {
        self.clock.start()
    }

    /// Stop the race clock
    pub fn stop(&self) -> Result<(), ClockError> {
        self.clock.stop()
    }

    /// Current clock state
    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    /// Record one finish from raw operator input
    pub fn record(&self, raw: &str) -> Result<FinishEvent, RecordError> {
        self.recorder.record(raw)
    }

    /// Individual finish-order ranking
    pub fn rank(&self) -> Result<Vec<RankedFinish>, QueryError> {
        let snapshot = self.db.joined_by_elapsed()?;
        Ok(scoring::rank(&snapshot))
    }

    /// Team scores over the current ranking
    pub fn score(&self) -> Result<Vec<TeamScoreEntry>, QueryError> {
        let ranked = self.rank()?;
        Ok(scoring::score(&ranked))
    }

    /// Roster grouped by team for shell display
    pub fn runners_by_team(&self) -> Vec<(String, Vec<Runner>)> {
        self.directory.read().unwrap().by_team()
    }

    /// Number of recorded finishes
    pub fn event_count(&self) -> Result<u64, QueryError> {
        self.db.event_count()
    }

    /// Snapshot of race-wide state for the shell
    pub fn summary(&self) -> RaceSummary {
        RaceSummary {
            state: self.clock.state(),
            started_at: self.clock.start_instant(),
            runner_count: self.directory.read().unwrap().len(),
            finish_count: self.db.event_count().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::SilentCue;

    fn engine() -> RaceEngine {
        RaceEngine::open_in_memory(Box::new(SilentCue)).unwrap()
    }

    fn runner(bib: u32, name: &str, team: &str) -> Runner {
        Runner {
            bib,
            name: name.to_string(),
            team: team.to_string(),
            tag: None,
        }
    }

    fn roster_team(engine: &RaceEngine, team: &str, first_bib: u32, count: u32) {
        let runners: Vec<Runner> = (0..count)
            .map(|i| runner(first_bib + i, &format!("{} {}", team, i + 1), team))
            .collect();
        engine.load_runners(runners).unwrap();
    }

    #[test]
    fn test_record_denied_until_started() {
        let engine = engine();
        assert!(matches!(
            engine.record("101").unwrap_err(),
            RecordError::RaceNotActive
        ));
        assert_eq!(engine.event_count().unwrap(), 0);
    }

    #[test]
    fn test_roster_frozen_while_running() {
        let engine = engine();
        roster_team(&engine, "North", 101, 2);

        engine.start().unwrap();
        assert!(engine.load_runners(vec![runner(201, "Late", "South")]).is_err());

        engine.stop().unwrap();
        engine.load_runners(vec![runner(201, "Late", "South")]).unwrap();
        assert_eq!(engine.summary().runner_count, 3);
    }

    #[test]
    fn test_rank_joins_roster_and_orders_by_elapsed() {
        let engine = engine();
        roster_team(&engine, "North", 101, 3);

        engine.start().unwrap();
        engine.record("103").unwrap();
        engine.record("101").unwrap();
        engine.record("").unwrap();
        engine.stop().unwrap();

        let ranked = engine.rank().unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].place, 1);
        assert_eq!(ranked[0].bib, 103);
        assert_eq!(ranked[0].team, "North");
        assert_eq!(ranked[2].bib, 0);
        assert_eq!(ranked[2].name, crate::db::UNKNOWN);
    }

    #[test]
    fn test_reports_idempotent_between_records() {
        let engine = engine();
        roster_team(&engine, "North", 101, 5);
        roster_team(&engine, "South", 201, 5);

        engine.start().unwrap();
        for bib in [101, 201, 102, 202, 103, 203, 104, 204, 105, 205] {
            engine.record(&bib.to_string()).unwrap();
        }

        assert_eq!(engine.rank().unwrap(), engine.rank().unwrap());
        assert_eq!(engine.score().unwrap(), engine.score().unwrap());
    }

    #[test]
    fn test_score_end_to_end() {
        let engine = engine();
        roster_team(&engine, "North", 101, 5);
        roster_team(&engine, "South", 201, 5);

        engine.start().unwrap();
        // North takes places 1,3,4,6,7; South takes 2,5,8,9,10
        for bib in [101, 201, 102, 103, 202, 104, 105, 203, 204, 205] {
            engine.record(&bib.to_string()).unwrap();
        }
        engine.stop().unwrap();

        let scored = engine.score().unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].team, "North");
        assert_eq!(scored[0].total, 21);
        assert_eq!(scored[1].team, "South");
        assert_eq!(scored[1].total, 34);
    }

    #[test]
    fn test_summary_tracks_race() {
        let engine = engine();
        roster_team(&engine, "North", 101, 2);

        let summary = engine.summary();
        assert_eq!(summary.state, ClockState::NotStarted);
        assert_eq!(summary.runner_count, 2);
        assert_eq!(summary.finish_count, 0);

        engine.start().unwrap();
        engine.record("101").unwrap();
        let summary = engine.summary();
        assert_eq!(summary.state, ClockState::Running);
        assert!(summary.started_at.is_some());
        assert_eq!(summary.finish_count, 1);
    }
}
