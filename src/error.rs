// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Error types for the timing and scoring core
//!
//! Clock and record errors are user-correctable: the shell prints them and
//! re-prompts. Query errors indicate the results store itself failed.

use thiserror::Error;

/// Race clock state machine errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClockError {
    /// `start()` called while the race is already running
    #[error("race is already running")]
    AlreadyRunning,

    /// `stop()` called while the race is not running
    #[error("race is not running")]
    NotRunning,

    /// `start()` called on a stopped clock; a stopped race cannot restart
    #[error("race has already been stopped")]
    InvalidTransition,

    /// Elapsed time requested before the race was ever started
    #[error("race clock has not been started")]
    ClockNotStarted,
}

/// Finish recording errors
#[derive(Error, Debug)]
pub enum RecordError {
    /// A finish arrived while the clock was not in the running state
    #[error("cannot record a finish while the race is not active")]
    RaceNotActive,

    /// Input was non-blank but did not parse as a bib number.
    /// Nothing is recorded; blank input records bib 0 instead.
    #[error("invalid bib number: {0:?}")]
    InvalidBib(String),

    /// The results store rejected the append
    #[error("results store failed: {0}")]
    Store(#[from] QueryError),
}

/// Results store read errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// Underlying store unreachable or the query failed
    #[error("results store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}
