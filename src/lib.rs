// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! FinishLine - Cross-Country Race Timing and Scoring
//!
//! A native console application for timing foot races: it captures a start
//! instant, accepts a live stream of bib-number finish events, persists each
//! event with its elapsed time, and derives the individual finish-order
//! ranking and cross-country team scores (5 scorers + 2 displacers).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Race Engine                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────┐   ┌──────────┐   ┌──────────┐   ┌─────────┐  │
//! │  │ Roster │   │   Race   │ → │  Finish  │ → │ Results │  │
//! │  │  CSV   │   │  Clock   │   │ Recorder │   │   Log   │  │
//! │  └────────┘   └──────────┘   └──────────┘   └─────────┘  │
//! │      ↓                                          ↓        │
//! │  ┌──────────────────────────┐   ┌─────────────────────┐  │
//! │  │   SQLite race database   │ → │  Individual / Team  │  │
//! │  │   (one file per race)    │   │      Scoring        │  │
//! │  └──────────────────────────┘   └─────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod clock;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod export;
pub mod recorder;
pub mod roster;
pub mod scoring;

// Re-exports for convenience
pub use clock::{ClockState, RaceClock};
pub use config::Config;
pub use self::core::{RaceEngine, RaceSummary};
pub use db::{Database, FinishEvent, JoinedFinish};
pub use error::{ClockError, QueryError, RecordError};
pub use export::ReportFormat;
pub use recorder::{FinishCue, FinishRecorder};
pub use roster::{Runner, RunnerDirectory};
pub use scoring::{RankedFinish, TeamScoreEntry};

/// FinishLine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// FinishLine name
pub const NAME: &str = "FinishLine";
