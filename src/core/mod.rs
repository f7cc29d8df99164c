// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Core module - orchestrates the timing and scoring engine

mod engine;

pub use engine::RaceEngine;

use chrono::{DateTime, Utc};

use crate::clock::ClockState;

/// Race-wide state snapshot for shell displays
#[derive(Debug, Clone)]
pub struct RaceSummary {
    pub state: ClockState,
    pub started_at: Option<DateTime<Utc>>,
    pub runner_count: usize,
    pub finish_count: u64,
}
