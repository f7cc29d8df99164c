// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Scoring module - individual ranking and cross-country team scores
//!
//! Both scorers are pure functions over one snapshot of the joined finish
//! log, so they are safe to call while recording continues and trivially
//! repeatable: the same snapshot always produces the same report.

mod individual;
mod team;

pub use individual::{rank, RankedFinish};
pub use team::{score, TeamScoreEntry};

/// Finishers whose places sum to the team total
pub const SCORING_DEPTH: usize = 5;

/// Additional finishers reported for tie-breaking only
pub const DISPLACER_DEPTH: usize = 2;
