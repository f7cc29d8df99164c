// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Individual finish-order ranking

use serde::Serialize;

use crate::db::JoinedFinish;

/// One line of the individual results report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFinish {
    pub place: u32,
    pub bib: u32,
    pub name: String,
    pub team: String,
    pub elapsed: f64,
}

/// Assign 1-based places in the order the store query produced
///
/// The snapshot is already sorted by ascending elapsed time with insertion
/// order breaking ties, so no re-sorting happens here. An empty snapshot
/// yields an empty ranking.
pub fn rank(snapshot: &[JoinedFinish]) -> Vec<RankedFinish> {
    snapshot
        .iter()
        .enumerate()
        .map(|(i, finish)| RankedFinish {
            place: i as u32 + 1,
            bib: finish.bib,
            name: finish.name.clone(),
            team: finish.team.clone(),
            elapsed: finish.elapsed,
        })
        .collect()
}
