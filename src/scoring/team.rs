// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Cross-country team scoring
//!
//! A team's first five finishers score; the sum of their overall places is
//! the team total, lower winning. The sixth and seventh finishers are
//! displacers: reported separately and used only to break ties between equal
//! totals. Teams with fewer than five finishers do not score at all.

use std::collections::HashMap;

use serde::Serialize;

use super::{RankedFinish, DISPLACER_DEPTH, SCORING_DEPTH};

/// One team's score line, derived on demand and never persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScoreEntry {
    pub team: String,
    /// Overall places of the five scorers, ascending
    pub scorers: Vec<u32>,
    /// Overall places of the sixth and seventh finishers, if present
    pub displacers: Vec<u32>,
    /// Sum of the scorer places
    pub total: u32,
}

impl TeamScoreEntry {
    /// Place used at tie-break position `i`; a missing displacer counts as
    /// worse than any real place
    fn displacer(&self, i: usize) -> u32 {
        self.displacers.get(i).copied().unwrap_or(u32::MAX)
    }
}

/// Score all qualifying teams from an individual ranking
///
/// Unknown finishers (bib 0) carry the "UNKNOWN" team and score as a team of
/// their own if enough of them finished. Output is ordered ascending by
/// total, ties broken by first then second displacer, remaining ties in
/// first-arrival order (the sort is stable).
pub fn score(ranked: &[RankedFinish]) -> Vec<TeamScoreEntry> {
    let mut arrival: Vec<&str> = Vec::new();
    let mut places: HashMap<&str, Vec<u32>> = HashMap::new();

    for finish in ranked {
        let team = finish.team.as_str();
        if !places.contains_key(team) {
            arrival.push(team);
        }
        places.entry(team).or_default().push(finish.place);
    }

    let mut entries: Vec<TeamScoreEntry> = arrival
        .into_iter()
        .filter_map(|team| {
            let team_places = &places[team];
            if team_places.len() < SCORING_DEPTH {
                return None;
            }
            let scorers: Vec<u32> = team_places[..SCORING_DEPTH].to_vec();
            let displacers: Vec<u32> = team_places
                .iter()
                .skip(SCORING_DEPTH)
                .take(DISPLACER_DEPTH)
                .copied()
                .collect();
            Some(TeamScoreEntry {
                team: team.to_string(),
                total: scorers.iter().sum(),
                scorers,
                displacers,
            })
        })
        .collect();

    entries.sort_by_key(|e| (e.total, e.displacer(0), e.displacer(1)));
    entries
}
