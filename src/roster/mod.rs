// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Runner roster - the bib directory loaded before timing begins

mod csv;

pub use csv::{load_roster, parse_roster};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A registered runner
///
/// Bibs are unique within a race (conventionally 101-999). The optional tag
/// carries an external identifier such as an RFID chip id; the core stores it
/// but never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runner {
    pub bib: u32,
    pub name: String,
    pub team: String,
    pub tag: Option<String>,
}

/// In-memory bib directory
///
/// Bulk-loaded before the race; duplicate bibs overwrite prior entries.
/// Read-only during timing - corrections happen out of band.
#[derive(Debug, Default)]
pub struct RunnerDirectory {
    runners: HashMap<u32, Runner>,
}

impl RunnerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a single runner, keyed by bib
    pub fn upsert(&mut self, runner: Runner) {
        self.runners.insert(runner.bib, runner);
    }

    /// Bulk upsert, returning the number of entries applied
    pub fn load<I>(&mut self, runners: I) -> usize
    where
        I: IntoIterator<Item = Runner>,
    {
        let mut count = 0;
        for runner in runners {
            self.upsert(runner);
            count += 1;
        }
        count
    }

    /// Look up a runner by bib
    pub fn get(&self, bib: u32) -> Option<&Runner> {
        self.runners.get(&bib)
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// All runners as a vector, in no particular order
    pub fn all(&self) -> Vec<Runner> {
        self.runners.values().cloned().collect()
    }

    /// Runners grouped by team, teams alphabetical, bibs ascending within
    pub fn by_team(&self) -> Vec<(String, Vec<Runner>)> {
        let mut grouped: HashMap<&str, Vec<&Runner>> = HashMap::new();
        for runner in self.runners.values() {
            grouped.entry(runner.team.as_str()).or_default().push(runner);
        }

        let mut teams: Vec<(String, Vec<Runner>)> = grouped
            .into_iter()
            .map(|(team, mut members)| {
                members.sort_by_key(|r| r.bib);
                (team.to_string(), members.into_iter().cloned().collect())
            })
            .collect();
        teams.sort_by(|a, b| a.0.cmp(&b.0));
        teams
    }
}
