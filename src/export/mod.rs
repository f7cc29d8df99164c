// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Report export - writes the two reports to CSV or JSON files
//!
//! Export is a pure read: it formats already-computed report rows and never
//! touches the results store.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scoring::{RankedFinish, TeamScoreEntry};

/// Supported report file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Write the individual ranking to `path`
pub fn export_individual(
    path: &Path,
    ranked: &[RankedFinish],
    format: ReportFormat,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report file {:?}", path))?;
    let mut writer = BufWriter::new(file);

    match format {
        ReportFormat::Csv => {
            writeln!(writer, "place,bib,name,team,elapsed")?;
            for finish in ranked {
                writeln!(
                    writer,
                    "{},{},{},{},{:.2}",
                    finish.place, finish.bib, finish.name, finish.team, finish.elapsed
                )?;
            }
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(ranked)?;
            writeln!(writer, "{}", json)?;
        }
    }

    writer.flush()?;
    info!("Exported {} individual results to {:?}", ranked.len(), path);
    Ok(())
}

/// Write the team score report to `path`
pub fn export_teams(path: &Path, entries: &[TeamScoreEntry], format: ReportFormat) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report file {:?}", path))?;
    let mut writer = BufWriter::new(file);

    match format {
        ReportFormat::Csv => {
            writeln!(writer, "rank,team,total,scorers,displacers")?;
            for (i, entry) in entries.iter().enumerate() {
                writeln!(
                    writer,
                    "{},{},{},{},{}",
                    i + 1,
                    entry.team,
                    entry.total,
                    join_places(&entry.scorers),
                    join_places(&entry.displacers)
                )?;
            }
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(entries)?;
            writeln!(writer, "{}", json)?;
        }
    }

    writer.flush()?;
    info!("Exported {} team scores to {:?}", entries.len(), path);
    Ok(())
}

fn join_places(places: &[u32]) -> String {
    places
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked() -> Vec<RankedFinish> {
        vec![
            RankedFinish {
                place: 1,
                bib: 103,
                name: "Ada".to_string(),
                team: "North".to_string(),
                elapsed: 61.5,
            },
            RankedFinish {
                place: 2,
                bib: 0,
                name: "UNKNOWN".to_string(),
                team: "UNKNOWN".to_string(),
                elapsed: 62.25,
            },
        ]
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("finishline-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_individual_csv_layout() {
        let path = temp_path("individual.csv");
        export_individual(&path, &ranked(), ReportFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "place,bib,name,team,elapsed");
        assert_eq!(lines[1], "1,103,Ada,North,61.50");
        assert_eq!(lines[2], "2,0,UNKNOWN,UNKNOWN,62.25");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_individual_json_round_trips() {
        let path = temp_path("individual.json");
        export_individual(&path, &ranked(), ReportFormat::Json).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["bib"], 103);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_team_csv_layout() {
        let entries = vec![TeamScoreEntry {
            team: "North".to_string(),
            scorers: vec![1, 3, 4, 6, 7],
            displacers: vec![9],
            total: 21,
        }];

        let path = temp_path("teams.csv");
        export_teams(&path, &entries, ReportFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "rank,team,total,scorers,displacers");
        assert_eq!(lines[1], "1,North,21,1 3 4 6 7,9");

        let _ = std::fs::remove_file(&path);
    }
}
