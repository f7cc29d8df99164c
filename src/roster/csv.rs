// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Roster CSV import
//!
//! Reads `bib,name,team,rfid` files. The rfid column is optional, and a
//! header row is recognized and skipped. Records with an unparseable bib are
//! skipped with a warning so one bad row does not sink a whole import.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::Runner;

/// Load a roster file from disk
pub fn load_roster(path: &Path) -> Result<Vec<Runner>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file {:?}", path))?;
    let runners = parse_roster(&content);
    info!("Loaded {} runners from {:?}", runners.len(), path);
    Ok(runners)
}

/// Parse roster CSV content
pub fn parse_roster(content: &str) -> Vec<Runner> {
    let mut runners = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        // Header row
        if lineno == 0 && fields[0].eq_ignore_ascii_case("bib") {
            continue;
        }

        if fields.len() < 3 {
            warn!("Roster line {}: expected bib,name,team - skipped", lineno + 1);
            continue;
        }

        let bib: u32 = match fields[0].parse() {
            Ok(bib) if bib > 0 => bib,
            _ => {
                warn!(
                    "Roster line {}: invalid bib {:?} - skipped",
                    lineno + 1,
                    fields[0]
                );
                continue;
            }
        };

        let tag = fields
            .get(3)
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string());

        runners.push(Runner {
            bib,
            name: fields[1].to_string(),
            team: fields[2].to_string(),
            tag,
        });
    }

    runners
}
