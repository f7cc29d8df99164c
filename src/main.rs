// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! FinishLine - Cross-Country Race Timing and Scoring
//!
//! Interactive console shell around the race engine: create or open a race
//! database, import a roster, run the live finish-entry mode, and display or
//! export the individual and team reports.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use finishline::db::next_race_db_path;
use finishline::export::{export_individual, export_teams};
use finishline::recorder::{FinishCue, SilentCue, TerminalBell};
use finishline::roster::load_roster;
use finishline::{ClockError, Config, RaceEngine, RecordError, VERSION};

/// FinishLine - Cross-Country Race Timing and Scoring
#[derive(Parser, Debug)]
#[command(name = "finishline")]
#[command(author = "FinishLine Project")]
#[command(version = VERSION)]
#[command(about = "Cross-country race timing and team scoring")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory for race databases and reports
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Open an existing race database on startup
    #[arg(long)]
    open: Option<PathBuf>,

    /// Import a roster CSV on startup
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Disable the terminal-bell finish cue
    #[arg(long)]
    silent: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("FinishLine v{} - race timing and scoring", VERSION);

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if args.silent {
        config.finish_cue = false;
    }

    let mut shell = Shell::new(config);

    if let Some(path) = args.open {
        shell.open_database(&path)?;
    }
    if let Some(path) = args.roster {
        shell.import_roster(&path)?;
    }

    shell.run()
}

/// Interactive menu shell over one optional race engine
struct Shell {
    config: Config,
    engine: Option<RaceEngine>,
    db_name: Option<String>,
}

impl Shell {
    fn new(config: Config) -> Self {
        Self {
            config,
            engine: None,
            db_name: None,
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu();
            let Some(choice) = prompt("Select an option: ")? else {
                break;
            };

            let result = match choice.as_str() {
                "1" => self.new_database(),
                "2" => self.open_database_prompt(),
                "3" => self.import_roster_prompt(),
                "4" => self.start_race(),
                "5" => self.show_individual(),
                "6" => self.show_teams(),
                "7" => self.show_runners(),
                "8" => self.export_reports(),
                "9" => break,
                _ => {
                    println!("Invalid choice.");
                    Ok(())
                }
            };

            if let Err(e) = result {
                println!("[ERROR] {:#}", e);
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_menu(&self) {
        println!("\n=== FinishLine Race Timing ===");
        match (&self.db_name, &self.engine) {
            (Some(name), Some(engine)) => {
                let summary = engine.summary();
                println!(
                    "Database: {} | clock: {} | runners: {} | finishes: {}",
                    name, summary.state, summary.runner_count, summary.finish_count
                );
            }
            _ => println!("No race database loaded."),
        }
        println!("1) New race database");
        println!("2) Open existing race database");
        println!("3) Import roster CSV");
        println!("4) Start race");
        println!("5) Individual results");
        println!("6) Team results");
        println!("7) Runners by team");
        println!("8) Export reports");
        println!("9) Quit");
    }

    fn engine(&self) -> Result<&RaceEngine> {
        match &self.engine {
            Some(engine) => Ok(engine),
            None => bail!("no race database loaded - create or open one first"),
        }
    }

    fn cue(&self) -> Box<dyn FinishCue> {
        if self.config.finish_cue {
            Box::new(TerminalBell)
        } else {
            Box::new(SilentCue)
        }
    }

    fn new_database(&mut self) -> Result<()> {
        let path = next_race_db_path(&self.config.data_dir)?;
        self.open_database(&path)
    }

    fn open_database(&mut self, path: &Path) -> Result<()> {
        // Bare filenames resolve under the data directory
        let path = if path.exists() || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.data_dir.join(path)
        };

        let engine = RaceEngine::open(&path, self.cue())?;
        self.db_name = Some(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        );
        self.engine = Some(engine);
        println!("Race database ready: {}", self.db_name.as_deref().unwrap_or("?"));
        Ok(())
    }

    fn open_database_prompt(&mut self) -> Result<()> {
        let Some(name) = prompt("Database filename (in data dir): ")? else {
            return Ok(());
        };
        if name.is_empty() {
            println!("No filename entered.");
            return Ok(());
        }
        self.open_database(Path::new(&name))
    }

    fn import_roster_prompt(&mut self) -> Result<()> {
        let Some(name) = prompt("Roster CSV filename (in data dir): ")? else {
            return Ok(());
        };
        if name.is_empty() {
            println!("No filename entered.");
            return Ok(());
        }
        self.import_roster(Path::new(&name))
    }

    fn import_roster(&mut self, path: &Path) -> Result<()> {
        let path = if path.exists() || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.data_dir.join(path)
        };

        let runners = load_roster(&path)?;
        let count = self.engine()?.load_runners(runners)?;
        println!("Imported {} runners from {:?}", count, path);
        Ok(())
    }

    fn start_race(&self) -> Result<()> {
        let engine = self.engine()?;
        match engine.start() {
            Ok(started) => {
                println!("Race started at {}", started.with_timezone(&Local).format("%H:%M:%S"));
            }
            Err(ClockError::AlreadyRunning) => {
                println!("Race is already running.");
            }
            Err(ClockError::InvalidTransition) => {
                println!("This race has already been run - create a new database for another race.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        self.live_input()
    }

    /// Live finish-entry mode: one line per finisher until `exit`
    fn live_input(&self) -> Result<()> {
        let engine = self.engine()?;

        println!("[INPUT MODE] Race is active. Enter bib number, or just Enter for an unknown finisher.");
        println!("Type 'exit' to stop the race and return to the menu.");

        loop {
            let input = match prompt("> ")? {
                Some(input) => input,
                None => {
                    // End of input stream stops the race
                    let _ = engine.stop();
                    break;
                }
            };

            if input.eq_ignore_ascii_case("exit") {
                match engine.stop() {
                    Ok(()) => println!("Race stopped. Returning to menu."),
                    Err(e) => println!("[WARNING] {}", e),
                }
                break;
            }

            match engine.record(&input) {
                Ok(event) => {
                    let bib_display = if event.bib == 0 {
                        "UNKNOWN".to_string()
                    } else {
                        event.bib.to_string()
                    };
                    println!("[RESULT] Bib {} finished in {:.2}s", bib_display, event.elapsed);
                }
                Err(RecordError::InvalidBib(raw)) => {
                    println!("[ERROR] Invalid bib number {:?} - nothing recorded, re-enter.", raw);
                }
                Err(RecordError::RaceNotActive) => {
                    println!("[WARNING] Race is not active - returning to menu.");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    fn show_individual(&self) -> Result<()> {
        let ranked = self.engine()?.rank()?;

        println!("\n=== Individual Results ===");
        if ranked.is_empty() {
            println!("No finishes recorded.");
            return Ok(());
        }
        for finish in &ranked {
            println!(
                "{:>3}. Bib: {:<4} Name: {:<24} Team: {:<16} Time: {:.2}s",
                finish.place, finish.bib, finish.name, finish.team, finish.elapsed
            );
        }
        Ok(())
    }

    fn show_teams(&self) -> Result<()> {
        let scored = self.engine()?.score()?;

        println!("\n=== Team Results (top 5 score, next 2 displace) ===");
        if scored.is_empty() {
            println!("No team has five finishers yet.");
            return Ok(());
        }
        for (i, entry) in scored.iter().enumerate() {
            println!("{}. {} - total {}", i + 1, entry.team, entry.total);
            println!("   Scorers (places): {}", join_places(&entry.scorers));
            if !entry.displacers.is_empty() {
                println!("   Displacers (places): {}", join_places(&entry.displacers));
            }
        }
        Ok(())
    }

    fn show_runners(&self) -> Result<()> {
        let grouped = self.engine()?.runners_by_team();

        println!("\n=== Runners by Team ===");
        if grouped.is_empty() {
            println!("No runners imported.");
            return Ok(());
        }
        for (team, members) in &grouped {
            println!("\nTeam: {}", team);
            for runner in members {
                println!("  Bib: {:<4} {}", runner.bib, runner.name);
            }
        }
        Ok(())
    }

    fn export_reports(&self) -> Result<()> {
        let engine = self.engine()?;
        let ranked = engine.rank()?;
        let scored = engine.score()?;

        let format = self.config.export.format;
        let stem = Local::now().format("%Y%m%d-%H%M%S");
        let individual_path = self
            .config
            .data_dir
            .join(format!("individual-{}.{}", stem, format.extension()));
        let teams_path = self
            .config
            .data_dir
            .join(format!("teams-{}.{}", stem, format.extension()));

        export_individual(&individual_path, &ranked, format)?;
        export_teams(&teams_path, &scored, format)?;

        println!("Reports written to {:?} and {:?}", individual_path, teams_path);
        Ok(())
    }
}

fn join_places(places: &[u32]) -> String {
    places
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prompt for one trimmed line; `None` means the input stream ended
fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
