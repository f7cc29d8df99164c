// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Finish recorder - turns raw operator input into durable finish events
//!
//! Input contract: blank input records an unknown finisher (bib 0) for later
//! correction; non-numeric input records NOTHING and is rejected with
//! `InvalidBib`. The asymmetry is deliberate - downstream correction
//! workflows depend on bib-0 placeholders existing, while garbage input means
//! the operator should re-enter.

mod cue;

pub use cue::{FinishCue, SilentCue, TerminalBell};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::clock::RaceClock;
use crate::db::{Database, FinishEvent};
use crate::error::RecordError;

/// Records finishes against a shared clock and database
pub struct FinishRecorder {
    clock: Arc<RaceClock>,
    db: Arc<Database>,
    cue: Box<dyn FinishCue>,
}

impl FinishRecorder {
    /// Recorder with the terminal-bell confirmation cue
    pub fn new(clock: Arc<RaceClock>, db: Arc<Database>) -> Self {
        Self::with_cue(clock, db, Box::new(TerminalBell))
    }

    /// Recorder with an explicit cue implementation
    pub fn with_cue(clock: Arc<RaceClock>, db: Arc<Database>, cue: Box<dyn FinishCue>) -> Self {
        Self { clock, db, cue }
    }

    /// Record one finish from raw operator input
    ///
    /// Not idempotent: every successful call appends a distinct event. The
    /// bib is not checked against the roster - unknown bibs are persisted and
    /// surface later as "UNKNOWN" in reports.
    pub fn record(&self, raw: &str) -> Result<FinishEvent, RecordError> {
        if !self.clock.is_running() {
            return Err(RecordError::RaceNotActive);
        }

        let bib = resolve_bib(raw)?;

        let instant = Utc::now();
        let elapsed = self
            .clock
            .elapsed_since_start(instant)
            .map_err(|_| RecordError::RaceNotActive)?;
        let race_date = self
            .clock
            .race_date()
            .ok_or(RecordError::RaceNotActive)?;

        let event = self.db.append(bib, elapsed, race_date)?;
        info!(
            "Finish {} recorded: bib {} at {:.2}s",
            event.sequence, event.bib, event.elapsed
        );

        // Cue after the durable write; never fails the recording
        self.cue.confirm(&event);
        debug!("Finish cue emitted for sequence {}", event.sequence);

        Ok(event)
    }
}

/// Blank input means an unknown finisher; anything else must be a bib number
fn resolve_bib(raw: &str) -> Result<u32, RecordError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| RecordError::InvalidBib(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::cue::testing::CountingCue;
    use super::*;
    use std::sync::atomic::Ordering;

    fn recorder_with_counter() -> (FinishRecorder, Arc<RaceClock>, Arc<Database>, Arc<std::sync::atomic::AtomicUsize>) {
        let clock = Arc::new(RaceClock::new());
        let db = Arc::new(Database::open_in_memory().unwrap());
        let (cue, confirmed) = CountingCue::new();
        let recorder = FinishRecorder::with_cue(clock.clone(), db.clone(), Box::new(cue));
        (recorder, clock, db, confirmed)
    }

    #[test]
    fn test_record_rejected_before_start() {
        let (recorder, _clock, db, _) = recorder_with_counter();

        let err = recorder.record("150").unwrap_err();
        assert!(matches!(err, RecordError::RaceNotActive));
        assert_eq!(db.event_count().unwrap(), 0);
    }

    #[test]
    fn test_record_rejected_after_stop() {
        let (recorder, clock, db, _) = recorder_with_counter();
        clock.start().unwrap();
        recorder.record("101").unwrap();
        clock.stop().unwrap();

        let err = recorder.record("102").unwrap_err();
        assert!(matches!(err, RecordError::RaceNotActive));
        assert_eq!(db.event_count().unwrap(), 1);
    }

    #[test]
    fn test_blank_records_bib_zero_garbage_records_nothing() {
        let (recorder, clock, db, _) = recorder_with_counter();
        clock.start().unwrap();

        let event = recorder.record("   ").unwrap();
        assert_eq!(event.bib, 0);

        let err = recorder.record("abc").unwrap_err();
        assert!(matches!(err, RecordError::InvalidBib(_)));

        // Only the blank input produced an event
        assert_eq!(db.event_count().unwrap(), 1);
    }

    #[test]
    fn test_record_is_not_idempotent() {
        let (recorder, clock, db, _) = recorder_with_counter();
        clock.start().unwrap();

        let first = recorder.record("150").unwrap();
        let second = recorder.record("150").unwrap();

        assert!(second.sequence > first.sequence);
        assert_eq!(db.event_count().unwrap(), 2);
    }

    #[test]
    fn test_store_length_matches_valid_calls() {
        let (recorder, clock, db, _) = recorder_with_counter();
        clock.start().unwrap();

        let inputs = ["101", "", "205", " 330 ", ""];
        let mut last_sequence = 0;
        for input in inputs {
            let event = recorder.record(input).unwrap();
            assert!(event.sequence > last_sequence);
            assert!(event.elapsed >= 0.0);
            last_sequence = event.sequence;
        }

        assert_eq!(db.event_count().unwrap(), inputs.len() as u64);
    }

    #[test]
    fn test_elapsed_non_decreasing_in_insertion_order() {
        let (recorder, clock, db, _) = recorder_with_counter();
        clock.start().unwrap();

        for input in ["101", "102", "", "103"] {
            recorder.record(input).unwrap();
        }

        let events = db.events_in_finish_order().unwrap();
        for pair in events.windows(2) {
            assert!(pair[1].elapsed >= pair[0].elapsed);
        }
    }

    #[test]
    fn test_cue_fires_per_recorded_finish_only() {
        let (recorder, clock, _db, confirmed) = recorder_with_counter();
        clock.start().unwrap();

        recorder.record("101").unwrap();
        recorder.record("").unwrap();
        let _ = recorder.record("garbage");

        assert_eq!(confirmed.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_unknown_bib_still_persisted() {
        let (recorder, clock, db, _) = recorder_with_counter();
        clock.start().unwrap();

        // 777 has no roster entry; the event is recorded anyway
        recorder.record("777").unwrap();
        let joined = db.joined_by_elapsed().unwrap();
        assert_eq!(joined[0].bib, 777);
        assert_eq!(joined[0].name, crate::db::UNKNOWN);
    }
}
