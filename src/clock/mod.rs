// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Race clock - the three-state timing state machine
//!
//! `NotStarted -> Running -> Stopped`, one way only. The start instant is set
//! exactly once on the transition to `Running`, and every finish event's
//! elapsed time is computed against it. A stopped clock is terminal; a new
//! race gets a new clock.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::error::ClockError;

/// Clock lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    NotStarted,
    Running,
    Stopped,
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockState::NotStarted => write!(f, "not started"),
            ClockState::Running => write!(f, "running"),
            ClockState::Stopped => write!(f, "stopped"),
        }
    }
}

struct ClockInner {
    state: ClockState,
    start_instant: Option<DateTime<Utc>>,
}

/// Shared race clock
///
/// State lives behind a mutex so the recorder and the shell can both hold the
/// clock through an `Arc` and call `&self` methods.
pub struct RaceClock {
    inner: Mutex<ClockInner>,
}

impl RaceClock {
    /// Create a clock in the `NotStarted` state
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ClockInner {
                state: ClockState::NotStarted,
                start_instant: None,
            }),
        }
    }

    /// Start the race, recording the start instant
    ///
    /// Fails with `AlreadyRunning` if the race is running and with
    /// `InvalidTransition` if it has already been stopped.
    pub fn start(&self) -> Result<DateTime<Utc>, ClockError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            ClockState::Running => Err(ClockError::AlreadyRunning),
            ClockState::Stopped => Err(ClockError::InvalidTransition),
            ClockState::NotStarted => {
                let now = Utc::now();
                inner.state = ClockState::Running;
                inner.start_instant = Some(now);
                info!("Race started at {}", now.format("%H:%M:%S"));
                Ok(now)
            }
        }
    }

    /// Stop the race
    ///
    /// Fails with `NotRunning` unless the clock is currently running; repeat
    /// calls are rejected, not silently ignored.
    pub fn stop(&self) -> Result<(), ClockError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            ClockState::Running => {
                inner.state = ClockState::Stopped;
                info!("Race stopped");
                Ok(())
            }
            _ => Err(ClockError::NotRunning),
        }
    }

    /// Current clock state
    pub fn state(&self) -> ClockState {
        self.inner.lock().unwrap().state
    }

    /// Whether finishes may currently be recorded
    pub fn is_running(&self) -> bool {
        self.state() == ClockState::Running
    }

    /// The instant the race started, if it ever did
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().unwrap().start_instant
    }

    /// The race's calendar date, derived from the start instant
    pub fn race_date(&self) -> Option<NaiveDate> {
        self.start_instant().map(|t| t.date_naive())
    }

    /// Seconds between the start instant and `instant`, never negative
    ///
    /// Defined whenever the race is or was running. Fails with
    /// `ClockNotStarted` before the first `start()`.
    pub fn elapsed_since_start(&self, instant: DateTime<Utc>) -> Result<f64, ClockError> {
        let start = self
            .start_instant()
            .ok_or(ClockError::ClockNotStarted)?;
        let secs = (instant - start).num_milliseconds() as f64 / 1000.0;
        Ok(secs.max(0.0))
    }
}

impl Default for RaceClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_transition_matrix() {
        let clock = RaceClock::new();
        assert_eq!(clock.state(), ClockState::NotStarted);
        assert_eq!(clock.stop(), Err(ClockError::NotRunning));

        clock.start().unwrap();
        assert_eq!(clock.state(), ClockState::Running);
        assert_eq!(clock.start().unwrap_err(), ClockError::AlreadyRunning);

        clock.stop().unwrap();
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(clock.stop(), Err(ClockError::NotRunning));
        assert_eq!(clock.start().unwrap_err(), ClockError::InvalidTransition);
    }

    #[test]
    fn test_start_instant_set_once() {
        let clock = RaceClock::new();
        assert!(clock.start_instant().is_none());
        let started = clock.start().unwrap();
        assert_eq!(clock.start_instant(), Some(started));
        assert_eq!(clock.race_date(), Some(started.date_naive()));
    }

    #[test]
    fn test_elapsed_requires_start() {
        let clock = RaceClock::new();
        assert_eq!(
            clock.elapsed_since_start(Utc::now()).unwrap_err(),
            ClockError::ClockNotStarted
        );
    }

    #[test]
    fn test_elapsed_non_negative() {
        let clock = RaceClock::new();
        let started = clock.start().unwrap();

        let later = started + Duration::milliseconds(61_250);
        assert_eq!(clock.elapsed_since_start(later).unwrap(), 61.25);

        // An instant at (or before) the start clamps to zero
        let earlier = started - Duration::seconds(5);
        assert_eq!(clock.elapsed_since_start(earlier).unwrap(), 0.0);
    }

    #[test]
    fn test_elapsed_still_defined_after_stop() {
        let clock = RaceClock::new();
        let started = clock.start().unwrap();
        clock.stop().unwrap();

        let later = started + Duration::seconds(90);
        assert_eq!(clock.elapsed_since_start(later).unwrap(), 90.0);
    }
}
