// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/finishline-rs

//! Finish confirmation cues
//!
//! A cue acknowledges a recorded finish to the operator. Cues are strictly
//! best-effort: emission happens after the durable write and can never fail
//! the recording.

use std::io::Write;

use tracing::debug;

use crate::db::FinishEvent;

/// Emitted after every successful finish append
pub trait FinishCue: Send + Sync {
    fn confirm(&self, event: &FinishEvent);
}

/// Rings the terminal bell
pub struct TerminalBell;

impl FinishCue for TerminalBell {
    fn confirm(&self, event: &FinishEvent) {
        let mut out = std::io::stdout();
        if out.write_all(b"\x07").and_then(|_| out.flush()).is_err() {
            debug!("Finish cue for sequence {} could not be emitted", event.sequence);
        }
    }
}

/// No-op cue for headless operation
pub struct SilentCue;

impl FinishCue for SilentCue {
    fn confirm(&self, _event: &FinishEvent) {}
}

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Counts confirmations, for recorder tests
    pub struct CountingCue {
        confirmed: Arc<AtomicUsize>,
    }

    impl CountingCue {
        pub fn new() -> (Self, Arc<AtomicUsize>) {
            let confirmed = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    confirmed: confirmed.clone(),
                },
                confirmed,
            )
        }
    }

    impl FinishCue for CountingCue {
        fn confirm(&self, _event: &FinishEvent) {
            self.confirmed.fetch_add(1, Ordering::Relaxed);
        }
    }
}
