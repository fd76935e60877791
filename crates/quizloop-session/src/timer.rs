//! Elapsed-time counter driven by an external once-per-second tick.
//!
//! The periodic process that produces ticks keeps firing for the whole
//! session; pausing only gates whether a tick is counted.

use serde::{Deserialize, Serialize};

/// Formats a number of seconds as `MM:SS`.
///
/// Minutes are zero-padded to two digits and are not rolled over into hours.
///
/// # Examples
///
/// ```
/// use quizloop_session::format_clock;
///
/// assert_eq!(format_clock(0), "00:00");
/// assert_eq!(format_clock(75), "01:15");
/// assert_eq!(format_clock(3_725), "62:05");
/// ```
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Pausable elapsed-seconds counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTimer {
    elapsed_seconds: u64,
    running: bool,
    paused: bool,
}

impl ElapsedTimer {
    /// Creates a stopped timer at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed_seconds: 0,
            running: false,
            paused: false,
        }
    }

    /// Resets to zero and starts counting.
    pub fn start(&mut self) {
        *self = Self {
            elapsed_seconds: 0,
            running: true,
            paused: false,
        };
    }

    /// Stops counting ticks; the elapsed value is kept.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes counting ticks after [`ElapsedTimer::pause`].
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Stops the timer for good; later ticks are ignored until the next start.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resets to a stopped timer at zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Counts one tick.
    ///
    /// Returns the new elapsed value, or `None` when the tick was ignored
    /// because the timer is stopped or paused.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.is_counting() {
            return None;
        }
        self.elapsed_seconds += 1;
        Some(self.elapsed_seconds)
    }

    /// Elapsed whole seconds.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Elapsed time as `MM:SS`.
    #[must_use]
    pub fn clock(&self) -> String {
        format_clock(self.elapsed_seconds)
    }

    /// Returns `true` between start and stop, whether paused or not.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns `true` if the next tick will be counted.
    #[must_use]
    pub const fn is_counting(&self) -> bool {
        self.running && !self.paused
    }
}
