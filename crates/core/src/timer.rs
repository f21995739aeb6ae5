//! Simulation clock and timed holds.
//!
//! Timestamps in the event log are wall-clock time since the clock was
//! created. A hold blocks the calling flow for its full duration; nothing
//! cancels or shortens it.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

/// Source of elapsed time and the "simulate a timed hold" primitive.
pub trait Clock: Send {
    /// Time elapsed since the clock started.
    fn elapsed(&self) -> Duration;

    /// Blocks until `duration` has passed.
    fn hold(&self, duration: Duration);
}

/// Real-time clock backed by [`Instant`] and [`thread::sleep`].
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    /// Starts a clock at zero.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WallClock")
            .field("elapsed", &self.start.elapsed())
            .finish()
    }
}

impl Clock for WallClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn hold(&self, duration: Duration) {
        // sleep may wake early on some platforms; loop until the deadline.
        let deadline = Instant::now() + duration;
        let mut now = Instant::now();
        while now < deadline {
            thread::sleep(deadline - now);
            now = Instant::now();
        }
    }
}

/// Formats a timestamp as seconds with six decimals (`0.012345`).
pub fn format_timestamp(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}
