//! Time sources for the frame loop.
//!
//! Core state machines take the current time as a plain [`Duration`] since
//! session start, so they can be driven without sleeping. The frame loop reads
//! that value from a [`Clock`].

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time since the session started
pub trait Clock {
    /// Elapsed time since the clock was created
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    current: Cell<Duration>,
}

impl ManualClock {
    /// Start a clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    /// Jump to an absolute time
    pub fn set(&self, to: Duration) {
        self.current.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.current.get()
    }
}
