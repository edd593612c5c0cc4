//! Wall-clock sources.

use std::cell::Cell;
use std::rc::Rc;

use chrono::Utc;

/// A source of wall-clock epochs in integer milliseconds.
pub trait Clock {
    /// Returns the current instant.
    fn now_ms(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-1970 clocks read as the epoch itself.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A hand-driven clock for tests and replays.
///
/// Clones share the same instant and read count, so a test can keep one
/// handle while the stopwatch owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
    reads: Rc<Cell<usize>>,
}

impl ManualClock {
    /// Creates a clock reading `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
            reads: Rc::new(Cell::new(0)),
        }
    }

    /// Moves the clock to an absolute instant, backwards included.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    /// How many times the clock has been sampled.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.reads.set(self.reads.get() + 1);
        self.now.get()
    }
}
