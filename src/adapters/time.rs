//! Monotonic time source for time-driven components.
//!
//! Components that detect timeouts in their poll handler (inter-frame
//! gaps, response timeouts) read elapsed time through [`Clock`] so tests
//! can substitute a manual clock.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Microsecond tick source.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin (monotonic).
    fn now_us(&self) -> u64;
}

/// Host clock backed by `std::time::Instant`.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Clock advanced by hand.  Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_us(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}
