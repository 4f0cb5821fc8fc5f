//! Time sources for net-sync throttling
//!
//! The throttle never reads a global clock. Hosts inject one of these:
//! - `MonotonicClock` - wall-independent seconds since creation
//! - `ManualClock` - driven explicitly, shared between clones

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Seconds on a monotonic timeline
pub type Seconds = f64;

/// A monotonic time source
pub trait SyncClock {
    /// Current time in seconds; never decreases
    fn now(&self) -> Seconds;
}

impl<C: SyncClock + ?Sized> SyncClock for &C {
    fn now(&self) -> Seconds {
        (**self).now()
    }
}

impl<C: SyncClock + ?Sized> SyncClock for Rc<C> {
    fn now(&self) -> Seconds {
        (**self).now()
    }
}

/// Clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncClock for MonotonicClock {
    fn now(&self) -> Seconds {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand
///
/// Clones share the same timeline, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Seconds>>,
}

impl ManualClock {
    /// Create a clock at time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock at a given time
    pub fn starting_at(now: Seconds) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Move the clock forward; negative steps are ignored
    pub fn advance(&self, seconds: Seconds) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    /// Jump to `now` if it is not in the past
    pub fn set(&self, now: Seconds) {
        if now > self.now.get() {
            self.now.set(now);
        }
    }
}

impl SyncClock for ManualClock {
    fn now(&self) -> Seconds {
        self.now.get()
    }
}
