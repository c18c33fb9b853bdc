//! Tick sources.
//!
//! The store never reads a clock itself; callers pass `now`. These are the
//! clocks a forwarder (or the trim task) uses to produce it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::message::Ticks;

/// Something that can tell the current tick.
pub trait TickClock: Send + Sync {
    fn now(&self) -> Ticks;
}

// == Monotonic Clock ==
/// Ticks elapsed since construction, at a fixed tick length.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    tick: Duration,
}

impl MonotonicClock {
    /// Creates a clock with the given tick length.
    ///
    /// A zero tick length is treated as one millisecond.
    pub fn new(tick: Duration) -> Self {
        let tick = if tick.is_zero() {
            Duration::from_millis(1)
        } else {
            tick
        };
        Self {
            origin: Instant::now(),
            tick,
        }
    }

    /// One tick per millisecond.
    pub fn millis() -> Self {
        Self::new(Duration::from_millis(1))
    }

    pub fn tick_length(&self) -> Duration {
        self.tick
    }
}

impl TickClock for MonotonicClock {
    fn now(&self) -> Ticks {
        ticks_in(self.origin.elapsed(), self.tick)
    }
}

/// Whole ticks in `elapsed`, saturating at `Ticks::MAX`.
fn ticks_in(elapsed: Duration, tick: Duration) -> Ticks {
    Ticks::try_from(elapsed.as_nanos() / tick.as_nanos()).unwrap_or(Ticks::MAX)
}

// == Manual Clock ==
/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Ticks) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Ticks) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Moves the clock forward and returns the new tick.
    pub fn advance(&self, ticks: Ticks) -> Ticks {
        self.now.fetch_add(ticks, Ordering::SeqCst) + ticks
    }
}

impl TickClock for ManualClock {
    fn now(&self) -> Ticks {
        self.now.load(Ordering::SeqCst)
    }
}
