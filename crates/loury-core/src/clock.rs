#![forbid(unsafe_code)]

//! Monotonic frame clocks.
//!
//! The host samples a [`FrameClock`] once per display frame and hands the
//! reading to [`FrameScheduler::run_frame`](crate::FrameScheduler::run_frame).
//! Browsers pass the `requestAnimationFrame` timestamp; tests use
//! [`DeterministicClock`].
//!
//! A scheduler built with
//! [`FrameScheduler::with_clock`](crate::FrameScheduler::with_clock) also
//! reads the clock whenever work is posted, so a host may stop its frame loop
//! while the scheduler is idle without shortening later transitions.

use core::cell::Cell;
use core::time::Duration;

use web_time::Instant;

/// Source of monotonic timestamps, measured from an arbitrary origin.
pub trait FrameClock {
    /// Current monotonic time.
    fn now_mono(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host.
///
/// Advancing takes `&self`, so one clock can be shared (`Rc`) between the
/// test driving time and the scheduler reading it.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Cell<Duration>,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
        }
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&self, now: Duration) {
        self.now.set(self.now.get().max(now));
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl FrameClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now.get()
    }
}

/// Wall-clock backed monotonic clock (`performance.now()` on wasm).
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock whose origin is the moment of construction.
    #[must_use]
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

impl FrameClock for MonotonicClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_clock_advances() {
        let clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now_mono(), Duration::from_millis(32));
    }

    #[test]
    fn deterministic_clock_never_goes_backwards() {
        let clock = DeterministicClock::new();
        clock.set(Duration::from_millis(100));
        clock.set(Duration::from_millis(40));
        assert_eq!(clock.now_mono(), Duration::from_millis(100));
    }

    #[test]
    fn monotonic_clock_is_non_decreasing() {
        let clock = MonotonicClock::new();
        let a = clock.now_mono();
        let b = clock.now_mono();
        assert!(b >= a);
    }
}
