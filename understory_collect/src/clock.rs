// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time sources for the debounce timer.
//!
//! The collector never reads the system time on its own. It asks a [`Clock`]
//! for a monotonic timestamp whenever a contribution arrives and when the host
//! polls it. Timestamps are plain `u64` ticks in whatever unit the host picks;
//! the debounce delay is expressed in the same unit.

use alloc::rc::Rc;
use core::cell::Cell;

/// A monotonic source of timestamps.
///
/// Implementations must never go backwards. Any `Fn() -> u64` closure is a
/// clock, which is convenient when the host already tracks frame time.
///
/// # Example
///
/// ```
/// use understory_collect::Clock;
///
/// let frame_time = || 1_000_u64;
/// assert_eq!(frame_time.now(), 1_000);
/// ```
pub trait Clock {
    /// Returns the current timestamp.
    fn now(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64,
{
    fn now(&self) -> u64 {
        self()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a host (or a test) can keep one
/// copy to advance while the collector owns another.
///
/// # Example
///
/// ```
/// use understory_collect::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let shared = clock.clone();
///
/// clock.advance(20);
/// assert_eq!(shared.now(), 20);
///
/// clock.set(100);
/// assert_eq!(shared.now(), 100);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock reading `now`.
    #[must_use]
    pub fn starting_at(now: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Sets the current time.
    ///
    /// Callers are responsible for keeping the clock monotonic.
    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    /// Moves the clock forward by `ticks`, saturating at `u64::MAX`.
    pub fn advance(&self, ticks: u64) {
        self.now.set(self.now.get().saturating_add(ticks));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}

/// Wall-clock milliseconds elapsed since the clock was created.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Creates a clock whose zero is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
