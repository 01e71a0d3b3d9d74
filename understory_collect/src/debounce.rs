// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge debounce deadline.

/// Default debounce delay, in clock ticks.
pub const DEFAULT_DELAY: u64 = 20;

/// A single restartable deadline.
///
/// `Debounce` is the timer handle of a [`Collector`](crate::Collector). It does
/// not sleep or spawn anything: it only remembers when the next flush is due.
/// Every [`restart`](Self::restart) replaces the previous deadline, so a burst
/// of activity fires once, `delay` ticks after the *last* event.
///
/// # Example
///
/// ```
/// use understory_collect::Debounce;
///
/// let mut debounce = Debounce::new(20);
/// debounce.restart(0);
/// debounce.restart(15);
///
/// assert!(!debounce.is_due(30));
/// assert!(debounce.fire(35));
/// assert!(!debounce.is_armed());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Debounce {
    delay: u64,
    deadline: Option<u64>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Debounce {
    /// Creates a disarmed debounce with the given delay.
    #[must_use]
    pub const fn new(delay: u64) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> u64 {
        self.delay
    }

    /// Returns the pending deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Returns `true` while a deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Cancels any pending deadline and schedules a new one at `now + delay`.
    ///
    /// Returns the new deadline.
    pub fn restart(&mut self, now: u64) -> u64 {
        let deadline = now.saturating_add(self.delay);
        self.deadline = Some(deadline);
        deadline
    }

    /// Cancels the pending deadline.
    ///
    /// Returns `true` if a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Returns `true` if a deadline is pending and `now` has reached it.
    #[must_use]
    pub fn is_due(&self, now: u64) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarms and returns `true` if the deadline is due at `now`.
    pub fn fire(&mut self, now: u64) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
