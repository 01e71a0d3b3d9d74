// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning collector, its builder, and the handle passed to descendants.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::hash::Hash;

use crate::accumulator::{Accumulator, Changes};
use crate::clock::Clock;
use crate::contribution::Contribution;
use crate::debounce::{DEFAULT_DELAY, Debounce};
use crate::error::ConfigError;

/// Callback invoked with the full collection after each settled change.
pub type OnChange<T> = Box<dyn FnMut(&[T])>;

/// State shared between a [`Collector`] and its handles.
struct Shared<T>
where
    T: Clone + Eq + Hash,
{
    accumulator: RefCell<Accumulator<T>>,
    debounce: Cell<Debounce>,
    clock: Box<dyn Clock>,
    closed: Cell<bool>,
}

impl<T> Shared<T>
where
    T: Clone + Eq + Hash,
{
    fn collect(&self, item: T) {
        if self.closed.get() {
            return;
        }
        self.accumulator.borrow_mut().collect(item);
        self.schedule();
    }

    fn uncollect(&self, item: T) {
        if self.closed.get() {
            return;
        }
        self.accumulator.borrow_mut().uncollect(item);
        self.schedule();
    }

    fn schedule(&self) {
        let mut debounce = self.debounce.get();
        let _deadline = debounce.restart(self.clock.now());
        self.debounce.set(debounce);
        #[cfg(feature = "tracing")]
        tracing::trace!(deadline = _deadline, "collector flush scheduled");
    }

    fn cancel(&self) {
        let mut debounce = self.debounce.get();
        debounce.cancel();
        self.debounce.set(debounce);
    }
}

/// Collects items contributed by a dynamic set of descendants.
///
/// A `Collector` owns the committed collection and a debounce deadline. Calls
/// to [`collect`](Self::collect) and [`uncollect`](Self::uncollect), made
/// directly or through a [`CollectorHandle`], are buffered. Each call pushes
/// the deadline to `now + delay`; once the host observes that the deadline has
/// passed and calls [`poll`](Self::poll), the net change is applied and the
/// `on_change` callback runs once with the whole collection.
///
/// Dropping the collector (or calling [`teardown`](Self::teardown)) cancels
/// the deadline. If anything was collected, `on_change` is called one last
/// time with an empty slice.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_collect::{Collector, ManualClock};
///
/// let clock = ManualClock::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = Rc::clone(&seen);
///
/// let mut collector = Collector::<&'static str>::builder()
///     .clock(clock.clone())
///     .on_change(move |items| log.borrow_mut().push(items.to_vec()))
///     .build()
///     .unwrap();
///
/// let handle = collector.handle();
/// handle.collect("reducer");
///
/// clock.advance(19);
/// assert!(collector.poll().is_none());
/// clock.advance(1);
/// assert!(collector.poll().is_some());
///
/// assert_eq!(*seen.borrow(), [vec!["reducer"]]);
/// ```
pub struct Collector<T>
where
    T: Clone + Eq + Hash,
{
    shared: Rc<Shared<T>>,
    on_change: OnChange<T>,
    revision: u64,
}

impl<T> fmt::Debug for Collector<T>
where
    T: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accumulator = self.shared.accumulator.borrow();
        f.debug_struct("Collector")
            .field("len", &accumulator.len())
            .field("has_pending", &accumulator.has_pending())
            .field("debounce", &self.shared.debounce.get())
            .field("closed", &self.shared.closed.get())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl<T> Collector<T>
where
    T: Clone + Eq + Hash,
{
    /// Starts configuring a collector.
    #[must_use]
    pub fn builder() -> CollectorBuilder<T> {
        CollectorBuilder::new()
    }

    /// Returns a handle that descendants use to contribute items.
    ///
    /// Handles do not keep the collector alive.
    #[must_use]
    pub fn handle(&self) -> CollectorHandle<T> {
        CollectorHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Marks `item` for collection and restarts the debounce.
    pub fn collect(&self, item: T) {
        self.shared.collect(item);
    }

    /// Marks `item` for removal and restarts the debounce.
    pub fn uncollect(&self, item: T) {
        self.shared.uncollect(item);
    }

    /// Returns the configured debounce delay.
    #[must_use]
    pub fn delay(&self) -> u64 {
        self.shared.debounce.get().delay()
    }

    /// Returns the time at which the host should next call [`poll`](Self::poll).
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.shared.debounce.get().deadline()
    }

    /// Flushes if the debounce deadline has passed.
    ///
    /// Returns the applied changes when `on_change` was invoked.
    pub fn poll(&mut self) -> Option<Changes<T>> {
        let mut debounce = self.shared.debounce.get();
        if !debounce.fire(self.shared.clock.now()) {
            return None;
        }
        self.shared.debounce.set(debounce);
        self.flush()
    }

    /// Cancels the debounce and applies pending changes immediately.
    ///
    /// Pending sets are cleared before `on_change` runs, so any collect or
    /// uncollect made from inside the callback starts a new cycle. Returns
    /// `None`, without invoking `on_change`, when the net change is empty.
    pub fn flush(&mut self) -> Option<Changes<T>> {
        if self.shared.closed.get() {
            return None;
        }
        self.shared.cancel();

        let (changes, snapshot) = {
            let mut accumulator = self.shared.accumulator.borrow_mut();
            let changes = accumulator.resolve()?;
            (changes, accumulator.to_vec())
        };

        self.revision += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            added = changes.added.len(),
            removed = changes.removed.len(),
            len = snapshot.len(),
            revision = self.revision,
            "collection changed"
        );
        (self.on_change)(&snapshot);
        Some(changes)
    }

    /// Returns the number of `on_change` notifications emitted so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Copies the committed collection, in unspecified order.
    #[must_use]
    pub fn collection(&self) -> Vec<T> {
        self.shared.accumulator.borrow().to_vec()
    }

    /// Returns the number of committed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.accumulator.borrow().len()
    }

    /// Returns `true` if nothing is committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.accumulator.borrow().is_empty()
    }

    /// Returns `true` if `item` is committed.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.shared.accumulator.borrow().contains(item)
    }

    /// Returns `true` if collects or uncollects are waiting for a flush.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.shared.accumulator.borrow().has_pending()
    }

    /// Tears the collector down.
    ///
    /// Equivalent to dropping it.
    pub fn teardown(self) {
        drop(self);
    }

    fn close(&mut self) {
        if self.shared.closed.replace(true) {
            return;
        }
        self.shared.cancel();
        let had_items = self.shared.accumulator.borrow_mut().clear();
        if had_items {
            self.revision += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(revision = self.revision, "collector torn down with items");
            (self.on_change)(&[]);
        }
    }
}

impl<T> Drop for Collector<T>
where
    T: Clone + Eq + Hash,
{
    fn drop(&mut self) {
        self.close();
    }
}

/// Builder for [`Collector`].
///
/// An `on_change` callback is required. With the `std` feature the clock
/// defaults to [`StdClock`](crate::StdClock); without it a clock must be
/// supplied.
///
/// # Example
///
/// ```
/// use understory_collect::{Collector, ConfigError, ManualClock};
///
/// let missing = Collector::<u32>::builder().clock(ManualClock::new()).build();
/// assert_eq!(missing.unwrap_err(), ConfigError::MissingOnChange);
///
/// let collector = Collector::<u32>::builder()
///     .clock(ManualClock::new())
///     .delay(50)
///     .on_change(|_| {})
///     .build()
///     .unwrap();
/// assert_eq!(collector.delay(), 50);
/// ```
pub struct CollectorBuilder<T> {
    on_change: Option<OnChange<T>>,
    delay: u64,
    clock: Option<Box<dyn Clock>>,
}

// Manual Debug impl since callbacks aren't Debug
impl<T> fmt::Debug for CollectorBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorBuilder")
            .field("has_on_change", &self.on_change.is_some())
            .field("delay", &self.delay)
            .field("has_clock", &self.clock.is_some())
            .finish()
    }
}

impl<T> Default for CollectorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectorBuilder<T> {
    /// Creates a builder with the default delay and no callback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_change: None,
            delay: DEFAULT_DELAY,
            clock: None,
        }
    }

    /// Sets the callback that receives the collection after each change.
    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[T]) + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Sets the debounce delay in clock ticks.
    #[must_use]
    pub fn delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the time source.
    #[must_use]
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Validates the configuration and builds the [`Collector`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingOnChange`] if no callback was set.
    /// - [`ConfigError::MissingClock`] if no clock was set and the `std`
    ///   feature is disabled.
    pub fn build(self) -> Result<Collector<T>, ConfigError>
    where
        T: Clone + Eq + Hash,
    {
        let Some(on_change) = self.on_change else {
            return Err(ConfigError::MissingOnChange);
        };
        let clock = match self.clock {
            Some(clock) => clock,
            None => default_clock()?,
        };
        Ok(Collector {
            shared: Rc::new(Shared {
                accumulator: RefCell::new(Accumulator::new()),
                debounce: Cell::new(Debounce::new(self.delay)),
                clock,
                closed: Cell::new(false),
            }),
            on_change,
            revision: 0,
        })
    }
}

#[cfg(feature = "std")]
fn default_clock() -> Result<Box<dyn Clock>, ConfigError> {
    Ok(Box::new(crate::clock::StdClock::new()))
}

#[cfg(not(feature = "std"))]
fn default_clock() -> Result<Box<dyn Clock>, ConfigError> {
    Err(ConfigError::MissingClock)
}

/// The `collect`/`uncollect` capability pair handed to descendants.
///
/// Pass it down the tree explicitly: as a constructor argument, a field on a
/// context struct, or whatever scope object the host already threads through
/// its nodes. Handles are cheap to clone and hold only a weak reference, so
/// once the collector is gone every call is silently ignored.
pub struct CollectorHandle<T>
where
    T: Clone + Eq + Hash,
{
    shared: Weak<Shared<T>>,
}

impl<T> Clone for CollectorHandle<T>
where
    T: Clone + Eq + Hash,
{
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for CollectorHandle<T>
where
    T: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<T> CollectorHandle<T>
where
    T: Clone + Eq + Hash,
{
    /// Marks `item` for collection.
    pub fn collect(&self, item: T) {
        if let Some(shared) = self.shared.upgrade() {
            shared.collect(item);
        }
    }

    /// Marks `item` for removal.
    pub fn uncollect(&self, item: T) {
        if let Some(shared) = self.shared.upgrade() {
            shared.uncollect(item);
        }
    }

    /// Collects `item` now and uncollects it when the returned guard drops.
    pub fn contribute(&self, item: T) -> Contribution<T> {
        Contribution::new(self.clone(), item)
    }

    /// Returns `true` while the collector is alive and not torn down.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| !shared.closed.get())
    }
}
