// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped contributions.

use core::fmt;
use core::hash::Hash;

use crate::collector::CollectorHandle;

/// An item collected for as long as this guard lives.
///
/// Created by [`CollectorHandle::contribute`]. The item is collected when the
/// guard is created and uncollected when it is dropped or
/// [`withdraw`](Self::withdraw)n, so the release runs on every exit path of
/// the owning scope, unwinding included.
///
/// # Example
///
/// ```
/// use understory_collect::{Collector, ManualClock};
///
/// let clock = ManualClock::new();
/// let mut collector = Collector::<u32>::builder()
///     .clock(clock.clone())
///     .on_change(|_| {})
///     .build()
///     .unwrap();
///
/// let contribution = collector.handle().contribute(7);
/// collector.flush();
/// assert!(collector.contains(&7));
///
/// drop(contribution);
/// collector.flush();
/// assert!(collector.is_empty());
/// ```
#[must_use = "dropping a contribution uncollects its item immediately"]
pub struct Contribution<T>
where
    T: Clone + Eq + Hash,
{
    handle: CollectorHandle<T>,
    item: Option<T>,
}

impl<T> Contribution<T>
where
    T: Clone + Eq + Hash,
{
    pub(crate) fn new(handle: CollectorHandle<T>, item: T) -> Self {
        handle.collect(item.clone());
        Self {
            handle,
            item: Some(item),
        }
    }

    /// Returns the contributed item.
    #[must_use]
    pub fn item(&self) -> &T {
        // Only `withdraw` and `drop` take the item, and both consume the guard.
        match &self.item {
            Some(item) => item,
            None => unreachable!("contribution item taken before the guard ended"),
        }
    }

    /// Returns the handle this contribution reports to.
    #[must_use]
    pub fn handle(&self) -> &CollectorHandle<T> {
        &self.handle
    }

    /// Uncollects the item now and hands it back.
    pub fn withdraw(mut self) -> T {
        let item = self.release();
        match item {
            Some(item) => item,
            None => unreachable!("contribution item taken before the guard ended"),
        }
    }

    fn release(&mut self) -> Option<T> {
        let item = self.item.take()?;
        self.handle.uncollect(item.clone());
        Some(item)
    }
}

impl<T> Drop for Contribution<T>
where
    T: Clone + Eq + Hash,
{
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> fmt::Debug for Contribution<T>
where
    T: Clone + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contribution")
            .field("item", &self.item)
            .field("attached", &self.handle.is_attached())
            .finish()
    }
}
