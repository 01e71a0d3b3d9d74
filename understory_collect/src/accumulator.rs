// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pending contributions and the committed collection.

use alloc::vec::Vec;
use core::hash::Hash;
use core::mem;

use hashbrown::HashSet;

/// Net effect of one [`Accumulator::resolve`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Changes<T> {
    /// Items that entered the collection.
    pub added: Vec<T>,
    /// Items that left the collection.
    pub removed: Vec<T>,
}

impl<T> Changes<T> {
    /// Returns `true` if nothing was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Set arithmetic behind a [`Collector`](crate::Collector), without any timing.
///
/// Calls to [`collect`](Self::collect) and [`uncollect`](Self::uncollect) only
/// record intent. [`resolve`](Self::resolve) turns the recorded intent into the
/// net change against the committed collection:
///
/// - an item is added if it is pending-collect, not pending-uncollect, and not
///   already collected;
/// - an item is removed if it is pending-uncollect, not pending-collect, and
///   currently collected.
///
/// An item both collected and uncollected since the last resolve is left as
/// it was.
///
/// # Example
///
/// ```
/// use understory_collect::Accumulator;
///
/// let mut acc = Accumulator::new();
/// acc.collect("a");
/// acc.collect("b");
/// acc.uncollect("b");
///
/// let changes = acc.resolve().unwrap();
/// assert_eq!(changes.added, ["a"]);
/// assert!(changes.removed.is_empty());
/// assert!(acc.contains(&"a"));
/// assert!(!acc.contains(&"b"));
///
/// // Nothing pending: no change to report.
/// assert_eq!(acc.resolve(), None);
/// ```
#[derive(Clone, Debug)]
pub struct Accumulator<T>
where
    T: Clone + Eq + Hash,
{
    pending_collect: HashSet<T>,
    pending_uncollect: HashSet<T>,
    collection: HashSet<T>,
}

impl<T> Default for Accumulator<T>
where
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Accumulator<T>
where
    T: Clone + Eq + Hash,
{
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending_collect: HashSet::new(),
            pending_uncollect: HashSet::new(),
            collection: HashSet::new(),
        }
    }

    /// Records that `item` should be collected.
    ///
    /// Returns `true` if the item was not already pending-collect.
    pub fn collect(&mut self, item: T) -> bool {
        self.pending_collect.insert(item)
    }

    /// Records that `item` should be uncollected.
    ///
    /// Returns `true` if the item was not already pending-uncollect.
    pub fn uncollect(&mut self, item: T) -> bool {
        self.pending_uncollect.insert(item)
    }

    /// Returns `true` if any collect or uncollect is waiting to be resolved.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending_collect.is_empty() || !self.pending_uncollect.is_empty()
    }

    /// Iterates over items waiting to be collected.
    pub fn pending_collect(&self) -> impl Iterator<Item = &T> + '_ {
        self.pending_collect.iter()
    }

    /// Iterates over items waiting to be uncollected.
    pub fn pending_uncollect(&self) -> impl Iterator<Item = &T> + '_ {
        self.pending_uncollect.iter()
    }

    /// Iterates over the committed collection in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.collection.iter()
    }

    /// Returns `true` if `item` is in the committed collection.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.collection.contains(item)
    }

    /// Returns the number of committed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Returns `true` if the committed collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Copies the committed collection into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.collection.iter().cloned().collect()
    }

    /// Applies pending intent to the committed collection.
    ///
    /// The pending sets are always emptied. Returns `None` when the net
    /// effect is nothing, otherwise the items added and removed.
    pub fn resolve(&mut self) -> Option<Changes<T>> {
        let to_collect = mem::take(&mut self.pending_collect);
        let to_uncollect = mem::take(&mut self.pending_uncollect);

        let added: Vec<T> = to_collect
            .iter()
            .filter(|item| !to_uncollect.contains(*item) && !self.collection.contains(*item))
            .cloned()
            .collect();
        let removed: Vec<T> = to_uncollect
            .into_iter()
            .filter(|item| !to_collect.contains(item) && self.collection.contains(item))
            .collect();

        if added.is_empty() && removed.is_empty() {
            return None;
        }

        for item in &removed {
            self.collection.remove(item);
        }
        self.collection.extend(added.iter().cloned());

        Some(Changes { added, removed })
    }

    /// Drops all pending intent and empties the collection.
    ///
    /// Returns `true` if the committed collection was non-empty.
    pub fn clear(&mut self) -> bool {
        self.pending_collect.clear();
        self.pending_uncollect.clear();
        let had_items = !self.collection.is_empty();
        self.collection.clear();
        had_items
    }
}
