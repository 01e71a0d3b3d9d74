// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_collect --heading-base-level=0

//! Understory Collect: let an ancestor collect items contributed by its subtree.
//!
//! A node near the root of a UI tree often needs to know which of its
//! descendants are currently mounted, or more precisely what those descendants
//! bring with them: state reducers for the visible screens, keyboard shortcuts,
//! menu entries, styles. This crate lets descendants *contribute* opaque items
//! while they are mounted and lets the ancestor observe the deduplicated set,
//! updated as the tree re-renders.
//!
//! Re-rendering typically unmounts and mounts many nodes in one pass. To avoid
//! reporting every intermediate state, contributions are buffered and
//! debounced: the ancestor is notified once, after the burst has settled, with
//! the net result.
//!
//! ## Pieces
//!
//! - [`Collector`]: owns the collection and the debounce deadline, and invokes
//!   an `on_change` callback with the full collection after each settled
//!   change. Built with [`CollectorBuilder`].
//! - [`CollectorHandle`]: the `collect`/`uncollect` capability pair, cloned and
//!   passed down the tree explicitly. It does not keep the collector alive.
//! - [`Contribution`]: a guard that collects an item on creation and
//!   uncollects it on drop.
//! - [`Collecting`] / [`Mounted`]: a wrapper for tree nodes that contributes a
//!   fixed item while mounted, or hands the handle to the node for manual
//!   reporting.
//! - [`Accumulator`] and [`Debounce`]: the set arithmetic and the deadline,
//!   usable on their own.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_collect::{Collecting, Collector, ManualClock};
//!
//! let clock = ManualClock::new();
//! let seen: Rc<RefCell<Vec<Vec<&str>>>> = Rc::default();
//! let sink = Rc::clone(&seen);
//!
//! let mut collector = Collector::builder()
//!     .clock(clock.clone())
//!     .on_change(move |items: &[&'static str]| sink.borrow_mut().push(items.to_vec()))
//!     .build()
//!     .unwrap();
//!
//! // A render pass mounts a wrapped node.
//! let node = Collecting::with_item("todos", "TodoList").mount(&collector.handle());
//!
//! // The host sleeps until the deadline and polls.
//! clock.set(collector.deadline().unwrap());
//! collector.poll();
//! assert_eq!(*seen.borrow(), [vec!["todos"]]);
//!
//! // The next pass unmounts it.
//! drop(node);
//! clock.advance(collector.delay());
//! collector.poll();
//! assert_eq!(seen.borrow().last(), Some(&vec![]));
//! ```
//!
//! ## Debouncing
//!
//! Every `collect` or `uncollect` moves the deadline to `now + delay`
//! ([`DEFAULT_DELAY`] ticks unless configured), so a burst of calls produces a
//! single notification, `delay` ticks after the last call. The collector does
//! not own a timer thread: the host asks [`Collector::deadline`] when to wake
//! and calls [`Collector::poll`] then. Time comes from a [`Clock`]; use
//! [`ManualClock`] when the host already tracks frame time, or the default
//! `StdClock` with the `std` feature.
//!
//! ## Conflict rule
//!
//! Within one cycle an item both collected and uncollected is left as it was:
//! it is neither added nor removed. Collecting an item that is already in the
//! collection, or uncollecting one that is not, is a no-op. When the net
//! change is empty, `on_change` is not called.
//!
//! ## Teardown
//!
//! Dropping the [`Collector`] cancels the deadline, detaches every handle, and,
//! if anything was collected, calls `on_change` synchronously with an empty
//! slice.
//!
//! ## Identity
//!
//! Items are deduplicated with `Eq`. Wrap values in [`ItemRef`] to compare them
//! by `Rc` address instead.
//!
//! ## Features
//!
//! - `std` (default): enables `StdClock` and uses it as the default clock.
//! - `tracing`: emits `tracing` events when flushes are scheduled, when the
//!   collection changes, and at teardown.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod accumulator;
mod clock;
pub mod collecting;
mod collector;
mod contribution;
mod debounce;
mod error;
mod item;

pub use accumulator::{Accumulator, Changes};
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{Clock, ManualClock};
pub use collecting::{Collecting, Component, Mounted, component_name};
pub use collector::{Collector, CollectorBuilder, CollectorHandle, OnChange};
pub use contribution::Contribution;
pub use debounce::{DEFAULT_DELAY, Debounce};
pub use error::ConfigError;
pub use item::ItemRef;
