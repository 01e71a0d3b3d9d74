// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_collect` crate.
//!
//! These drive a `Collector` the way a host tree would: render passes mount
//! and unmount wrapped nodes, a manual clock stands in for the event loop, and
//! a recording callback captures every notification.

use std::cell::RefCell;
use std::rc::Rc;

use understory_collect::{
    Collecting, Collector, CollectorHandle, ConfigError, DEFAULT_DELAY, ItemRef, ManualClock,
};

type Calls<T> = Rc<RefCell<Vec<Vec<T>>>>;

struct Harness<T>
where
    T: Clone + Eq + std::hash::Hash + 'static,
{
    clock: ManualClock,
    collector: Option<Collector<T>>,
    calls: Calls<T>,
}

impl<T> Harness<T>
where
    T: Clone + Eq + std::hash::Hash + 'static,
{
    fn new() -> Self {
        let clock = ManualClock::new();
        let calls: Calls<T> = Rc::default();
        let sink = Rc::clone(&calls);
        let collector = Collector::builder()
            .clock(clock.clone())
            .on_change(move |items: &[T]| sink.borrow_mut().push(items.to_vec()))
            .build()
            .unwrap();
        Self {
            clock,
            collector: Some(collector),
            calls,
        }
    }

    fn collector(&mut self) -> &mut Collector<T> {
        self.collector.as_mut().unwrap()
    }

    fn handle(&mut self) -> CollectorHandle<T> {
        self.collector().handle()
    }

    /// Lets time pass and polls like an event loop would.
    fn wait(&mut self, ticks: u64) {
        self.clock.advance(ticks);
        self.collector().poll();
    }

    fn unmount_root(&mut self) {
        self.collector.take();
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[test]
fn construction_without_callback_fails() {
    let result = Collector::<u32>::builder()
        .clock(ManualClock::new())
        .delay(5)
        .build();
    assert_eq!(result.unwrap_err(), ConfigError::MissingOnChange);
}

#[test]
fn repeated_collect_is_idempotent() {
    let mut once = Harness::<u32>::new();
    once.handle().collect(1);
    once.wait(DEFAULT_DELAY);

    let mut thrice = Harness::<u32>::new();
    let handle = thrice.handle();
    for _ in 0..3 {
        handle.collect(1);
    }
    thrice.wait(DEFAULT_DELAY);

    assert_eq!(*once.calls.borrow(), *thrice.calls.borrow());
    assert_eq!(*once.calls.borrow(), vec![vec![1]]);
}

#[test]
fn collect_then_uncollect_is_silent() {
    let mut h = Harness::<u32>::new();
    let handle = h.handle();
    handle.collect(1);
    handle.uncollect(1);
    h.wait(DEFAULT_DELAY * 5);
    assert_eq!(h.call_count(), 0);
}

#[test]
fn burst_produces_one_notification() {
    let mut h = Harness::<u32>::new();
    let handle = h.handle();

    for item in 0..50 {
        handle.collect(item);
        // Never quite long enough for the deadline to pass.
        h.wait(DEFAULT_DELAY - 1);
    }
    for item in 0..10 {
        handle.uncollect(item);
        h.wait(DEFAULT_DELAY - 1);
    }
    assert_eq!(h.call_count(), 0);

    h.wait(1);
    assert_eq!(h.call_count(), 1);

    let mut last = h.calls.borrow()[0].clone();
    last.sort_unstable();
    assert_eq!(last, (10..50).collect::<Vec<_>>());
}

#[test]
fn flush_fires_after_last_call_not_first() {
    let mut h = Harness::<u32>::new();
    let handle = h.handle();

    handle.collect(1);
    h.wait(10);
    handle.collect(2);
    h.wait(10);
    assert_eq!(h.call_count(), 0, "deadline counted from the first call");
    h.wait(10);
    assert_eq!(h.call_count(), 1);
}

#[test]
fn teardown_notifies_once_when_non_empty() {
    let mut h = Harness::<u32>::new();
    h.handle().collect(1);
    h.wait(DEFAULT_DELAY);
    assert_eq!(h.call_count(), 1);

    h.unmount_root();
    assert_eq!(*h.calls.borrow(), vec![vec![1], vec![]]);
}

#[test]
fn teardown_is_silent_when_empty() {
    let mut h = Harness::<u32>::new();
    h.unmount_root();
    assert_eq!(h.call_count(), 0);
}

#[test]
fn teardown_cancels_pending_flush() {
    let mut h = Harness::<u32>::new();
    let handle = h.handle();
    handle.collect(1);
    h.wait(DEFAULT_DELAY);

    handle.collect(2);
    h.unmount_root();
    assert_eq!(h.call_count(), 2);

    // A handle held past teardown must not revive anything.
    handle.collect(3);
    h.clock.advance(DEFAULT_DELAY * 2);
    assert!(!handle.is_attached());
    assert_eq!(h.call_count(), 2);
}

#[test]
fn mount_wait_unmount() {
    let item = ItemRef::new("reducer");
    let mut h = Harness::<ItemRef<&str>>::new();

    let mounted = Collecting::with_item(item.clone(), "MockComponent").mount(&h.handle());
    assert_eq!(mounted.item(), Some(&item));

    h.wait(200);
    assert_eq!(h.call_count(), 1);
    assert_eq!(h.calls.borrow()[0], vec![item.clone()]);

    drop(mounted);
    h.wait(DEFAULT_DELAY);
    assert_eq!(h.call_count(), 2);
    assert!(h.calls.borrow()[1].is_empty());
}

#[test]
fn unmounting_root_with_mounted_child() {
    let item = ItemRef::new(());
    let mut h = Harness::<ItemRef<()>>::new();

    let mounted = Collecting::with_item(item.clone(), ()).mount(&h.handle());
    h.wait(200);
    assert_eq!(h.call_count(), 1);

    // The root goes first; the child's late uncollect has nowhere to go.
    h.unmount_root();
    assert_eq!(h.call_count(), 2);
    assert!(h.calls.borrow()[1].is_empty());
    drop(mounted);
    assert_eq!(h.call_count(), 2);
}

#[test]
fn mount_and_unmount_in_same_burst_never_notifies() {
    let mut h = Harness::<ItemRef<u8>>::new();
    let mounted = Collecting::with_item(ItemRef::new(1), "MockComponent").mount(&h.handle());
    let _wrapped = mounted.unmount();

    h.wait(200);
    h.unmount_root();
    assert_eq!(h.call_count(), 0);
}

#[test]
fn manual_wrapper_is_silent_until_it_reports() {
    let mut h = Harness::<u32>::new();
    let mounted = Collecting::<u32, &str>::manual("MockComponent").mount(&h.handle());
    h.wait(200);
    h.unmount_root();
    assert_eq!(h.call_count(), 0);
    drop(mounted);
}

#[test]
fn rerender_swaps_items_in_one_notification() {
    let mut h = Harness::<&'static str>::new();
    let handle = h.handle();

    let mut tree: Vec<_> = ["home", "inbox"]
        .into_iter()
        .map(|item| Collecting::with_item(item, item).mount(&handle))
        .collect();
    h.wait(DEFAULT_DELAY);

    // Next render: "inbox" stays, "home" is replaced by "settings".
    drop(tree.remove(0));
    tree.push(Collecting::with_item("settings", "settings").mount(&handle));
    h.wait(DEFAULT_DELAY);

    let calls = h.calls.borrow();
    assert_eq!(calls.len(), 2);
    let mut latest = calls[1].clone();
    latest.sort_unstable();
    assert_eq!(latest, ["inbox", "settings"]);
}

#[test]
fn contribution_released_on_unwind() {
    let mut h = Harness::<u32>::new();
    let handle = h.handle();
    h.collector().flush();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = handle.contribute(1);
        panic!("render failed");
    }));
    assert!(result.is_err());

    h.wait(DEFAULT_DELAY);
    assert_eq!(h.call_count(), 0);
    assert!(!h.collector().has_pending());
}
