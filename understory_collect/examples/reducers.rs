// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Assemble state reducers from the screens that are currently mounted.
//!
//! Each screen contributes its reducer while mounted. The root swaps its
//! combined reducer whenever the set of mounted screens settles.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_collect --example reducers --features tracing`

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use understory_collect::{Clock, Collecting, Collector, Component, ItemRef, StdClock};

type State = Vec<String>;

struct Reducer {
    name: &'static str,
    apply: fn(&mut State, &str),
}

struct Screen(&'static str);

impl Component for Screen {
    fn name(&self) -> Option<&str> {
        Some(self.0)
    }
}

fn log_action(state: &mut State, action: &str) {
    state.push(format!("log:{action}"));
}

fn count_inbox(state: &mut State, action: &str) {
    if action.starts_with("inbox/") {
        state.push(String::from("inbox:+1"));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let logger = ItemRef::new(Reducer {
        name: "logger",
        apply: log_action,
    });
    let inbox = ItemRef::new(Reducer {
        name: "inbox",
        apply: count_inbox,
    });

    let active: Rc<RefCell<Vec<ItemRef<Reducer>>>> = Rc::default();
    let store = Rc::clone(&active);
    let clock = StdClock::new();

    let mut collector = Collector::builder()
        .clock(clock)
        .on_change(move |reducers: &[ItemRef<Reducer>]| {
            let names: Vec<_> = reducers.iter().map(|r| r.name).collect();
            tracing::info!(?names, "replacing reducer");
            *store.borrow_mut() = reducers.to_vec();
        })
        .build()
        .expect("on_change is set");
    let handle = collector.handle();

    // First render: the shell and the inbox are on screen.
    let shell = Collecting::with_item(logger, Screen("Shell"));
    println!("mounting {}", shell.display_name());
    let shell = shell.mount(&handle);
    let inbox_screen = Collecting::with_item(inbox, Screen("Inbox")).mount(&handle);
    settle(&mut collector, &clock);
    dispatch(&active, "inbox/open");

    // Second render: the inbox is closed.
    drop(inbox_screen);
    settle(&mut collector, &clock);
    dispatch(&active, "inbox/open");

    drop(shell);
    collector.teardown();
}

/// Sleeps until the collector's deadline, then polls it.
fn settle(collector: &mut Collector<ItemRef<Reducer>>, clock: &StdClock) {
    while let Some(deadline) = collector.deadline() {
        let wait = deadline.saturating_sub(clock.now());
        thread::sleep(Duration::from_millis(wait));
        collector.poll();
    }
}

fn dispatch(active: &Rc<RefCell<Vec<ItemRef<Reducer>>>>, action: &str) {
    let mut state = State::new();
    for reducer in active.borrow().iter() {
        (reducer.apply)(&mut state, action);
    }
    state.sort();
    println!("{action} -> {state:?}");
}
