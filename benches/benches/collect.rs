// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_collect::{Accumulator, Collector, ManualClock};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// A render pass: each item is collected or uncollected at random.
fn burst(len: u32, universe: u32, seed: u64) -> Vec<(bool, u32)> {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| (rng.next_u32() & 1 == 0, rng.next_u32() % universe))
        .collect()
}

fn committed(universe: u32) -> Accumulator<u32> {
    let mut acc = Accumulator::new();
    for item in (0..universe).step_by(2) {
        acc.collect(item);
    }
    acc.resolve();
    acc
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_collect");
    group.sample_size(50);

    for &(len, universe) in &[(64_u32, 32_u32), (1_024_u32, 256_u32), (16_384_u32, 4_096_u32)] {
        let calls = burst(len, universe, 0xC011_0000_0000_0001);

        group.bench_function(format!("resolve(calls={len},items={universe})"), |b| {
            b.iter_batched(
                || committed(universe),
                |mut acc| {
                    for &(collect, item) in &calls {
                        if collect {
                            acc.collect(item);
                        } else {
                            acc.uncollect(item);
                        }
                    }
                    black_box(acc.resolve());
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("burst_then_poll(calls={len},items={universe})"), |b| {
            b.iter_batched(
                || {
                    let clock = ManualClock::new();
                    let collector = Collector::<u32>::builder()
                        .clock(clock.clone())
                        .on_change(|items| {
                            black_box(items.len());
                        })
                        .build()
                        .expect("on_change is set");
                    (clock, collector)
                },
                |(clock, mut collector)| {
                    let handle = collector.handle();
                    for &(collect, item) in &calls {
                        if collect {
                            handle.collect(item);
                        } else {
                            handle.uncollect(item);
                        }
                        clock.advance(1);
                    }
                    clock.advance(collector.delay());
                    black_box(collector.poll());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_collect);
criterion_main!(benches);
