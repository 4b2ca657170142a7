// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{criterion_group, criterion_main, Criterion};
use zipper_channel::BoundedChannel;

fn bench_push_pop_round_trip(c: &mut Criterion) {
    c.bench_function("bounded_channel_push_pop_capacity_16", |b| {
        b.iter(|| {
            let mut ch: BoundedChannel<u32> = BoundedChannel::new(16);
            for i in 0..256u32 {
                ch.push(i);
                if i % 2 == 1 {
                    ch.pop();
                }
            }
        });
    });
}

fn bench_suspended_push_queue(c: &mut Criterion) {
    c.bench_function("bounded_channel_backpressure_drain", |b| {
        b.iter(|| {
            let mut ch: BoundedChannel<u32> = BoundedChannel::new(4);
            for i in 0..64u32 {
                ch.push(i);
            }
            for _ in 0..64u32 {
                ch.pop();
            }
        });
    });
}

criterion_group!(channel_benches, bench_push_pop_round_trip, bench_suspended_push_queue);
criterion_main!(channel_benches);
