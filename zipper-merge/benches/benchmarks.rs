// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{criterion_group, criterion_main, Criterion};
use zipper_merge::{Merge, Node};

const STREAMS: u32 = 8;
const PER_STREAM: i64 = 256;

fn bench_drain_waiting(c: &mut Criterion) {
    c.bench_function("merge_drain_waiting_interleaved", |b| {
        b.iter(|| {
            let mut merge: Merge<(), i64, u32, i64, i64> = Merge::new(STREAMS as usize, 0);
            for ordering in 0..PER_STREAM {
                for stream in 0..STREAMS {
                    merge.feed_parts((), ordering * STREAMS as i64 + stream as i64, stream, 0);
                }
            }
            let mut out = Vec::with_capacity((STREAMS as i64 * PER_STREAM) as usize);
            merge.drain_waiting(&mut out);
            out
        });
    });
}

fn bench_feed_then_drain_full(c: &mut Criterion) {
    c.bench_function("merge_feed_then_drain_full", |b| {
        b.iter(|| {
            let mut merge: Merge<(), i64, u32, i64, i64> = Merge::new(STREAMS as usize, 0);
            for stream in 0..STREAMS {
                for ordering in 0..PER_STREAM {
                    merge.feed(Node::new((), ordering, stream, 0));
                }
            }
            let mut out = Vec::new();
            merge.drain_full(&mut out);
            out
        });
    });
}

criterion_group!(merge_benches, bench_drain_waiting, bench_feed_then_drain_full);
criterion_main!(merge_benches);
