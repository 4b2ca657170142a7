// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{criterion_group, criterion_main, Criterion};
use zipper_core::Ticket;

fn bench_ticket_trigger(c: &mut Criterion) {
    c.bench_function("ticket_new_trigger", |b| {
        b.iter(|| {
            let ticket: Ticket<u32> = Ticket::new();
            ticket.trigger(1);
            ticket.triggered()
        });
    });
}

fn bench_ticket_callback(c: &mut Criterion) {
    c.bench_function("ticket_add_callback_then_trigger", |b| {
        b.iter(|| {
            let ticket: Ticket<u32> = Ticket::new();
            ticket.add_callback(|_| {});
            ticket.trigger(1);
        });
    });
}

criterion_group!(benches, bench_ticket_trigger, bench_ticket_callback);
criterion_main!(benches);
