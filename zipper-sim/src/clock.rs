// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The scheduler contract: a current-time accessor, ticket-issuing
//! timeouts, and a `run_until` entry point.
//!
//! This is a cooperative, single-threaded discrete-event loop, not an
//! async executor: there is no polling, no waker, no `Future`. Scheduling
//! a timeout returns a [`Ticket`] that [`Scheduler::run_until`] triggers
//! directly, inline, when simulated time reaches it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use zipper_core::Ticket;

/// Simulated time, in microseconds since the run began.
pub type Clock = u64;

struct TimerEntry {
    at: Clock,
    seq: u64,
    ticket: Ticket<Clock>,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}
impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.at.cmp(&other.at).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A single-threaded discrete-event clock and timer queue.
///
/// Timers scheduled for the same instant fire in the order they were
/// scheduled, matching the "arrival order" guarantee the rest of the
/// crate relies on.
pub struct Scheduler {
    now: Clock,
    next_seq: u64,
    timers: BinaryHeap<Reverse<TimerEntry>>,
}

impl Scheduler {
    /// Create a scheduler with simulated time starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            timers: BinaryHeap::new(),
        }
    }

    /// The current simulated time.
    #[must_use]
    pub fn now(&self) -> Clock {
        self.now
    }

    /// Schedule a ticket to trigger with the fire time after `duration`
    /// of simulated time elapses. Triggering is driven entirely by
    /// [`Self::run_until`]; nothing fires from calling this alone.
    pub fn timeout(&mut self, duration: Clock) -> Ticket<Clock> {
        let ticket = Ticket::new();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Reverse(TimerEntry {
            at: self.now + duration,
            seq,
            ticket: ticket.clone(),
        }));
        ticket
    }

    /// Advance simulated time to `target`, triggering every timer due at
    /// or before it, in `(time, arrival order)`. Aborted timers are
    /// dropped without triggering. Always leaves `now() == target`, even
    /// if no timers fired (a `run_until` with nothing scheduled is a
    /// legal no-op tick).
    pub fn run_until(&mut self, target: Clock) {
        while let Some(Reverse(entry)) = self.timers.peek() {
            if entry.at > target {
                break;
            }
            let Reverse(entry) = self.timers.pop().expect("peek just matched");
            self.now = entry.at;
            if !entry.ticket.aborted() {
                entry.ticket.trigger(entry.at);
            }
        }
        self.now = target;
    }

    /// `true` iff no timers remain pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
