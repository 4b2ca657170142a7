// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::VecDeque;
use zipper_core::Ticket;

/// A fixed-capacity FIFO between cooperative tasks on a single-threaded
/// event loop.
///
/// `push` suspends its caller (via the returned ticket) when the buffer is
/// full; `pop` suspends when it's empty. Both sides queue in arrival order
/// and are serviced by [`BoundedChannel::progress`], which runs
/// automatically after every `push`/`pop`/abort and can also be invoked
/// directly when an external trigger (a timeout, a sibling channel's
/// progress pass) might have changed the picture.
pub struct BoundedChannel<T> {
    capacity: usize,
    buffer: VecDeque<T>,
    push_waiters: VecDeque<(T, Ticket<()>)>,
    pop_waiters: VecDeque<Ticket<T>>,
}

impl<T> BoundedChannel<T> {
    /// Create a channel holding at most `capacity` elements.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; a zero-capacity channel can never
    /// settle (invariant 7 would be unsatisfiable).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "BoundedChannel capacity must be at least 1");
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
            push_waiters: VecDeque::new(),
            pop_waiters: VecDeque::new(),
        }
    }

    /// Total declared capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements currently resident in the buffer.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Number of producers currently suspended waiting for room.
    #[must_use]
    pub fn inbox_size(&self) -> usize {
        self.push_waiters.len()
    }

    /// Number of consumers currently suspended waiting for a value.
    #[must_use]
    pub fn outbox_size(&self) -> usize {
        self.pop_waiters.len()
    }

    /// Offer `value` to the channel.
    ///
    /// The returned ticket triggers with `()` once `value` has actually
    /// been stored in the buffer, which may happen synchronously within
    /// this call if there is room.
    pub fn push(&mut self, value: T) -> Ticket<()> {
        let ticket = Ticket::new();
        self.push_waiters.push_back((value, ticket.clone()));
        self.progress();
        ticket
    }

    /// Register intent to receive a value.
    ///
    /// The returned ticket triggers with the received value once one is
    /// available, which may happen synchronously within this call if the
    /// buffer is already non-empty.
    pub fn pop(&mut self) -> Ticket<T> {
        let ticket = Ticket::new();
        self.pop_waiters.push_back(ticket.clone());
        self.progress();
        ticket
    }

    /// Abandon a push that has not yet completed, releasing its slot
    /// claim; the value is dropped without ever reaching the buffer.
    ///
    /// A no-op if `ticket` already settled.
    pub fn abort_push(&mut self, ticket: &Ticket<()>) {
        ticket.abort();
        self.progress();
    }

    /// Abandon a pop that has not yet completed. The buffer is left
    /// untouched.
    ///
    /// A no-op if `ticket` already settled.
    pub fn abort_pop(&mut self, ticket: &Ticket<T>) {
        ticket.abort();
        self.progress();
    }

    /// Service waiters against the current buffer state until settled:
    /// `buffer` non-empty implies no pending pops, and `buffer` below
    /// capacity implies no pending pushes.
    ///
    /// Pops are serviced before pushes within each pass, and a push that
    /// frees room for an already-exhausted pop queue re-enters the pop
    /// pass rather than leaving a servable pop stranded until the next
    /// external call.
    pub fn progress(&mut self) {
        loop {
            while !self.buffer.is_empty() && !self.pop_waiters.is_empty() {
                let ticket = self.pop_waiters.pop_front().expect("checked non-empty");
                if ticket.aborted() {
                    continue;
                }
                let value = self.buffer.pop_front().expect("checked non-empty");
                ticket.trigger(value);
            }
            while self.buffer.len() < self.capacity && !self.push_waiters.is_empty() {
                let (value, ticket) = self.push_waiters.pop_front().expect("checked non-empty");
                if ticket.aborted() {
                    continue;
                }
                self.buffer.push_back(value);
                ticket.trigger(());
            }
            if !self.buffer.is_empty() && !self.pop_waiters.is_empty() {
                continue;
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedChannel;

    #[test]
    fn push_then_pop_round_trips_in_order() {
        let mut ch: BoundedChannel<&str> = BoundedChannel::new(2);
        let p1 = ch.push("a");
        let p2 = ch.push("b");
        assert!(p1.triggered());
        assert!(p2.triggered());

        let pop1 = ch.pop();
        let pop2 = ch.pop();
        assert_eq!(pop1.value(), Some("a"));
        assert_eq!(pop2.value(), Some("b"));
    }

    #[test]
    fn push_beyond_capacity_suspends_until_a_pop_frees_room() {
        let mut ch: BoundedChannel<i32> = BoundedChannel::new(1);
        let p1 = ch.push(1);
        let p2 = ch.push(2);
        assert!(p1.triggered());
        assert!(!p2.triggered(), "second push must suspend: buffer is full");
        assert_eq!(ch.inbox_size(), 1);

        let pop1 = ch.pop();
        assert_eq!(pop1.value(), Some(1));
        assert!(p2.triggered(), "freeing a slot must resume the suspended push");
        assert_eq!(ch.inbox_size(), 0);
    }

    #[test]
    fn pop_before_any_push_suspends_until_a_value_arrives() {
        let mut ch: BoundedChannel<i32> = BoundedChannel::new(4);
        let pop = ch.pop();
        assert!(!pop.triggered());
        ch.push(42);
        assert_eq!(pop.value(), Some(42));
    }

    #[test]
    fn aborting_a_pending_push_drops_the_value_without_a_slot() {
        let mut ch: BoundedChannel<i32> = BoundedChannel::new(1);
        ch.push(1);
        let pending = ch.push(2);
        assert!(!pending.triggered());

        ch.abort_push(&pending);
        assert!(pending.aborted());

        let pop1 = ch.pop();
        assert_eq!(pop1.value(), Some(1));
        let pop2 = ch.pop();
        assert!(!pop2.triggered(), "aborted push must never reach the buffer");
    }

    #[test]
    fn aborting_a_pending_pop_never_completes_it() {
        let mut ch: BoundedChannel<i32> = BoundedChannel::new(1);
        let pop = ch.pop();
        ch.abort_pop(&pop);
        ch.push(7);
        assert!(pop.aborted());
        assert!(!pop.triggered());
        assert_eq!(ch.size(), 1, "the value stays buffered for the next real pop");
    }

    /// Capacity 2, five pushes then two pops, then three more pushes,
    /// then enough pops to fully drain. Pushers complete strictly FIFO as
    /// pops free slots, and every value comes out in push order
    /// regardless of which batch it was pushed in.
    #[test]
    fn bounded_backpressure_scenario() {
        let mut ch: BoundedChannel<String> = BoundedChannel::new(2);
        let pushes: Vec<_> = (0..5).map(|i| ch.push(format!("foo{i}"))).collect();
        assert!(pushes[0].triggered() && pushes[1].triggered());
        assert!(!pushes[2].triggered() && !pushes[3].triggered() && !pushes[4].triggered());

        let mut popped = Vec::new();
        popped.push(ch.pop().value().unwrap());
        popped.push(ch.pop().value().unwrap());
        assert!(pushes[2].triggered() && pushes[3].triggered());
        assert!(!pushes[4].triggered(), "capacity is still saturated by foo2/foo3");

        let more_pushes: Vec<_> = (0..3).map(|i| ch.push(format!("bar{i}"))).collect();
        assert!(
            more_pushes.iter().all(|t| !t.triggered()),
            "foo4 is still ahead of every bar push in the inbox FIFO"
        );

        for _ in 0..6 {
            popped.push(ch.pop().value().unwrap());
        }

        assert_eq!(popped, vec!["foo0", "foo1", "foo2", "foo3", "foo4", "bar0", "bar1", "bar2"]);
    }
}
