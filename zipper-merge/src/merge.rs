// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{MergedQueue, Node};
use std::hash::Hash;
use std::ops::Sub;
use zipper_core::Result;

/// Wraps [`MergedQueue`] with real-time bookkeeping, tardy rejection, and
/// three drain disciplines.
///
/// * `P` — opaque payload.
/// * `O` — the merge key; must have a sensible "zero" (`Default`) to seed
///   `origin` before anything has been emitted.
/// * `I` — a hashable stream identifier.
/// * `T` — the real-time timepoint type (a node's `debut`). Must support
///   `T - T -> D` so [`Self::drain_prompt`] can measure age.
/// * `D` — a duration domain for `max_latency`; `D::default()` is the zero
///   duration, which disables prompt mode.
pub struct Merge<P, O, I, T, D = T>
where
    O: Ord + Clone + Default,
    I: Ord + Hash + Eq + Clone,
    T: Copy + Sub<T, Output = D>,
    D: Ord + Default + Copy,
{
    queue: MergedQueue<P, O, I, T>,
    origin: O,
    max_latency: D,
}

impl<P, O, I, T, D> Merge<P, O, I, T, D>
where
    O: Ord + Clone + Default,
    I: Ord + Hash + Eq + Clone,
    T: Copy + Sub<T, Output = D>,
    D: Ord + Default + Copy,
{
    /// Create a merge expecting `cardinality` streams. `max_latency` of
    /// `D::default()` (zero) disables prompt mode, aliasing
    /// [`Self::drain_prompt`] to [`Self::drain_waiting`].
    #[must_use]
    pub fn new(cardinality: usize, max_latency: D) -> Self {
        Self {
            queue: MergedQueue::new(cardinality),
            origin: O::default(),
            max_latency,
        }
    }

    /// The ordering key of the most recently emitted node (or the initial
    /// zero value, if nothing has been emitted yet). Monotone
    /// non-decreasing over the merge's lifetime.
    #[must_use]
    pub fn origin(&self) -> &O {
        &self.origin
    }

    /// The declared stream count, as seen by the completeness gate.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.queue.cardinality()
    }

    /// Change the declared stream count. Idempotent; immediately affects
    /// subsequent `complete()` checks and all drains.
    pub fn set_cardinality(&mut self, cardinality: usize) {
        self.queue.set_cardinality(cardinality);
    }

    /// Number of resident nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.queue.size()
    }

    /// `true` iff no nodes are resident.
    #[must_use]
    pub fn empty(&self) -> bool {
        self.queue.empty()
    }

    /// `true` iff a lossless drain can currently proceed (see
    /// [`MergedQueue::complete`]).
    #[must_use]
    pub fn complete(&self) -> bool {
        self.queue.complete()
    }

    /// The smallest-ordering resident node.
    ///
    /// # Errors
    /// Returns [`zipper_core::ZipperError::Empty`] if no nodes are resident.
    pub fn peek(&self) -> Result<&Node<P, O, I, T>> {
        self.queue.peek()
    }

    /// Feed a node into the merge.
    ///
    /// Returns `false` without mutating any state if `node.ordering <
    /// origin` — a tardy arrival, silently discarded rather than risking an
    /// out-of-order emission. Otherwise inserts the node and returns `true`.
    pub fn feed(&mut self, node: Node<P, O, I, T>) -> bool {
        if node.ordering < self.origin {
            return false;
        }
        self.queue.feed(node);
        true
    }

    /// Feed from raw parts. Equivalent to `feed(Node::new(..))`.
    pub fn feed_parts(&mut self, payload: P, ordering: O, identity: I, debut: T) -> bool {
        self.feed(Node::new(payload, ordering, identity, debut))
    }

    /// Emit every resident node in ascending order, without any
    /// completeness check. Not lossless: a stream that hasn't caught up
    /// yet simply loses its place. Intended for flushing a closed merge.
    pub fn drain_full(&mut self, out: &mut impl Extend<Node<P, O, I, T>>) {
        while let Ok(node) = self.queue.drain() {
            self.origin = node.ordering.clone();
            out.extend(std::iter::once(node));
        }
    }

    /// Emit the ascending prefix of resident nodes while the queue remains
    /// [`complete`](Self::complete). Lossless: never emits ahead of a
    /// stream that hasn't yet delivered its catching-up element.
    pub fn drain_waiting(&mut self, out: &mut impl Extend<Node<P, O, I, T>>) {
        while self.queue.complete() {
            let node = self.queue.drain().expect("complete() implies a resident node");
            self.origin = node.ordering.clone();
            out.extend(std::iter::once(node));
        }
    }

    /// Emit the ascending prefix of resident nodes while the queue remains
    /// complete, additionally releasing the peek once it has aged past
    /// `max_latency` relative to `now` even if the queue is incomplete.
    ///
    /// `now` is supplied by the caller rather than read from a clock
    /// internally, so this stays testable under simulated time.
    /// `max_latency == D::default()` (zero) aliases this to
    /// [`Self::drain_waiting`].
    pub fn drain_prompt(&mut self, now: T, out: &mut impl Extend<Node<P, O, I, T>>) {
        if self.max_latency == D::default() {
            return self.drain_waiting(out);
        }
        loop {
            if self.queue.complete() {
                let node = self.queue.drain().expect("complete() implies a resident node");
                self.origin = node.ordering.clone();
                out.extend(std::iter::once(node));
                continue;
            }
            let Ok(peek) = self.queue.peek() else {
                return;
            };
            let age = now - peek.debut;
            if age <= self.max_latency {
                return;
            }
            let node = self.queue.drain().expect("peek() just succeeded");
            self.origin = node.ordering.clone();
            out.extend(std::iter::once(node));
        }
    }
}
