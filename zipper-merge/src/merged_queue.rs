// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Node;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use zipper_core::{Result, ZipperError};

/// A heap-ordered multiset of pending nodes, gated by per-stream occupancy.
///
/// `MergedQueue` is the low-level half of the merge engine: a min-heap over
/// `Node` plus an O(k) `complete()` check. [`crate::Merge`] wraps it with
/// real-time bookkeeping and tardy rejection; most callers want that type
/// instead.
pub struct MergedQueue<P, O, I, T>
where
    O: Ord,
    I: Ord + Hash + Eq,
{
    waiting: BinaryHeap<Reverse<Node<P, O, I, T>>>,
    occupancy: HashMap<I, usize>,
    cardinality: usize,
}

impl<P, O, I, T> MergedQueue<P, O, I, T>
where
    O: Ord,
    I: Ord + Hash + Eq + Clone,
{
    /// Create an empty queue expecting `cardinality` distinct streams.
    #[must_use]
    pub fn new(cardinality: usize) -> Self {
        Self {
            waiting: BinaryHeap::new(),
            occupancy: HashMap::new(),
            cardinality,
        }
    }

    /// Insert `node`, incrementing its stream's occupancy. O(log n).
    pub fn feed(&mut self, node: Node<P, O, I, T>) {
        *self.occupancy.entry(node.identity.clone()).or_insert(0) += 1;
        self.waiting.push(Reverse(node));
    }

    /// The smallest-ordering resident node, by the default ascending
    /// comparator (ties break by identity).
    ///
    /// # Errors
    /// Returns [`ZipperError::Empty`] if no nodes are resident.
    pub fn peek(&self) -> Result<&Node<P, O, I, T>> {
        self.waiting.peek().map(|Reverse(node)| node).ok_or(ZipperError::Empty)
    }

    /// Remove and return the smallest-ordering node, decrementing its
    /// stream's occupancy. O(log n).
    ///
    /// # Errors
    /// Returns [`ZipperError::Empty`] if no nodes are resident.
    pub fn drain(&mut self) -> Result<Node<P, O, I, T>> {
        let Reverse(node) = self.waiting.pop().ok_or(ZipperError::Empty)?;
        if let Some(count) = self.occupancy.get_mut(&node.identity) {
            *count -= 1;
        }
        Ok(node)
    }

    /// `true` iff every stream besides the current peek's own has at least
    /// one resident node (the peek's own stream needs a *second* resident
    /// node to count, since the peek itself occupies one slot).
    ///
    /// With a node present from every stream, the current top is guaranteed
    /// the global minimum: streams are monotone, so no future feed on an
    /// already-represented stream can beat it. `cardinality == 0` makes this
    /// trivially true whenever the queue is non-empty.
    #[must_use]
    pub fn complete(&self) -> bool {
        if self.cardinality == 0 {
            return !self.waiting.is_empty();
        }
        let Ok(top) = self.peek() else {
            return false;
        };
        let represented = self
            .occupancy
            .iter()
            .filter(|(identity, &count)| {
                let have = if **identity == top.identity {
                    count.saturating_sub(1)
                } else {
                    count
                };
                have > 0
            })
            .count();
        represented >= self.cardinality.saturating_sub(1)
    }

    /// Number of resident nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.waiting.len()
    }

    /// `true` iff no nodes are resident.
    #[must_use]
    pub fn empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Drop all resident nodes and reset occupancy counters.
    pub fn clear(&mut self) {
        self.waiting.clear();
        self.occupancy.clear();
    }

    /// The declared stream count. Idempotent; takes effect on the next
    /// `complete()` call.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Change the declared stream count. Idempotent; takes effect
    /// immediately on the next `complete()` call.
    pub fn set_cardinality(&mut self, cardinality: usize) {
        self.cardinality = cardinality;
    }
}

#[cfg(test)]
mod tests {
    use super::MergedQueue;
    use crate::Node;

    fn push(mq: &mut MergedQueue<(), i64, u32, u64>, ordering: i64, identity: u32) {
        mq.feed(Node::new((), ordering, identity, 0));
    }

    /// Mirrors the original C++ `test_merge_queue` fixture: three streams
    /// feeding `1,2,3,4` / `2,4,10` / `0,3,5,9`.
    #[test]
    fn three_stream_walkthrough() {
        let mut mq: MergedQueue<(), i64, u32, u64> = MergedQueue::new(3);

        push(&mut mq, 1, 0);
        assert!(!mq.complete());
        assert_eq!(mq.peek().unwrap().ordering, 1);

        push(&mut mq, 2, 1);
        assert!(!mq.complete());
        assert_eq!(mq.peek().unwrap().ordering, 1);

        push(&mut mq, 0, 2);
        assert!(!mq.complete());
        assert_eq!(mq.peek().unwrap().ordering, 0);

        push(&mut mq, 2, 0);
        assert!(!mq.complete());
        assert_eq!(mq.peek().unwrap().ordering, 0);

        push(&mut mq, 4, 1);
        push(&mut mq, 3, 2);
        assert!(mq.complete());
        assert_eq!(mq.peek().unwrap().ordering, 0);

        mq.drain().unwrap();
        assert_eq!(mq.peek().unwrap().ordering, 1);
        assert!(mq.complete());
    }

    #[test]
    fn empty_queue_is_not_complete_and_rejects_peek_and_drain() {
        let mq: MergedQueue<(), i64, u32, u64> = MergedQueue::new(2);
        assert!(!mq.complete());
        assert!(mq.peek().is_err());

        let mut mq: MergedQueue<(), i64, u32, u64> = MergedQueue::new(2);
        assert!(mq.drain().is_err());
    }

    #[test]
    fn zero_cardinality_is_always_complete_when_non_empty() {
        let mut mq: MergedQueue<(), i64, u32, u64> = MergedQueue::new(0);
        assert!(!mq.complete());
        push(&mut mq, 5, 0);
        assert!(mq.complete());
    }

    #[test]
    fn occupancy_sums_to_size_across_feeds_and_drains() {
        let mut mq: MergedQueue<(), i64, u32, u64> = MergedQueue::new(3);
        for i in 0..9 {
            push(&mut mq, i, (i % 3) as u32);
        }
        let total_occupancy: usize = mq.occupancy.values().sum();
        assert_eq!(total_occupancy, mq.size());

        while mq.drain().is_ok() {
            let total_occupancy: usize = mq.occupancy.values().sum();
            assert_eq!(total_occupancy, mq.size());
        }
    }
}
