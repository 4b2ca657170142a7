// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::cmp::Ordering;

/// The unit element merged by a [`crate::MergedQueue`]/[`crate::Merge`].
///
/// Two nodes compare by `ordering`; ties break by `identity`. Equal
/// ordering keys on distinct streams may legitimately coexist, so `Ord`
/// alone never collapses two nodes into "equal" unless both fields match.
///
/// * `P` — opaque payload, never inspected by the merge engine.
/// * `O` — the merge key, drawn from a totally ordered domain.
/// * `I` — a hashable stream identifier.
/// * `T` — the real-time point this node entered the merge's time horizon.
#[derive(Clone, Debug)]
pub struct Node<P, O, I, T> {
    pub payload: P,
    pub ordering: O,
    pub identity: I,
    pub debut: T,
}

impl<P, O, I, T> Node<P, O, I, T> {
    /// Construct a node from its four fields.
    pub fn new(payload: P, ordering: O, identity: I, debut: T) -> Self {
        Self {
            payload,
            ordering,
            identity,
            debut,
        }
    }
}

impl<P, O: PartialEq, I: PartialEq, T> PartialEq for Node<P, O, I, T> {
    fn eq(&self, other: &Self) -> bool {
        self.ordering == other.ordering && self.identity == other.identity
    }
}

impl<P, O: Eq, I: Eq, T> Eq for Node<P, O, I, T> {}

impl<P, O: Ord, I: Ord, T> PartialOrd for Node<P, O, I, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P, O: Ord, I: Ord, T> Ord for Node<P, O, I, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordering
            .cmp(&other.ordering)
            .then_with(|| self.identity.cmp(&other.identity))
    }
}
