// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Assertion helpers for the invariant every drain discipline promises:
//! emission order never runs behind the merge key.

use std::fmt::Debug;
use zipper_merge::Node;

/// Panics unless `items` is non-decreasing.
///
/// # Panics
/// Panics at the first adjacent pair that decreases.
pub fn assert_ascending<T: Ord + Debug>(items: &[T]) {
    for pair in items.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "emission order violated: {:?} came before {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Pulls out the `ordering` field of a drained node sequence, for feeding
/// straight into [`assert_ascending`].
pub fn orderings<P, O: Clone, I, T>(nodes: &[Node<P, O, I, T>]) -> Vec<O> {
    nodes.iter().map(|n| n.ordering.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_decreasing_sequences() {
        assert_ascending(&[1, 1, 2, 5, 5, 9]);
    }

    #[test]
    #[should_panic(expected = "emission order violated")]
    fn rejects_a_decrease() {
        assert_ascending(&[1, 2, 0]);
    }
}
