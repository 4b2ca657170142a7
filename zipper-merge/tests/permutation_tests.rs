// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use zipper_merge::Merge;

/// All orderings in which three streams, each producing one element per
/// round, can arrive within a round. Feed order must never affect the
/// emitted order once the round is complete.
fn round_permutations() -> Vec<[u32; 3]> {
    vec![
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ]
}

#[test]
fn feed_order_within_a_round_never_changes_emission_order() {
    for permutation in round_permutations() {
        let mut merge: Merge<char, i64, u32, i64, i64> = Merge::new(3, 0);
        let rounds: [[char; 3]; 3] = [['a', 'b', 'c'], ['d', 'e', 'f'], ['g', 'h', 'i']];

        for round in &rounds {
            for &stream in &permutation {
                let ordering = (round[stream as usize] as u8 - b'a') as i64 / 3;
                merge.feed_parts(round[stream as usize], ordering, stream, 0);
            }
        }

        let mut out = Vec::new();
        merge.drain_waiting(&mut out);
        let payload: String = out.iter().map(|n| n.payload).collect();
        assert_eq!(payload, "abcdefghi", "permutation {permutation:?} changed emission order");
    }
}

#[test]
fn a_stream_that_never_catches_up_blocks_drain_waiting_but_not_drain_full() {
    let mut merge: Merge<char, i64, u32, i64, i64> = Merge::new(3, 0);
    merge.feed_parts('a', 0, 0, 0);
    merge.feed_parts('b', 1, 0, 0);
    merge.feed_parts('c', 0, 1, 0);
    // stream 2 never feeds.

    let mut out = Vec::new();
    merge.drain_waiting(&mut out);
    assert!(out.is_empty(), "drain_waiting must not emit while a stream is silent");

    merge.drain_full(&mut out);
    let payload: String = out.iter().map(|n| n.payload).collect();
    assert_eq!(payload, "acb", "drain_full ignores occupancy and empties the heap by (ordering, identity)");
}
