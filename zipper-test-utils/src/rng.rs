// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A seeded RNG for tests that need reproducible runs without pulling in
//! the process's simulation clock.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A `StdRng` seeded deterministically from `seed`, so the same seed always
/// produces the same draw sequence across test runs and platforms.
#[must_use]
pub fn deterministic_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
