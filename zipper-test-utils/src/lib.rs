// Copyright 2025 Umberto Gotti
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
pub mod fixture;
pub mod ordering;
pub mod rng;

pub use fixture::{single_source_to_sink, two_sources_into_zipit};
pub use ordering::{assert_ascending, orderings};
pub use rng::deterministic_rng;
