// Copyright 2025 Umberto Gotti
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
mod merge;
mod merged_queue;
mod node;

pub use merge::Merge;
pub use merged_queue::MergedQueue;
pub use node::Node;
