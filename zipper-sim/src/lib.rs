// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Discrete-event graph runtime: the external collaborator the merge core
//! and the bounded channel are built to plug into.
//!
//! A [`config::GraphConfig`] describes a directed graph of [`node::NodeKind`]
//! values connected by [`zipper_channel::BoundedChannel`] edges. [`graph::Graph`]
//! owns the wiring, drives its own pending-event loop to step each node
//! forward, and accumulates the per-node statistics merged back into the
//! output document. [`Scheduler`] is a standalone ticket-driven clock
//! (`timeout`/`run_until`/`is_idle` over [`zipper_core::Ticket`]) available
//! to callers that need one; `Graph` does not use it, and advances simulated
//! time through its own `BinaryHeap`-ordered event queue instead.

pub mod clock;
pub mod config;
pub mod distribution;
pub mod graph;
pub mod node;
pub mod stats;

pub use clock::{Clock, Scheduler};
pub use config::GraphConfig;
pub use graph::{Graph, SinkStats};
pub use stats::Stats;
