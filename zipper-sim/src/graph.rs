// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Wires a [`GraphConfig`] into live [`BoundedChannel`]s and node
//! behaviors, validates every edge reference, and drives a run to
//! completion.

use crate::clock::Clock;
use crate::config::{EdgeConfig, GraphConfig, NodeConfig};
use crate::distribution::DistributionRegistry;
use crate::node::NodeKind;
use crate::stats::Stats;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use zipper_channel::BoundedChannel;
use zipper_core::{Result, ZipperError};
use zipper_merge::Merge;

/// One value in flight on an edge: a source-assigned sequence number
/// (the merge ordering key) paired with its payload.
#[derive(Debug, Clone)]
pub struct Message {
    pub seq: u64,
    pub value: Value,
}

/// Arrival statistics for one sink, merged back into its node's `data` on
/// completion.
#[derive(Debug, Default, Clone)]
pub struct SinkStats {
    pub received: u64,
    pub last_arrival: Clock,
    /// Running mean/rms of the gap between successive arrivals.
    pub inter_arrival: Stats,
}

impl NodeKind {
    fn input_ports(&self) -> usize {
        match self {
            Self::Source { .. } | Self::Burst { .. } | Self::Random => 0,
            Self::Transfer { .. } | Self::Sink => 1,
            Self::Zipit { cardinality, .. } => *cardinality,
        }
    }

    fn output_ports(&self) -> usize {
        match self {
            Self::Source { .. } | Self::Burst { .. } | Self::Transfer { .. } | Self::Zipit { .. } => 1,
            Self::Sink | Self::Random => 0,
        }
    }
}

/// An event in the graph's internal schedule: something that fires at a
/// simulated timepoint independent of the `propagate()` fixed point.
#[derive(Debug, Clone)]
enum ScheduledEvent {
    /// A source node emits its next sequentially-ordered payload.
    SourceFire(String),
    /// A burst node emits a fresh batch of payloads.
    BurstFire(String),
    /// A delayed transfer finishes transmitting and delivers `message` to
    /// the channel at `channel_idx`.
    TransferDeliver { channel_idx: usize, message: Message },
}

struct PendingEntry {
    at: Clock,
    seq: u64,
    event: ScheduledEvent,
}

impl PartialEq for PendingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}
impl Eq for PendingEntry {}

impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.at.cmp(&other.at).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Everything that mutates over the course of one `run()`, independent of
/// the static wiring held by `Graph` itself. Kept separate so it can be
/// threaded through `propagate`/`step_*` without re-borrowing `self`.
struct RunState {
    merges: HashMap<String, Merge<Value, u64, usize, Clock, Clock>>,
    stats: HashMap<String, SinkStats>,
    pending: BinaryHeap<Reverse<PendingEntry>>,
    next_seq: u64,
    rng: StdRng,
}

impl RunState {
    fn schedule(&mut self, at: Clock, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Reverse(PendingEntry { at, seq, event }));
    }
}

/// A validated, wired graph ready to run.
pub struct Graph {
    order: Vec<String>,
    nodes: HashMap<String, NodeKind>,
    channels: Vec<BoundedChannel<Message>>,
    outputs: HashMap<(String, usize), usize>,
    inputs: HashMap<(String, usize), usize>,
    registry: DistributionRegistry,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("order", &self.order)
            .field("nodes", &self.nodes)
            .field("outputs", &self.outputs)
            .field("inputs", &self.inputs)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Resolve and validate a configuration document into a runnable
    /// graph.
    ///
    /// # Errors
    /// Returns [`ZipperError::Malformed`] for a duplicate node name or an
    /// unrecognized node type, [`ZipperError::UndeclaredReference`] for
    /// an edge or a source naming something never declared, and
    /// [`ZipperError::OutOfBoundsPort`] for a port index a node doesn't
    /// have.
    pub fn build(config: &GraphConfig) -> Result<Self> {
        let mut order = Vec::with_capacity(config.nodes.len());
        let mut nodes = HashMap::with_capacity(config.nodes.len());
        for NodeConfig { kind, name, data } in &config.nodes {
            if nodes.contains_key(name) {
                return Err(ZipperError::malformed(format!("node `{name}` declared more than once")));
            }
            order.push(name.clone());
            nodes.insert(name.clone(), NodeKind::parse(kind, data)?);
        }

        let registry = DistributionRegistry::build(&config.nodes)?;
        for kind in nodes.values() {
            kind.validate_distribution_reference(&registry)?;
        }
        tracing::debug!(nodes = nodes.len(), edges = config.edges.len(), "graph configuration validated");

        let mut channels = Vec::with_capacity(config.edges.len());
        let mut outputs = HashMap::new();
        let mut inputs = HashMap::new();
        for edge in &config.edges {
            let capacity = Self::wire_edge(&nodes, edge, channels.len())?;
            channels.push(BoundedChannel::new(capacity));
            let index = channels.len() - 1;
            outputs.insert((edge.tail.node.clone(), edge.tail.port), index);
            inputs.insert((edge.head.node.clone(), edge.head.port), index);
        }

        Ok(Self { order, nodes, channels, outputs, inputs, registry })
    }

    fn wire_edge(nodes: &HashMap<String, NodeKind>, edge: &EdgeConfig, index: usize) -> Result<usize> {
        let descriptor = || format!("edges[{index}]: {}.{} -> {}.{}", edge.tail.node, edge.tail.port, edge.head.node, edge.head.port);

        let tail = nodes
            .get(&edge.tail.node)
            .ok_or_else(|| ZipperError::undeclared("node", edge.tail.node.clone()))?;
        if edge.tail.port >= tail.output_ports() {
            return Err(ZipperError::out_of_bounds_port(descriptor(), edge.tail.node.clone(), edge.tail.port));
        }

        let head = nodes
            .get(&edge.head.node)
            .ok_or_else(|| ZipperError::undeclared("node", edge.head.node.clone()))?;
        if edge.head.port >= head.input_ports() {
            return Err(ZipperError::out_of_bounds_port(descriptor(), edge.head.node.clone(), edge.head.port));
        }

        let capacity = edge
            .capacity("obox", edge.tail.port)
            .max(edge.capacity("ibox", edge.head.port))
            .max(1) as usize;
        Ok(capacity)
    }

    /// Run the graph for `run_time` simulated microseconds, seeding the
    /// process-wide RNG with `seed`. Returns sink statistics keyed by
    /// sink node name, to be merged back into the output document.
    #[must_use]
    pub fn run(&mut self, run_time: Clock, seed: u64) -> HashMap<String, SinkStats> {
        tracing::info!(run_time, seed, nodes = self.order.len(), "starting run");
        let merges = self
            .order
            .iter()
            .filter_map(|name| match &self.nodes[name] {
                NodeKind::Zipit { cardinality, max_latency } => {
                    Some((name.clone(), Merge::new(*cardinality, *max_latency)))
                }
                _ => None,
            })
            .collect();
        let stats = self
            .order
            .iter()
            .filter(|name| matches!(self.nodes[name.as_str()], NodeKind::Sink))
            .map(|name| (name.clone(), SinkStats::default()))
            .collect();
        let mut state = RunState {
            merges,
            stats,
            pending: BinaryHeap::new(),
            next_seq: 0,
            rng: StdRng::seed_from_u64(seed),
        };

        let mut seq_counters: HashMap<String, u64> = HashMap::new();
        for name in &self.order {
            match &self.nodes[name] {
                NodeKind::Source { interval_dist } => {
                    let dist = self.registry.get(interval_dist).expect("validated at build time");
                    let first = dist.sample(&mut state.rng).max(0.0) as Clock;
                    seq_counters.insert(name.clone(), 0);
                    state.schedule(first, ScheduledEvent::SourceFire(name.clone()));
                }
                NodeKind::Burst { delay_dist, .. } => {
                    let dist = self.registry.get(delay_dist).expect("validated at build time");
                    let first = dist.sample(&mut state.rng).max(0.0) as Clock;
                    seq_counters.insert(name.clone(), 0);
                    state.schedule(first, ScheduledEvent::BurstFire(name.clone()));
                }
                _ => {}
            }
        }

        let mut now: Clock = 0;
        while let Some(Reverse(entry)) = state.pending.peek() {
            if entry.at > run_time {
                break;
            }
            let Reverse(entry) = state.pending.pop().expect("peek just matched");
            now = entry.at;
            self.fire(entry.event, now, &mut seq_counters, &mut state);
            self.propagate(now, &mut state);
        }

        self.flush(now, &mut state);
        tracing::info!(elapsed = now, sinks = state.stats.len(), "run complete");
        state.stats
    }

    /// Carry out one scheduled event: emit a source/burst payload or
    /// deliver a delayed transfer, then re-arm any recurring source.
    fn fire(&mut self, event: ScheduledEvent, now: Clock, seq_counters: &mut HashMap<String, u64>, state: &mut RunState) {
        match event {
            ScheduledEvent::SourceFire(name) => {
                let seq = seq_counters.get_mut(&name).expect("every source has a counter");
                let this_seq = *seq;
                *seq += 1;
                if let Some(&idx) = self.outputs.get(&(name.clone(), 0)) {
                    self.channels[idx].push(Message { seq: this_seq, value: Value::from(this_seq) });
                }

                let NodeKind::Source { interval_dist } = &self.nodes[&name] else {
                    unreachable!("pending queue only schedules SourceFire for source nodes")
                };
                let dist = self.registry.get(interval_dist).expect("validated at build time");
                let next = now + dist.sample(&mut state.rng).max(0.0) as Clock;
                state.schedule(next, ScheduledEvent::SourceFire(name));
            }
            ScheduledEvent::BurstFire(name) => {
                let NodeKind::Burst { count_dist, .. } = &self.nodes[&name] else {
                    unreachable!("pending queue only schedules BurstFire for burst nodes")
                };
                let count = self
                    .registry
                    .get(count_dist)
                    .expect("validated at build time")
                    .sample(&mut state.rng)
                    .max(0.0) as u64;

                let seq = seq_counters.get_mut(&name).expect("every burst node has a counter");
                if let Some(&idx) = self.outputs.get(&(name.clone(), 0)) {
                    for _ in 0..count {
                        let this_seq = *seq;
                        *seq += 1;
                        self.channels[idx].push(Message { seq: this_seq, value: Value::from(this_seq) });
                    }
                } else {
                    *seq += count;
                }

                let NodeKind::Burst { delay_dist, .. } = &self.nodes[&name] else {
                    unreachable!("matched above")
                };
                let dist = self.registry.get(delay_dist).expect("validated at build time");
                let next = now + dist.sample(&mut state.rng).max(0.0) as Clock;
                state.schedule(next, ScheduledEvent::BurstFire(name));
            }
            ScheduledEvent::TransferDeliver { channel_idx, message } => {
                self.channels[channel_idx].push(message);
            }
        }
    }

    /// Drain every channel as far forward as it will go: transfers
    /// forward 1:1 (or after a delay, scheduling a future delivery),
    /// zipits feed their inputs into their merge and emit whatever
    /// `drain_prompt`/`drain_waiting` releases, sinks consume everything.
    /// Runs to a fixed point since one source event can cascade through
    /// several hops.
    fn propagate(&mut self, now: Clock, state: &mut RunState) {
        loop {
            let mut changed = false;
            for name in self.order.clone() {
                changed |= self.step_node(&name, now, state);
            }
            if !changed {
                return;
            }
        }
    }

    fn step_node(&mut self, name: &str, now: Clock, state: &mut RunState) -> bool {
        match &self.nodes[name] {
            NodeKind::Transfer { .. } => self.step_transfer(name, now, state),
            NodeKind::Zipit { max_latency, .. } => self.step_zipit(name, now, *max_latency, state),
            NodeKind::Sink => self.step_sink(name, now, state),
            NodeKind::Source { .. } | NodeKind::Burst { .. } | NodeKind::Random => false,
        }
    }

    fn step_transfer(&mut self, name: &str, now: Clock, state: &mut RunState) -> bool {
        let Some(&in_idx) = self.inputs.get(&(name.to_string(), 0)) else { return false };
        let Some(&out_idx) = self.outputs.get(&(name.to_string(), 0)) else { return false };
        if self.channels[in_idx].size() == 0 {
            return false;
        }
        let ticket = self.channels[in_idx].pop();
        let Some(message) = ticket.value() else { return false };

        let NodeKind::Transfer { delay_dist } = &self.nodes[name] else {
            unreachable!("step_transfer only runs on Transfer nodes")
        };
        match delay_dist {
            None => {
                self.channels[out_idx].push(message);
            }
            Some(dist_name) => {
                let dist = self.registry.get(dist_name).expect("validated at build time");
                let delay = dist.sample(&mut state.rng).max(0.0) as Clock;
                state.schedule(now + delay, ScheduledEvent::TransferDeliver { channel_idx: out_idx, message });
            }
        }
        true
    }

    fn step_zipit(&mut self, name: &str, now: Clock, max_latency: Clock, state: &mut RunState) -> bool {
        let merge = state.merges.get_mut(name).expect("every zipit has a merge");
        let mut changed = false;

        for port in 0..merge.cardinality() {
            let Some(&in_idx) = self.inputs.get(&(name.to_string(), port)) else { continue };
            while self.channels[in_idx].size() > 0 {
                let ticket = self.channels[in_idx].pop();
                let Some(message) = ticket.value() else { break };
                let seq = message.seq;
                if !merge.feed_parts(message.value, seq, port, now) {
                    tracing::debug!(node = name, port, ordering = seq, "tardy feed rejected");
                }
                changed = true;
            }
        }

        let mut emitted = Vec::new();
        if max_latency == 0 {
            merge.drain_waiting(&mut emitted);
        } else {
            merge.drain_prompt(now, &mut emitted);
        }
        if emitted.is_empty() {
            return changed;
        }
        changed = true;
        if let Some(&out_idx) = self.outputs.get(&(name.to_string(), 0)) {
            for node in emitted {
                self.channels[out_idx].push(Message { seq: node.ordering, value: node.payload });
            }
        }
        changed
    }

    fn step_sink(&mut self, name: &str, now: Clock, state: &mut RunState) -> bool {
        let Some(&in_idx) = self.inputs.get(&(name.to_string(), 0)) else { return false };
        if self.channels[in_idx].size() == 0 {
            return false;
        }
        let ticket = self.channels[in_idx].pop();
        if ticket.value().is_none() {
            return false;
        }
        let entry = state.stats.entry(name.to_string()).or_default();
        if entry.received > 0 {
            entry.inter_arrival.push((now - entry.last_arrival) as f64);
        }
        entry.received += 1;
        entry.last_arrival = now;
        true
    }

    /// Flush every zipit's residual buffer losslessly-ignoring (via
    /// `drain_full`) and forward anything left, once the event loop has
    /// no more source arrivals scheduled before `run_time`.
    fn flush(&mut self, now: Clock, state: &mut RunState) {
        for name in self.order.clone() {
            if let NodeKind::Zipit { .. } = &self.nodes[&name] {
                let merge = state.merges.get_mut(&name).expect("every zipit has a merge");
                for port in 0..merge.cardinality() {
                    if let Some(&in_idx) = self.inputs.get(&(name.clone(), port)) {
                        while self.channels[in_idx].size() > 0 {
                            let ticket = self.channels[in_idx].pop();
                            if let Some(message) = ticket.value() {
                                merge.feed_parts(message.value, message.seq, port, now);
                            }
                        }
                    }
                }
                let mut emitted = Vec::new();
                merge.drain_full(&mut emitted);
                if let Some(&out_idx) = self.outputs.get(&(name.clone(), 0)) {
                    for node in emitted {
                        self.channels[out_idx].push(Message { seq: node.ordering, value: node.payload });
                    }
                }
            }
        }
        self.propagate(now, state);
    }
}
