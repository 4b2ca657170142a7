// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The JSON graph configuration format: `main`, `nodes`, `edges`.
//!
//! This is the external boundary described in the scheduler contract —
//! everything here is plain data. Validation (undeclared references,
//! out-of-bounds ports) happens when [`crate::Graph::build`] resolves this
//! document, not during deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level graph document: `{ "main": ..., "nodes": [...], "edges": [...] }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    pub main: MainConfig,
    pub nodes: Vec<NodeConfig>,
    pub edges: Vec<EdgeConfig>,
}

/// Run parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MainConfig {
    /// Total simulated duration, in microseconds.
    pub run_time: u64,
    /// Seed for the process-wide RNG.
    pub seed: u64,
}

/// One graph node: its kind, its name (used by edges to refer to it), and
/// kind-specific configuration carried as opaque JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub data: Value,
}

/// A `{node, port}` reference used by an edge's `tail`/`head`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortRef {
    pub node: String,
    #[serde(default)]
    pub port: usize,
}

/// One edge: implicitly a `transfer` node binding one output port to one
/// input port, backed by a `BoundedChannel`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeConfig {
    pub tail: PortRef,
    pub head: PortRef,
    #[serde(default)]
    pub data: Value,
}

impl EdgeConfig {
    /// Channel capacity declared by this edge's `data.ibox` (the head's
    /// side) and `data.obox` (the tail's side). A scalar declares one
    /// port of that capacity; an array declares one port per entry,
    /// indexed by `port`. Absent values default to 1.
    #[must_use]
    pub fn capacity(&self, field: &str, port: usize) -> u64 {
        match self.data.get(field) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(1),
            Some(Value::Array(entries)) => entries
                .get(port)
                .and_then(Value::as_u64)
                .unwrap_or(1),
            _ => 1,
        }
    }
}
