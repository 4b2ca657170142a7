// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The closed set of node kinds a graph document can declare.
//!
//! The original simulator dispatched node behavior through a string-keyed
//! registry of constructors. [`NodeKind`] replaces that with a sum type:
//! the registry collapses to parsing the configuration's `type` field once,
//! at graph-build time, rather than on every lookup.

use crate::distribution::DistributionRegistry;
use serde_json::Value;
use zipper_core::{Result, ZipperError};

/// One node's behavior, resolved from its configuration `type` string.
#[derive(Debug)]
pub enum NodeKind {
    /// Emits sequentially-ordered payloads at intervals drawn from a
    /// named distribution.
    Source { interval_dist: String },
    /// Emits a variable-size burst of payloads at intervals drawn from
    /// `delay_dist`, the burst size drawn fresh from `count_dist` each
    /// time.
    Burst { delay_dist: String, count_dist: String },
    /// Forwards every input to the single output, optionally after a
    /// transmission delay drawn from `delay_dist` (absent means
    /// immediate pass-through).
    Transfer { delay_dist: Option<String> },
    /// Merges `cardinality` input streams into one output via
    /// [`zipper_merge::Merge`], using `drain_waiting` when `max_latency`
    /// is zero and `drain_prompt` otherwise.
    Zipit { cardinality: usize, max_latency: u64 },
    /// Consumes everything offered to it and tallies arrivals.
    Sink,
    /// Declares a distribution by name; not part of the data-flow graph.
    Random,
}

impl NodeKind {
    /// Resolve a node's behavior from its `type` string and `data`.
    ///
    /// # Errors
    /// Returns [`ZipperError::Malformed`] for an unrecognized `type`, or
    /// for a `zipit`/`source` node missing a required `data` field.
    pub fn parse(kind: &str, data: &Value) -> Result<Self> {
        match kind {
            "source" => {
                let interval_dist = data
                    .get("interval_dist")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ZipperError::malformed("source node missing string field \"interval_dist\""))?
                    .to_string();
                Ok(Self::Source { interval_dist })
            }
            "burst" => {
                let delay_dist = data
                    .get("delay_dist")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ZipperError::malformed("burst node missing string field \"delay_dist\""))?
                    .to_string();
                let count_dist = data
                    .get("count_dist")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ZipperError::malformed("burst node missing string field \"count_dist\""))?
                    .to_string();
                Ok(Self::Burst { delay_dist, count_dist })
            }
            "transfer" => {
                let delay_dist = data.get("delay_dist").and_then(Value::as_str).map(str::to_string);
                Ok(Self::Transfer { delay_dist })
            }
            "zipit" => {
                let cardinality = data
                    .get("cardinality")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| ZipperError::malformed("zipit node missing numeric field \"cardinality\""))?
                    as usize;
                let max_latency = data.get("max_latency").and_then(Value::as_u64).unwrap_or(0);
                Ok(Self::Zipit { cardinality, max_latency })
            }
            "sink" => Ok(Self::Sink),
            "random" => Ok(Self::Random),
            other => Err(ZipperError::malformed(format!("unrecognized node type {other:?}"))),
        }
    }

    /// Resolve and validate the `interval_dist` reference of a source
    /// node against `registry`. A no-op for any other kind.
    ///
    /// # Errors
    /// Returns [`ZipperError::UndeclaredReference`] if this is a source
    /// whose `interval_dist` names no declared distribution.
    pub fn validate_distribution_reference(&self, registry: &DistributionRegistry) -> Result<()> {
        match self {
            Self::Source { interval_dist } => {
                registry.get(interval_dist)?;
            }
            Self::Burst { delay_dist, count_dist } => {
                registry.get(delay_dist)?;
                registry.get(count_dist)?;
            }
            Self::Transfer { delay_dist: Some(delay_dist) } => {
                registry.get(delay_dist)?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::NodeKind;
    use serde_json::json;

    #[test]
    fn parses_every_recognized_kind() {
        assert!(matches!(
            NodeKind::parse("source", &json!({"interval_dist": "gauss0"})).unwrap(),
            NodeKind::Source { .. }
        ));
        assert!(matches!(
            NodeKind::parse("transfer", &json!({})).unwrap(),
            NodeKind::Transfer { delay_dist: None }
        ));
        assert!(matches!(
            NodeKind::parse("transfer", &json!({"delay_dist": "wire"})).unwrap(),
            NodeKind::Transfer { delay_dist: Some(d) } if d == "wire"
        ));
        assert!(matches!(
            NodeKind::parse("burst", &json!({"delay_dist": "a", "count_dist": "b"})).unwrap(),
            NodeKind::Burst { .. }
        ));
        assert!(matches!(
            NodeKind::parse("zipit", &json!({"cardinality": 3})).unwrap(),
            NodeKind::Zipit { cardinality: 3, max_latency: 0 }
        ));
        assert!(matches!(NodeKind::parse("sink", &json!({})).unwrap(), NodeKind::Sink));
        assert!(matches!(NodeKind::parse("random", &json!({})).unwrap(), NodeKind::Random));
    }

    #[test]
    fn unknown_kind_is_malformed() {
        let err = NodeKind::parse("quux", &json!({})).unwrap_err();
        assert!(err.to_string().contains("quux"));
    }

    #[test]
    fn source_without_interval_dist_is_malformed() {
        assert!(NodeKind::parse("source", &json!({})).is_err());
    }

    #[test]
    fn burst_without_count_dist_is_malformed() {
        assert!(NodeKind::parse("burst", &json!({"delay_dist": "a"})).is_err());
    }
}
