// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Ready-made graph configuration documents for `zipper-sim` integration
//! tests. Returned as JSON text rather than `zipper_sim::GraphConfig`
//! values, since this crate sits below `zipper-sim` in the dependency
//! graph and cannot depend back on it.

/// A single constant-interval source feeding a single sink directly.
#[must_use]
pub fn single_source_to_sink(interval: u64, run_time: u64, capacity: u64) -> String {
    format!(
        r#"{{
            "main": {{"run_time": {run_time}, "seed": 1}},
            "nodes": [
                {{"type": "random", "name": "interval", "data": {{"dist": "constant", "value": {interval}}}}},
                {{"type": "source", "name": "src", "data": {{"interval_dist": "interval"}}}},
                {{"type": "sink", "name": "snk", "data": {{}}}}
            ],
            "edges": [
                {{"tail": {{"node": "src", "port": 0}}, "head": {{"node": "snk", "port": 0}}, "data": {{"ibox": {capacity}}}}}
            ]
        }}"#
    )
}

/// Two constant-interval sources merged by a zipit node ahead of one sink.
#[must_use]
pub fn two_sources_into_zipit(interval_a: u64, interval_b: u64, run_time: u64, max_latency: u64) -> String {
    format!(
        r#"{{
            "main": {{"run_time": {run_time}, "seed": 1}},
            "nodes": [
                {{"type": "random", "name": "ia", "data": {{"dist": "constant", "value": {interval_a}}}}},
                {{"type": "random", "name": "ib", "data": {{"dist": "constant", "value": {interval_b}}}}},
                {{"type": "source", "name": "a", "data": {{"interval_dist": "ia"}}}},
                {{"type": "source", "name": "b", "data": {{"interval_dist": "ib"}}}},
                {{"type": "zipit", "name": "z", "data": {{"cardinality": 2, "max_latency": {max_latency}}}}},
                {{"type": "sink", "name": "snk", "data": {{}}}}
            ],
            "edges": [
                {{"tail": {{"node": "a", "port": 0}}, "head": {{"node": "z", "port": 0}}, "data": {{"ibox": 8}}}},
                {{"tail": {{"node": "b", "port": 0}}, "head": {{"node": "z", "port": 1}}, "data": {{"ibox": 8}}}},
                {{"tail": {{"node": "z", "port": 0}}, "head": {{"node": "snk", "port": 0}}, "data": {{"ibox": 16}}}}
            ]
        }}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_source_fixture_is_valid_json() {
        let doc = single_source_to_sink(10, 100, 4);
        let parsed: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed["nodes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn zipit_fixture_is_valid_json() {
        let doc = two_sources_into_zipit(5, 7, 200, 0);
        let parsed: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed["edges"].as_array().unwrap().len(), 3);
    }
}
