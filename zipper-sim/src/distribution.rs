// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Named random distributions declared by `random` service nodes and
//! referenced by name from other nodes (e.g. a source's inter-arrival
//! time). Supplements the distilled configuration format with the
//! distribution shapes the original simulator offered.

use rand::Rng;
use rand_distr::{Distribution as _, Exp, Normal, Uniform};
use serde_json::Value;
use std::collections::HashMap;
use zipper_core::{Result, ZipperError};

use crate::config::NodeConfig;

/// A sampleable random distribution over `f64`.
#[derive(Debug)]
pub enum Distribution {
    Constant(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
    Exponential(Exp<f64>),
}

impl Distribution {
    /// Draw one sample.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::Uniform(d) => d.sample(rng),
            Self::Normal(d) => d.sample(rng),
            Self::Exponential(d) => d.sample(rng),
        }
    }

    fn parse(name: &str, data: &Value) -> Result<Self> {
        let field = |key: &str| -> Result<f64> {
            data.get(key)
                .and_then(Value::as_f64)
                .ok_or_else(|| ZipperError::malformed(format!("distribution {name:?} missing numeric field {key:?}")))
        };
        let dist = data
            .get("dist")
            .and_then(Value::as_str)
            .ok_or_else(|| ZipperError::malformed(format!("distribution {name:?} missing string field \"dist\"")))?;

        match dist {
            "constant" => Ok(Self::Constant(field("value")?)),
            "uniform" => {
                let (low, high) = (field("low")?, field("high")?);
                Ok(Self::Uniform(Uniform::new(low, high).map_err(|e| {
                    ZipperError::malformed(format!("distribution {name:?} has an invalid uniform range: {e}"))
                })?))
            }
            "normal" => {
                let (mean, stddev) = (field("mean")?, field("stddev")?);
                Ok(Self::Normal(Normal::new(mean, stddev).map_err(|e| {
                    ZipperError::malformed(format!("distribution {name:?} has an invalid normal spread: {e}"))
                })?))
            }
            "exponential" => {
                let lambda = field("lambda")?;
                Ok(Self::Exponential(Exp::new(lambda).map_err(|e| {
                    ZipperError::malformed(format!("distribution {name:?} has an invalid exponential rate: {e}"))
                })?))
            }
            other => Err(ZipperError::malformed(format!(
                "distribution {name:?} names an unknown shape {other:?}"
            ))),
        }
    }
}

/// The set of distributions declared by `random`-typed nodes, keyed by
/// node name.
#[derive(Debug)]
pub struct DistributionRegistry {
    distributions: HashMap<String, Distribution>,
}

impl DistributionRegistry {
    /// Build a registry from every `random`-typed entry in `nodes`.
    ///
    /// # Errors
    /// Returns [`ZipperError::Malformed`] if a `random` node's `data`
    /// doesn't describe a recognized distribution shape.
    pub fn build(nodes: &[NodeConfig]) -> Result<Self> {
        let mut distributions = HashMap::new();
        for node in nodes {
            if node.kind == "random" {
                distributions.insert(node.name.clone(), Distribution::parse(&node.name, &node.data)?);
            }
        }
        Ok(Self { distributions })
    }

    /// Look up a distribution by the name a `random` node declared it
    /// under.
    ///
    /// # Errors
    /// Returns [`ZipperError::UndeclaredReference`] if `name` was never
    /// declared.
    pub fn get(&self, name: &str) -> Result<&Distribution> {
        self.distributions
            .get(name)
            .ok_or_else(|| ZipperError::undeclared("distribution", name))
    }
}
