// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use anyhow::{Context, Result};
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use zipper_sim::{Graph, GraphConfig, SinkStats};
use std::collections::HashMap;

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run() {
        eprintln!("simzip: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let input_arg = args.next();
    let output_arg = args.next();

    let input = read_input(input_arg.as_deref())?;
    let mut config: GraphConfig = serde_json::from_str(&input).context("parsing graph configuration")?;

    let mut graph = Graph::build(&config).context("building graph")?;
    let stats = graph.run(config.main.run_time, config.main.seed);
    merge_stats(&mut config, &stats);

    let output = serde_json::to_string_pretty(&config).context("serializing result")?;
    write_output(output_arg.as_deref(), &output)
}

fn read_input(arg: Option<&str>) -> Result<String> {
    match arg {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading graph configuration from stdin")?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}")),
    }
}

fn write_output(arg: Option<&str>, content: &str) -> Result<()> {
    match arg {
        None | Some("-") => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("writing result to stdout")?;
            io::stdout().write_all(b"\n").context("writing result to stdout")
        }
        Some(path) => fs::write(path, content).with_context(|| format!("writing {path}")),
    }
}

/// Merge each sink's final statistics into its node's `data` object.
fn merge_stats(config: &mut GraphConfig, stats: &HashMap<String, SinkStats>) {
    for node in &mut config.nodes {
        let Some(sink) = stats.get(&node.name) else { continue };
        let entry = match &mut node.data {
            Value::Object(map) => map,
            other => {
                *other = Value::Object(serde_json::Map::new());
                other.as_object_mut().expect("just assigned an object")
            }
        };
        entry.insert("received".to_string(), Value::from(sink.received));
        entry.insert("last_arrival".to_string(), Value::from(sink.last_arrival));
        entry.insert(
            "inter_arrival".to_string(),
            serde_json::json!({
                "mean": sink.inter_arrival.mean(),
                "rms": sink.inter_arrival.rms(),
                "count": sink.inter_arrival.count(),
            }),
        );
    }
}
