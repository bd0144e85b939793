// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PolyBool CLI - boolean operations on JSON polygon groups.
//!
//! Reads a document of polygon groups, builds the merged topology and
//! writes the result polygons to stdout as JSON. Logs go to stderr.
//!
//! Usage:
//!   polybool <operation> <input.json> [--verbose]

use std::env;
use std::fs;

use anyhow::{Context, Result};
use polybool_topology::{BooleanOp, PolyBool, Polygon, PolygonGroup};
use serde::{Deserialize, Serialize};

mod config;

use config::Config;

/// Input document: `groups[g][p]` is polygon `p` of group `g`.
#[derive(Debug, Deserialize)]
struct InputDocument {
    groups: Vec<PolygonGroup>,
}

#[derive(Debug, Serialize)]
struct OutputDocument<'a> {
    operation: &'a str,
    polygons: Vec<Polygon>,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }
    if args.len() < 3 {
        eprintln!("Missing input file");
        print_usage();
        std::process::exit(1);
    }

    let operation = args[1].as_str();
    let input_path = args[2].as_str();
    let mut verbose = false;
    for arg in &args[3..] {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
    }

    let default_filter = if verbose {
        "info,polybool_topology=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::info!(
        epsilon = config.epsilon,
        validate = config.validate,
        items_per_cell = config.items_per_cell,
        "Starting PolyBool"
    );

    let text = fs::read_to_string(input_path)
        .with_context(|| format!("cannot read input '{}'", input_path))?;
    let input: InputDocument = serde_json::from_str(&text)
        .with_context(|| format!("cannot parse input '{}'", input_path))?;

    let mut engine = PolyBool::with_config(config.topology())?;
    for group in input.groups {
        engine.add_group(group);
    }
    engine
        .create_topology()
        .context("failed to build topology")?;

    let json = if operation == "dump" {
        engine.to_json()?
    } else {
        let op: BooleanOp = operation.parse().map_err(anyhow::Error::msg)?;
        let result = engine.apply(op)?;
        let output = OutputDocument {
            operation,
            polygons: engine.to_polygons(&result)?,
        };
        tracing::info!(
            polygons = output.polygons.len(),
            area = result.iter().map(|p| p.area()).sum::<f64>(),
            "Operation complete"
        );
        if config.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        }
    };
    println!("{}", json);
    Ok(())
}

fn print_usage() {
    eprintln!(
        r#"PolyBool - polygon boolean operations

Usage:
  polybool <operation> <input.json> [--verbose]

Operations:
  or              Union of all groups
  and             Area covered by every group
  xor             Area covered by an odd number of groups
  sub:<g>         All other groups minus group <g>
  extract:<g>     Polygons of group <g> split at every shared node
  dump            The merged graph as JSON

Input:
  {{"groups": [[{{"loops": [{{"vertices": [{{"x": 0, "y": 0}}, ...]}}]}}]]}}
  Outer loops wind clockwise, holes counter-clockwise (y-up).

Options:
  -v, --verbose   Debug logging for the engine
  -h, --help      Show this help

Environment:
  POLYBOOL_EPSILON         Merge tolerance (default: 1e-4)
  POLYBOOL_VALIDATE        Validate input first (default: true)
  POLYBOOL_ITEMS_PER_CELL  Grid density (default: 10)
  POLYBOOL_PRETTY          Pretty-print output JSON (default: false)
  RUST_LOG                 Log filter, overrides --verbose"#
    );
}
