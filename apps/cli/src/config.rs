// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use polybool_topology::TopologyConfig;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Merge tolerance.
    pub epsilon: f64,
    /// Validate input polygons before building the graph.
    pub validate: bool,
    /// Target items per grid cell.
    pub items_per_cell: usize,
    /// Pretty-print the JSON written to stdout.
    pub pretty: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = TopologyConfig::default();
        Self {
            epsilon: std::env::var("POLYBOOL_EPSILON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.epsilon),
            validate: parse_flag(std::env::var("POLYBOOL_VALIDATE").ok().as_deref(), defaults.validate),
            items_per_cell: std::env::var("POLYBOOL_ITEMS_PER_CELL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.items_per_cell),
            pretty: parse_flag(std::env::var("POLYBOOL_PRETTY").ok().as_deref(), false),
        }
    }

    /// Engine settings for this run.
    pub fn topology(&self) -> TopologyConfig {
        TopologyConfig {
            epsilon: self.epsilon,
            validate: self.validate,
            items_per_cell: self.items_per_cell,
            ..TopologyConfig::default()
        }
    }
}

/// `1`, `true`, `yes` and `on` are true; `0`, `false`, `no` and `off` are
/// false; anything else keeps `default`.
fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
