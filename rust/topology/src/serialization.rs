// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for merged graphs.
//!
//! A snapshot stores every node with its position and per-group user data,
//! and every edge with its endpoints and per-side polygon slots. Slot map
//! keys are mapped to sequential integer IDs so the format stays portable
//! and diffable.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::{EdgeFlags, GraphArena};
use crate::boolean::PolyBool;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::geometry::{Point, Range2};
use crate::keys::{NodeKey, Side};
use crate::spatial::GridSpace;

/// Serializable representation of a whole graph.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub epsilon: f64,
    pub group_count: usize,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_data: Vec<Option<Dictionary>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub id: usize,
    pub from: usize,
    pub to: usize,
    /// Polygon index per group on the right side.
    pub right: Vec<Option<u32>>,
    /// Polygon index per group on the left side.
    pub left: Vec<Option<u32>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub right_user_data: Vec<Option<Dictionary>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub left_user_data: Vec<Option<Dictionary>>,
    /// Trace bookkeeping bits, see [`EdgeFlags`].
    #[serde(default)]
    pub flags: u8,
}

impl GraphArena {
    /// Serializes the graph to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_snapshot(&self) -> GraphSnapshot {
        let mut node_ids = FxHashMap::default();
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, (k, n))| {
                node_ids.insert(k, i);
                NodeSnapshot {
                    id: i,
                    x: n.position.x,
                    y: n.position.y,
                    user_data: n.user_data.clone(),
                }
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, (_, e))| EdgeSnapshot {
                id: i,
                from: node_ids[&e.from],
                to: node_ids[&e.to],
                right: e.right.as_slice().to_vec(),
                left: e.left.as_slice().to_vec(),
                right_user_data: e.right_user_data.clone(),
                left_user_data: e.left_user_data.clone(),
                flags: e.flags.bits(),
            })
            .collect();

        GraphSnapshot {
            epsilon: self.epsilon(),
            group_count: self.group_count(),
            nodes,
            edges,
        }
    }

    /// Deserializes a graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Rebuilds a graph, sizing its grids from the node extent.
    pub fn from_snapshot(snap: &GraphSnapshot) -> Result<Self> {
        let mut range = Range2::from_points(snap.nodes.iter().map(|n| Point::new(n.x, n.y)));
        if !range.is_valid() {
            range = Range2::new(Point::origin(), Point::origin());
        }
        let division = GridSpace::<()>::division_for(snap.nodes.len(), 10);
        let mut graph = GraphArena::new(
            range.expand(snap.epsilon),
            division,
            snap.epsilon,
            snap.group_count,
        )?;

        let mut node_keys: Vec<NodeKey> = Vec::with_capacity(snap.nodes.len());
        for ns in &snap.nodes {
            let key = graph.find_or_add_node(Point::new(ns.x, ns.y));
            for (group, data) in ns.user_data.iter().enumerate() {
                if let Some(data) = data {
                    graph.set_node_user_data(key, group, data.clone());
                }
            }
            node_keys.push(key);
        }

        let node = |id: usize| {
            node_keys
                .get(id)
                .copied()
                .ok_or_else(|| Error::Serialization(format!("edge refers to missing node {id}")))
        };
        for es in &snap.edges {
            let key = graph.find_or_add_edge(node(es.from)?, node(es.to)?)?;
            graph.edges[key].flags = EdgeFlags::from_bits(es.flags);
            let sides = [
                (Side::Right, &es.right, &es.right_user_data),
                (Side::Left, &es.left, &es.left_user_data),
            ];
            for (side, polygons, user_data) in sides {
                for (group, polygon) in polygons.iter().enumerate() {
                    if let Some(polygon) = polygon {
                        graph.link_polygon(key, side, group, *polygon);
                    }
                }
                for (group, data) in user_data.iter().enumerate() {
                    if let Some(data) = data {
                        graph.set_edge_user_data(key, side, group, data.clone());
                    }
                }
            }
        }
        Ok(graph)
    }
}

impl PolyBool {
    /// The merged graph as JSON.
    pub fn to_json(&self) -> Result<String> {
        self.graph().ok_or(Error::TopologyNotBuilt)?.to_json()
    }
}
