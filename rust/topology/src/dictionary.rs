// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed key-value user data carried from input vertices and edges onto the
//! graph, and from the graph onto result edges.
//!
//! Nodes keep one dictionary per group (the data of the input vertex that
//! produced or merged into them). Edges keep one per group and per side, and
//! split fragments inherit clones of their parent's dictionaries.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::GraphArena;
use crate::keys::{EdgeKey, NodeKey, Side};

/// A typed value stored in a dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DictValue {
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<DictValue>),
}

/// A dictionary is a typed key-value map attached to a vertex, edge, loop or
/// polygon.
pub type Dictionary = FxHashMap<String, DictValue>;

impl GraphArena {
    /// Attaches vertex user data for `group` to a node, replacing any
    /// previous data of that group.
    pub fn set_node_user_data(&mut self, node: NodeKey, group: usize, data: Dictionary) {
        if let Some(n) = self.nodes.get_mut(node) {
            if n.user_data.len() <= group {
                n.user_data.resize(group + 1, None);
            }
            n.user_data[group] = Some(data);
        }
    }

    /// Vertex user data of `group` on a node, if any.
    pub fn node_user_data(&self, node: NodeKey, group: usize) -> Option<&Dictionary> {
        self.nodes.get(node)?.user_data.get(group)?.as_ref()
    }

    /// Attaches edge user data for `group` on one side of an edge.
    pub fn set_edge_user_data(&mut self, edge: EdgeKey, side: Side, group: usize, data: Dictionary) {
        if let Some(e) = self.edges.get_mut(edge) {
            e.set_user_data(side, group, data);
        }
    }

    /// Edge user data of `group` on one side of an edge, if any.
    pub fn edge_user_data(&self, edge: EdgeKey, side: Side, group: usize) -> Option<&Dictionary> {
        self.edges.get(edge)?.user_data_slots(side).get(group)?.as_ref()
    }

    /// The user data an output edge inherits: the highest group carrying
    /// data on either side wins. Within one group `side` comes first.
    pub fn inherited_user_data(&self, edge: EdgeKey, side: Side) -> Option<&Dictionary> {
        let e = self.edges.get(edge)?;
        let (near, far) = (e.user_data_slots(side), e.user_data_slots(side.opposite()));
        (0..near.len().max(far.len())).rev().find_map(|group| {
            near.get(group)
                .and_then(Option::as_ref)
                .or_else(|| far.get(group).and_then(Option::as_ref))
        })
    }
}
