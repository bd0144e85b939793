// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Graph construction passes.
//!
//! The passes run in a fixed order on a fresh [`GraphArena`]:
//!
//! 1. [`GraphArena::add_polygon_edges`] maps every input vertex to a merged
//!    node and every input edge to a deduplicated graph edge, linking the
//!    polygon onto the side its interior lies on.
//! 2. [`GraphArena::insert_intersection_nodes`] schedules splits where a node
//!    lies on an edge or two edges cross.
//! 3. [`GraphArena::divide_edges`] carries the scheduled splits out.
//! 4. [`GraphArena::remove_beard`] prunes dangling spurs.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::arena::{GraphArena, NodeInsertion};
use crate::error::{Error, Result};
use crate::geometry::{intersect_divisor, intersect_param, nearest_param, Obb2, PARALLEL_EPSILON};
use crate::input::Polygon;
use crate::keys::{EdgeKey, NodeKey, Side};

/// An edge-edge crossing found while inserting intersection nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEvent {
    pub edge1: EdgeKey,
    /// Parameter of the crossing along `edge1`, strictly inside `(0, 1)`.
    pub t1: f64,
    pub edge2: EdgeKey,
    /// Parameter of the crossing along `edge2`, strictly inside `(0, 1)`.
    pub t2: f64,
    /// The node at the crossing, new or merged.
    pub node: NodeKey,
}

/// Callback invoked once per edge-edge crossing, before the crossing node is
/// scheduled on either edge. Typically used to attach node user data.
pub type IntersectionHook<'a> = dyn FnMut(&mut GraphArena, &IntersectionEvent) + 'a;

fn pair_id(a: EdgeKey, b: EdgeKey) -> (EdgeKey, EdgeKey) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl GraphArena {
    /// Adds every loop of `polygon` as polygon `index` of `group`.
    ///
    /// Consecutive vertices that merge into one node produce no edge.
    pub fn add_polygon_edges(&mut self, group: usize, index: usize, polygon: &Polygon) -> Result<()> {
        let polygon_index = u32::try_from(index)
            .map_err(|_| Error::Internal(format!("polygon index {index} exceeds u32")))?;
        for l in &polygon.loops {
            let mut nodes = Vec::with_capacity(l.len());
            for v in &l.vertices {
                let node = self.find_or_add_node(v.position());
                if let Some(data) = &v.user_data {
                    self.set_node_user_data(node, group, data.clone());
                }
                nodes.push(node);
            }

            let n = nodes.len();
            for i in 0..n {
                let (a, b) = (nodes[i], nodes[(i + 1) % n]);
                if a == b {
                    continue;
                }
                let key = self.find_or_add_edge(a, b)?;
                let edge = &mut self.edges[key];
                let side = Side::from_forward(edge.from == a);
                edge.link_polygon(side, group, polygon_index);
                if let Some(data) = l.edge_data(i) {
                    edge.set_user_data(side, group, data.clone());
                }
            }
        }
        Ok(())
    }

    /// Schedules a split wherever a node lies on an edge (within epsilon, away
    /// from both endpoints) or two edges cross strictly inside both. Returns
    /// the number of scheduled splits.
    ///
    /// An edge pair already related through a node-on-edge split is not
    /// tested for crossing again.
    pub fn insert_intersection_nodes(&mut self, mut hook: Option<&mut IntersectionHook<'_>>) -> usize {
        let eps = self.epsilon();
        let eps2 = eps * eps;
        let keys = self.edge_keys();
        let mut tested: FxHashSet<(EdgeKey, EdgeKey)> = FxHashSet::default();
        let mut scheduled = 0;

        for &key in &keys {
            let Some((p1, p2)) = self.edge_points(key, Side::Right) else {
                continue;
            };
            let (from, to) = (self.edges[key].from, self.edges[key].to);
            let v = p2 - p1;
            for node in self.query_nodes(&Obb2::segment(p1, p2).expanded(eps)) {
                if node == from || node == to {
                    continue;
                }
                let pos = self.nodes[node].position;
                let t = nearest_param(p1, v, pos);
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let c = p1 + v * t;
                if (pos - c).norm_squared() > eps2 {
                    continue;
                }
                if (c - p1).norm_squared() <= eps2 || (c - p2).norm_squared() <= eps2 {
                    continue;
                }
                self.edges[key].insertions.push(NodeInsertion { t, node });
                scheduled += 1;
                for &other in &self.nodes[node].edges {
                    tested.insert(pair_id(key, other));
                }
            }
        }
        let on_edge = scheduled;

        for &key1 in &keys {
            let Some((p1, q1)) = self.edge_points(key1, Side::Right) else {
                continue;
            };
            let v1 = q1 - p1;
            for key2 in self.query_edges(&Obb2::segment(p1, q1).expanded(eps)) {
                if !tested.insert(pair_id(key1, key2)) {
                    continue;
                }
                let (e1, e2) = (&self.edges[key1], &self.edges[key2]);
                if key1 == key2 || e1.is_adjacent(e2) {
                    continue;
                }
                let (from1, to1, from2, to2) = (e1.from, e1.to, e2.from, e2.to);
                let Some((p2, q2)) = self.edge_points(key2, Side::Right) else {
                    continue;
                };
                let v2 = q2 - p2;

                let divisor = intersect_divisor(&v1, &v2);
                if divisor.abs() <= PARALLEL_EPSILON {
                    continue;
                }
                let pv = p2 - p1;
                let t1 = intersect_param(&pv, &v2, divisor);
                if t1 <= 0.0 || 1.0 <= t1 {
                    continue;
                }
                let t2 = intersect_param(&pv, &v1, divisor);
                if t2 <= 0.0 || 1.0 <= t2 {
                    continue;
                }

                let node = self.find_or_add_node(p1 + v1 * t1);
                let touch1 = node == from1 || node == to1;
                let touch2 = node == from2 || node == to2;
                if touch1 && touch2 {
                    continue;
                }
                if let Some(hook) = hook.as_deref_mut() {
                    hook(
                        self,
                        &IntersectionEvent {
                            edge1: key1,
                            t1,
                            edge2: key2,
                            t2,
                            node,
                        },
                    );
                }
                if !touch1 {
                    self.edges[key1].insertions.push(NodeInsertion { t: t1, node });
                    scheduled += 1;
                }
                if !touch2 {
                    self.edges[key2].insertions.push(NodeInsertion { t: t2, node });
                    scheduled += 1;
                }
            }
        }

        tracing::debug!(on_edge, crossings = scheduled - on_edge, "intersection nodes scheduled");
        scheduled
    }

    /// Replaces every edge with scheduled splits by a chain of edges through
    /// the split nodes in parameter order. Each link inherits the original's
    /// polygons and user data, with sides swapped when it runs the other way.
    /// Returns the number of edges divided.
    pub fn divide_edges(&mut self) -> Result<usize> {
        let pending: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|(_, e)| !e.insertions.is_empty())
            .map(|(k, _)| k)
            .collect();

        let mut divided = 0;
        for key in pending {
            let Some(edge) = self.edges.get_mut(key) else {
                continue;
            };
            let mut insertions = std::mem::take(&mut edge.insertions);
            insertions.sort_by(|a, b| a.t.total_cmp(&b.t));
            let (from, to) = (edge.from, edge.to);

            let mut chain: SmallVec<[NodeKey; 8]> = SmallVec::new();
            chain.push(from);
            for ins in &insertions {
                if ins.node != to && !chain.contains(&ins.node) {
                    chain.push(ins.node);
                }
            }
            if chain.len() == 1 {
                continue;
            }
            chain.push(to);

            let attributes = edge.attributes();
            for pair in chain.windows(2) {
                let link = self.find_or_add_edge(pair[0], pair[1])?;
                let same_dir = self.edges[link].from == pair[0];
                self.edges[link].copy_attributes(&attributes, same_dir);
            }
            self.remove_edge(key);
            divided += 1;
        }
        Ok(divided)
    }

    /// Repeatedly removes nodes with fewer than two incident edges, together
    /// with their edge, until every remaining node has degree two or more.
    /// Returns the number of nodes removed.
    pub fn remove_beard(&mut self) -> Result<usize> {
        let mut removed = 0;
        loop {
            let dangling = self.dangling_nodes();
            if dangling.is_empty() {
                break;
            }
            for node in dangling {
                let Some(edge) = self.nodes.get(node).map(|n| n.edges.first().copied()) else {
                    continue;
                };
                if let Some(edge) = edge {
                    self.remove_edge(edge);
                }
                self.remove_node(node)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
