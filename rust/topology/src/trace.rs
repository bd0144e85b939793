// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face tracing over the merged graph.
//!
//! A face is traced by walking directed edges with the face on the right
//! hand. At every node the walk takes the sharpest right turn among the
//! edge sides not yet traced in the current pass, so each pass visits every
//! `(edge, side)` at most once and the loops it closes are exactly the faces
//! of the planar subdivision restricted to the sides the pass allows.

use serde::{Deserialize, Serialize};

use crate::arena::{EdgeFlags, GraphArena};
use crate::boolean::EdgeFilter;
use crate::geometry::{right_angle, signed_area, Point, Range2};
use crate::keys::{EdgeKey, NodeKey, Side};

/// An edge traversed in one direction; `side` is the side kept on the
/// right hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EDir {
    pub edge: EdgeKey,
    pub side: Side,
}

impl EDir {
    pub fn new(edge: EdgeKey, side: Side) -> Self {
        Self { edge, side }
    }

    /// The same edge walked the other way.
    pub fn reversed(self) -> Self {
        Self::new(self.edge, self.side.opposite())
    }

    /// Node the traversal leaves from.
    pub fn from_node(self, graph: &GraphArena) -> Option<NodeKey> {
        graph.edge(self.edge).map(|e| e.start_node(self.side))
    }

    /// Node the traversal arrives at.
    pub fn to_node(self, graph: &GraphArena) -> Option<NodeKey> {
        graph.edge(self.edge).map(|e| e.end_node(self.side))
    }
}

/// Which way a trace turns at a junction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPolicy {
    /// Sharpest right turn: the smallest face on the right.
    #[default]
    Rightmost,
    /// Sharpest left turn.
    Leftmost,
}

/// The flags a trace pass sets on the sides it walks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TracePass {
    traced: [EdgeFlags; 2],
    enabled: Option<[EdgeFlags; 2]>,
}

impl TracePass {
    /// Full polygonization: every side, once per topology build.
    pub const POLYGONIZE: Self = Self {
        traced: [EdgeFlags::RIGHT_POLYGONIZED, EdgeFlags::LEFT_POLYGONIZED],
        enabled: None,
    };

    /// Filtered composition: sides the filter ignores are pre-marked
    /// removed, sides yielded as part of a kept loop are marked enabled.
    pub const FILTER: Self = Self {
        traced: [EdgeFlags::RIGHT_REMOVED, EdgeFlags::LEFT_REMOVED],
        enabled: Some([EdgeFlags::RIGHT_ENABLED, EdgeFlags::LEFT_ENABLED]),
    };

    fn index(side: Side) -> usize {
        match side {
            Side::Right => 0,
            Side::Left => 1,
        }
    }

    pub fn traced(&self, side: Side) -> EdgeFlags {
        self.traced[Self::index(side)]
    }

    fn enabled(&self, side: Side) -> EdgeFlags {
        self.enabled
            .map(|e| e[Self::index(side)])
            .unwrap_or_else(EdgeFlags::empty)
    }

    fn marks(&self, side: Side) -> EdgeFlags {
        self.traced(side) | self.enabled(side)
    }
}

/// A closed traced loop with its area, winding and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ELoop {
    pub edges: Vec<EDir>,
    /// Absolute area.
    pub area: f64,
    /// Clockwise (or degenerate, zero-area) winding.
    pub cw: bool,
    pub range: Range2,
}

impl ELoop {
    pub fn new(graph: &GraphArena, edges: Vec<EDir>) -> Self {
        let points = dir_points(graph, &edges);
        let area = signed_area(points.iter().copied());
        Self {
            edges,
            area: area.abs(),
            cw: area <= 0.0,
            range: Range2::from_points(points),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Start positions of every directed edge, in order.
    pub fn points(&self, graph: &GraphArena) -> Vec<Point> {
        dir_points(graph, &self.edges)
    }

    /// Start nodes of every directed edge, in order.
    pub fn nodes(&self, graph: &GraphArena) -> Vec<NodeKey> {
        self.edges.iter().filter_map(|d| d.from_node(graph)).collect()
    }

    /// Walks the loop the other way round, flipping the winding.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for d in &mut self.edges {
            *d = d.reversed();
        }
        self.cw = !self.cw;
    }

    /// Signed area, negative for a clockwise loop.
    pub fn signed_area(&self) -> f64 {
        if self.cw {
            -self.area
        } else {
            self.area
        }
    }
}

fn dir_points(graph: &GraphArena, edges: &[EDir]) -> Vec<Point> {
    edges
        .iter()
        .filter_map(|d| graph.node_position(d.from_node(graph)?))
        .collect()
}

impl GraphArena {
    /// Traces the face on `side` of `start`. Returns `None` when the loop is
    /// null: it dead-ends, closes with fewer than three edges, or no edge of
    /// it has a polygon on the traced side.
    pub(crate) fn trace_loop(
        &mut self,
        start: EdgeKey,
        side: Side,
        pass: TracePass,
        turn: TurnPolicy,
    ) -> Option<Vec<EDir>> {
        let first = self.edges.get(start)?;
        let mut cur_node = first.start_node(side);
        let mut next_node = first.end_node(side);
        let mut edge_key = start;
        let mut side = side;
        let mut is_null = true;
        let mut dead_end = false;
        let mut result = Vec::new();

        loop {
            result.push(EDir::new(edge_key, side));
            let edge = &mut self.edges[edge_key];
            edge.flags.insert(pass.marks(side));
            if is_null && edge.group_max(side).is_some() {
                is_null = false;
            }
            let length = edge.length;

            let next_pos = self.nodes[next_node].position;
            let back = self.nodes[cur_node].position - next_pos;
            let normal = match turn {
                TurnPolicy::Rightmost => right_angle(back),
                TurnPolicy::Leftmost => -right_angle(back),
            };

            // Sweeping from `back` towards `normal`, earlier candidates get
            // higher keys.
            let mut best: Option<(EdgeKey, NodeKey, Side)> = None;
            let mut best_key = f64::MIN;
            for &candidate in &self.nodes[next_node].edges {
                if candidate == edge_key {
                    continue;
                }
                let e = &self.edges[candidate];
                let cand_side = Side::from_forward(e.from == next_node);
                if candidate != start && e.flags.contains(pass.traced(cand_side)) {
                    continue;
                }
                let far = e.end_node(cand_side);
                let dir = self.nodes[far].position - next_pos;
                let cos = back.dot(&dir) / (length * e.length);
                let key = if normal.dot(&dir) >= 0.0 {
                    cos + 1.0
                } else {
                    -1.0 - cos
                };
                if best_key < key {
                    best = Some((candidate, far, cand_side));
                    best_key = key;
                }
            }

            match best {
                Some((next, _, _)) if next == start => {
                    if result.len() < 3 {
                        is_null = true;
                    }
                    break;
                }
                Some((next, far, next_side)) => {
                    edge_key = next;
                    cur_node = next_node;
                    next_node = far;
                    side = next_side;
                }
                None => {
                    is_null = true;
                    dead_end = true;
                    break;
                }
            }
        }

        if dead_end && pass.enabled.is_none() {
            tracing::warn!(edges = result.len(), "trace ended on a dangling edge");
        }
        if is_null {
            tracing::trace!(edges = result.len(), dead_end, "null loop");
            if pass.enabled.is_some() {
                for d in &result {
                    let enabled = pass.enabled(d.side);
                    self.edges[d.edge].flags.remove(enabled);
                }
            }
            return None;
        }
        tracing::trace!(edges = result.len(), "loop closed");
        Some(result)
    }

    /// Marks every side the filter ignores as removed, then traces every
    /// remaining right side followed by every remaining left side.
    pub fn trace_faces<F: EdgeFilter + ?Sized>(&mut self, filter: &F) -> Vec<Vec<EDir>> {
        let keys = self.edge_keys();
        let reset = EdgeFlags::RIGHT_REMOVED
            | EdgeFlags::LEFT_REMOVED
            | EdgeFlags::RIGHT_ENABLED
            | EdgeFlags::LEFT_ENABLED;
        for &key in &keys {
            let edge = &self.edges[key];
            let ignore_right = filter.ignore(self, edge, Side::Right);
            let ignore_left = filter.ignore(self, edge, Side::Left);
            let flags = &mut self.edges[key].flags;
            flags.remove(reset);
            if ignore_right {
                flags.insert(EdgeFlags::RIGHT_REMOVED);
            }
            if ignore_left {
                flags.insert(EdgeFlags::LEFT_REMOVED);
            }
        }
        self.trace_all(&keys, TracePass::FILTER)
    }

    /// Traces every face of the whole graph and unifies polygon membership
    /// around each face: every `(group, polygon)` seen on the traced side of
    /// any of its edges is linked onto the traced side of all of them.
    /// Returns the number of faces.
    pub fn polygonize_all(&mut self) -> usize {
        let keys = self.edge_keys();
        let loops = self.trace_all(&keys, TracePass::POLYGONIZE);
        let mut members: Vec<(usize, u32)> = Vec::new();
        for l in &loops {
            members.clear();
            for d in l {
                members.extend(self.edges[d.edge].polygons(d.side).iter());
            }
            members.sort_unstable();
            members.dedup();
            for d in l {
                let edge = &mut self.edges[d.edge];
                for &(group, polygon) in &members {
                    edge.link_polygon(d.side, group, polygon);
                }
            }
        }
        loops.len()
    }

    fn trace_all(&mut self, keys: &[EdgeKey], pass: TracePass) -> Vec<Vec<EDir>> {
        let mut loops = Vec::new();
        for side in Side::BOTH {
            let traced = pass.traced(side);
            for &key in keys {
                if self.edges[key].flags.contains(traced) {
                    continue;
                }
                if let Some(l) = self.trace_loop(key, side, pass, TurnPolicy::Rightmost) {
                    loops.push(l);
                }
            }
        }
        loops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Edge;
    use approx::assert_relative_eq;

    fn graph(groups: usize) -> GraphArena {
        let range = Range2::new(Point::new(-1.0, -1.0), Point::new(3.0, 3.0));
        GraphArena::new(range, 2, 1e-6, groups).unwrap()
    }

    /// Adds a clockwise ring with `(group, polygon)` on its right.
    fn ring(g: &mut GraphArena, pts: &[(f64, f64)], group: usize, polygon: u32) {
        let nodes: Vec<NodeKey> = pts
            .iter()
            .map(|&(x, y)| g.find_or_add_node(Point::new(x, y)))
            .collect();
        for i in 0..nodes.len() {
            let (a, b) = (nodes[i], nodes[(i + 1) % nodes.len()]);
            let e = g.find_or_add_edge(a, b).unwrap();
            let side = Side::from_forward(g.edge(e).unwrap().from() == a);
            g.link_polygon(e, side, group, polygon);
        }
    }

    fn linked_anywhere(_: &GraphArena, e: &Edge, side: Side) -> bool {
        e.group_max(side).is_none()
    }

    fn internal(_: &GraphArena, e: &Edge, _: Side) -> bool {
        e.group_max(Side::Right).is_some() && e.group_max(Side::Left).is_some()
    }

    #[test]
    fn single_square_traces_one_face() {
        let mut g = graph(1);
        ring(&mut g, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], 0, 0);

        let faces = g.trace_faces(&linked_anywhere);
        assert_eq!(faces.len(), 1);
        let l = ELoop::new(&g, faces[0].clone());
        assert_eq!(l.len(), 4);
        assert!(l.cw);
        assert_relative_eq!(l.area, 1.0);
        assert_relative_eq!(l.signed_area(), -1.0);
    }

    #[test]
    fn exterior_face_is_null() {
        let mut g = graph(1);
        ring(&mut g, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], 0, 0);
        assert_eq!(g.polygonize_all(), 1);
        for (_, e) in g.edges() {
            assert!(e.flags().contains(EdgeFlags::RIGHT_POLYGONIZED | EdgeFlags::LEFT_POLYGONIZED));
        }
    }

    #[test]
    fn shared_edge_is_dropped_from_union_face() {
        let mut g = graph(2);
        ring(&mut g, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], 0, 0);
        ring(&mut g, &[(1.0, 0.0), (1.0, 1.0), (2.0, 1.0), (2.0, 0.0)], 1, 0);
        assert_eq!(g.edge_count(), 7);

        let faces = g.trace_faces(&internal);
        assert_eq!(faces.len(), 1);
        let l = ELoop::new(&g, faces[0].clone());
        assert_eq!(l.len(), 6);
        assert_relative_eq!(l.area, 2.0);
        assert!(l.cw);
    }

    #[test]
    fn null_loop_rolls_back_enabled_marks() {
        let mut g = graph(1);
        ring(&mut g, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], 0, 0);
        g.trace_faces(&|_: &GraphArena, _: &Edge, _: Side| false);
        for (_, e) in g.edges() {
            let inner = Side::Right;
            assert!(e.polygons(inner).get(0).is_some());
            assert!(e.flags().contains(EdgeFlags::RIGHT_ENABLED));
            assert!(!e.flags().contains(EdgeFlags::LEFT_ENABLED));
            assert!(e.flags().contains(EdgeFlags::RIGHT_REMOVED | EdgeFlags::LEFT_REMOVED));
        }
    }

    #[test]
    fn polygonize_unifies_membership_around_a_face() {
        let mut g = graph(2);
        ring(&mut g, &[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)], 0, 0);
        // Only one edge of the same face knows about group 1.
        let a = g.find_node_near(Point::new(0.0, 0.0)).unwrap();
        let b = g.find_node_near(Point::new(0.0, 2.0)).unwrap();
        let e = g.find_edge(a, b).unwrap();
        let side = Side::from_forward(g.edge(e).unwrap().from() == a);
        g.link_polygon(e, side, 1, 3);

        g.polygonize_all();
        for (_, e) in g.edges() {
            let inner = if e.polygons(Side::Right).get(0).is_some() {
                Side::Right
            } else {
                Side::Left
            };
            assert_eq!(e.polygons(inner).get(1), Some(3));
            assert_eq!(e.polygons(inner.opposite()).count(), 0);
        }
    }

    #[test]
    fn reverse_flips_winding_and_sides() {
        let mut g = graph(1);
        ring(&mut g, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], 0, 0);
        let faces = g.trace_faces(&linked_anywhere);
        let mut l = ELoop::new(&g, faces[0].clone());
        let before = l.points(&g);
        l.reverse();
        assert!(!l.cw);
        let after = l.points(&g);
        assert_eq!(after.len(), 4);
        assert_relative_eq!(signed_area(after.iter().copied()), 1.0);
        assert!(before.iter().all(|p| after.contains(p)));
    }

    #[test]
    fn turn_policy_picks_junction_branch() {
        let mut g = graph(1);
        let o = g.find_or_add_node(Point::new(0.0, 0.0));
        let e = g.find_or_add_node(Point::new(1.0, 0.0));
        let n = g.find_or_add_node(Point::new(0.0, 1.0));
        let w = g.find_or_add_node(Point::new(-1.0, 0.0));
        let start = g.find_or_add_edge(w, o).unwrap();
        let to_e = g.find_or_add_edge(o, e).unwrap();
        let to_n = g.find_or_add_edge(o, n).unwrap();

        // Heading east into `o` with no southern branch, the rightmost turn
        // goes straight on and dead-ends at `e`.
        let right = g.trace_loop(start, Side::Right, TracePass::POLYGONIZE, TurnPolicy::Rightmost);
        assert!(right.is_none());
        assert!(g.edge(to_n).unwrap().flags().is_empty());
        assert!(!g.edge(to_e).unwrap().flags().is_empty());

        let left = g.trace_loop(start, Side::Right, TracePass::POLYGONIZE, TurnPolicy::Leftmost);
        assert!(left.is_none());
        assert!(g.edge(to_n).unwrap().flags().contains(EdgeFlags::RIGHT_POLYGONIZED));
    }
}
