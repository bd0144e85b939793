// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the planar node/edge graph.
//!
//! The [`GraphArena`] owns every node and edge of one topology generation.
//! Nodes and edges live in slot maps with generational keys; an edge stores
//! its two endpoint keys and every node stores the keys of its incident
//! edges. Two uniform grids (one per entity kind) back the proximity
//! queries used for epsilon merging and intersection search.
//!
//! ## Sides and provenance
//!
//! Every edge is stored once, undirected, under a canonical node pair. Each
//! side of it (relative to `from -> to`) records, per input group, at most
//! one polygon index of that group lying on that side. That record is what
//! the boolean filters read.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::geometry::{Obb2, Point, Range2};
use crate::keys::{EdgeKey, NodeKey, Side};
use crate::spatial::GridSpace;

/// Per-group polygon slots of one edge side. Slot `g` holds the index of the
/// group-`g` polygon lying on that side, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolygonIndices(SmallVec<[Option<u32>; 4]>);

impl PolygonIndices {
    /// All slots unset.
    pub fn new(groups: usize) -> Self {
        Self(SmallVec::from_elem(None, groups))
    }

    pub fn get(&self, group: usize) -> Option<u32> {
        self.0.get(group).copied().flatten()
    }

    /// Number of slots (registered groups).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of groups with a polygon linked.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|p| p.is_some()).count()
    }

    /// Highest group index with a polygon linked.
    pub fn max_group(&self) -> Option<usize> {
        self.0.iter().rposition(|p| p.is_some())
    }

    /// True if some group has no polygon linked.
    pub fn any_unset(&self) -> bool {
        self.0.iter().any(|p| p.is_none())
    }

    /// `(group, polygon)` pairs of the linked slots, ascending by group.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(g, p)| p.map(|p| (g, p)))
    }

    pub fn as_slice(&self) -> &[Option<u32>] {
        &self.0
    }

    /// Sets slot `group` unless it is already set. Returns whether it changed.
    fn link(&mut self, group: usize, polygon: u32) -> bool {
        match self.0.get_mut(group) {
            Some(slot) if slot.is_none() => {
                *slot = Some(polygon);
                true
            }
            _ => false,
        }
    }
}

/// Trace bookkeeping bits of an edge, one of each per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EdgeFlags(u8);

impl EdgeFlags {
    pub const RIGHT_POLYGONIZED: Self = Self(1 << 0);
    pub const LEFT_POLYGONIZED: Self = Self(1 << 1);
    pub const RIGHT_REMOVED: Self = Self(1 << 2);
    pub const LEFT_REMOVED: Self = Self(1 << 3);
    pub const RIGHT_ENABLED: Self = Self(1 << 4);
    pub const LEFT_ENABLED: Self = Self(1 << 5);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Picks the right- or left-side flag of a pair.
    pub fn for_side(side: Side, right: Self, left: Self) -> Self {
        match side {
            Side::Right => right,
            Side::Left => left,
        }
    }
}

impl std::ops::BitOr for EdgeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A unique, epsilon-merged point.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) position: Point,
    pub(crate) edges: SmallVec<[EdgeKey; 4]>,
    /// Vertex user data, indexed by group.
    pub(crate) user_data: Vec<Option<Dictionary>>,
}

impl Node {
    fn new(position: Point) -> Self {
        Self {
            position,
            edges: SmallVec::new(),
            user_data: Vec::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Incident edges.
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

/// A scheduled split of an edge at parameter `t` by `node`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeInsertion {
    pub t: f64,
    pub node: NodeKey,
}

/// The per-side provenance of an edge, copied onto split fragments.
#[derive(Debug, Clone)]
pub(crate) struct EdgeAttributes {
    right: PolygonIndices,
    left: PolygonIndices,
    right_user_data: Vec<Option<Dictionary>>,
    left_user_data: Vec<Option<Dictionary>>,
}

/// A deduplicated undirected connection between two distinct nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) from: NodeKey,
    pub(crate) to: NodeKey,
    pub(crate) length: f64,
    pub(crate) right: PolygonIndices,
    pub(crate) left: PolygonIndices,
    pub(crate) right_user_data: Vec<Option<Dictionary>>,
    pub(crate) left_user_data: Vec<Option<Dictionary>>,
    pub(crate) flags: EdgeFlags,
    pub(crate) insertions: Vec<NodeInsertion>,
}

impl Edge {
    pub fn from(&self) -> NodeKey {
        self.from
    }

    pub fn to(&self) -> NodeKey {
        self.to
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn flags(&self) -> EdgeFlags {
        self.flags
    }

    /// Polygon slots on `side`.
    pub fn polygons(&self, side: Side) -> &PolygonIndices {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }

    /// Highest group with a polygon linked on `side`.
    pub fn group_max(&self, side: Side) -> Option<usize> {
        self.polygons(side).max_group()
    }

    /// Number of groups with a polygon linked on `side`.
    pub fn group_count(&self, side: Side) -> usize {
        self.polygons(side).count()
    }

    /// True if `group` has a polygon on either side.
    pub fn is_group_linked(&self, group: usize) -> bool {
        self.right.get(group).is_some() || self.left.get(group).is_some()
    }

    /// True if polygon `(group, polygon)` lies on either side.
    pub fn is_polygon_linked(&self, group: usize, polygon: u32) -> bool {
        self.right.get(group) == Some(polygon) || self.left.get(group) == Some(polygon)
    }

    /// The endpoint the edge leaves from when traced on `side`.
    pub fn start_node(&self, side: Side) -> NodeKey {
        match side {
            Side::Right => self.from,
            Side::Left => self.to,
        }
    }

    /// The endpoint the edge arrives at when traced on `side`.
    pub fn end_node(&self, side: Side) -> NodeKey {
        match side {
            Side::Right => self.to,
            Side::Left => self.from,
        }
    }

    /// True if the edges share an endpoint, or are the same edge. Such pairs
    /// cannot cross in their interiors.
    pub fn is_adjacent(&self, other: &Edge) -> bool {
        self.from == other.from
            || self.from == other.to
            || self.to == other.from
            || self.to == other.to
    }

    pub(crate) fn link_polygon(&mut self, side: Side, group: usize, polygon: u32) -> bool {
        match side {
            Side::Right => self.right.link(group, polygon),
            Side::Left => self.left.link(group, polygon),
        }
    }

    pub(crate) fn user_data_slots(&self, side: Side) -> &[Option<Dictionary>] {
        match side {
            Side::Right => &self.right_user_data,
            Side::Left => &self.left_user_data,
        }
    }

    pub(crate) fn set_user_data(&mut self, side: Side, group: usize, data: Dictionary) {
        let slots = match side {
            Side::Right => &mut self.right_user_data,
            Side::Left => &mut self.left_user_data,
        };
        if slots.len() <= group {
            slots.resize(group + 1, None);
        }
        slots[group] = Some(data);
    }

    pub(crate) fn attributes(&self) -> EdgeAttributes {
        EdgeAttributes {
            right: self.right.clone(),
            left: self.left.clone(),
            right_user_data: self.right_user_data.clone(),
            left_user_data: self.left_user_data.clone(),
        }
    }

    /// Links every polygon (and its user data) of `source` onto this edge.
    /// With `same_dir == false` the source runs the other way, so its sides
    /// are swapped.
    pub(crate) fn copy_attributes(&mut self, source: &EdgeAttributes, same_dir: bool) {
        let pairs = if same_dir {
            [
                (Side::Right, &source.right, &source.right_user_data),
                (Side::Left, &source.left, &source.left_user_data),
            ]
        } else {
            [
                (Side::Right, &source.left, &source.left_user_data),
                (Side::Left, &source.right, &source.right_user_data),
            ]
        };
        for (side, polygons, user_data) in pairs {
            for (group, polygon) in polygons.iter() {
                self.link_polygon(side, group, polygon);
                if let Some(Some(data)) = user_data.get(group) {
                    self.set_user_data(side, group, data.clone());
                }
            }
        }
    }
}

/// Owner of all nodes and edges of one topology generation.
///
/// # Example
///
/// ```
/// use polybool_topology::arena::GraphArena;
/// use polybool_topology::geometry::{Point, Range2};
///
/// let range = Range2::new(Point::new(-1.0, -1.0), Point::new(2.0, 2.0));
/// let mut graph = GraphArena::new(range, 2, 1e-3, 1).unwrap();
/// let a = graph.find_or_add_node(Point::new(0.0, 0.0));
/// let b = graph.find_or_add_node(Point::new(0.0004, 0.0));
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct GraphArena {
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    pub(crate) edges: SlotMap<EdgeKey, Edge>,
    node_grid: GridSpace<NodeKey>,
    edge_grid: GridSpace<EdgeKey>,
    /// Canonical `(max, min)` endpoint pair to edge.
    edge_ids: FxHashMap<(NodeKey, NodeKey), EdgeKey>,
    epsilon: f64,
    group_count: usize,
}

impl GraphArena {
    /// Creates an empty graph whose grids cover `range` with `division`
    /// cells per axis. `group_count` fixes the width of every edge's
    /// polygon slots.
    pub fn new(range: Range2, division: usize, epsilon: f64, group_count: usize) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(Error::InvalidEpsilon(epsilon));
        }
        let mut node_grid = GridSpace::new(range, division)?;
        node_grid.set_volume_expansion(epsilon);
        let mut edge_grid = GridSpace::new(range, division)?;
        edge_grid.set_volume_expansion(epsilon);
        Ok(Self {
            nodes: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            node_grid,
            edge_grid,
            edge_ids: FxHashMap::default(),
            epsilon,
            group_count,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    // --- Node operations ---

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    pub fn node_position(&self, key: NodeKey) -> Option<Point> {
        self.nodes.get(key).map(|n| n.position)
    }

    /// Returns the closest node within epsilon of `position`, or creates a
    /// new one. This is the fundamental merge-or-create operation.
    pub fn find_or_add_node(&mut self, position: Point) -> NodeKey {
        if let Some(existing) = self.find_node_near(position) {
            return existing;
        }
        let key = self.nodes.insert(Node::new(position));
        self.node_grid.insert(key, Obb2::point(position));
        key
    }

    /// Closest node within epsilon of `position`.
    pub fn find_node_near(&self, position: Point) -> Option<NodeKey> {
        let probe = Obb2::point(position).expanded(self.epsilon);
        let mut best = None;
        let mut best_dist2 = self.epsilon * self.epsilon;
        for key in self.node_grid.query(&probe) {
            let dist2 = (self.nodes[key].position - position).norm_squared();
            if dist2 <= best_dist2 {
                best_dist2 = dist2;
                best = Some(key);
            }
        }
        best
    }

    /// Nodes whose padded box overlaps `volume`.
    pub fn query_nodes(&self, volume: &Obb2) -> Vec<NodeKey> {
        self.node_grid.query(volume)
    }

    /// Removes an isolated node. Incident edges must be removed first.
    pub fn remove_node(&mut self, key: NodeKey) -> Result<Node> {
        let degree = match self.nodes.get(key) {
            Some(node) => node.degree(),
            None => return Err(Error::Internal(format!("node {key:?} not found"))),
        };
        if degree != 0 {
            return Err(Error::Internal(format!(
                "node {key:?} still has {degree} incident edges"
            )));
        }
        self.node_grid.remove(key);
        self.nodes
            .remove(key)
            .ok_or_else(|| Error::Internal(format!("node {key:?} not found")))
    }

    // --- Edge operations ---

    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &Edge)> {
        self.edges.iter()
    }

    /// Snapshot of the current edge keys, for passes that mutate the graph.
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().collect()
    }

    /// The edge between `a` and `b`, in either direction.
    pub fn find_edge(&self, a: NodeKey, b: NodeKey) -> Option<EdgeKey> {
        self.edge_ids.get(&canonical_pair(a, b)).copied()
    }

    /// Returns the existing edge between `from` and `to`, or creates one
    /// running `from -> to` and links it into both endpoints.
    pub fn find_or_add_edge(&mut self, from: NodeKey, to: NodeKey) -> Result<EdgeKey> {
        if from == to {
            return Err(Error::Internal(format!(
                "edge endpoints must differ, got {from:?} twice"
            )));
        }
        let id = canonical_pair(from, to);
        if let Some(&existing) = self.edge_ids.get(&id) {
            return Ok(existing);
        }
        let (p1, p2) = match (self.nodes.get(from), self.nodes.get(to)) {
            (Some(a), Some(b)) => (a.position, b.position),
            _ => {
                return Err(Error::Internal(format!(
                    "edge endpoint missing: {from:?} -> {to:?}"
                )))
            }
        };
        let groups = self.group_count;
        let key = self.edges.insert(Edge {
            from,
            to,
            length: (p2 - p1).norm(),
            right: PolygonIndices::new(groups),
            left: PolygonIndices::new(groups),
            right_user_data: Vec::new(),
            left_user_data: Vec::new(),
            flags: EdgeFlags::empty(),
            insertions: Vec::new(),
        });
        self.nodes[from].edges.push(key);
        self.nodes[to].edges.push(key);
        self.edge_ids.insert(id, key);
        self.edge_grid.insert(key, Obb2::segment(p1, p2));
        Ok(key)
    }

    /// Removes an edge from the id map, the grid and both endpoints.
    pub fn remove_edge(&mut self, key: EdgeKey) -> Option<Edge> {
        let edge = self.edges.remove(key)?;
        let id = canonical_pair(edge.from, edge.to);
        if self.edge_ids.get(&id) == Some(&key) {
            self.edge_ids.remove(&id);
        }
        self.edge_grid.remove(key);
        for node in [edge.from, edge.to] {
            if let Some(n) = self.nodes.get_mut(node) {
                n.edges.retain(|e| *e != key);
            }
        }
        Some(edge)
    }

    /// Segment-aligned box of an edge.
    pub fn edge_volume(&self, key: EdgeKey) -> Option<Obb2> {
        let edge = self.edges.get(key)?;
        Some(Obb2::segment(
            self.nodes.get(edge.from)?.position,
            self.nodes.get(edge.to)?.position,
        ))
    }

    /// Edges whose padded box overlaps `volume`.
    pub fn query_edges(&self, volume: &Obb2) -> Vec<EdgeKey> {
        self.edge_grid.query(volume)
    }

    /// Endpoint positions of `key` in traversal order for `side`.
    pub fn edge_points(&self, key: EdgeKey, side: Side) -> Option<(Point, Point)> {
        let edge = self.edges.get(key)?;
        let a = self.nodes.get(edge.start_node(side))?.position;
        let b = self.nodes.get(edge.end_node(side))?.position;
        Some((a, b))
    }

    pub fn edge_midpoint(&self, key: EdgeKey) -> Option<Point> {
        let (a, b) = self.edge_points(key, Side::Right)?;
        Some(nalgebra::center(&a, &b))
    }

    /// Links `(group, polygon)` onto one side of an edge. A side never holds
    /// two polygons of the same group: an already-set slot is kept.
    pub fn link_polygon(&mut self, key: EdgeKey, side: Side, group: usize, polygon: u32) -> bool {
        match self.edges.get_mut(key) {
            Some(edge) => edge.link_polygon(side, group, polygon),
            None => false,
        }
    }

    /// True if some edge incident to `node` has `(group, polygon)` on either
    /// side.
    pub fn is_polygon_linked_at(&self, node: NodeKey, group: usize, polygon: u32) -> bool {
        self.nodes.get(node).is_some_and(|n| {
            n.edges
                .iter()
                .any(|&e| self.edges[e].is_polygon_linked(group, polygon))
        })
    }

    /// Nodes with fewer than two incident edges.
    pub fn dangling_nodes(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.degree() < 2)
            .map(|(k, _)| k)
            .collect()
    }
}

/// Order-independent id of an endpoint pair.
fn canonical_pair(a: NodeKey, b: NodeKey) -> (NodeKey, NodeKey) {
    if a >= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn graph(groups: usize) -> GraphArena {
        let range = Range2::new(Point::new(-1.0, -1.0), Point::new(11.0, 11.0));
        GraphArena::new(range, 4, 1e-3, groups).unwrap()
    }

    #[test]
    fn rejects_bad_epsilon() {
        let range = Range2::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert!(matches!(
            GraphArena::new(range, 1, 0.0, 1),
            Err(Error::InvalidEpsilon(_))
        ));
        assert!(GraphArena::new(range, 1, f64::NAN, 1).is_err());
    }

    #[test]
    fn nodes_merge_within_epsilon() {
        let mut g = graph(1);
        let a = g.find_or_add_node(Point::new(1.0, 1.0));
        let b = g.find_or_add_node(Point::new(1.0 + 0.9e-3, 1.0));
        let c = g.find_or_add_node(Point::new(1.0 + 1.1e-3, 1.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn closest_node_wins() {
        let mut g = graph(1);
        let a = g.find_or_add_node(Point::new(0.0, 0.0));
        let b = g.find_or_add_node(Point::new(0.0015, 0.0));
        assert_ne!(a, b);
        assert_eq!(g.find_node_near(Point::new(0.001, 0.0)), Some(b));
        assert_eq!(g.find_node_near(Point::new(0.0004, 0.0)), Some(a));
    }

    #[test]
    fn edges_are_deduplicated_in_both_directions() {
        let mut g = graph(1);
        let a = g.find_or_add_node(Point::new(0.0, 0.0));
        let b = g.find_or_add_node(Point::new(3.0, 4.0));
        let e1 = g.find_or_add_edge(a, b).unwrap();
        let e2 = g.find_or_add_edge(b, a).unwrap();
        assert_eq!(e1, e2);
        assert_eq!(g.edge_count(), 1);

        let edge = g.edge(e1).unwrap();
        assert_eq!(edge.from(), a);
        assert_relative_eq!(edge.length(), 5.0);
        assert_eq!(g.node(a).unwrap().degree(), 1);
        assert_eq!(g.find_edge(b, a), Some(e1));
        assert!(g.find_or_add_edge(a, a).is_err());
    }

    #[test]
    fn remove_edge_unlinks_everything() {
        let mut g = graph(1);
        let a = g.find_or_add_node(Point::new(0.0, 0.0));
        let b = g.find_or_add_node(Point::new(5.0, 0.0));
        let e = g.find_or_add_edge(a, b).unwrap();

        assert!(g.remove_node(a).is_err());
        assert!(g.remove_edge(e).is_some());
        assert!(g.remove_edge(e).is_none());
        assert_eq!(g.node(a).unwrap().degree(), 0);
        assert!(g.find_edge(a, b).is_none());
        assert!(g.query_edges(&Obb2::point(Point::new(2.5, 0.0))).is_empty());
        assert!(g.remove_node(a).is_ok());
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn polygon_slots_keep_first_link() {
        let mut g = graph(2);
        let a = g.find_or_add_node(Point::new(0.0, 0.0));
        let b = g.find_or_add_node(Point::new(1.0, 0.0));
        let e = g.find_or_add_edge(a, b).unwrap();

        assert!(g.link_polygon(e, Side::Right, 1, 4));
        assert!(!g.link_polygon(e, Side::Right, 1, 7));
        let edge = g.edge(e).unwrap();
        assert_eq!(edge.polygons(Side::Right).get(1), Some(4));
        assert_eq!(edge.group_max(Side::Right), Some(1));
        assert_eq!(edge.group_max(Side::Left), None);
        assert_eq!(edge.group_count(Side::Right), 1);
        assert!(edge.polygons(Side::Right).any_unset());
        assert!(g.is_polygon_linked_at(a, 1, 4));
        assert!(!g.is_polygon_linked_at(a, 0, 4));
    }

    #[test]
    fn copy_attributes_swaps_sides_for_reversed_fragment() {
        let mut g = graph(2);
        let a = g.find_or_add_node(Point::new(0.0, 0.0));
        let b = g.find_or_add_node(Point::new(2.0, 0.0));
        let m = g.find_or_add_node(Point::new(1.0, 0.0));
        let orig = g.find_or_add_edge(a, b).unwrap();
        g.link_polygon(orig, Side::Right, 0, 3);
        g.link_polygon(orig, Side::Left, 1, 5);
        let attrs = g.edges[orig].attributes();

        let reversed = g.find_or_add_edge(b, m).unwrap();
        g.edges[reversed].copy_attributes(&attrs, false);
        let edge = g.edge(reversed).unwrap();
        assert_eq!(edge.polygons(Side::Left).get(0), Some(3));
        assert_eq!(edge.polygons(Side::Right).get(1), Some(5));
    }

    #[test]
    fn flags_per_side() {
        let mut flags = EdgeFlags::empty();
        flags.insert(EdgeFlags::RIGHT_REMOVED | EdgeFlags::LEFT_ENABLED);
        assert!(flags.contains(EdgeFlags::RIGHT_REMOVED));
        assert!(!flags.contains(EdgeFlags::LEFT_REMOVED));
        flags.remove(EdgeFlags::RIGHT_REMOVED);
        assert!(!flags.intersects(EdgeFlags::RIGHT_REMOVED));
        assert_eq!(
            EdgeFlags::for_side(Side::Left, EdgeFlags::RIGHT_ENABLED, EdgeFlags::LEFT_ENABLED),
            EdgeFlags::LEFT_ENABLED
        );
    }
}
