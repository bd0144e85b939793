// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean composition of polygon groups.
//!
//! [`PolyBool`] collects input groups, builds one merged topology over all
//! of them and answers boolean queries by tracing the faces whose sides pass
//! an [`EdgeFilter`]. Every edge side knows which polygon of which group
//! lies on it, so union, intersection, exclusive-or and subtraction are just
//! different predicates over that record.
//!
//! ```
//! use polybool_topology::{Polygon, PolyBool};
//!
//! let mut pb = PolyBool::new(1e-4).unwrap();
//! pb.add_group(vec![Polygon::rectangle((0.0, 0.0), (1.0, 1.0))]);
//! pb.add_group(vec![Polygon::rectangle((0.5, 0.5), (1.5, 1.5))]);
//! pb.create_topology().unwrap();
//!
//! let union = pb.or().unwrap();
//! assert_eq!(union.len(), 1);
//! assert!((union[0].area() - 1.75).abs() < 1e-9);
//! ```

use std::str::FromStr;
use std::time::Instant;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::arena::{Edge, GraphArena};
use crate::config::TopologyConfig;
use crate::construction::{IntersectionEvent, IntersectionHook};
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::geometry::{Point, Range2};
use crate::input::{Polygon, PolygonGroup, Vertex, VertexLoop};
use crate::keys::Side;
use crate::nesting::{distinguish, EPolygon};
use crate::spatial::GridSpace;
use crate::trace::{EDir, ELoop};
use crate::validation::validate_groups;

/// Decides which edge sides a filtered trace must skip.
pub trait EdgeFilter {
    /// True if `side` of `edge` is not part of the result.
    fn ignore(&self, graph: &GraphArena, edge: &Edge, side: Side) -> bool;
}

impl<F> EdgeFilter for F
where
    F: Fn(&GraphArena, &Edge, Side) -> bool,
{
    fn ignore(&self, graph: &GraphArena, edge: &Edge, side: Side) -> bool {
        self(graph, edge, side)
    }
}

/// Area covered by any group. Edges with polygons on both sides are inner.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionFilter;

impl EdgeFilter for UnionFilter {
    fn ignore(&self, _: &GraphArena, edge: &Edge, _: Side) -> bool {
        edge.group_max(Side::Right).is_some() && edge.group_max(Side::Left).is_some()
    }
}

/// Area covered by every group.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntersectionFilter;

impl EdgeFilter for IntersectionFilter {
    fn ignore(&self, _: &GraphArena, edge: &Edge, side: Side) -> bool {
        edge.polygons(side).any_unset()
    }
}

/// Area covered by an odd number of groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct XorFilter;

impl EdgeFilter for XorFilter {
    fn ignore(&self, _: &GraphArena, edge: &Edge, side: Side) -> bool {
        let count = edge.group_count(side);
        count == edge.group_count(side.opposite()) || count % 2 == 0
    }
}

/// Area covered by some group other than `group`, and not by `group`.
#[derive(Debug, Clone, Copy)]
pub struct SubtractFilter {
    pub group: usize,
}

impl EdgeFilter for SubtractFilter {
    fn ignore(&self, _: &GraphArena, edge: &Edge, side: Side) -> bool {
        edge.polygons(side).get(self.group).is_some()
    }
}

/// The area of one input polygon as the merged graph sees it.
#[derive(Debug, Clone, Copy)]
pub struct PolygonFilter {
    pub group: usize,
    pub polygon: u32,
}

impl EdgeFilter for PolygonFilter {
    fn ignore(&self, _: &GraphArena, edge: &Edge, side: Side) -> bool {
        edge.polygons(side).get(self.group) != Some(self.polygon)
    }
}

/// A boolean operation over the registered groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOp {
    Or,
    And,
    Xor,
    /// Everything but the given group.
    Sub(usize),
    /// The rebuilt polygons of one group.
    Extract(usize),
}

impl FromStr for BooleanOp {
    type Err = String;

    /// Parses `or`, `and`, `xor`, `sub:<group>` or `extract:<group>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let group = |arg: Option<&str>| -> std::result::Result<usize, String> {
            arg.ok_or_else(|| format!("'{s}' needs a group index, e.g. '{s}:1'"))?
                .parse()
                .map_err(|e| format!("bad group index in '{s}': {e}"))
        };
        let mut parts = s.splitn(2, ':');
        match parts.next().unwrap_or_default().to_ascii_lowercase().as_str() {
            "or" | "union" => Ok(BooleanOp::Or),
            "and" | "intersection" => Ok(BooleanOp::And),
            "xor" => Ok(BooleanOp::Xor),
            "sub" | "subtract" => Ok(BooleanOp::Sub(group(parts.next())?)),
            "extract" => Ok(BooleanOp::Extract(group(parts.next())?)),
            other => Err(format!("unknown operation '{other}'")),
        }
    }
}

/// Polygon boolean engine over any number of input groups.
pub struct PolyBool {
    config: TopologyConfig,
    groups: Vec<PolygonGroup>,
    graph: Option<GraphArena>,
    topology: Vec<Vec<EPolygon>>,
    intersection_hook: Option<Box<IntersectionHook<'static>>>,
    pub user_data: Option<Dictionary>,
    pub user_value: u64,
}

impl std::fmt::Debug for PolyBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolyBool")
            .field("config", &self.config)
            .field("groups", &self.groups.len())
            .field("built", &self.graph.is_some())
            .field("intersection_hook", &self.intersection_hook.is_some())
            .finish()
    }
}

impl PolyBool {
    /// Engine with default settings and the given merge tolerance.
    pub fn new(epsilon: f64) -> Result<Self> {
        Self::with_config(TopologyConfig::with_epsilon(epsilon))
    }

    pub fn with_config(config: TopologyConfig) -> Result<Self> {
        config.check()?;
        Ok(Self {
            config,
            groups: Vec::new(),
            graph: None,
            topology: Vec::new(),
            intersection_hook: None,
            user_data: None,
            user_value: 0,
        })
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Registers a polygon group and returns its index. Any previously built
    /// topology is discarded.
    pub fn add_group(&mut self, group: PolygonGroup) -> usize {
        self.groups.push(group);
        self.graph = None;
        self.topology.clear();
        self.groups.len() - 1
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group(&self, index: usize) -> Option<&PolygonGroup> {
        self.groups.get(index)
    }

    /// Installs a callback run on every edge-edge crossing during
    /// [`create_topology`](Self::create_topology).
    pub fn set_intersection_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut GraphArena, &IntersectionEvent) + 'static,
    {
        self.intersection_hook = Some(Box::new(hook));
    }

    pub fn clear_intersection_hook(&mut self) {
        self.intersection_hook = None;
    }

    /// Builds the merged topology of all registered groups.
    ///
    /// Input is validated first (when enabled); a validation error leaves
    /// the engine without a graph.
    pub fn create_topology(&mut self) -> Result<()> {
        let start = Instant::now();
        self.graph = None;
        self.topology.clear();

        let eps = self.config.epsilon;
        let mut range = Range2::empty();
        let mut vertex_count = 0;
        for polygon in self.groups.iter().flatten() {
            range.merge(&polygon.bounds());
            vertex_count += polygon.vertex_count();
        }
        if !range.is_valid() {
            range = Range2::new(Point::origin(), Point::origin());
        }
        let range = range.expand(eps);
        let division = GridSpace::<()>::division_for(vertex_count, self.config.items_per_cell);

        if self.config.validate {
            validate_groups(&self.groups, eps, self.config.validation_items_per_cell)?;
        }

        let mut graph = GraphArena::new(range, division, eps, self.groups.len())?;
        for (g, group) in self.groups.iter().enumerate() {
            for (i, polygon) in group.iter().enumerate() {
                graph.add_polygon_edges(g, i, polygon)?;
            }
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            division,
            "graph built"
        );

        let scheduled = graph.insert_intersection_nodes(self.intersection_hook.as_deref_mut());
        let divided = graph.divide_edges()?;
        tracing::debug!(scheduled, divided, edges = graph.edge_count(), "edges divided");

        let pruned = graph.remove_beard()?;
        if pruned > 0 {
            tracing::debug!(pruned, "dangling nodes removed");
        }

        let topology = rebuild_groups(&mut graph, &self.groups)?;
        let faces = graph.polygonize_all();

        tracing::info!(
            groups = self.groups.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            faces,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "topology created"
        );
        self.graph = Some(graph);
        self.topology = topology;
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.graph.is_some()
    }

    /// The merged graph, once built.
    pub fn graph(&self) -> Option<&GraphArena> {
        self.graph.as_ref()
    }

    fn built_graph(&self) -> Result<&GraphArena> {
        self.graph.as_ref().ok_or(Error::TopologyNotBuilt)
    }

    /// Input polygons rebuilt over the merged graph, per group.
    pub fn topology_groups(&self) -> &[Vec<EPolygon>] {
        &self.topology
    }

    /// Traces and nests every face whose sides pass `filter`.
    pub fn filtering<F: EdgeFilter + ?Sized>(&mut self, filter: &F) -> Result<Vec<EPolygon>> {
        let graph = self.graph.as_mut().ok_or(Error::TopologyNotBuilt)?;
        let loops = graph.trace_faces(filter);
        Ok(distinguish(graph, loops))
    }

    pub fn or(&mut self) -> Result<Vec<EPolygon>> {
        self.filtering(&UnionFilter)
    }

    pub fn and(&mut self) -> Result<Vec<EPolygon>> {
        self.filtering(&IntersectionFilter)
    }

    pub fn xor(&mut self) -> Result<Vec<EPolygon>> {
        self.filtering(&XorFilter)
    }

    /// Area of every other group with `group` cut away.
    pub fn sub(&mut self, group: usize) -> Result<Vec<EPolygon>> {
        self.check_group(group)?;
        self.filtering(&SubtractFilter { group })
    }

    /// The rebuilt polygons of `group`, split at every node other groups
    /// introduced.
    pub fn extract(&self, group: usize) -> Result<Vec<EPolygon>> {
        self.check_group(group)?;
        self.built_graph()?;
        Ok(self.topology[group].clone())
    }

    pub fn apply(&mut self, op: BooleanOp) -> Result<Vec<EPolygon>> {
        match op {
            BooleanOp::Or => self.or(),
            BooleanOp::And => self.and(),
            BooleanOp::Xor => self.xor(),
            BooleanOp::Sub(group) => self.sub(group),
            BooleanOp::Extract(group) => self.extract(group),
        }
    }

    fn check_group(&self, group: usize) -> Result<()> {
        if group < self.groups.len() {
            Ok(())
        } else {
            Err(Error::GroupOutOfRange {
                group,
                groups: self.groups.len(),
            })
        }
    }

    /// Groups whose boundaries meet another group's: every group linked on
    /// some edge together with at least one other group. Sorted ascending.
    pub fn shared_groups(&self) -> Result<Vec<usize>> {
        let graph = self.built_graph()?;
        let mut shared = FxHashSet::default();
        let mut linked = Vec::new();
        for (_, edge) in graph.edges() {
            linked.clear();
            linked.extend((0..graph.group_count()).filter(|&g| edge.is_group_linked(g)));
            if linked.len() >= 2 {
                shared.extend(linked.iter().copied());
            }
        }
        let mut shared: Vec<usize> = shared.into_iter().collect();
        shared.sort_unstable();
        Ok(shared)
    }

    /// Splits a traced loop into maximal runs of consecutive edges accepted
    /// by `matches`, as `(first index, count)` pairs. Runs may wrap past the
    /// end of the loop. A loop whose edges all match is one run from 0.
    pub fn match_segments<F>(&self, edges: &[EDir], matches: F) -> Result<Vec<(usize, usize)>>
    where
        F: Fn(&Edge, Side) -> bool,
    {
        let graph = self.built_graph()?;
        let n = edges.len();
        let mut ok = Vec::with_capacity(n);
        for d in edges {
            let edge = graph
                .edge(d.edge)
                .ok_or_else(|| Error::Internal(format!("edge {:?} not in graph", d.edge)))?;
            ok.push(matches(edge, d.side));
        }

        let Some(start) = ok.iter().position(|&m| !m) else {
            return Ok(if n == 0 { Vec::new() } else { vec![(0, n)] });
        };
        let mut runs = Vec::new();
        let mut run: Option<(usize, usize)> = None;
        for k in start + 1..=start + n {
            let i = k % n;
            if ok[i] {
                match run.as_mut() {
                    Some((_, count)) => *count += 1,
                    None => run = Some((i, 1)),
                }
            } else if let Some(r) = run.take() {
                runs.push(r);
            }
        }
        Ok(runs)
    }

    /// The group an output edge came from: the highest group on its traced
    /// side, or failing that on the opposite side.
    pub fn source_group(&self, dir: EDir) -> Result<usize> {
        let graph = self.built_graph()?;
        let edge = graph
            .edge(dir.edge)
            .ok_or_else(|| Error::Internal(format!("edge {:?} not in graph", dir.edge)))?;
        edge.group_max(dir.side)
            .or_else(|| edge.group_max(dir.side.opposite()))
            .ok_or_else(|| Error::Internal(format!("edge {:?} has no group on either side", dir.edge)))
    }

    /// Converts a result polygon back into vertex loops. Vertices and edges
    /// carry the user data of the highest group that has some.
    pub fn to_polygon(&self, polygon: &EPolygon) -> Result<Polygon> {
        let graph = self.built_graph()?;
        let loops = polygon
            .loops
            .iter()
            .map(|l| to_vertex_loop(graph, l))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon {
            loops,
            user_data: polygon.user_data.clone(),
            user_value: polygon.user_value,
        })
    }

    pub fn to_polygons(&self, polygons: &[EPolygon]) -> Result<Vec<Polygon>> {
        polygons.iter().map(|p| self.to_polygon(p)).collect()
    }
}

fn to_vertex_loop(graph: &GraphArena, l: &ELoop) -> Result<VertexLoop> {
    let mut vertices = Vec::with_capacity(l.len());
    let mut edge_data = Vec::with_capacity(l.len());
    for d in &l.edges {
        let node = d
            .from_node(graph)
            .and_then(|k| graph.node(k))
            .ok_or_else(|| Error::Internal(format!("edge {:?} lost an endpoint", d.edge)))?;
        let mut vertex = Vertex::from(node.position());
        vertex.user_data = node.user_data.iter().rev().find_map(|slot| slot.clone());
        vertices.push(vertex);
        edge_data.push(graph.inherited_user_data(d.edge, d.side).cloned());
    }
    let mut out = VertexLoop::new(vertices);
    if edge_data.iter().any(Option::is_some) {
        out.edge_user_data = Some(edge_data);
    }
    Ok(out)
}

/// Traces every input polygon over the merged graph and links each rebuilt
/// polygon onto the edges it encloses of every other group's polygons.
/// Polygons of one group never overlap, so pairs within a group are skipped.
fn rebuild_groups(graph: &mut GraphArena, groups: &[PolygonGroup]) -> Result<Vec<Vec<EPolygon>>> {
    let mut topology = Vec::with_capacity(groups.len());
    for (g, group) in groups.iter().enumerate() {
        let mut rebuilt = Vec::with_capacity(group.len());
        for (p, input) in group.iter().enumerate() {
            let polygon = u32::try_from(p)
                .map_err(|_| Error::Internal(format!("polygon index {p} exceeds u32")))?;
            let loops = graph.trace_faces(&PolygonFilter { group: g, polygon });
            for mut ep in distinguish(graph, loops) {
                ep.group = Some(g);
                ep.polygon = Some(p);
                ep.user_data = input.user_data.clone();
                ep.user_value = input.user_value;
                rebuilt.push(ep);
            }
        }
        topology.push(rebuilt);
    }

    for g1 in 0..topology.len() {
        for g2 in (0..topology.len()).filter(|&g2| g2 != g1) {
            for container in &topology[g1] {
                for target in &topology[g2] {
                    container.link_if_contains_edges(graph, target);
                }
            }
        }
    }
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn squares() -> PolyBool {
        let mut pb = PolyBool::new(1e-4).unwrap();
        pb.add_group(vec![Polygon::rectangle((0.0, 0.0), (1.0, 1.0))]);
        pb.add_group(vec![Polygon::rectangle((0.5, 0.5), (1.5, 1.5))]);
        pb.create_topology().unwrap();
        pb
    }

    fn total_area(polys: &[EPolygon]) -> f64 {
        polys.iter().map(EPolygon::area).sum()
    }

    #[test]
    fn operations_need_a_topology() {
        let mut pb = PolyBool::new(1e-4).unwrap();
        pb.add_group(vec![Polygon::rectangle((0.0, 0.0), (1.0, 1.0))]);
        assert!(matches!(pb.or(), Err(Error::TopologyNotBuilt)));
        assert!(matches!(pb.extract(0), Err(Error::TopologyNotBuilt)));
        assert!(matches!(pb.shared_groups(), Err(Error::TopologyNotBuilt)));
    }

    #[test]
    fn rejects_bad_epsilon() {
        assert!(matches!(PolyBool::new(0.0), Err(Error::InvalidEpsilon(_))));
    }

    #[test]
    fn group_index_is_checked() {
        let mut pb = squares();
        assert!(matches!(
            pb.sub(2),
            Err(Error::GroupOutOfRange { group: 2, groups: 2 })
        ));
        assert!(pb.extract(5).is_err());
    }

    #[test]
    fn basic_operations_on_overlapping_squares() {
        let mut pb = squares();
        let or = pb.or().unwrap();
        assert_eq!(or.len(), 1);
        assert_eq!(or[0].edge_count(), 8);
        assert_relative_eq!(total_area(&or), 1.75, epsilon = 1e-9);

        assert_relative_eq!(total_area(&pb.and().unwrap()), 0.25, epsilon = 1e-9);
        assert_relative_eq!(total_area(&pb.xor().unwrap()), 1.5, epsilon = 1e-9);
        assert_relative_eq!(total_area(&pb.sub(1).unwrap()), 0.75, epsilon = 1e-9);
        assert_relative_eq!(total_area(&pb.sub(0).unwrap()), 0.75, epsilon = 1e-9);
    }

    #[test]
    fn apply_dispatches_parsed_operations() {
        let mut pb = squares();
        let op: BooleanOp = "and".parse().unwrap();
        assert_relative_eq!(total_area(&pb.apply(op).unwrap()), 0.25, epsilon = 1e-9);
        assert_eq!("sub:1".parse::<BooleanOp>(), Ok(BooleanOp::Sub(1)));
        assert_eq!("Extract:0".parse::<BooleanOp>(), Ok(BooleanOp::Extract(0)));
        assert!("sub".parse::<BooleanOp>().is_err());
        assert!("nand".parse::<BooleanOp>().is_err());
    }

    #[test]
    fn extract_keeps_group_split_at_crossings() {
        let pb = squares();
        let a = pb.extract(0).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].group, Some(0));
        assert_eq!(a[0].polygon, Some(0));
        assert_eq!(a[0].edge_count(), 6);
        assert_relative_eq!(a[0].area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn crossing_groups_share_edges() {
        let pb = squares();
        assert_eq!(pb.shared_groups().unwrap(), vec![0, 1]);

        let mut far = PolyBool::new(1e-4).unwrap();
        far.add_group(vec![Polygon::rectangle((0.0, 0.0), (1.0, 1.0))]);
        far.add_group(vec![Polygon::rectangle((3.0, 3.0), (4.0, 4.0))]);
        far.create_topology().unwrap();
        assert!(far.shared_groups().unwrap().is_empty());
    }

    #[test]
    fn union_edges_report_their_source() {
        let mut pb = squares();
        let or = pb.or().unwrap();
        let outer = or[0].outer().unwrap();
        let mut from_b = 0;
        for &d in &outer.edges {
            let g = pb.source_group(d).unwrap();
            let (a, b) = pb.graph().unwrap().edge_points(d.edge, d.side).unwrap();
            let mid = nalgebra::center(&a, &b);
            if mid.x > 1.0 || mid.y > 1.0 {
                assert_eq!(g, 1);
                from_b += 1;
            } else {
                assert_eq!(g, 0);
            }
        }
        assert_eq!(from_b, 4);

        let runs = pb
            .match_segments(&outer.edges, |e, side| e.polygons(side).get(1).is_some())
            .unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].1, 4);
    }

    #[test]
    fn match_segments_whole_loop() {
        let mut pb = squares();
        let and = pb.and().unwrap();
        let edges = &and[0].outer().unwrap().edges;
        let all = pb.match_segments(edges, |_, _| true).unwrap();
        assert_eq!(all, vec![(0, edges.len())]);
        assert!(pb.match_segments(edges, |_, _| false).unwrap().is_empty());
        assert!(pb.match_segments(&[], |_, _| true).unwrap().is_empty());
    }

    #[test]
    fn user_data_flows_to_output() {
        let mut data = Dictionary::default();
        data.insert("layer".into(), crate::dictionary::DictValue::String("a".into()));
        let mut a = Polygon::rectangle((0.0, 0.0), (1.0, 1.0));
        a.loops[0].edge_user_data = Some(vec![Some(data.clone()); 4]);
        a.loops[0].vertices[0].user_data = Some(data.clone());
        a.user_value = 9;

        let mut pb = PolyBool::new(1e-4).unwrap();
        pb.add_group(vec![a]);
        pb.add_group(vec![Polygon::rectangle((0.5, 0.5), (1.5, 1.5))]);
        pb.create_topology().unwrap();

        let extracted = pb.extract(0).unwrap();
        assert_eq!(extracted[0].user_value, 9);
        let out = pb.to_polygon(&extracted[0]).unwrap();
        assert_eq!(out.user_value, 9);
        assert!(out.loops[0].area() < 0.0);
        let edge_data = out.loops[0].edge_user_data.as_ref().unwrap();
        assert!(edge_data.iter().all(|d| d.as_ref() == Some(&data)));
        assert!(out.loops[0]
            .vertices
            .iter()
            .any(|v| v.position() == Point::origin() && v.user_data.as_ref() == Some(&data)));
    }

    #[test]
    fn hook_sees_every_crossing() {
        use std::cell::Cell;
        use std::rc::Rc;

        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let mut pb = PolyBool::new(1e-4).unwrap();
        pb.add_group(vec![Polygon::rectangle((0.0, 0.0), (1.0, 1.0))]);
        pb.add_group(vec![Polygon::rectangle((0.5, 0.5), (1.5, 1.5))]);
        pb.set_intersection_hook(move |_, ev| {
            assert!(ev.t1 > 0.0 && ev.t2 < 1.0);
            counter.set(counter.get() + 1);
        });
        pb.create_topology().unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn island_in_a_hole_of_its_own_group_stays_unlinked() {
        let ring = Polygon::rectangle((0.0, 0.0), (10.0, 10.0))
            .with_hole(Polygon::rectangle_hole((3.0, 3.0), (7.0, 7.0)));
        let island = Polygon::rectangle((4.0, 4.0), (6.0, 6.0));
        let mut pb = PolyBool::new(1e-4).unwrap();
        pb.add_group(vec![ring, island]);
        pb.create_topology().unwrap();

        let graph = pb.graph().unwrap();
        for (_, edge) in graph.edges() {
            let right = edge.polygons(Side::Right).get(0);
            let left = edge.polygons(Side::Left).get(0);
            assert!(right.is_none() || left.is_none());
        }
        assert_eq!(pb.extract(0).unwrap().len(), 2);
        assert_relative_eq!(total_area(&pb.or().unwrap()), 88.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_engine_builds() {
        let mut pb = PolyBool::new(1e-4).unwrap();
        pb.create_topology().unwrap();
        assert!(pb.or().unwrap().is_empty());
        assert_eq!(pb.graph().unwrap().node_count(), 0);
    }

    #[test]
    fn adding_a_group_invalidates_the_topology() {
        let mut pb = squares();
        assert!(pb.is_built());
        pb.add_group(Vec::new());
        assert!(!pb.is_built());
        assert!(pb.topology_groups().is_empty());
    }
}
