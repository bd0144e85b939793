// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification of traced loops into outer boundaries and holes.
//!
//! Loops are sorted by absolute area, largest first, and each loop looks for
//! the smallest earlier loop that contains it. Loops traced from the same
//! graph never cross, so containment only needs one probe per loop: either
//! a vertex next to where the loops part ways, or any vertex when they share
//! nothing.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::arena::GraphArena;
use crate::dictionary::Dictionary;
use crate::geometry::{point_touch_polygon, Point};
use crate::keys::{EdgeKey, NodeKey, Side};
use crate::trace::{EDir, ELoop};

/// A result polygon: loop 0 is the clockwise outer boundary, the rest are
/// counter-clockwise holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EPolygon {
    pub loops: Vec<ELoop>,
    /// Input group this polygon was rebuilt from, if any.
    pub group: Option<usize>,
    /// Input polygon index within `group`, if any.
    pub polygon: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Dictionary>,
    #[serde(default)]
    pub user_value: u64,
}

impl EPolygon {
    pub fn new(loops: Vec<ELoop>) -> Self {
        Self {
            loops,
            ..Self::default()
        }
    }

    pub fn outer(&self) -> Option<&ELoop> {
        self.loops.first()
    }

    pub fn holes(&self) -> &[ELoop] {
        self.loops.get(1..).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.loops.iter().map(ELoop::len).sum()
    }

    /// Outer area minus hole areas.
    pub fn area(&self) -> f64 {
        let outer = self.outer().map_or(0.0, |l| l.area);
        outer - self.holes().iter().map(|l| l.area).sum::<f64>()
    }

    /// Every directed edge of every loop.
    pub fn edges(&self) -> impl Iterator<Item = &EDir> + '_ {
        self.loops.iter().flat_map(|l| l.edges.iter())
    }

    /// True if `c` lies inside or on the outer loop and neither inside nor
    /// on any hole.
    pub fn contains(&self, graph: &GraphArena, c: Point) -> bool {
        for (i, l) in self.loops.iter().enumerate() {
            let touch = l.range.contains_point(c)
                && point_touch_polygon(c, &l.points(graph)).touches();
            if (i == 0) != touch {
                return false;
            }
        }
        true
    }

    /// Links this polygon onto both sides of every edge of `target` that
    /// lies inside it without being part of its boundary.
    ///
    /// Where `target` has no node on this polygon's boundary, one vertex
    /// decides for the whole loop. Otherwise the loop is walked backwards
    /// from a point where it leaves the boundary, and the midpoint of the
    /// first edge after each departure decides the run that follows.
    pub fn link_if_contains_edges(&self, graph: &mut GraphArena, target: &EPolygon) {
        let (Some(group), Some(polygon)) = (self.group, self.polygon) else {
            return;
        };
        let polygon = polygon as u32;
        let Some(my_range) = self.outer().map(|l| l.range) else {
            return;
        };

        for (loop_index, l) in target.loops.iter().enumerate() {
            if loop_index == 0 && !my_range.intersects(&l.range) {
                break;
            }
            if l.edges.is_empty() {
                continue;
            }
            let from_nodes = l.nodes(graph);
            let touches = from_nodes
                .iter()
                .any(|&n| graph.is_polygon_linked_at(n, group, polygon));

            if !touches {
                let inside = from_nodes
                    .first()
                    .and_then(|&n| graph.node_position(n))
                    .is_some_and(|p| my_range.contains_point(p) && self.contains(graph, p));
                if inside {
                    for d in &l.edges {
                        link_both_sides(graph, d.edge, group, polygon);
                    }
                }
                continue;
            }

            let count = l.edges.len();
            let shared = |graph: &GraphArena, i: usize| {
                graph
                    .edge(l.edges[i].edge)
                    .is_some_and(|e| e.is_polygon_linked(group, polygon))
            };

            // An unshared edge whose successor is shared.
            let mut edge_shared = shared(graph, 0);
            let mut any_shared = edge_shared;
            let mut start = None;
            for i in (0..count).rev() {
                let es = shared(graph, i);
                if edge_shared && !es {
                    start = Some(i);
                    break;
                }
                edge_shared = es;
                any_shared |= es;
            }
            let start = match start {
                Some(i) => i,
                None if any_shared => continue,
                None => 0,
            };

            let mut inclusion = false;
            let mut edge_shared = true;
            for step in (1..=count).rev() {
                let i = (start + step) % count;
                let d = l.edges[i];
                let es = shared(graph, i);
                if edge_shared && !es {
                    inclusion = graph.edge_midpoint(d.edge).is_some_and(|p| {
                        my_range.contains_point(p) && self.contains(graph, p)
                    });
                }
                if inclusion {
                    link_both_sides(graph, d.edge, group, polygon);
                }
                let from_linked = d
                    .from_node(graph)
                    .is_some_and(|n| graph.is_polygon_linked_at(n, group, polygon));
                if from_linked {
                    inclusion = false;
                    edge_shared = true;
                } else {
                    edge_shared = es;
                }
            }
        }
    }
}

fn link_both_sides(graph: &mut GraphArena, edge: EdgeKey, group: usize, polygon: u32) {
    for side in Side::BOTH {
        graph.link_polygon(edge, side, group, polygon);
    }
}

/// Groups traced loops into polygons. Outer loops come out clockwise and
/// holes counter-clockwise; only direct children of an outer loop become its
/// holes, deeper loops start polygons of their own.
pub fn distinguish(graph: &GraphArena, traced: Vec<Vec<EDir>>) -> Vec<EPolygon> {
    let mut loops: Vec<ELoop> = traced
        .into_iter()
        .map(|edges| ELoop::new(graph, edges))
        .collect();
    // Largest first; at equal area clockwise loops sort after.
    loops.sort_by(|a, b| {
        b.area
            .total_cmp(&a.area)
            .then_with(|| a.cw.cmp(&b.cw))
    });

    let n = loops.len();
    let points: Vec<Vec<Point>> = loops.iter().map(|l| l.points(graph)).collect();
    let nodes: Vec<Vec<NodeKey>> = loops.iter().map(|l| l.nodes(graph)).collect();
    let mut node_sets: Vec<Option<FxHashSet<NodeKey>>> = vec![None; n];
    let mut edge_sets: Vec<Option<FxHashSet<EdgeKey>>> = vec![None; n];
    let mut parents: Vec<Option<usize>> = vec![None; n];

    for i in (0..n).rev() {
        let child = &loops[i];
        for j in (0..i).rev() {
            let parent = &loops[j];
            if !parent.range.contains(&child.range) {
                continue;
            }
            let parent_nodes =
                node_sets[j].get_or_insert_with(|| nodes[j].iter().copied().collect());
            let touches = |p: Point| point_touch_polygon(p, &points[j]).touches();

            let child_nodes = &nodes[i];
            let child_points = &points[i];
            let shared: Vec<bool> = child_nodes.iter().map(|k| parent_nodes.contains(k)).collect();

            let contained = if shared.iter().all(|&s| s) {
                let parent_edges = edge_sets[j]
                    .get_or_insert_with(|| parent.edges.iter().map(|d| d.edge).collect());
                match child.edges.iter().find(|d| !parent_edges.contains(&d.edge)) {
                    Some(d) => graph.edge_midpoint(d.edge).is_some_and(touches),
                    None => child.len() == parent.len(),
                }
            } else if shared.iter().any(|&s| s) {
                // Probe the unshared vertex at every shared/unshared boundary.
                let m = shared.len();
                (0..m).rev().any(|k| {
                    let prev = (k + 1) % m;
                    shared[k] != shared[prev] && {
                        let probe = if shared[prev] { k } else { prev };
                        touches(child_points[probe])
                    }
                })
            } else {
                child_points.first().is_some_and(|&p| touches(p))
            };

            if contained {
                parents[i] = Some(j);
                break;
            }
        }
    }

    let mut used = vec![false; n];
    let mut slots: Vec<Option<ELoop>> = loops.into_iter().map(Some).collect();
    let mut result = Vec::new();
    for i in 0..n {
        if used[i] {
            continue;
        }
        used[i] = true;
        let Some(mut outer) = slots[i].take() else {
            continue;
        };
        if !outer.cw {
            outer.reverse();
        }
        let mut polygon_loops = vec![outer];
        for j in i + 1..n {
            if used[j] || parents[j] != Some(i) {
                continue;
            }
            used[j] = true;
            if let Some(mut hole) = slots[j].take() {
                if hole.cw {
                    hole.reverse();
                }
                polygon_loops.push(hole);
            }
        }
        result.push(EPolygon::new(polygon_loops));
    }
    result
}
