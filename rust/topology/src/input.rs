// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input polygons: vertices, loops and polygons as registered by callers.
//!
//! Loop 0 of a polygon is its outer boundary and winds clockwise (negative
//! signed area); every further loop is a hole and winds counter-clockwise.
//! The edge from vertex `i` to vertex `i + 1` keeps the polygon interior on
//! its right.

use serde::{Deserialize, Serialize};

use crate::dictionary::Dictionary;
use crate::geometry::{signed_area, Point, Range2, Vector};

/// A 2D input vertex with optional user data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Dictionary>,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            user_data: None,
        }
    }

    pub fn with_user_data(mut self, data: Dictionary) -> Self {
        self.user_data = Some(data);
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for Vertex {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// A closed vertex ring. `edge_user_data`, when present, runs parallel to
/// `vertices`: entry `i` belongs to the edge leaving vertex `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexLoop {
    pub vertices: Vec<Vertex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_user_data: Option<Vec<Option<Dictionary>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Dictionary>,
    #[serde(default)]
    pub user_value: u64,
}

impl VertexLoop {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    /// Builds a loop from bare coordinates.
    pub fn from_coords<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(coords.into_iter().map(|(x, y)| Vertex::new(x, y)).collect())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().map(Vertex::position)
    }

    /// Signed area; negative for a clockwise (outer) loop.
    pub fn area(&self) -> f64 {
        signed_area(self.positions())
    }

    pub fn bounds(&self) -> Range2 {
        Range2::from_points(self.positions())
    }

    /// User data of the edge leaving vertex `i`.
    pub fn edge_data(&self, i: usize) -> Option<&Dictionary> {
        self.edge_user_data.as_ref()?.get(i)?.as_ref()
    }

    /// Reverses the winding, keeping each edge's user data on its edge.
    pub fn reverse(&mut self) {
        self.vertices.reverse();
        if let Some(data) = self.edge_user_data.as_mut() {
            // Edge i (v[i] -> v[i+1]) becomes edge n-2-i after reversal.
            data.reverse();
            data.rotate_left(1);
        }
    }

    pub fn translate(&mut self, offset: Vector) {
        for v in &mut self.vertices {
            v.x += offset.x;
            v.y += offset.y;
        }
    }
}

/// One outer loop plus zero or more holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub loops: Vec<VertexLoop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Dictionary>,
    #[serde(default)]
    pub user_value: u64,
}

impl Polygon {
    pub fn new(outer: VertexLoop) -> Self {
        Self {
            loops: vec![outer],
            ..Self::default()
        }
    }

    pub fn with_hole(mut self, hole: VertexLoop) -> Self {
        self.loops.push(hole);
        self
    }

    /// Axis-aligned rectangle with a clockwise outer loop.
    pub fn rectangle(min: (f64, f64), max: (f64, f64)) -> Self {
        Self::new(VertexLoop::from_coords([
            (min.0, min.1),
            (min.0, max.1),
            (max.0, max.1),
            (max.0, min.1),
        ]))
    }

    /// Counter-clockwise rectangle suitable as a hole loop.
    pub fn rectangle_hole(min: (f64, f64), max: (f64, f64)) -> VertexLoop {
        VertexLoop::from_coords([
            (min.0, min.1),
            (max.0, min.1),
            (max.0, max.1),
            (min.0, max.1),
        ])
    }

    pub fn outer(&self) -> Option<&VertexLoop> {
        self.loops.first()
    }

    pub fn holes(&self) -> &[VertexLoop] {
        self.loops.get(1..).unwrap_or(&[])
    }

    pub fn vertex_count(&self) -> usize {
        self.loops.iter().map(VertexLoop::len).sum()
    }

    pub fn bounds(&self) -> Range2 {
        let mut range = Range2::empty();
        for l in &self.loops {
            range.merge(&l.bounds());
        }
        range
    }

    /// Net area: outer area minus hole areas.
    pub fn area(&self) -> f64 {
        -self.loops.iter().map(VertexLoop::area).sum::<f64>()
    }

    pub fn translate(&mut self, offset: Vector) {
        for l in &mut self.loops {
            l.translate(offset);
        }
    }
}

/// One independently registered set of polygons. Polygons of the same
/// group must not overlap each other.
pub type PolygonGroup = Vec<Polygon>;
