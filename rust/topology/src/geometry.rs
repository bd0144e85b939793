// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar geometry helpers used by the grid, validation and tracing.
//!
//! Everything here works in a y-up frame: a counter-clockwise loop has a
//! positive signed area, a clockwise loop a negative one.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 2D position.
pub type Point = Point2<f64>;

/// 2D direction or offset.
pub type Vector = Vector2<f64>;

/// Denominators at or below this magnitude are treated as parallel lines.
pub const PARALLEL_EPSILON: f64 = 1e-20;

/// Axis-aligned bounding range. A freshly created range is empty (invalid)
/// until a point is merged into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range2 {
    pub min: Point,
    pub max: Point,
}

impl Default for Range2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Range2 {
    /// An empty range that contains nothing and merges to any point.
    pub fn empty() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Range spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut range = Self::empty();
        for p in points {
            range.merge_point(p);
        }
        range
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    pub fn merge_point(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn merge(&mut self, other: &Range2) {
        if other.is_valid() {
            self.merge_point(other.min);
            self.merge_point(other.max);
        }
    }

    /// Grows the range by `d` on every side.
    pub fn expand(&self, d: f64) -> Self {
        Self {
            min: Point::new(self.min.x - d, self.min.y - d),
            max: Point::new(self.max.x + d, self.max.y + d),
        }
    }

    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    pub fn center(&self) -> Point {
        nalgebra::center(&self.min, &self.max)
    }

    /// Boundary-inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Boundary-inclusive range containment.
    pub fn contains(&self, other: &Range2) -> bool {
        self.min.x <= other.min.x
            && other.max.x <= self.max.x
            && self.min.y <= other.min.y
            && other.max.y <= self.max.y
    }

    pub fn intersects(&self, other: &Range2) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Oriented bounding box: `center ± extents.x * ax ± extents.y * ay`.
///
/// Nodes use a zero-extent axis-aligned box, edges a segment-aligned box
/// with zero thickness. Both are padded by epsilon before overlap tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb2 {
    pub center: Point,
    pub extents: Vector,
    pub ax: Vector,
    pub ay: Vector,
}

impl Obb2 {
    pub fn aabb(center: Point, extents: Vector) -> Self {
        Self {
            center,
            extents,
            ax: Vector::x(),
            ay: Vector::y(),
        }
    }

    /// Degenerate box at a single point.
    pub fn point(p: Point) -> Self {
        Self::aabb(p, Vector::zeros())
    }

    /// Box aligned with the segment `a -> b`, zero thickness across it.
    pub fn segment(a: Point, b: Point) -> Self {
        let v = b - a;
        let len = v.norm();
        let ax = if len > 0.0 { v / len } else { Vector::x() };
        Self {
            center: nalgebra::center(&a, &b),
            extents: Vector::new(len * 0.5, 0.0),
            ax,
            ay: right_angle(ax),
        }
    }

    pub fn from_range(range: &Range2) -> Self {
        Self::aabb(range.center(), range.size() * 0.5)
    }

    /// Grows both extents by `d`.
    pub fn expanded(&self, d: f64) -> Self {
        Self {
            extents: self.extents.add_scalar(d),
            ..*self
        }
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.ax == Vector::x() && self.ay == Vector::y()
    }

    /// Tight axis-aligned bounds of the box.
    pub fn bounds(&self) -> Range2 {
        let hx = self.ax.x.abs() * self.extents.x + self.ay.x.abs() * self.extents.y;
        let hy = self.ax.y.abs() * self.extents.x + self.ay.y.abs() * self.extents.y;
        Range2::new(
            Point::new(self.center.x - hx, self.center.y - hy),
            Point::new(self.center.x + hx, self.center.y + hy),
        )
    }

    /// Separating-axis overlap test. Touching boxes intersect.
    pub fn intersects(&self, other: &Obb2) -> bool {
        let d = other.center - self.center;
        if self.is_axis_aligned() && other.is_axis_aligned() {
            return d.x.abs() <= self.extents.x + other.extents.x
                && d.y.abs() <= self.extents.y + other.extents.y;
        }
        [self.ax, self.ay, other.ax, other.ay]
            .iter()
            .all(|axis| d.dot(axis).abs() <= self.radius_on(axis) + other.radius_on(axis))
    }

    fn radius_on(&self, axis: &Vector) -> f64 {
        self.extents.x * self.ax.dot(axis).abs() + self.extents.y * self.ay.dot(axis).abs()
    }
}

/// Rotates `v` a quarter turn counter-clockwise.
pub fn right_angle(v: Vector) -> Vector {
    Vector::new(-v.y, v.x)
}

/// 2D cross product `a.x * b.y - a.y * b.x`.
pub fn cross(a: &Vector, b: &Vector) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed area of a closed loop. Positive for counter-clockwise winding.
pub fn signed_area<I>(points: I) -> f64
where
    I: IntoIterator<Item = Point>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let mut sum = 0.0;
    let mut prev = first;
    for p in iter {
        sum += (prev.x - p.x) * (prev.y + p.y);
        prev = p;
    }
    sum += (prev.x - first.x) * (prev.y + first.y);
    sum * 0.5
}

/// Parameter of the point on the line `p + v * t` nearest to `c`.
pub fn nearest_param(p: Point, v: Vector, c: Point) -> f64 {
    let len2 = v.norm_squared();
    if len2 == 0.0 {
        return 0.0;
    }
    (c - p).dot(&v) / len2
}

/// Denominator of the two-line intersection for directions `v1` and `v2`.
pub fn intersect_divisor(v1: &Vector, v2: &Vector) -> f64 {
    cross(v1, v2)
}

/// Intersection parameter of `p1 + v1 * t` and `p2 + v2 * s` with
/// `pv = p2 - p1` and `divisor = intersect_divisor(v1, v2)`. Passing `v2` as
/// `other` yields `t`, passing `v1` yields `s`.
pub fn intersect_param(pv: &Vector, other: &Vector, divisor: f64) -> f64 {
    cross(pv, other) / divisor
}

/// Strict segment crossing test: true only when each segment's endpoints
/// lie strictly on opposite sides of the other. Touching, collinear and
/// endpoint-sharing segments do not cross.
pub fn segments_cross(s1: Point, e1: Point, s2: Point, e2: Point) -> bool {
    let v = s1 - e1;
    let ox = s2.y - s1.y;
    let oy = s1.x - s2.x;
    if (v.x * ox + v.y * oy) * (v.x * (e2.y - s1.y) + v.y * (s1.x - e2.x)) >= 0.0 {
        return false;
    }
    let v = s2 - e2;
    if -(v.x * ox + v.y * oy) * (v.x * (e1.y - s2.y) + v.y * (s2.x - e1.x)) >= 0.0 {
        return false;
    }
    true
}

/// Crossing-number point-in-polygon test over a closed vertex ring. Points
/// on the boundary may land on either side.
pub fn point_in_polygon(c: Point, ring: &[Point]) -> bool {
    let n = ring.len();
    if n == 0 {
        return false;
    }
    let mut winding = 0i32;
    let mut p1 = ring[0];
    let mut x1 = c.x - p1.x;
    for i in 1..=n {
        let p2 = ring[i % n];
        let x2 = c.x - p2.x;
        if (x1 < 0.0 && 0.0 <= x2) || (0.0 <= x1 && x2 < 0.0) {
            winding += if x1 * (p2.y - p1.y) < (c.y - p1.y) * (p2.x - p1.x) {
                -1
            } else {
                1
            };
        }
        p1 = p2;
        x1 = x2;
    }
    winding != 0
}

/// Where a point lies relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touch {
    Outside,
    Boundary,
    Inside,
}

impl Touch {
    /// Inside or on the boundary.
    pub fn touches(self) -> bool {
        self != Touch::Outside
    }
}

/// Like [`point_in_polygon`] but reports exact boundary hits (on an edge or
/// a vertex) separately.
pub fn point_touch_polygon(c: Point, ring: &[Point]) -> Touch {
    let n = ring.len();
    if n == 0 {
        return Touch::Outside;
    }
    let mut winding = 0i32;
    let mut p1 = ring[0];
    let mut y1 = c.y - p1.y;
    for i in 1..=n {
        let p2 = ring[i % n];
        let y2 = c.y - p2.y;
        if (y1 < 0.0 && 0.0 <= y2) || (0.0 <= y1 && y2 < 0.0) {
            let t1 = y1 * (p2.x - p1.x);
            let t2 = (c.x - p1.x) * (p2.y - p1.y);
            if t1 == t2 {
                return Touch::Boundary;
            }
            winding += if t1 < t2 { -1 } else { 1 };
        } else if y1 == 0.0 && y2 == 0.0 {
            let x1 = c.x - p1.x;
            let x2 = c.x - p2.x;
            if (x1 <= 0.0) != (x2 <= 0.0) || x1 == 0.0 || x2 == 0.0 {
                return Touch::Boundary;
            }
        } else if c == p1 {
            return Touch::Boundary;
        }
        p1 = p2;
        y1 = y2;
    }
    if winding != 0 {
        Touch::Inside
    } else {
        Touch::Outside
    }
}
