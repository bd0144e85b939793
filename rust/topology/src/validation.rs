// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input checks run before any graph mutation.
//!
//! Each group gets its own [`LineFinder`], a segment grid holding every edge
//! of every polygon in the group. A polygon is first checked loop by loop
//! (vertex count, edge data length, winding) while its segments are
//! registered; once the whole group is registered every edge is tested for
//! duplicates and crossings, every vertex for touching its own loop, and
//! every hole for escaping its outer loop.

use std::ops::Range;

use crate::error::{Error, Result, ValidationKind, Winding};
use crate::geometry::{nearest_param, point_in_polygon, segments_cross, Obb2, Point, Range2};
use crate::input::{Polygon, PolygonGroup};
use crate::spatial::GridSpace;

#[derive(Debug, Clone, Copy)]
struct Segment {
    polygon: usize,
    id: usize,
    p1: Point,
    p2: Point,
}

/// Grid of the input segments of one group. Segment ids are numbered per
/// polygon across all of its loops.
#[derive(Debug, Clone)]
pub struct LineFinder {
    grid: GridSpace<usize>,
    segments: Vec<Segment>,
    epsilon: f64,
}

impl LineFinder {
    pub fn new(range: Range2, division: usize, epsilon: f64) -> Result<Self> {
        let mut grid = GridSpace::new(range, division)?;
        grid.set_volume_expansion(epsilon);
        Ok(Self {
            grid,
            segments: Vec::new(),
            epsilon,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Registers the closed ring `points` of `polygon`. Edge `i` gets id
    /// `start_id + i`.
    pub fn add_loop(&mut self, polygon: usize, start_id: usize, points: &[Point]) {
        let n = points.len();
        for i in 0..n {
            let (p1, p2) = (points[i], points[(i + 1) % n]);
            let index = self.segments.len();
            self.segments.push(Segment {
                polygon,
                id: start_id + i,
                p1,
                p2,
            });
            self.grid.insert(index, Obb2::segment(p1, p2));
        }
    }

    /// True if another edge of the same polygon has the same endpoints
    /// (in either direction) within epsilon.
    pub fn test_share(&self, p1: Point, p2: Point, polygon: usize, id: usize) -> bool {
        let eps2 = self.epsilon * self.epsilon;
        let (a1, a2) = ordered(p1, p2);
        let probe = Obb2::from_range(&Range2::from_corners(a1, a2));
        self.grid.query(&probe).into_iter().any(|index| {
            let s = &self.segments[index];
            if s.polygon != polygon || s.id == id {
                return false;
            }
            let (b1, b2) = ordered(s.p1, s.p2);
            (b1 - a1).norm_squared() <= eps2 && (b2 - a2).norm_squared() <= eps2
        })
    }

    /// True if the segment strictly crosses any registered segment other
    /// than the excluded ids of its own polygon (itself and its two
    /// neighbours).
    pub fn test_intersect(&self, p1: Point, p2: Point, polygon: usize, exclude: [usize; 3]) -> bool {
        self.grid
            .query(&Obb2::segment(p1, p2))
            .into_iter()
            .any(|index| {
                let s = &self.segments[index];
                (s.polygon != polygon || !exclude.contains(&s.id))
                    && segments_cross(p1, p2, s.p1, s.p2)
            })
    }

    /// True if vertex `p` lies within epsilon of an edge of its own loop
    /// other than the two edges meeting at it. `ids` is the id range of the
    /// loop's edges; `exclude` holds the two incident edge ids. This catches
    /// a loop revisiting one of its vertices and a vertex resting on a
    /// non-adjacent edge, neither of which is a strict crossing.
    pub fn test_touch(&self, p: Point, polygon: usize, ids: Range<usize>, exclude: [usize; 2]) -> bool {
        let eps2 = self.epsilon * self.epsilon;
        self.grid.query(&Obb2::point(p)).into_iter().any(|index| {
            let s = &self.segments[index];
            if s.polygon != polygon || !ids.contains(&s.id) || exclude.contains(&s.id) {
                return false;
            }
            let v = s.p2 - s.p1;
            let t = nearest_param(s.p1, v, p).clamp(0.0, 1.0);
            (p - (s.p1 + v * t)).norm_squared() <= eps2
        })
    }
}

/// Lexicographic (x, then y) endpoint order.
fn ordered(a: Point, b: Point) -> (Point, Point) {
    if b.x < a.x || (b.x == a.x && b.y < a.y) {
        (b, a)
    } else {
        (a, b)
    }
}

/// Validates every polygon of every group. Stops at the first failure.
pub fn validate_groups(groups: &[PolygonGroup], epsilon: f64, items_per_cell: usize) -> Result<()> {
    for (group, polygons) in groups.iter().enumerate() {
        if polygons.is_empty() {
            continue;
        }
        let mut range = Range2::empty();
        let mut vertex_count = 0;
        for p in polygons {
            range.merge(&p.bounds());
            vertex_count += p.vertex_count();
        }
        if !range.is_valid() {
            // Only empty loops; the per-loop check reports them.
            range = Range2::new(Point::origin(), Point::origin());
        }
        let division = GridSpace::<usize>::division_for(vertex_count, items_per_cell);
        let mut finder = LineFinder::new(range.expand(epsilon), division, epsilon)?;

        for (index, polygon) in polygons.iter().enumerate() {
            check_loops(polygon).map_err(|kind| Error::Validation {
                group,
                polygon: index,
                kind,
            })?;
            let mut start_id = 0;
            for l in &polygon.loops {
                let points: Vec<Point> = l.positions().collect();
                finder.add_loop(index, start_id, &points);
                start_id += points.len();
            }
        }

        for (index, polygon) in polygons.iter().enumerate() {
            check_edges(polygon, index, &finder).map_err(|kind| Error::Validation {
                group,
                polygon: index,
                kind,
            })?;
        }
        tracing::debug!(
            group,
            polygons = polygons.len(),
            segments = finder.len(),
            division,
            "group validated"
        );
    }
    Ok(())
}

/// Vertex count, edge data length and winding of every loop.
fn check_loops(polygon: &Polygon) -> std::result::Result<(), ValidationKind> {
    for (loop_index, l) in polygon.loops.iter().enumerate() {
        let vertices = l.len();
        if vertices < 3 {
            return Err(ValidationKind::TooFewVertices { loop_index });
        }
        if let Some(data) = &l.edge_user_data {
            if data.len() != vertices {
                return Err(ValidationKind::EdgeDataMismatch {
                    loop_index,
                    vertices,
                    edge_data: data.len(),
                });
            }
        }
        let area = l.area();
        if loop_index == 0 && area >= 0.0 {
            return Err(ValidationKind::WrongWinding {
                loop_index,
                expected: Winding::Clockwise,
            });
        }
        if loop_index > 0 && area <= 0.0 {
            return Err(ValidationKind::WrongWinding {
                loop_index,
                expected: Winding::CounterClockwise,
            });
        }
    }
    Ok(())
}

fn check_edges(
    polygon: &Polygon,
    index: usize,
    finder: &LineFinder,
) -> std::result::Result<(), ValidationKind> {
    let outer: Vec<Point> = match polygon.outer() {
        Some(l) => l.positions().collect(),
        None => return Ok(()),
    };
    let mut start_id = 0;
    for (loop_index, l) in polygon.loops.iter().enumerate() {
        let points: Vec<Point> = l.positions().collect();
        let n = points.len();
        for edge in 0..n {
            let (p1, p2) = (points[edge], points[(edge + 1) % n]);
            let id = start_id + edge;
            if finder.test_share(p1, p2, index, id) {
                return Err(ValidationKind::SharedEdge { loop_index, edge });
            }
            let next = start_id + (edge + 1) % n;
            let prev = start_id + (edge + n - 1) % n;
            if finder.test_intersect(p1, p2, index, [id, next, prev]) {
                return Err(ValidationKind::SelfIntersection { loop_index, edge });
            }
            if finder.test_touch(p1, index, start_id..start_id + n, [id, prev]) {
                return Err(ValidationKind::SelfIntersection { loop_index, edge });
            }
        }
        start_id += n;

        if loop_index > 0 && !point_in_polygon(points[0], &outer) {
            return Err(ValidationKind::HoleOutsideOuter { loop_index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::VertexLoop;

    const EPS: f64 = 1e-4;

    fn validate(polygons: Vec<Polygon>) -> Result<()> {
        validate_groups(&[polygons], EPS, 25)
    }

    fn kind(result: Result<()>) -> ValidationKind {
        match result {
            Err(Error::Validation { kind, .. }) => kind,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_square_with_hole() {
        let p = Polygon::rectangle((0.0, 0.0), (4.0, 4.0))
            .with_hole(Polygon::rectangle_hole((1.0, 1.0), (3.0, 3.0)));
        assert!(validate(vec![p]).is_ok());
    }

    #[test]
    fn rejects_short_loop() {
        let p = Polygon::new(VertexLoop::from_coords([(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(
            kind(validate(vec![p])),
            ValidationKind::TooFewVertices { loop_index: 0 }
        );
    }

    #[test]
    fn rejects_wrong_winding() {
        let ccw = Polygon::new(Polygon::rectangle_hole((0.0, 0.0), (1.0, 1.0)));
        assert_eq!(
            kind(validate(vec![ccw])),
            ValidationKind::WrongWinding {
                loop_index: 0,
                expected: Winding::Clockwise
            }
        );

        let cw_hole = Polygon::rectangle((0.0, 0.0), (4.0, 4.0)).with_hole(VertexLoop::from_coords([
            (1.0, 1.0),
            (1.0, 2.0),
            (2.0, 2.0),
            (2.0, 1.0),
        ]));
        assert_eq!(
            kind(validate(vec![cw_hole])),
            ValidationKind::WrongWinding {
                loop_index: 1,
                expected: Winding::CounterClockwise
            }
        );
    }

    #[test]
    fn rejects_edge_data_mismatch() {
        let mut p = Polygon::rectangle((0.0, 0.0), (1.0, 1.0));
        p.loops[0].edge_user_data = Some(vec![None, None]);
        assert_eq!(
            kind(validate(vec![p])),
            ValidationKind::EdgeDataMismatch {
                loop_index: 0,
                vertices: 4,
                edge_data: 2
            }
        );
    }

    #[test]
    fn rejects_bow_tie() {
        let p = Polygon::new(VertexLoop::from_coords([
            (0.0, 0.0),
            (0.0, 4.0),
            (6.0, 0.0),
            (6.0, 2.0),
        ]));
        assert!(p.outer().unwrap().area() < 0.0);
        assert!(matches!(
            kind(validate(vec![p])),
            ValidationKind::SelfIntersection { loop_index: 0, .. }
        ));
    }

    #[test]
    fn rejects_figure_eight() {
        // Two clockwise lobes meeting at (1, 1), visited twice.
        let p = Polygon::new(VertexLoop::from_coords([
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (2.0, 2.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 0.0),
        ]));
        assert!(p.outer().unwrap().area() < 0.0);
        assert_eq!(
            kind(validate(vec![p])),
            ValidationKind::SelfIntersection {
                loop_index: 0,
                edge: 2
            }
        );
    }

    #[test]
    fn rejects_vertex_on_own_edge() {
        // The notch tip (2, 4) rests on the top edge.
        let p = Polygon::new(VertexLoop::from_coords([
            (0.0, 0.0),
            (0.0, 4.0),
            (4.0, 4.0),
            (4.0, 0.0),
            (3.0, 0.0),
            (2.0, 4.0),
            (1.0, 0.0),
        ]));
        assert!(p.outer().unwrap().area() < 0.0);
        assert_eq!(
            kind(validate(vec![p])),
            ValidationKind::SelfIntersection {
                loop_index: 0,
                edge: 5
            }
        );
    }

    #[test]
    fn near_touch_within_epsilon_is_rejected() {
        let p = Polygon::new(VertexLoop::from_coords([
            (0.0, 0.0),
            (0.0, 4.0),
            (4.0, 4.0),
            (4.0, 0.0),
            (3.0, 0.0),
            (2.0, 4.0 - EPS * 0.5),
            (1.0, 0.0),
        ]));
        assert!(matches!(
            kind(validate(vec![p])),
            ValidationKind::SelfIntersection { loop_index: 0, .. }
        ));
    }

    #[test]
    fn polygons_touching_each_other_pass() {
        let a = Polygon::rectangle((0.0, 0.0), (1.0, 1.0));
        let b = Polygon::rectangle((1.0, 1.0), (2.0, 2.0));
        assert!(validate(vec![a, b]).is_ok());
    }

    #[test]
    fn rejects_doubled_edge() {
        // Spike out and back along the same segment.
        let p = Polygon::new(VertexLoop::from_coords([
            (0.0, 0.0),
            (0.0, 2.0),
            (1.0, 2.0),
            (3.0, 2.0),
            (1.0, 2.0),
            (2.0, 0.0),
        ]));
        assert!(matches!(
            kind(validate(vec![p])),
            ValidationKind::SharedEdge { loop_index: 0, .. }
        ));
    }

    #[test]
    fn rejects_escaping_hole() {
        let p = Polygon::rectangle((0.0, 0.0), (2.0, 2.0))
            .with_hole(Polygon::rectangle_hole((5.0, 5.0), (6.0, 6.0)));
        assert_eq!(
            kind(validate(vec![p])),
            ValidationKind::HoleOutsideOuter { loop_index: 1 }
        );
    }

    #[test]
    fn overlapping_polygons_of_one_group_are_rejected() {
        let a = Polygon::rectangle((0.0, 0.0), (2.0, 2.0));
        let b = Polygon::rectangle((1.0, 1.0), (3.0, 3.0));
        let err = validate(vec![a, b]).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                group: 0,
                polygon: 0,
                kind: ValidationKind::SelfIntersection { .. }
            }
        ));
    }

    #[test]
    fn abutting_polygons_of_one_group_pass() {
        let a = Polygon::rectangle((0.0, 0.0), (1.0, 1.0));
        let b = Polygon::rectangle((1.0, 0.0), (2.0, 1.0));
        assert!(validate(vec![a, b]).is_ok());
    }

    #[test]
    fn line_finder_ignores_neighbours() {
        let ring = [Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 0.0)];
        let range = Range2::from_points(ring).expand(EPS);
        let mut finder = LineFinder::new(range, 1, EPS).unwrap();
        finder.add_loop(0, 0, &ring);
        assert_eq!(finder.len(), 3);
        assert!(!finder.test_intersect(ring[0], ring[1], 0, [0, 1, 2]));
        assert!(!finder.test_share(ring[0], ring[1], 0, 0));
        assert!(!finder.test_share(ring[1], ring[0], 7, 0));
    }
}
