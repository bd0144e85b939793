// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uniform grid index for tolerance-based node and edge lookup.
//!
//! The grid covers a fixed bounding range split into `division x division`
//! cells. Every item is registered in each cell its (epsilon-expanded)
//! oriented box overlaps, so a query only scans the cells under the query
//! box. Results are candidates: callers still run their exact geometric test.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::geometry::{Obb2, Point, Range2, Vector};

/// A grid of buckets keyed by item, storing each item's bounding box.
#[derive(Debug, Clone)]
pub struct GridSpace<K> {
    range: Range2,
    division: usize,
    /// Cells per unit length along each axis.
    scale: Vector,
    /// Half the size of one cell.
    cell_extents: Vector,
    volume_expansion: f64,
    cells: Vec<Vec<(K, Obb2)>>,
    items: FxHashMap<K, Obb2>,
}

impl<K: Copy + Eq + Hash> GridSpace<K> {
    /// Creates an empty grid over `range` with `division` cells per axis.
    pub fn new(range: Range2, division: usize) -> Result<Self> {
        let size = range.size();
        if !range.is_valid() || size.x <= 0.0 || size.y <= 0.0 {
            return Err(Error::InvalidGrid(format!(
                "domain must have a positive size, got {} x {}",
                size.x, size.y
            )));
        }
        if division == 0 {
            return Err(Error::InvalidGrid("division must be at least 1".into()));
        }
        let d = division as f64;
        Ok(Self {
            range,
            division,
            scale: Vector::new(d / size.x, d / size.y),
            cell_extents: Vector::new(size.x / (d * 2.0), size.y / (d * 2.0)),
            volume_expansion: 0.0,
            cells: vec![Vec::new(); division * division],
            items: FxHashMap::default(),
        })
    }

    /// Cells per axis for `count` items at roughly `per_cell` items per cell.
    pub fn division_for(count: usize, per_cell: usize) -> usize {
        let per_cell = per_cell.max(1) as f64;
        ((count as f64 / per_cell).sqrt().ceil() as usize).max(1)
    }

    pub fn range(&self) -> &Range2 {
        &self.range
    }

    pub fn division(&self) -> usize {
        self.division
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn volume_expansion(&self) -> f64 {
        self.volume_expansion
    }

    /// Sets the padding added to every item's extents. A change re-buckets
    /// every item.
    pub fn set_volume_expansion(&mut self, expansion: f64) {
        if self.volume_expansion != expansion {
            self.volume_expansion = expansion;
            self.rebuild();
        }
    }

    /// Registers `key` with bounding box `volume`, replacing any previous
    /// registration of the same key.
    pub fn insert(&mut self, key: K, volume: Obb2) {
        if self.items.contains_key(&key) {
            self.remove(key);
        }
        self.items.insert(key, volume);
        self.place(key, &volume);
    }

    /// Unregisters `key`. Returns `false` if it was not present.
    pub fn remove(&mut self, key: K) -> bool {
        let Some(volume) = self.items.remove(&key) else {
            return false;
        };
        let expanded = volume.expanded(self.volume_expansion);
        let (lo, hi) = self.cell_span(&expanded.bounds());
        for iy in lo[1]..=hi[1] {
            for ix in lo[0]..=hi[0] {
                let cell = &mut self.cells[iy * self.division + ix];
                if !cell.is_empty() {
                    cell.retain(|(k, _)| *k != key);
                }
            }
        }
        true
    }

    pub fn contains(&self, key: K) -> bool {
        self.items.contains_key(&key)
    }

    /// Returns every item whose expanded box overlaps `volume`, each once,
    /// in first-seen cell order.
    pub fn query(&self, volume: &Obb2) -> Vec<K> {
        let (lo, hi) = self.cell_span(&volume.bounds());
        let mut seen = FxHashSet::default();
        let mut found = Vec::new();
        for iy in lo[1]..=hi[1] {
            for ix in lo[0]..=hi[0] {
                for (key, item) in &self.cells[iy * self.division + ix] {
                    if seen.contains(key) {
                        continue;
                    }
                    if item.intersects(volume) {
                        seen.insert(*key);
                        found.push(*key);
                    }
                }
            }
        }
        found
    }

    /// Bounds of every non-empty cell with its `(ix, iy)` index.
    pub fn occupied_cells(&self) -> Vec<((usize, usize), Range2)> {
        let mut out = Vec::new();
        for iy in 0..self.division {
            for ix in 0..self.division {
                if !self.cells[iy * self.division + ix].is_empty() {
                    out.push(((ix, iy), self.cell_bounds(ix, iy)));
                }
            }
        }
        out
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.items.clear();
    }

    fn rebuild(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        let items: Vec<(K, Obb2)> = self.items.iter().map(|(k, v)| (*k, *v)).collect();
        for (key, volume) in items {
            self.place(key, &volume);
        }
    }

    fn place(&mut self, key: K, volume: &Obb2) {
        let expanded = volume.expanded(self.volume_expansion);
        let bounds = expanded.bounds();
        let (lo, hi) = self.cell_span(&bounds);
        // Diagonal boxes only go into the cells they actually cross. Boxes
        // reaching past the domain keep the whole clamped span.
        let cull = !expanded.is_axis_aligned() && self.range.contains(&bounds);
        for iy in lo[1]..=hi[1] {
            for ix in lo[0]..=hi[0] {
                if cull {
                    let cell = Obb2::aabb(self.cell_center(ix, iy), self.cell_extents);
                    if !cell.intersects(&expanded) {
                        continue;
                    }
                }
                self.cells[iy * self.division + ix].push((key, expanded));
            }
        }
    }

    fn cell_center(&self, ix: usize, iy: usize) -> Point {
        Point::new(
            self.range.min.x + self.cell_extents.x * (2 * ix + 1) as f64,
            self.range.min.y + self.cell_extents.y * (2 * iy + 1) as f64,
        )
    }

    fn cell_bounds(&self, ix: usize, iy: usize) -> Range2 {
        let c = self.cell_center(ix, iy);
        Range2::new(c - self.cell_extents, c + self.cell_extents)
    }

    /// Inclusive cell index span covering `bounds`, clamped to the grid.
    fn cell_span(&self, bounds: &Range2) -> ([usize; 2], [usize; 2]) {
        let max = self.division - 1;
        let index = |v: f64, min: f64, scale: f64| -> usize {
            let i = ((v - min) * scale).floor();
            if i <= 0.0 {
                0
            } else if i >= max as f64 {
                max
            } else {
                i as usize
            }
        };
        (
            [
                index(bounds.min.x, self.range.min.x, self.scale.x),
                index(bounds.min.y, self.range.min.y, self.scale.y),
            ],
            [
                index(bounds.max.x, self.range.min.x, self.scale.x),
                index(bounds.max.y, self.range.min.y, self.scale.y),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(division: usize) -> GridSpace<u32> {
        let range = Range2::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        GridSpace::new(range, division).unwrap()
    }

    #[test]
    fn rejects_degenerate_domain() {
        let flat = Range2::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(GridSpace::<u32>::new(flat, 4).is_err());
        assert!(GridSpace::<u32>::new(Range2::empty(), 4).is_err());
        let ok = Range2::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert!(GridSpace::<u32>::new(ok, 0).is_err());
    }

    #[test]
    fn division_heuristic() {
        assert_eq!(GridSpace::<u32>::division_for(0, 10), 1);
        assert_eq!(GridSpace::<u32>::division_for(10, 10), 1);
        assert_eq!(GridSpace::<u32>::division_for(11, 10), 2);
        assert_eq!(GridSpace::<u32>::division_for(1000, 10), 10);
        assert_eq!(GridSpace::<u32>::division_for(2500, 25), 10);
    }

    #[test]
    fn query_finds_nearby_points_only() {
        let mut g = grid(5);
        g.insert(1, Obb2::point(Point::new(1.0, 1.0)));
        g.insert(2, Obb2::point(Point::new(9.0, 9.0)));

        let hits = g.query(&Obb2::point(Point::new(1.05, 1.0)).expanded(0.1));
        assert_eq!(hits, vec![1]);
        assert!(g.query(&Obb2::point(Point::new(5.0, 5.0)).expanded(0.1)).is_empty());
    }

    #[test]
    fn segment_spanning_cells_is_reported_once() {
        let mut g = grid(10);
        g.insert(7, Obb2::segment(Point::new(0.5, 0.5), Point::new(9.5, 9.5)));
        let hits = g.query(&Obb2::aabb(Point::new(5.0, 5.0), Vector::new(5.0, 5.0)));
        assert_eq!(hits, vec![7]);
        // Diagonal segment occupies the diagonal cells, not the corners.
        let occupied = g.occupied_cells();
        assert!(occupied.iter().any(|((ix, iy), _)| *ix == 5 && *iy == 5));
        assert!(!occupied.iter().any(|((ix, iy), _)| *ix == 9 && *iy == 0));
    }

    #[test]
    fn remove_unregisters_everywhere() {
        let mut g = grid(4);
        g.insert(3, Obb2::segment(Point::new(0.0, 5.0), Point::new(10.0, 5.0)));
        assert!(g.contains(3));
        assert!(g.remove(3));
        assert!(!g.remove(3));
        assert!(g.is_empty());
        assert!(g.occupied_cells().is_empty());
    }

    #[test]
    fn expansion_change_rebuilds() {
        let mut g = grid(10);
        g.insert(1, Obb2::point(Point::new(4.99, 4.99)));
        let probe = Obb2::point(Point::new(5.2, 5.2));
        assert!(g.query(&probe).is_empty());

        g.set_volume_expansion(0.25);
        assert_eq!(g.query(&probe), vec![1]);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn items_outside_domain_are_clamped() {
        let mut g = grid(4);
        g.insert(9, Obb2::point(Point::new(-3.0, 12.0)));
        assert_eq!(g.query(&Obb2::point(Point::new(-3.0, 12.0))), vec![9]);
    }

    #[test]
    fn diagonal_items_outside_domain_are_clamped() {
        let mut g = grid(4);
        let outside = Obb2::segment(Point::new(12.0, 12.0), Point::new(14.0, 15.0));
        g.insert(4, outside);
        assert_eq!(g.query(&outside), vec![4]);
        assert_eq!(g.occupied_cells().len(), 1);
        assert!(g.remove(4));
        assert!(g.occupied_cells().is_empty());
    }
}
