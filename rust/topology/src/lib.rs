// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # PolyBool Topology
//!
//! Boolean operations (union, intersection, exclusive-or, subtraction) on
//! groups of 2D polygons with holes, built on a merged planar graph.
//!
//! All input groups are inserted into one arena-based node/edge graph:
//! vertices closer than epsilon merge into one node, coincident edges merge
//! into one edge, and crossings and T-junctions split edges at shared nodes.
//! Each side of every edge records which polygon of which group lies on it.
//! A boolean result is then the set of faces whose edge sides satisfy a
//! predicate, traced into loops and nested into outer boundaries and holes.
//!
//! ## Orientation
//!
//! Coordinates are y-up. Outer loops wind clockwise and holes
//! counter-clockwise, both for input and for output, so the polygon interior
//! is always on the right of each edge.
//!
//! ## Modules
//!
//! - [`input`]: caller-side vertices, loops, polygons and groups
//! - [`validation`]: structural checks run before graph construction
//! - [`arena`], [`construction`]: the merged graph and how it is built
//! - [`trace`], [`nesting`]: face tracing and hole assignment
//! - [`boolean`]: filters and the [`PolyBool`] engine

pub mod arena;
pub mod boolean;
pub mod config;
pub mod construction;
pub mod dictionary;
pub mod error;
pub mod geometry;
pub mod input;
pub mod keys;
pub mod nesting;
pub mod serialization;
pub mod spatial;
pub mod trace;
pub mod validation;

pub use arena::{Edge, GraphArena, Node, PolygonIndices};
pub use boolean::{
    BooleanOp, EdgeFilter, IntersectionFilter, PolyBool, PolygonFilter, SubtractFilter, UnionFilter,
    XorFilter,
};
pub use config::TopologyConfig;
pub use construction::{IntersectionEvent, IntersectionHook};
pub use dictionary::{DictValue, Dictionary};
pub use error::{Error, Result, ValidationKind, Winding};
pub use geometry::{Point, Range2, Vector};
pub use input::{Polygon, PolygonGroup, Vertex, VertexLoop};
pub use keys::{EdgeKey, NodeKey, Side};
pub use nesting::EPolygon;
pub use serialization::GraphSnapshot;
pub use trace::{EDir, ELoop, TurnPolicy};
pub use validation::validate_groups;
