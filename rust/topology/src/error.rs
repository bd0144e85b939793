// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for topology construction and boolean operations.

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a topology or composing polygons.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input polygon failed validation. Raised before any graph mutation.
    #[error("group {group} polygon {polygon}: {kind}")]
    Validation {
        group: usize,
        polygon: usize,
        kind: ValidationKind,
    },

    /// An algorithmic invariant did not hold. Indicates a bug or an
    /// unsupported degenerate configuration, never bad input.
    #[error("internal invariant violated: {0}")]
    Internal(String),

    /// The spatial grid cannot be built over the given domain.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// The merge tolerance must be finite and strictly positive.
    #[error("epsilon must be finite and > 0, got {0}")]
    InvalidEpsilon(f64),

    /// An operation referenced a group that was never registered.
    #[error("group {group} out of range ({groups} groups registered)")]
    GroupOutOfRange { group: usize, groups: usize },

    /// A query or boolean operation ran before `create_topology`.
    #[error("topology has not been built; call create_topology first")]
    TopologyNotBuilt,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The reason an input polygon was rejected. Loop and edge indices are
/// zero-based; edge `i` runs from vertex `i` to vertex `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationKind {
    #[error("loop {loop_index} has fewer than 3 vertices")]
    TooFewVertices { loop_index: usize },

    #[error("loop {loop_index} has {vertices} vertices but {edge_data} edge user-data entries")]
    EdgeDataMismatch {
        loop_index: usize,
        vertices: usize,
        edge_data: usize,
    },

    #[error("loop {loop_index} must wind {expected}")]
    WrongWinding { loop_index: usize, expected: Winding },

    #[error("loop {loop_index} edge {edge} is shared with another edge of the polygon")]
    SharedEdge { loop_index: usize, edge: usize },

    #[error("loop {loop_index} edge {edge} is self-intersecting")]
    SelfIntersection { loop_index: usize, edge: usize },

    #[error("hole loop {loop_index} leaves the outer loop")]
    HoleOutsideOuter { loop_index: usize },
}

/// Loop orientation in a y-up frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl std::fmt::Display for Winding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Winding::Clockwise => "clockwise",
            Winding::CounterClockwise => "counter-clockwise",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_location() {
        let err = Error::Validation {
            group: 1,
            polygon: 3,
            kind: ValidationKind::SelfIntersection {
                loop_index: 0,
                edge: 2,
            },
        };
        assert_eq!(
            err.to_string(),
            "group 1 polygon 3: loop 0 edge 2 is self-intersecting"
        );
    }

    #[test]
    fn winding_message() {
        let hole = ValidationKind::WrongWinding {
            loop_index: 1,
            expected: Winding::CounterClockwise,
        };
        assert_eq!(hole.to_string(), "loop 1 must wind counter-clockwise");
    }
}
