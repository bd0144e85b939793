// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for the node/edge arena.
//!
//! Nodes and edges get type-safe generational keys from `slotmap::SlotMap`.
//! A key stays valid (and is never reused for a different entity) after other
//! entities are removed, so splitting and beard pruning cannot leave stale
//! references that silently alias a new node or edge.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Key for a node (epsilon-merged point).
    pub struct NodeKey;

    /// Key for an edge (undirected connection between two nodes).
    pub struct EdgeKey;
}

/// One side of an edge, relative to its `from -> to` direction.
///
/// Traversing an edge `from -> to` keeps [`Side::Right`] on the right hand;
/// traversing it `to -> from` keeps [`Side::Left`] on the right hand. Loops
/// are always traced with the face interior on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// Both sides, right first.
    pub const BOTH: [Side; 2] = [Side::Right, Side::Left];

    /// Returns the side traced when walking an edge forwards (`true`) or
    /// backwards (`false`).
    pub fn from_forward(forward: bool) -> Self {
        if forward {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub fn is_right(self) -> bool {
        self == Side::Right
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Right => "right",
            Side::Left => "left",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opposite_round_trips() {
        for side in Side::BOTH {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
        }
    }

    #[test]
    fn side_from_direction() {
        assert_eq!(Side::from_forward(true), Side::Right);
        assert_eq!(Side::from_forward(false), Side::Left);
        assert!(Side::Right.is_right());
        assert_eq!(Side::Left.to_string(), "left");
    }
}
