// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerances and grid sizing for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Merge and intersection-snap distance.
    pub epsilon: f64,
    /// Check the input polygons before building the graph.
    pub validate: bool,
    /// Target item count per cell of the node and edge grids.
    pub items_per_cell: usize,
    /// Target item count per cell of the validation segment grid.
    pub validation_items_per_cell: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            validate: true,
            items_per_cell: 10,
            validation_items_per_cell: 25,
        }
    }
}

impl TopologyConfig {
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    /// Rejects a non-finite or non-positive epsilon.
    pub fn check(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}
