//! Loads and supports applied to a frame.
//!
//! The base of every frame is clamped: a node sitting on y = 0 has all three
//! of its degrees of freedom fixed. The only load case is a uniform line load
//! along the top edge.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::topology::FrameTopology;

/// Degrees of freedom per node: horizontal, vertical and rotation.
pub const DOF_PER_NODE: usize = 3;

/// Uniform load along the top edge, in lbf/in acting downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineLoad {
    /// Unfactored magnitude.
    pub magnitude: f64,
}

impl LineLoad {
    /// Create a line load of `magnitude` lbf/in.
    #[must_use]
    pub const fn new(magnitude: f64) -> Self {
        Self { magnitude }
    }

    /// Magnitude after applying `load_factor`.
    #[must_use]
    pub fn factored(self, load_factor: f64) -> f64 {
        load_factor * self.magnitude
    }

    /// Split a total edge load between the top and side walls.
    ///
    /// The share of each wall is proportional to its length within the
    /// perimeter `2 (x + y)` of the enclosure footprint.
    ///
    /// # Examples
    /// ```
    /// use framecheck::LineLoad;
    ///
    /// let (long_wall, short_wall) = LineLoad::distribute(40_000.0, 300.0, 100.0);
    /// assert_eq!(long_wall.magnitude, 15_000.0);
    /// assert_eq!(short_wall.magnitude, 5_000.0);
    /// ```
    #[must_use]
    pub fn distribute(total: f64, x: f64, y: f64) -> (Self, Self) {
        let perimeter = 2.0 * (x + y);
        (
            Self::new(x * total / perimeter),
            Self::new(y * total / perimeter),
        )
    }
}

/// Whether a node at `position` is part of the clamped base.
#[must_use]
pub fn is_fixed(position: Point) -> bool {
    position.y == 0.0
}

/// Global degree-of-freedom indices split by restraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DofPartition {
    /// Unrestrained indices in ascending order.
    pub free: Vec<usize>,
    /// Restrained indices in ascending order.
    pub fixed: Vec<usize>,
}

impl DofPartition {
    /// Partition every degree of freedom of `topology`.
    #[must_use]
    pub fn of(topology: &FrameTopology) -> Self {
        let mut partition = Self::default();
        for (index, node) in topology.nodes().iter().enumerate() {
            let dofs = (0..DOF_PER_NODE).map(|axis| index * DOF_PER_NODE + axis);
            if is_fixed(node.position) {
                partition.fixed.extend(dofs);
            } else {
                partition.free.extend(dofs);
            }
        }
        partition
    }

    /// Total number of degrees of freedom.
    #[must_use]
    pub fn len(&self) -> usize {
        self.free.len() + self.fixed.len()
    }

    /// Whether the frame has no degrees of freedom at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    #[test]
    fn base_nodes_are_fully_fixed() {
        let frame = FrameTopology::from_nodes([
            (10, point(0.0, 10.0)),
            (11, point(0.0, 0.0)),
            (12, point(5.0, 10.0)),
        ])
        .expect("nodes");
        let partition = DofPartition::of(&frame);
        assert_eq!(partition.fixed, vec![3, 4, 5]);
        assert_eq!(partition.free, vec![0, 1, 2, 6, 7, 8]);
        assert_eq!(partition.len(), 9);
    }

    #[test]
    fn load_factor_scales_magnitude() {
        assert_eq!(LineLoad::new(20.0).factored(1.5), 30.0);
    }
}
