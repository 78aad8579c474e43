//! Diagonal bracing strategies for rectangular bays.

use std::fmt;
use std::str::FromStr;

use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::topology::{Bay, FrameTopology, Member, NodeId};

/// Where diagonals are placed within the bays of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracingPlan {
    /// No diagonals.
    None,
    /// One diagonal per bay, rising toward the centreline.
    AlternatingHalf,
    /// Both diagonals in every bay.
    FullX,
    /// Both diagonals in every other bay.
    SparseX,
}

impl BracingPlan {
    /// Every plan.
    pub const ALL: [BracingPlan; 4] = [
        BracingPlan::None,
        BracingPlan::AlternatingHalf,
        BracingPlan::FullX,
        BracingPlan::SparseX,
    ];

    /// The plan actually used for `topology`.
    ///
    /// Every-other-bay bracing cannot be symmetric when a top node sits on the
    /// centreline, so [`BracingPlan::SparseX`] falls back to
    /// [`BracingPlan::AlternatingHalf`] there.
    #[must_use]
    pub fn resolve(self, topology: &FrameTopology) -> BracingPlan {
        match self {
            BracingPlan::SparseX if has_midpoint_node(topology) => BracingPlan::AlternatingHalf,
            plan => plan,
        }
    }

    /// Diagonals this plan adds, skipping any pair already joined.
    ///
    /// # Examples
    /// ```
    /// use framecheck::{BracingPlan, FrameTopology};
    ///
    /// let frame = FrameTopology::rectangular(90.0, 30.0, 10).expect("frame");
    /// assert_eq!(BracingPlan::FullX.diagonals(&frame).len(), 6);
    /// assert!(BracingPlan::None.diagonals(&frame).is_empty());
    /// ```
    #[must_use]
    pub fn diagonals(self, topology: &FrameTopology) -> Vec<Member> {
        let plan = self.resolve(topology);
        let midpoint = topology.midpoint_x();
        let position = |id: NodeId| topology.position(id).map(|p| p.x);

        let mut candidates = Vec::new();
        for bay in topology.bays() {
            let rising = Member::new(bay.bottom_left, bay.top_right);
            let falling = Member::new(bay.bottom_right, bay.top_left);
            match plan {
                BracingPlan::None => {}
                BracingPlan::FullX => candidates.extend([rising, falling]),
                BracingPlan::SparseX => {
                    if bay.index % 2 == 0 {
                        candidates.extend([rising, falling]);
                    }
                }
                BracingPlan::AlternatingHalf => {
                    let (Some(left), Some(right), Some(mid)) =
                        (position(bay.top_left), position(bay.top_right), midpoint)
                    else {
                        continue;
                    };
                    candidates.extend(half_bracing(&bay, left, right, mid));
                }
            }
        }

        let mut pairs: UnGraphMap<NodeId, ()> = UnGraphMap::new();
        for member in topology.members() {
            pairs.add_edge(member.start, member.end, ());
        }
        let mut added = Vec::new();
        for member in candidates {
            if !pairs.contains_edge(member.start, member.end) {
                pairs.add_edge(member.start, member.end, ());
                added.push(member);
            }
        }
        debug!(requested = ?self, used = ?plan, added = added.len(), "placed bracing");
        added
    }

    /// A copy of `topology` with this plan's diagonals added.
    #[must_use]
    pub fn apply(self, topology: &FrameTopology) -> FrameTopology {
        let mut braced = topology.clone();
        for member in self.diagonals(topology) {
            if let Err(error) = braced.add_member(member) {
                warn!(%error, "skipping diagonal");
            }
        }
        braced
    }
}

/// Diagonals of one bay under [`BracingPlan::AlternatingHalf`].
fn half_bracing(bay: &Bay, left: f64, right: f64, midpoint: f64) -> Vec<Member> {
    let rising = Member::new(bay.bottom_left, bay.top_right);
    let falling = Member::new(bay.bottom_right, bay.top_left);
    if left == midpoint || right == midpoint || (left < midpoint && midpoint < right) {
        vec![rising, falling]
    } else if right < midpoint {
        vec![rising]
    } else {
        vec![falling]
    }
}

/// Whether a top-edge node sits exactly on the horizontal midpoint.
fn has_midpoint_node(topology: &FrameTopology) -> bool {
    let Some(midpoint) = topology.midpoint_x() else {
        return false;
    };
    topology
        .edges()
        .top
        .iter()
        .filter_map(|&id| topology.position(id))
        .any(|p| p.x == midpoint)
}

impl FromStr for BracingPlan {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "none" => Ok(BracingPlan::None),
            "alternatinghalf" | "half" => Ok(BracingPlan::AlternatingHalf),
            "fullx" | "x" => Ok(BracingPlan::FullX),
            "sparsex" => Ok(BracingPlan::SparseX),
            _ => Err(format!("unknown bracing plan `{value}`")),
        }
    }
}

impl fmt::Display for BracingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BracingPlan::None => "none",
            BracingPlan::AlternatingHalf => "alternating-half",
            BracingPlan::FullX => "full-x",
            BracingPlan::SparseX => "sparse-x",
        };
        f.write_str(name)
    }
}
