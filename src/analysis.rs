//! Whole-frame feasibility checks.
//!
//! A check builds the stiffness system for one candidate frame, solves it
//! with the base clamped and runs every member through the limit states.
//! Candidates are independent, so [`FrameStructuralChecker::check_many`]
//! spreads them over the rayon thread pool.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::assembly::{assemble_stiffness, load_vector};
use crate::conditions::{is_fixed, LineLoad, DOF_PER_NODE};
use crate::config::DesignConfig;
use crate::errors::AnalysisError;
use crate::geometry::{Displacement, Point};
use crate::limit_state::{LimitStateEvaluator, MemberForceRecord};
use crate::profile::CrossSectionProfile;
use crate::solver::{FrameSolver, Solution};
use crate::topology::{FrameTopology, Member, NodeId};

/// Solved displacement of one node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeDisplacement {
    /// Node identifier.
    pub node: NodeId,
    /// Displacement of the node.
    pub displacement: Displacement,
}

/// Support reaction at one base node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeReaction {
    /// Node identifier.
    pub node: NodeId,
    /// Horizontal force.
    pub fx: f64,
    /// Vertical force.
    pub fy: f64,
    /// Fixed-end moment.
    pub moment: f64,
}

/// Outcome of checking one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameVerdict {
    /// True when no member violates any limit state.
    pub sound: bool,
    /// Per-member forces and checks, in member order.
    pub members: Vec<MemberForceRecord>,
    /// Displacement of every node, in arena order.
    pub displacements: Vec<NodeDisplacement>,
    /// Reactions at the base nodes.
    pub reactions: Vec<NodeReaction>,
    /// Members ignored because an endpoint did not exist.
    pub dropped_members: Vec<Member>,
}

impl FrameVerdict {
    /// Records of the members that violate a limit state.
    pub fn failed_members(&self) -> impl Iterator<Item = &MemberForceRecord> {
        self.members.iter().filter(|record| record.fails())
    }

    /// Displacement of `node`, if it is part of the frame.
    #[must_use]
    pub fn displacement_of(&self, node: NodeId) -> Option<Displacement> {
        self.displacements
            .iter()
            .find(|entry| entry.node == node)
            .map(|entry| entry.displacement)
    }

    /// Largest translation over all nodes.
    #[must_use]
    pub fn max_translation(&self) -> f64 {
        self.displacements
            .iter()
            .map(|entry| entry.displacement.translation())
            .fold(0.0, f64::max)
    }
}

/// One frame to be checked in a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameCandidate {
    /// Frame geometry.
    pub topology: FrameTopology,
    /// Channel used for every member.
    pub profile: CrossSectionProfile,
    /// Unfactored top-edge load.
    pub load: LineLoad,
}

/// Runs frame checks against a shared configuration.
#[derive(Clone, Copy, Debug)]
pub struct FrameStructuralChecker<'a> {
    /// Factors, tolerances and tables shared by every check.
    config: &'a DesignConfig,
}

impl<'a> FrameStructuralChecker<'a> {
    /// Checker using `config` for load factors and tolerances.
    #[must_use]
    pub fn new(config: &'a DesignConfig) -> Self {
        Self { config }
    }

    /// Check a frame given as raw nodes and members.
    ///
    /// Members whose endpoints do not exist are dropped with a warning and
    /// listed in [`FrameVerdict::dropped_members`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidTopology`] for duplicate nodes or
    /// zero-length members, [`AnalysisError::InvalidLoad`] for a NaN or
    /// infinite load and [`AnalysisError::UnstableStructure`] when the frame
    /// cannot carry load.
    ///
    /// # Examples
    /// ```
    /// use framecheck::{point, ChannelShape, CrossSectionProfile, DesignConfig};
    /// use framecheck::{FrameStructuralChecker, LineLoad, STAINLESS};
    ///
    /// let config = DesignConfig::default();
    /// let profile = CrossSectionProfile::new(&config, STAINLESS, 12, ChannelShape::C)?;
    /// let nodes = [
    ///     (0, point(0.0, 0.0)),
    ///     (1, point(40.0, 0.0)),
    ///     (2, point(0.0, 20.0)),
    ///     (3, point(40.0, 20.0)),
    /// ];
    /// let members = [(0, 2), (1, 3), (2, 3), (0, 3)];
    /// let verdict = FrameStructuralChecker::new(&config)
    ///     .check(nodes, members, &profile, LineLoad::new(1.0))?;
    /// assert!(verdict.sound);
    /// assert_eq!(verdict.reactions.len(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn check(
        &self,
        nodes: impl IntoIterator<Item = (NodeId, Point)>,
        members: impl IntoIterator<Item = (NodeId, NodeId)>,
        profile: &CrossSectionProfile,
        load: LineLoad,
    ) -> Result<FrameVerdict, AnalysisError> {
        let (topology, dropped) = FrameTopology::from_parts_lenient(nodes, members)?;
        let mut verdict = self.check_topology(&topology, profile, load)?;
        verdict.dropped_members = dropped;
        Ok(verdict)
    }

    /// Check a frame that has already been built.
    ///
    /// # Errors
    ///
    /// See [`FrameStructuralChecker::check`].
    pub fn check_topology(
        &self,
        topology: &FrameTopology,
        profile: &CrossSectionProfile,
        load: LineLoad,
    ) -> Result<FrameVerdict, AnalysisError> {
        if !load.magnitude.is_finite() {
            return Err(AnalysisError::InvalidLoad(load.magnitude));
        }
        let frame = &self.config.frame;
        debug!(
            nodes = topology.node_count(),
            members = topology.member_count(),
            shape = %profile.shape(),
            gauge = profile.gauge(),
            q = load.magnitude,
            "checking frame"
        );
        let stiffness = assemble_stiffness(topology, profile)?;
        let forces = load_vector(topology, load.factored(frame.load_factor));
        let solution = FrameSolver::new(frame).solve(topology, &stiffness, &forces)?;
        let members =
            LimitStateEvaluator::new(profile, frame).evaluate(topology, &solution, load.magnitude)?;

        let sound = members.iter().all(|record| !record.fails());
        let failed = members.iter().filter(|record| record.fails()).count();
        debug!(sound, failed, "frame checked");
        Ok(FrameVerdict {
            sound,
            members,
            displacements: node_displacements(topology, &solution),
            reactions: base_reactions(topology, &solution),
            dropped_members: Vec::new(),
        })
    }

    /// Check many candidates in parallel, returning results in input order.
    pub fn check_many(
        &self,
        candidates: &[FrameCandidate],
    ) -> Vec<Result<FrameVerdict, AnalysisError>> {
        candidates
            .par_iter()
            .enumerate()
            .map(|(index, candidate)| {
                let result =
                    self.check_topology(&candidate.topology, &candidate.profile, candidate.load);
                if let Err(error) = &result {
                    warn!(index, %error, "candidate rejected");
                }
                result
            })
            .collect()
    }
}

/// Solved displacement of every node in arena order.
fn node_displacements(topology: &FrameTopology, solution: &Solution) -> Vec<NodeDisplacement> {
    topology
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let base = index * DOF_PER_NODE;
            NodeDisplacement {
                node: node.id,
                displacement: Displacement::from(
                    solution.displacements.fixed_rows::<3>(base).into_owned(),
                ),
            }
        })
        .collect()
}

/// Reactions at the clamped base nodes.
fn base_reactions(topology: &FrameTopology, solution: &Solution) -> Vec<NodeReaction> {
    topology
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| is_fixed(node.position))
        .map(|(index, node)| {
            let base = index * DOF_PER_NODE;
            NodeReaction {
                node: node.id,
                fx: solution.reactions[base],
                fy: solution.reactions[base + 1],
                moment: solution.reactions[base + 2],
            }
        })
        .collect()
}
