//! Element matrices and global assembly for plane frames.

use nalgebra::{DMatrix, DVector, SMatrix};

use crate::conditions::DOF_PER_NODE;
use crate::errors::{AnalysisError, TopologyError};
use crate::profile::CrossSectionProfile;
use crate::topology::{FrameTopology, Member};

/// 6 x 6 element matrix ordered `[u_i, v_i, θ_i, u_j, v_j, θ_j]`.
pub type ElementMatrix = SMatrix<f64, 6, 6>;

/// Stiffness of a prismatic Euler-Bernoulli beam-column in its local axes.
#[must_use]
pub fn local_stiffness(
    elastic_modulus: f64,
    area: f64,
    moment_of_inertia: f64,
    length: f64,
) -> ElementMatrix {
    let axial = elastic_modulus * area / length;
    let ei = elastic_modulus * moment_of_inertia;
    let k1 = 12.0 * ei / length.powi(3);
    let k2 = 6.0 * ei / length.powi(2);
    let k3 = 4.0 * ei / length;
    let k4 = 2.0 * ei / length;

    #[rustfmt::skip]
    let values = [
         axial, 0.0,  0.0, -axial, 0.0,  0.0,
         0.0,   k1,   k2,   0.0,  -k1,   k2,
         0.0,   k2,   k3,   0.0,  -k2,   k4,
        -axial, 0.0,  0.0,  axial, 0.0,  0.0,
         0.0,  -k1,  -k2,   0.0,   k1,  -k2,
         0.0,   k2,   k4,   0.0,  -k2,   k3,
    ];
    ElementMatrix::from_row_slice(&values)
}

/// Rotation from global to local axes for direction cosines `c` and `s`.
#[must_use]
pub fn transformation(c: f64, s: f64) -> ElementMatrix {
    let mut matrix = ElementMatrix::zeros();
    for offset in [0, 3] {
        matrix[(offset, offset)] = c;
        matrix[(offset, offset + 1)] = s;
        matrix[(offset + 1, offset)] = -s;
        matrix[(offset + 1, offset + 1)] = c;
        matrix[(offset + 2, offset + 2)] = 1.0;
    }
    matrix
}

/// Placement of one member in the global system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementGeometry {
    /// Arena index of the start node.
    pub start: usize,
    /// Arena index of the end node.
    pub end: usize,
    /// Member length.
    pub length: f64,
    /// Cosine of the member angle.
    pub cos: f64,
    /// Sine of the member angle.
    pub sin: f64,
}

impl ElementGeometry {
    /// Locate `member` within `topology`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownNode`] for a dangling endpoint and
    /// [`TopologyError::ZeroLengthMember`] when the endpoints coincide.
    pub fn of(topology: &FrameTopology, member: &Member) -> Result<Self, TopologyError> {
        let locate = |id| {
            topology
                .index_of(id)
                .map(|index| (index, topology.nodes()[index].position))
                .ok_or(TopologyError::UnknownNode {
                    start: member.start,
                    end: member.end,
                    missing: id,
                })
        };
        let (start, a) = locate(member.start)?;
        let (end, b) = locate(member.end)?;
        let delta = b.to_vector() - a.to_vector();
        let length = delta.norm();
        if length == 0.0 {
            return Err(TopologyError::ZeroLengthMember(member.start, member.end));
        }
        Ok(Self {
            start,
            end,
            length,
            cos: delta.x / length,
            sin: delta.y / length,
        })
    }

    /// Global degree-of-freedom indices of both ends.
    #[must_use]
    pub fn dofs(&self) -> [usize; 6] {
        let a = self.start * DOF_PER_NODE;
        let b = self.end * DOF_PER_NODE;
        [a, a + 1, a + 2, b, b + 1, b + 2]
    }

    /// Rotation matrix for this member.
    #[must_use]
    pub fn transformation(&self) -> ElementMatrix {
        transformation(self.cos, self.sin)
    }

    /// Local stiffness for `profile`.
    #[must_use]
    pub fn local_stiffness(&self, profile: &CrossSectionProfile) -> ElementMatrix {
        local_stiffness(
            profile.elastic_modulus(),
            profile.area(),
            profile.moment_of_inertia(),
            self.length,
        )
    }

    /// Stiffness in global axes, `Tᵀ k T`.
    #[must_use]
    pub fn global_stiffness(&self, profile: &CrossSectionProfile) -> ElementMatrix {
        let t = self.transformation();
        t.transpose() * self.local_stiffness(profile) * t
    }
}

/// Sum every member's global stiffness into a `3n x 3n` matrix.
///
/// # Errors
///
/// Propagates [`ElementGeometry::of`] failures.
pub fn assemble_stiffness(
    topology: &FrameTopology,
    profile: &CrossSectionProfile,
) -> Result<DMatrix<f64>, AnalysisError> {
    let dof = topology.node_count() * DOF_PER_NODE;
    let mut matrix = DMatrix::zeros(dof, dof);
    for member in topology.members() {
        let element = ElementGeometry::of(topology, member)?;
        let global = element.global_stiffness(profile);
        let dofs = element.dofs();
        for (row_local, &global_row) in dofs.iter().enumerate() {
            for (col_local, &global_col) in dofs.iter().enumerate() {
                matrix[(global_row, global_col)] += global[(row_local, col_local)];
            }
        }
    }
    Ok(matrix)
}

/// Nodal loads for a factored line load `q` along the top edge.
///
/// Each top-edge segment carries `q |dx|`, lumped half to either end and
/// acting in -y.
#[must_use]
pub fn load_vector(topology: &FrameTopology, q: f64) -> DVector<f64> {
    let mut load = DVector::zeros(topology.node_count() * DOF_PER_NODE);
    for (a, b) in topology.top_edge_pairs() {
        let (Some(ia), Some(ib), Some(pa), Some(pb)) = (
            topology.index_of(a),
            topology.index_of(b),
            topology.position(a),
            topology.position(b),
        ) else {
            continue;
        };
        let half = 0.5 * q * (pb.x - pa.x).abs();
        load[ia * DOF_PER_NODE + 1] -= half;
        load[ib * DOF_PER_NODE + 1] -= half;
    }
    load
}
