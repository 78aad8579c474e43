//! Constrained linear solve of `K u = F`.

use nalgebra::{DMatrix, DVector};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use tracing::debug;

use crate::conditions::{is_fixed, DofPartition};
use crate::config::FrameConfig;
use crate::errors::AnalysisError;
use crate::topology::FrameTopology;

/// Displacements and support reactions for every degree of freedom.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Global displacement vector; zero at restrained freedoms.
    pub displacements: DVector<f64>,
    /// `K u - F`; non-zero only at restrained freedoms.
    pub reactions: DVector<f64>,
}

/// Dense LU solver with stability checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSolver {
    /// Smallest accepted ratio of the smallest to the largest LU pivot.
    singularity_tolerance: f64,
    /// Largest accepted relative residual.
    residual_tolerance: f64,
}

impl Default for FrameSolver {
    fn default() -> Self {
        Self::new(&FrameConfig::default())
    }
}

impl FrameSolver {
    /// Solver using the tolerances of `config`.
    #[must_use]
    pub fn new(config: &FrameConfig) -> Self {
        Self {
            singularity_tolerance: config.singularity_tolerance,
            residual_tolerance: config.residual_tolerance,
        }
    }

    /// Solve for the displacements of `topology` under `load`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnstableStructure`] when a free node has no
    /// path to the base, when nothing is restrained, when the reduced matrix
    /// is singular or badly conditioned, or when the solution is not finite or
    /// fails the residual check.
    pub fn solve(
        &self,
        topology: &FrameTopology,
        stiffness: &DMatrix<f64>,
        load: &DVector<f64>,
    ) -> Result<Solution, AnalysisError> {
        let partition = DofPartition::of(topology);
        let mut displacements = DVector::zeros(load.len());
        if !partition.free.is_empty() {
            if partition.fixed.is_empty() {
                return Err(AnalysisError::unstable("no node is restrained"));
            }
            check_load_paths(topology)?;
            let free = self.solve_free(stiffness, load, &partition.free)?;
            for (index, &dof) in partition.free.iter().enumerate() {
                displacements[dof] = free[index];
            }
        }
        let reactions = stiffness * &displacements - load;
        Ok(Solution {
            displacements,
            reactions,
        })
    }

    /// Solve the reduced system over the unrestrained freedoms.
    fn solve_free(
        &self,
        stiffness: &DMatrix<f64>,
        load: &DVector<f64>,
        free: &[usize],
    ) -> Result<DVector<f64>, AnalysisError> {
        let k_ff = stiffness.select_rows(free).select_columns(free);
        let f_f = load.select_rows(free);

        let lu = k_ff.clone().lu();
        let pivots = lu.u().diagonal().abs();
        let largest = pivots.max();
        let smallest = pivots.min();
        let ratio = if largest > 0.0 { smallest / largest } else { 0.0 };
        if ratio < self.singularity_tolerance {
            return Err(AnalysisError::unstable(format!(
                "pivot ratio {ratio:.3e} below tolerance"
            )));
        }
        let solution = lu
            .solve(&f_f)
            .ok_or_else(|| AnalysisError::unstable("stiffness matrix is singular"))?;
        if solution.iter().any(|value| !value.is_finite()) {
            return Err(AnalysisError::unstable("non-finite displacement"));
        }

        let load_norm = f_f.norm();
        if load_norm > 0.0 {
            let residual = (&k_ff * &solution - &f_f).norm() / load_norm;
            debug!(residual, smallest, largest, "solved reduced system");
            if residual > self.residual_tolerance {
                return Err(AnalysisError::unstable(format!(
                    "relative residual {residual:.3e} above tolerance"
                )));
            }
        }
        Ok(solution)
    }
}

/// Every node must reach a restrained node through members.
fn check_load_paths(topology: &FrameTopology) -> Result<(), AnalysisError> {
    let mut graph: UnGraph<(), ()> = UnGraph::with_capacity(topology.node_count(), 0);
    let indices: Vec<NodeIndex> = topology.nodes().iter().map(|_| graph.add_node(())).collect();
    for member in topology.members() {
        if let (Some(a), Some(b)) = (topology.index_of(member.start), topology.index_of(member.end))
        {
            graph.add_edge(indices[a], indices[b], ());
        }
    }

    let mut reached = vec![false; topology.node_count()];
    for (index, node) in topology.nodes().iter().enumerate() {
        if !is_fixed(node.position) || reached[index] {
            continue;
        }
        let mut bfs = Bfs::new(&graph, indices[index]);
        while let Some(visited) = bfs.next(&graph) {
            reached[visited.index()] = true;
        }
    }

    match reached.iter().position(|&ok| !ok) {
        Some(index) => Err(AnalysisError::unstable(format!(
            "node {} has no load path to the base",
            topology.nodes()[index].id
        ))),
        None => Ok(()),
    }
}
