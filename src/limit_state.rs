//! Member forces and limit-state checks on a solved frame.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use nalgebra::SVector;
use serde::Serialize;

use crate::assembly::ElementGeometry;
use crate::config::FrameConfig;
use crate::errors::AnalysisError;
use crate::geometry::Displacement;
use crate::profile::CrossSectionProfile;
use crate::solver::Solution;
use crate::topology::{FrameTopology, NodeId};

/// Which limit states a member violates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LimitFlags {
    /// `|σa| > φa Fy`.
    pub axial: bool,
    /// `|τ| > φv 0.6 Fy`.
    pub shear: bool,
    /// `|σb| > φb Fy`, from the frame moment or the simple-span check.
    pub bending: bool,
    /// Compression beyond `φc Pcr`.
    pub buckling: bool,
    /// Top-edge member fails as a simply supported span.
    pub simple_span: bool,
    /// An end or the end-to-end displacement exceeds the allowance.
    pub deflection: bool,
}

impl LimitFlags {
    /// Any strength or stability failure.
    #[must_use]
    pub fn strength(&self) -> bool {
        self.axial || self.shear || self.bending || self.buckling || self.simple_span
    }

    /// Any failure at all.
    #[must_use]
    pub fn any(&self) -> bool {
        self.strength() || self.deflection
    }
}

/// Forces, stresses and checks for one member, taken at its end node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberForceRecord {
    /// Start node.
    pub start: NodeId,
    /// End node.
    pub end: NodeId,
    /// Member length in inches.
    pub length: f64,
    /// Axial force; negative in compression.
    pub axial_force: f64,
    /// Shear force.
    pub shear_force: f64,
    /// Bending moment.
    pub moment: f64,
    /// `N / A`.
    pub axial_stress: f64,
    /// `V / A`.
    pub shear_stress: f64,
    /// `M c / I`.
    pub bending_stress: f64,
    /// Euler load `π² E I / (K L)²`.
    pub buckling_capacity: f64,
    /// `q L² / 8 · c / I` for members on the top edge.
    pub simple_span_stress: Option<f64>,
    /// Largest of the end and relative translations.
    pub deflection: f64,
    /// Allowed translation for this member.
    pub deflection_limit: f64,
    /// Largest transverse displacement along the member, from the cubic
    /// Hermite shape through the local end deflections and rotations.
    pub max_internal_deflection: f64,
    /// Violated limit states.
    pub flags: LimitFlags,
}

impl MemberForceRecord {
    /// Whether the member violates any limit state.
    #[must_use]
    pub fn fails(&self) -> bool {
        self.flags.any()
    }
}

/// Bending stress in a simply supported span under `q`.
///
/// # Examples
/// ```
/// use framecheck::simple_span_bending_stress;
///
/// // M = 10 * 40² / 8 = 2000; σ = M c / I.
/// assert_eq!(simple_span_bending_stress(10.0, 40.0, 2.0, 4.0), 1000.0);
/// ```
#[must_use]
pub fn simple_span_bending_stress(
    q: f64,
    length: f64,
    extreme_fiber: f64,
    moment_of_inertia: f64,
) -> f64 {
    q * length.powi(2) / 8.0 * extreme_fiber / moment_of_inertia
}

/// Largest `|v(ξ)|` over `ξ ∈ [0, 1]` of the Hermite cubic
/// `v = N1 v_i + N2 θ_i + N3 v_j + N4 θ_j` on a member of `length`.
///
/// The cubic peaks at an end or where `v'(ξ) = 0`, so only those points
/// are evaluated.
pub(crate) fn hermite_max_deflection(
    v_i: f64,
    theta_i: f64,
    v_j: f64,
    theta_j: f64,
    length: f64,
) -> f64 {
    let (slope_i, slope_j) = (length * theta_i, length * theta_j);
    // v(ξ) = a + b ξ + c ξ² + d ξ³
    let a = v_i;
    let b = slope_i;
    let c = -3.0 * v_i - 2.0 * slope_i + 3.0 * v_j - slope_j;
    let d = 2.0 * v_i + slope_i - 2.0 * v_j + slope_j;
    let at = |xi: f64| a + xi * (b + xi * (c + xi * d));

    // v'(ξ) = b + 2c ξ + 3d ξ²
    let mut candidates = vec![0.0, 1.0];
    if d == 0.0 {
        if c != 0.0 {
            candidates.push(-b / (2.0 * c));
        }
    } else {
        let discriminant = c * c - 3.0 * b * d;
        if discriminant >= 0.0 {
            let root = discriminant.sqrt();
            candidates.push((-c + root) / (3.0 * d));
            candidates.push((-c - root) / (3.0 * d));
        }
    }
    candidates
        .into_iter()
        .filter(|xi| (0.0..=1.0).contains(xi))
        .map(|xi| at(xi).abs())
        .fold(0.0, f64::max)
}

/// Checks every member of a solved frame against one profile.
#[derive(Clone, Copy, Debug)]
pub struct LimitStateEvaluator<'a> {
    /// Section shared by every member.
    profile: &'a CrossSectionProfile,
    /// Buckling and deflection factors.
    config: &'a FrameConfig,
}

impl<'a> LimitStateEvaluator<'a> {
    /// Evaluator for members made of `profile`.
    #[must_use]
    pub fn new(profile: &'a CrossSectionProfile, config: &'a FrameConfig) -> Self {
        Self { profile, config }
    }

    /// Records for every member in insertion order.
    ///
    /// `q` is the unfactored line load used for the top-edge span check.
    ///
    /// # Errors
    ///
    /// Propagates topology errors for members that cannot be located.
    pub fn evaluate(
        &self,
        topology: &FrameTopology,
        solution: &Solution,
        q: f64,
    ) -> Result<Vec<MemberForceRecord>, AnalysisError> {
        let top: BTreeSet<NodeId> = topology.edges().top.into_iter().collect();
        topology
            .members()
            .iter()
            .map(|member| -> Result<MemberForceRecord, AnalysisError> {
                let element = ElementGeometry::of(topology, member)?;
                let on_top = top.contains(&member.start) && top.contains(&member.end);
                Ok(self.record(&element, member.start, member.end, solution, on_top.then_some(q)))
            })
            .collect()
    }

    /// Forces, stresses and flags for one located member.
    fn record(
        &self,
        element: &ElementGeometry,
        start: NodeId,
        end: NodeId,
        solution: &Solution,
        top_load: Option<f64>,
    ) -> MemberForceRecord {
        let profile = self.profile;
        let dofs = element.dofs();
        let global = SVector::<f64, 6>::from_fn(|row, _| solution.displacements[dofs[row]]);
        let local = element.transformation() * global;
        let forces = element.local_stiffness(profile) * local;
        let (axial_force, shear_force, moment) = (forces[3], forces[4], forces[5]);

        let area = profile.area();
        let inertia = profile.moment_of_inertia();
        let fiber = profile.extreme_fiber();
        let fy = profile.yield_strength();
        let phi = profile.resistance();

        let axial_stress = axial_force / area;
        let shear_stress = shear_force / area;
        let bending_stress = moment * fiber / inertia;
        let effective_length = self.config.effective_length_factor * element.length;
        let buckling_capacity =
            PI.powi(2) * profile.elastic_modulus() * inertia / effective_length.powi(2);
        let simple_span_stress =
            top_load.map(|q| simple_span_bending_stress(q, element.length, fiber, inertia));

        let at_start = Displacement::from(global.fixed_rows::<3>(0).into_owned());
        let at_end = Displacement::from(global.fixed_rows::<3>(3).into_owned());
        let relative = Displacement::new(at_end.u - at_start.u, at_end.v - at_start.v, 0.0);
        let deflection = at_start
            .translation()
            .max(at_end.translation())
            .max(relative.translation());
        let deflection_limit = self.config.deflection_limit_ratio * element.length;
        let max_internal_deflection =
            hermite_max_deflection(local[1], local[2], local[4], local[5], element.length);

        let simple_span = simple_span_stress.is_some_and(|stress| stress.abs() > phi.bending * fy);
        let flags = LimitFlags {
            axial: axial_stress.abs() > phi.axial * fy,
            shear: shear_stress.abs() > phi.shear * 0.6 * fy,
            bending: bending_stress.abs() > phi.bending * fy || simple_span,
            buckling: axial_force < 0.0 && axial_force.abs() > phi.buckling * buckling_capacity,
            simple_span,
            deflection: deflection > deflection_limit,
        };

        MemberForceRecord {
            start,
            end,
            length: element.length,
            axial_force,
            shear_force,
            moment,
            axial_stress,
            shear_stress,
            bending_stress,
            buckling_capacity,
            simple_span_stress,
            deflection,
            deflection_limit,
            max_internal_deflection,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::assembly::{assemble_stiffness, load_vector};
    use crate::config::{DesignConfig, STAINLESS};
    use crate::profile::ChannelShape;
    use crate::solver::FrameSolver;

    fn evaluate(q: f64) -> (CrossSectionProfile, Vec<MemberForceRecord>) {
        let config = DesignConfig::default();
        let profile =
            CrossSectionProfile::new(&config, STAINLESS, 12, ChannelShape::C).expect("profile");
        let frame = FrameTopology::rectangular(90.0, 30.0, 10).expect("frame");
        let stiffness = assemble_stiffness(&frame, &profile).expect("assembly");
        let load = load_vector(&frame, config.frame.load_factor * q);
        let solution = FrameSolver::new(&config.frame)
            .solve(&frame, &stiffness, &load)
            .expect("solve");
        let records = LimitStateEvaluator::new(&profile, &config.frame)
            .evaluate(&frame, &solution, q)
            .expect("evaluate");
        (profile, records)
    }

    #[test]
    fn top_chords_carry_simple_span_stress() {
        let (profile, records) = evaluate(12.0);
        let chords: Vec<_> = records
            .iter()
            .filter(|record| record.simple_span_stress.is_some())
            .collect();
        assert_eq!(chords.len(), 3);
        for chord in chords {
            let expected = 12.0 * 30.0_f64.powi(2) / 8.0 * profile.extreme_fiber()
                / profile.moment_of_inertia();
            assert_relative_eq!(chord.simple_span_stress.unwrap_or_default(), expected);
        }
    }

    #[test]
    fn stresses_scale_with_load() {
        let (_, light) = evaluate(5.0);
        let (_, heavy) = evaluate(10.0);
        for (a, b) in light.iter().zip(&heavy) {
            assert_relative_eq!(2.0 * a.axial_stress, b.axial_stress, max_relative = 1e-9, epsilon = 1e-9);
            assert_relative_eq!(2.0 * a.bending_stress, b.bending_stress, max_relative = 1e-9, epsilon = 1e-9);
            assert_relative_eq!(2.0 * a.deflection, b.deflection, max_relative = 1e-9, epsilon = 1e-12);
            if a.fails() {
                assert!(b.fails());
            }
        }
    }

    #[test]
    fn unloaded_frame_passes() {
        let (_, records) = evaluate(0.0);
        assert!(records.iter().all(|record| !record.fails()));
        assert!(records.iter().all(|record| record.axial_force == 0.0));
    }

    #[test]
    fn verticals_are_in_compression() {
        let (_, records) = evaluate(5.0);
        let post = records
            .iter()
            .find(|record| record.start == 0 && record.end == 2)
            .expect("corner post");
        assert!(post.axial_force < 0.0);
        assert!(post.buckling_capacity > 0.0);
        assert!(post.simple_span_stress.is_none());
    }

    #[test]
    fn hermite_peak_of_a_rotated_end() {
        // v = L θ (ξ³ - ξ²) peaks at ξ = 2/3 with |v| = 4/27 L θ.
        let peak = hermite_max_deflection(0.0, 0.0, 0.0, 0.01, 30.0);
        assert_relative_eq!(peak, 4.0 / 27.0 * 30.0 * 0.01, max_relative = 1e-12);
        let mirrored = hermite_max_deflection(0.0, -0.01, 0.0, 0.0, 30.0);
        assert_relative_eq!(mirrored, peak, max_relative = 1e-12);
    }

    #[test]
    fn hermite_shape_of_a_cantilever_tip() {
        // Tip load P on a cantilever: v = P L³ / 3EI, θ = P L² / 2EI.
        let (tip, rotation, length) = (0.3, 0.015, 30.0);
        assert_relative_eq!(
            hermite_max_deflection(0.0, 0.0, tip, rotation, length),
            tip,
            max_relative = 1e-12
        );
        // Rigid translation and straight tilt peak at an end.
        assert_relative_eq!(hermite_max_deflection(0.2, 0.0, 0.2, 0.0, 10.0), 0.2);
        assert_relative_eq!(hermite_max_deflection(0.0, 0.01, 0.1, 0.01, 10.0), 0.1);
    }

    #[test]
    fn internal_deflection_covers_end_deflection() {
        let (_, records) = evaluate(8.0);
        for record in &records {
            assert!(record.max_internal_deflection.is_finite());
            assert!(record.max_internal_deflection >= 0.0);
        }
        assert!(records
            .iter()
            .filter(|record| record.simple_span_stress.is_some())
            .all(|record| record.max_internal_deflection > 0.0));
    }

    #[test]
    fn heavy_load_fails_the_top_chord() {
        let (_, records) = evaluate(2_000.0);
        assert!(records
            .iter()
            .any(|record| record.flags.simple_span && record.flags.bending));
    }
}
