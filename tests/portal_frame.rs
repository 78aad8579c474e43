#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use framecheck::{
    point, AnalysisError, BracingPlan, ChannelShape, CrossSectionProfile, DesignConfig,
    FrameStructuralChecker, FrameTopology, FrameVerdict, LineLoad, STAINLESS,
};

#[derive(Debug, Clone, Copy)]
struct PortalGeometry {
    span: f64,
    height: f64,
    target_nodes: usize,
    bracing: BracingPlan,
}

impl Default for PortalGeometry {
    fn default() -> Self {
        Self {
            span: 138.0,
            height: 27.0,
            target_nodes: 10,
            bracing: BracingPlan::FullX,
        }
    }
}

fn build_frame(geometry: PortalGeometry) -> FrameTopology {
    let frame = FrameTopology::rectangular(geometry.span, geometry.height, geometry.target_nodes)
        .expect("rectangular frame builds");
    geometry.bracing.apply(&frame)
}

fn check(frame: &FrameTopology, gauge: u8, q: f64) -> Result<FrameVerdict, AnalysisError> {
    let config = DesignConfig::default();
    let profile = CrossSectionProfile::new(&config, STAINLESS, gauge, ChannelShape::C)
        .expect("tabulated profile");
    FrameStructuralChecker::new(&config).check_topology(frame, &profile, LineLoad::new(q))
}

#[test]
fn vertical_reactions_carry_factored_load() {
    for bracing in BracingPlan::ALL {
        let geometry = PortalGeometry {
            bracing,
            ..PortalGeometry::default()
        };
        let verdict = check(&build_frame(geometry), 12, 6.0).expect("frame solves");
        let vertical: f64 = verdict.reactions.iter().map(|reaction| reaction.fy).sum();
        let horizontal: f64 = verdict.reactions.iter().map(|reaction| reaction.fx).sum();
        assert_relative_eq!(vertical, 1.5 * 6.0 * geometry.span, max_relative = 1e-9);
        assert_relative_eq!(horizontal, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn symmetric_frame_deflects_symmetrically() {
    let frame = build_frame(PortalGeometry::default());
    let verdict = check(&frame, 12, 6.0).expect("frame solves");
    let left = verdict.displacement_of(2).expect("top left corner");
    let right = verdict.displacement_of(3).expect("top right corner");
    assert_relative_eq!(left.v, right.v, max_relative = 1e-9);
    assert_relative_eq!(left.u, -right.u, epsilon = 1e-12);
    assert!(left.v < 0.0);
}

#[test]
fn repeated_checks_are_identical() {
    let frame = build_frame(PortalGeometry::default());
    let first = check(&frame, 14, 8.0).expect("frame solves");
    let second = check(&frame, 14, 8.0).expect("frame solves");
    assert_eq!(first, second);
}

#[test]
fn failures_persist_under_heavier_load() {
    let frame = build_frame(PortalGeometry {
        bracing: BracingPlan::None,
        ..PortalGeometry::default()
    });
    let mut previously_failed = Vec::new();
    for q in [1.0, 10.0, 50.0, 200.0, 1_000.0] {
        let verdict = check(&frame, 16, q).expect("frame solves");
        let failed: Vec<bool> = verdict.members.iter().map(|m| m.fails()).collect();
        for (before, now) in previously_failed.iter().zip(&failed) {
            assert!(!before || *now, "member recovered at q = {q}");
        }
        previously_failed = failed;
    }
    assert!(previously_failed.iter().any(|&failed| failed));
}

#[test]
fn light_braced_frame_is_sound_and_overload_is_not() {
    let frame = build_frame(PortalGeometry::default());
    assert!(check(&frame, 12, 1.0).expect("frame solves").sound);
    let overloaded = check(&frame, 12, 5_000.0).expect("frame solves");
    assert!(!overloaded.sound);
    assert!(overloaded.failed_members().count() > 0);
}

#[test]
fn frame_without_base_is_unstable() {
    let config = DesignConfig::default();
    let profile = CrossSectionProfile::new(&config, STAINLESS, 12, ChannelShape::C)
        .expect("tabulated profile");
    let result = FrameStructuralChecker::new(&config).check(
        [
            (0, point(0.0, 5.0)),
            (1, point(40.0, 5.0)),
            (2, point(0.0, 30.0)),
            (3, point(40.0, 30.0)),
        ],
        [(0, 2), (1, 3), (2, 3), (0, 1)],
        &profile,
        LineLoad::new(2.0),
    );
    assert!(matches!(
        result,
        Err(AnalysisError::UnstableStructure { .. })
    ));
}

#[test]
fn hinged_mechanism_is_unstable_without_nan() {
    let config = DesignConfig::default();
    let profile = CrossSectionProfile::new(&config, STAINLESS, 12, ChannelShape::C)
        .expect("tabulated profile");
    // Node 2 hangs off the base through node 1 only; node 3 floats.
    let result = FrameStructuralChecker::new(&config).check(
        [
            (0, point(0.0, 0.0)),
            (1, point(0.0, 30.0)),
            (2, point(40.0, 30.0)),
            (3, point(80.0, 30.0)),
        ],
        [(0, 1), (1, 2)],
        &profile,
        LineLoad::new(2.0),
    );
    match result {
        Err(AnalysisError::UnstableStructure { reason }) => assert!(reason.contains("node 3")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn single_clamped_post_stands_but_lifted_post_does_not() {
    let config = DesignConfig::default();
    let profile = CrossSectionProfile::new(&config, STAINLESS, 12, ChannelShape::C)
        .expect("tabulated profile");
    let checker = FrameStructuralChecker::new(&config);
    let post = checker
        .check(
            [(0, point(0.0, 0.0)), (1, point(0.0, 20.0))],
            [(0, 1)],
            &profile,
            LineLoad::new(2.0),
        )
        .expect("clamped base carries the post");
    assert_eq!(post.reactions.len(), 1);
    assert_relative_eq!(post.reactions[0].fy, 0.0, epsilon = 1e-9);

    let lifted = checker.check(
        [(0, point(0.0, 1.0)), (1, point(0.0, 20.0))],
        [(0, 1)],
        &profile,
        LineLoad::new(2.0),
    );
    assert!(matches!(
        lifted,
        Err(AnalysisError::UnstableStructure { .. })
    ));
}
