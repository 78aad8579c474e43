//! Plain-text rendering of frame verdicts and panel sizings.

use std::fmt::{self, Write};

use crate::analysis::FrameVerdict;
use crate::limit_state::LimitFlags;
use crate::panel::PanelSizing;

/// Render a frame verdict as a table of members followed by the reactions.
#[must_use]
pub fn render_verdict(verdict: &FrameVerdict) -> String {
    let mut output = String::new();
    write_verdict(&mut output, verdict).expect("writing to string cannot fail");
    output
}

/// Render the sizing of one panel under `label`.
#[must_use]
pub fn render_panel_sizing(label: &str, sizing: &PanelSizing) -> String {
    let mut output = String::new();
    write_panel_sizing(&mut output, label, sizing).expect("writing to string cannot fail");
    output
}

/// Write [`render_verdict`] output to any formatter.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_verdict(out: &mut impl Write, verdict: &FrameVerdict) -> fmt::Result {
    let status = if verdict.sound { "SOUND" } else { "NOT SOUND" };
    writeln!(out, "Frame verdict: {status}")?;
    writeln!(
        out,
        "{:>5} {:>5} {:>8} {:>11} {:>11} {:>11} {:>10} {:>10}  failures",
        "start", "end", "L (in)", "N (lbf)", "V (lbf)", "M (lbf-in)", "defl (in)", "v max (in)"
    )?;
    for record in &verdict.members {
        writeln!(
            out,
            "{:>5} {:>5} {:>8.2} {:>+11.2} {:>+11.2} {:>+11.2} {:>10.4} {:>10.4}  {}",
            record.start,
            record.end,
            record.length,
            record.axial_force,
            record.shear_force,
            record.moment,
            record.deflection,
            record.max_internal_deflection,
            failure_labels(&record.flags)
        )?;
    }
    if !verdict.dropped_members.is_empty() {
        let dropped: Vec<String> = verdict
            .dropped_members
            .iter()
            .map(|member| format!("{}-{}", member.start, member.end))
            .collect();
        writeln!(out, "Ignored members: {}", dropped.join(", "))?;
    }
    writeln!(out, "Support reactions:")?;
    for reaction in &verdict.reactions {
        writeln!(
            out,
            "  node {:>3}: Fx = {:+.2} lbf, Fy = {:+.2} lbf, M = {:+.2} lbf-in",
            reaction.node, reaction.fx, reaction.fy, reaction.moment
        )?;
    }
    writeln!(out, "Max translation: {:.4} in", verdict.max_translation())
}

/// Write [`render_panel_sizing`] output to any formatter.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_panel_sizing(out: &mut impl Write, label: &str, sizing: &PanelSizing) -> fmt::Result {
    writeln!(out, "{label} panel ({})", sizing.material)?;
    writeln!(out, "  pressure:          {:.4} psi", sizing.governing_pressure)?;
    writeln!(out, "  aspect ratio:      {:.3}", sizing.aspect_ratio)?;
    writeln!(out, "  yield thickness:   {:.4} in", sizing.yield_thickness)?;
    if let Some(thickness) = sizing.deflection_thickness {
        writeln!(out, "  deflection thick.: {thickness:.4} in")?;
    }
    writeln!(out, "  required:          {:.4} in", sizing.required_thickness)?;
    match sizing.gauge {
        Some(entry) => writeln!(
            out,
            "  gauge:             {} ga ({:.3} in)",
            entry.gauge, entry.thickness
        ),
        None => writeln!(
            out,
            "  gauge:             none (thickest is {:.3} in)",
            sizing.max_thickness
        ),
    }
}

/// Comma-separated names of the violated limit states, or `-`.
fn failure_labels(flags: &LimitFlags) -> String {
    let labels: Vec<&str> = [
        (flags.axial, "axial"),
        (flags.shear, "shear"),
        (flags.bending, "bending"),
        (flags.buckling, "buckling"),
        (flags.simple_span, "span"),
        (flags.deflection, "deflection"),
    ]
    .into_iter()
    .filter_map(|(failed, label)| failed.then_some(label))
    .collect();
    if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{NodeDisplacement, NodeReaction};
    use crate::config::GaugeEntry;
    use crate::geometry::Displacement;
    use crate::limit_state::MemberForceRecord;
    use crate::topology::Member;

    fn record(flags: LimitFlags) -> MemberForceRecord {
        MemberForceRecord {
            start: 0,
            end: 2,
            length: 27.0,
            axial_force: -310.5,
            shear_force: 1.25,
            moment: -40.0,
            axial_stress: -770.0,
            shear_stress: 3.1,
            bending_stress: -80.0,
            buckling_capacity: 3.8e5,
            simple_span_stress: None,
            deflection: 0.0123,
            deflection_limit: 0.075,
            max_internal_deflection: 0.0456,
            flags,
        }
    }

    #[test]
    fn verdict_lists_members_and_reactions() {
        let verdict = FrameVerdict {
            sound: false,
            members: vec![
                record(LimitFlags::default()),
                record(LimitFlags {
                    bending: true,
                    simple_span: true,
                    ..LimitFlags::default()
                }),
            ],
            displacements: vec![NodeDisplacement {
                node: 2,
                displacement: Displacement::new(0.003, -0.004, 0.0),
            }],
            reactions: vec![NodeReaction {
                node: 0,
                fx: 0.0,
                fy: 310.5,
                moment: 12.0,
            }],
            dropped_members: vec![Member::new(3, 9)],
        };
        let report = render_verdict(&verdict);
        assert!(report.starts_with("Frame verdict: NOT SOUND"));
        assert!(report.contains("-310.50"));
        assert!(report.contains("v max (in)"));
        assert!(report.contains("0.0123     0.0456"));
        assert!(report.contains("bending,span"));
        assert!(report.contains("Ignored members: 3-9"));
        assert!(report.contains("node   0: Fx = +0.00 lbf, Fy = +310.50 lbf"));
        assert!(report.contains("Max translation: 0.0050 in"));
    }

    #[test]
    fn sizing_without_gauge_names_limit() {
        let mut sizing = PanelSizing {
            material: "SST-M3".to_string(),
            governing_pressure: 0.3603,
            aspect_ratio: 5.111,
            yield_thickness: 0.0987,
            deflection_thickness: None,
            required_thickness: 0.0987,
            gauge: Some(GaugeEntry {
                gauge: 12,
                thickness: 0.101,
            }),
            max_thickness: 0.25,
        };
        let report = render_panel_sizing("Wall", &sizing);
        assert!(report.contains("Wall panel (SST-M3)"));
        assert!(report.contains("12 ga (0.101 in)"));

        sizing.gauge = None;
        let report = render_panel_sizing("Wall", &sizing);
        assert!(report.contains("none (thickest is 0.250 in)"));
        assert!(!report.contains("deflection"));
    }
}
