use framecheck::{
    BracingPlan, ChannelShape, CrossSectionProfile, DesignConfig, FrameCandidate,
    FrameStructuralChecker, FrameTopology, LineLoad, ProfileError, GALVANIZED,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DesignConfig::default();
    let base = FrameTopology::rectangular(96.0, 36.0, 12)?;

    let candidates: Vec<FrameCandidate> = BracingPlan::ALL
        .iter()
        .flat_map(|plan| ChannelShape::ALL.map(|shape| (plan.apply(&base), shape)))
        .map(|(topology, shape)| -> Result<FrameCandidate, ProfileError> {
            Ok(FrameCandidate {
                topology,
                profile: CrossSectionProfile::new(&config, GALVANIZED, 14, shape)?,
                load: LineLoad::new(20.0),
            })
        })
        .collect::<Result<_, _>>()?;

    let results = FrameStructuralChecker::new(&config).check_many(&candidates);
    for (candidate, result) in candidates.iter().zip(results) {
        let summary = match result {
            Ok(verdict) => format!(
                "{:<9} failed members: {:>2}, max translation {:.4} in",
                if verdict.sound { "sound" } else { "not sound" },
                verdict.failed_members().count(),
                verdict.max_translation()
            ),
            Err(error) => format!("error: {error}"),
        };
        println!(
            "{:>2} members {:<12} {summary}",
            candidate.topology.member_count(),
            candidate.profile.shape().to_string()
        );
    }

    Ok(())
}
