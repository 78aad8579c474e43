use std::env;
use std::error::Error;

use framecheck::{
    render_panel_sizing, render_verdict, AspectOverflow, BracingPlan, ChannelShape,
    CrossSectionProfile, DesignConfig, FloorPanel, FrameStructuralChecker, FrameTopology,
    LineLoad, PanelError, PanelThicknessSelector, WallPanel, WindZone, STAINLESS,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SPAN: f64 = 138.0;
const HEIGHT: f64 = 27.0;
const WATER_HEIGHT: f64 = 10.0;
const TARGET_NODES: usize = 10;
const TOP_LOAD: f64 = 5.0;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading configuration");
            DesignConfig::from_path(path)?
        }
        None => DesignConfig::default(),
    };

    let profile = CrossSectionProfile::new(&config, STAINLESS, 12, ChannelShape::C)?;
    let frame = BracingPlan::FullX.apply(&FrameTopology::rectangular(SPAN, HEIGHT, TARGET_NODES)?);
    let verdict = FrameStructuralChecker::new(&config).check_topology(
        &frame,
        &profile,
        LineLoad::new(TOP_LOAD),
    )?;
    println!(
        "{} ga {} {} channel, {SPAN} x {HEIGHT} in, {} bracing",
        profile.gauge(),
        profile.material(),
        profile.shape(),
        BracingPlan::FullX
    );
    println!("{}", render_verdict(&verdict));

    let selector = PanelThicknessSelector::new(&config);
    let wall = WallPanel {
        width: SPAN,
        height: HEIGHT,
        water_height: WATER_HEIGHT,
        wind_zone: WindZone::TropicalCyclone,
    };
    match selector.wall(&wall, STAINLESS) {
        Ok(sizing) => println!("{}", render_panel_sizing("Wall", &sizing)),
        Err(error @ PanelError::UnsupportedAspectRatio { .. }) => {
            warn!(%error, "wall rejected, retrying with clamped coefficients");
            let mut clamped = config.clone();
            clamped.panels.wall_aspect_overflow = AspectOverflow::Clamp;
            let sizing = PanelThicknessSelector::new(&clamped).wall(&wall, STAINLESS)?;
            println!("{}", render_panel_sizing("Wall (clamped)", &sizing));
        }
        Err(error) => return Err(error.into()),
    }

    let floor = FloorPanel {
        width: SPAN,
        length: HEIGHT,
        water_height: WATER_HEIGHT,
    };
    let sizing = selector.floor(&floor, STAINLESS)?;
    println!("{}", render_panel_sizing("Floor", &sizing));

    Ok(())
}
