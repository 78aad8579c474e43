use framecheck::{
    render_panel_sizing, DesignConfig, FloorPanel, PanelThicknessSelector, WallPanel, WindZone,
    GALVANIZED, STAINLESS,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DesignConfig::default();
    let selector = PanelThicknessSelector::new(&config);

    for material in [STAINLESS, GALVANIZED] {
        for zone in [
            WindZone::NonTropicalCyclone,
            WindZone::TropicalCyclone,
            WindZone::TropicalCycloneMissile,
        ] {
            let wall = WallPanel {
                width: 30.0,
                height: 27.0,
                water_height: 10.0,
                wind_zone: zone,
            };
            match selector.wall(&wall, material) {
                Ok(sizing) => print!("{}", render_panel_sizing(&format!("Wall {zone:?}"), &sizing)),
                Err(error) => println!("Wall {zone:?} ({material}): {error}"),
            }
        }

        let floor = FloorPanel {
            width: 50.0,
            length: 31.0,
            water_height: 14.0,
        };
        let sizing = selector.floor(&floor, material)?;
        print!("{}", render_panel_sizing("Floor", &sizing));
    }

    Ok(())
}
