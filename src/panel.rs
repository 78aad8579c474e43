//! Plate-bending sizing of wall and floor sheets.
//!
//! Walls are treated as plates fixed along the floor, simply supported along
//! both sides and free along the top; floors as plates fixed on all four
//! edges. Both are sized by allowable stress: the required thickness comes
//! from the tabulated plate coefficients (Roark, Table 11.4) and is rounded up
//! to the next standard gauge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AspectOverflow, DesignConfig, GaugeEntry, Material, WindZone};
use crate::errors::PanelError;

/// Dimensionless plate coefficient tabulated by aspect ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable {
    /// `(ratio, coefficient)` pairs sorted by ratio.
    points: Vec<(f64, f64)>,
}

impl CoefficientTable {
    /// Build a table from `(aspect ratio, coefficient)` pairs in any order.
    #[must_use]
    pub fn new(points: &[(f64, f64)]) -> Self {
        let mut points = points.to_vec();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { points }
    }

    /// Largest tabulated aspect ratio.
    #[must_use]
    pub fn max_ratio(&self) -> Option<f64> {
        self.points.last().map(|&(ratio, _)| ratio)
    }

    /// Coefficient for `ratio`.
    ///
    /// Between keys the value is interpolated linearly. Below the smallest key
    /// it is scaled proportionally toward zero and at or above the largest key
    /// the largest key's value is returned. `None` only for an empty table.
    ///
    /// # Examples
    /// ```
    /// use framecheck::CoefficientTable;
    ///
    /// let table = CoefficientTable::new(&[(1.0, 0.2), (2.0, 0.4)]);
    /// assert_eq!(table.lookup(0.5), Some(0.1));
    /// assert_eq!(table.lookup(1.5), Some(0.30000000000000004));
    /// assert_eq!(table.lookup(9.0), Some(0.4));
    /// ```
    #[must_use]
    pub fn lookup(&self, ratio: f64) -> Option<f64> {
        let &(first_key, first_value) = self.points.first()?;
        let &(last_key, last_value) = self.points.last()?;
        if ratio <= first_key {
            return Some(first_value * ratio / first_key);
        }
        if ratio >= last_key {
            return Some(last_value);
        }
        self.points
            .windows(2)
            .find(|pair| pair[0].0 <= ratio && ratio < pair[1].0)
            .map(|pair| {
                let (k0, v0) = pair[0];
                let (k1, v1) = pair[1];
                v0 + (v1 - v0) * (ratio - k0) / (k1 - k0)
            })
    }

    /// Non-empty with positive, strictly increasing keys.
    pub(crate) fn is_valid(&self) -> bool {
        !self.points.is_empty()
            && self.points[0].0 > 0.0
            && self.points.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }
}

/// A wall panel: fixed at the floor, free along the top.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallPanel {
    /// Horizontal width in inches.
    pub width: f64,
    /// Vertical height in inches.
    pub height: f64,
    /// Depth of retained water in inches.
    pub water_height: f64,
    /// Wind exposure of the site.
    pub wind_zone: WindZone,
}

/// A floor panel: fixed on all four edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorPanel {
    /// Width in inches.
    pub width: f64,
    /// Length in inches.
    pub length: f64,
    /// Depth of retained water in inches.
    pub water_height: f64,
}

/// Result of sizing one panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PanelSizing {
    /// Material the panel was sized for.
    pub material: String,
    /// Governing pressure in psi.
    pub governing_pressure: f64,
    /// Aspect ratio used for the coefficient lookup.
    pub aspect_ratio: f64,
    /// Thickness needed to stay below the allowable stress, in inches.
    pub yield_thickness: f64,
    /// Thickness needed to meet the deflection limit (floors only), in inches.
    pub deflection_thickness: Option<f64>,
    /// Governing required thickness in inches.
    pub required_thickness: f64,
    /// Thinnest standard gauge meeting the requirement, if any.
    pub gauge: Option<GaugeEntry>,
    /// Thickest tabulated gauge for the material, in inches.
    pub max_thickness: f64,
}

impl PanelSizing {
    /// The selected gauge, or why none is available.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::ExceedsMaterialLimit`] when the required thickness
    /// is beyond the thickest tabulated gauge.
    pub fn require_gauge(&self) -> Result<GaugeEntry, PanelError> {
        self.gauge.ok_or(PanelError::ExceedsMaterialLimit {
            required: self.required_thickness,
            max_thickness: self.max_thickness,
        })
    }
}

/// Sizes wall and floor sheets against the configured tables.
#[derive(Clone, Copy, Debug)]
pub struct PanelThicknessSelector<'a> {
    /// Source of materials, gauges and plate coefficients.
    config: &'a DesignConfig,
}

impl<'a> PanelThicknessSelector<'a> {
    /// Create a selector reading from `config`.
    #[must_use]
    pub fn new(config: &'a DesignConfig) -> Self {
        Self { config }
    }

    /// Size a wall panel against hydrostatic and wind pressure.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownMaterial`], [`PanelError::InvalidDimensions`]
    /// for non-positive spans or a degenerate ratio or thickness, and
    /// [`PanelError::UnsupportedAspectRatio`] when `width / height` exceeds
    /// the wall table and the overflow policy rejects.
    ///
    /// # Examples
    /// ```
    /// use framecheck::{DesignConfig, PanelThicknessSelector, WallPanel, WindZone, STAINLESS};
    ///
    /// let config = DesignConfig::default();
    /// let wall = WallPanel {
    ///     width: 13.0,
    ///     height: 27.0,
    ///     water_height: 10.0,
    ///     wind_zone: WindZone::NonTropicalCyclone,
    /// };
    /// let sizing = PanelThicknessSelector::new(&config)
    ///     .wall(&wall, STAINLESS)
    ///     .expect("ratio within table");
    /// assert_eq!(sizing.gauge.map(|entry| entry.gauge), Some(18));
    /// ```
    pub fn wall(&self, panel: &WallPanel, material: &str) -> Result<PanelSizing, PanelError> {
        let properties = self.material(material)?;
        check_positive("width", panel.width)?;
        check_positive("height", panel.height)?;
        check_non_negative("water_height", panel.water_height)?;

        let panels = &self.config.panels;
        let allowable = properties.yield_strength / panels.safety_factor;
        let hydrostatic = panels.water_unit_weight * panel.water_height;
        let wind =
            panels.wind_ratings.rating(panel.wind_zone) / 144.0 * panels.wind_factor;
        let pressure = hydrostatic.max(wind);

        let ratio = panel.width / panel.height;
        check_positive("aspect_ratio", ratio)?;
        let max_ratio = panels.wall_beta.max_ratio().unwrap_or(0.0);
        if ratio > max_ratio && panels.wall_aspect_overflow == AspectOverflow::Reject {
            return Err(PanelError::UnsupportedAspectRatio { ratio, max_ratio });
        }
        let beta = panels
            .wall_beta
            .lookup(ratio)
            .ok_or(PanelError::UnsupportedAspectRatio { ratio, max_ratio })?;

        let yield_thickness = (beta * pressure * panel.height.powi(2) / allowable).sqrt();
        debug!(
            material,
            hydrostatic, wind, ratio, beta, yield_thickness, "sized wall panel"
        );
        sizing(
            material,
            properties,
            pressure,
            ratio,
            yield_thickness,
            None,
        )
    }

    /// Size a floor panel against hydrostatic pressure.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownMaterial`] or
    /// [`PanelError::InvalidDimensions`], including spans whose ratio or
    /// thickness is not finite. Aspect ratios are always resolved.
    pub fn floor(&self, panel: &FloorPanel, material: &str) -> Result<PanelSizing, PanelError> {
        let properties = self.material(material)?;
        check_positive("width", panel.width)?;
        check_positive("length", panel.length)?;
        check_non_negative("water_height", panel.water_height)?;

        let panels = &self.config.panels;
        let allowable = properties.yield_strength / panels.safety_factor;
        let pressure = panels.water_unit_weight * panel.water_height;

        let long = panel.width.max(panel.length);
        let short = panel.width.min(panel.length);
        let ratio = long / short;
        check_positive("aspect_ratio", ratio)?;
        let max_ratio = panels.floor_beta.max_ratio().unwrap_or(0.0);
        let beta = panels
            .floor_beta
            .lookup(ratio)
            .ok_or(PanelError::UnsupportedAspectRatio { ratio, max_ratio })?;
        let alpha = panels
            .floor_alpha
            .lookup(ratio)
            .ok_or(PanelError::UnsupportedAspectRatio { ratio, max_ratio })?;

        let yield_thickness = (beta * pressure * short.powi(2) / allowable).sqrt();
        let deflection_limit = panels.floor_deflection_ratio * long;
        let deflection_thickness = (alpha * pressure * short.powi(4)
            / (properties.elastic_modulus * deflection_limit))
            .cbrt();
        debug!(
            material,
            pressure, ratio, beta, alpha, yield_thickness, deflection_thickness, "sized floor panel"
        );
        sizing(
            material,
            properties,
            pressure,
            ratio,
            yield_thickness,
            Some(deflection_thickness),
        )
    }

    /// Look up a configured material.
    fn material(&self, name: &str) -> Result<&'a Material, PanelError> {
        self.config
            .material(name)
            .ok_or_else(|| PanelError::UnknownMaterial(name.to_string()))
    }
}

/// Assemble the sizing record and round up to a gauge.
///
/// Fails when the plate formulas overflowed to a non-finite thickness.
fn sizing(
    material: &str,
    properties: &Material,
    governing_pressure: f64,
    aspect_ratio: f64,
    yield_thickness: f64,
    deflection_thickness: Option<f64>,
) -> Result<PanelSizing, PanelError> {
    let required_thickness = deflection_thickness.map_or(yield_thickness, |deflection| {
        yield_thickness.max(deflection)
    });
    if !yield_thickness.is_finite() || !required_thickness.is_finite() {
        return Err(PanelError::InvalidDimensions {
            field: "required_thickness",
            value: required_thickness,
        });
    }
    Ok(PanelSizing {
        material: material.to_string(),
        governing_pressure,
        aspect_ratio,
        yield_thickness,
        deflection_thickness,
        required_thickness,
        gauge: properties.gauges.select(required_thickness),
        max_thickness: properties.gauges.max_thickness().unwrap_or(0.0),
    })
}

/// Reject a value that is not a finite positive number.
fn check_positive(field: &'static str, value: f64) -> Result<(), PanelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PanelError::InvalidDimensions { field, value })
    }
}

/// Reject a value that is not a finite non-negative number.
fn check_non_negative(field: &'static str, value: f64) -> Result<(), PanelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PanelError::InvalidDimensions { field, value })
    }
}
