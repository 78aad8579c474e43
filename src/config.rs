//! Read-only configuration tables shared by every evaluation.
//!
//! All lookups that the frame checker and the panel selector need (material
//! properties, gauge thicknesses, plate coefficients, wind ratings, channel
//! dimensions and analysis factors) live in one [`DesignConfig`]. It is built
//! once, either from the built-in defaults or from JSON, and passed by
//! reference into every function. Nothing here is mutated after construction.
//!
//! Units are inches, pounds-force and psi throughout.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::panel::CoefficientTable;
use crate::profile::ChannelCatalog;

/// Identifier of the stainless steel sheet material.
pub const STAINLESS: &str = "SST-M3";
/// Identifier of the galvanized steel sheet material.
pub const GALVANIZED: &str = "GLV-M5";

/// LRFD resistance factors for each member limit state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResistanceFactors {
    /// Factor applied to yield strength for axial stress.
    pub axial: f64,
    /// Factor applied to the shear yield (0.6 Fy).
    pub shear: f64,
    /// Factor applied to yield strength for bending stress.
    pub bending: f64,
    /// Factor applied to the Euler buckling capacity.
    pub buckling: f64,
}

impl Default for ResistanceFactors {
    fn default() -> Self {
        Self {
            axial: 0.9,
            shear: 0.9,
            bending: 0.9,
            buckling: 0.9,
        }
    }
}

/// A standard sheet gauge and its nominal thickness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaugeEntry {
    /// Gauge number; larger numbers are thinner.
    pub gauge: u8,
    /// Nominal thickness in inches.
    pub thickness: f64,
}

/// Gauge table for one material, ordered by ascending thickness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GaugeTable {
    /// Entries sorted by thickness.
    entries: Vec<GaugeEntry>,
}

impl GaugeTable {
    /// Build a table from `(thickness, gauge)` pairs in any order.
    #[must_use]
    pub fn new(pairs: &[(f64, u8)]) -> Self {
        let mut entries: Vec<GaugeEntry> = pairs
            .iter()
            .map(|&(thickness, gauge)| GaugeEntry { gauge, thickness })
            .collect();
        entries.sort_by(|a, b| a.thickness.total_cmp(&b.thickness));
        Self { entries }
    }

    /// Entries ordered from thinnest to thickest.
    #[must_use]
    pub fn entries(&self) -> &[GaugeEntry] {
        &self.entries
    }

    /// Thickness of a gauge, when tabulated.
    #[must_use]
    pub fn thickness_of(&self, gauge: u8) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.gauge == gauge)
            .map(|entry| entry.thickness)
    }

    /// Thickest tabulated sheet.
    #[must_use]
    pub fn max_thickness(&self) -> Option<f64> {
        self.entries.last().map(|entry| entry.thickness)
    }

    /// Thinnest gauge whose thickness is at least `required`.
    ///
    /// # Examples
    /// ```
    /// use framecheck::GaugeTable;
    ///
    /// let table = GaugeTable::new(&[(0.059, 16), (0.047, 18), (0.075, 14)]);
    /// assert_eq!(table.select(0.050).map(|entry| entry.gauge), Some(16));
    /// assert_eq!(table.select(0.059).map(|entry| entry.gauge), Some(16));
    /// assert!(table.select(0.080).is_none());
    /// ```
    #[must_use]
    pub fn select(&self, required: f64) -> Option<GaugeEntry> {
        self.entries
            .iter()
            .copied()
            .find(|entry| entry.thickness >= required)
    }

    /// Non-empty with positive, strictly increasing thicknesses.
    fn is_valid(&self) -> bool {
        !self.entries.is_empty()
            && self.entries.iter().all(|entry| entry.thickness > 0.0)
            && self
                .entries
                .windows(2)
                .all(|pair| pair[0].thickness < pair[1].thickness)
    }
}

/// Mechanical properties and gauge table of one sheet material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Yield strength in psi.
    pub yield_strength: f64,
    /// Young's modulus in psi.
    pub elastic_modulus: f64,
    /// Resistance factors used by the frame limit states.
    #[serde(default)]
    pub resistance: ResistanceFactors,
    /// Standard gauges available for the material.
    pub gauges: GaugeTable,
}

/// Wind exposure category of the installation site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindZone {
    /// Non-tropical cyclone region.
    #[serde(rename = "NTC")]
    NonTropicalCyclone,
    /// Tropical cyclone region.
    #[serde(rename = "TC")]
    TropicalCyclone,
    /// Tropical cyclone region with missile impact requirements.
    #[serde(rename = "TCM")]
    TropicalCycloneMissile,
}

impl FromStr for WindZone {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NTC" => Ok(Self::NonTropicalCyclone),
            "TC" => Ok(Self::TropicalCyclone),
            "TCM" => Ok(Self::TropicalCycloneMissile),
            other => Err(format!("unknown wind zone `{other}`")),
        }
    }
}

/// Minimum wind pressure rating per zone, in psf.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindRatings {
    /// Non-tropical cyclone rating.
    pub ntc: f64,
    /// Tropical cyclone rating.
    pub tc: f64,
    /// Tropical cyclone missile rating.
    pub tcm: f64,
}

impl WindRatings {
    /// Rating for a zone in psf.
    #[must_use]
    pub fn rating(&self, zone: WindZone) -> f64 {
        match zone {
            WindZone::NonTropicalCyclone => self.ntc,
            WindZone::TropicalCyclone => self.tc,
            WindZone::TropicalCycloneMissile => self.tcm,
        }
    }
}

impl Default for WindRatings {
    fn default() -> Self {
        Self {
            ntc: 40.0,
            tc: 45.0,
            tcm: 60.0,
        }
    }
}

/// What the wall sizing does with an aspect ratio beyond its coefficient table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectOverflow {
    /// Reject the panel with `UnsupportedAspectRatio`.
    #[default]
    Reject,
    /// Use the coefficient of the largest tabulated ratio.
    Clamp,
}

/// Plate-bending inputs for wall and floor panel sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Safety factor dividing the yield strength.
    pub safety_factor: f64,
    /// Unit weight of water in lbf/in^3.
    pub water_unit_weight: f64,
    /// Multiplier applied to the wind pressure rating.
    pub wind_factor: f64,
    /// Wind pressure ratings per zone.
    pub wind_ratings: WindRatings,
    /// Yield coefficient for walls keyed by width / height.
    pub wall_beta: CoefficientTable,
    /// Yield coefficient for floors keyed by long / short span.
    pub floor_beta: CoefficientTable,
    /// Deflection coefficient for floors keyed by long / short span.
    pub floor_alpha: CoefficientTable,
    /// Allowed floor deflection as a fraction of the long span.
    ///
    /// The default of 1/276 allows 0.5 in over the 138 in reference floor.
    pub floor_deflection_ratio: f64,
    /// Handling of wall aspect ratios beyond `wall_beta`.
    pub wall_aspect_overflow: AspectOverflow,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            safety_factor: 1.5,
            water_unit_weight: 0.03603,
            wind_factor: 1.15,
            wind_ratings: WindRatings::default(),
            wall_beta: CoefficientTable::new(&[
                (0.25, 0.037),
                (0.50, 0.120),
                (0.75, 0.212),
                (1.0, 0.321),
                (1.5, 0.523),
                (2.0, 0.677),
                (3.0, 0.866),
            ]),
            floor_beta: CoefficientTable::new(&[
                (1.0, 0.3078),
                (1.2, 0.3834),
                (1.4, 0.4356),
                (1.6, 0.4680),
                (1.8, 0.4872),
                (2.0, 0.4974),
                (3.0, 0.5000),
            ]),
            floor_alpha: CoefficientTable::new(&[
                (1.0, 0.0138),
                (1.2, 0.0188),
                (1.4, 0.0226),
                (1.6, 0.0251),
                (1.8, 0.0267),
                (2.0, 0.0277),
                (3.0, 0.0284),
            ]),
            floor_deflection_ratio: 1.0 / 276.0,
            wall_aspect_overflow: AspectOverflow::Reject,
        }
    }
}

/// Factors used by the frame analysis and its limit states.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Effective length factor K for Euler buckling (1.0 is pinned-pinned).
    pub effective_length_factor: f64,
    /// Load factor applied to the line load before assembly.
    pub load_factor: f64,
    /// Allowed displacement as a fraction of member length.
    pub deflection_limit_ratio: f64,
    /// Smallest acceptable ratio between the smallest and largest LU pivot.
    pub singularity_tolerance: f64,
    /// Largest acceptable relative residual of the solved system.
    pub residual_tolerance: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            effective_length_factor: 1.0,
            load_factor: 1.5,
            deflection_limit_ratio: 1.0 / 360.0,
            singularity_tolerance: 1.0e-12,
            residual_tolerance: 1.0e-6,
        }
    }
}

/// Complete set of tables consumed by the structural checks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Sheet materials keyed by identifier.
    pub materials: BTreeMap<String, Material>,
    /// Outer dimensions of every channel shape.
    pub channels: ChannelCatalog,
    /// Panel sizing inputs.
    pub panels: PanelConfig,
    /// Frame analysis factors.
    pub frame: FrameConfig,
}

impl Default for DesignConfig {
    fn default() -> Self {
        let mut materials = BTreeMap::new();
        materials.insert(
            STAINLESS.to_string(),
            Material {
                yield_strength: 35_000.0,
                elastic_modulus: 28_000_000.0,
                resistance: ResistanceFactors::default(),
                gauges: GaugeTable::new(&[
                    (0.047, 18),
                    (0.059, 16),
                    (0.075, 14),
                    (0.101, 12),
                    (0.128, 10),
                    (0.158, 8),
                ]),
            },
        );
        materials.insert(
            GALVANIZED.to_string(),
            Material {
                yield_strength: 33_000.0,
                elastic_modulus: 29_500_000.0,
                resistance: ResistanceFactors::default(),
                gauges: GaugeTable::new(&[
                    (0.042, 18),
                    (0.053, 16),
                    (0.066, 14),
                    (0.096, 12),
                    (0.129, 10),
                    (0.157, 8),
                ]),
            },
        );
        Self {
            materials,
            channels: ChannelCatalog::default(),
            panels: PanelConfig::default(),
            frame: FrameConfig::default(),
        }
    }
}

impl DesignConfig {
    /// Look up a material by identifier.
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Parse a configuration from JSON. Missing sections fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a table is empty or unordered.
    ///
    /// # Examples
    /// ```
    /// use framecheck::DesignConfig;
    ///
    /// let config = DesignConfig::from_json_str(r#"{ "frame": { "load_factor": 1.0 } }"#)
    ///     .expect("valid configuration");
    /// assert_eq!(config.frame.load_factor, 1.0);
    /// assert!(config.material("SST-M3").is_some());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// errors of [`DesignConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every table can be searched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, material) in &self.materials {
            if !material.gauges.is_valid() {
                return Err(ConfigError::Invalid(format!("materials.{name}.gauges")));
            }
            if material.yield_strength <= 0.0 || material.elastic_modulus <= 0.0 {
                return Err(ConfigError::Invalid(format!("materials.{name}")));
            }
        }
        let tables = [
            ("panels.wall_beta", &self.panels.wall_beta),
            ("panels.floor_beta", &self.panels.floor_beta),
            ("panels.floor_alpha", &self.panels.floor_alpha),
        ];
        for (name, table) in tables {
            if !table.is_valid() {
                return Err(ConfigError::Invalid(name.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_valid() {
        DesignConfig::default()
            .validate()
            .expect("built-in tables validate");
    }

    #[test]
    fn gauge_tables_sort_by_thickness() {
        let config = DesignConfig::default();
        let gauges = &config.material(GALVANIZED).expect("galvanized").gauges;
        let numbers: Vec<u8> = gauges.entries().iter().map(|entry| entry.gauge).collect();
        assert_eq!(numbers, vec![18, 16, 14, 12, 10, 8]);
        assert_eq!(gauges.thickness_of(12), Some(0.096));
        assert_eq!(gauges.thickness_of(20), None);
        assert_eq!(gauges.max_thickness(), Some(0.157));
    }

    #[test]
    fn configuration_roundtrips_through_json() {
        let config = DesignConfig::default();
        let json = serde_json::to_string(&config).expect("serializes");
        let parsed = DesignConfig::from_json_str(&json).expect("parses");
        assert_eq!(parsed, config);
    }

    #[test]
    fn unordered_gauge_table_is_rejected() {
        let json = r#"{ "materials": { "X": {
            "yield_strength": 1.0, "elastic_modulus": 1.0,
            "gauges": [ { "gauge": 10, "thickness": 0.2 }, { "gauge": 12, "thickness": 0.1 } ]
        } } }"#;
        let error = DesignConfig::from_json_str(json).expect_err("unordered table rejected");
        assert!(matches!(error, ConfigError::Invalid(name) if name == "materials.X.gauges"));
    }

    #[test]
    fn wind_zones_parse_case_insensitively() {
        assert_eq!("tc".parse::<WindZone>(), Ok(WindZone::TropicalCyclone));
        assert_eq!(
            WindRatings::default().rating(WindZone::TropicalCycloneMissile),
            60.0
        );
        assert!("storm".parse::<WindZone>().is_err());
    }
}
