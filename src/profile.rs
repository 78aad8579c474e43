//! Section properties of the formed channel shapes used as frame members.
//!
//! Each shape is bent from a flat strip of one sheet gauge. Properties are
//! computed about the strong axis from the outer dimensions and the sheet
//! thickness, treating the section as an outer box minus its hollow parts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{DesignConfig, ResistanceFactors};
use crate::errors::ProfileError;

/// Closed set of channel shapes with a section formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChannelShape {
    /// Open C channel.
    C,
    /// Closed rectangular tube.
    Rectangular,
    /// Hat section with two outstanding flanges.
    Hat,
    /// Two C channels back to back.
    DoubleC,
}

impl ChannelShape {
    /// Every supported shape.
    pub const ALL: [ChannelShape; 4] = [
        ChannelShape::C,
        ChannelShape::Rectangular,
        ChannelShape::Hat,
        ChannelShape::DoubleC,
    ];

    /// Number of distinct bends needed to form the shape.
    #[must_use]
    pub const fn unique_bends(self) -> u8 {
        match self {
            ChannelShape::C => 2,
            ChannelShape::Rectangular => 3,
            ChannelShape::Hat | ChannelShape::DoubleC => 4,
        }
    }
}

impl FromStr for ChannelShape {
    type Err = ProfileError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "C" => Ok(ChannelShape::C),
            "Rectangular" => Ok(ChannelShape::Rectangular),
            "Hat" => Ok(ChannelShape::Hat),
            "DoubleC" | "Double C" => Ok(ChannelShape::DoubleC),
            other => Err(ProfileError::UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for ChannelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelShape::C => "C",
            ChannelShape::Rectangular => "Rectangular",
            ChannelShape::Hat => "Hat",
            ChannelShape::DoubleC => "Double C",
        };
        f.write_str(name)
    }
}

/// Outer dimensions of a channel in inches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelDimensions {
    /// Overall depth.
    pub h: f64,
    /// Overall width.
    pub b: f64,
    /// Flange or lip length.
    pub f: f64,
}

/// Dimensions of every channel shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCatalog {
    /// C channel dimensions.
    pub c: ChannelDimensions,
    /// Rectangular tube dimensions.
    pub rectangular: ChannelDimensions,
    /// Hat section dimensions.
    pub hat: ChannelDimensions,
    /// Double C dimensions.
    pub double_c: ChannelDimensions,
}

impl ChannelCatalog {
    /// Dimensions for `shape`.
    #[must_use]
    pub fn dimensions(&self, shape: ChannelShape) -> ChannelDimensions {
        match shape {
            ChannelShape::C => self.c,
            ChannelShape::Rectangular => self.rectangular,
            ChannelShape::Hat => self.hat,
            ChannelShape::DoubleC => self.double_c,
        }
    }
}

impl Default for ChannelCatalog {
    fn default() -> Self {
        Self {
            c: ChannelDimensions {
                h: 3.6875,
                b: 3.0,
                f: 0.0,
            },
            rectangular: ChannelDimensions {
                h: 4.0,
                b: 3.25,
                f: 0.0,
            },
            hat: ChannelDimensions {
                h: 4.0,
                b: 3.5,
                f: 1.25,
            },
            double_c: ChannelDimensions {
                h: 4.0,
                b: 3.25,
                f: 0.75,
            },
        }
    }
}

/// Geometric properties of a section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Cross-sectional area in in^2.
    pub area: f64,
    /// Second moment of area in in^4.
    pub moment_of_inertia: f64,
    /// Distance from the neutral axis to the extreme fibre in inches.
    pub extreme_fiber: f64,
    /// Developed flat width of the strip in inches.
    pub developed_width: f64,
}

/// Compute section properties for a shape of thickness `t`.
///
/// # Examples
/// ```
/// use framecheck::{section_properties, ChannelDimensions, ChannelShape};
///
/// let dims = ChannelDimensions { h: 4.0, b: 2.0, f: 0.0 };
/// let props = section_properties(ChannelShape::Rectangular, dims, 0.1);
/// assert!((props.area - (8.0 - 1.8 * 3.8)).abs() < 1.0e-12);
/// assert_eq!(props.developed_width, 12.0);
/// ```
#[must_use]
pub fn section_properties(
    shape: ChannelShape,
    dims: ChannelDimensions,
    t: f64,
) -> SectionProperties {
    let ChannelDimensions { h, b, f } = dims;
    let outer = b * h.powi(3) / 12.0;
    let (moment_of_inertia, area, extreme_fiber) = match shape {
        ChannelShape::C => (
            outer - (b - t) * (h - 2.0 * t).powi(3) / 12.0,
            b * h - (b - t) * (h - 2.0 * t),
            h / 2.0,
        ),
        ChannelShape::Rectangular => (
            outer - (b - 2.0 * t) * (h - 2.0 * t).powi(3) / 12.0,
            b * h - (b - 2.0 * t) * (h - 2.0 * t),
            h / 2.0,
        ),
        ChannelShape::Hat => {
            let depth = h + 2.0 * f - 2.0 * t;
            let web = (b - t) * (h - 2.0 * t).powi(3) / 12.0;
            let lip = f - t;
            let flange =
                (b - t) * lip.powi(3) / 12.0 + (b - t) * lip * (h / 2.0 + lip / 2.0).powi(2);
            (
                b * depth.powi(3) / 12.0 - web - 2.0 * flange,
                b * depth - (b - t) * (h - 2.0 * t) - 2.0 * (b - t) * lip,
                h / 2.0 + lip,
            )
        }
        ChannelShape::DoubleC => (
            outer
                - (b - 2.0 * t) * (h - 2.0 * t).powi(3) / 12.0
                - t * (h - 2.0 * f).powi(3) / 12.0,
            b * h - (b - 2.0 * t) * (h - 2.0 * t) - t * (h - 2.0 * f),
            h / 2.0,
        ),
    };
    let developed_width = match shape {
        ChannelShape::Rectangular => 2.0 * (b + h),
        ChannelShape::C | ChannelShape::Hat | ChannelShape::DoubleC => 2.0 * (f + b) + h,
    };
    SectionProperties {
        area,
        moment_of_inertia,
        extreme_fiber,
        developed_width,
    }
}

/// A channel of one material, gauge and shape with its derived properties.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrossSectionProfile {
    /// Material name.
    material: String,
    /// Gauge number.
    gauge: u8,
    /// Channel shape.
    shape: ChannelShape,
    /// Sheet thickness in inches.
    thickness: f64,
    /// Area, inertia and extreme fibre.
    section: SectionProperties,
    /// Fy in psi.
    yield_strength: f64,
    /// E in psi.
    elastic_modulus: f64,
    /// Resistance factors of the material.
    resistance: ResistanceFactors,
}

impl CrossSectionProfile {
    /// Resolve a profile against the configuration tables.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::UnknownMaterial`] when the material is not
    /// configured and [`ProfileError::UnknownGauge`] when the gauge is not
    /// tabulated for it.
    ///
    /// # Examples
    /// ```
    /// use framecheck::{ChannelShape, CrossSectionProfile, DesignConfig, STAINLESS};
    ///
    /// let config = DesignConfig::default();
    /// let channel = CrossSectionProfile::new(&config, STAINLESS, 12, ChannelShape::C)
    ///     .expect("tabulated gauge");
    /// assert_eq!(channel.thickness(), 0.101);
    /// assert_eq!(channel.unique_bends(), 2);
    /// ```
    pub fn new(
        config: &DesignConfig,
        material: &str,
        gauge: u8,
        shape: ChannelShape,
    ) -> Result<Self, ProfileError> {
        let properties = config
            .material(material)
            .ok_or_else(|| ProfileError::UnknownMaterial(material.to_string()))?;
        let thickness =
            properties
                .gauges
                .thickness_of(gauge)
                .ok_or_else(|| ProfileError::UnknownGauge {
                    material: material.to_string(),
                    gauge,
                })?;
        let section = section_properties(shape, config.channels.dimensions(shape), thickness);
        Ok(Self {
            material: material.to_string(),
            gauge,
            shape,
            thickness,
            section,
            yield_strength: properties.yield_strength,
            elastic_modulus: properties.elastic_modulus,
            resistance: properties.resistance,
        })
    }

    /// Like [`CrossSectionProfile::new`] with the shape given by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::UnknownProfile`] for unsupported shape names in
    /// addition to the errors of [`CrossSectionProfile::new`].
    pub fn from_names(
        config: &DesignConfig,
        material: &str,
        gauge: u8,
        shape: &str,
    ) -> Result<Self, ProfileError> {
        Self::new(config, material, gauge, shape.parse()?)
    }

    /// Material identifier.
    #[must_use]
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Gauge number.
    #[must_use]
    pub fn gauge(&self) -> u8 {
        self.gauge
    }

    /// Channel shape.
    #[must_use]
    pub fn shape(&self) -> ChannelShape {
        self.shape
    }

    /// Sheet thickness in inches.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Geometric section properties.
    #[must_use]
    pub fn section(&self) -> SectionProperties {
        self.section
    }

    /// Cross-sectional area in in^2.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.section.area
    }

    /// Second moment of area in in^4.
    #[must_use]
    pub fn moment_of_inertia(&self) -> f64 {
        self.section.moment_of_inertia
    }

    /// Extreme fibre distance in inches.
    #[must_use]
    pub fn extreme_fiber(&self) -> f64 {
        self.section.extreme_fiber
    }

    /// Developed flat width, also the perimeter of the formed shape.
    #[must_use]
    pub fn developed_width(&self) -> f64 {
        self.section.developed_width
    }

    /// Number of distinct bends.
    #[must_use]
    pub fn unique_bends(&self) -> u8 {
        self.shape.unique_bends()
    }

    /// Yield strength in psi.
    #[must_use]
    pub fn yield_strength(&self) -> f64 {
        self.yield_strength
    }

    /// Young's modulus in psi.
    #[must_use]
    pub fn elastic_modulus(&self) -> f64 {
        self.elastic_modulus
    }

    /// Limit state resistance factors of the material.
    #[must_use]
    pub fn resistance(&self) -> ResistanceFactors {
        self.resistance
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::{GALVANIZED, STAINLESS};

    const DIMS: ChannelDimensions = ChannelDimensions {
        h: 4.0,
        b: 3.0,
        f: 1.0,
    };

    #[test]
    fn c_channel_matches_hand_calculation() {
        let t = 0.1;
        let props = section_properties(ChannelShape::C, DIMS, t);
        let expected_i = 3.0 * 64.0 / 12.0 - 2.9 * 3.8_f64.powi(3) / 12.0;
        assert_relative_eq!(props.moment_of_inertia, expected_i, epsilon = 1.0e-12);
        assert_relative_eq!(props.area, 12.0 - 2.9 * 3.8, epsilon = 1.0e-12);
        assert_relative_eq!(props.extreme_fiber, 2.0);
        assert_relative_eq!(props.developed_width, 2.0 * (1.0 + 3.0) + 4.0);
    }

    #[test]
    fn hat_extreme_fiber_includes_flange() {
        let t = 0.1;
        let props = section_properties(ChannelShape::Hat, DIMS, t);
        assert_relative_eq!(props.extreme_fiber, 2.0 + 0.9, epsilon = 1.0e-12);
        let depth = 4.0 + 2.0 - 0.2;
        let expected_area = 3.0 * depth - 2.9 * 3.8 - 2.0 * 2.9 * 0.9;
        assert_relative_eq!(props.area, expected_area, epsilon = 1.0e-12);
    }

    #[test]
    fn double_c_subtracts_central_rib() {
        let t = 0.1;
        let props = section_properties(ChannelShape::DoubleC, DIMS, t);
        let rect = section_properties(ChannelShape::Rectangular, DIMS, t);
        assert_relative_eq!(props.area, rect.area - t * 2.0, epsilon = 1.0e-12);
        assert_relative_eq!(
            props.moment_of_inertia,
            rect.moment_of_inertia - t * 8.0 / 12.0,
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn thicker_gauges_are_stiffer() {
        let config = DesignConfig::default();
        for shape in ChannelShape::ALL {
            let thin = CrossSectionProfile::new(&config, GALVANIZED, 18, shape).expect("18 ga");
            let thick = CrossSectionProfile::new(&config, GALVANIZED, 10, shape).expect("10 ga");
            assert!(thick.area() > thin.area(), "{shape}");
            assert!(thick.moment_of_inertia() > thin.moment_of_inertia(), "{shape}");
            assert!(thin.area() > 0.0 && thin.moment_of_inertia() > 0.0, "{shape}");
        }
    }

    #[test]
    fn unknown_inputs_are_rejected() {
        let config = DesignConfig::default();
        assert_eq!(
            CrossSectionProfile::from_names(&config, STAINLESS, 12, "I"),
            Err(ProfileError::UnknownProfile("I".to_string()))
        );
        assert_eq!(
            CrossSectionProfile::new(&config, "AL-6061", 12, ChannelShape::C),
            Err(ProfileError::UnknownMaterial("AL-6061".to_string()))
        );
        assert_eq!(
            CrossSectionProfile::new(&config, STAINLESS, 20, ChannelShape::C),
            Err(ProfileError::UnknownGauge {
                material: STAINLESS.to_string(),
                gauge: 20
            })
        );
    }

    #[test]
    fn shape_names_roundtrip() {
        for shape in ChannelShape::ALL {
            assert_eq!(shape.to_string().parse::<ChannelShape>(), Ok(shape));
        }
        assert_eq!("DoubleC".parse::<ChannelShape>(), Ok(ChannelShape::DoubleC));
    }
}
