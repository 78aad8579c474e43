//! Error types produced while building frames, sizing panels or analysing designs.

use thiserror::Error;

/// Error returned when a frame topology is malformed.
///
/// Every variant is reported to callers as an invalid topology; the outer design
/// search discards the candidate and moves on.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TopologyError {
    /// Returned when two nodes share an identifier.
    #[error("node {0} is defined more than once")]
    DuplicateNode(usize),
    /// Returned when two nodes occupy the same coordinates.
    #[error("nodes {first} and {second} share coordinates ({x}, {y})")]
    DuplicateCoordinates {
        /// Identifier of the node that claimed the position first.
        first: usize,
        /// Identifier of the node that repeated the position.
        second: usize,
        /// Shared X coordinate in inches.
        x: f64,
        /// Shared Y coordinate in inches.
        y: f64,
    },
    /// Returned when a member references a node that is not part of the frame.
    #[error("member ({start}, {end}) references unknown node {missing}")]
    UnknownNode {
        /// Start node of the offending member.
        start: usize,
        /// End node of the offending member.
        end: usize,
        /// The identifier that could not be resolved.
        missing: usize,
    },
    /// Returned when a member spans zero distance.
    #[error("member ({0}, {1}) has zero length")]
    ZeroLengthMember(usize, usize),
    /// Returned when generated frame dimensions are not physically meaningful.
    #[error("frame dimensions must be positive (span {span}, height {height})")]
    InvalidDimensions {
        /// Requested horizontal span in inches.
        span: f64,
        /// Requested height in inches.
        height: f64,
    },
    /// Returned when a node lies off the perimeter of the enclosing rectangle.
    #[error("node {node} at ({x}, {y}) is off the {span} x {height} perimeter")]
    OutOfBounds {
        /// Identifier of the offending node.
        node: usize,
        /// X coordinate in inches.
        x: f64,
        /// Y coordinate in inches.
        y: f64,
        /// Horizontal span of the rectangle in inches.
        span: f64,
        /// Height of the rectangle in inches.
        height: f64,
    },
}

/// Error returned when resolving a cross-section profile.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// Returned when the shape has no section formula.
    #[error("unsupported cross-section shape `{0}`")]
    UnknownProfile(String),
    /// Returned when the material is missing from the configuration.
    #[error("material `{0}` is not configured")]
    UnknownMaterial(String),
    /// Returned when the gauge is not tabulated for the material.
    #[error("gauge {gauge} is not tabulated for material `{material}`")]
    UnknownGauge {
        /// Material whose gauge table was searched.
        material: String,
        /// Requested gauge number.
        gauge: u8,
    },
}

/// Error returned when a frame analysis fails.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the nodes or members do not describe a valid frame.
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),
    /// Returned when the constrained stiffness matrix cannot be solved reliably.
    #[error("structure is unstable: {reason}")]
    UnstableStructure {
        /// Which stability check tripped.
        reason: String,
    },
    /// Returned when the member profile cannot be resolved.
    #[error(transparent)]
    Profile(#[from] ProfileError),
    /// Returned when the line load is not a finite number.
    #[error("line load {0} is not finite")]
    InvalidLoad(f64),
}

impl AnalysisError {
    /// Convenience constructor for [`AnalysisError::UnstableStructure`].
    pub(crate) fn unstable(reason: impl Into<String>) -> Self {
        Self::UnstableStructure {
            reason: reason.into(),
        }
    }
}

/// Error returned when sizing a wall or floor panel.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PanelError {
    /// Returned when a wall aspect ratio lies beyond the coefficient table.
    #[error("aspect ratio {ratio:.3} exceeds the largest tabulated ratio {max_ratio}")]
    UnsupportedAspectRatio {
        /// The requested aspect ratio.
        ratio: f64,
        /// Largest key of the coefficient table.
        max_ratio: f64,
    },
    /// Returned when no tabulated gauge is thick enough.
    #[error("required thickness {required:.4} in exceeds the thickest gauge ({max_thickness} in)")]
    ExceedsMaterialLimit {
        /// Required plate thickness in inches.
        required: f64,
        /// Thickest tabulated gauge in inches.
        max_thickness: f64,
    },
    /// Returned when the material is missing from the configuration.
    #[error("material `{0}` is not configured")]
    UnknownMaterial(String),
    /// Returned when a span or water height is not usable.
    #[error("invalid panel input `{field}` = {value}")]
    InvalidDimensions {
        /// Name of the rejected input.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Error returned when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the file cannot be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the file is not valid configuration JSON.
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// Returned when a table is empty or not strictly increasing.
    #[error("invalid configuration table `{0}`")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_errors_convert_into_analysis_errors() {
        let error: AnalysisError = TopologyError::ZeroLengthMember(1, 2).into();
        assert_eq!(
            error,
            AnalysisError::InvalidTopology(TopologyError::ZeroLengthMember(1, 2))
        );
        assert!(error.to_string().contains("zero length"));
    }

    #[test]
    fn profile_errors_are_transparent() {
        let error: AnalysisError = ProfileError::UnknownProfile("I".to_string()).into();
        assert_eq!(error.to_string(), "unsupported cross-section shape `I`");
    }

    #[test]
    fn out_of_bounds_names_the_node() {
        let error = TopologyError::OutOfBounds {
            node: 7,
            x: 91.0,
            y: 15.0,
            span: 90.0,
            height: 30.0,
        };
        assert_eq!(
            error.to_string(),
            "node 7 at (91, 15) is off the 90 x 30 perimeter"
        );
    }
}
