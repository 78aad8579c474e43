#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod assembly;
pub mod bracing;
pub mod conditions;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod limit_state;
pub mod panel;
pub mod profile;
pub mod report;
pub mod solver;
pub mod topology;

pub use analysis::{
    FrameCandidate, FrameStructuralChecker, FrameVerdict, NodeDisplacement, NodeReaction,
};
pub use bracing::BracingPlan;
pub use conditions::LineLoad;
pub use config::{
    AspectOverflow, DesignConfig, FrameConfig, GaugeEntry, GaugeTable, Material, PanelConfig,
    ResistanceFactors, WindRatings, WindZone, GALVANIZED, STAINLESS,
};
pub use errors::{AnalysisError, ConfigError, PanelError, ProfileError, TopologyError};
pub use geometry::{point, Displacement, Point};
pub use limit_state::{simple_span_bending_stress, LimitFlags, MemberForceRecord};
pub use panel::{CoefficientTable, FloorPanel, PanelSizing, PanelThicknessSelector, WallPanel};
pub use profile::{
    section_properties, ChannelCatalog, ChannelDimensions, ChannelShape, CrossSectionProfile,
    SectionProperties,
};
pub use report::{render_panel_sizing, render_verdict};
pub use topology::{Bay, FrameTopology, Member, Node, NodeId};
