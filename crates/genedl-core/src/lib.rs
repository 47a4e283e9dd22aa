//! genedl core - GenICam feature trees to EDM panel layouts
//!
//! This crate provides the generation pipeline:
//! - GenICam XML reading into a feature tree
//! - Record name allocation with length bound and collision handling
//! - Flattening of the category graph into bounded-size sections
//! - Column-wrapping layout of sections and feature rows

pub mod feature;
pub mod genicam;
pub mod ident;
pub mod layout;
pub mod pipeline;
pub mod section;
pub mod warning;

pub use feature::{AccessMode, FeatureKind, FeatureNode, FeatureTree, NodeId};
pub use genicam::{GenicamDocument, GenicamError};
pub use ident::{IdentifierAllocator, IdentifierConfig, IdentifierTable};
pub use layout::{
    FeatureGeometry, Geometry, LayoutConfig, LayoutEngine, SectionGeometry, WidgetKind,
};
pub use pipeline::{PipelineConfig, PipelineError, PipelineOutput};
pub use section::{Flattener, Section, StructuralError};
pub use warning::Warning;
