//! End-to-end generation: record names, sections, layout

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::feature::FeatureTree;
use crate::genicam::{GenicamDocument, GenicamError};
use crate::ident::{IdentifierAllocator, IdentifierConfig, IdentifierTable};
use crate::layout::{self, Geometry, LayoutConfig};
use crate::section::{self, Section, StructuralError, DEFAULT_MAX_SECTION_FEATURES};
use crate::warning::Warning;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Genicam(#[from] GenicamError),
    #[error(transparent)]
    Structure(#[from] StructuralError),
}

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub identifiers: IdentifierConfig,
    #[serde(default = "default_max_section_features")]
    pub max_section_features: usize,
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            identifiers: IdentifierConfig::default(),
            max_section_features: default_max_section_features(),
            layout: LayoutConfig::default(),
        }
    }
}

fn default_max_section_features() -> usize {
    DEFAULT_MAX_SECTION_FEATURES
}

/// Everything a renderer needs to draw the feature screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub identifiers: IdentifierTable,
    pub sections: Vec<Section>,
    pub geometry: Geometry,
    pub warnings: Vec<Warning>,
}

/// Run all stages over an already parsed tree
pub fn run(tree: &FeatureTree, config: &PipelineConfig) -> Result<PipelineOutput, StructuralError> {
    let mut allocator = IdentifierAllocator::new(config.identifiers.clone());
    for (_, name) in tree.named() {
        allocator.allocate(name);
    }
    let identifiers = allocator.finish();

    let sections = section::flatten(tree, config.max_section_features)?;
    let (geometry, warnings) = layout::layout(tree, &sections, config.layout.clone());

    info!(
        records = identifiers.len(),
        sections = sections.len(),
        columns = geometry.columns,
        "Generated panel layout"
    );

    Ok(PipelineOutput {
        identifiers,
        sections,
        geometry,
        warnings,
    })
}

/// Parse a GenICam document and run all stages, keeping reader warnings
pub fn run_document(
    xml: &str,
    config: &PipelineConfig,
) -> Result<(FeatureTree, PipelineOutput), PipelineError> {
    let GenicamDocument { tree, mut warnings } = GenicamDocument::from_xml(xml)?;
    let mut output = run(&tree, config)?;
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    Ok((tree, output))
}
