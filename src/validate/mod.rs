//! Declaration-level validation phase (pre-walk).
//!
//! Validates the connector definition and its type graph before lowering.

pub mod structural;

use crate::error::{GenerationWarning, GeneratorError};
use crate::parse::graph::TypeGraph;
use crate::parse::types::ConnectorDefinition;

/// Errors and warnings found before the walk.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<GeneratorError>,
    pub warnings: Vec<GenerationWarning>,
}

/// Validate the definition (group declarations + type graph).
pub fn validate_definition(definition: &ConnectorDefinition, graph: &TypeGraph) -> ValidationReport {
    let errors = structural::validate_structural(definition, graph);
    let warnings = structural::w003_unreachable_types(graph);

    for warning in &warnings {
        tracing::warn!(code = warning.code(), "{}", warning);
    }
    tracing::debug!(errors = errors.len(), warnings = warnings.len(), "validation complete");

    ValidationReport { errors, warnings }
}
