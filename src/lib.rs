//! Element template generator: connector input declarations → modeler
//! element templates.
//!
//! Pipeline: parse → validate → lower (walk, group, bind, assemble) →
//! IR validate → codegen. Nothing here performs I/O.

pub mod codegen;
pub mod error;
pub mod ir;
pub mod lower;
pub mod parse;
pub mod validate;
pub mod wasm;

use crate::error::{GenerationWarning, GeneratorError};
use crate::ir::types::TemplateDescriptor;
use crate::parse::graph::TypeGraph;
use crate::parse::types::ConnectorDefinition;

/// A successfully generated descriptor and the warnings recovered on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub template: TemplateDescriptor,
    pub warnings: Vec<GenerationWarning>,
}

/// Generate a template descriptor from a connector definition.
pub fn generate(definition: &ConnectorDefinition) -> Result<Generated, Vec<GeneratorError>> {
    // 1. Type graph
    let graph = TypeGraph::build(definition)?;

    // 2. Declaration-level validation
    let report = validate::validate_definition(definition, &graph);
    if !report.errors.is_empty() {
        return Err(report.errors);
    }

    // 3. Lower (ends with the IR consistency pass)
    let (template, lower_warnings) = lower::lower(definition)?;

    let mut warnings = report.warnings;
    warnings.extend(lower_warnings);

    Ok(Generated { template, warnings })
}

/// Parse a connector definition JSON and generate from it.
pub fn generate_from_json(json: &str) -> Result<Generated, Vec<GeneratorError>> {
    let definition = parse::parse(json)?;
    generate(&definition)
}
