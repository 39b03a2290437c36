//! Lowering phase: ConnectorDefinition → TemplateDescriptor.
//!
//! Walks the input type (resolving unions on the way), groups the resulting
//! properties, resolves their bindings and assembles the descriptor.

pub mod assemble;
pub mod binding;
pub mod discriminator;
pub mod grouping;
pub mod label;
pub mod walker;

use crate::error::{GenerationWarning, GeneratorError};
use crate::ir::types::TemplateDescriptor;
use crate::parse::types::ConnectorDefinition;

/// Lower a validated definition into a descriptor plus grouping warnings.
pub fn lower(
    definition: &ConnectorDefinition,
) -> Result<(TemplateDescriptor, Vec<GenerationWarning>), Vec<GeneratorError>> {
    // 1. Walk the input type
    let walked = walker::walk(definition)?;

    // 2. Partition into groups
    let mut grouped = grouping::group_properties(&definition.property_groups, walked.properties);
    let warnings = std::mem::take(&mut grouped.warnings);

    // 3. Resolve bindings
    binding::resolve_bindings(&mut grouped)?;

    // 4. Assemble + final consistency pass
    let template = assemble::assemble(&definition.template, grouped, walked.discriminators)?;

    tracing::debug!(
        template = %template.id,
        groups = template.groups.len(),
        properties = template.properties().count(),
        "lowering complete"
    );

    Ok((template, warnings))
}
