//! Template assembly: metadata + groups + bindings → `TemplateDescriptor`.

use crate::error::GeneratorError;
use crate::ir::types::*;
use crate::ir::validate::validate_template;
use crate::parse::types::TemplateDeclaration;

use super::grouping::{DraftGroup, GroupedProperties};

/// Build the descriptor and run the final consistency pass over it.
/// Nothing is returned unless every check passes.
pub fn assemble(
    declaration: &TemplateDeclaration,
    grouped: GroupedProperties,
    discriminators: Vec<DiscriminatorSpec>,
) -> Result<TemplateDescriptor, Vec<GeneratorError>> {
    let template = TemplateDescriptor {
        id: declaration.id.clone(),
        name: declaration.name.clone(),
        version: declaration.version,
        description: non_empty(&declaration.description),
        documentation_ref: non_empty(&declaration.documentation_ref),
        task_type: declaration.task_type.trim().to_string(),
        applies_to: declaration.element_type.applies_to.clone(),
        element_type: declaration.element_type.element_type.clone(),
        groups: grouped.groups.into_iter().map(finish_group).collect(),
        ungrouped: grouped.ungrouped.into_iter().map(|d| d.property).collect(),
        discriminators,
    };

    validate_template(&template)?;
    Ok(template)
}

fn finish_group(group: DraftGroup) -> PropertyGroup {
    PropertyGroup {
        id: group.id,
        label: group.label,
        tooltip: group.tooltip,
        open_by_default: group.open_by_default,
        properties: group.properties.into_iter().map(|d| d.property).collect(),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
