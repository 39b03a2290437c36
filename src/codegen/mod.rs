//! Codegen pass: TemplateDescriptor → element-template JSON document.
//!
//! Public API: `codegen(template) -> ElementTemplate`, `to_json(&ElementTemplate)`

mod properties;
mod value;

use serde::Serialize;

use crate::error::GeneratorError;
use crate::ir::types::{PropertyGroup, TemplateDescriptor};

pub use properties::{TemplateBinding, TemplateCondition, TemplateProperty};
pub use value::TemplateValue;

pub const SCHEMA_URL: &str =
    "https://unpkg.com/@camunda/zeebe-element-templates-json-schema/resources/schema.json";

/// The element template as the modeler reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTemplate {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub name: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_ref: Option<String>,
    pub version: u32,
    pub applies_to: Vec<String>,
    pub element_type: ElementType,
    pub groups: Vec<TemplateGroup>,
    /// The task definition, grouped properties in group order, then
    /// ungrouped ones.
    pub properties: Vec<TemplateProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementType {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateGroup {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_by_default: Option<bool>,
}

impl From<&PropertyGroup> for TemplateGroup {
    fn from(group: &PropertyGroup) -> Self {
        TemplateGroup {
            id: group.id.clone(),
            label: group.label.clone(),
            tooltip: group.tooltip.clone(),
            open_by_default: group.open_by_default,
        }
    }
}

/// Map a validated descriptor onto the element-template shape.
pub fn codegen(template: &TemplateDescriptor) -> ElementTemplate {
    ElementTemplate {
        schema: SCHEMA_URL,
        name: template.name.clone(),
        id: template.id.clone(),
        description: template.description.clone(),
        documentation_ref: template.documentation_ref.clone(),
        version: template.version,
        applies_to: template.applies_to.clone(),
        element_type: ElementType {
            value: template.element_type.clone(),
        },
        groups: template.groups.iter().map(TemplateGroup::from).collect(),
        properties: std::iter::once(properties::task_definition_property(&template.task_type))
            .chain(template.properties().map(properties::template_property))
            .collect(),
    }
}

/// Render the document as pretty-printed JSON.
pub fn to_json(template: &ElementTemplate) -> Result<String, GeneratorError> {
    serde_json::to_string_pretty(template).map_err(|e| GeneratorError::Codegen {
        code: "C001",
        message: format!("Failed to serialize element template: {}", e),
    })
}
