//! Property grouping: walked properties → ordered groups + ungrouped list.
//!
//! The skeleton is the declared groups when there are any. Otherwise it is
//! derived from the group ids properties name, and properties without a group
//! stay ungrouped. Only when no property names a group does everything go to
//! the fallback group. The `output` and `error` groups are always appended
//! last.

use crate::error::GenerationWarning;
use crate::ir::types::*;
use crate::parse::types::GroupDeclaration;

use super::label::transform_id_into_label;
use super::walker::PropertyDraft;

#[derive(Debug, Clone)]
pub struct DraftGroup {
    pub id: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub open_by_default: Option<bool>,
    pub properties: Vec<PropertyDraft>,
}

impl DraftGroup {
    fn new(id: &str, label: &str) -> Self {
        DraftGroup {
            id: id.to_string(),
            label: label.to_string(),
            tooltip: None,
            open_by_default: None,
            properties: Vec::new(),
        }
    }
}

impl From<&GroupDeclaration> for DraftGroup {
    fn from(decl: &GroupDeclaration) -> Self {
        DraftGroup {
            id: decl.id.clone(),
            label: decl.label.clone(),
            tooltip: decl.tooltip.clone(),
            open_by_default: decl.open_by_default,
            properties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupedProperties {
    pub groups: Vec<DraftGroup>,
    pub ungrouped: Vec<PropertyDraft>,
    pub warnings: Vec<GenerationWarning>,
}

/// Partition properties into groups. Never fails; recoverable problems are
/// reported as warnings.
pub fn group_properties(
    declared: &[GroupDeclaration],
    properties: Vec<PropertyDraft>,
) -> GroupedProperties {
    let mut grouped = if declared.is_empty() {
        group_by_reference(properties)
    } else {
        group_by_declaration(declared, properties)
    };

    grouped.groups.push(output_group());
    grouped.groups.push(error_group());

    for warning in &grouped.warnings {
        tracing::warn!(code = warning.code(), "{}", warning);
    }
    tracing::debug!(
        groups = grouped.groups.len(),
        ungrouped = grouped.ungrouped.len(),
        "grouping complete"
    );

    grouped
}

fn group_by_declaration(
    declared: &[GroupDeclaration],
    properties: Vec<PropertyDraft>,
) -> GroupedProperties {
    let mut groups: Vec<DraftGroup> = declared.iter().map(DraftGroup::from).collect();
    let mut ungrouped = Vec::new();
    let mut warnings = Vec::new();

    for mut draft in properties {
        let target = draft
            .property
            .group
            .as_deref()
            .and_then(|g| groups.iter().position(|group| group.id == g && !is_synthetic_group(g)));

        match (target, draft.property.group.take()) {
            (Some(index), group) => {
                draft.property.group = group;
                groups[index].properties.push(draft);
            }
            (None, Some(group)) => {
                warnings.push(GenerationWarning::GroupReference {
                    property: draft.property.id.clone(),
                    group,
                });
                ungrouped.push(draft);
            }
            (None, None) => ungrouped.push(draft),
        }
    }

    groups.retain(|group| {
        let keep = !group.properties.is_empty();
        if !keep {
            warnings.push(GenerationWarning::EmptyGroup {
                group: group.id.clone(),
            });
        }
        keep
    });

    GroupedProperties {
        groups,
        ungrouped,
        warnings,
    }
}

fn group_by_reference(properties: Vec<PropertyDraft>) -> GroupedProperties {
    let mut groups: Vec<DraftGroup> = Vec::new();
    let mut fallback = Vec::new();
    let mut warnings = Vec::new();

    for mut draft in properties {
        match draft.property.group.take() {
            Some(group) if is_synthetic_group(&group) => {
                warnings.push(GenerationWarning::GroupReference {
                    property: draft.property.id.clone(),
                    group,
                });
                fallback.push(draft);
            }
            Some(group) => {
                let index = match groups.iter().position(|g| g.id == group) {
                    Some(index) => index,
                    None => {
                        groups.push(DraftGroup::new(&group, &transform_id_into_label(&group)));
                        groups.len() - 1
                    }
                };
                draft.property.group = Some(group);
                groups[index].properties.push(draft);
            }
            None => fallback.push(draft),
        }
    }

    // Group-less properties only get the fallback group when no property
    // names a group at all.
    let mut ungrouped = Vec::new();
    if groups.is_empty() {
        if !fallback.is_empty() {
            let mut group = DraftGroup::new(DEFAULT_GROUP_ID, DEFAULT_GROUP_LABEL);
            for mut draft in fallback {
                draft.property.group = Some(DEFAULT_GROUP_ID.to_string());
                group.properties.push(draft);
            }
            groups.push(group);
        }
    } else {
        ungrouped = fallback;
    }

    GroupedProperties {
        groups,
        ungrouped,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Synthetic groups
// ---------------------------------------------------------------------------

fn synthetic_property(
    id: &str,
    label: &str,
    group: &str,
    kind: PropertyKind,
    feel: Option<FeelMode>,
    description: &str,
) -> PropertyDraft {
    PropertyDraft {
        property: PropertyDescriptor {
            id: id.to_string(),
            label: label.to_string(),
            description: Some(description.to_string()),
            tooltip: None,
            example_value: None,
            group: Some(group.to_string()),
            kind,
            feel,
            optional: None,
            constraints: None,
            default_value: None,
            binding: Binding::input(id),
            conditions: Vec::new(),
        },
        explicit_binding: false,
    }
}

fn output_group() -> DraftGroup {
    let mut group = DraftGroup::new(OUTPUT_GROUP_ID, OUTPUT_GROUP_LABEL);
    group.properties = vec![
        synthetic_property(
            RESULT_VARIABLE,
            "Result variable",
            OUTPUT_GROUP_ID,
            PropertyKind::String,
            Some(FeelMode::Disabled),
            "Name of variable to store the response in",
        ),
        synthetic_property(
            RESULT_EXPRESSION,
            "Result expression",
            OUTPUT_GROUP_ID,
            PropertyKind::Text,
            Some(FeelMode::Required),
            "Expression to map the response into process variables",
        ),
    ];
    group
}

fn error_group() -> DraftGroup {
    let mut group = DraftGroup::new(ERROR_GROUP_ID, ERROR_GROUP_LABEL);
    group.properties = vec![synthetic_property(
        ERROR_EXPRESSION,
        "Error expression",
        ERROR_GROUP_ID,
        PropertyKind::Text,
        Some(FeelMode::Required),
        "Expression to handle errors. Details in the <a href=\"https://docs.camunda.io/docs/components/connectors/use-connectors/\" target=\"_blank\">documentation</a>.",
    )];
    group
}
