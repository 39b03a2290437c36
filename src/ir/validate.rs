//! Template descriptor invariant validation.
//!
//! Final consistency pass of assembly. Every rule runs and every violation
//! is reported; a descriptor with any violation is never handed out.

use std::collections::HashSet;

use crate::error::GeneratorError;
use crate::ir::types::*;
use crate::ir::visibility::mutually_exclusive;

/// Validate an assembled descriptor against all invariants.
pub fn validate_template(template: &TemplateDescriptor) -> Result<(), Vec<GeneratorError>> {
    let mut errors = Vec::new();

    validate_synthetic_groups_last(template, &mut errors);
    validate_group_membership(template, &mut errors);
    validate_ungrouped(template, &mut errors);
    validate_covisible_ids(template, &mut errors);
    validate_condition_refs(template, &mut errors);
    validate_discriminators(template, &mut errors);
    validate_binding_targets(template, &mut errors);
    validate_unique_group_ids(template, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ---------------------------------------------------------------------------
// Invariant: `output` then `error` close the group list
// ---------------------------------------------------------------------------

fn validate_synthetic_groups_last(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    let ids = template.group_ids();
    let tail_ok = ids.len() >= 2 && ids[ids.len() - 2..] == [OUTPUT_GROUP_ID, ERROR_GROUP_ID];
    let synthetic_count = ids.iter().filter(|id| is_synthetic_group(id)).count();

    if !tail_ok || synthetic_count != 2 {
        errors.push(GeneratorError::assembly(
            "E001",
            format!(
                "Groups '{}' and '{}' must be the last two groups, found [{}]",
                OUTPUT_GROUP_ID,
                ERROR_GROUP_ID,
                ids.join(", ")
            ),
            None,
        ));
    }
}

// ---------------------------------------------------------------------------
// Invariant: each property belongs to exactly one place
// ---------------------------------------------------------------------------

fn validate_group_membership(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    for group in &template.groups {
        for property in &group.properties {
            if property.group.as_deref() != Some(group.id.as_str()) {
                errors.push(GeneratorError::assembly(
                    "E002",
                    format!(
                        "Property '{}' is listed in group '{}' but names group {:?}",
                        property.id, group.id, property.group
                    ),
                    Some(property.id.clone()),
                ));
            }
        }
    }
}

fn validate_ungrouped(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    for property in &template.ungrouped {
        if let Some(group) = &property.group {
            errors.push(GeneratorError::assembly(
                "E003",
                format!(
                    "Ungrouped property '{}' still names group '{}'",
                    property.id, group
                ),
                Some(property.id.clone()),
            ));
        }
    }
}

fn validate_unique_group_ids(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    let mut seen = HashSet::new();
    for group in &template.groups {
        if !seen.insert(group.id.as_str()) {
            errors.push(GeneratorError::assembly(
                "E008",
                format!("Duplicate group id '{}'", group.id),
                None,
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: ids unique among co-visible properties
// ---------------------------------------------------------------------------

fn validate_covisible_ids(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    let properties: Vec<&PropertyDescriptor> = template.properties().collect();

    for (i, a) in properties.iter().enumerate() {
        let clash = properties[..i]
            .iter()
            .any(|b| b.id == a.id && !mutually_exclusive(&a.conditions, &b.conditions));
        if clash {
            errors.push(GeneratorError::assembly(
                "E004",
                format!("Property id '{}' is used by co-visible properties", a.id),
                Some(a.id.clone()),
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: condition references resolve
// ---------------------------------------------------------------------------

fn validate_condition_refs(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    let ids: HashSet<&str> = template.properties().map(|p| p.id.as_str()).collect();

    for property in template.properties() {
        for condition in &property.conditions {
            if !ids.contains(condition.property()) {
                errors.push(GeneratorError::assembly(
                    "E005",
                    format!(
                        "Property '{}' has a condition on unknown property '{}'",
                        property.id,
                        condition.property()
                    ),
                    Some(property.id.clone()),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: discriminator specs match the properties
// ---------------------------------------------------------------------------

fn validate_discriminators(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    for spec in &template.discriminators {
        let Some(dropdown) = template.property(&spec.property_id) else {
            errors.push(GeneratorError::assembly(
                "E006",
                format!("Discriminator '{}' has no property", spec.property_id),
                Some(spec.property_id.clone()),
            ));
            continue;
        };

        let choices: Vec<&str> = match &dropdown.kind {
            PropertyKind::Dropdown { choices } => choices.iter().map(|c| c.value.as_str()).collect(),
            other => {
                errors.push(GeneratorError::assembly(
                    "E006",
                    format!(
                        "Discriminator '{}' is a {} property, expected Dropdown",
                        spec.property_id,
                        other.type_name()
                    ),
                    Some(spec.property_id.clone()),
                ));
                continue;
            }
        };

        if spec.variant(&spec.default_tag).is_none() {
            errors.push(GeneratorError::assembly(
                "E006",
                format!(
                    "Discriminator '{}' defaults to unknown variant '{}'",
                    spec.property_id, spec.default_tag
                ),
                Some(spec.property_id.clone()),
            ));
        }

        for variant in &spec.variants {
            if !choices.contains(&variant.tag.as_str()) {
                errors.push(GeneratorError::assembly(
                    "E006",
                    format!(
                        "Variant '{}' of discriminator '{}' is not one of its choices",
                        variant.tag, spec.property_id
                    ),
                    Some(spec.property_id.clone()),
                ));
            }
            for id in &variant.property_ids {
                let visible_under_tag = template.properties_with_id(id).any(|p| {
                    p.conditions.iter().any(|c| {
                        c.property() == spec.property_id
                            && matches!(c, Condition::Equals { equals, .. } if equals.as_key() == variant.tag)
                    })
                });
                if !visible_under_tag {
                    errors.push(GeneratorError::assembly(
                        "E006",
                        format!(
                            "Property '{}' of variant '{}' is not gated on discriminator '{}'",
                            id, variant.tag, spec.property_id
                        ),
                        Some(id.clone()),
                    ));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: every binding has a target
// ---------------------------------------------------------------------------

fn validate_binding_targets(template: &TemplateDescriptor, errors: &mut Vec<GeneratorError>) {
    for property in template.properties() {
        if property.binding.target.trim().is_empty() {
            errors.push(GeneratorError::assembly(
                "E007",
                format!("Property '{}' has an empty binding target", property.id),
                Some(property.id.clone()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(id: &str, group: Option<&str>) -> PropertyDescriptor {
        PropertyDescriptor {
            id: id.into(),
            label: id.into(),
            description: None,
            tooltip: None,
            example_value: None,
            group: group.map(String::from),
            kind: PropertyKind::String,
            feel: None,
            optional: None,
            constraints: None,
            default_value: None,
            binding: Binding::input(id),
            conditions: vec![],
        }
    }

    fn group(id: &str, properties: Vec<PropertyDescriptor>) -> PropertyGroup {
        PropertyGroup {
            id: id.into(),
            label: id.into(),
            tooltip: None,
            open_by_default: None,
            properties,
        }
    }

    fn template(groups: Vec<PropertyGroup>) -> TemplateDescriptor {
        TemplateDescriptor {
            id: "io.example.test".into(),
            name: "Test".into(),
            version: 1,
            description: None,
            documentation_ref: None,
            task_type: "io.example:test:1".into(),
            applies_to: vec!["bpmn:Task".into()],
            element_type: "bpmn:ServiceTask".into(),
            groups,
            ungrouped: vec![],
            discriminators: vec![],
        }
    }

    fn codes(result: Result<(), Vec<GeneratorError>>) -> Vec<String> {
        result
            .err()
            .unwrap_or_default()
            .iter()
            .map(|e| e.code().to_string())
            .collect()
    }

    fn minimal() -> TemplateDescriptor {
        template(vec![
            group("main", vec![prop("a", Some("main"))]),
            group(OUTPUT_GROUP_ID, vec![prop(RESULT_VARIABLE, Some(OUTPUT_GROUP_ID))]),
            group(ERROR_GROUP_ID, vec![prop(ERROR_EXPRESSION, Some(ERROR_GROUP_ID))]),
        ])
    }

    #[test]
    fn minimal_template_is_valid() {
        assert!(validate_template(&minimal()).is_ok());
    }

    #[test]
    fn e001_synthetic_groups_out_of_order() {
        let mut t = minimal();
        t.groups.swap(1, 2);
        assert_eq!(codes(validate_template(&t)), vec!["E001"]);
    }

    #[test]
    fn e002_and_e003_membership() {
        let mut t = minimal();
        t.groups[0].properties.push(prop("b", Some("other")));
        t.ungrouped.push(prop("c", Some("main")));
        assert_eq!(codes(validate_template(&t)), vec!["E002", "E003"]);
    }

    #[test]
    fn e004_covisible_duplicate() {
        let mut t = minimal();
        t.groups[0].properties.push(prop("a", Some("main")));
        assert_eq!(codes(validate_template(&t)), vec!["E004"]);
    }

    #[test]
    fn e005_dangling_condition() {
        let mut t = minimal();
        t.groups[0].properties[0]
            .conditions
            .push(Condition::equals("missing", "x"));
        assert_eq!(codes(validate_template(&t)), vec!["E005"]);
    }

    #[test]
    fn e006_default_tag_must_be_a_variant() {
        let mut t = minimal();
        t.groups[0].properties[0].kind = PropertyKind::Dropdown {
            choices: vec![Choice {
                name: "X".into(),
                value: "x".into(),
            }],
        };
        t.discriminators.push(DiscriminatorSpec {
            property_id: "a".into(),
            default_tag: "y".into(),
            variants: vec![VariantSpec {
                tag: "x".into(),
                label: "X".into(),
                property_ids: vec![],
            }],
        });
        assert_eq!(codes(validate_template(&t)), vec!["E006"]);
    }

    #[test]
    fn e007_empty_binding_target() {
        let mut t = minimal();
        t.groups[0].properties[0].binding = Binding::task_header(" ");
        assert_eq!(codes(validate_template(&t)), vec!["E007"]);
    }
}
