//! Discriminated unions → dropdown plus conditionally visible variant fields.

use std::collections::HashSet;

use crate::error::GeneratorError;
use crate::ir::types::*;
use crate::parse::graph::join_path;
use crate::parse::types::{FieldDecl, UnionDecl, VariantDecl};

use super::label::transform_id_into_label;
use super::walker::{PropertyDraft, Scope, Walker};

/// Resolve one union-typed position in the walk.
///
/// Emits the discriminator dropdown first, then every variant's properties
/// in declaration order, each carrying `discriminator == tag` ahead of the
/// conditions already in scope.
pub(super) fn resolve_union<'a>(
    walker: &mut Walker<'a>,
    decl: &'a UnionDecl,
    scope: &Scope,
    field: Option<&FieldDecl>,
    path: &str,
) -> Vec<PropertyDraft> {
    let variants: Vec<&VariantDecl> = decl.variants.iter().filter(|v| !v.ignore).collect();
    if !check_variants(walker, decl, &variants, path) {
        return vec![];
    }

    let name = decl
        .discriminator
        .id
        .clone()
        .unwrap_or_else(|| decl.name.to_lowercase());
    let id = join_path(&scope.prefix, Some(&name));

    let default_tag = variants
        .iter()
        .find(|v| v.default)
        .or(variants.first())
        .map(|v| v.tag.clone())
        .unwrap_or_default();

    let choices: Vec<Choice> = variants
        .iter()
        .map(|v| Choice {
            name: variant_label(v),
            value: v.tag.clone(),
        })
        .collect();

    let (binding, explicit_binding) = match &decl.discriminator.binding {
        Some(b) => (Binding::input(join_path(&scope.prefix, Some(b))), true),
        None => (Binding::input(id.clone()), false),
    };

    walker.claim(&id, &scope.conditions);

    let dropdown = PropertyDraft {
        property: PropertyDescriptor {
            id: id.clone(),
            label: field
                .and_then(|f| f.label.clone())
                .or_else(|| decl.discriminator.label.clone())
                .unwrap_or_else(|| transform_id_into_label(&decl.name)),
            description: field
                .and_then(|f| f.description.clone())
                .or_else(|| decl.discriminator.description.clone()),
            tooltip: None,
            example_value: None,
            group: scope.group.clone().or_else(|| decl.discriminator.group.clone()),
            kind: PropertyKind::Dropdown { choices },
            feel: None,
            optional: None,
            constraints: None,
            default_value: Some(DefaultValue::string(default_tag.clone())),
            binding,
            conditions: scope.conditions.clone(),
        },
        explicit_binding,
    };

    // Reserve the slot so an outer union is listed before the ones nested in its variants.
    let slot = walker.discriminators.len();
    let mut drafts = vec![dropdown];
    let mut variant_specs = Vec::with_capacity(variants.len());

    for variant in &variants {
        let mut conditions = vec![Condition::equals(id.clone(), variant.tag.clone())];
        conditions.extend(scope.conditions.iter().cloned());
        let variant_scope = Scope {
            prefix: scope.prefix.clone(),
            group: scope.group.clone(),
            conditions,
        };

        let walked = walker.walk_type(&variant.type_name, &variant_scope, None, path);
        variant_specs.push(VariantSpec {
            tag: variant.tag.clone(),
            label: variant_label(variant),
            property_ids: walked.iter().map(|d| d.id().to_string()).collect(),
        });
        drafts.extend(walked);
    }

    tracing::debug!(
        union = %decl.name,
        discriminator = %id,
        variants = variant_specs.len(),
        "union resolved"
    );

    walker.discriminators.insert(
        slot,
        DiscriminatorSpec {
            property_id: id,
            default_tag,
            variants: variant_specs,
        },
    );

    drafts
}

fn variant_label(variant: &VariantDecl) -> String {
    variant
        .label
        .clone()
        .unwrap_or_else(|| transform_id_into_label(&variant.tag))
}

/// Reports S008–S010. Returns false if the union cannot be resolved.
fn check_variants(
    walker: &mut Walker<'_>,
    decl: &UnionDecl,
    variants: &[&VariantDecl],
    path: &str,
) -> bool {
    let before = walker.errors.len();

    if variants.is_empty() {
        walker.errors.push(GeneratorError::structural(
            "S008",
            format!("Union '{}' has no variants to choose from", decl.name),
            path,
        ));
    }

    let mut seen = HashSet::new();
    for variant in variants {
        if !seen.insert(variant.tag.as_str()) {
            walker.errors.push(GeneratorError::structural(
                "S009",
                format!(
                    "Union '{}' declares variant tag '{}' more than once",
                    decl.name, variant.tag
                ),
                path,
            ));
        }
    }

    let defaults: Vec<&str> = variants
        .iter()
        .filter(|v| v.default)
        .map(|v| v.tag.as_str())
        .collect();
    if defaults.len() > 1 {
        walker.errors.push(GeneratorError::structural(
            "S010",
            format!(
                "Union '{}' marks more than one variant as default: {}",
                decl.name,
                defaults.join(", ")
            ),
            path,
        ));
    }

    walker.errors.len() == before
}
