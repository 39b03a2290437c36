//! Binding resolution: where each property's value is read at runtime.

use std::collections::HashMap;

use crate::error::{BindingNamespace, GeneratorError};
use crate::ir::types::*;
use crate::ir::visibility::mutually_exclusive;

use super::grouping::GroupedProperties;
use super::walker::PropertyDraft;

/// Apply the synthetic-group default and check that no two co-visible
/// properties write to the same target.
///
/// Properties without an explicit binding keep the input variable named by
/// their id, except in the `output` and `error` groups where they bind to
/// the task header of the same name.
pub fn resolve_bindings(grouped: &mut GroupedProperties) -> Result<(), Vec<GeneratorError>> {
    for group in grouped.groups.iter_mut().filter(|g| is_synthetic_group(&g.id)) {
        for draft in group.properties.iter_mut().filter(|d| !d.explicit_binding) {
            draft.property.binding = Binding::task_header(draft.property.id.clone());
        }
    }

    let all = grouped
        .groups
        .iter()
        .flat_map(|g| g.properties.iter())
        .chain(grouped.ungrouped.iter());
    let errors = find_collisions(all);

    if !errors.is_empty() {
        return Err(errors);
    }

    tracing::debug!("bindings resolved");
    Ok(())
}

fn find_collisions<'a>(drafts: impl Iterator<Item = &'a PropertyDraft>) -> Vec<GeneratorError> {
    let mut claimed: HashMap<(BindingNamespace, &str), Vec<&PropertyDescriptor>> = HashMap::new();
    let mut errors = Vec::new();

    for draft in drafts {
        let property = &draft.property;
        let key = (property.binding.namespace(), property.binding.target.as_str());
        let holders = claimed.entry(key).or_default();

        if let Some(first) = holders
            .iter()
            .find(|other| !mutually_exclusive(&other.conditions, &property.conditions))
        {
            errors.push(GeneratorError::BindingCollision {
                namespace: key.0,
                target: key.1.to_string(),
                first: first.id.clone(),
                second: property.id.clone(),
            });
        }
        holders.push(property);
    }

    errors
}
