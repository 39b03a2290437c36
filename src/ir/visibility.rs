//! Co-visibility of properties under their condition conjunctions.
//!
//! Two properties are mutually exclusive when some property they both
//! constrain with `equals`/`oneOf` can never satisfy both at once. This is
//! what lets the variants of one discriminator share ids and binding targets.

use std::collections::{BTreeMap, BTreeSet};

use super::types::Condition;

/// Values each constrained property may take for the conditions to hold.
fn allowed_values(conditions: &[Condition]) -> BTreeMap<&str, BTreeSet<String>> {
    let mut allowed: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();

    for condition in conditions {
        let values: BTreeSet<String> = match condition {
            Condition::Equals { equals, .. } => [equals.as_key()].into_iter().collect(),
            Condition::OneOf { one_of, .. } => one_of.iter().cloned().collect(),
            Condition::IsActive { .. } => continue,
        };
        allowed
            .entry(condition.property())
            .and_modify(|existing| {
                *existing = existing.intersection(&values).cloned().collect();
            })
            .or_insert(values);
    }

    allowed
}

/// True if no assignment of property values makes both conjunctions hold.
pub fn mutually_exclusive(a: &[Condition], b: &[Condition]) -> bool {
    let allowed_a = allowed_values(a);
    let allowed_b = allowed_values(b);

    if allowed_a.values().any(|v| v.is_empty()) || allowed_b.values().any(|v| v.is_empty()) {
        return true;
    }

    allowed_a.iter().any(|(property, values_a)| {
        allowed_b
            .get(property)
            .is_some_and(|values_b| values_a.is_disjoint(values_b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::types::ConditionLiteral;

    #[test]
    fn different_tags_of_one_discriminator_are_exclusive() {
        let a = vec![Condition::equals("auth.authType", "basic")];
        let b = vec![Condition::equals("auth.authType", "token")];
        assert!(mutually_exclusive(&a, &b));
    }

    #[test]
    fn unconditioned_property_is_covisible_with_everything() {
        let a = vec![Condition::equals("auth.authType", "basic")];
        assert!(!mutually_exclusive(&a, &[]));
        assert!(!mutually_exclusive(&[], &[]));
    }

    #[test]
    fn different_discriminators_do_not_exclude() {
        let a = vec![Condition::equals("auth.authType", "basic")];
        let b = vec![Condition::equals("proxy.proxyType", "none")];
        assert!(!mutually_exclusive(&a, &b));
    }

    #[test]
    fn one_of_overlap_is_covisible() {
        let a = vec![Condition::OneOf {
            property: "mode".into(),
            one_of: vec!["a".into(), "b".into()],
        }];
        let b = vec![Condition::equals("mode", "b")];
        let c = vec![Condition::equals("mode", "c")];
        assert!(!mutually_exclusive(&a, &b));
        assert!(mutually_exclusive(&a, &c));
    }

    #[test]
    fn boolean_equals_compares_by_literal() {
        let a = vec![Condition::Equals {
            property: "manual".into(),
            equals: ConditionLiteral::Bool(true),
        }];
        let b = vec![Condition::Equals {
            property: "manual".into(),
            equals: ConditionLiteral::Bool(false),
        }];
        assert!(mutually_exclusive(&a, &b));
    }

    #[test]
    fn nested_variant_inherits_outer_exclusion() {
        let inner = vec![
            Condition::equals("auth.oauthFlow", "clientCredentials"),
            Condition::equals("auth.authType", "oauth"),
        ];
        let sibling = vec![Condition::equals("auth.authType", "basic")];
        assert!(mutually_exclusive(&inner, &sibling));
    }
}
