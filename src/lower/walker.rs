//! Type descriptor walker: declared type graph → flat list of leaf properties.
//!
//! Structured fields are recursed into with their name appended to the
//! dotted path; every other field becomes exactly one property. Union-typed
//! fields are handed to the discriminator resolver, which walks each variant
//! back through this walker.

use std::collections::HashMap;

use crate::error::GeneratorError;
use crate::ir::types::*;
use crate::ir::visibility::mutually_exclusive;
use crate::parse::graph::{field_name, join_path};
use crate::parse::types::{
    BindingDecl, ChoiceDecl, ConditionDecl, ConnectorDefinition, ConstraintsDecl,
    DefaultValueDecl, FieldDecl, FieldType, PropertyType, StructDecl, TypeDecl,
};

use super::discriminator;
use super::label::transform_id_into_label;

/// A walked property before grouping and binding resolution.
#[derive(Debug, Clone)]
pub struct PropertyDraft {
    /// `binding` holds the default input binding unless `explicit_binding`.
    pub property: PropertyDescriptor,
    pub explicit_binding: bool,
}

impl PropertyDraft {
    pub fn id(&self) -> &str {
        &self.property.id
    }
}

/// Everything produced by one walk of the input type.
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    pub properties: Vec<PropertyDraft>,
    pub discriminators: Vec<DiscriminatorSpec>,
}

/// State inherited from enclosing structured fields.
#[derive(Debug, Clone, Default)]
pub(super) struct Scope {
    /// Dotted path of the enclosing field, empty at the top level.
    pub prefix: String,
    /// Group forced onto everything beneath by an enclosing field.
    pub group: Option<String>,
    /// Conditions in force, innermost first.
    pub conditions: Vec<Condition>,
}

impl Scope {
    pub fn nested(&self, prefix: String, group: Option<String>, conditions: Vec<Condition>) -> Self {
        let mut all = conditions;
        all.extend(self.conditions.iter().cloned());
        Scope {
            prefix,
            group: self.group.clone().or(group),
            conditions: all,
        }
    }
}

pub struct Walker<'a> {
    types: HashMap<&'a str, &'a TypeDecl>,
    /// Types currently being walked, for cycle detection.
    active: Vec<&'a str>,
    /// Claimed ids with the conditions they were claimed under.
    claims: HashMap<String, Vec<Vec<Condition>>>,
    pub(super) discriminators: Vec<DiscriminatorSpec>,
    pub(super) errors: Vec<GeneratorError>,
}

/// Walk the definition's input type.
pub fn walk(definition: &ConnectorDefinition) -> Result<WalkOutput, Vec<GeneratorError>> {
    let mut walker = Walker::new(definition);
    let properties = walker.walk_type(&definition.input, &Scope::default(), None, "");

    if !walker.errors.is_empty() {
        return Err(walker.errors);
    }

    tracing::debug!(
        input = %definition.input,
        properties = properties.len(),
        discriminators = walker.discriminators.len(),
        "type walk complete"
    );

    Ok(WalkOutput {
        properties,
        discriminators: walker.discriminators,
    })
}

impl<'a> Walker<'a> {
    pub fn new(definition: &'a ConnectorDefinition) -> Self {
        let mut types = HashMap::new();
        for decl in &definition.types {
            types.entry(decl.name()).or_insert(decl);
        }
        // Generated output and error properties are always visible.
        let claims = [RESULT_VARIABLE, RESULT_EXPRESSION, ERROR_EXPRESSION]
            .into_iter()
            .map(|id| (id.to_string(), vec![Vec::new()]))
            .collect();
        Walker {
            types,
            active: Vec::new(),
            claims,
            discriminators: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Walk a named type. `field` is the field declaring it, absent for the
    /// input type and for union variants. `path` locates errors.
    pub(super) fn walk_type(
        &mut self,
        type_name: &str,
        scope: &Scope,
        field: Option<&FieldDecl>,
        path: &str,
    ) -> Vec<PropertyDraft> {
        let Some(&decl) = self.types.get(type_name) else {
            self.errors.push(GeneratorError::structural(
                "S004",
                format!("Unknown type '{}'", type_name),
                path,
            ));
            return vec![];
        };

        if self.active.contains(&decl.name()) {
            self.errors.push(GeneratorError::structural(
                "S003",
                format!(
                    "Type '{}' refers to itself (cycle: {} -> {})",
                    type_name,
                    self.active.join(" -> "),
                    type_name
                ),
                path,
            ));
            return vec![];
        }

        self.active.push(decl.name());
        let drafts = match decl {
            TypeDecl::Struct(s) => self.walk_struct(s, scope),
            TypeDecl::Union(u) => discriminator::resolve_union(self, u, scope, field, path),
        };
        self.active.pop();

        drafts
    }

    fn walk_struct(&mut self, decl: &StructDecl, scope: &Scope) -> Vec<PropertyDraft> {
        let mut drafts = Vec::new();

        for (index, field) in decl.fields.iter().enumerate() {
            let Some(name) = field_name(field) else {
                self.errors.push(GeneratorError::structural(
                    "S005",
                    format!(
                        "Field #{} of type '{}' has neither a name nor a label",
                        index, decl.name
                    ),
                    join_path(&scope.prefix, Some(&format!("<field {}>", index))),
                ));
                continue;
            };
            let id = join_path(&scope.prefix, Some(&name));

            let own_conditions = match field.condition.as_ref().map(|c| build_conditions(c, &id)) {
                Some(Ok(c)) => c,
                Some(Err(e)) => {
                    self.errors.push(e);
                    continue;
                }
                None => vec![],
            };

            if field.ignore {
                let conditions = with_scope(own_conditions, scope);
                self.claim(&id, &conditions);
                continue;
            }

            match &field.field_type {
                FieldType::Structured { type_name } if field.property_type.is_none() => {
                    let prefix = if field.flatten {
                        scope.prefix.clone()
                    } else {
                        id.clone()
                    };
                    let nested = scope.nested(prefix, field.group.clone(), own_conditions);
                    drafts.extend(self.walk_type(type_name, &nested, Some(field), &id));
                }
                _ => {
                    if let Some(draft) = self.build_leaf(field, &name, id, own_conditions, scope) {
                        drafts.push(draft);
                    }
                }
            }
        }

        drafts
    }

    fn build_leaf(
        &mut self,
        field: &FieldDecl,
        name: &str,
        id: String,
        own_conditions: Vec<Condition>,
        scope: &Scope,
    ) -> Option<PropertyDraft> {
        let kind = match property_kind(field) {
            Ok(k) => k,
            Err(message) => {
                self.errors.push(GeneratorError::structural("S013", message, &id));
                return None;
            }
        };

        let constraints = match field.constraints.as_ref().map(build_constraints) {
            Some(Ok(c)) => c,
            Some(Err(message)) => {
                self.errors.push(GeneratorError::structural("S012", message, &id));
                return None;
            }
            None => None,
        };

        let default_value = match field.default_value.as_ref().map(build_default_value) {
            Some(Ok(v)) => Some(v),
            Some(Err(message)) => {
                self.errors.push(GeneratorError::structural("S006", message, &id));
                return None;
            }
            None => None,
        };

        let (binding, explicit_binding) = match &field.binding {
            Some(BindingDecl::InputVariable { name }) => {
                (Binding::input(join_path(&scope.prefix, Some(name))), true)
            }
            Some(BindingDecl::NestedPath { path }) => (Binding::nested_path(path.clone()), true),
            Some(BindingDecl::TaskHeader { key }) => (Binding::task_header(key.clone()), true),
            None => (Binding::input(id.clone()), false),
        };

        let conditions = with_scope(own_conditions, scope);
        self.claim(&id, &conditions);

        Some(PropertyDraft {
            property: PropertyDescriptor {
                label: field
                    .label
                    .clone()
                    .unwrap_or_else(|| transform_id_into_label(name)),
                description: field.description.clone(),
                tooltip: field.tooltip.clone(),
                example_value: field.example_value.clone(),
                group: scope.group.clone().or_else(|| field.group.clone()),
                feel: field.feel.or_else(|| default_feel(field, &kind)),
                kind,
                optional: field.optional,
                constraints,
                default_value,
                binding,
                conditions,
                id,
            },
            explicit_binding,
        })
    }

    /// Record `id` as taken under `conditions`. Ids may repeat only between
    /// properties that can never be visible together.
    pub(super) fn claim(&mut self, id: &str, conditions: &[Condition]) {
        let existing = self.claims.entry(id.to_string()).or_default();
        if existing.iter().any(|other| !mutually_exclusive(other, conditions)) {
            let message = if is_generated_property(id) {
                format!("Property id '{}' is reserved for generated properties", id)
            } else {
                format!("Property id '{}' is declared more than once", id)
            };
            self.errors.push(GeneratorError::structural("S011", message, id));
            return;
        }
        existing.push(conditions.to_vec());
    }
}

fn with_scope(own: Vec<Condition>, scope: &Scope) -> Vec<Condition> {
    let mut all = own;
    all.extend(scope.conditions.iter().cloned());
    all
}

fn is_generated_property(id: &str) -> bool {
    matches!(id, RESULT_VARIABLE | RESULT_EXPRESSION | ERROR_EXPRESSION)
}

// ---------------------------------------------------------------------------
// Property kind and FEEL mode
// ---------------------------------------------------------------------------

fn property_kind(field: &FieldDecl) -> Result<PropertyKind, String> {
    let enum_choices = match &field.field_type {
        FieldType::Enum { choices } => Some(choices),
        _ => None,
    };
    let declared_choices = field.choices.as_ref().or(enum_choices);

    let inferred = field.property_type.unwrap_or(match &field.field_type {
        FieldType::Text => PropertyType::Text,
        FieldType::Boolean => PropertyType::Boolean,
        FieldType::Number => PropertyType::Number,
        FieldType::Enum { .. } => PropertyType::Dropdown,
        _ => PropertyType::String,
    });

    Ok(match inferred {
        PropertyType::String => PropertyKind::String,
        PropertyType::Text => PropertyKind::Text,
        PropertyType::Boolean => PropertyKind::Boolean,
        PropertyType::Number => PropertyKind::Number,
        PropertyType::Hidden => PropertyKind::Hidden,
        PropertyType::Dropdown => match declared_choices {
            Some(choices) if !choices.is_empty() => PropertyKind::Dropdown {
                choices: build_choices(choices),
            },
            _ => return Err("Dropdown property declares no choices".to_string()),
        },
    })
}

fn build_choices(choices: &[ChoiceDecl]) -> Vec<Choice> {
    let mut sorted: Vec<&ChoiceDecl> = choices.iter().collect();
    sorted.sort_by_key(|c| c.order);
    sorted
        .into_iter()
        .map(|c| Choice {
            name: c
                .label
                .clone()
                .unwrap_or_else(|| transform_id_into_label(&c.value)),
            value: c.value.clone(),
        })
        .collect()
}

fn default_feel(field: &FieldDecl, kind: &PropertyKind) -> Option<FeelMode> {
    match (&field.field_type, kind) {
        (_, PropertyKind::Dropdown { .. }) => Some(FeelMode::Disabled),
        (_, PropertyKind::Hidden) => None,
        (FieldType::Object | FieldType::List | FieldType::Map | FieldType::Structured { .. }, _) => {
            Some(FeelMode::Required)
        }
        _ => Some(FeelMode::Optional),
    }
}

// ---------------------------------------------------------------------------
// Constraints, defaults, conditions
// ---------------------------------------------------------------------------

fn build_constraints(decl: &ConstraintsDecl) -> Result<Option<Constraints>, String> {
    if let (Some(min), Some(max)) = (decl.min_length, decl.max_length) {
        if min > max {
            return Err(format!("minLength {} exceeds maxLength {}", min, max));
        }
    }

    let constraints = Constraints {
        not_empty: decl.not_empty.then_some(true),
        min_length: decl.min_length,
        max_length: decl.max_length,
        pattern: decl.pattern.as_ref().map(|p| Pattern {
            value: p.value.clone(),
            message: p.message.clone(),
        }),
    };

    if constraints == Constraints::default() {
        Ok(None)
    } else {
        Ok(Some(constraints))
    }
}

fn build_default_value(decl: &DefaultValueDecl) -> Result<DefaultValue, String> {
    match decl.value_type {
        DefaultValueType::String => {}
        DefaultValueType::Boolean => {
            if decl.value != "true" && decl.value != "false" {
                return Err(format!(
                    "Boolean default value must be 'true' or 'false', got '{}'",
                    decl.value
                ));
            }
        }
        DefaultValueType::Number => {
            if serde_json::from_str::<serde_json::Number>(&decl.value).is_err() {
                return Err(format!("Default value '{}' is not a number", decl.value));
            }
        }
    }

    Ok(DefaultValue {
        raw: decl.value.clone(),
        value_type: decl.value_type,
    })
}

/// Turn a declared condition into a conjunction list.
fn build_conditions(
    decl: &ConditionDecl,
    path: &str,
) -> Result<Vec<Condition>, GeneratorError> {
    let invalid = |message: &str| GeneratorError::structural("S007", message, path);

    let equals_set = decl.equals.is_some();
    let one_of_set = decl.one_of.as_ref().is_some_and(|v| !v.is_empty());
    let all_match_set = decl.all_match.as_ref().is_some_and(|v| !v.is_empty());
    let has_property = !decl.property.trim().is_empty();

    if [equals_set, one_of_set, all_match_set].iter().filter(|s| **s).count() > 1 {
        return Err(invalid(
            "Condition must set only one of 'equals', 'oneOf', 'isActive', or 'allMatch'",
        ));
    }

    if all_match_set {
        if has_property {
            return Err(invalid("Condition 'allMatch' must not have 'property' set"));
        }
        let mut conditions = Vec::new();
        for nested in decl.all_match.iter().flatten() {
            if nested.all_match.is_some() {
                return Err(invalid("Nested 'allMatch' conditions are not supported"));
            }
            conditions.extend(build_conditions(nested, path)?);
        }
        return Ok(conditions);
    }

    if !has_property {
        return Err(invalid("Condition must have 'property' set"));
    }
    let property = decl.property.trim().to_string();

    if let Some(equals) = &decl.equals {
        Ok(vec![Condition::Equals {
            property,
            equals: equals.clone(),
        }])
    } else if one_of_set {
        Ok(vec![Condition::OneOf {
            property,
            one_of: decl.one_of.clone().unwrap_or_default(),
        }])
    } else if let Some(is_active) = decl.is_active {
        Ok(vec![Condition::IsActive {
            property,
            is_active,
        }])
    } else {
        Err(invalid(
            "Condition must set one of 'equals', 'oneOf', 'isActive', or 'allMatch'",
        ))
    }
}
