//! Output data model of the generator.
//!
//! A `TemplateDescriptor` is built once per invocation from one connector
//! definition and handed read-only to the host's writer. It bridges the
//! declared type graph (input) and the element-template document (codegen).

use serde::{Deserialize, Serialize};

pub use crate::parse::types::{ConditionLiteral, DefaultValueType, FeelMode};

/// Id and label of the synthetic group holding result mapping properties.
pub const OUTPUT_GROUP_ID: &str = "output";
pub const OUTPUT_GROUP_LABEL: &str = "Output mapping";
/// Id and label of the synthetic group holding the error expression.
pub const ERROR_GROUP_ID: &str = "error";
pub const ERROR_GROUP_LABEL: &str = "Error handling";
/// Fallback group used when no group skeleton exists.
pub const DEFAULT_GROUP_ID: &str = "default";
pub const DEFAULT_GROUP_LABEL: &str = "Properties";

pub const RESULT_VARIABLE: &str = "resultVariable";
pub const RESULT_EXPRESSION: &str = "resultExpression";
pub const ERROR_EXPRESSION: &str = "errorExpression";

pub fn is_synthetic_group(id: &str) -> bool {
    id == OUTPUT_GROUP_ID || id == ERROR_GROUP_ID
}

// =============================================================================
// TOP-LEVEL DESCRIPTOR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub version: u32,
    pub description: Option<String>,
    pub documentation_ref: Option<String>,
    /// Job type written into the task definition.
    pub task_type: String,
    pub applies_to: Vec<String>,
    pub element_type: String,
    /// Ordered groups; `output` and `error` are always the last two.
    pub groups: Vec<PropertyGroup>,
    /// Properties that belong to no group.
    pub ungrouped: Vec<PropertyDescriptor>,
    /// One entry per discriminated union, in walk order.
    pub discriminators: Vec<DiscriminatorSpec>,
}

impl TemplateDescriptor {
    /// All properties: grouped ones in group order, then ungrouped ones.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.groups
            .iter()
            .flat_map(|g| g.properties.iter())
            .chain(self.ungrouped.iter())
    }

    /// First property with the given id. Mutually exclusive variants may
    /// share an id; use `properties_with_id` to see all of them.
    pub fn property(&self, id: &str) -> Option<&PropertyDescriptor> {
        self.properties().find(|p| p.id == id)
    }

    pub fn properties_with_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PropertyDescriptor> {
        self.properties().filter(move |p| p.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&PropertyGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_ids(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.id.as_str()).collect()
    }

    pub fn discriminator(&self, property_id: &str) -> Option<&DiscriminatorSpec> {
        self.discriminators.iter().find(|d| d.property_id == property_id)
    }
}

// =============================================================================
// GROUPS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGroup {
    pub id: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub open_by_default: Option<bool>,
    pub properties: Vec<PropertyDescriptor>,
}

impl PropertyGroup {
    pub fn property_ids(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.id.as_str()).collect()
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Dotted path, unique among properties that can be visible together.
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub example_value: Option<String>,
    pub group: Option<String>,
    pub kind: PropertyKind,
    pub feel: Option<FeelMode>,
    pub optional: Option<bool>,
    pub constraints: Option<Constraints>,
    pub default_value: Option<DefaultValue>,
    pub binding: Binding,
    /// Conjunction of visibility rules. Empty means always visible.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKind {
    String,
    Text,
    Boolean,
    Number,
    Hidden,
    Dropdown { choices: Vec<Choice> },
}

impl PropertyKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyKind::String => "String",
            PropertyKind::Text => "Text",
            PropertyKind::Boolean => "Boolean",
            PropertyKind::Number => "Number",
            PropertyKind::Hidden => "Hidden",
            PropertyKind::Dropdown { .. } => "Dropdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_empty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Default value kept as the declared literal so a writer can reproduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultValue {
    pub raw: String,
    pub value_type: DefaultValueType,
}

impl DefaultValue {
    pub fn string(raw: impl Into<String>) -> Self {
        DefaultValue {
            raw: raw.into(),
            value_type: DefaultValueType::String,
        }
    }
}

// =============================================================================
// BINDINGS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingKind {
    InputVariable,
    TaskHeader,
    NestedPath,
}

/// Where the connector reads a property's resolved value at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub kind: BindingKind,
    pub target: String,
}

impl Binding {
    pub fn input(target: impl Into<String>) -> Self {
        Binding {
            kind: BindingKind::InputVariable,
            target: target.into(),
        }
    }

    pub fn task_header(target: impl Into<String>) -> Self {
        Binding {
            kind: BindingKind::TaskHeader,
            target: target.into(),
        }
    }

    pub fn nested_path(target: impl Into<String>) -> Self {
        Binding {
            kind: BindingKind::NestedPath,
            target: target.into(),
        }
    }

    pub fn namespace(&self) -> crate::error::BindingNamespace {
        use crate::error::BindingNamespace;
        match self.kind {
            BindingKind::InputVariable | BindingKind::NestedPath => BindingNamespace::Input,
            BindingKind::TaskHeader => BindingNamespace::TaskHeader,
        }
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Equals {
        property: String,
        equals: ConditionLiteral,
    },
    OneOf {
        property: String,
        #[serde(rename = "oneOf")]
        one_of: Vec<String>,
    },
    IsActive {
        property: String,
        #[serde(rename = "isActive")]
        is_active: bool,
    },
}

impl Condition {
    pub fn equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Equals {
            property: property.into(),
            equals: ConditionLiteral::String(value.into()),
        }
    }

    pub fn property(&self) -> &str {
        match self {
            Condition::Equals { property, .. }
            | Condition::OneOf { property, .. }
            | Condition::IsActive { property, .. } => property,
        }
    }
}

// =============================================================================
// DISCRIMINATED UNIONS
// =============================================================================

/// A resolved discriminated union: the discriminator property plus each
/// variant's own properties, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorSpec {
    pub property_id: String,
    pub default_tag: String,
    pub variants: Vec<VariantSpec>,
}

impl DiscriminatorSpec {
    pub fn variant(&self, tag: &str) -> Option<&VariantSpec> {
        self.variants.iter().find(|v| v.tag == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSpec {
    pub tag: String,
    pub label: String,
    pub property_ids: Vec<String>,
}
