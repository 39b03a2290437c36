//! Rust types for the connector definition handed over by the build host.
//!
//! These types are the serde target for the declaration JSON. A host that
//! introspects connector input types (reflection, codegen, or a hand-written
//! schema) produces one `ConnectorDefinition`; nothing downstream knows how
//! it was obtained.

use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL DEFINITION
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorDefinition {
    pub template: TemplateDeclaration,
    /// Explicit group skeleton, in display order.
    #[serde(default)]
    pub property_groups: Vec<GroupDeclaration>,
    /// Name of the connector's input type.
    pub input: String,
    pub types: Vec<TypeDecl>,
}

impl ConnectorDefinition {
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name() == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeclaration {
    pub id: String,
    pub name: String,
    /// Job type the connector's worker subscribes to.
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub version: u32,
    pub description: Option<String>,
    pub documentation_ref: Option<String>,
    #[serde(default)]
    pub element_type: ElementTypeDeclaration,
}

/// BPMN element the template applies to and the type it turns it into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTypeDeclaration {
    pub applies_to: Vec<String>,
    pub element_type: String,
}

impl Default for ElementTypeDeclaration {
    fn default() -> Self {
        ElementTypeDeclaration {
            applies_to: vec![DEFAULT_APPLIES_TO.to_string()],
            element_type: DEFAULT_ELEMENT_TYPE.to_string(),
        }
    }
}

pub const DEFAULT_APPLIES_TO: &str = "bpmn:Task";
pub const DEFAULT_ELEMENT_TYPE: &str = "bpmn:ServiceTask";

/// Element types an outbound connector template may produce.
pub const SUPPORTED_ELEMENT_TYPES: [&str; 4] = [
    "bpmn:ServiceTask",
    "bpmn:IntermediateThrowEvent",
    "bpmn:ScriptTask",
    "bpmn:EndEvent",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDeclaration {
    pub id: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub open_by_default: Option<bool>,
}

// =============================================================================
// TYPE DECLARATIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeDecl {
    Struct(StructDecl),
    /// Closed set of alternative shapes (a sealed hierarchy).
    Union(UnionDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Struct(s) => &s.name,
            TypeDecl::Union(u) => &u.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionDecl {
    pub name: String,
    #[serde(default)]
    pub discriminator: DiscriminatorDecl,
    pub variants: Vec<VariantDecl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorDecl {
    /// Property id; defaults to the union's name lower-cased.
    pub id: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    /// Input variable name; defaults to the discriminator id.
    pub binding: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDecl {
    pub tag: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub ignore: bool,
}

// =============================================================================
// FIELDS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: Option<String>,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub example_value: Option<String>,
    pub group: Option<String>,
    pub feel: Option<FeelMode>,
    /// Overrides the inferred property kind. On a structured field this
    /// turns the field into a single leaf.
    pub property_type: Option<PropertyType>,
    pub choices: Option<Vec<ChoiceDecl>>,
    pub optional: Option<bool>,
    pub constraints: Option<ConstraintsDecl>,
    pub default_value: Option<DefaultValueDecl>,
    #[serde(default)]
    pub ignore: bool,
    pub binding: Option<BindingDecl>,
    pub condition: Option<ConditionDecl>,
    /// Do not add this field's name as a path segment of nested properties.
    #[serde(default)]
    pub flatten: bool,
}

impl FieldDecl {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        FieldDecl {
            name: Some(name.to_string()),
            field_type,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldType {
    #[default]
    String,
    Text,
    Boolean,
    Number,
    Date,
    /// Arbitrary JSON object.
    Object,
    List,
    Map,
    Enum { choices: Vec<ChoiceDecl> },
    Structured {
        #[serde(rename = "type")]
        type_name: String,
    },
}

impl FieldType {
    pub fn structured(type_name: &str) -> Self {
        FieldType::Structured {
            type_name: type_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceDecl {
    pub value: String,
    pub label: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeelMode {
    Optional,
    Required,
    Disabled,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    String,
    Text,
    Boolean,
    Number,
    Dropdown,
    Hidden,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintsDecl {
    #[serde(default)]
    pub not_empty: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<PatternDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDecl {
    pub value: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultValueDecl {
    /// Raw literal as written in the declaration.
    pub value: String,
    #[serde(rename = "type", default)]
    pub value_type: DefaultValueType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultValueType {
    #[default]
    String,
    Boolean,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BindingDecl {
    /// Relative to the enclosing path, like the property id.
    InputVariable { name: String },
    /// Absolute path into a composite input object.
    NestedPath { path: String },
    TaskHeader { key: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionDecl {
    #[serde(default)]
    pub property: String,
    pub equals: Option<ConditionLiteral>,
    pub one_of: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub all_match: Option<Vec<ConditionDecl>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionLiteral {
    Bool(bool),
    String(String),
}

impl ConditionLiteral {
    pub fn as_key(&self) -> String {
        match self {
            ConditionLiteral::Bool(b) => b.to_string(),
            ConditionLiteral::String(s) => s.clone(),
        }
    }
}
