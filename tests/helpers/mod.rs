#![allow(dead_code)]

use element_template_generator::error::GeneratorError;
use element_template_generator::parse::types::*;

// =============================================================================
// Declaration builders
// =============================================================================

pub fn field(name: &str, field_type: FieldType) -> FieldDecl {
    FieldDecl::new(name, field_type)
}

pub fn string(name: &str) -> FieldDecl {
    field(name, FieldType::String)
}

pub fn structured(name: &str, type_name: &str) -> FieldDecl {
    field(name, FieldType::structured(type_name))
}

pub fn grouped(mut field: FieldDecl, group: &str) -> FieldDecl {
    field.group = Some(group.into());
    field
}

pub fn strukt(name: &str, fields: Vec<FieldDecl>) -> TypeDecl {
    TypeDecl::Struct(StructDecl {
        name: name.into(),
        fields,
    })
}

pub fn variant(tag: &str, type_name: &str) -> VariantDecl {
    VariantDecl {
        tag: tag.into(),
        label: None,
        type_name: type_name.into(),
        default: false,
        ignore: false,
    }
}

pub fn union(name: &str, discriminator_id: Option<&str>, variants: Vec<VariantDecl>) -> TypeDecl {
    TypeDecl::Union(UnionDecl {
        name: name.into(),
        discriminator: DiscriminatorDecl {
            id: discriminator_id.map(String::from),
            ..Default::default()
        },
        variants,
    })
}

pub fn group(id: &str, label: &str) -> GroupDeclaration {
    GroupDeclaration {
        id: id.into(),
        label: label.into(),
        tooltip: None,
        open_by_default: None,
    }
}

pub fn condition_equals(property: &str, value: &str) -> ConditionDecl {
    ConditionDecl {
        property: property.into(),
        equals: Some(ConditionLiteral::String(value.into())),
        ..Default::default()
    }
}

/// Definition whose input type is the first type given.
pub fn definition(types: Vec<TypeDecl>) -> ConnectorDefinition {
    ConnectorDefinition {
        template: TemplateDeclaration {
            id: "io.example.test.v1".into(),
            name: "Test connector".into(),
            task_type: "io.example:test:1".into(),
            version: 1,
            description: None,
            documentation_ref: None,
            element_type: ElementTypeDeclaration::default(),
        },
        property_groups: vec![],
        input: types.first().map(|t| t.name().to_string()).unwrap_or_default(),
        types,
    }
}

// =============================================================================
// Scenarios
// =============================================================================

/// `auth` field over a two-variant union: basic{username,password}, token{token}.
pub fn auth_definition() -> ConnectorDefinition {
    definition(vec![
        strukt("Request", vec![structured("auth", "Authentication")]),
        union(
            "Authentication",
            Some("authType"),
            vec![variant("basic", "BasicAuth"), variant("token", "TokenAuth")],
        ),
        strukt("BasicAuth", vec![string("username"), string("password")]),
        strukt("TokenAuth", vec![string("token")]),
    ])
}

/// `bucket` and `key`, both in group `deleteObject`.
pub fn delete_object_definition() -> ConnectorDefinition {
    definition(vec![strukt(
        "DeleteObject",
        vec![
            grouped(string("bucket"), "deleteObject"),
            grouped(string("key"), "deleteObject"),
        ],
    )])
}

// =============================================================================
// Assertions
// =============================================================================

pub fn codes(errors: &[GeneratorError]) -> Vec<&str> {
    errors.iter().map(|e| e.code()).collect()
}
