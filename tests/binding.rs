//! Binding resolution and collision detection through the full pipeline.

mod helpers;

use element_template_generator::error::{BindingNamespace, GeneratorError};
use element_template_generator::generate;
use element_template_generator::ir::*;
use element_template_generator::parse::types::*;
use helpers::*;

fn nested(name: &str, path: &str) -> FieldDecl {
    let mut f = string(name);
    f.binding = Some(BindingDecl::NestedPath { path: path.into() });
    f
}

#[test]
fn fields_compose_one_runtime_object() {
    let def = definition(vec![strukt(
        "Request",
        vec![nested("bucket", "action.bucket"), nested("key", "action.key")],
    )]);
    let template = generate(&def).unwrap().template;
    assert_eq!(
        template.property("bucket").unwrap().binding,
        Binding::nested_path("action.bucket")
    );
    assert_eq!(
        template.property("key").unwrap().binding,
        Binding::nested_path("action.key")
    );
}

#[test]
fn covisible_collision_fails() {
    let def = definition(vec![strukt(
        "Request",
        vec![nested("bucket", "action.bucket"), nested("container", "action.bucket")],
    )]);
    let errors = generate(&def).unwrap_err();
    assert_eq!(
        errors,
        vec![GeneratorError::BindingCollision {
            namespace: BindingNamespace::Input,
            target: "action.bucket".into(),
            first: "bucket".into(),
            second: "container".into(),
        }]
    );
}

#[test]
fn default_binding_collides_with_explicit_input() {
    let mut alias = string("alias");
    alias.binding = Some(BindingDecl::InputVariable {
        name: "url".into(),
    });
    let def = definition(vec![strukt("Request", vec![string("url"), alias])]);
    let errors = generate(&def).unwrap_err();
    assert_eq!(codes(&errors), vec!["B001"]);
    assert_eq!(errors[0].path(), Some("alias"));
}

#[test]
fn exclusive_variants_may_share_a_target() {
    let def = definition(vec![
        strukt("Request", vec![structured("auth", "Auth")]),
        union(
            "Auth",
            Some("authType"),
            vec![variant("apiKey", "ApiKey"), variant("bearer", "Bearer")],
        ),
        strukt("ApiKey", vec![nested("key", "auth.secret")]),
        strukt("Bearer", vec![nested("token", "auth.secret")]),
    ]);
    let template = generate(&def).unwrap().template;
    let sharing: Vec<&str> = template
        .properties()
        .filter(|p| p.binding.target == "auth.secret")
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(sharing, vec!["auth.key", "auth.token"]);
}

#[test]
fn variant_field_collides_with_unconditioned_field() {
    let def = definition(vec![
        strukt(
            "Request",
            vec![nested("secret", "auth.secret"), structured("auth", "Auth")],
        ),
        union("Auth", Some("authType"), vec![variant("apiKey", "ApiKey")]),
        strukt("ApiKey", vec![nested("key", "auth.secret")]),
    ]);
    let errors = generate(&def).unwrap_err();
    assert_eq!(codes(&errors), vec!["B001"]);
}

#[test]
fn synthetic_properties_bind_to_task_headers() {
    let template = generate(&delete_object_definition()).unwrap().template;
    for id in [RESULT_VARIABLE, RESULT_EXPRESSION, ERROR_EXPRESSION] {
        assert_eq!(template.property(id).unwrap().binding, Binding::task_header(id));
    }
}

#[test]
fn task_header_namespace_is_separate_from_inputs() {
    let mut header = string("retries");
    header.binding = Some(BindingDecl::TaskHeader {
        key: "url".into(),
    });
    let def = definition(vec![strukt("Request", vec![string("url"), header])]);
    let template = generate(&def).unwrap().template;
    assert_eq!(
        template.property("retries").unwrap().binding,
        Binding::task_header("url")
    );
}

#[test]
fn explicit_header_clashing_with_result_variable_fails() {
    let mut header = string("target");
    header.binding = Some(BindingDecl::TaskHeader {
        key: RESULT_VARIABLE.into(),
    });
    let def = definition(vec![strukt("Request", vec![header])]);
    let errors = generate(&def).unwrap_err();
    assert_eq!(
        errors,
        vec![GeneratorError::BindingCollision {
            namespace: BindingNamespace::TaskHeader,
            target: RESULT_VARIABLE.into(),
            first: "target".into(),
            second: RESULT_VARIABLE.into(),
        }]
    );
}

#[test]
fn every_collision_is_reported() {
    let def = definition(vec![strukt(
        "Request",
        vec![
            nested("a", "x"),
            nested("b", "x"),
            nested("c", "y"),
            nested("d", "y"),
        ],
    )]);
    let errors = generate(&def).unwrap_err();
    assert_eq!(codes(&errors), vec!["B001", "B001"]);
    assert!(errors.iter().all(GeneratorError::is_binding_collision));
}
