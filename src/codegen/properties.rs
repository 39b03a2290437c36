//! Property descriptors → element-template property objects.

use serde::Serialize;

use crate::ir::types::*;

use super::value::TemplateValue;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TemplateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub binding: TemplateBinding,
    #[serde(rename = "type")]
    pub property_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feel: Option<FeelMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<TemplateCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TemplateBinding {
    #[serde(rename = "zeebe:input")]
    Input { name: String },
    #[serde(rename = "zeebe:taskHeader")]
    TaskHeader { key: String },
    #[serde(rename = "zeebe:taskDefinition")]
    TaskDefinition { property: String },
}

impl From<&Binding> for TemplateBinding {
    fn from(binding: &Binding) -> Self {
        match binding.kind {
            BindingKind::InputVariable | BindingKind::NestedPath => TemplateBinding::Input {
                name: binding.target.clone(),
            },
            BindingKind::TaskHeader => TemplateBinding::TaskHeader {
                key: binding.target.clone(),
            },
        }
    }
}

/// Hidden property carrying the job type the connector's worker polls for.
pub fn task_definition_property(task_type: &str) -> TemplateProperty {
    TemplateProperty {
        id: None,
        label: None,
        description: None,
        tooltip: None,
        optional: None,
        value: Some(TemplateValue::String(task_type.to_string())),
        group: None,
        binding: TemplateBinding::TaskDefinition {
            property: "type".into(),
        },
        property_type: PropertyKind::Hidden.type_name(),
        feel: None,
        constraints: None,
        condition: None,
        choices: None,
    }
}

/// One condition is written as is; a conjunction as `allMatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TemplateCondition {
    Single(Condition),
    AllMatch {
        #[serde(rename = "allMatch")]
        all_match: Vec<Condition>,
    },
}

impl TemplateCondition {
    fn from_conjunction(conditions: &[Condition]) -> Option<Self> {
        match conditions {
            [] => None,
            [single] => Some(TemplateCondition::Single(single.clone())),
            all => Some(TemplateCondition::AllMatch {
                all_match: all.to_vec(),
            }),
        }
    }
}

pub fn template_property(property: &PropertyDescriptor) -> TemplateProperty {
    let choices = match &property.kind {
        PropertyKind::Dropdown { choices } => Some(choices.clone()),
        _ => None,
    };

    TemplateProperty {
        id: Some(property.id.clone()),
        label: Some(property.label.clone()),
        description: property.description.clone(),
        tooltip: property.tooltip.clone(),
        optional: property.optional,
        value: property.default_value.as_ref().map(TemplateValue::from),
        group: property.group.clone(),
        binding: TemplateBinding::from(&property.binding),
        property_type: property.kind.type_name(),
        feel: property.feel,
        constraints: property.constraints.clone(),
        condition: TemplateCondition::from_conjunction(&property.conditions),
        choices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> PropertyDescriptor {
        PropertyDescriptor {
            id: "auth.username".into(),
            label: "Username".into(),
            description: None,
            tooltip: None,
            example_value: None,
            group: Some("authentication".into()),
            kind: PropertyKind::String,
            feel: Some(FeelMode::Optional),
            optional: None,
            constraints: None,
            default_value: None,
            binding: Binding::input("auth.username"),
            conditions: vec![Condition::equals("auth.authType", "basic")],
        }
    }

    #[test]
    fn single_condition_is_inlined() {
        let json = serde_json::to_value(template_property(&descriptor())).expect("serializes");
        insta::assert_json_snapshot!(json, @r###"
        {
          "binding": {
            "name": "auth.username",
            "type": "zeebe:input"
          },
          "condition": {
            "equals": "basic",
            "property": "auth.authType"
          },
          "feel": "optional",
          "group": "authentication",
          "id": "auth.username",
          "label": "Username",
          "type": "String"
        }
        "###);
    }

    #[test]
    fn conjunction_becomes_all_match() {
        let mut property = descriptor();
        property.conditions.push(Condition::IsActive {
            property: "auth".into(),
            is_active: true,
        });
        property.binding = Binding::task_header("user");
        let rendered = template_property(&property);
        assert_eq!(
            rendered.binding,
            TemplateBinding::TaskHeader { key: "user".into() }
        );
        let json = serde_json::to_value(&rendered.condition).expect("serializes");
        assert_eq!(json["allMatch"][1]["isActive"], serde_json::json!(true));
    }

    #[test]
    fn task_definition_is_hidden_and_unlabelled() {
        let json = serde_json::to_value(task_definition_property("io.example:s3:1"))
            .expect("serializes");
        insta::assert_json_snapshot!(json, @r###"
        {
          "binding": {
            "property": "type",
            "type": "zeebe:taskDefinition"
          },
          "type": "Hidden",
          "value": "io.example:s3:1"
        }
        "###);
    }
}
