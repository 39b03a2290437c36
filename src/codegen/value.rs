//! Property values rendered with their declared literal.

use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::ir::types::{DefaultValue, DefaultValueType};

/// A `value` field of an element-template property. Numbers keep the
/// literal the definition declared (`1.50` stays `1.50`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    String(String),
    Boolean(bool),
    Number(String),
}

impl From<&DefaultValue> for TemplateValue {
    fn from(value: &DefaultValue) -> Self {
        match value.value_type {
            DefaultValueType::String => TemplateValue::String(value.raw.clone()),
            DefaultValueType::Boolean => TemplateValue::Boolean(value.raw.trim() == "true"),
            DefaultValueType::Number => TemplateValue::Number(value.raw.trim().to_string()),
        }
    }
}

impl Serialize for TemplateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TemplateValue::String(s) => serializer.serialize_str(s),
            TemplateValue::Boolean(b) => serializer.serialize_bool(*b),
            TemplateValue::Number(raw) => RawValue::from_string(raw.clone())
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}
