//! WASM entry points for a JavaScript build host.

use wasm_bindgen::prelude::*;

use crate::codegen;
use crate::error::GeneratorError;

/// Validate a connector definition JSON: parse + declaration checks.
/// Returns a JSON array of error objects.
#[wasm_bindgen]
pub fn validate_definition(json: &str) -> JsValue {
    let result = validate_definition_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_definition_inner(json: &str) -> Vec<ErrorDto> {
    let definition = match crate::parse::parse(json) {
        Ok(d) => d,
        Err(errors) => return errors.into_iter().map(ErrorDto::from).collect(),
    };

    let graph = match crate::parse::TypeGraph::build(&definition) {
        Ok(g) => g,
        Err(errors) => return errors.into_iter().map(ErrorDto::from).collect(),
    };

    let report = crate::validate::validate_definition(&definition, &graph);
    report.errors.into_iter().map(ErrorDto::from).collect()
}

/// Full pipeline: parse → validate → lower → IR validate → codegen.
/// Returns a JSON object with either `template` (success) or `errors` (failure).
#[wasm_bindgen]
pub fn generate_element_template(json: &str) -> JsValue {
    let result = generate_element_template_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn generate_element_template_inner(json: &str) -> GenerateResult {
    let generated = match crate::generate_from_json(json) {
        Ok(g) => g,
        Err(errors) => {
            return GenerateResult::Errors {
                errors: errors.into_iter().map(ErrorDto::from).collect(),
            };
        }
    };

    let document = codegen::codegen(&generated.template);
    match codegen::to_json(&document) {
        Ok(template) => GenerateResult::Success {
            template,
            warnings: generated.warnings.iter().map(|w| w.to_string()).collect(),
        },
        Err(e) => GenerateResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    path: Option<String>,
}

impl From<GeneratorError> for ErrorDto {
    fn from(e: GeneratorError) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            phase: e.phase().to_string(),
            path: e.path().map(String::from),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum GenerateResult {
    #[serde(rename = "success")]
    Success {
        template: String,
        warnings: Vec<String>,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
