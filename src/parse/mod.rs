//! Parse phase: JSON → connector definition + type reference graph.

pub mod graph;
pub mod types;

pub use graph::TypeGraph;
pub use types::*;

use crate::error::GeneratorError;

/// Deserialize a connector definition JSON string.
pub fn parse(json: &str) -> Result<ConnectorDefinition, Vec<GeneratorError>> {
    let definition = serde_json::from_str::<ConnectorDefinition>(json).map_err(|e| {
        vec![GeneratorError::parse(
            "P001",
            format!("Failed to parse connector definition JSON: {}", e),
        )]
    })?;
    tracing::debug!(
        template = %definition.template.id,
        types = definition.types.len(),
        "definition parsed"
    );
    Ok(definition)
}

/// Parse JSON and build the type graph in one step.
pub fn parse_and_build(json: &str) -> Result<(ConnectorDefinition, TypeGraph), Vec<GeneratorError>> {
    let definition = parse(json)?;
    let graph = TypeGraph::build(&definition)?;
    Ok((definition, graph))
}
