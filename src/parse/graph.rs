//! petgraph-based directed graph of type references.

use std::collections::{HashMap, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{ConnectorDefinition, FieldDecl, FieldType, TypeDecl};
use crate::error::GeneratorError;
use crate::lower::label::derive_name_from_label;

/// How one type reaches another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    /// Field name or variant tag that holds the reference.
    pub via: String,
    /// Path segment the reference adds to nested property ids. Union
    /// variants and flattened fields add none.
    pub segment: Option<String>,
}

pub struct TypeGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub type_indices: HashMap<String, NodeIndex>,
    pub root: NodeIndex,
}

impl TypeGraph {
    pub fn build(definition: &ConnectorDefinition) -> Result<Self, Vec<GeneratorError>> {
        let mut graph = DiGraph::new();
        let mut type_indices = HashMap::new();
        let mut errors = Vec::new();

        // Add all types
        for decl in &definition.types {
            let name = decl.name().to_string();
            if type_indices.contains_key(&name) {
                errors.push(GeneratorError::parse(
                    "P002",
                    format!("Type '{}' is declared more than once", name),
                ));
                continue;
            }
            let idx = graph.add_node(name.clone());
            type_indices.insert(name, idx);
        }

        // Add reference edges. References to unknown types are reported by the
        // walker, which knows the full property path.
        for decl in &definition.types {
            let Some(&source) = type_indices.get(decl.name()) else {
                continue;
            };
            for label_and_target in edge_labels(decl) {
                let (label, target) = label_and_target;
                if let Some(&t) = type_indices.get(target) {
                    graph.add_edge(source, t, label);
                }
            }
        }

        let root = match type_indices.get(&definition.input) {
            Some(&idx) => Some(idx),
            None => {
                errors.push(GeneratorError::parse(
                    "P003",
                    format!("Input type '{}' is not declared", definition.input),
                ));
                None
            }
        };

        match root {
            Some(root) if errors.is_empty() => Ok(TypeGraph {
                graph,
                type_indices,
                root,
            }),
            _ => Err(errors),
        }
    }

    pub fn type_name(&self, idx: NodeIndex) -> &str {
        self.graph[idx].as_str()
    }

    /// Shortest dotted property path from the input type to each reachable
    /// type. The input type maps to the empty path.
    pub fn paths_from_root(&self) -> HashMap<NodeIndex, String> {
        let mut paths = HashMap::new();
        let mut queue = VecDeque::new();
        paths.insert(self.root, String::new());
        queue.push_back(self.root);

        while let Some(idx) = queue.pop_front() {
            let base = paths[&idx].clone();
            for edge in self.graph.edges(idx) {
                let target = edge.target();
                if paths.contains_key(&target) {
                    continue;
                }
                paths.insert(target, join_path(&base, edge.weight().segment.as_deref()));
                queue.push_back(target);
            }
        }

        paths
    }
}

/// Append an optional segment to a dotted path.
pub fn join_path(base: &str, segment: Option<&str>) -> String {
    match segment {
        None => base.to_string(),
        Some(s) if base.is_empty() => s.to_string(),
        Some(s) => format!("{}.{}", base, s),
    }
}

/// Name a field contributes to property ids: its trimmed `name`, else one
/// derived from its label.
pub fn field_name(field: &FieldDecl) -> Option<String> {
    match field.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => field.label.as_deref().and_then(derive_name_from_label),
    }
}

fn edge_labels(decl: &TypeDecl) -> Vec<(EdgeLabel, &str)> {
    match decl {
        TypeDecl::Struct(s) => s
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.ignore && f.property_type.is_none())
            .filter_map(|(index, f)| match &f.field_type {
                FieldType::Structured { type_name } => {
                    let via = field_name(f).unwrap_or_else(|| format!("<field {}>", index));
                    let segment = if f.flatten { None } else { Some(via.clone()) };
                    Some((EdgeLabel { via, segment }, type_name.as_str()))
                }
                _ => None,
            })
            .collect(),
        TypeDecl::Union(u) => u
            .variants
            .iter()
            .filter(|v| !v.ignore)
            .map(|v| {
                (
                    EdgeLabel {
                        via: v.tag.clone(),
                        segment: None,
                    },
                    v.type_name.as_str(),
                )
            })
            .collect(),
    }
}
