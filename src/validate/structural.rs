//! Declaration-level structural rules (S101–S104, S003, W003).

use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::{Bfs, EdgeRef};

use crate::error::{GenerationWarning, GeneratorError};
use crate::ir::types::is_synthetic_group;
use crate::parse::graph::{join_path, TypeGraph};
use crate::parse::types::{ConnectorDefinition, SUPPORTED_ELEMENT_TYPES};

/// Run all structural rules. Returns all errors found.
pub fn validate_structural(definition: &ConnectorDefinition, graph: &TypeGraph) -> Vec<GeneratorError> {
    let mut errors = Vec::new();

    s101_unique_group_ids(definition, &mut errors);
    s102_no_reserved_group_ids(definition, &mut errors);
    s103_task_type_present(definition, &mut errors);
    s104_supported_element_type(definition, &mut errors);
    s003_no_reference_cycles(graph, &mut errors);

    errors
}

fn s101_unique_group_ids(definition: &ConnectorDefinition, errors: &mut Vec<GeneratorError>) {
    let mut seen = HashSet::new();
    for group in &definition.property_groups {
        if !seen.insert(group.id.as_str()) {
            errors.push(GeneratorError::validate(
                "S101",
                format!("Property group '{}' is declared more than once", group.id),
                group.id.clone(),
            ));
        }
    }
}

fn s102_no_reserved_group_ids(definition: &ConnectorDefinition, errors: &mut Vec<GeneratorError>) {
    for group in &definition.property_groups {
        if is_synthetic_group(&group.id) {
            errors.push(GeneratorError::validate(
                "S102",
                format!(
                    "Property group id '{}' is reserved for generated properties",
                    group.id
                ),
                group.id.clone(),
            ));
        }
    }
}

fn s103_task_type_present(definition: &ConnectorDefinition, errors: &mut Vec<GeneratorError>) {
    if definition.template.task_type.trim().is_empty() {
        errors.push(GeneratorError::validate(
            "S103",
            format!("Template '{}' declares no connector type", definition.template.id),
            "type",
        ));
    }
}

fn s104_supported_element_type(definition: &ConnectorDefinition, errors: &mut Vec<GeneratorError>) {
    let element_type = &definition.template.element_type;
    if !SUPPORTED_ELEMENT_TYPES.contains(&element_type.element_type.as_str()) {
        errors.push(GeneratorError::validate(
            "S104",
            format!("Unsupported element type '{}'", element_type.element_type),
            "elementType",
        ));
    }
    if element_type.applies_to.is_empty() {
        errors.push(GeneratorError::validate(
            "S104",
            "Element type applies to no BPMN element",
            "elementType.appliesTo",
        ));
    }
}

/// Reports every strongly connected component reachable from the input
/// type. The path names the field that closes the cycle.
fn s003_no_reference_cycles(graph: &TypeGraph, errors: &mut Vec<GeneratorError>) {
    let paths = graph.paths_from_root();

    for scc in tarjan_scc(&graph.graph) {
        let members: HashSet<NodeIndex> = scc.iter().copied().collect();
        let cyclic = scc.len() > 1 || graph.graph.contains_edge(scc[0], scc[0]);
        if !cyclic {
            continue;
        }

        // Enter the cycle where the walk would first reach it.
        let Some(entry) = scc
            .iter()
            .filter(|idx| paths.contains_key(*idx))
            .min_by_key(|idx| (paths[*idx].len(), graph.type_name(**idx)))
            .copied()
        else {
            continue;
        };

        let closing = graph
            .graph
            .edges(entry)
            .filter(|e| members.contains(&e.target()))
            .min_by_key(|e| e.id().index());
        let path = join_path(
            &paths[&entry],
            closing.and_then(|e| e.weight().segment.as_deref()),
        );

        let mut names: Vec<&str> = scc.iter().map(|idx| graph.type_name(*idx)).collect();
        names.sort_unstable();

        errors.push(GeneratorError::validate(
            "S003",
            format!("Type reference cycle through [{}]", names.join(", ")),
            path,
        ));
    }
}

/// Types the walk can never reach from the input type.
pub fn w003_unreachable_types(graph: &TypeGraph) -> Vec<GenerationWarning> {
    let mut reachable = HashSet::new();
    let mut bfs = Bfs::new(&graph.graph, graph.root);
    while let Some(nx) = bfs.next(&graph.graph) {
        reachable.insert(nx);
    }

    graph
        .graph
        .node_indices()
        .filter(|idx| !reachable.contains(idx))
        .map(|idx| GenerationWarning::UnusedType {
            type_name: graph.type_name(idx).to_string(),
        })
        .collect()
}
