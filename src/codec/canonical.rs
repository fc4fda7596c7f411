//! Canonical text rendering of a graph or framework.
//!
//! Output is one statement per line: arguments first, then relations. Weights use the shortest
//! float form that round-trips (`0.5`, `1`), so re-parsing the output reproduces the same
//! weights exactly.

use std::fmt::Write;

use crate::{framework::Framework, graph::ArgGraph, properties::RelationKind};

fn write_argument(out: &mut String, id: &str, weight: Option<f64>) -> std::fmt::Result {
    match weight {
        Some(weight) => write!(out, "arg({id},{weight})."),
        None => write!(out, "arg({id})."),
    }
}

fn write_relation(
    out: &mut String,
    kind: RelationKind,
    source: &str,
    target: &str,
    weight: Option<f64>,
) -> std::fmt::Result {
    let keyword = kind.keyword();
    match weight {
        Some(weight) => write!(out, "{keyword}({source},{target},{weight})."),
        None => write!(out, "{keyword}({source},{target})."),
    }
}

fn join(lines: Vec<String>) -> String {
    lines.join("\n")
}

/// Arguments in insertion order, then relations in id order.
pub fn serialize_graph(graph: &ArgGraph) -> Result<String, std::fmt::Error> {
    let mut lines = Vec::with_capacity(graph.argument_count() + graph.relation_count());
    for argument in graph.arguments() {
        let mut line = String::new();
        write_argument(&mut line, &argument.id, argument.weight)?;
        lines.push(line);
    }
    for relation in graph.relations() {
        let mut line = String::new();
        write_relation(
            &mut line,
            relation.kind,
            &relation.source,
            &relation.target,
            relation.weight,
        )?;
        lines.push(line);
    }
    Ok(join(lines))
}

/// Arguments in declaration order, then attacks, then supports.
pub fn serialize_framework(framework: &Framework) -> Result<String, std::fmt::Error> {
    let mut lines = Vec::new();
    for argument in framework.arguments() {
        let mut line = String::new();
        write_argument(&mut line, &argument.id, argument.weight)?;
        lines.push(line);
    }
    for relation in framework.relations() {
        let mut line = String::new();
        write_relation(
            &mut line,
            relation.kind,
            &relation.source,
            &relation.target,
            relation.weight,
        )?;
        lines.push(line);
    }
    Ok(join(lines))
}
