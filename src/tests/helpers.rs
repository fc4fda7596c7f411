//! Shared test utilities for graph and session testing

use crate::{
    graph::ArgGraph,
    properties::{Argument, RelationKind},
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Build a graph directly, bypassing the parser.
///
/// `arguments` are `(id, weight)` pairs; `relations` are `(kind, source, target, weight)`.
pub fn create_test_graph(
    arguments: &[(&str, Option<f64>)],
    relations: &[(RelationKind, &str, &str, Option<f64>)],
) -> ArgGraph {
    init_logging();
    let mut graph = ArgGraph::new();
    for (id, weight) in arguments {
        graph
            .insert_argument(Argument::new(id).with_weight(*weight))
            .expect("test arguments are unique");
    }
    for (kind, source, target, weight) in relations {
        graph
            .insert_relation(*kind, source, target, *weight)
            .expect("test relations reference test arguments");
    }
    graph
}
