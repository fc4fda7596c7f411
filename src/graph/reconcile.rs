//! Minimal-mutation reconciliation of a live [`ArgGraph`] against a parsed [`Framework`].

use std::collections::BTreeSet;

use crate::{
    error::DesignerError,
    event::GraphEvent,
    framework::Framework,
    properties::{Argument, Position, RelationKey},
};

use super::ArgGraph;

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub events: Vec<GraphEvent>,
}

impl Reconciliation {
    /// True when the graph already matched the framework.
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }

    pub fn added(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GraphEvent::ArgumentAdded(_) | GraphEvent::RelationAdded(_)))
            .count()
    }

    pub fn removed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GraphEvent::ArgumentRemoved(_) | GraphEvent::RelationRemoved(_)
                )
            })
            .count()
    }
}

/// Mutate `graph` until it holds exactly the arguments and relations of `framework`.
///
/// Surviving arguments keep their position and description; only weights are updated. New
/// arguments are placed where `placement` says. Surviving relations keep their ids, new ones get
/// fresh ids, and the id counter ends up past every id in use.
///
/// `framework` must come from the description parser: a relation endpoint missing from the
/// framework is a contract violation reported as [`DesignerError::Invariant`], before any
/// mutation happens.
#[tracing::instrument(skip_all)]
pub fn reconcile<F>(
    graph: &mut ArgGraph,
    framework: &Framework,
    mut placement: F,
) -> Result<Reconciliation, DesignerError>
where
    F: FnMut(&str) -> Position,
{
    for relation in framework.relations() {
        for endpoint in [&relation.source, &relation.target] {
            if !framework.contains_argument(endpoint) {
                return Err(DesignerError::Invariant(format!(
                    "relation {} references undeclared argument '{endpoint}'",
                    relation.key()
                )));
            }
        }
    }

    let mut events = Vec::new();

    // 1. Arguments no longer declared (incident relations go with them)
    let obsolete_arguments: Vec<String> = graph
        .arguments()
        .filter(|argument| !framework.contains_argument(&argument.id))
        .map(|argument| argument.id.clone())
        .collect();
    for id in obsolete_arguments {
        events.extend(graph.remove_argument(&id)?);
    }

    // 2. Relations no longer declared
    let wanted: BTreeSet<RelationKey> = framework.relations().map(|r| r.key()).collect();
    let obsolete_relations: Vec<_> = graph
        .relations()
        .filter(|relation| !wanted.contains(&relation.key()))
        .map(|relation| relation.id)
        .collect();
    for id in obsolete_relations {
        events.push(graph.remove_relation(id)?);
    }

    // 3. Upsert arguments
    for spec in framework.arguments() {
        if graph.contains_argument(&spec.id) {
            events.extend(graph.set_argument_weight(&spec.id, spec.weight));
        } else {
            let position = placement(&spec.id);
            events.push(graph.insert_argument(
                Argument::new(&spec.id)
                    .with_weight(spec.weight)
                    .at(position),
            )?);
        }
    }

    // 4. Upsert relations
    for spec in framework.relations() {
        match graph.find_relation(&spec.key()) {
            Some(id) => events.extend(graph.set_relation_weight(id, spec.weight)),
            None => {
                let (_, event) =
                    graph.insert_relation(spec.kind, &spec.source, &spec.target, spec.weight)?;
                events.push(event);
            }
        }
    }

    // 5. Never hand out an id at or below one in use
    graph.reseed_relation_ids();

    tracing::info!(
        "Reconciled graph: {} arguments, {} relations, {} changes",
        graph.argument_count(),
        graph.relation_count(),
        events.len()
    );
    Ok(Reconciliation { events })
}
