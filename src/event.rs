use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::properties::RelationId;

/// A structural change applied to an [`crate::graph::ArgGraph`].
///
/// Mutations return the events they caused; the [`crate::sync::Session`] forwards them to an
/// optional listener channel and uses them to decide whether the description needs rewriting.
/// Overlay (visual) changes never produce events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphEvent {
    ArgumentAdded(String),
    /// Weight or description changed
    ArgumentUpdated(String),
    /// From id, to id
    ArgumentRenamed(String, String),
    ArgumentRemoved(String),
    RelationAdded(RelationId),
    /// Weight or kind changed
    RelationUpdated(RelationId),
    /// Endpoints changed (reversal or argument rename)
    RelationMoved(RelationId),
    RelationRemoved(RelationId),
}

impl GraphEvent {
    pub fn relation(&self) -> Option<RelationId> {
        match self {
            GraphEvent::RelationAdded(id)
            | GraphEvent::RelationUpdated(id)
            | GraphEvent::RelationMoved(id)
            | GraphEvent::RelationRemoved(id) => Some(*id),
            _ => None,
        }
    }

    pub fn argument(&self) -> Option<&str> {
        match self {
            GraphEvent::ArgumentAdded(id)
            | GraphEvent::ArgumentUpdated(id)
            | GraphEvent::ArgumentRemoved(id)
            | GraphEvent::ArgumentRenamed(_, id) => Some(id),
            _ => None,
        }
    }
}

impl Display for GraphEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            GraphEvent::ArgumentAdded(id) => write!(f, "ArgumentAdded({id})"),
            GraphEvent::ArgumentUpdated(id) => write!(f, "ArgumentUpdated({id})"),
            GraphEvent::ArgumentRenamed(from, to) => write!(f, "ArgumentRenamed({from} -> {to})"),
            GraphEvent::ArgumentRemoved(id) => write!(f, "ArgumentRemoved({id})"),
            GraphEvent::RelationAdded(id) => write!(f, "RelationAdded({id})"),
            GraphEvent::RelationUpdated(id) => write!(f, "RelationUpdated({id})"),
            GraphEvent::RelationMoved(id) => write!(f, "RelationMoved({id})"),
            GraphEvent::RelationRemoved(id) => write!(f, "RelationRemoved({id})"),
        }
    }
}
