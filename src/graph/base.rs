//! ArgGraph: the live, mutable argumentation graph.
//!
//! Arguments and relations live in a petgraph [`StableDiGraph`] arena. Two indices map the
//! external identifiers (canonical argument ids, [`RelationId`]s) onto arena slots, and the
//! [`EdgeIdGenerator`] that numbers relations travels with the graph it numbers.

use petgraph::{
    stable_graph::{EdgeIndex, NodeIndex, StableDiGraph},
    visit::EdgeRef,
    Direction,
};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::DesignerError,
    event::GraphEvent,
    properties::{
        canonical_id, Argument, EdgeIdGenerator, Relation, RelationId, RelationKey, RelationKind,
    },
};

#[derive(Debug, Clone, Default)]
pub struct ArgGraph {
    graph: StableDiGraph<Argument, Relation>,
    arguments: BTreeMap<String, NodeIndex>,
    // Insertion order; the arena reuses vacant slots so its own order is not stable.
    order: Vec<NodeIndex>,
    relations: BTreeMap<RelationId, EdgeIndex>,
    edge_ids: EdgeIdGenerator,
}

impl ArgGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Lookup is case-insensitive.
    pub fn argument(&self, id: &str) -> Option<&Argument> {
        self.arguments
            .get(&canonical_id(id))
            .map(|idx| &self.graph[*idx])
    }

    pub fn argument_mut(&mut self, id: &str) -> Option<&mut Argument> {
        let idx = *self.arguments.get(&canonical_id(id))?;
        self.graph.node_weight_mut(idx)
    }

    pub fn contains_argument(&self, id: &str) -> bool {
        self.arguments.contains_key(&canonical_id(id))
    }

    /// Arguments in insertion order.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.order.iter().map(|idx| &self.graph[*idx])
    }

    /// Arguments in arena order, for visual-only updates.
    pub fn arguments_mut(&mut self) -> impl Iterator<Item = &mut Argument> {
        self.graph.node_weights_mut()
    }

    pub fn relation(&self, id: RelationId) -> Option<&Relation> {
        self.relations.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Relations in id order, which is also creation order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values().map(|idx| &self.graph[*idx])
    }

    pub fn relation_ids(&self) -> impl Iterator<Item = RelationId> + '_ {
        self.relations.keys().copied()
    }

    pub fn find_relation(&self, key: &RelationKey) -> Option<RelationId> {
        let source = *self.arguments.get(&key.source)?;
        let target = *self.arguments.get(&key.target)?;
        self.graph
            .edges_directed(source, Direction::Outgoing)
            .find(|edge| edge.target() == target && edge.weight().kind == key.kind)
            .map(|edge| edge.weight().id)
    }

    /// Ids of every relation touching `id`, in either direction.
    pub fn incident_relations(&self, id: &str) -> Vec<RelationId> {
        let Some(idx) = self.arguments.get(&canonical_id(id)) else {
            return vec![];
        };
        let ids: BTreeSet<RelationId> = self
            .graph
            .edges_directed(*idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(*idx, Direction::Incoming))
            .map(|edge| edge.weight().id)
            .collect();
        ids.into_iter().collect()
    }

    /// The number the next generated relation id will carry.
    pub fn next_relation_number(&self) -> u64 {
        self.edge_ids.peek()
    }

    /// Restart relation numbering after the highest id currently in the graph.
    pub fn reseed_relation_ids(&mut self) {
        let in_use: Vec<RelationId> = self.relations.keys().copied().collect();
        self.edge_ids.reseed(in_use);
    }

    pub fn insert_argument(&mut self, mut argument: Argument) -> Result<GraphEvent, DesignerError> {
        argument.id = canonical_id(&argument.id);
        if self.arguments.contains_key(&argument.id) {
            return Err(DesignerError::DuplicateArgument(argument.id));
        }
        let id = argument.id.clone();
        let idx = self.graph.add_node(argument);
        self.arguments.insert(id.clone(), idx);
        self.order.push(idx);
        Ok(GraphEvent::ArgumentAdded(id))
    }

    /// Remove an argument together with its incident relations.
    pub fn remove_argument(&mut self, id: &str) -> Result<Vec<GraphEvent>, DesignerError> {
        let id = canonical_id(id);
        let Some(idx) = self.arguments.get(&id).copied() else {
            return Err(DesignerError::NotFound(format!("argument '{id}'")));
        };
        let mut events = Vec::new();
        for relation_id in self.incident_relations(&id) {
            events.push(self.remove_relation(relation_id)?);
        }
        self.graph.remove_node(idx);
        self.arguments.remove(&id);
        self.order.retain(|other| *other != idx);
        events.push(GraphEvent::ArgumentRemoved(id));
        Ok(events)
    }

    /// Returns `None` when the weight is unchanged.
    pub fn set_argument_weight(&mut self, id: &str, weight: Option<f64>) -> Option<GraphEvent> {
        let argument = self.argument_mut(id)?;
        if argument.weight == weight {
            return None;
        }
        argument.weight = weight;
        Some(GraphEvent::ArgumentUpdated(argument.id.clone()))
    }

    /// Give an argument a new id, keeping its position, weight, description and relations.
    pub fn rename_argument(
        &mut self,
        id: &str,
        new_id: &str,
    ) -> Result<Vec<GraphEvent>, DesignerError> {
        let (id, new_id) = (canonical_id(id), canonical_id(new_id));
        if id == new_id {
            return Ok(vec![]);
        }
        if self.arguments.contains_key(&new_id) {
            return Err(DesignerError::DuplicateArgument(new_id));
        }
        let Some(old_idx) = self.arguments.get(&id).copied() else {
            return Err(DesignerError::NotFound(format!("argument '{id}'")));
        };

        let mut renamed = self.graph[old_idx].clone();
        renamed.id = new_id.clone();
        let new_idx = self.graph.add_node(renamed);
        self.arguments.insert(new_id.clone(), new_idx);
        self.order.push(new_idx);

        let mut events = vec![GraphEvent::ArgumentRenamed(id.clone(), new_id.clone())];
        for relation_id in self.incident_relations(&id) {
            let Some(edge_idx) = self.relations.get(&relation_id).copied() else {
                continue;
            };
            let Some(mut relation) = self.graph.remove_edge(edge_idx) else {
                continue;
            };
            if relation.source == id {
                relation.source = new_id.clone();
            }
            if relation.target == id {
                relation.target = new_id.clone();
            }
            self.attach_relation(relation)?;
            events.push(GraphEvent::RelationMoved(relation_id));
        }

        self.graph.remove_node(old_idx);
        self.arguments.remove(&id);
        self.order.retain(|other| *other != old_idx);
        Ok(events)
    }

    /// Insert a relation under a freshly generated id.
    pub fn insert_relation(
        &mut self,
        kind: RelationKind,
        source: &str,
        target: &str,
        weight: Option<f64>,
    ) -> Result<(RelationId, GraphEvent), DesignerError> {
        let key = RelationKey::new(kind, canonical_id(source), canonical_id(target));
        for endpoint in [&key.source, &key.target] {
            if !self.arguments.contains_key(endpoint) {
                return Err(DesignerError::NotFound(format!("argument '{endpoint}'")));
            }
        }
        if self.find_relation(&key).is_some() {
            return Err(DesignerError::DuplicateRelation(key.to_string()));
        }
        let id = self.edge_ids.generate();
        self.attach_relation(Relation {
            id,
            source: key.source,
            target: key.target,
            kind,
            weight,
        })?;
        Ok((id, GraphEvent::RelationAdded(id)))
    }

    pub fn remove_relation(&mut self, id: RelationId) -> Result<GraphEvent, DesignerError> {
        let Some(edge_idx) = self.relations.remove(&id) else {
            return Err(DesignerError::NotFound(format!("relation '{id}'")));
        };
        self.graph.remove_edge(edge_idx);
        Ok(GraphEvent::RelationRemoved(id))
    }

    /// Returns `None` when the weight is unchanged.
    pub fn set_relation_weight(
        &mut self,
        id: RelationId,
        weight: Option<f64>,
    ) -> Option<GraphEvent> {
        let edge_idx = *self.relations.get(&id)?;
        let relation = self.graph.edge_weight_mut(edge_idx)?;
        if relation.weight == weight {
            return None;
        }
        relation.weight = weight;
        Some(GraphEvent::RelationUpdated(id))
    }

    pub fn set_relation_kind(
        &mut self,
        id: RelationId,
        kind: RelationKind,
    ) -> Result<Option<GraphEvent>, DesignerError> {
        let Some(relation) = self.relation(id) else {
            return Err(DesignerError::NotFound(format!("relation '{id}'")));
        };
        if relation.kind == kind {
            return Ok(None);
        }
        let key = RelationKey::new(kind, relation.source.clone(), relation.target.clone());
        if self.find_relation(&key).is_some() {
            return Err(DesignerError::DuplicateRelation(key.to_string()));
        }
        let edge_idx = self.relations[&id];
        if let Some(relation) = self.graph.edge_weight_mut(edge_idx) {
            relation.kind = kind;
        }
        Ok(Some(GraphEvent::RelationUpdated(id)))
    }

    /// Swap source and target, keeping the relation id.
    pub fn reverse_relation(&mut self, id: RelationId) -> Result<GraphEvent, DesignerError> {
        let Some(relation) = self.relation(id) else {
            return Err(DesignerError::NotFound(format!("relation '{id}'")));
        };
        let reversed = RelationKey::new(
            relation.kind,
            relation.target.clone(),
            relation.source.clone(),
        );
        if let Some(existing) = self.find_relation(&reversed) {
            if existing != id {
                return Err(DesignerError::DuplicateRelation(reversed.to_string()));
            }
        }
        let edge_idx = self.relations[&id];
        let Some(mut relation) = self.graph.remove_edge(edge_idx) else {
            return Err(DesignerError::Invariant(format!(
                "relation '{id}' indexed without an arena slot"
            )));
        };
        std::mem::swap(&mut relation.source, &mut relation.target);
        self.attach_relation(relation)?;
        Ok(GraphEvent::RelationMoved(id))
    }

    pub fn clear(&mut self) {
        *self = ArgGraph::default();
    }

    /// Check the structural invariants, returning a description of every violation.
    pub fn built_in_test(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (id, idx) in self.arguments.iter() {
            match self.graph.node_weight(*idx) {
                Some(argument) if &argument.id != id => {
                    errors.push(format!("argument index '{id}' points at '{}'", argument.id))
                }
                Some(argument) if argument.id != canonical_id(&argument.id) => {
                    errors.push(format!("argument id '{}' is not canonical", argument.id))
                }
                None => errors.push(format!("argument index '{id}' points at a vacant slot")),
                _ => {}
            }
        }
        if self.order.len() != self.arguments.len() {
            errors.push(format!(
                "argument order holds {} entries for {} arguments",
                self.order.len(),
                self.arguments.len()
            ));
        }
        let mut keys = BTreeSet::new();
        for relation in self.relations() {
            for endpoint in [&relation.source, &relation.target] {
                if !self.arguments.contains_key(endpoint) {
                    errors.push(format!(
                        "relation {} references missing argument '{endpoint}'",
                        relation.id
                    ));
                }
            }
            if !keys.insert(relation.key()) {
                errors.push(format!("duplicate relation {}", relation.key()));
            }
            if relation.id.number() >= self.edge_ids.peek() {
                errors.push(format!(
                    "relation {} is not below the id counter {}",
                    relation.id,
                    self.edge_ids.peek()
                ));
            }
        }
        if self.graph.edge_count() != self.relations.len() {
            errors.push(format!(
                "arena holds {} edges for {} indexed relations",
                self.graph.edge_count(),
                self.relations.len()
            ));
        }
        errors
    }

    fn attach_relation(&mut self, relation: Relation) -> Result<(), DesignerError> {
        let (Some(source), Some(target)) = (
            self.arguments.get(&relation.source).copied(),
            self.arguments.get(&relation.target).copied(),
        ) else {
            return Err(DesignerError::Invariant(format!(
                "relation {} endpoints {} -> {} are not both present",
                relation.id, relation.source, relation.target
            )));
        };
        let id = relation.id;
        let edge_idx = self.graph.add_edge(source, target, relation);
        self.relations.insert(id, edge_idx);
        Ok(())
    }
}
