//! The parsed, validated model of one argumentation framework.

use std::collections::BTreeMap;

use crate::{
    graph::ArgGraph,
    properties::{RelationKey, RelationKind},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    pub id: String,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationSpec {
    pub kind: RelationKind,
    pub source: String,
    pub target: String,
    pub weight: Option<f64>,
}

impl RelationSpec {
    pub fn key(&self) -> RelationKey {
        RelationKey::new(self.kind, self.source.clone(), self.target.clone())
    }
}

/// Arguments in first-declaration order plus attack and support lists.
///
/// Redeclaring an argument or a relation keeps its original position and overwrites the weight,
/// so ids are unique and no two relations share a `(kind, source, target)` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Framework {
    arguments: Vec<ArgumentSpec>,
    argument_index: BTreeMap<String, usize>,
    attacks: Vec<RelationSpec>,
    supports: Vec<RelationSpec>,
    relation_index: BTreeMap<RelationKey, usize>,
}

impl Framework {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the structural content of a live graph.
    pub fn from_graph(graph: &ArgGraph) -> Self {
        let mut framework = Framework::new();
        for argument in graph.arguments() {
            framework.declare_argument(&argument.id, argument.weight);
        }
        for relation in graph.relations() {
            framework.declare_relation(RelationSpec {
                kind: relation.kind,
                source: relation.source.clone(),
                target: relation.target.clone(),
                weight: relation.weight,
            });
        }
        framework
    }

    pub fn declare_argument(&mut self, id: &str, weight: Option<f64>) {
        match self.argument_index.get(id) {
            Some(idx) => self.arguments[*idx].weight = weight,
            None => {
                self.argument_index
                    .insert(id.to_string(), self.arguments.len());
                self.arguments.push(ArgumentSpec {
                    id: id.to_string(),
                    weight,
                });
            }
        }
    }

    pub fn declare_relation(&mut self, spec: RelationSpec) {
        let key = spec.key();
        let list = match spec.kind {
            RelationKind::Attack => &mut self.attacks,
            RelationKind::Support => &mut self.supports,
        };
        match self.relation_index.get(&key) {
            Some(idx) => list[*idx].weight = spec.weight,
            None => {
                self.relation_index.insert(key, list.len());
                list.push(spec);
            }
        }
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn argument(&self, id: &str) -> Option<&ArgumentSpec> {
        self.argument_index.get(id).map(|idx| &self.arguments[*idx])
    }

    pub fn contains_argument(&self, id: &str) -> bool {
        self.argument_index.contains_key(id)
    }

    pub fn attacks(&self) -> &[RelationSpec] {
        &self.attacks
    }

    pub fn supports(&self) -> &[RelationSpec] {
        &self.supports
    }

    /// Attacks first, then supports, each in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &RelationSpec> {
        self.attacks.iter().chain(self.supports.iter())
    }

    pub fn contains_relation(&self, key: &RelationKey) -> bool {
        self.relation_index.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Equality that ignores declaration order: same argument ids and weights, same relation
    /// keys and weights.
    pub fn same_structure(&self, other: &Framework) -> bool {
        let arguments = |fw: &Framework| {
            fw.arguments
                .iter()
                .map(|a| (a.id.clone(), a.weight))
                .collect::<BTreeMap<_, _>>()
        };
        let relations = |fw: &Framework| {
            fw.relations()
                .map(|r| (r.key(), r.weight))
                .collect::<BTreeMap<_, _>>()
        };
        arguments(self) == arguments(other) && relations(self) == relations(other)
    }
}
