/// [crate::properties] contains the basic building blocks of an argumentation graph: arguments,
/// relations, their identifiers and their transient visual state.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::DesignerError;

/// Canonical form of an argument identifier. Identifiers compare case-insensitively, so the
/// graph, the parser and the overlay all key arguments by this lowercase form.
pub fn canonical_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Relation identifier, rendered as `rel_<N>`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelationId(u64);

pub const RELATION_ID_PREFIX: &str = "rel_";

impl RelationId {
    pub fn new(n: u64) -> Self {
        RelationId(n)
    }

    pub fn number(&self) -> u64 {
        self.0
    }
}

impl Display for RelationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", RELATION_ID_PREFIX, self.0)
    }
}

impl FromStr for RelationId {
    type Err = DesignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(RELATION_ID_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(RelationId)
            .ok_or_else(|| DesignerError::Serialization(format!("Invalid relation id '{s}'")))
    }
}

impl Serialize for RelationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Monotonic source of relation ids. Lives alongside the graph it numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIdGenerator {
    next: u64,
}

impl Default for EdgeIdGenerator {
    fn default() -> Self {
        EdgeIdGenerator { next: 1 }
    }
}

impl EdgeIdGenerator {
    pub fn generate(&mut self) -> RelationId {
        let id = RelationId(self.next);
        self.next += 1;
        id
    }

    /// The number the next generated id will carry.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Restart numbering after the highest id in use.
    pub fn reseed<I: IntoIterator<Item = RelationId>>(&mut self, in_use: I) {
        let max = in_use.into_iter().map(|id| id.0).max().unwrap_or(0);
        self.next = max + 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Attack,
    Support,
}

impl RelationKind {
    /// Statement keyword used by the textual description.
    pub fn keyword(&self) -> &'static str {
        match self {
            RelationKind::Attack => "att",
            RelationKind::Support => "support",
        }
    }

    pub fn opposite(&self) -> RelationKind {
        match self {
            RelationKind::Attack => RelationKind::Support,
            RelationKind::Support => RelationKind::Attack,
        }
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::Attack => write!(f, "attack"),
            RelationKind::Support => write!(f, "support"),
        }
    }
}

/// Logical identity of a relation. Two relations with the same key cannot coexist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationKey {
    pub kind: RelationKind,
    pub source: String,
    pub target: String,
}

impl RelationKey {
    pub fn new(kind: RelationKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        RelationKey {
            kind,
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Display for RelationKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({},{})", self.kind.keyword(), self.source, self.target)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Visual state of an argument, written only by the result overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeVisual {
    #[default]
    Default,
    In,
    Out,
    Undecided,
    /// Index into the strength color scale.
    Strength(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub id: String,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub position: Position,
    #[serde(skip)]
    pub strength: Option<f64>,
    #[serde(skip)]
    pub visual: NodeVisual,
}

impl Argument {
    pub fn new(id: &str) -> Self {
        Argument {
            id: canonical_id(id),
            weight: None,
            description: None,
            position: Position::default(),
            strength: None,
            visual: NodeVisual::Default,
        }
    }

    pub fn with_weight(mut self, weight: Option<f64>) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Drop any computed result annotation.
    pub fn clear_results(&mut self) {
        self.strength = None;
        self.visual = NodeVisual::Default;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
    pub weight: Option<f64>,
}

impl Relation {
    pub fn key(&self) -> RelationKey {
        RelationKey::new(self.kind, self.source.clone(), self.target.clone())
    }
}
