//! Framework classification.
//!
//! The category of a framework depends only on which optional features the live graph uses:
//!
//! | support | node weight | edge weight | category | display mode    |
//! |---------|-------------|-------------|----------|-----------------|
//! | no      | no          | no          | AF       | extension-based |
//! | yes     | no          | no          | BAF      | extension-based |
//! | no      | no          | yes         | WAF      | gradual         |
//! | yes     | no          | yes         | WBAF     | gradual         |
//! | any     | yes         | no          | QBAF     | gradual         |
//! | any     | yes         | yes         | WQBAF    | gradual         |

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{graph::ArgGraph, properties::RelationKind};

#[derive(EnumSetType, Debug, Serialize, Deserialize)]
pub enum FrameworkFeature {
    SupportEdges,
    NodeWeights,
    EdgeWeights,
}

pub type FeatureSet = EnumSet<FrameworkFeature>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameworkCategory {
    Af,
    Baf,
    Waf,
    Wbaf,
    Qbaf,
    Wqbaf,
}

impl FrameworkCategory {
    pub fn from_features(features: FeatureSet) -> Self {
        use FrameworkFeature::*;
        let node = features.contains(NodeWeights);
        let edge = features.contains(EdgeWeights);
        let support = features.contains(SupportEdges);
        match (node, edge, support) {
            (true, true, _) => FrameworkCategory::Wqbaf,
            (true, false, _) => FrameworkCategory::Qbaf,
            (false, true, true) => FrameworkCategory::Wbaf,
            (false, true, false) => FrameworkCategory::Waf,
            (false, false, true) => FrameworkCategory::Baf,
            (false, false, false) => FrameworkCategory::Af,
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        match self {
            FrameworkCategory::Af | FrameworkCategory::Baf => DisplayMode::ExtensionBased,
            _ => DisplayMode::Gradual,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FrameworkCategory::Af => "AF",
            FrameworkCategory::Baf => "BAF",
            FrameworkCategory::Waf => "WAF",
            FrameworkCategory::Wbaf => "WBAF",
            FrameworkCategory::Qbaf => "QBAF",
            FrameworkCategory::Wqbaf => "WQBAF",
        }
    }
}

impl Display for FrameworkCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which family of semantics selector the presentation layer should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    ExtensionBased,
    Gradual,
}

impl Display for DisplayMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::ExtensionBased => write!(f, "extension-based"),
            DisplayMode::Gradual => write!(f, "gradual"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub features: FeatureSet,
    pub category: FrameworkCategory,
    pub mode: DisplayMode,
}

impl Display for Classification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.category, self.mode)
    }
}

pub fn features(graph: &ArgGraph) -> FeatureSet {
    let mut features = FeatureSet::new();
    if graph.arguments().any(|a| a.weight.is_some()) {
        features.insert(FrameworkFeature::NodeWeights);
    }
    for relation in graph.relations() {
        if relation.kind == RelationKind::Support {
            features.insert(FrameworkFeature::SupportEdges);
        }
        if relation.weight.is_some() {
            features.insert(FrameworkFeature::EdgeWeights);
        }
    }
    features
}

pub fn classify(graph: &ArgGraph) -> Classification {
    let features = features(graph);
    let category = FrameworkCategory::from_features(features);
    Classification {
        features,
        category,
        mode: category.display_mode(),
    }
}
