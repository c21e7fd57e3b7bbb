//! Renderable evidence nodes and their expansion state.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Semantic node type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Dataset,
    Computation,
    Experiment,
    Software,
    Sample,
    Instrument,
    /// Synthetic fan-out node standing in for several input datasets.
    DatasetCollection,
    Other(String),
}

impl NodeKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "Dataset" => Self::Dataset,
            "Computation" => Self::Computation,
            "Experiment" => Self::Experiment,
            "Software" => Self::Software,
            "Sample" => Self::Sample,
            "Instrument" => Self::Instrument,
            "DatasetCollection" => Self::DatasetCollection,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Dataset => "Dataset",
            Self::Computation => "Computation",
            Self::Experiment => "Experiment",
            Self::Software => "Software",
            Self::Sample => "Sample",
            Self::Instrument => "Instrument",
            Self::DatasetCollection => "DatasetCollection",
            Self::Other(name) => name,
        }
    }

    /// Activity nodes: the ones whose `used*` relations are followed.
    pub fn is_activity(&self) -> bool {
        matches!(self, Self::Computation | Self::Experiment)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Expansion state of a node.
///
/// ```text
/// Collapsed ──begin──▶ Expanding ──produced──▶ Expanded
///                          └──────nothing────▶ Exhausted
/// Leaf (created non-expandable)
/// ```
///
/// `Expanded`, `Exhausted` and `Leaf` are terminal for entity nodes. A
/// dataset collection returns to `Collapsed` after each pop while datasets
/// remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Collapsed,
    Expanding,
    Expanded,
    Exhausted,
    Leaf,
}

impl NodeState {
    pub fn is_expandable(self) -> bool {
        matches!(self, Self::Collapsed | Self::Expanding)
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Expanded | Self::Exhausted | Self::Leaf)
    }
}

/// Batched-expansion cursor of a dataset collection node.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionCursor {
    pub owner_id: String,
    /// Normalized dataset references not yet materialized, in source order.
    pub remaining: VecDeque<Value>,
    /// Number of datasets popped so far. Keeps `contains` edge ids unique.
    pub popped: usize,
}

/// Collection metadata after one pop.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionUpdate {
    pub cursor: CollectionCursor,
    pub expandable: bool,
    pub label: String,
    pub display_name: String,
}

/// Where a node's data comes from.
#[derive(Debug, Clone)]
pub enum NodeSource {
    /// The JSON-LD fragment the node was built from.
    Entity(Arc<Value>),
    Collection(CollectionCursor),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub display_name: String,
    pub properties: BTreeMap<String, Value>,
    pub state: NodeState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip)]
    pub source: NodeSource,
}

impl EvidenceNode {
    pub fn expandable(&self) -> bool {
        self.state.is_expandable()
    }

    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.source, NodeSource::Collection(_))
    }

    pub fn entity(&self) -> Option<&Value> {
        match &self.source {
            NodeSource::Entity(value) => Some(value),
            NodeSource::Collection(_) => None,
        }
    }

    pub fn collection(&self) -> Option<&CollectionCursor> {
        match &self.source {
            NodeSource::Collection(cursor) => Some(cursor),
            NodeSource::Entity(_) => None,
        }
    }

    /// Datasets still held by a collection node.
    pub fn remaining(&self) -> Option<usize> {
        self.collection().map(|c| c.remaining.len())
    }

    /// `Collapsed → Expanding`. Returns false (and changes nothing) from any
    /// other state.
    pub fn begin_expansion(&mut self) -> bool {
        if self.state != NodeState::Collapsed {
            return false;
        }
        self.state = NodeState::Expanding;
        true
    }

    /// `Expanding → Expanded | Exhausted` depending on whether the attempt
    /// produced any nodes or edges.
    pub fn finish_expansion(&mut self, produced: bool) {
        if self.state != NodeState::Expanding {
            return;
        }
        self.state = if produced {
            NodeState::Expanded
        } else {
            NodeState::Exhausted
        };
    }

    pub fn apply_collection_update(&mut self, update: CollectionUpdate) {
        self.label = update.label;
        self.display_name = update.display_name;
        self.state = if update.expandable {
            NodeState::Collapsed
        } else {
            NodeState::Expanded
        };
        self.source = NodeSource::Collection(update.cursor);
    }
}
