use serde::Serialize;

use crate::relation::Relation;

/// A directed, append-only edge between two evidence nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EvidenceEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: Relation,
    pub label: String,
}

impl EvidenceEdge {
    /// `ordinal` disambiguates repeated relations between the same pair
    /// (list position, or the pop count for `contains`).
    pub fn new(source: &str, target: &str, relation: Relation, ordinal: Option<usize>) -> Self {
        Self {
            id: edge_id(source, target, relation, ordinal),
            source: source.to_string(),
            target: target.to_string(),
            relation,
            label: relation.label().to_string(),
        }
    }
}

/// Deterministic edge id: `source->target:relationKey[#ordinal]`.
pub fn edge_id(source: &str, target: &str, relation: Relation, ordinal: Option<usize>) -> String {
    match ordinal {
        Some(n) => format!("{source}->{target}:{}#{n}", relation.key()),
        None => format!("{source}->{target}:{}", relation.key()),
    }
}
