//! Entity → node construction.
//!
//! Both builders are pure: they read the fragment they are given and return
//! a fresh node, or `None` when the input cannot become a node. `None` means
//! "skip", never "fail".

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use serde_json::Value;

use crate::document::{entity_id, normalize_reference, relation_targets, semantic_type};
use crate::ids::IdSequence;
use crate::node::{CollectionCursor, EvidenceNode, NodeKind, NodeSource, NodeState};
use crate::relation::Relation;

/// Display names longer than this many characters are truncated.
pub const DEFAULT_DISPLAY_NAME_LIMIT: usize = 50;

const FALLBACK_TYPE: &str = "Thing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBuilder {
    display_name_limit: usize,
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_NAME_LIMIT)
    }
}

impl NodeBuilder {
    pub fn new(display_name_limit: usize) -> Self {
        Self {
            display_name_limit: display_name_limit.max(1),
        }
    }

    /// Build a node from a JSON-LD entity. `None` when it has no `@id`.
    pub fn build_node(&self, entity: &Value) -> Option<EvidenceNode> {
        let id = entity_id(entity)?.to_string();
        let obj = entity.as_object()?;

        let kind = NodeKind::from_type_name(semantic_type(entity).unwrap_or(FALLBACK_TYPE));
        let label = ["name", "label"]
            .iter()
            .filter_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());

        let properties: BTreeMap<String, Value> = obj
            .iter()
            .filter(|(key, _)| is_displayable_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let state = if is_expandable(entity, &kind, &properties) {
            NodeState::Collapsed
        } else {
            NodeState::Leaf
        };

        Some(EvidenceNode {
            display_name: self.display_name(&label),
            id,
            kind,
            label,
            properties,
            state,
            position: None,
            source: NodeSource::Entity(Arc::new(entity.clone())),
        })
    }

    /// Build a synthetic collection node for an activity's input datasets.
    ///
    /// Bare id strings become `Dataset` stand-ins; falsy or id-less entries
    /// are dropped. `None` when nothing survives.
    pub fn build_collection_node(
        &self,
        owner_id: &str,
        datasets: &[Value],
        ids: &mut IdSequence,
    ) -> Option<EvidenceNode> {
        let implied = Relation::UsedDataset.implied_target_type();
        let remaining: VecDeque<Value> = datasets
            .iter()
            .filter_map(|d| normalize_reference(d, implied))
            .collect();
        if remaining.is_empty() {
            return None;
        }

        let label = collection_label(remaining.len());
        Some(EvidenceNode {
            id: format!("{owner_id}::datasets#{}", ids.advance()),
            kind: NodeKind::DatasetCollection,
            display_name: self.display_name(&label),
            label,
            properties: BTreeMap::new(),
            state: NodeState::Collapsed,
            position: None,
            source: NodeSource::Collection(CollectionCursor {
                owner_id: owner_id.to_string(),
                remaining,
                popped: 0,
            }),
        })
    }

    /// `label`, cut to the display limit and suffixed with `...` when cut.
    pub fn display_name(&self, label: &str) -> String {
        if label.chars().count() <= self.display_name_limit {
            return label.to_string();
        }
        let mut out: String = label.chars().take(self.display_name_limit).collect();
        out.push_str("...");
        out
    }
}

pub fn build_node(entity: &Value) -> Option<EvidenceNode> {
    NodeBuilder::default().build_node(entity)
}

pub fn build_collection_node(
    owner_id: &str,
    datasets: &[Value],
    ids: &mut IdSequence,
) -> Option<EvidenceNode> {
    NodeBuilder::default().build_collection_node(owner_id, datasets, ids)
}

pub fn collection_label(remaining: usize) -> String {
    format!("Input Datasets ({remaining})")
}

fn is_displayable_key(key: &str) -> bool {
    !(key.starts_with('@') || key.starts_with('_') || Relation::from_key(key).is_some())
}

fn has_outgoing_relations(entity: &Value) -> bool {
    let present = |relation: Relation| {
        entity
            .get(relation.key())
            .is_some_and(|v| !crate::document::is_falsy(v))
    };
    let non_empty = |relation: Relation| !relation_targets(entity, relation).is_empty();

    present(Relation::GeneratedBy)
        || present(Relation::UsedSoftware)
        || non_empty(Relation::UsedDataset)
        || non_empty(Relation::UsedSample)
        || non_empty(Relation::UsedInstrument)
}

/// Whether a freshly built node should offer expansion.
///
/// Entities reduced to `@id` + `@type`, and software with nothing to show,
/// are leaves. Any other entity stays expandable even without relations;
/// expanding it is a safe no-op that ends in `Exhausted`.
fn is_expandable(entity: &Value, kind: &NodeKind, properties: &BTreeMap<String, Value>) -> bool {
    if has_outgoing_relations(entity) {
        return true;
    }
    let identity_only = entity
        .as_object()
        .is_some_and(|obj| obj.keys().all(|k| k == "@id" || k == "@type"));
    if identity_only {
        return false;
    }
    !(*kind == NodeKind::Software && properties.is_empty())
}
