//! JSON-LD documents and entity helpers.
//!
//! The metadata service returns documents shaped as `{"@graph": Entity |
//! Entity[], ...}`. The first `@graph` element is the subject of the view.
//! Entities are immutable snapshots: everything here reads, nothing mutates.

use ahash::AHashMap;
use serde_json::{Map, Value};

use crate::relation::Relation;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid JSON-LD document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("document has no `@graph` member")]
    MissingGraph,

    #[error("document `@graph` is empty")]
    EmptyGraph,
}

/// Looks up full entities by `@id`.
///
/// Relationship fields often carry only `{"@id": ...}` (or a bare id
/// string). A resolver lets callers substitute the full entity when the
/// document already contains it.
pub trait EntityResolver {
    fn resolve(&self, id: &str) -> Option<&Value>;
}

/// A fetched JSON-LD document.
#[derive(Debug, Clone, Default)]
pub struct GraphDocument {
    entities: Vec<Value>,
    index: AHashMap<String, usize>,
}

impl GraphDocument {
    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let Value::Object(mut envelope) = value else {
            return Err(ModelError::MissingGraph);
        };
        let graph = envelope.remove("@graph").ok_or(ModelError::MissingGraph)?;
        let entities = match graph {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };
        if entities.is_empty() {
            return Err(ModelError::EmptyGraph);
        }
        Ok(Self::from_entities(entities))
    }

    /// Wrap already-extracted entities. The first one is the root.
    pub fn from_entities(entities: Vec<Value>) -> Self {
        let mut index = AHashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            if let Some(id) = entity_id(entity) {
                index.entry(id.to_string()).or_insert(i);
            }
        }
        Self { entities, index }
    }

    pub fn root(&self) -> Option<&Value> {
        self.entities.first()
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root().and_then(entity_id)
    }

    pub fn entities(&self) -> &[Value] {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityResolver for GraphDocument {
    fn resolve(&self, id: &str) -> Option<&Value> {
        self.get(id)
    }
}

/// The entity's `@id`, when it is a non-empty string.
pub fn entity_id(entity: &Value) -> Option<&str> {
    entity
        .get("@id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Semantic type of an entity: the last `#`, `/` or `:` delimited segment of
/// its `@type` (the first element when `@type` is a list).
pub fn semantic_type(entity: &Value) -> Option<&str> {
    let raw = match entity.get("@type")? {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    raw.rsplit(['#', '/', ':'])
        .map(str::trim)
        .find(|segment| !segment.is_empty())
}

/// JavaScript-style falsiness, which is how the metadata service marks
/// absent references.
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// True when the object carries nothing beyond `@id` / `@type`.
pub fn is_bare_reference(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) => obj.keys().all(|k| k == "@id" || k == "@type"),
        None => false,
    }
}

/// Normalize one relationship entry into an entity object.
///
/// Bare id strings become `{"@id", "@type"}` stand-ins typed after the
/// relation. Falsy entries and objects without an `@id` are dropped.
pub(crate) fn normalize_reference(value: &Value, implied_type: &str) -> Option<Value> {
    if is_falsy(value) {
        return None;
    }
    match value {
        Value::String(id) => {
            let mut obj = Map::new();
            obj.insert("@id".to_string(), Value::String(id.trim().to_string()));
            obj.insert("@type".to_string(), Value::String(implied_type.to_string()));
            Some(Value::Object(obj))
        }
        Value::Object(obj) => {
            entity_id(value)?;
            let mut obj = obj.clone();
            obj.entry("@type")
                .or_insert_with(|| Value::String(implied_type.to_string()));
            Some(Value::Object(obj))
        }
        _ => None,
    }
}

/// Targets of `relation` on `entity`, normalized (see `normalize_reference`).
///
/// Single values and lists are both accepted; order is preserved.
pub fn relation_targets(entity: &Value, relation: Relation) -> Vec<Value> {
    let Some(raw) = entity.get(relation.key()) else {
        return Vec::new();
    };
    let implied = relation.implied_target_type();
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| normalize_reference(item, implied))
            .collect(),
        other => normalize_reference(other, implied).into_iter().collect(),
    }
}
