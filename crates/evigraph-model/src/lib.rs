//! Evidence graph model.
//!
//! Converts raw JSON-LD provenance fragments (computations, datasets,
//! software, samples, instruments) into the typed node/edge records a graph
//! renderer consumes.
//!
//! - `document`: the `{"@graph": ...}` envelope, entity helpers, reference
//!   normalization
//! - `relation`: the provenance relations the viewer follows
//! - `node` / `edge`: renderable records and the per-node expansion state
//! - `builder`: entity → node construction (pure)
//! - `ids`: the session-owned sequence used for synthetic node ids

pub mod builder;
pub mod document;
pub mod edge;
pub mod ids;
pub mod node;
pub mod relation;

pub use builder::{
    build_collection_node, build_node, collection_label, NodeBuilder, DEFAULT_DISPLAY_NAME_LIMIT,
};
pub use document::{
    entity_id, is_bare_reference, relation_targets, semantic_type, EntityResolver,
    GraphDocument, ModelError,
};
pub use edge::{edge_id, EvidenceEdge};
pub use ids::IdSequence;
pub use node::{
    CollectionCursor, CollectionUpdate, EvidenceNode, NodeKind, NodeSource, NodeState, Position,
};
pub use relation::Relation;
