use evigraph_model::{
    collection_label, CollectionCursor, CollectionUpdate, EvidenceEdge, EvidenceNode, Relation,
};
use tracing::debug;

use crate::engine::{Collector, Expander, Expansion};

/// Result of popping one dataset off a collection node.
#[derive(Debug, Clone, Default)]
pub struct CollectionExpansion {
    pub new_nodes: Vec<EvidenceNode>,
    pub new_edges: Vec<EvidenceEdge>,
    /// New collection metadata; `None` when the node is not a collection.
    pub update: Option<CollectionUpdate>,
}

impl CollectionExpansion {
    pub fn is_empty(&self) -> bool {
        self.new_nodes.is_empty() && self.new_edges.is_empty()
    }

    /// Whether the collection can still be expanded after this pop.
    pub fn expandable(&self) -> bool {
        self.update.as_ref().is_some_and(|u| u.expandable)
    }
}

impl Expander<'_> {
    /// Pop exactly one dataset off the front of a collection.
    ///
    /// The dataset becomes a normal node (unless already present) linked by
    /// a `contains` edge whose id carries the pop count. Malformed entries are
    /// consumed without producing anything. An empty collection yields an
    /// empty result with `expandable: false`.
    pub fn expand_collection_node(
        &self,
        node: &EvidenceNode,
        current: &[EvidenceNode],
    ) -> CollectionExpansion {
        let Some(cursor) = node.collection() else {
            return CollectionExpansion::default();
        };
        let mut cursor = cursor.clone();
        let Some(next) = cursor.remaining.pop_front() else {
            return CollectionExpansion {
                update: Some(self.collection_update(cursor)),
                ..CollectionExpansion::default()
            };
        };

        let mut out = Collector::new(current);
        let target = self.resolve(next);
        match self.builder().build_node(&target) {
            Some(dataset) => {
                out.push_edge(EvidenceEdge::new(
                    &node.id,
                    &dataset.id,
                    Relation::Contains,
                    Some(cursor.popped),
                ));
                out.push_node(dataset);
            }
            None => debug!(collection = %node.id, "skipping malformed dataset reference"),
        }
        cursor.popped += 1;

        let Expansion {
            new_nodes,
            new_edges,
        } = out.finish();
        CollectionExpansion {
            new_nodes,
            new_edges,
            update: Some(self.collection_update(cursor)),
        }
    }

    fn collection_update(&self, cursor: CollectionCursor) -> CollectionUpdate {
        let label = collection_label(cursor.remaining.len());
        CollectionUpdate {
            expandable: !cursor.remaining.is_empty(),
            display_name: self.builder().display_name(&label),
            label,
            cursor,
        }
    }
}
