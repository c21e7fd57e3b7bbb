use ahash::AHashSet;
use evigraph_model::{
    entity_id, is_bare_reference, relation_targets, EntityResolver, EvidenceEdge, EvidenceNode,
    IdSequence, NodeBuilder, NodeKind, Relation,
};
use serde_json::Value;
use tracing::debug;

/// Nodes and edges produced by one expansion.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub new_nodes: Vec<EvidenceNode>,
    pub new_edges: Vec<EvidenceEdge>,
}

impl Expansion {
    pub fn is_empty(&self) -> bool {
        self.new_nodes.is_empty() && self.new_edges.is_empty()
    }
}

/// Computes node neighbourhoods.
///
/// With a resolver attached, bare `{"@id"}` references are replaced by the
/// full entity before a node is built from them.
#[derive(Clone, Copy)]
pub struct Expander<'a> {
    builder: NodeBuilder,
    resolver: Option<&'a dyn EntityResolver>,
}

impl std::fmt::Debug for Expander<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expander")
            .field("builder", &self.builder)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

impl Default for Expander<'_> {
    fn default() -> Self {
        Self::new(NodeBuilder::default())
    }
}

impl<'a> Expander<'a> {
    pub fn new(builder: NodeBuilder) -> Self {
        Self {
            builder,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn EntityResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn builder(&self) -> &NodeBuilder {
        &self.builder
    }

    pub(crate) fn resolve(&self, reference: Value) -> Value {
        if !is_bare_reference(&reference) {
            return reference;
        }
        let Some(resolver) = self.resolver else {
            return reference;
        };
        match entity_id(&reference).and_then(|id| resolver.resolve(id)) {
            Some(full) => full.clone(),
            None => reference,
        }
    }

    /// Immediate neighbours of `node` that are not yet in `current`.
    ///
    /// Returns an empty expansion when the node has no source entity, is
    /// already expanded, or is not expandable. Collection nodes are handled
    /// by `expand_collection_node`.
    pub fn expand_node(
        &self,
        node: &EvidenceNode,
        current: &[EvidenceNode],
        ids: &mut IdSequence,
    ) -> Expansion {
        let Some(entity) = node.entity() else {
            return Expansion::default();
        };
        if node.is_expanded() || !node.expandable() {
            return Expansion::default();
        }

        let mut out = Collector::new(current);
        if node.kind == NodeKind::Dataset {
            if let Some(target) = relation_targets(entity, Relation::GeneratedBy)
                .into_iter()
                .next()
            {
                self.link(&mut out, &node.id, target, Relation::GeneratedBy, 0);
            }
        } else if node.kind.is_activity() {
            self.link_each(&mut out, &node.id, entity, Relation::UsedSoftware);

            let datasets = relation_targets(entity, Relation::UsedDataset);
            if datasets.len() == 1 {
                if let Some(dataset) = datasets.into_iter().next() {
                    self.link(&mut out, &node.id, dataset, Relation::UsedDataset, 0);
                }
            } else if let Some(collection) =
                self.builder
                    .build_collection_node(&node.id, &datasets, ids)
            {
                out.push_edge(EvidenceEdge::new(
                    &node.id,
                    &collection.id,
                    Relation::UsedDataset,
                    None,
                ));
                out.push_node(collection);
            }

            self.link_each(&mut out, &node.id, entity, Relation::UsedSample);
            self.link_each(&mut out, &node.id, entity, Relation::UsedInstrument);
        }

        let expansion = out.finish();
        debug!(
            node = %node.id,
            kind = %node.kind,
            new_nodes = expansion.new_nodes.len(),
            new_edges = expansion.new_edges.len(),
            "expanded node"
        );
        expansion
    }

    fn link_each(&self, out: &mut Collector<'_>, parent_id: &str, entity: &Value, relation: Relation) {
        for (i, target) in relation_targets(entity, relation).into_iter().enumerate() {
            self.link(out, parent_id, target, relation, i);
        }
    }

    fn link(
        &self,
        out: &mut Collector<'_>,
        parent_id: &str,
        target: Value,
        relation: Relation,
        position: usize,
    ) {
        let target = self.resolve(target);
        let Some(child) = self.builder.build_node(&target) else {
            return;
        };
        let ordinal = (position > 0).then_some(position);
        out.push_edge(EvidenceEdge::new(parent_id, &child.id, relation, ordinal));
        out.push_node(child);
    }
}

/// Accumulates one expansion's output, deduplicating against the current
/// graph and against itself.
pub(crate) struct Collector<'c> {
    known: AHashSet<&'c str>,
    new_ids: AHashSet<String>,
    edge_ids: AHashSet<String>,
    expansion: Expansion,
}

impl<'c> Collector<'c> {
    pub(crate) fn new(current: &'c [EvidenceNode]) -> Self {
        Self {
            known: current.iter().map(|n| n.id.as_str()).collect(),
            new_ids: AHashSet::new(),
            edge_ids: AHashSet::new(),
            expansion: Expansion::default(),
        }
    }

    pub(crate) fn push_node(&mut self, node: EvidenceNode) {
        if self.known.contains(node.id.as_str()) || !self.new_ids.insert(node.id.clone()) {
            return;
        }
        self.expansion.new_nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: EvidenceEdge) {
        if self.edge_ids.insert(edge.id.clone()) {
            self.expansion.new_edges.push(edge);
        }
    }

    pub(crate) fn finish(self) -> Expansion {
        self.expansion
    }
}
