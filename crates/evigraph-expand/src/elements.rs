use ahash::{AHashMap, AHashSet};
use evigraph_model::{EvidenceEdge, EvidenceNode, Position};

/// The node/edge collection of one viewer session.
///
/// Append-only: nodes and edges are added (deduplicated by id) and only
/// discarded all at once by `clear`.
#[derive(Debug, Clone, Default)]
pub struct ElementSet {
    nodes: Vec<EvidenceNode>,
    edges: Vec<EvidenceEdge>,
    node_index: AHashMap<String, usize>,
    edge_ids: AHashSet<String>,
}

/// What `absorb` actually added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Absorbed {
    pub node_ids: Vec<String>,
    pub edges: usize,
}

impl Absorbed {
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty() && self.edges == 0
    }
}

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when a node with the same id is already present.
    pub fn insert_node(&mut self, node: EvidenceNode) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Returns false when an edge with the same id is already present.
    pub fn insert_edge(&mut self, edge: EvidenceEdge) -> bool {
        if !self.edge_ids.insert(edge.id.clone()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn absorb(&mut self, nodes: Vec<EvidenceNode>, edges: Vec<EvidenceEdge>) -> Absorbed {
        let mut absorbed = Absorbed::default();
        for node in nodes {
            let id = node.id.clone();
            if self.insert_node(node) {
                absorbed.node_ids.push(id);
            }
        }
        for edge in edges {
            if self.insert_edge(edge) {
                absorbed.edges += 1;
            }
        }
        absorbed
    }

    pub fn nodes(&self) -> &[EvidenceNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EvidenceEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&EvidenceNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut EvidenceNode> {
        let i = *self.node_index.get(id)?;
        Some(&mut self.nodes[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_ids.contains(id)
    }

    pub fn set_position(&mut self, id: &str, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = Some(position);
                true
            }
            None => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.node_index.clear();
        self.edge_ids.clear();
    }
}
