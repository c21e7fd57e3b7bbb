//! Interaction controller: one viewer's live node/edge collection.
//!
//! The session is the only owner of mutable graph state. Expansion results
//! and layout positions are merged here, always appending or overwriting by
//! id, never removing.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use evigraph_expand::{initial_elements, Absorbed, ElementSet, Expander};
use evigraph_layout::{layout, LayoutConfig, LayoutOutcome};
use evigraph_model::{EvidenceEdge, EvidenceNode, GraphDocument, IdSequence, Position};
use evigraph_path::{find_path_in_full_graph, find_shortest_path, PathHighlight};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;

/// Snapshot handed out by `request_layout`, consumed by `apply_layout`.
#[derive(Debug, Clone)]
pub struct PendingLayout {
    epoch: u64,
    nodes: Vec<EvidenceNode>,
    edges: Vec<EvidenceEdge>,
    config: LayoutConfig,
}

impl PendingLayout {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// A user-driven change to one node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    Position { id: String, position: Position },
    Select { id: String, selected: bool },
}

/// Answer to "how are these two nodes related?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relationship {
    /// Path through nodes already on screen.
    Rendered(PathHighlight),
    /// Path through the raw document; `unmaterialized` lists the ids on it
    /// that are not rendered yet.
    Raw {
        path: Vec<String>,
        unmaterialized: Vec<String>,
    },
}

#[derive(Debug, Default)]
pub struct GraphSession {
    config: ViewerConfig,
    document: Option<GraphDocument>,
    elements: ElementSet,
    ids: IdSequence,
    selected: BTreeSet<String>,
    highlight: Option<PathHighlight>,
    // Bumped by load/reset so snapshots taken before them are ignored.
    epoch: u64,
    outstanding_layouts: usize,
}

impl GraphSession {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&GraphDocument> {
        self.document.as_ref()
    }

    pub fn nodes(&self) -> &[EvidenceNode] {
        self.elements.nodes()
    }

    pub fn edges(&self) -> &[EvidenceEdge] {
        self.elements.edges()
    }

    pub fn node(&self, id: &str) -> Option<&EvidenceNode> {
        self.elements.node(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn highlight(&self) -> Option<&PathHighlight> {
        self.highlight.as_ref()
    }

    pub fn is_layout_pending(&self) -> bool {
        self.outstanding_layouts > 0
    }

    /// Replace whatever is shown with `document`'s root and its first
    /// `initial_depth` levels.
    pub fn load(&mut self, document: GraphDocument) {
        self.reset();
        let expander = Expander::new(self.config.expansion.node_builder()).with_resolver(&document);
        self.elements = initial_elements(
            &document,
            self.config.expansion.initial_depth,
            &expander,
            &mut self.ids,
        );
        info!(
            root = document.root_id().unwrap_or("<none>"),
            nodes = self.elements.node_count(),
            edges = self.elements.edge_count(),
            "graph loaded"
        );
        self.document = Some(document);
    }

    pub fn reset(&mut self) {
        self.document = None;
        self.elements.clear();
        self.ids = IdSequence::new();
        self.selected.clear();
        self.highlight = None;
        self.epoch += 1;
        self.outstanding_layouts = 0;
    }

    /// Expand one node in place and merge what it produced.
    ///
    /// A dataset collection pops one dataset per call. Expanding a node that
    /// is not expandable is a no-op.
    pub fn expand(&mut self, node_id: &str) -> Result<Absorbed> {
        let Some(document) = self.document.as_ref() else {
            bail!("no document loaded");
        };
        let Some(node) = self.elements.node_mut(node_id) else {
            bail!("node `{node_id}` is not in the graph");
        };
        if !node.begin_expansion() {
            debug!(node = node_id, state = ?node.state, "node not expandable; ignoring");
            return Ok(Absorbed::default());
        }

        let expander = Expander::new(self.config.expansion.node_builder()).with_resolver(document);
        let Some(node) = self.elements.node(node_id) else {
            return Ok(Absorbed::default());
        };

        let absorbed = if node.is_collection() {
            let popped = expander.expand_collection_node(node, self.elements.nodes());
            let absorbed = self.elements.absorb(popped.new_nodes, popped.new_edges);
            if let (Some(update), Some(node)) = (popped.update, self.elements.node_mut(node_id)) {
                node.apply_collection_update(update);
            }
            absorbed
        } else {
            let expansion = expander.expand_node(node, self.elements.nodes(), &mut self.ids);
            let produced = !expansion.is_empty();
            let absorbed = self.elements.absorb(expansion.new_nodes, expansion.new_edges);
            if let Some(node) = self.elements.node_mut(node_id) {
                node.finish_expansion(produced);
            }
            absorbed
        };

        debug!(
            node = node_id,
            new_nodes = absorbed.node_ids.len(),
            new_edges = absorbed.edges,
            "expanded"
        );
        Ok(absorbed)
    }

    /// Snapshot the current graph for layout and mark a layout as pending.
    pub fn request_layout(&mut self) -> PendingLayout {
        self.outstanding_layouts += 1;
        PendingLayout {
            epoch: self.epoch,
            nodes: self.elements.nodes().to_vec(),
            edges: self.elements.edges().to_vec(),
            config: self.config.layout,
        }
    }

    /// Solve `pending` and commit the positions.
    ///
    /// Returns `None` when the snapshot predates the last load/reset.
    pub fn apply_layout(&mut self, pending: PendingLayout) -> Option<LayoutOutcome> {
        if pending.epoch != self.epoch {
            debug!("discarding layout for a previous graph");
            return None;
        }
        self.outstanding_layouts = self.outstanding_layouts.saturating_sub(1);

        let outcome = layout(&pending.nodes, &pending.edges, &pending.config);
        for diagnostic in &outcome.diagnostics {
            warn!(%diagnostic, "layout diagnostic");
        }
        for node in &outcome.nodes {
            if let Some(position) = node.position {
                self.elements.set_position(&node.id, position);
            }
        }
        Some(outcome)
    }

    /// Apply user changes; returns how many took effect.
    ///
    /// Position changes are dropped while a layout is pending so a drag
    /// cannot fight the solver.
    pub fn apply_changes(&mut self, changes: impl IntoIterator<Item = NodeChange>) -> usize {
        let mut applied = 0;
        for change in changes {
            match change {
                NodeChange::Position { id, position } => {
                    if self.is_layout_pending() {
                        debug!(node = %id, "position change dropped during layout");
                        continue;
                    }
                    if self.elements.set_position(&id, position) {
                        applied += 1;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if !self.elements.contains_node(&id) {
                        continue;
                    }
                    if selected {
                        self.selected.insert(id);
                    } else {
                        self.selected.remove(&id);
                    }
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Find how `from` and `to` are related and highlight it when on screen.
    ///
    /// Tries the rendered graph first. Otherwise searches the raw document
    /// from its root for `to` and keeps the part of that path from `from`
    /// onward; failing that, searches for `from` and returns the part from
    /// `to` onward, reversed.
    pub fn find_relationship(&mut self, from: &str, to: &str) -> Option<Relationship> {
        if let Some(path) = find_shortest_path(from, to, self.elements.nodes(), self.elements.edges())
        {
            self.highlight = Some(path.clone());
            return Some(Relationship::Rendered(path));
        }
        self.highlight = None;

        let document = self.document.as_ref()?;
        let path = raw_path_between(document, from, to).or_else(|| {
            let mut path = raw_path_between(document, to, from)?;
            path.reverse();
            Some(path)
        })?;
        let unmaterialized = path
            .iter()
            .filter(|id| !self.elements.contains_node(id))
            .cloned()
            .collect();
        Some(Relationship::Raw {
            path,
            unmaterialized,
        })
    }
}

/// Root-to-`to` document path, cut so it starts at `from`.
fn raw_path_between(document: &GraphDocument, from: &str, to: &str) -> Option<Vec<String>> {
    let full = find_path_in_full_graph(document, to)?;
    let start = full.iter().position(|id| id == from)?;
    let path = full[start..].to_vec();
    (path.len() >= 2).then_some(path)
}
