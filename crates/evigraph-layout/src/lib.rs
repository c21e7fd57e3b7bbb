//! Layered layout for evidence graphs.
//!
//! The pipeline is the usual Sugiyama sequence:
//!
//! 1. canonical vertex indexing by sorted id (`graph`)
//! 2. cycle breaking by reversing DFS back edges (`graph`)
//! 3. longest-path ranking, with virtual vertices on long edges (`rank`)
//! 4. barycenter crossing reduction, keeping the best order (`order`)
//! 5. median-aligned coordinate assignment (`place`)
//!
//! Output positions are top-left box corners. Edges pass through untouched.
//! Nothing here depends on hash iteration order or on input order, so the
//! same node/edge sets always produce the same coordinates.

pub mod config;
pub mod error;
mod graph;
mod jitter;
mod order;
mod place;
mod rank;

use ahash::AHashMap;
use evigraph_model::{EvidenceEdge, EvidenceNode, Position};
use serde::Serialize;
use tracing::{debug, warn};

pub use config::{Direction, LayoutConfig};
pub use error::LayoutError;

use crate::graph::LayoutGraph;
use crate::jitter::jitter_position;
use crate::order::reduce_crossings;
use crate::place::assign_centers;
use crate::rank::build_layering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    pub ranks: usize,
    pub crossings: usize,
    pub sweeps: usize,
}

/// Positioned copy of the input plus anything the solver had to work around.
#[derive(Debug, Clone)]
pub struct LayoutOutcome {
    pub nodes: Vec<EvidenceNode>,
    pub edges: Vec<EvidenceEdge>,
    pub stats: LayoutStats,
    pub diagnostics: Vec<LayoutError>,
}

impl LayoutOutcome {
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .and_then(|n| n.position)
    }
}

/// Lay out `nodes`, failing on an unusable configuration.
///
/// Edges with an unknown endpoint do not fail the layout; they are reported
/// in `diagnostics` and returned unchanged.
pub fn try_layout(
    nodes: &[EvidenceNode],
    edges: &[EvidenceEdge],
    config: &LayoutConfig,
) -> Result<LayoutOutcome, LayoutError> {
    config.validate()?;

    let mut diagnostics = Vec::new();
    let graph = LayoutGraph::build(nodes, edges, &mut diagnostics);
    let layering = build_layering(&graph.succ);
    let order = reduce_crossings(&layering, config.max_sweeps);
    let centers = assign_centers(&order, &layering, config);

    let (half_w, half_h) = (config.node_width / 2.0, config.node_height / 2.0);
    let solved: AHashMap<&str, Position> = graph
        .ids
        .iter()
        .zip(centers)
        .map(|(id, (cx, cy))| (id.as_str(), Position::new(cx - half_w, cy - half_h)))
        .collect();

    let placed = apply_positions(nodes, &solved, config, &mut diagnostics);
    debug!(
        vertices = graph.len(),
        virtual_vertices = layering.len() - layering.real,
        ranks = layering.rank_count,
        crossings = order.crossings,
        sweeps = order.sweeps,
        direction = %config.direction,
        "layout solved"
    );

    Ok(LayoutOutcome {
        nodes: placed,
        edges: edges.to_vec(),
        stats: LayoutStats {
            ranks: layering.rank_count,
            crossings: order.crossings,
            sweeps: order.sweeps,
        },
        diagnostics,
    })
}

/// Lay out `nodes`, never failing.
///
/// On a solver failure the input comes back unpositioned, with the failure
/// as the only diagnostic.
pub fn layout(
    nodes: &[EvidenceNode],
    edges: &[EvidenceEdge],
    config: &LayoutConfig,
) -> LayoutOutcome {
    match try_layout(nodes, edges, config) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(error = %err, "layout failed; returning nodes unpositioned");
            LayoutOutcome {
                nodes: nodes.to_vec(),
                edges: edges.to_vec(),
                stats: LayoutStats::default(),
                diagnostics: vec![err],
            }
        }
    }
}

pub fn layout_with_direction(
    nodes: &[EvidenceNode],
    edges: &[EvidenceEdge],
    direction: Direction,
) -> LayoutOutcome {
    layout(nodes, edges, &LayoutConfig::with_direction(direction))
}

fn apply_positions(
    nodes: &[EvidenceNode],
    solved: &AHashMap<&str, Position>,
    config: &LayoutConfig,
    diagnostics: &mut Vec<LayoutError>,
) -> Vec<EvidenceNode> {
    nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            let position = match solved.get(node.id.as_str()) {
                Some(p) => *p,
                None => {
                    warn!(node = %node.id, "solver left node unplaced; using fallback position");
                    diagnostics.push(LayoutError::Unplaced(node.id.clone()));
                    jitter_position(&node.id, config)
                }
            };
            node.position = Some(position);
            node
        })
        .collect()
}
