use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use evigraph_model::{EvidenceEdge, EvidenceNode};
use serde::Serialize;
use tracing::trace;

/// Nodes and edges to highlight, both in start → end order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathHighlight {
    pub node_ids: Vec<String>,
    pub edge_ids: Vec<String>,
}

impl PathHighlight {
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.iter().any(|n| n == id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_ids.iter().any(|e| e == id)
    }
}

/// Unweighted shortest path between two rendered nodes.
///
/// `None` when `start == end`, when either id is not in `nodes`, or when no
/// path exists. Edges touching an unknown node are ignored. Neighbours are
/// visited in edge order, so ties always resolve the same way.
pub fn find_shortest_path(
    start: &str,
    end: &str,
    nodes: &[EvidenceNode],
    edges: &[EvidenceEdge],
) -> Option<PathHighlight> {
    if start == end {
        return None;
    }
    let known: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    if !known.contains(start) || !known.contains(end) {
        return None;
    }

    let mut adjacency: AHashMap<&str, Vec<(&str, &str)>> = AHashMap::new();
    for edge in edges {
        let (s, t) = (edge.source.as_str(), edge.target.as_str());
        if !known.contains(s) || !known.contains(t) {
            continue;
        }
        adjacency.entry(s).or_default().push((t, edge.id.as_str()));
        adjacency.entry(t).or_default().push((s, edge.id.as_str()));
    }

    // node -> (previous node, edge taken)
    let mut previous: AHashMap<&str, (&str, &str)> = AHashMap::new();
    let mut visited: AHashSet<&str> = AHashSet::from_iter([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == end {
            break;
        }
        for &(next, edge_id) in adjacency.get(current).into_iter().flatten() {
            if visited.insert(next) {
                previous.insert(next, (current, edge_id));
                queue.push_back(next);
            }
        }
    }

    if !previous.contains_key(end) {
        trace!(start, end, "no rendered path");
        return None;
    }

    let mut node_ids = vec![end.to_string()];
    let mut edge_ids = Vec::new();
    let mut cursor = end;
    while let Some(&(prev, edge_id)) = previous.get(cursor) {
        node_ids.push(prev.to_string());
        edge_ids.push(edge_id.to_string());
        cursor = prev;
    }
    node_ids.reverse();
    edge_ids.reverse();
    Some(PathHighlight { node_ids, edge_ids })
}
