//! Solver-side graph: canonical vertex indices and acyclic orientation.

use ahash::AHashMap;
use evigraph_model::{EvidenceEdge, EvidenceNode};
use tracing::warn;

use crate::error::LayoutError;

/// Adjacency over the distinct node ids being laid out.
///
/// Vertices are indexed by sorted id, so everything downstream depends only
/// on the id set and the edge set, never on input order.
pub(crate) struct LayoutGraph {
    pub ids: Vec<String>,
    /// Forward edges: succ[u] = sorted, deduplicated targets of u.
    pub succ: Vec<Vec<usize>>,
}

impl LayoutGraph {
    /// Edges with a missing endpoint are left out and reported; self-loops
    /// are dropped silently.
    pub fn build(
        nodes: &[EvidenceNode],
        edges: &[EvidenceEdge],
        diagnostics: &mut Vec<LayoutError>,
    ) -> Self {
        let mut ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        ids.sort_unstable();
        ids.dedup();
        let index: AHashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut succ = vec![Vec::new(); ids.len()];
        for edge in edges {
            let (Some(&u), Some(&v)) = (index.get(&edge.source), index.get(&edge.target)) else {
                let missing = if index.contains_key(&edge.source) {
                    &edge.target
                } else {
                    &edge.source
                };
                warn!(edge = %edge.id, missing = %missing, "edge endpoint not in layout; skipped");
                diagnostics.push(LayoutError::UnknownEndpoint {
                    edge: edge.id.clone(),
                    missing: missing.clone(),
                });
                continue;
            };
            if u != v {
                succ[u].push(v);
            }
        }
        for list in &mut succ {
            list.sort_unstable();
            list.dedup();
        }

        Self { ids, succ }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Orient `succ` into a DAG by reversing DFS back edges.
///
/// DFS roots are sources first (in index order), then any vertex left over,
/// which only happens inside cycles with no entry point.
pub(crate) fn break_cycles(succ: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = succ.len();
    let mut in_degree = vec![0usize; n];
    for targets in succ {
        for &v in targets {
            in_degree[v] += 1;
        }
    }
    let roots = (0..n)
        .filter(|&v| in_degree[v] == 0)
        .chain((0..n).filter(|&v| in_degree[v] != 0));

    let mut mark = vec![Mark::Unvisited; n];
    let mut dag = vec![Vec::new(); n];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in roots {
        if mark[root] != Mark::Unvisited {
            continue;
        }
        mark[root] = Mark::OnStack;
        stack.push((root, 0));
        while let Some(frame) = stack.last_mut() {
            let (u, next) = *frame;
            if next >= succ[u].len() {
                mark[u] = Mark::Done;
                stack.pop();
                continue;
            }
            frame.1 += 1;
            let v = succ[u][next];
            match mark[v] {
                Mark::OnStack => dag[v].push(u),
                Mark::Done => dag[u].push(v),
                Mark::Unvisited => {
                    dag[u].push(v);
                    mark[v] = Mark::OnStack;
                    stack.push((v, 0));
                }
            }
        }
    }
    for list in &mut dag {
        list.sort_unstable();
        list.dedup();
    }
    dag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_acyclic(dag: &[Vec<usize>]) -> bool {
        let n = dag.len();
        let mut in_degree = vec![0usize; n];
        for targets in dag {
            for &v in targets {
                in_degree[v] += 1;
            }
        }
        let mut queue: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
        let mut seen = 0;
        while let Some(u) = queue.pop() {
            seen += 1;
            for &v in &dag[u] {
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push(v);
                }
            }
        }
        seen == n
    }

    #[test]
    fn back_edges_are_reversed() {
        // 0 -> 1 -> 2 -> 0, plus 2 -> 3
        let succ = vec![vec![1], vec![2], vec![0, 3], vec![]];
        let dag = break_cycles(&succ);
        assert!(is_acyclic(&dag));
        let edges: usize = dag.iter().map(Vec::len).sum();
        assert_eq!(edges, 4);
    }

    #[test]
    fn two_cycle_collapses_to_one_direction() {
        let succ = vec![vec![1], vec![0]];
        let dag = break_cycles(&succ);
        assert!(is_acyclic(&dag));
        assert_eq!(dag, vec![vec![1], vec![]]);
    }

    #[test]
    fn acyclic_input_is_unchanged() {
        let succ = vec![vec![1, 2], vec![2], vec![]];
        assert_eq!(break_cycles(&succ), succ);
    }
}
