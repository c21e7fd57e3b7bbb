//! Rank assignment and long-edge splitting.

use crate::graph::break_cycles;

/// A proper layering: every edge joins adjacent ranks.
///
/// Vertices `0..real` are laid-out nodes; the rest are virtual vertices that
/// carry long edges through intermediate ranks.
pub(crate) struct Layering {
    pub real: usize,
    pub rank: Vec<usize>,
    pub succ: Vec<Vec<usize>>,
    pub pred: Vec<Vec<usize>>,
    pub rank_count: usize,
}

impl Layering {
    pub fn len(&self) -> usize {
        self.rank.len()
    }

    pub fn is_real(&self, v: usize) -> bool {
        v < self.real
    }
}

/// Longest-path ranking: sources get rank 0, every other vertex one more
/// than its highest-ranked predecessor.
pub(crate) fn longest_path_ranks(dag: &[Vec<usize>]) -> Vec<usize> {
    let n = dag.len();
    let mut in_degree = vec![0usize; n];
    for targets in dag {
        for &v in targets {
            in_degree[v] += 1;
        }
    }
    let mut queue: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut ranks = vec![0usize; n];
    let mut head = 0;
    while head < queue.len() {
        let u = queue[head];
        head += 1;
        for &v in &dag[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push(v);
            }
        }
    }
    ranks
}

pub(crate) fn build_layering(succ: &[Vec<usize>]) -> Layering {
    let dag = break_cycles(succ);
    let real = dag.len();
    let mut rank = longest_path_ranks(&dag);

    let mut out_succ: Vec<Vec<usize>> = vec![Vec::new(); real];
    for (u, targets) in dag.iter().enumerate() {
        for &v in targets {
            let mut from = u;
            for r in rank[u] + 1..rank[v] {
                let dummy = rank.len();
                rank.push(r);
                out_succ.push(Vec::new());
                out_succ[from].push(dummy);
                from = dummy;
            }
            out_succ[from].push(v);
        }
    }

    let mut pred = vec![Vec::new(); rank.len()];
    for (u, targets) in out_succ.iter().enumerate() {
        for &v in targets {
            pred[v].push(u);
        }
    }
    let rank_count = rank.iter().copied().max().map_or(0, |m| m + 1);

    Layering {
        real,
        rank,
        succ: out_succ,
        pred,
        rank_count,
    }
}
