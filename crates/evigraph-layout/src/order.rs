//! Crossing reduction: iterated barycenter sweeps.

use std::cmp::Ordering as CmpOrdering;

use crate::rank::Layering;

pub(crate) struct RankOrder {
    pub ranks: Vec<Vec<usize>>,
    pub crossings: usize,
    pub sweeps: usize,
}

/// Initial order: depth-first discovery from rank-0 vertices, so connected
/// chains start out next to each other.
fn initial_order(layering: &Layering) -> Vec<Vec<usize>> {
    let mut ranks = vec![Vec::new(); layering.rank_count];
    let mut visited = vec![false; layering.len()];
    let starts = (0..layering.len())
        .filter(|&v| layering.rank[v] == 0)
        .chain(0..layering.len());
    for start in starts {
        if visited[start] {
            continue;
        }
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            ranks[layering.rank[v]].push(v);
            for &w in layering.succ[v].iter().rev() {
                if !visited[w] {
                    stack.push(w);
                }
            }
        }
    }
    ranks
}

fn positions_of(rank: &[usize], n: usize) -> Vec<usize> {
    let mut positions = vec![usize::MAX; n];
    for (pos, &v) in rank.iter().enumerate() {
        positions[v] = pos;
    }
    positions
}

fn barycenter(positions: &[usize], neighbors: &[usize]) -> Option<f64> {
    let placed: Vec<f64> = neighbors
        .iter()
        .map(|&w| positions[w])
        .filter(|&p| p != usize::MAX)
        .map(|p| p as f64)
        .collect();
    if placed.is_empty() {
        return None;
    }
    Some(placed.iter().sum::<f64>() / placed.len() as f64)
}

/// Reorder rank `r` by the barycenters of its neighbours in rank `fixed`.
/// Vertices without such neighbours keep their current slot; ties keep the
/// current relative order.
fn reorder_rank(ranks: &mut [Vec<usize>], r: usize, fixed: usize, neighbors: &[Vec<usize>], n: usize) {
    let positions = positions_of(&ranks[fixed], n);
    let mut scored: Vec<(f64, usize, usize)> = ranks[r]
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let score = barycenter(&positions, &neighbors[v]).unwrap_or(i as f64);
            (score, i, v)
        })
        .collect();
    scored.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(CmpOrdering::Equal)
            .then(a.1.cmp(&b.1))
    });
    ranks[r] = scored.into_iter().map(|(_, _, v)| v).collect();
}

/// Crossings between two adjacent ranks.
fn count_crossings(upper: &[usize], lower: &[usize], succ: &[Vec<usize>], n: usize) -> usize {
    let lower_pos = positions_of(lower, n);
    let mut segments: Vec<(usize, usize)> = Vec::new();
    for (i, &u) in upper.iter().enumerate() {
        for &v in &succ[u] {
            if lower_pos[v] != usize::MAX {
                segments.push((i, lower_pos[v]));
            }
        }
    }
    let mut crossings = 0;
    for (k, &(a1, b1)) in segments.iter().enumerate() {
        for &(a2, b2) in &segments[k + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

pub(crate) fn total_crossings(ranks: &[Vec<usize>], layering: &Layering) -> usize {
    ranks
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], &layering.succ, layering.len()))
        .sum()
}

/// Alternate downward and upward sweeps, keeping the best order seen and
/// stopping at the first sweep that does not improve on it.
pub(crate) fn reduce_crossings(layering: &Layering, max_sweeps: usize) -> RankOrder {
    let n = layering.len();
    let mut ranks = initial_order(layering);
    let mut best = total_crossings(&ranks, layering);
    let mut best_ranks = ranks.clone();
    let mut sweeps = 0;

    while sweeps < max_sweeps && best > 0 {
        sweeps += 1;
        for r in 1..ranks.len() {
            reorder_rank(&mut ranks, r, r - 1, &layering.pred, n);
        }
        for r in (0..ranks.len().saturating_sub(1)).rev() {
            reorder_rank(&mut ranks, r, r + 1, &layering.succ, n);
        }
        let crossings = total_crossings(&ranks, layering);
        if crossings < best {
            best = crossings;
            best_ranks = ranks.clone();
        } else {
            break;
        }
    }

    RankOrder {
        ranks: best_ranks,
        crossings: best,
        sweeps,
    }
}
