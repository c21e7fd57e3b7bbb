//! Coordinate assignment.
//!
//! Ranks map to the rank axis at fixed pitch. Within a rank, vertices are
//! pulled toward the lower median of their neighbours in the adjacent rank
//! (downward sweeps use predecessors, upward sweeps successors) while keeping
//! the rank order and minimum separation. Ties resolve toward the lower
//! coordinate, so the same input always lands in the same place.

use crate::config::LayoutConfig;
use crate::order::RankOrder;
use crate::rank::Layering;

const ALIGN_PASSES: usize = 4;

struct Spacing<'a> {
    layering: &'a Layering,
    config: &'a LayoutConfig,
}

impl Spacing<'_> {
    fn breadth(&self, v: usize) -> f64 {
        if self.layering.is_real(v) {
            self.config.breadth()
        } else {
            0.0
        }
    }

    /// Minimum centre-to-centre distance between rank neighbours `a` < `b`.
    fn gap(&self, a: usize, b: usize) -> f64 {
        let half_boxes = (self.breadth(a) + self.breadth(b)) / 2.0;
        if self.layering.is_real(a) && self.layering.is_real(b) {
            half_boxes + self.config.node_sep
        } else {
            half_boxes + self.config.node_sep / 2.0
        }
    }
}

fn lower_median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(values[(values.len() - 1) / 2])
}

fn align_rank(rank: &[usize], neighbors: &[Vec<usize>], cross: &mut [f64], spacing: &Spacing<'_>) {
    let desired: Vec<Option<f64>> = rank
        .iter()
        .map(|&v| lower_median(neighbors[v].iter().map(|&w| cross[w]).collect()))
        .collect();
    let mut prev: Option<usize> = None;
    for (&v, want) in rank.iter().zip(desired) {
        let mut c = want.unwrap_or(cross[v]);
        if let Some(p) = prev {
            c = c.max(cross[p] + spacing.gap(p, v));
        }
        cross[v] = c;
        prev = Some(v);
    }
}

/// Box centres `(x, y)` for the real vertices `0..layering.real`.
pub(crate) fn assign_centers(
    order: &RankOrder,
    layering: &Layering,
    config: &LayoutConfig,
) -> Vec<(f64, f64)> {
    let spacing = Spacing { layering, config };
    let mut cross = vec![0.0; layering.len()];

    for rank in &order.ranks {
        let mut prev: Option<usize> = None;
        for &v in rank {
            cross[v] = match prev {
                Some(p) => cross[p] + spacing.gap(p, v),
                None => 0.0,
            };
            prev = Some(v);
        }
    }

    let rank_count = order.ranks.len();
    for _ in 0..ALIGN_PASSES {
        for r in 1..rank_count {
            align_rank(&order.ranks[r], &layering.pred, &mut cross, &spacing);
        }
        for r in (0..rank_count.saturating_sub(1)).rev() {
            align_rank(&order.ranks[r], &layering.succ, &mut cross, &spacing);
        }
    }

    let half_breadth = config.breadth() / 2.0;
    let min_edge = cross[..layering.real]
        .iter()
        .map(|c| c - half_breadth)
        .fold(f64::INFINITY, f64::min);
    let shift = if min_edge.is_finite() { -min_edge } else { 0.0 };

    let depth = config.depth();
    let pitch = depth + config.rank_sep;
    (0..layering.real)
        .map(|v| {
            let r = layering.rank[v];
            let slot = if config.direction.is_reversed() {
                rank_count.saturating_sub(1) - r
            } else {
                r
            };
            let along = slot as f64 * pitch + depth / 2.0;
            let across = cross[v] + shift;
            if config.direction.is_horizontal() {
                (along, across)
            } else {
                (across, along)
            }
        })
        .collect()
}
