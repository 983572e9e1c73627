//! Linear gap model: one table, `cost(k) = k * penalty`.
//!
//! The cell kernels below are the only place the recurrence is written. The
//! sequential engines in this file and the wavefront sweep both call them, so
//! every schedule produces the same table.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::encode::{EncodedSeq, PairCosts};
use super::grid::{Cells, Grid, Neighbors};
use super::traceback;
use super::types::{Alignment, Cost, LinearCounted, LinearTraced, Move};
use crate::error::AlignResult;
use crate::gap::{GapCost, LinearGap};
use crate::scoring::Scoring;

#[inline]
fn is_border(i: usize, j: usize) -> bool {
    i == 0 || j == 0
}

/// Border cost of `(i, j)`; only meaningful when `i == 0 || j == 0`.
#[inline]
pub(crate) fn border_cost(i: usize, j: usize, gap: &LinearGap) -> Cost {
    gap.cost(i + j)
}

pub(crate) fn cost_init(i: usize, j: usize, gap: &LinearGap) -> Cost {
    if is_border(i, j) {
        border_cost(i, j, gap)
    } else {
        0
    }
}

pub(crate) fn traced_init(i: usize, j: usize, gap: &LinearGap) -> LinearTraced {
    let step = match (i, j) {
        (0, 0) => None,
        (_, 0) => Some(Move::Up),
        (0, _) => Some(Move::Left),
        _ => None,
    };
    LinearTraced {
        cost: cost_init(i, j, gap),
        step,
    }
}

pub(crate) fn counted_init(i: usize, j: usize, gap: &LinearGap) -> LinearCounted {
    let count = if is_border(i, j) {
        BigUint::one()
    } else {
        BigUint::zero()
    };
    LinearCounted {
        cost: cost_init(i, j, gap),
        count,
    }
}

// Tie-breaking policy: DIAG > UP > LEFT (strict < comparisons).
#[inline]
fn choose(diag: Cost, up: Cost, left: Cost) -> (Cost, Move) {
    let mut best = (diag, Move::Diag);
    if up < best.0 {
        best = (up, Move::Up);
    }
    if left < best.0 {
        best = (left, Move::Left);
    }
    best
}

#[inline]
pub(crate) fn cost_cell(nb: Neighbors<'_, Cost>, subst: Cost, gap: Cost) -> Cost {
    choose(
        nb.diag.saturating_add(subst),
        nb.up.saturating_add(gap),
        nb.left.saturating_add(gap),
    )
    .0
}

#[inline]
pub(crate) fn traced_cell(nb: Neighbors<'_, LinearTraced>, subst: Cost, gap: Cost) -> LinearTraced {
    let (cost, step) = choose(
        nb.diag.cost.saturating_add(subst),
        nb.up.cost.saturating_add(gap),
        nb.left.cost.saturating_add(gap),
    );
    LinearTraced {
        cost,
        step: Some(step),
    }
}

/// Count every predecessor that attains the minimum, not only the tie-break winner.
pub(crate) fn counted_cell(
    nb: Neighbors<'_, LinearCounted>,
    subst: Cost,
    gap: Cost,
) -> LinearCounted {
    let candidates = [
        (nb.diag.cost.saturating_add(subst), &nb.diag.count),
        (nb.up.cost.saturating_add(gap), &nb.up.count),
        (nb.left.cost.saturating_add(gap), &nb.left.count),
    ];
    let cost = choose(candidates[0].0, candidates[1].0, candidates[2].0).0;
    let mut count = BigUint::zero();
    for (c, paths) in candidates {
        if c == cost {
            count += paths;
        }
    }
    LinearCounted { cost, count }
}

/// Optimal cost only; keeps a single rolling row.
pub(crate) fn cost<S: Scoring + ?Sized>(
    a: &EncodedSeq<'_>,
    b: &EncodedSeq<'_>,
    scoring: &S,
    gap: &LinearGap,
) -> Cost {
    let n = a.len();
    let m = b.len();
    let g = gap.cost(1);
    let costs = PairCosts::new(scoring, a, b);

    let mut h_row: Vec<Cost> = (0..=m).map(|j| border_cost(0, j, gap)).collect();
    for i in 1..=n {
        let mut h_diag = h_row[0];
        h_row[0] = border_cost(i, 0, gap);
        for j in 1..=m {
            let h_up = h_row[j];
            let h_left = h_row[j - 1];
            h_row[j] = cost_cell(
                Neighbors {
                    diag: &h_diag,
                    up: &h_up,
                    left: &h_left,
                },
                costs.subst(i, j),
                g,
            );
            h_diag = h_up;
        }
    }
    h_row[m]
}

pub(crate) fn align<S: Scoring + ?Sized>(
    a: &EncodedSeq<'_>,
    b: &EncodedSeq<'_>,
    scoring: &S,
    gap: &LinearGap,
) -> AlignResult<Alignment> {
    let (n, m) = (a.len(), b.len());
    let g = gap.cost(1);
    let costs = PairCosts::new(scoring, a, b);

    let mut grid = Grid::from_fn(n, m, |i, j| traced_init(i, j, gap));
    grid.fill_rows(n, m, |i, j, nb| traced_cell(nb, costs.subst(i, j), g));
    traceback::linear(&grid, a.residues(), b.residues())
}

pub(crate) fn count<S: Scoring + ?Sized>(
    a: &EncodedSeq<'_>,
    b: &EncodedSeq<'_>,
    scoring: &S,
    gap: &LinearGap,
) -> (Cost, BigUint) {
    let (n, m) = (a.len(), b.len());
    let g = gap.cost(1);
    let costs = PairCosts::new(scoring, a, b);

    let mut grid = Grid::from_fn(n, m, |i, j| counted_init(i, j, gap));
    grid.fill_rows(n, m, |i, j, nb| counted_cell(nb, costs.subst(i, j), g));
    let last = grid.at(n, m);
    (last.cost, last.count.clone())
}
