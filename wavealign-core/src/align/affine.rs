//! Affine gap model with three layers per cell.
//!
//! `D` ends in a residue-residue column, `I` in a gap consuming sequence 1 and
//! `S` in a gap consuming sequence 2. Unreachable states are `None`, so no
//! sentinel ever takes part in an addition.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::encode::{EncodedSeq, PairCosts};
use super::grid::{Cells, Grid, Neighbors};
use super::traceback;
use super::types::{pick, plus, AffineCost, AffineCounted, AffineTraced, Alignment, Cost, Layer};
use crate::error::AlignResult;
use crate::gap::{AffineGap, GapCost};
use crate::scoring::Scoring;

pub(crate) fn traced_init(i: usize, j: usize, gap: &AffineGap) -> AffineTraced {
    match (i, j) {
        (0, 0) => AffineTraced {
            cost: AffineCost {
                d: Some(0),
                ..AffineCost::UNREACHABLE
            },
            ..Default::default()
        },
        (_, 0) => AffineTraced {
            cost: AffineCost {
                i: Some(gap.cost(i)),
                ..AffineCost::UNREACHABLE
            },
            from_i: Some(if i == 1 { Layer::D } else { Layer::I }),
            ..Default::default()
        },
        (0, _) => AffineTraced {
            cost: AffineCost {
                s: Some(gap.cost(j)),
                ..AffineCost::UNREACHABLE
            },
            from_s: Some(if j == 1 { Layer::D } else { Layer::S }),
            ..Default::default()
        },
        _ => AffineTraced::default(),
    }
}

pub(crate) fn cost_init(i: usize, j: usize, gap: &AffineGap) -> AffineCost {
    traced_init(i, j, gap).cost
}

pub(crate) fn counted_init(i: usize, j: usize, gap: &AffineGap) -> AffineCounted {
    let one_if = |cond: bool| if cond { BigUint::one() } else { BigUint::zero() };
    AffineCounted {
        cost: cost_init(i, j, gap),
        d: one_if(i == 0 && j == 0),
        i: one_if(i > 0 && j == 0),
        s: one_if(i == 0 && j > 0),
    }
}

/// Relax all three layers of one interior cell and remember where each came from.
///
/// D-layer ties go D > I > S. In I and S the extension is listed first, so a
/// gap is only reopened when that is strictly cheaper.
#[inline]
fn relax(
    diag: &AffineCost,
    up: &AffineCost,
    left: &AffineCost,
    subst: Cost,
    gap: &AffineGap,
) -> AffineTraced {
    let open = gap.open_cost();
    let beta = gap.beta();
    let d = pick(&[(diag.d, Layer::D), (diag.i, Layer::I), (diag.s, Layer::S)]);
    let i = pick(&[(plus(up.i, beta), Layer::I), (plus(up.d, open), Layer::D)]);
    let s = pick(&[(plus(left.s, beta), Layer::S), (plus(left.d, open), Layer::D)]);
    AffineTraced {
        cost: AffineCost {
            d: d.map(|(c, _)| c.saturating_add(subst)),
            i: i.map(|(c, _)| c),
            s: s.map(|(c, _)| c),
        },
        from_d: d.map(|(_, l)| l),
        from_i: i.map(|(_, l)| l),
        from_s: s.map(|(_, l)| l),
    }
}

#[inline]
pub(crate) fn cost_cell(nb: Neighbors<'_, AffineCost>, subst: Cost, gap: &AffineGap) -> AffineCost {
    relax(nb.diag, nb.up, nb.left, subst, gap).cost
}

#[inline]
pub(crate) fn traced_cell(
    nb: Neighbors<'_, AffineTraced>,
    subst: Cost,
    gap: &AffineGap,
) -> AffineTraced {
    relax(&nb.diag.cost, &nb.up.cost, &nb.left.cost, subst, gap)
}

fn minimum(candidates: &[(Option<Cost>, &BigUint)]) -> Option<Cost> {
    candidates.iter().filter_map(|(c, _)| *c).min()
}

fn tally(best: Option<Cost>, candidates: &[(Option<Cost>, &BigUint)]) -> BigUint {
    let mut total = BigUint::zero();
    if best.is_none() {
        return total;
    }
    for &(c, paths) in candidates {
        if c == best {
            total += paths;
        }
    }
    total
}

/// Per-layer path counts: each layer sums every tied predecessor layer.
pub(crate) fn counted_cell(
    nb: Neighbors<'_, AffineCounted>,
    subst: Cost,
    gap: &AffineGap,
) -> AffineCounted {
    let (diag, up, left) = (nb.diag, nb.up, nb.left);
    let open = gap.open_cost();
    let beta = gap.beta();

    let d_in = [
        (diag.cost.d, &diag.d),
        (diag.cost.i, &diag.i),
        (diag.cost.s, &diag.s),
    ];
    let i_in = [
        (plus(up.cost.i, beta), &up.i),
        (plus(up.cost.d, open), &up.d),
    ];
    let s_in = [
        (plus(left.cost.s, beta), &left.s),
        (plus(left.cost.d, open), &left.d),
    ];

    let d_best = minimum(&d_in);
    let i_best = minimum(&i_in);
    let s_best = minimum(&s_in);
    AffineCounted {
        cost: AffineCost {
            d: plus(d_best, subst),
            i: i_best,
            s: s_best,
        },
        d: tally(d_best, &d_in),
        i: tally(i_best, &i_in),
        s: tally(s_best, &s_in),
    }
}

/// Minimum over the three layers of the last cell.
pub(crate) fn final_cost(cell: &AffineCost) -> Cost {
    // (n, m) is always reachable through D[0][0].
    cell.best().map_or(Cost::MAX, |(c, _)| c)
}

/// Optimal cost only; keeps a single rolling row of layer triples.
pub(crate) fn cost<S: Scoring + ?Sized>(
    a: &EncodedSeq<'_>,
    b: &EncodedSeq<'_>,
    scoring: &S,
    gap: &AffineGap,
) -> Cost {
    let n = a.len();
    let m = b.len();
    let costs = PairCosts::new(scoring, a, b);

    let mut row: Vec<AffineCost> = (0..=m).map(|j| cost_init(0, j, gap)).collect();
    for i in 1..=n {
        let mut diag = row[0];
        row[0] = cost_init(i, 0, gap);
        for j in 1..=m {
            let up = row[j];
            let left = row[j - 1];
            row[j] = cost_cell(
                Neighbors {
                    diag: &diag,
                    up: &up,
                    left: &left,
                },
                costs.subst(i, j),
                gap,
            );
            diag = up;
        }
    }
    final_cost(&row[m])
}

pub(crate) fn align<S: Scoring + ?Sized>(
    a: &EncodedSeq<'_>,
    b: &EncodedSeq<'_>,
    scoring: &S,
    gap: &AffineGap,
) -> AlignResult<Alignment> {
    let (n, m) = (a.len(), b.len());
    let costs = PairCosts::new(scoring, a, b);

    let mut grid = Grid::from_fn(n, m, |i, j| traced_init(i, j, gap));
    grid.fill_rows(n, m, |i, j, nb| traced_cell(nb, costs.subst(i, j), gap));
    traceback::affine(&grid, a.residues(), b.residues())
}

pub(crate) fn count<S: Scoring + ?Sized>(
    a: &EncodedSeq<'_>,
    b: &EncodedSeq<'_>,
    scoring: &S,
    gap: &AffineGap,
) -> (Cost, BigUint) {
    let (n, m) = (a.len(), b.len());
    let costs = PairCosts::new(scoring, a, b);

    let mut grid = Grid::from_fn(n, m, |i, j| counted_init(i, j, gap));
    grid.fill_rows(n, m, |i, j, nb| counted_cell(nb, costs.subst(i, j), gap));
    let last = grid.at(n, m);
    (final_cost(&last.cost), last.total())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borders_hold_one_gap_run() {
        let gap = AffineGap::new(10, 3).unwrap();
        assert_eq!(cost_init(0, 0, &gap).d, Some(0));
        let down = traced_init(3, 0, &gap);
        assert_eq!(down.cost.i, Some(19));
        assert_eq!(down.cost.d, None);
        assert_eq!(down.from_i, Some(Layer::I));
        assert_eq!(traced_init(1, 0, &gap).from_i, Some(Layer::D));
        let across = traced_init(0, 2, &gap);
        assert_eq!(across.cost.s, Some(16));
        assert_eq!(across.cost.i, None);
    }

    #[test]
    fn extend_wins_exact_tie() {
        // open from D costs 0 + 4, extending I costs 1 + 3: both 4.
        let gap = AffineGap::new(1, 3).unwrap();
        let up = AffineCost {
            d: Some(0),
            i: Some(1),
            s: None,
        };
        let cell = relax(&AffineCost::UNREACHABLE, &up, &AffineCost::UNREACHABLE, 0, &gap);
        assert_eq!(cell.cost.i, Some(4));
        assert_eq!(cell.from_i, Some(Layer::I));
        assert_eq!(cell.cost.d, None);
    }

    #[test]
    fn counts_sum_tied_layers() {
        let gap = AffineGap::new(1, 3).unwrap();
        let two = BigUint::from(2u32);
        let five = BigUint::from(5u32);
        let up = AffineCounted {
            cost: AffineCost {
                d: Some(0),
                i: Some(1),
                s: None,
            },
            d: two.clone(),
            i: five.clone(),
            s: BigUint::zero(),
        };
        let none = AffineCounted::default();
        let cell = counted_cell(
            Neighbors {
                diag: &none,
                up: &up,
                left: &none,
            },
            0,
            &gap,
        );
        assert_eq!(cell.i, BigUint::from(7u32));
        assert!(cell.d.is_zero());
        assert_eq!(cell.total(), BigUint::from(7u32));
    }
}
