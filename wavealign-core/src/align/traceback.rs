//! Backward walks from `(n, m)` to `(0, 0)`.
//!
//! Both walks emit columns in reverse and flip them once at the end. Reaching a
//! cell without a usable predecessor means the fill is broken; the walk then
//! stops with [`AlignError::Traceback`] instead of returning a partial path.

use super::grid::Cells;
use super::types::{AffineTraced, Alignment, Cost, Layer, LinearTraced, Move, GAP};
use crate::error::{AlignError, AlignResult};

struct Columns {
    a: Vec<u8>,
    b: Vec<u8>,
}

impl Columns {
    fn with_capacity(cap: usize) -> Self {
        Self {
            a: Vec::with_capacity(cap),
            b: Vec::with_capacity(cap),
        }
    }

    #[inline]
    fn push(&mut self, x: u8, y: u8) {
        self.a.push(x);
        self.b.push(y);
    }

    fn finish(self, cost: Cost) -> Alignment {
        let render = |rev: Vec<u8>| rev.into_iter().rev().map(char::from).collect::<String>();
        Alignment {
            cost,
            aligned_a: render(self.a),
            aligned_b: render(self.b),
        }
    }
}

pub(crate) fn linear<C: Cells<LinearTraced>>(
    cells: &C,
    a: &[u8],
    b: &[u8],
) -> AlignResult<Alignment> {
    let (mut i, mut j) = (a.len(), b.len());
    let cost = cells.at(i, j).cost;
    let mut cols = Columns::with_capacity(i + j);

    while i > 0 || j > 0 {
        match cells.at(i, j).step {
            Some(Move::Diag) if i > 0 && j > 0 => {
                cols.push(a[i - 1], b[j - 1]);
                i -= 1;
                j -= 1;
            }
            Some(Move::Up) if i > 0 => {
                cols.push(a[i - 1], GAP);
                i -= 1;
            }
            Some(Move::Left) if j > 0 => {
                cols.push(GAP, b[j - 1]);
                j -= 1;
            }
            _ => return Err(AlignError::Traceback { i, j }),
        }
    }
    Ok(cols.finish(cost))
}

pub(crate) fn affine<C: Cells<AffineTraced>>(
    cells: &C,
    a: &[u8],
    b: &[u8],
) -> AlignResult<Alignment> {
    let (mut i, mut j) = (a.len(), b.len());
    let (cost, mut layer) = cells
        .at(i, j)
        .cost
        .best()
        .ok_or(AlignError::Traceback { i, j })?;
    let mut cols = Columns::with_capacity(i + j);

    while i > 0 || j > 0 {
        let (ci, cj) = (i, j);
        let cell = cells.at(i, j);
        let from = match layer {
            Layer::D if i > 0 && j > 0 => {
                cols.push(a[i - 1], b[j - 1]);
                i -= 1;
                j -= 1;
                cell.from_d
            }
            Layer::I if i > 0 => {
                cols.push(a[i - 1], GAP);
                i -= 1;
                cell.from_i
            }
            Layer::S if j > 0 => {
                cols.push(GAP, b[j - 1]);
                j -= 1;
                cell.from_s
            }
            _ => return Err(AlignError::Traceback { i, j }),
        };
        layer = from.ok_or(AlignError::Traceback { i: ci, j: cj })?;
    }
    Ok(cols.finish(cost))
}
