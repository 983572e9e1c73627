//! Anti-diagonal (wavefront) scheduling of the same cell kernels the
//! sequential engines use.
//!
//! Cell `(i, j)` only reads diagonals `i+j-1` and `i+j-2`, so every cell of one
//! diagonal can be written concurrently once the previous two are done. The
//! arena is split per diagonal into a shared prefix and an exclusive slice, and
//! [`WorkerPool::for_each_cell`] returning is the barrier between diagonals.

use log::{debug, trace};
use num_bigint::BigUint;

use super::encode::{encode_pair, PairCosts};
use super::grid::{first_row, Cells, DiagonalGrid, Neighbors};
use super::types::{Alignment, Cost};
use super::{affine, linear, traceback, GlobalAligner};
use crate::error::AlignResult;
use crate::gap::{AffineGap, GapCost, GapModel, LinearGap};
use crate::par::WorkerPool;
use crate::scoring::Scoring;

/// How many diagonals went to the workers and how many ran on the driving thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SweepStats {
    pub parallel: usize,
    pub inline: usize,
}

/// Fill every interior cell of `grid` diagonal by diagonal.
pub(crate) fn sweep<T, F>(
    pool: &WorkerPool,
    grid: &mut DiagonalGrid<T>,
    n: usize,
    m: usize,
    kernel: F,
) -> SweepStats
where
    T: Send + Sync,
    F: Fn(usize, usize, Neighbors<'_, T>) -> T + Send + Sync,
{
    let mut stats = SweepStats::default();
    if n == 0 || m == 0 {
        return stats;
    }

    for d in 2..=n + m {
        let lo = first_row(d, m);
        let i_min = lo.max(1);
        let i_max = n.min(d - 1);
        let (done, current) = grid.split_at_diagonal(d);
        let interior = &mut current[i_min - lo..=i_max - lo];

        if pool.dispatches(interior.len()) {
            stats.parallel += 1;
        } else {
            stats.inline += 1;
        }
        trace!("diagonal {d}: rows {i_min}..={i_max}");

        pool.for_each_cell(interior, |k, cell| {
            let i = i_min + k;
            let j = d - i;
            *cell = kernel(i, j, done.neighbors(i, j));
        });
    }
    stats
}

/// Global aligner that fills each anti-diagonal with a bounded pool of workers.
///
/// Results are identical to [`super::SequentialAligner`] for every worker count.
#[derive(Debug)]
pub struct WavefrontAligner {
    pool: WorkerPool,
}

impl WavefrontAligner {
    /// `threads` must be positive; `1` never spawns a thread.
    pub fn new(threads: usize) -> AlignResult<Self> {
        Ok(Self {
            pool: WorkerPool::new(threads)?,
        })
    }

    /// Diagonals with fewer interior cells than `cells` run on the calling thread.
    pub fn with_parallel_threshold(mut self, cells: usize) -> Self {
        self.pool = self.pool.with_threshold(cells);
        self
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    pub fn parallel_threshold(&self) -> usize {
        self.pool.threshold()
    }

    pub fn cost_with_model<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &GapModel,
    ) -> AlignResult<Cost> {
        match gap {
            GapModel::Linear(g) => self.compute_cost(a, b, scoring, g),
            GapModel::Affine(g) => self.compute_cost(a, b, scoring, g),
        }
    }

    pub fn align_with_model<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &GapModel,
    ) -> AlignResult<Alignment> {
        match gap {
            GapModel::Linear(g) => self.align(a, b, scoring, g),
            GapModel::Affine(g) => self.align(a, b, scoring, g),
        }
    }

    pub fn count_with_model<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &GapModel,
    ) -> AlignResult<(Cost, BigUint)> {
        match gap {
            GapModel::Linear(g) => self.cost_and_count(a, b, scoring, g),
            GapModel::Affine(g) => self.cost_and_count(a, b, scoring, g),
        }
    }

    fn report(&self, what: &str, n: usize, m: usize, stats: SweepStats) {
        debug!(
            "wavefront {what}: n={n} m={m} threads={} threshold={} diagonals parallel={} inline={}",
            self.pool.threads(),
            self.pool.threshold(),
            stats.parallel,
            stats.inline
        );
    }
}

impl GlobalAligner<LinearGap> for WavefrontAligner {
    fn compute_cost<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &LinearGap,
    ) -> AlignResult<Cost> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        let (n, m) = (ea.len(), eb.len());
        let g = gap.cost(1);
        let costs = PairCosts::new(scoring, &ea, &eb);

        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| linear::cost_init(i, j, gap));
        let stats = sweep(&self.pool, &mut grid, n, m, |i, j, nb| {
            linear::cost_cell(nb, costs.subst(i, j), g)
        });
        self.report("linear cost", n, m, stats);
        Ok(*grid.at(n, m))
    }

    fn align<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &LinearGap,
    ) -> AlignResult<Alignment> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        let (n, m) = (ea.len(), eb.len());
        let g = gap.cost(1);
        let costs = PairCosts::new(scoring, &ea, &eb);

        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| linear::traced_init(i, j, gap));
        let stats = sweep(&self.pool, &mut grid, n, m, |i, j, nb| {
            linear::traced_cell(nb, costs.subst(i, j), g)
        });
        self.report("linear align", n, m, stats);
        traceback::linear(&grid, a, b)
    }

    fn cost_and_count<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &LinearGap,
    ) -> AlignResult<(Cost, BigUint)> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        let (n, m) = (ea.len(), eb.len());
        let g = gap.cost(1);
        let costs = PairCosts::new(scoring, &ea, &eb);

        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| linear::counted_init(i, j, gap));
        let stats = sweep(&self.pool, &mut grid, n, m, |i, j, nb| {
            linear::counted_cell(nb, costs.subst(i, j), g)
        });
        self.report("linear count", n, m, stats);
        let last = grid.at(n, m);
        Ok((last.cost, last.count.clone()))
    }
}

impl GlobalAligner<AffineGap> for WavefrontAligner {
    fn compute_cost<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &AffineGap,
    ) -> AlignResult<Cost> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        let (n, m) = (ea.len(), eb.len());
        let costs = PairCosts::new(scoring, &ea, &eb);

        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| affine::cost_init(i, j, gap));
        let stats = sweep(&self.pool, &mut grid, n, m, |i, j, nb| {
            affine::cost_cell(nb, costs.subst(i, j), gap)
        });
        self.report("affine cost", n, m, stats);
        Ok(affine::final_cost(grid.at(n, m)))
    }

    fn align<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &AffineGap,
    ) -> AlignResult<Alignment> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        let (n, m) = (ea.len(), eb.len());
        let costs = PairCosts::new(scoring, &ea, &eb);

        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| affine::traced_init(i, j, gap));
        let stats = sweep(&self.pool, &mut grid, n, m, |i, j, nb| {
            affine::traced_cell(nb, costs.subst(i, j), gap)
        });
        self.report("affine align", n, m, stats);
        traceback::affine(&grid, a, b)
    }

    fn cost_and_count<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &AffineGap,
    ) -> AlignResult<(Cost, BigUint)> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        let (n, m) = (ea.len(), eb.len());
        let costs = PairCosts::new(scoring, &ea, &eb);

        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| affine::counted_init(i, j, gap));
        let stats = sweep(&self.pool, &mut grid, n, m, |i, j, nb| {
            affine::counted_cell(nb, costs.subst(i, j), gap)
        });
        self.report("affine count", n, m, stats);
        let last = grid.at(n, m);
        Ok((affine::final_cost(&last.cost), last.total()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_skips_empty_tables() {
        let pool = WorkerPool::new(1).unwrap();
        let mut grid = DiagonalGrid::from_fn(0, 5, |_, j| j);
        let stats = sweep(&pool, &mut grid, 0, 5, |_, _, _| unreachable!());
        assert_eq!(stats, SweepStats::default());
    }

    #[test]
    fn sweep_visits_each_interior_diagonal_once() {
        let (n, m) = (3, 5);
        let pool = WorkerPool::new(1).unwrap();
        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| if i == 0 || j == 0 { 1u64 } else { 0 });
        let stats = sweep(&pool, &mut grid, n, m, |_, _, nb| nb.diag + nb.up + nb.left);
        assert_eq!(stats.parallel + stats.inline, n + m - 1);
        // Delannoy number D(3, 5) = 231.
        assert_eq!(*grid.at(n, m), 231);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn forced_threshold_dispatches_every_diagonal() {
        let (n, m) = (20, 30);
        let pool = WorkerPool::new(4).unwrap().with_threshold(1);
        let mut grid = DiagonalGrid::from_fn(n, m, |i, j| if i == 0 || j == 0 { 1u64 } else { 0 });
        let stats = sweep(&pool, &mut grid, n, m, |_, _, nb| {
            (nb.diag + nb.up + nb.left) % 1_000_003
        });
        assert_eq!(stats.inline, 0);
        assert_eq!(stats.parallel, n + m - 1);

        let mut seq = DiagonalGrid::from_fn(n, m, |i, j| if i == 0 || j == 0 { 1u64 } else { 0 });
        let single = WorkerPool::new(1).unwrap();
        sweep(&single, &mut seq, n, m, |_, _, nb| {
            (nb.diag + nb.up + nb.left) % 1_000_003
        });
        assert_eq!(grid.at(n, m), seq.at(n, m));
    }

    #[test]
    fn threshold_is_configurable() {
        let aligner = WavefrontAligner::new(2).unwrap().with_parallel_threshold(0);
        assert_eq!(aligner.threads(), 2);
        assert_eq!(aligner.parallel_threshold(), 1);
    }
}
