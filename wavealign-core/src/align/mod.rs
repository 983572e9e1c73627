pub mod batch;
pub mod encode;
pub mod types;
pub mod wavefront;

mod affine;
mod grid;
mod linear;
mod traceback;

pub use batch::{pairwise_table, PairEntry};
pub use encode::{encode, EncodedSeq};
pub use types::{Alignment, Cost, Layer, Move, GAP};
pub use wavefront::WavefrontAligner;

use log::debug;
use num_bigint::BigUint;

use crate::error::AlignResult;
use crate::gap::{AffineGap, GapCost, GapModel, LinearGap};
use crate::scoring::Scoring;
use encode::encode_pair;


/// Exact global alignment under one gap model `G`.
///
/// Every operation resolves both sequences against `scoring` before any table is
/// allocated and fails with [`crate::error::AlignError::UnknownSymbol`] otherwise.
///
/// Traceback tie-breaks are fixed: DIAG > UP > LEFT for the linear model; for the
/// affine model D > I > S when choosing a predecessor or the starting layer, and
/// extending a gap wins an exact tie with opening one. Counting ignores the
/// tie-break and sums over every tied predecessor.
pub trait GlobalAligner<G: GapCost> {
    fn compute_cost<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &G,
    ) -> AlignResult<Cost>;

    fn align<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &G,
    ) -> AlignResult<Alignment>;

    /// Optimal cost together with the number of distinct alignments attaining it.
    fn cost_and_count<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &G,
    ) -> AlignResult<(Cost, BigUint)>;

    fn count_optimal<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &G,
    ) -> AlignResult<BigUint> {
        self.cost_and_count(a, b, scoring, gap).map(|(_, count)| count)
    }
}

/// Single-threaded engines. Cost-only calls keep one rolling row.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialAligner;

impl GlobalAligner<LinearGap> for SequentialAligner {
    fn compute_cost<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &LinearGap,
    ) -> AlignResult<Cost> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        debug!("linear cost: n={} m={}", ea.len(), eb.len());
        Ok(linear::cost(&ea, &eb, scoring, gap))
    }

    fn align<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &LinearGap,
    ) -> AlignResult<Alignment> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        debug!("linear align: n={} m={}", ea.len(), eb.len());
        linear::align(&ea, &eb, scoring, gap)
    }

    fn cost_and_count<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &LinearGap,
    ) -> AlignResult<(Cost, BigUint)> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        debug!("linear count: n={} m={}", ea.len(), eb.len());
        Ok(linear::count(&ea, &eb, scoring, gap))
    }
}

impl GlobalAligner<AffineGap> for SequentialAligner {
    fn compute_cost<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &AffineGap,
    ) -> AlignResult<Cost> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        debug!("affine cost: n={} m={}", ea.len(), eb.len());
        Ok(affine::cost(&ea, &eb, scoring, gap))
    }

    fn align<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &AffineGap,
    ) -> AlignResult<Alignment> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        debug!("affine align: n={} m={}", ea.len(), eb.len());
        affine::align(&ea, &eb, scoring, gap)
    }

    fn cost_and_count<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &AffineGap,
    ) -> AlignResult<(Cost, BigUint)> {
        let (ea, eb) = encode_pair(a, b, scoring)?;
        debug!("affine count: n={} m={}", ea.len(), eb.len());
        Ok(affine::count(&ea, &eb, scoring, gap))
    }
}

pub fn global_cost<S: Scoring + ?Sized>(
    a: &[u8],
    b: &[u8],
    scoring: &S,
    gap: &GapModel,
) -> AlignResult<Cost> {
    match gap {
        GapModel::Linear(g) => SequentialAligner.compute_cost(a, b, scoring, g),
        GapModel::Affine(g) => SequentialAligner.compute_cost(a, b, scoring, g),
    }
}

pub fn global_align<S: Scoring + ?Sized>(
    a: &[u8],
    b: &[u8],
    scoring: &S,
    gap: &GapModel,
) -> AlignResult<Alignment> {
    match gap {
        GapModel::Linear(g) => SequentialAligner.align(a, b, scoring, g),
        GapModel::Affine(g) => SequentialAligner.align(a, b, scoring, g),
    }
}

/// Optimal cost and optimal-alignment count.
pub fn global_count<S: Scoring + ?Sized>(
    a: &[u8],
    b: &[u8],
    scoring: &S,
    gap: &GapModel,
) -> AlignResult<(Cost, BigUint)> {
    match gap {
        GapModel::Linear(g) => SequentialAligner.cost_and_count(a, b, scoring, g),
        GapModel::Affine(g) => SequentialAligner.cost_and_count(a, b, scoring, g),
    }
}
