pub mod matrix;

pub use matrix::ScoreMatrix;

use crate::align::types::Cost;
use crate::error::{AlignError, AlignResult};

/// Substitution cost lookup consumed by the alignment engines.
///
/// Residues are first resolved to dense indices with [`Scoring::index_of`]; the
/// recurrences then only call [`Scoring::cost_at`] on indices that resolved.
pub trait Scoring: Sync {
    fn index_of(&self, symbol: u8) -> Option<u8>;

    fn cost_at(&self, a: u8, b: u8) -> Cost;

    fn cost(&self, a: u8, b: u8) -> AlignResult<Cost> {
        let ia = self.index_of(a).ok_or(AlignError::UnknownSymbol {
            symbol: a as char,
            position: 1,
            sequence: 1,
        })?;
        let ib = self.index_of(b).ok_or(AlignError::UnknownSymbol {
            symbol: b as char,
            position: 1,
            sequence: 2,
        })?;
        Ok(self.cost_at(ia, ib))
    }
}
