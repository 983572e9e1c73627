//! Gap penalty models. Both are plain value objects; the DP engines only ever
//! ask them for `cost(length)` or, for the affine layers, the open/extend parts.

use crate::align::types::Cost;
use crate::error::{AlignError, AlignResult};

pub trait GapCost {
    /// Penalty for one contiguous gap of `length` symbols. `cost(0) == 0`.
    fn cost(&self, length: usize) -> Cost;
}

/// `cost(k) = k * penalty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearGap {
    penalty: Cost,
}

impl LinearGap {
    pub fn new(penalty: i64) -> AlignResult<Self> {
        if penalty < 0 {
            return Err(AlignError::NegativeGapPenalty {
                name: "penalty",
                value: penalty,
            });
        }
        Ok(Self { penalty })
    }

    pub fn penalty(&self) -> Cost {
        self.penalty
    }
}

impl GapCost for LinearGap {
    #[inline]
    fn cost(&self, length: usize) -> Cost {
        self.penalty.saturating_mul(length as Cost)
    }
}

/// `cost(0) = 0`, `cost(k) = alpha + beta * k` for `k >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AffineGap {
    alpha: Cost,
    beta: Cost,
}

impl AffineGap {
    pub fn new(alpha: i64, beta: i64) -> AlignResult<Self> {
        if alpha < 0 {
            return Err(AlignError::NegativeGapPenalty {
                name: "alpha",
                value: alpha,
            });
        }
        if beta < 0 {
            return Err(AlignError::NegativeGapPenalty {
                name: "beta",
                value: beta,
            });
        }
        Ok(Self { alpha, beta })
    }

    pub fn alpha(&self) -> Cost {
        self.alpha
    }

    pub fn beta(&self) -> Cost {
        self.beta
    }

    /// Price of the first symbol of a new gap run.
    #[inline]
    pub fn open_cost(&self) -> Cost {
        self.alpha.saturating_add(self.beta)
    }
}

impl GapCost for AffineGap {
    #[inline]
    fn cost(&self, length: usize) -> Cost {
        if length == 0 {
            return 0;
        }
        self.alpha
            .saturating_add(self.beta.saturating_mul(length as Cost))
    }
}

/// Gap model chosen at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GapModel {
    Linear(LinearGap),
    Affine(AffineGap),
}

impl GapModel {
    pub fn linear(penalty: i64) -> AlignResult<Self> {
        LinearGap::new(penalty).map(GapModel::Linear)
    }

    pub fn affine(alpha: i64, beta: i64) -> AlignResult<Self> {
        AffineGap::new(alpha, beta).map(GapModel::Affine)
    }
}

impl GapCost for GapModel {
    fn cost(&self, length: usize) -> Cost {
        match self {
            GapModel::Linear(g) => g.cost(length),
            GapModel::Affine(g) => g.cost(length),
        }
    }
}

impl From<LinearGap> for GapModel {
    fn from(g: LinearGap) -> Self {
        GapModel::Linear(g)
    }
}

impl From<AffineGap> for GapModel {
    fn from(g: AffineGap) -> Self {
        GapModel::Affine(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_cost_is_proportional() {
        let gap = LinearGap::new(3).unwrap();
        assert_eq!(gap.cost(0), 0);
        assert_eq!(gap.cost(1), 3);
        assert_eq!(gap.cost(7), 21);
    }

    #[test]
    fn linear_zero_penalty_allowed() {
        let gap = LinearGap::new(0).unwrap();
        assert_eq!(gap.cost(100), 0);
    }

    #[test]
    fn linear_negative_penalty_rejected() {
        match LinearGap::new(-1) {
            Err(AlignError::NegativeGapPenalty { name, value }) => {
                assert_eq!(name, "penalty");
                assert_eq!(value, -1);
            }
            other => panic!("expected negative gap error, got {other:?}"),
        }
    }

    #[test]
    fn affine_cost_values() {
        let gap = AffineGap::new(10, 3).unwrap();
        assert_eq!(gap.cost(0), 0);
        assert_eq!(gap.cost(1), 13);
        assert_eq!(gap.cost(2), 16);
        assert_eq!(gap.cost(3), 19);
        assert_eq!(gap.open_cost(), 13);
    }

    #[test]
    fn affine_negative_parameters_rejected() {
        assert!(matches!(
            AffineGap::new(-1, 3),
            Err(AlignError::NegativeGapPenalty { name: "alpha", .. })
        ));
        assert!(matches!(
            AffineGap::new(10, -3),
            Err(AlignError::NegativeGapPenalty { name: "beta", .. })
        ));
    }

    #[test]
    fn huge_lengths_saturate() {
        let gap = AffineGap::new(i64::MAX, 1).unwrap();
        assert_eq!(gap.cost(5), i64::MAX);
        let gap = LinearGap::new(i64::MAX / 2).unwrap();
        assert_eq!(gap.cost(4), i64::MAX);
    }

    #[test]
    fn model_dispatches_to_variant() {
        let lin = GapModel::linear(2).unwrap();
        let aff = GapModel::affine(5, 1).unwrap();
        assert_eq!(lin.cost(4), 8);
        assert_eq!(aff.cost(4), 9);
        assert_eq!(aff.cost(0), 0);
        assert!(GapModel::affine(0, -1).is_err());
    }
}
