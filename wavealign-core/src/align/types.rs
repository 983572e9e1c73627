use num_bigint::BigUint;
use num_traits::Zero;

pub type Cost = i64;

pub const GAP: u8 = b'-';

/// Predecessor of a linear-model cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// From `(i-1, j-1)`: one residue from each sequence.
    Diag,
    /// From `(i-1, j)`: residue of sequence 1 against a gap.
    Up,
    /// From `(i, j-1)`: residue of sequence 2 against a gap.
    Left,
}

/// Affine alignment layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Ends in a residue-residue column.
    D,
    /// Ends in a gap consuming sequence 1.
    I,
    /// Ends in a gap consuming sequence 2.
    S,
}

/// One optimal global alignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub cost: Cost,
    pub aligned_a: String,
    pub aligned_b: String,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.aligned_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_a.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LinearTraced {
    pub cost: Cost,
    /// `None` only at the origin.
    pub step: Option<Move>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LinearCounted {
    pub cost: Cost,
    pub count: BigUint,
}

/// Costs of the three affine layers at one cell. `None` marks an unreachable state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct AffineCost {
    pub d: Option<Cost>,
    pub i: Option<Cost>,
    pub s: Option<Cost>,
}

impl AffineCost {
    pub const UNREACHABLE: AffineCost = AffineCost {
        d: None,
        i: None,
        s: None,
    };

    /// Best reachable layer, ties resolved D > I > S.
    pub fn best(&self) -> Option<(Cost, Layer)> {
        pick(&[(self.d, Layer::D), (self.i, Layer::I), (self.s, Layer::S)])
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct AffineTraced {
    pub cost: AffineCost,
    pub from_d: Option<Layer>,
    pub from_i: Option<Layer>,
    pub from_s: Option<Layer>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AffineCounted {
    pub cost: AffineCost,
    pub d: BigUint,
    pub i: BigUint,
    pub s: BigUint,
}

impl AffineCounted {
    /// Number of optimal paths ending in this cell over every layer that attains the minimum.
    pub fn total(&self) -> BigUint {
        let Some((best, _)) = self.cost.best() else {
            return BigUint::zero();
        };
        let mut total = BigUint::zero();
        for (cost, count) in [
            (self.cost.d, &self.d),
            (self.cost.i, &self.i),
            (self.cost.s, &self.s),
        ] {
            if cost == Some(best) {
                total += count;
            }
        }
        total
    }
}

/// Minimum over reachable candidates; the first candidate wins exact ties.
#[inline]
pub(crate) fn pick(candidates: &[(Option<Cost>, Layer)]) -> Option<(Cost, Layer)> {
    let mut best: Option<(Cost, Layer)> = None;
    for &(cost, layer) in candidates {
        if let Some(c) = cost {
            match best {
                Some((b, _)) if c >= b => {}
                _ => best = Some((c, layer)),
            }
        }
    }
    best
}

#[inline]
pub(crate) fn plus(cost: Option<Cost>, delta: Cost) -> Option<Cost> {
    cost.map(|c| c.saturating_add(delta))
}
