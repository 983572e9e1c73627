use crate::align::types::Cost;
use crate::error::{AlignError, AlignResult};
use crate::scoring::Scoring;

/// Residues resolved against a [`Scoring`] alphabet.
///
/// `codes[k]` is the dense index of `residues[k]`; the DP reads codes, traceback
/// emits the input residues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedSeq<'a> {
    pub(crate) residues: &'a [u8],
    pub(crate) codes: Vec<u8>,
}

impl<'a> EncodedSeq<'a> {
    pub fn residues(&self) -> &'a [u8] {
        self.residues
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Resolve every residue of `seq`; `sequence` (1 or 2) only labels the error.
pub fn encode<'a, S: Scoring + ?Sized>(
    seq: &'a [u8],
    scoring: &S,
    sequence: usize,
) -> AlignResult<EncodedSeq<'a>> {
    let mut codes = Vec::with_capacity(seq.len());
    for (pos, &b) in seq.iter().enumerate() {
        let code = scoring.index_of(b).ok_or(AlignError::UnknownSymbol {
            symbol: b as char,
            position: pos + 1,
            sequence,
        })?;
        codes.push(code);
    }
    Ok(EncodedSeq {
        residues: seq,
        codes,
    })
}

/// Encode both inputs of one alignment call, failing before any table is allocated.
pub(crate) fn encode_pair<'a, 'b, S: Scoring + ?Sized>(
    a: &'a [u8],
    b: &'b [u8],
    scoring: &S,
) -> AlignResult<(EncodedSeq<'a>, EncodedSeq<'b>)> {
    Ok((encode(a, scoring, 1)?, encode(b, scoring, 2)?))
}

/// Substitution cost lookups for one pair of encoded sequences.
pub(crate) struct PairCosts<'c, S: ?Sized> {
    scoring: &'c S,
    a: &'c [u8],
    b: &'c [u8],
}

impl<'c, S: Scoring + ?Sized> PairCosts<'c, S> {
    pub(crate) fn new(scoring: &'c S, a: &'c EncodedSeq<'_>, b: &'c EncodedSeq<'_>) -> Self {
        Self {
            scoring,
            a: &a.codes,
            b: &b.codes,
        }
    }

    /// Cost of aligning residue `i` of sequence 1 with residue `j` of sequence 2 (both 1-based).
    #[inline]
    pub(crate) fn subst(&self, i: usize, j: usize) -> Cost {
        self.scoring.cost_at(self.a[i - 1], self.b[j - 1])
    }
}
