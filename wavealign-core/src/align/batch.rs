use log::debug;
use num_bigint::BigUint;

use super::global_count;
use super::types::Cost;
use crate::error::AlignResult;
use crate::gap::GapModel;
use crate::scoring::Scoring;
use crate::seq::Sequence;

/// Optimal cost and co-optimal count for one unordered pair of records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairEntry {
    pub seq_a: Box<str>,
    pub seq_b: Box<str>,
    pub cost: Cost,
    pub count: BigUint,
}

/// Every pair `i < j` of `seqs`, in row order. Pairs are spread over rayon's
/// global pool; each pair runs the sequential engine.
pub fn pairwise_table<S: Scoring + ?Sized>(
    seqs: &[Sequence],
    scoring: &S,
    gap: &GapModel,
) -> AlignResult<Vec<PairEntry>> {
    let pairs: Vec<(usize, usize)> = (0..seqs.len())
        .flat_map(|i| (i + 1..seqs.len()).map(move |j| (i, j)))
        .collect();
    debug!(
        "pairwise table: {} sequences, {} pairs",
        seqs.len(),
        pairs.len()
    );

    par_try_map!(pairs, |&(i, j): &(usize, usize)| -> AlignResult<PairEntry> {
        let (a, b) = (&seqs[i], &seqs[j]);
        let (cost, count) = global_count(a.residues(), b.residues(), scoring, gap)?;
        Ok(PairEntry {
            seq_a: a.id().into(),
            seq_b: b.id().into(),
            cost,
            count,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlignError;
    use crate::scoring::ScoreMatrix;

    fn matrix() -> ScoreMatrix {
        ScoreMatrix::new(b"AC", vec![0, 5, 5, 0]).unwrap()
    }

    #[test]
    fn all_pairs_in_row_order() {
        let seqs = vec![
            Sequence::new("x", "AC"),
            Sequence::new("y", "A"),
            Sequence::new("z", "AA"),
        ];
        let gap = GapModel::linear(2).unwrap();
        let table = pairwise_table(&seqs, &matrix(), &gap).unwrap();
        let pairs: Vec<(&str, &str)> = table.iter().map(|e| (&*e.seq_a, &*e.seq_b)).collect();
        assert_eq!(pairs, [("x", "y"), ("x", "z"), ("y", "z")]);
        assert_eq!(table[0].cost, 2);
        assert_eq!(table[0].count, BigUint::from(1u32));
        // y/z: A against AA, two equally cheap placements of the gap.
        assert_eq!(table[2].cost, 2);
        assert_eq!(table[2].count, BigUint::from(2u32));
    }

    #[test]
    fn fewer_than_two_records_give_empty_table() {
        let gap = GapModel::affine(1, 1).unwrap();
        assert!(pairwise_table(&[], &matrix(), &gap).unwrap().is_empty());
        let one = [Sequence::new("x", "AC")];
        assert!(pairwise_table(&one, &matrix(), &gap).unwrap().is_empty());
    }

    #[test]
    fn unknown_residue_fails_whole_table() {
        let seqs = [Sequence::new("x", "AC"), Sequence::new("y", "AG")];
        let gap = GapModel::linear(1).unwrap();
        assert!(matches!(
            pairwise_table(&seqs, &matrix(), &gap),
            Err(AlignError::UnknownSymbol { symbol: 'G', .. })
        ));
    }
}
