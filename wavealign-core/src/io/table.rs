use crate::align::PairEntry;
use crate::error::AlignResult;
use std::io::Write;

pub const PAIRWISE_HEADER: [&str; 4] = ["seq_a", "seq_b", "cost", "count"];

/// Write `seq_a,seq_b,cost,count` rows, header first.
pub fn write_pairwise_csv<W: Write>(writer: W, entries: &[PairEntry]) -> AlignResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(PAIRWISE_HEADER)?;
    for entry in entries {
        let cost = entry.cost.to_string();
        let count = entry.count.to_string();
        out.write_record([&*entry.seq_a, &*entry.seq_b, cost.as_str(), count.as_str()])?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn header_and_rows() {
        let entries = vec![
            PairEntry {
                seq_a: "a".into(),
                seq_b: "b".into(),
                cost: 7,
                count: BigUint::from(3u32),
            },
            PairEntry {
                seq_a: "a".into(),
                seq_b: "c, d".into(),
                cost: -1,
                count: BigUint::from(1u32) << 70,
            },
        ];
        let mut buf = Vec::new();
        write_pairwise_csv(&mut buf, &entries).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "seq_a,seq_b,cost,count\na,b,7,3\na,\"c, d\",-1,1180591620717411303424\n"
        );
    }

    #[test]
    fn empty_table_has_header_only() {
        let mut buf = Vec::new();
        write_pairwise_csv(&mut buf, &[]).unwrap();
        assert_eq!(buf, b"seq_a,seq_b,cost,count\n");
    }
}
