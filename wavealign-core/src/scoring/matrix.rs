use super::Scoring;
use crate::align::types::Cost;
use crate::error::{AlignError, AlignResult};
use std::fs;
use std::path::Path;

const ABSENT: u8 = u8::MAX;

/// Square substitution cost matrix over a small ASCII alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMatrix {
    symbols: Vec<u8>,
    values: Vec<Cost>,
    map: [u8; 256],
}

impl ScoreMatrix {
    /// `values` is row-major, `symbols.len()` squared entries.
    pub fn new(symbols: &[u8], values: Vec<Cost>) -> AlignResult<Self> {
        let k = symbols.len();
        if k == 0 {
            return Err(AlignError::InvalidMatrix {
                msg: "alphabet is empty".into(),
            });
        }
        if k >= ABSENT as usize {
            return Err(AlignError::InvalidMatrix {
                msg: format!("alphabet has {k} symbols (at most {} supported)", ABSENT - 1),
            });
        }
        if values.len() != k * k {
            return Err(AlignError::InvalidMatrix {
                msg: format!(
                    "expected {} values for {k} symbols, got {}",
                    k * k,
                    values.len()
                ),
            });
        }

        let mut symbols_upper = Vec::with_capacity(k);
        let mut map = [ABSENT; 256];
        for (idx, &raw) in symbols.iter().enumerate() {
            if !raw.is_ascii_graphic() {
                return Err(AlignError::InvalidMatrix {
                    msg: format!("symbol {raw:#04x} is not a printable ASCII character"),
                });
            }
            let sym = raw.to_ascii_uppercase();
            if map[sym as usize] != ABSENT {
                return Err(AlignError::InvalidMatrix {
                    msg: format!("duplicate symbol '{}'", sym as char),
                });
            }
            map[sym as usize] = idx as u8;
            map[sym.to_ascii_lowercase() as usize] = idx as u8;
            symbols_upper.push(sym);
        }

        Ok(Self {
            symbols: symbols_upper,
            values,
            map,
        })
    }

    /// Parse the PHYLIP-like layout: a size line `k`, then `k` rows of `SYMBOL v1 .. vk`.
    /// Blank lines are ignored anywhere.
    pub fn from_phylip_str(text: &str) -> AlignResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (size_line, size_raw) = lines.next().ok_or(AlignError::MatrixFormat {
            msg: "matrix text is empty".into(),
            line: 1,
        })?;
        let k: usize = size_raw.parse().map_err(|_| AlignError::MatrixFormat {
            msg: format!("expected alphabet size, got '{size_raw}'"),
            line: size_line,
        })?;
        if k == 0 {
            return Err(AlignError::MatrixFormat {
                msg: "alphabet size must be positive".into(),
                line: size_line,
            });
        }

        let mut symbols = Vec::with_capacity(k);
        let mut values = Vec::with_capacity(k * k);
        let mut last_line = size_line;
        for row in 0..k {
            let (line_no, raw) = lines.next().ok_or_else(|| AlignError::MatrixFormat {
                msg: format!("expected {k} matrix rows, found {row}"),
                line: last_line,
            })?;
            last_line = line_no;

            let tokens: Vec<&str> = raw.split_whitespace().collect();
            if tokens.len() != k + 1 {
                return Err(AlignError::MatrixFormat {
                    msg: format!(
                        "expected symbol followed by {k} integers, got {} fields",
                        tokens.len()
                    ),
                    line: line_no,
                });
            }
            let sym = tokens[0].as_bytes();
            if sym.len() != 1 {
                return Err(AlignError::MatrixFormat {
                    msg: format!("symbol '{}' must be a single character", tokens[0]),
                    line: line_no,
                });
            }
            symbols.push(sym[0]);
            for (col, tok) in tokens[1..].iter().enumerate() {
                let v: Cost = tok.parse().map_err(|_| AlignError::MatrixFormat {
                    msg: format!("invalid integer '{tok}' in column {}", col + 1),
                    line: line_no,
                })?;
                values.push(v);
            }
        }

        Self::new(&symbols, values)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AlignResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_phylip_str(&text)
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_symmetric(&self) -> bool {
        let k = self.len();
        (0..k).all(|a| (0..a).all(|b| self.values[a * k + b] == self.values[b * k + a]))
    }
}

impl Scoring for ScoreMatrix {
    #[inline]
    fn index_of(&self, symbol: u8) -> Option<u8> {
        match self.map[symbol as usize] {
            ABSENT => None,
            idx => Some(idx),
        }
    }

    #[inline]
    fn cost_at(&self, a: u8, b: u8) -> Cost {
        self.values[a as usize * self.symbols.len() + b as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BY_TWO: &str = "2\nA 0 5\nC 5 0\n";

    #[test]
    fn parse_two_by_two() {
        let m = ScoreMatrix::from_phylip_str(TWO_BY_TWO).unwrap();
        assert_eq!(m.symbols(), b"AC");
        assert_eq!(m.cost(b'A', b'A').unwrap(), 0);
        assert_eq!(m.cost(b'A', b'C').unwrap(), 5);
        assert!(m.is_symmetric());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let m = ScoreMatrix::from_phylip_str("2\na 0 5\nc 5 0\n").unwrap();
        assert_eq!(m.symbols(), b"AC");
        assert_eq!(m.cost(b'a', b'C').unwrap(), 5);
        assert_eq!(m.index_of(b'c'), Some(1));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let m = ScoreMatrix::from_phylip_str("\n  2\n\nA 0 1\n\nC 2 0\n\n").unwrap();
        assert_eq!(m.cost(b'C', b'A').unwrap(), 2);
        assert!(!m.is_symmetric());
    }

    #[test]
    fn unknown_symbol_reported() {
        let m = ScoreMatrix::from_phylip_str(TWO_BY_TWO).unwrap();
        match m.cost(b'A', b'G') {
            Err(AlignError::UnknownSymbol { symbol: 'G', .. }) => {}
            other => panic!("expected unknown symbol, got {other:?}"),
        }
    }

    #[test]
    fn short_row_rejected_with_line() {
        match ScoreMatrix::from_phylip_str("2\nA 0 5\nC 5\n") {
            Err(AlignError::MatrixFormat { line: 3, .. }) => {}
            other => panic!("expected format error on line 3, got {other:?}"),
        }
    }

    #[test]
    fn missing_rows_rejected() {
        assert!(matches!(
            ScoreMatrix::from_phylip_str("3\nA 0 1 1\nC 1 0 1\n"),
            Err(AlignError::MatrixFormat { .. })
        ));
    }

    #[test]
    fn bad_size_and_values_rejected() {
        assert!(matches!(
            ScoreMatrix::from_phylip_str("x\n"),
            Err(AlignError::MatrixFormat { line: 1, .. })
        ));
        assert!(matches!(
            ScoreMatrix::from_phylip_str("0\n"),
            Err(AlignError::MatrixFormat { .. })
        ));
        assert!(matches!(
            ScoreMatrix::from_phylip_str("1\nA z\n"),
            Err(AlignError::MatrixFormat { line: 2, .. })
        ));
        assert!(matches!(
            ScoreMatrix::from_phylip_str("1\nAB 0\n"),
            Err(AlignError::MatrixFormat { line: 2, .. })
        ));
        assert!(matches!(
            ScoreMatrix::from_phylip_str(""),
            Err(AlignError::MatrixFormat { .. })
        ));
    }

    #[test]
    fn duplicate_symbol_rejected() {
        assert!(matches!(
            ScoreMatrix::from_phylip_str("2\nA 0 1\na 1 0\n"),
            Err(AlignError::InvalidMatrix { .. })
        ));
    }

    #[test]
    fn negative_costs_are_kept() {
        let m = ScoreMatrix::new(b"AC", vec![-1, 2, 2, -1]).unwrap();
        assert_eq!(m.cost(b'A', b'A').unwrap(), -1);
    }
}
