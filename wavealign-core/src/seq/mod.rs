pub mod record;

pub use record::Sequence;

/// Copy `input` without ASCII whitespace, upper-casing letters.
pub fn normalize_residues(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &b in input {
        if !b.is_ascii_whitespace() {
            out.push(b.to_ascii_uppercase());
        }
    }
    out
}
