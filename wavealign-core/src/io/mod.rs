pub mod fasta;
pub mod table;

pub use fasta::{
    read_fasta_from_bytes, read_fasta_from_path, read_fasta_from_reader, read_first_from_bytes,
    read_first_from_path, read_first_from_reader, FastaRecords,
};
pub use table::write_pairwise_csv;
