use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("gap penalty {name} must be non-negative, got {value}")]
    NegativeGapPenalty { name: &'static str, value: i64 },

    #[error("invalid worker count: {threads} (must be positive)")]
    InvalidThreads { threads: usize },

    #[error("unknown symbol '{symbol}' at position {position} of sequence {sequence}")]
    UnknownSymbol {
        symbol: char,
        position: usize,
        sequence: usize,
    },

    #[error("score matrix format error at line {line}: {msg}")]
    MatrixFormat { msg: String, line: usize },

    #[error("invalid score matrix: {msg}")]
    InvalidMatrix { msg: String },

    #[error("fasta format error at line {line}: {msg}")]
    FastaFormat { msg: &'static str, line: usize },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to build worker pool: {msg}")]
    ThreadPool { msg: String },

    /// Traceback walked into a cell without a recorded predecessor. Always a defect.
    #[error("traceback reached an unset predecessor at cell ({i}, {j})")]
    Traceback { i: usize, j: usize },
}

pub type AlignResult<T> = Result<T, AlignError>;
