#[macro_use]
pub mod par;

pub mod align;
pub mod error;
pub mod gap;
pub mod io;
pub mod scoring;
pub mod seq;

pub use align::{
    global_align, global_cost, global_count, Alignment, Cost, GlobalAligner, SequentialAligner,
    WavefrontAligner,
};
pub use error::{AlignError, AlignResult};
pub use gap::{AffineGap, GapCost, GapModel, LinearGap};
pub use scoring::{ScoreMatrix, Scoring};
pub use seq::Sequence;
