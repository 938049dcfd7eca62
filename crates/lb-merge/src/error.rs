//! Error types for the merge crate.

use lb_types::Pc;

use crate::interleave::Source;

/// The two diffs handed to [`merge`](crate::merge) cannot have come from the
/// same ancestor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("diffs disagree on ancestor length: {a} vs {b} instructions")]
    AncestorMismatch { a: usize, b: usize },

    #[error("diffs disagree on ancestor instruction {index}")]
    AnchorMismatch { index: usize },

    #[error("side {side:?} refers to pc {pc} beyond its {len} instructions")]
    PcOutOfRange { side: Source, pc: Pc, len: usize },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
