//! Merge engine for linebreak.
//!
//! Both players submit a diff against the same ancestor. The merge keeps
//! every ancestor instruction in order, drops both players' insertions into
//! their gaps, and races them against each other where they collide.
//! Randomness is always supplied by the caller so outcomes can be replayed.
//!
//! # Key Types
//!
//! - [`MergedProgram`] -- Combined instructions, pc maps, and labels
//! - [`Source`] -- Which side an emitted instruction came from
//! - [`MergeError`] -- The two diffs do not share an ancestor

pub mod error;
pub mod interleave;
pub mod labels;
pub mod merge;

pub use error::{MergeError, MergeResult};
pub use interleave::{interleave, Source};
pub use merge::{merge, MergedProgram};
