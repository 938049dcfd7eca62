//! Error types for the diff crate.

use lb_types::{Instruction, Pc};
use serde::{Deserialize, Serialize};

/// Why a modified program is not a pure insertion-only evolution of its ancestor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DiffError {
    /// The ancestor instruction could not be found going forward. `pc` is
    /// where the modified program would have needed it.
    #[error("instruction `{instruction}` expected at pc {pc} was removed or reordered")]
    Deletion { pc: Pc, instruction: Instruction },

    /// A label vanished or left the window around the instruction it preceded.
    #[error("label '{label}' was removed or moved")]
    Label { label: String },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;

/// A diff could not be mapped back onto an ancestor listing.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("invalid ancestor listing: {0}")]
    Listing(#[from] lb_types::TypeError),

    #[error("diff expects {expected} ancestor instructions, listing has {actual}")]
    AncestorMismatch { expected: usize, actual: usize },

    #[error("pc {pc} is beyond the {len} derived instructions")]
    PcOutOfRange { pc: Pc, len: usize },
}
