//! Program diff: how a derived program relates to its ancestor.

use lb_types::{Instruction, LabelTable, Pc, Program};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DiffResult;
use crate::gaps::{gaps, trailing};
use crate::labels::reconcile_labels;
use crate::matcher::match_instructions;

/// The insertion-only relationship from an ancestor program to a derived one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    /// `pc_map[i]` is the derived pc of ancestor instruction `i`. Strictly
    /// increasing, one entry per ancestor instruction.
    pub pc_map: Vec<Pc>,
    /// Labels that are new or moved relative to the ancestor.
    pub labels: LabelTable,
    /// The derived program's full instruction sequence.
    pub instructions: Vec<Instruction>,
}

impl Diff {
    /// Number of ancestor instructions this diff is anchored to.
    pub fn ancestor_len(&self) -> usize {
        self.pc_map.len()
    }

    /// Derived pcs that hold inserted instructions, ascending.
    pub fn inserted_pcs(&self) -> Vec<Pc> {
        gaps(&self.pc_map)
            .chain(trailing(&self.pc_map, self.instructions.len()))
            .collect()
    }

    pub fn insertion_count(&self) -> usize {
        self.instructions.len().saturating_sub(self.pc_map.len())
    }

    /// Returns `true` if the derived program equals the ancestor.
    pub fn is_identity(&self) -> bool {
        self.insertion_count() == 0 && self.labels.is_empty()
    }
}

/// Diff `modified` against its ancestor `original`.
///
/// Fails if an ancestor instruction is missing from `modified` or a label
/// left its window; see [`match_instructions`] and [`reconcile_labels`].
pub fn diff(original: &Program, modified: &Program) -> DiffResult<Diff> {
    let pc_map = match_instructions(&original.instructions, &modified.instructions)?;
    let labels = reconcile_labels(&original.labels, &modified.labels, &pc_map)?;

    debug!(
        anchors = pc_map.len(),
        inserted = modified.len() - pc_map.len(),
        labels = labels.len(),
        "diff computed"
    );

    Ok(Diff {
        pc_map,
        labels,
        instructions: modified.instructions.clone(),
    })
}
