//! Two-way merge of sibling diffs.

use std::ops::Range;

use lb_diff::{gap_between, trailing, windows, Diff};
use lb_types::{Instruction, LabelTable, Pc, Program};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::interleave::{interleave, Source};
use crate::labels::{label_window, place};

/// The result of merging two diffs of one ancestor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedProgram {
    pub instructions: Vec<Instruction>,
    /// Merged pc of each ancestor instruction.
    pub orig_pc_map: Vec<Pc>,
    /// Merged pc of each instruction of side A's program.
    pub a_pc_map: Vec<Pc>,
    /// Merged pc of each instruction of side B's program.
    pub b_pc_map: Vec<Pc>,
    /// Labels either side added or moved, at their merged pc.
    pub labels: LabelTable,
}

impl MergedProgram {
    fn push(&mut self, source: Source, instruction: &Instruction) {
        let pc = self.instructions.len();
        match source {
            Source::A => self.a_pc_map.push(pc),
            Source::B => self.b_pc_map.push(pc),
            Source::Ancestor => {
                self.orig_pc_map.push(pc);
                self.a_pc_map.push(pc);
                self.b_pc_map.push(pc);
            }
        }
        self.instructions.push(instruction.clone());
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The merge as a diff against the common ancestor.
    pub fn into_diff(self) -> Diff {
        Diff {
            pc_map: self.orig_pc_map,
            labels: self.labels,
            instructions: self.instructions,
        }
    }

    /// The merged program with a complete label table, ready to serve as the
    /// ancestor of the next round.
    ///
    /// Ancestor labels neither side touched are placed as if both sides had
    /// kept them at their ancestor pc.
    pub fn into_program<R: Rng + ?Sized>(self, ancestor: &Program, rng: &mut R) -> Program {
        let len = self.instructions.len();
        let mut labels = self.labels;

        for (label, &pc) in &ancestor.labels {
            if labels.contains_key(label) {
                continue;
            }
            let a = label_window(Some(pc), &self.a_pc_map, len);
            let b = label_window(Some(pc), &self.b_pc_map, len);
            labels.insert(label.clone(), place(a, b, rng));
        }

        Program::new(self.instructions, labels)
    }
}

/// Merge two diffs computed against the same ancestor.
///
/// Ancestor instructions keep their relative order. Each side's insertions
/// stay in their gap and in their own order; where both sides inserted into
/// the same gap the runs are interleaved at random. Labels from either side
/// are placed uniformly at random within the pcs both sides allow.
pub fn merge<R: Rng + ?Sized>(a: &Diff, b: &Diff, rng: &mut R) -> MergeResult<MergedProgram> {
    if a.pc_map.len() != b.pc_map.len() {
        return Err(MergeError::AncestorMismatch {
            a: a.pc_map.len(),
            b: b.pc_map.len(),
        });
    }

    let mut merged = MergedProgram::default();
    let anchors = windows(&a.pc_map).zip(windows(&b.pc_map));

    for (index, ((a_prev, a_pc), (b_prev, b_pc))) in anchors.enumerate() {
        let a_gap = run(a, Source::A, gap_between(a_prev, a_pc))?;
        let b_gap = run(b, Source::B, gap_between(b_prev, b_pc))?;
        for (source, instruction) in interleave(a_gap, b_gap, rng) {
            merged.push(source, instruction);
        }

        let anchor = &run(a, Source::A, a_pc..a_pc + 1)?[0];
        if anchor != &run(b, Source::B, b_pc..b_pc + 1)?[0] {
            return Err(MergeError::AnchorMismatch { index });
        }
        merged.push(Source::Ancestor, anchor);
    }

    let a_rest = run(a, Source::A, trailing(&a.pc_map, a.instructions.len()))?;
    let b_rest = run(b, Source::B, trailing(&b.pc_map, b.instructions.len()))?;
    for (source, instruction) in interleave(a_rest, b_rest, rng) {
        merged.push(source, instruction);
    }

    merged.labels = merge_labels(&merged, a, b, rng);

    debug!(
        ancestor = merged.orig_pc_map.len(),
        from_a = a.insertion_count(),
        from_b = b.insertion_count(),
        labels = merged.labels.len(),
        "merged diffs"
    );

    Ok(merged)
}

fn run(diff: &Diff, side: Source, range: Range<Pc>) -> MergeResult<&[Instruction]> {
    diff.instructions
        .get(range.clone())
        .ok_or(MergeError::PcOutOfRange {
            side,
            pc: range.end,
            len: diff.instructions.len(),
        })
}

/// Side A's labels in order, then side B's labels A does not know about.
fn merge_labels<R: Rng + ?Sized>(merged: &MergedProgram, a: &Diff, b: &Diff, rng: &mut R) -> LabelTable {
    let len = merged.len();
    let names = a
        .labels
        .keys()
        .chain(b.labels.keys().filter(|label| !a.labels.contains_key(*label)));

    names
        .map(|label| {
            let a_window = label_window(a.labels.get(label).copied(), &merged.a_pc_map, len);
            let b_window = label_window(b.labels.get(label).copied(), &merged.b_pc_map, len);
            (label.clone(), place(a_window, b_window, rng))
        })
        .collect()
}
