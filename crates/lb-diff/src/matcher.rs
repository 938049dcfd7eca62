//! Greedy instruction matching.
//!
//! Walks the modified sequence once, matching each instruction against the
//! next unmatched ancestor instruction. Anything that does not match is an
//! insertion. There is no lookahead or backtracking, so swapping two
//! ancestor instructions reads as a deletion of the first one.

use lb_types::{Instruction, Pc};

use crate::error::{DiffError, DiffResult};

/// Compute the ancestor-to-modified pc map.
///
/// On success the map has one entry per `original` instruction and is
/// strictly increasing. Fails with [`DiffError::Deletion`] naming the first
/// ancestor instruction that was never found.
pub fn match_instructions(original: &[Instruction], modified: &[Instruction]) -> DiffResult<Vec<Pc>> {
    let mut pc_map = Vec::with_capacity(original.len());
    let mut cursor = 0;

    for (pc, instruction) in modified.iter().enumerate() {
        match original.get(cursor) {
            Some(expected) if expected == instruction => {
                pc_map.push(pc);
                cursor += 1;
            }
            Some(_) => {}
            None => break,
        }
    }

    match original.get(cursor) {
        None => Ok(pc_map),
        Some(instruction) => Err(DiffError::Deletion {
            pc: pc_map.last().map_or(0, |last| last + 1),
            instruction: instruction.clone(),
        }),
    }
}
