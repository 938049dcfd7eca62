use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::instruction::Instruction;
use crate::listing::Line;

/// Zero-based program counter: an index into a program's instructions.
pub type Pc = usize;

/// Label name to the pc of the instruction immediately following the label.
///
/// Iteration follows definition order. A label after the last instruction
/// maps to one past the end.
pub type LabelTable = IndexMap<String, Pc>;

/// An instruction sequence with its labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: LabelTable,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>, labels: LabelTable) -> Self {
        Self {
            instructions,
            labels,
        }
    }

    /// Build a program from a parsed listing.
    ///
    /// Comments and blank lines are dropped. Each label resolves to the pc of
    /// the next instruction in the listing.
    pub fn from_lines(lines: &[Line]) -> Result<Self, TypeError> {
        Ok(Listing::index(lines)?.program)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Render as a listing: each label directly before the instruction it
    /// resolves to, trailing labels last.
    pub fn to_lines(&self) -> Vec<Line> {
        let mut by_pc: BTreeMap<Pc, Vec<&str>> = BTreeMap::new();
        for (label, &pc) in &self.labels {
            by_pc.entry(pc).or_default().push(label);
        }

        let mut lines = Vec::with_capacity(self.instructions.len() + self.labels.len());
        for pc in 0..=self.instructions.len() {
            for label in by_pc.remove(&pc).unwrap_or_default() {
                lines.push(Line::Label(label.to_string()));
            }
            if let Some(instruction) = self.instructions.get(pc) {
                lines.push(Line::Instruction(instruction.clone()));
            }
        }
        lines
    }

    pub fn instruction(&self, pc: Pc) -> Result<&Instruction, TypeError> {
        self.instructions.get(pc).ok_or(TypeError::PcOutOfRange {
            pc,
            len: self.instructions.len(),
        })
    }
}

/// A program together with the listing line each instruction came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub program: Program,
    /// `pc_to_line[pc]` is the index in the listing of instruction `pc`.
    pub pc_to_line: Vec<usize>,
}

impl Listing {
    pub fn index(lines: &[Line]) -> Result<Self, TypeError> {
        let mut program = Program::default();
        let mut pc_to_line = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            match line {
                Line::Instruction(instruction) => {
                    program.instructions.push(instruction.clone());
                    pc_to_line.push(index);
                }
                Line::Label(name) => {
                    let pc = program.instructions.len();
                    if program.labels.insert(name.clone(), pc).is_some() {
                        return Err(TypeError::DuplicateLabel(name.clone()));
                    }
                }
                Line::Comment(_) | Line::Blank => {}
            }
        }

        Ok(Self {
            program,
            pc_to_line,
        })
    }
}
