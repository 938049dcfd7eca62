//! Foundation types for linebreak.
//!
//! Two players edit one shared program in turns. This crate holds the values
//! every other linebreak crate passes around: the instruction set, programs
//! with their label tables, and the line-level listings players actually see.
//!
//! # Key Types
//!
//! - [`Instruction`] — Opcode plus operands, compared structurally
//! - [`Program`] — Instruction sequence plus an ordered [`LabelTable`]
//! - [`Line`] — One line of a source listing (instruction, label, comment, blank)
//! - [`Pc`] — Zero-based program counter

pub mod error;
pub mod instruction;
pub mod listing;
pub mod program;

pub use error::TypeError;
pub use instruction::{Address, AluOp, Condition, Instruction, Operand, Register};
pub use listing::{parse_listing, render_listing, Line};
pub use program::{LabelTable, Listing, Pc, Program};
