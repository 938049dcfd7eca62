use thiserror::Error;

use crate::program::Pc;

/// Errors produced while building programs and listings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("label '{0}' is defined more than once")]
    DuplicateLabel(String),

    #[error("pc {pc} is out of range for a program of {len} instructions")]
    PcOutOfRange { pc: Pc, len: usize },
}

impl TypeError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
