//! Turn validation: the game rules layered over a raw diff.

use std::collections::HashSet;

use lb_types::{Instruction, Pc, Program};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diff::{diff, Diff};
use crate::error::DiffError;

/// Per-turn rules applied by [`validate_diff`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnPolicy {
    /// Maximum number of instructions a single turn may insert.
    pub max_insertions: usize,
    /// Reject programs that define labels no branch or call refers to.
    pub require_label_use: bool,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            max_insertions: 1,
            require_label_use: true,
        }
    }
}

impl TurnPolicy {
    /// Accept any insertion-only edit.
    pub fn permissive() -> Self {
        Self {
            max_insertions: usize::MAX,
            require_label_use: false,
        }
    }

    /// Parse a policy from TOML. Missing keys take their default values.
    pub fn from_toml(text: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(text)?)
    }
}

/// A policy file could not be read.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid turn policy: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Why a submitted turn was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UserDiffError {
    #[error("your edit removed or reordered `{instruction}` (pc {pc}), which isn't allowed")]
    Deletion { pc: Pc, instruction: Instruction },

    #[error("label changes aren't allowed here: '{label}'")]
    Label { label: String },

    /// Too many insertions. Lists the inserted pcs beyond the allowance.
    #[error("too many instructions inserted this turn (extra at pcs {insertions:?})")]
    Multiple { insertions: Vec<Pc> },

    #[error("labels defined but never used: {}", .labels.join(", "))]
    UnusedLabels { labels: Vec<String> },
}

impl From<DiffError> for UserDiffError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::Deletion { pc, instruction } => Self::Deletion { pc, instruction },
            DiffError::Label { label } => Self::Label { label },
        }
    }
}

/// Diff `modified` against `original` and apply the turn rules.
///
/// Checks run in order: structural diff, insertion count, label usage.
/// Returns the diff when the turn is accepted.
pub fn validate_diff(
    original: &Program,
    modified: &Program,
    policy: &TurnPolicy,
) -> Result<Diff, UserDiffError> {
    let result = diff(original, modified)?;

    if result.insertion_count() > policy.max_insertions {
        let insertions: Vec<Pc> = result
            .inserted_pcs()
            .into_iter()
            .skip(policy.max_insertions)
            .collect();
        debug!(count = result.insertion_count(), "turn rejected: too many insertions");
        return Err(UserDiffError::Multiple { insertions });
    }

    if policy.require_label_use {
        let labels = unused_labels(modified);
        if !labels.is_empty() {
            debug!(?labels, "turn rejected: unused labels");
            return Err(UserDiffError::UnusedLabels { labels });
        }
    }

    Ok(result)
}

/// Labels defined in `program` that no branch or call refers to, in
/// definition order.
pub fn unused_labels(program: &Program) -> Vec<String> {
    let used: HashSet<&str> = program
        .instructions
        .iter()
        .filter_map(Instruction::label)
        .collect();

    program
        .labels
        .keys()
        .filter(|label| !used.contains(label.as_str()))
        .cloned()
        .collect()
}
