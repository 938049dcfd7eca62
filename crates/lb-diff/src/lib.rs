//! Diff engine for linebreak.
//!
//! A turn is legal only if the player's program evolved from the shared
//! ancestor by inserting instructions. This crate computes that relationship,
//! enforces the per-turn policy on top of it, and maps a diff back onto the
//! ancestor's source listing.
//!
//! # Key Types
//!
//! - [`Diff`] -- Ancestor-to-derived pc map, changed labels, derived instructions
//! - [`DiffError`] -- Deletion or label violation found while diffing
//! - [`UserDiffError`] / [`TurnPolicy`] -- Game-level turn validation

pub mod apply;
pub mod diff;
pub mod error;
pub mod gaps;
pub mod labels;
pub mod matcher;
pub mod validate;

pub use apply::apply;
pub use diff::{diff, Diff};
pub use error::{ApplyError, DiffError, DiffResult};
pub use gaps::{gap_between, gaps, trailing, windows};
pub use labels::reconcile_labels;
pub use matcher::match_instructions;
pub use validate::{unused_labels, validate_diff, PolicyError, TurnPolicy, UserDiffError};
