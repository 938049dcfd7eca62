//! Randomized interleaving of two insertion runs.

use lb_types::Instruction;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where an instruction in a merged program came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Inserted by side A.
    A,
    /// Inserted by side B.
    B,
    /// Present in the common ancestor.
    Ancestor,
}

/// Interleave two runs of inserted instructions.
///
/// While both runs have instructions left, a fair coin picks which side goes
/// next. Once one run is exhausted the rest of the other follows unchanged.
/// Each run keeps its own relative order.
pub fn interleave<'a, R: Rng + ?Sized>(
    a: &'a [Instruction],
    b: &'a [Instruction],
    rng: &mut R,
) -> Vec<(Source, &'a Instruction)> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if rng.gen_bool(0.5) {
            out.push((Source::A, &a[i]));
            i += 1;
        } else {
            out.push((Source::B, &b[j]));
            j += 1;
        }
    }

    out.extend(a[i..].iter().map(|instruction| (Source::A, instruction)));
    out.extend(b[j..].iter().map(|instruction| (Source::B, instruction)));
    out
}
