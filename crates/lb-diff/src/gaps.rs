//! Iteration helpers over pc maps.
//!
//! A pc map lists, in order, where each ancestor instruction (anchor) landed
//! in a derived program. Everything between two consecutive anchors is a gap
//! of inserted instructions.

use std::ops::Range;

use lb_types::Pc;

/// Pair each anchor with the anchor before it (`None` for the first).
pub fn windows(pc_map: &[Pc]) -> impl Iterator<Item = (Option<Pc>, Pc)> + '_ {
    pc_map.iter().scan(None, |prev, &pc| {
        let window = (*prev, pc);
        *prev = Some(pc);
        Some(window)
    })
}

/// The inserted pcs strictly between `prev` and `pc`.
pub fn gap_between(prev: Option<Pc>, pc: Pc) -> Range<Pc> {
    prev.map_or(0, |p| p + 1)..pc
}

/// The inserted pcs after the last anchor of a derived program of `len` instructions.
pub fn trailing(pc_map: &[Pc], len: usize) -> Range<Pc> {
    pc_map.last().map_or(0, |last| last + 1)..len
}

/// Every inserted pc before the last anchor, ascending.
pub fn gaps(pc_map: &[Pc]) -> impl Iterator<Item = Pc> + '_ {
    windows(pc_map).flat_map(|(prev, pc)| gap_between(prev, pc))
}
