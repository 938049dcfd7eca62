//! Label placement in a merged program.

use lb_types::Pc;
use rand::Rng;

/// Inclusive range of merged pcs a label may take according to one side.
///
/// `pc` is the label's position in that side's program, `side_pc_map` maps
/// that side's pcs into the merged program, and `len` is the merged length.
/// A side that says nothing about the label allows the whole program.
pub fn label_window(pc: Option<Pc>, side_pc_map: &[Pc], len: usize) -> (Pc, Pc) {
    let Some(pc) = pc else {
        return (0, len);
    };
    let max = side_pc_map.get(pc).copied().unwrap_or(len);
    let min = match pc.checked_sub(1) {
        Some(prev) => side_pc_map.get(prev).map_or(0, |p| p + 1),
        None => 0,
    };
    (min, max)
}

/// Pick a pc satisfying both windows.
///
/// Uniform over the intersection. If the windows do not overlap the smaller
/// bound wins, so the label lands no later than either side allows.
pub fn place<R: Rng + ?Sized>(a: (Pc, Pc), b: (Pc, Pc), rng: &mut R) -> Pc {
    let min = a.0.max(b.0);
    let max = a.1.min(b.1);
    if min <= max {
        rng.gen_range(min..=max)
    } else {
        max
    }
}
