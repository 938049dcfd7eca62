//! Reconstruct an editable listing from a diff.
//!
//! Anchor lines and the ancestor's comments are kept as written. Inserted
//! instructions are placed in their gap after those, and every label is
//! re-emitted directly before the instruction at its (possibly new) pc.

use std::collections::BTreeMap;

use lb_types::{Line, Listing, Pc};

use crate::diff::Diff;
use crate::error::ApplyError;
use crate::gaps::{gap_between, trailing, windows};

/// Apply `diff` to the ancestor listing `lines`.
pub fn apply(lines: &[Line], diff: &Diff) -> Result<Vec<Line>, ApplyError> {
    let listing = Listing::index(lines)?;
    if listing.program.len() != diff.ancestor_len() {
        return Err(ApplyError::AncestorMismatch {
            expected: diff.ancestor_len(),
            actual: listing.program.len(),
        });
    }
    check_pc_map(diff)?;

    let body = instruction_lines(lines, &listing, diff)?;
    let mut labels = labels_by_pc(&listing, diff);

    let mut out = Vec::with_capacity(body.len() + listing.program.labels.len());
    let mut pc: Pc = 0;
    for line in body {
        if matches!(line, Line::Instruction(_)) {
            out.extend(labels.remove(&pc).unwrap_or_default());
            pc += 1;
        }
        out.push(line);
    }
    // Labels at one past the end.
    for (_, trailing_labels) in labels {
        out.extend(trailing_labels);
    }

    Ok(out)
}

/// Anchors must be strictly increasing and inside the derived program.
fn check_pc_map(diff: &Diff) -> Result<(), ApplyError> {
    let len = diff.instructions.len();
    for (prev, pc) in windows(&diff.pc_map) {
        if pc >= len || prev.is_some_and(|p| p >= pc) {
            return Err(ApplyError::PcOutOfRange { pc, len });
        }
    }
    Ok(())
}

/// The listing without labels: ancestor lines interleaved with inserted instructions.
fn instruction_lines(lines: &[Line], listing: &Listing, diff: &Diff) -> Result<Vec<Line>, ApplyError> {
    let mut body = Vec::with_capacity(lines.len() + diff.insertion_count());
    let mut next_line = 0;
    let mut prev_pc = None;

    for (old_pc, &new_pc) in diff.pc_map.iter().enumerate() {
        let line = listing.pc_to_line[old_pc];
        body.extend(lines[next_line..line].iter().filter(|l| !l.is_label()).cloned());
        body.extend(inserted(diff, gap_between(prev_pc, new_pc))?);
        body.push(lines[line].clone());

        next_line = line + 1;
        prev_pc = Some(new_pc);
    }

    body.extend(lines[next_line..].iter().filter(|l| !l.is_label()).cloned());
    body.extend(inserted(diff, trailing(&diff.pc_map, diff.instructions.len()))?);
    Ok(body)
}

fn inserted(diff: &Diff, range: std::ops::Range<Pc>) -> Result<impl Iterator<Item = Line> + '_, ApplyError> {
    let slice = diff
        .instructions
        .get(range.clone())
        .ok_or(ApplyError::PcOutOfRange {
            pc: range.end,
            len: diff.instructions.len(),
        })?;
    Ok(slice.iter().cloned().map(Line::Instruction))
}

/// Changed labels at their new pc, untouched ancestor labels at their old one.
fn labels_by_pc(listing: &Listing, diff: &Diff) -> BTreeMap<Pc, Vec<Line>> {
    let mut by_pc: BTreeMap<Pc, Vec<Line>> = BTreeMap::new();
    let unchanged = listing
        .program
        .labels
        .iter()
        .filter(|(label, _)| !diff.labels.contains_key(*label));

    for (label, &pc) in diff.labels.iter().chain(unchanged) {
        by_pc.entry(pc).or_default().push(Line::Label(label.clone()));
    }
    by_pc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use lb_types::{parse_listing, render_listing, Instruction, Program};

    fn reconstruct(original: &str, modified: &str) -> String {
        let original_lines = parse_listing(original).unwrap();
        let modified_lines = parse_listing(modified).unwrap();
        let d = diff(
            &Program::from_lines(&original_lines).unwrap(),
            &Program::from_lines(&modified_lines).unwrap(),
        )
        .unwrap();
        render_listing(&apply(&original_lines, &d).unwrap())
    }

    #[test]
    fn keeps_comments_and_inserts_in_gap() {
        let out = reconstruct(
            "; setup\n    mov r0, 1\n\n    hlt\n",
            "mov r0, 1\nadd r0, 2\nhlt",
        );
        assert_eq!(out, "; setup\n    mov r0, 1\n\n    add r0, 2\n    hlt\n");
    }

    #[test]
    fn moved_label_follows_insertion() {
        let out = reconstruct(
            "    mov r0, 1\ntop:\n    nop\n    b top\n",
            "mov r0, 1\nmov r1, 1\ntop:\nnop\nb top",
        );
        assert_eq!(out, "    mov r0, 1\n    mov r1, 1\ntop:\n    nop\n    b top\n");
    }

    #[test]
    fn unchanged_label_stays_in_place() {
        let out = reconstruct("top:\n    nop\n    b top\n", "top:\nmov r1, 1\nnop\nb top");
        assert_eq!(out, "top:\n    mov r1, 1\n    nop\n    b top\n");
    }

    #[test]
    fn trailing_insertions_and_labels() {
        let out = reconstruct("    call f\nf:\n", "call f\nhlt\nf:\nret");
        assert_eq!(out, "    call f\n    hlt\nf:\n    ret\n");

        let out = reconstruct("    nop\nend:\n", "nop\nhlt\nend:");
        assert_eq!(out, "    nop\n    hlt\nend:\n");
    }

    #[test]
    fn from_empty_listing() {
        let out = reconstruct("; nothing yet\n", "nop");
        assert_eq!(out, "; nothing yet\n    nop\n");
    }

    #[test]
    fn mismatched_ancestor_is_rejected() {
        let lines = parse_listing("nop\nnop").unwrap();
        let d = Diff {
            pc_map: vec![0],
            ..Diff::default()
        };
        assert!(matches!(
            apply(&lines, &d),
            Err(ApplyError::AncestorMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn anchor_past_the_end_is_rejected() {
        let lines = parse_listing("nop").unwrap();
        let d = Diff {
            pc_map: vec![0],
            ..Diff::default()
        };
        assert!(matches!(
            apply(&lines, &d),
            Err(ApplyError::PcOutOfRange { pc: 0, len: 0 })
        ));
    }

    #[test]
    fn anchors_out_of_order_are_rejected() {
        let lines = parse_listing("nop\nhlt").unwrap();
        let nop: Instruction = "nop".parse().unwrap();
        let d = Diff {
            pc_map: vec![1, 0],
            labels: Default::default(),
            instructions: vec![nop.clone(), nop],
        };
        assert!(matches!(
            apply(&lines, &d),
            Err(ApplyError::PcOutOfRange { pc: 0, len: 2 })
        ));
    }
}
