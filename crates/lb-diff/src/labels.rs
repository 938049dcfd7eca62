//! Label reconciliation between an ancestor and a derived program.

use lb_types::{LabelTable, Pc};

use crate::error::{DiffError, DiffResult};

/// Check every ancestor label against its new position and return the labels
/// that are new or moved.
///
/// A label that preceded ancestor instruction `pc` may end up anywhere after
/// the previous anchor and at or before its own anchor:
/// `pc_map[pc - 1] < new_pc <= pc_map[pc]`. A label at one past the end has
/// no upper bound. The first offending label in ancestor order is reported.
pub fn reconcile_labels(
    original: &LabelTable,
    modified: &LabelTable,
    pc_map: &[Pc],
) -> DiffResult<LabelTable> {
    for (label, &pc) in original {
        let Some(&new_pc) = modified.get(label) else {
            return Err(DiffError::Label {
                label: label.clone(),
            });
        };

        let after_previous = pc == 0 || pc_map.get(pc - 1).map_or(true, |&prev| new_pc > prev);
        let before_anchor = pc_map.get(pc).map_or(true, |&anchor| new_pc <= anchor);
        if !(after_previous && before_anchor) {
            return Err(DiffError::Label {
                label: label.clone(),
            });
        }
    }

    Ok(modified
        .iter()
        .filter(|(label, pc)| original.get(*label) != Some(*pc))
        .map(|(label, &pc)| (label.clone(), pc))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, Pc)]) -> LabelTable {
        entries.iter().map(|(l, pc)| (l.to_string(), *pc)).collect()
    }

    #[test]
    fn unchanged_labels_are_omitted() {
        let labels = table(&[("a", 0), ("b", 1)]);
        let changed = reconcile_labels(&labels, &labels, &[0, 1]).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn new_label_is_reported() {
        let changed = reconcile_labels(&table(&[]), &table(&[("a", 0)]), &[0]).unwrap();
        assert_eq!(changed, table(&[("a", 0)]));
    }

    #[test]
    fn label_may_move_into_preceding_gap() {
        // ancestor: a: x ; modified: nop a: x
        let changed = reconcile_labels(&table(&[("a", 0)]), &table(&[("a", 1)]), &[1]).unwrap();
        assert_eq!(changed, table(&[("a", 1)]));
    }

    #[test]
    fn label_may_stay_before_new_instructions() {
        // ancestor: a: x ; modified: a: nop x
        let changed = reconcile_labels(&table(&[("a", 0)]), &table(&[("a", 0)]), &[1]).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn label_past_its_anchor_fails() {
        // ancestor: x a: y ; modified: x y a: z
        let err = reconcile_labels(&table(&[("a", 1)]), &table(&[("a", 2)]), &[0, 1]).unwrap_err();
        assert_eq!(err, DiffError::Label { label: "a".into() });
    }

    #[test]
    fn label_before_previous_anchor_fails() {
        // ancestor: x a: y ; modified: a: x y
        let err = reconcile_labels(&table(&[("a", 1)]), &table(&[("a", 0)]), &[0, 1]).unwrap_err();
        assert_eq!(err, DiffError::Label { label: "a".into() });
    }

    #[test]
    fn removed_label_fails() {
        let err = reconcile_labels(&table(&[("a", 0)]), &table(&[]), &[0]).unwrap_err();
        assert_eq!(err, DiffError::Label { label: "a".into() });
    }

    #[test]
    fn trailing_label_has_no_upper_bound() {
        // ancestor: x a: ; modified: x nop a:
        let changed = reconcile_labels(&table(&[("a", 1)]), &table(&[("a", 2)]), &[0]).unwrap();
        assert_eq!(changed, table(&[("a", 2)]));
    }

    #[test]
    fn first_offender_in_ancestor_order() {
        let original = table(&[("b", 0), ("a", 0)]);
        let err = reconcile_labels(&original, &table(&[]), &[0]).unwrap_err();
        assert_eq!(err, DiffError::Label { label: "b".into() });
    }
}
