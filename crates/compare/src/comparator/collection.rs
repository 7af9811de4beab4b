//! Collection comparison
//!
//! Two elements share this module because they claim the same pairs (two
//! lists) and the chain holds exactly one of them:
//! - [`OrderedCollectionComparator`]: position by position, the strict
//!   default
//! - [`LenientOrderComparator`]: multiset semantics for the lenient-order
//!   mode
//!
//! Ordered comparison walks to the longer length and reports positions the
//! shorter side lacks as missing. Multiset comparison consumes the actual
//! list: each expected element removes the first remaining actual element
//! it fully matches, unmatched expected elements report as missing on the
//! actual side, and leftover actual elements as missing on the expected
//! side. Duplicates therefore need matching multiplicity, not just
//! membership.

use attest_core::{AttestResult, Value};

use crate::compare::ReflectionComparator;
use crate::difference::{CompositeDifference, Difference};

use super::ElementComparator;

pub(crate) struct OrderedCollectionComparator;

impl ElementComparator for OrderedCollectionComparator {
    fn can_compare(&self, left: &Value, right: &Value) -> bool {
        matches!((left, right), (Value::List(_), Value::List(_)))
    }

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        only_first: bool,
        comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        match (left, right) {
            (Value::List(left_items), Value::List(right_items)) => {
                let mut composite = CompositeDifference::new(left.clone(), right.clone());
                let len = left_items.len().max(right_items.len());
                for i in 0..len {
                    let child = match (left_items.get(i), right_items.get(i)) {
                        (Some(l), Some(r)) => comparator.get_difference(l, r, only_first)?,
                        (Some(l), None) => Some(Difference::missing_right(l.clone())),
                        (None, Some(r)) => Some(Difference::missing_left(r.clone())),
                        (None, None) => None,
                    };
                    if let Some(child) = child {
                        composite.add(i, child);
                        if only_first {
                            break;
                        }
                    }
                }
                Ok(composite.into_option())
            }
            _ => Ok(None),
        }
    }
}

pub(crate) struct LenientOrderComparator;

impl ElementComparator for LenientOrderComparator {
    fn can_compare(&self, left: &Value, right: &Value) -> bool {
        matches!((left, right), (Value::List(_), Value::List(_)))
    }

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        only_first: bool,
        comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        match (left, right) {
            (Value::List(left_items), Value::List(right_items)) => {
                let mut composite = CompositeDifference::new(left.clone(), right.clone());
                let mut remaining: Vec<(usize, &Value)> =
                    right_items.iter().enumerate().collect();
                for (i, left_value) in left_items.iter().enumerate() {
                    let mut matched = None;
                    for (slot, (_, right_value)) in remaining.iter().enumerate() {
                        if comparator.get_difference(left_value, right_value, true)?.is_none() {
                            matched = Some(slot);
                            break;
                        }
                    }
                    match matched {
                        Some(slot) => {
                            remaining.remove(slot);
                        }
                        None => {
                            composite.add(i, Difference::missing_right(left_value.clone()));
                            if only_first {
                                return Ok(composite.into_option());
                            }
                        }
                    }
                }
                for (j, right_value) in remaining {
                    composite.add(j, Difference::missing_left(right_value.clone()));
                    if only_first {
                        break;
                    }
                }
                Ok(composite.into_option())
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difference::{DiffKey, DiffValue};
    use crate::modes::Modes;

    fn ints(values: &[i64]) -> Value {
        Value::List(values.iter().copied().map(Value::Int).collect())
    }

    // ==== Ordered ====

    #[test]
    fn ordered_equal_lists_have_no_difference() {
        let c = OrderedCollectionComparator;
        let comparator = ReflectionComparator::strict();
        let result = c
            .compare(&ints(&[1, 2, 3]), &ints(&[1, 2, 3]), false, &comparator)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn ordered_reports_each_differing_position() {
        let c = OrderedCollectionComparator;
        let comparator = ReflectionComparator::strict();
        let difference = c
            .compare(&ints(&[1, 2]), &ints(&[2, 1]), false, &comparator)
            .unwrap()
            .unwrap();
        assert_eq!(difference.leaf_count(), 2);
        assert!(difference.inner(0usize).is_some());
        assert!(difference.inner(1usize).is_some());
    }

    #[test]
    fn ordered_length_mismatch_reports_missing_positions() {
        let c = OrderedCollectionComparator;
        let comparator = ReflectionComparator::strict();
        let difference = c
            .compare(&ints(&[1, 2, 3]), &ints(&[1]), false, &comparator)
            .unwrap()
            .unwrap();
        let leaf = difference.inner(2usize).unwrap().as_leaf().unwrap();
        assert_eq!(leaf.left, DiffValue::Value(Value::Int(3)));
        assert!(leaf.right.is_missing());
    }

    #[test]
    fn ordered_stops_at_first_difference_when_asked() {
        let c = OrderedCollectionComparator;
        let comparator = ReflectionComparator::strict();
        let difference = c
            .compare(&ints(&[9, 8]), &ints(&[1, 2]), true, &comparator)
            .unwrap()
            .unwrap();
        assert_eq!(difference.leaf_count(), 1);
    }

    // ==== Lenient order ====

    #[test]
    fn multiset_accepts_any_permutation() {
        let c = LenientOrderComparator;
        let comparator = ReflectionComparator::new(Modes::lenient());
        let result = c
            .compare(&ints(&[1, 2, 3]), &ints(&[3, 1, 2]), false, &comparator)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn multiset_counts_multiplicity() {
        let c = LenientOrderComparator;
        let comparator = ReflectionComparator::new(Modes::lenient());
        let difference = c
            .compare(&ints(&[1, 1, 2]), &ints(&[1, 2, 2]), false, &comparator)
            .unwrap()
            .unwrap();
        let leaves = difference.leaves();
        assert_eq!(leaves.len(), 2);
        // second expected 1 found no element left to consume
        assert_eq!(leaves[0].0, vec![DiffKey::Index(1)]);
        assert!(leaves[0].1.right.is_missing());
        // one actual 2 stayed unconsumed
        assert_eq!(leaves[1].0, vec![DiffKey::Index(2)]);
        assert!(leaves[1].1.left.is_missing());
    }

    #[test]
    fn multiset_reports_leftover_actual_elements() {
        let c = LenientOrderComparator;
        let comparator = ReflectionComparator::new(Modes::lenient());
        let difference = c
            .compare(&ints(&[1]), &ints(&[2, 1]), false, &comparator)
            .unwrap()
            .unwrap();
        let leaves = difference.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].0, vec![DiffKey::Index(0)]);
        assert_eq!(leaves[0].1.right, DiffValue::Value(Value::Int(2)));
        assert!(leaves[0].1.left.is_missing());
    }
}
