//! Entity comparison
//!
//! Entities compare field by field over the union of both field sets.
//! Type names are diagnostic metadata only: two entities with different
//! names but matching fields are equal.
//!
//! Fields the other side lacks report as missing, with the same
//! ignore-defaults tolerance maps get: a default-valued expected field is
//! "don't care" even when absent on the actual side, and actual-only
//! fields are not reported.
//!
//! Identical nodes never reach this element (the simple cases element
//! claims them), and revisited pairs are answered from the owning
//! comparator's cache, which is what terminates cyclic graphs.

use attest_core::{AttestResult, Value};

use crate::compare::ReflectionComparator;
use crate::difference::{CompositeDifference, Difference};

use super::ElementComparator;

pub(crate) struct EntityComparator;

impl ElementComparator for EntityComparator {
    fn can_compare(&self, left: &Value, right: &Value) -> bool {
        matches!((left, right), (Value::Entity(_), Value::Entity(_)))
    }

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        only_first: bool,
        comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        match (left, right) {
            (Value::Entity(left_entity), Value::Entity(right_entity)) => {
                let ignore_defaults = comparator.modes().ignore_defaults;
                let mut composite = CompositeDifference::new(left.clone(), right.clone());
                let left_node = left_entity.borrow();
                let right_node = right_entity.borrow();
                for (name, left_value) in left_node.fields() {
                    let child = match right_node.get(name) {
                        Some(right_value) => {
                            comparator.get_difference(left_value, right_value, only_first)?
                        }
                        None if ignore_defaults && left_value.is_default() => None,
                        None => Some(Difference::missing_right(left_value.clone())),
                    };
                    if let Some(child) = child {
                        composite.add(name.as_str(), child);
                        if only_first {
                            return Ok(composite.into_option());
                        }
                    }
                }
                if !ignore_defaults {
                    for (name, right_value) in right_node.fields() {
                        if !left_node.has_field(name) {
                            composite
                                .add(name.as_str(), Difference::missing_left(right_value.clone()));
                            if only_first {
                                break;
                            }
                        }
                    }
                }
                Ok(composite.into_option())
            }
            _ => Ok(None),
        }
    }
}
