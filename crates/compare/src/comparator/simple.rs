//! Simple-case comparison
//!
//! Catches every pair that needs no structural recursion:
//! - either side is null
//! - either side is a scalar (bool, int, float, string, bytes, time)
//! - the two sides have different kinds, including mismatched composites
//! - both sides are the same entity node
//!
//! The verdict is native equality: equal means no difference, unequal
//! means a single leaf holding both sides. Because this element also
//! claims all mixed-kind pairs, the structural elements behind it only
//! ever see same-kind composite pairs, and no pair can fall off the end
//! of the chain.

use attest_core::{Value, ValueKind};
use attest_core::AttestResult;

use crate::compare::ReflectionComparator;
use crate::difference::Difference;

use super::ElementComparator;

pub(crate) struct SimpleCasesComparator;

fn is_scalar(value: &Value) -> bool {
    matches!(
        value.kind(),
        ValueKind::Null
            | ValueKind::Bool
            | ValueKind::Int
            | ValueKind::Float
            | ValueKind::String
            | ValueKind::Bytes
            | ValueKind::Time
    )
}

impl ElementComparator for SimpleCasesComparator {
    fn can_compare(&self, left: &Value, right: &Value) -> bool {
        if is_scalar(left) || is_scalar(right) {
            return true;
        }
        if left.kind() != right.kind() {
            return true;
        }
        match (left, right) {
            (Value::Entity(l), Value::Entity(r)) => l.ptr_eq(r),
            _ => false,
        }
    }

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        _only_first: bool,
        _comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        if left == right {
            Ok(None)
        } else {
            Ok(Some(Difference::value(left.clone(), right.clone())))
        }
    }
}
