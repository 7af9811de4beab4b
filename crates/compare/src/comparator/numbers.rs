//! Mixed-kind number comparison
//!
//! An integer and a float that represent the same quantity are equal in
//! every mode: `1` matches `1.0`. This element claims only mixed
//! int/float pairs; same-kind numeric pairs fall through to the simple
//! cases element and compare exactly. The integer is widened to a float
//! for the comparison.

use attest_core::{AttestResult, Value};

use crate::compare::ReflectionComparator;
use crate::difference::Difference;

use super::ElementComparator;

pub(crate) struct MixedNumberComparator;

impl ElementComparator for MixedNumberComparator {
    fn can_compare(&self, left: &Value, right: &Value) -> bool {
        matches!(
            (left, right),
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_))
        )
    }

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        _only_first: bool,
        _comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        let equal = match (left, right) {
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                (*i as f64) == *f
            }
            _ => false,
        };
        if equal {
            Ok(None)
        } else {
            Ok(Some(Difference::value(left.clone(), right.clone())))
        }
    }
}
