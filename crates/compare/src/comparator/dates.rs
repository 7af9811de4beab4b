//! Lenient date comparison
//!
//! With the lenient-dates mode, the actual instant carried by a time value
//! is irrelevant; only presence counts. Two time values are always equal,
//! while a time on one side and null on the other is a difference. This
//! element sits at the front of the chain, so with ignore-defaults also
//! active, a null expected time still reports against a present actual
//! time: presence is checked before the default is ignored.

use attest_core::{AttestResult, Value};

use crate::compare::ReflectionComparator;
use crate::difference::Difference;

use super::ElementComparator;

pub(crate) struct LenientDatesComparator;

impl ElementComparator for LenientDatesComparator {
    fn can_compare(&self, left: &Value, right: &Value) -> bool {
        matches!(
            (left, right),
            (Value::Time(_), Value::Time(_))
                | (Value::Time(_), Value::Null)
                | (Value::Null, Value::Time(_))
        )
    }

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        _only_first: bool,
        _comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        match (left, right) {
            (Value::Time(_), Value::Time(_)) => Ok(None),
            _ => Ok(Some(Difference::value(left.clone(), right.clone()))),
        }
    }
}
