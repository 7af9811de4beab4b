//! Ignore-defaults comparison
//!
//! With the ignore-defaults mode, a default-valued expected side means
//! "don't care": the pair is equal no matter what the actual side holds.
//! Only the left side is inspected; a default on the right compares
//! normally. Time and entity values have no default, so they never claim
//! this relaxation.

use attest_core::{AttestResult, Value};

use crate::compare::ReflectionComparator;
use crate::difference::Difference;

use super::ElementComparator;

pub(crate) struct IgnoreDefaultsComparator;

impl ElementComparator for IgnoreDefaultsComparator {
    fn can_compare(&self, left: &Value, _right: &Value) -> bool {
        left.is_default()
    }

    fn compare(
        &self,
        _left: &Value,
        _right: &Value,
        _only_first: bool,
        _comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        Ok(None)
    }
}
