//! Reflection assertions
//!
//! Result-based assertion entry points over the reflection comparator. A
//! failed assertion is an `Err` carrying the full difference report, so
//! callers can bubble it with `?` or unwrap it in tests.
//!
//! Every call builds a fresh comparator: comparator caches key by node
//! identity and must not outlive one comparison run.

use attest_core::{AttestError, AttestResult, Config, Value};

use crate::compare::ReflectionComparator;
use crate::modes::Modes;
use crate::report::DifferenceReport;

/// Assert deep equality under the given modes.
///
/// # Errors
///
/// Returns [`AttestError::AssertionFailed`] with a rendered difference
/// report when the values differ, or a comparison error if a pair cannot
/// be dispatched.
pub fn assert_reflect_equals(expected: &Value, actual: &Value, modes: Modes) -> AttestResult<()> {
    let comparator = ReflectionComparator::new(modes);
    match comparator.get_difference(expected, actual, false)? {
        None => Ok(()),
        Some(difference) => {
            tracing::debug!(
                target: "attest::compare",
                leaves = difference.leaf_count(),
                "Reflection assertion failed"
            );
            let report = DifferenceReport::new().render(expected, actual, &difference);
            Err(AttestError::assertion(report))
        }
    }
}

/// Assert deep equality with the mode defaults from `attest.toml` (strict
/// when no config is present).
pub fn assert_equals(expected: &Value, actual: &Value) -> AttestResult<()> {
    assert_reflect_equals(
        expected,
        actual,
        Modes::from_config(&Config::global().compare),
    )
}

/// Assert deep equality with ignore-defaults and lenient-order active.
pub fn assert_lenient_equals(expected: &Value, actual: &Value) -> AttestResult<()> {
    assert_reflect_equals(expected, actual, Modes::lenient())
}
