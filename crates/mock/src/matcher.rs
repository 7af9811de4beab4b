//! Argument matchers.
//!
//! A matcher decides whether one argument of an observed call fits
//! one argument slot of a behavior definition or an assertion. The
//! verdict is graded: [`MatchResult::Same`] (identity) outranks
//! [`MatchResult::Match`] (equality), and both outrank no match at
//! all.
//!
//! ## Built-in matchers
//!
//! - [`eq`] compares with native equality and keeps the original
//!   handle, so an identical entity reference scores `Same`
//! - [`ref_eq`] and [`len_eq`] compare reflectively, strict and
//!   lenient respectively, against a deep clone taken when the
//!   matcher was created
//! - [`same`] accepts only the exact entity reference
//! - [`is_null`], [`not_null`], and [`any`] filter by shape
//! - [`capture`] accepts anything and records what it saw
//!
//! Plain values in a definition are wrapped in a default matcher:
//! nulls, booleans, and numbers compare with native equality, so a
//! literal `0` never acts as a wildcard; everything else compares
//! reflectively, leniently by default.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use attest_compare::{Modes, ReflectionComparator};
use attest_core::{EntityRef, Value, ValueKind};

use crate::proxy::Argument;

/// Graded verdict of a matcher against one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchResult {
    /// The argument does not fit.
    NoMatch,
    /// The argument fits by equality.
    Match,
    /// The argument is the very value the matcher was built from.
    Same,
}

impl MatchResult {
    /// Score used to rank competing verdicts. `None` means no match.
    pub fn score(&self) -> Option<u32> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Match => Some(1),
            MatchResult::Same => Some(2),
        }
    }
}

/// One argument slot of a behavior definition or assertion.
pub trait ArgumentMatcher {
    /// Grades the given argument.
    fn matches(&self, argument: &Argument) -> MatchResult;

    /// Hook fired when the owning definition is selected for an
    /// invocation. Capturing matchers record the argument here.
    fn matched(&self, _argument: &Argument) {}

    /// Human readable form used in reports, e.g. `not_null()`.
    fn description(&self) -> String;
}

impl fmt::Debug for dyn ArgumentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// An argument matcher ready to be bound to an argument slot.
///
/// Produced by the constructor functions in this module and consumed
/// by the `with` step of a definition builder.
pub struct MatcherSpec {
    inner: Box<dyn ArgumentMatcher>,
}

impl MatcherSpec {
    fn new(matcher: impl ArgumentMatcher + 'static) -> Self {
        MatcherSpec {
            inner: Box::new(matcher),
        }
    }

    pub(crate) fn into_inner(self) -> Box<dyn ArgumentMatcher> {
        self.inner
    }
}

// ==== Constructor functions ====

/// Matches arguments natively equal to `value`. An identical entity
/// reference grades `Same`.
pub fn eq(value: impl Into<Value>) -> MatcherSpec {
    MatcherSpec::new(EqualsMatcher {
        expected: value.into(),
    })
}

/// Matches arguments reflectively equal to `value` under strict
/// modes.
pub fn ref_eq(value: impl Into<Value>) -> MatcherSpec {
    ref_eq_with(value, Modes::strict())
}

/// Matches arguments reflectively equal to `value` under the given
/// comparison modes.
pub fn ref_eq_with(value: impl Into<Value>, modes: Modes) -> MatcherSpec {
    MatcherSpec::new(ReflectionMatcher::new("ref_eq", value.into(), modes))
}

/// Matches arguments leniently equal to `value`: collection order is
/// ignored and default-valued fields of `value` match anything.
///
/// The comparison runs against a deep clone of `value` taken now and
/// against the argument as it was at invocation time, so mutations on
/// either side after the fact do not change the verdict.
pub fn len_eq(value: impl Into<Value>) -> MatcherSpec {
    MatcherSpec::new(ReflectionMatcher::new("len_eq", value.into(), Modes::lenient()))
}

/// Matches only the exact entity reference.
pub fn same(entity: &EntityRef) -> MatcherSpec {
    MatcherSpec::new(SameMatcher {
        expected: entity.clone(),
    })
}

/// Matches any non-null argument.
pub fn not_null() -> MatcherSpec {
    MatcherSpec::new(NotNullMatcher)
}

/// Matches only null arguments.
pub fn is_null() -> MatcherSpec {
    MatcherSpec::new(NullMatcher)
}

/// Matches any argument of the given kind.
pub fn any(kind: ValueKind) -> MatcherSpec {
    MatcherSpec::new(AnyMatcher { kind })
}

/// Matches any argument and records its invocation-time value into
/// `capture`.
pub fn capture(capture: &Capture) -> MatcherSpec {
    MatcherSpec::new(CaptureMatcher {
        values: capture.values.clone(),
    })
}

/// Wraps a plain definition value in the default matcher. Nulls,
/// booleans, and numbers compare natively; strings, bytes, times,
/// and structured values compare reflectively against a deep clone
/// taken now. `lenient` selects lenient modes for the reflective
/// comparison.
pub(crate) fn default_matcher(value: Value, lenient: bool) -> Box<dyn ArgumentMatcher> {
    let snapshot = value.deep_clone();
    Box::new(DefaultMatcher {
        original: value,
        snapshot,
        lenient,
    })
}

// ==== Matcher implementations ====

struct EqualsMatcher {
    expected: Value,
}

impl ArgumentMatcher for EqualsMatcher {
    fn matches(&self, argument: &Argument) -> MatchResult {
        if let (Some(left), Some(right)) = (self.expected.as_entity(), argument.value().as_entity())
        {
            if left.ptr_eq(right) {
                return MatchResult::Same;
            }
        }
        if self.expected == *argument.value() {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }

    fn description(&self) -> String {
        format!("eq({})", self.expected)
    }
}

struct ReflectionMatcher {
    name: &'static str,
    original: Value,
    snapshot: Value,
    modes: Modes,
}

impl ReflectionMatcher {
    fn new(name: &'static str, value: Value, modes: Modes) -> Self {
        let snapshot = value.deep_clone();
        ReflectionMatcher {
            name,
            original: value,
            snapshot,
            modes,
        }
    }
}

impl ArgumentMatcher for ReflectionMatcher {
    fn matches(&self, argument: &Argument) -> MatchResult {
        if let (Some(left), Some(right)) = (self.original.as_entity(), argument.value().as_entity())
        {
            if left.ptr_eq(right) {
                return MatchResult::Same;
            }
        }
        let comparator = ReflectionComparator::new(self.modes);
        match comparator.is_equal(&self.snapshot, argument.value_at_invocation()) {
            Ok(true) => MatchResult::Match,
            Ok(false) => MatchResult::NoMatch,
            Err(error) => {
                tracing::warn!(
                    target: "attest::mock",
                    matcher = self.name,
                    error = %error,
                    "Matcher comparison failed, treating as no match"
                );
                MatchResult::NoMatch
            }
        }
    }

    fn description(&self) -> String {
        format!("{}({})", self.name, self.snapshot)
    }
}

struct SameMatcher {
    expected: EntityRef,
}

impl ArgumentMatcher for SameMatcher {
    fn matches(&self, argument: &Argument) -> MatchResult {
        match argument.value().as_entity() {
            Some(entity) if self.expected.ptr_eq(entity) => MatchResult::Same,
            _ => MatchResult::NoMatch,
        }
    }

    fn description(&self) -> String {
        format!("same({})", Value::Entity(self.expected.clone()))
    }
}

struct NotNullMatcher;

impl ArgumentMatcher for NotNullMatcher {
    fn matches(&self, argument: &Argument) -> MatchResult {
        if argument.value().is_null() {
            MatchResult::NoMatch
        } else {
            MatchResult::Match
        }
    }

    fn description(&self) -> String {
        "not_null()".to_string()
    }
}

struct NullMatcher;

impl ArgumentMatcher for NullMatcher {
    fn matches(&self, argument: &Argument) -> MatchResult {
        if argument.value().is_null() {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }

    fn description(&self) -> String {
        "is_null()".to_string()
    }
}

struct AnyMatcher {
    kind: ValueKind,
}

impl ArgumentMatcher for AnyMatcher {
    fn matches(&self, argument: &Argument) -> MatchResult {
        if argument.value().kind() == self.kind {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }

    fn description(&self) -> String {
        format!("any({})", self.kind)
    }
}

/// Shared handle to the values recorded by a [`capture`] matcher.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    values: Rc<RefCell<Vec<Value>>>,
}

impl Capture {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Capture::default()
    }

    /// The most recently captured value, if any call matched.
    pub fn value(&self) -> Option<Value> {
        self.values.borrow().last().cloned()
    }

    /// All captured values in invocation order.
    pub fn values(&self) -> Vec<Value> {
        self.values.borrow().clone()
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// True when nothing has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

struct CaptureMatcher {
    values: Rc<RefCell<Vec<Value>>>,
}

impl ArgumentMatcher for CaptureMatcher {
    fn matches(&self, _argument: &Argument) -> MatchResult {
        MatchResult::Match
    }

    fn matched(&self, argument: &Argument) {
        self.values
            .borrow_mut()
            .push(argument.value_at_invocation().clone());
    }

    fn description(&self) -> String {
        "capture()".to_string()
    }
}

struct DefaultMatcher {
    original: Value,
    snapshot: Value,
    lenient: bool,
}

impl DefaultMatcher {
    // Lenient modes would turn a plain 0, false, or null into a
    // wildcard via the defaults relaxation. These kinds always
    // compare natively instead.
    fn compares_natively(value: &Value) -> bool {
        matches!(
            value.kind(),
            ValueKind::Null | ValueKind::Bool | ValueKind::Int | ValueKind::Float
        )
    }
}

impl ArgumentMatcher for DefaultMatcher {
    fn matches(&self, argument: &Argument) -> MatchResult {
        if let (Some(left), Some(right)) = (self.original.as_entity(), argument.value().as_entity())
        {
            if left.ptr_eq(right) {
                return MatchResult::Same;
            }
        }
        if Self::compares_natively(&self.snapshot) {
            return if self.snapshot == *argument.value() {
                MatchResult::Match
            } else {
                MatchResult::NoMatch
            };
        }
        let modes = if self.lenient {
            Modes::lenient()
        } else {
            Modes::strict()
        };
        let comparator = ReflectionComparator::new(modes);
        match comparator.is_equal(&self.snapshot, argument.value_at_invocation()) {
            Ok(true) => MatchResult::Match,
            Ok(false) => MatchResult::NoMatch,
            Err(error) => {
                tracing::warn!(
                    target: "attest::mock",
                    error = %error,
                    "Default matcher comparison failed, treating as no match"
                );
                MatchResult::NoMatch
            }
        }
    }

    fn description(&self) -> String {
        self.original.to_string()
    }
}
