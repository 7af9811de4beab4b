//! Attest - lenient deep-equality assertions, dataset comparison, and mock
//! objects for tests
//!
//! Attest compares whole object graphs instead of single values: assertions
//! report every difference with its path, collections can be compared as
//! multisets, default-valued expected fields can act as wildcards, and mocks
//! record every call so behavior can be verified after the fact.
//!
//! # Quick Start
//!
//! ```
//! use attest::{assert_lenient_equals, Entity};
//!
//! let expected = Entity::new("Person")
//!     .field("name", "Alice")
//!     .field("age", 0) // default value, matches any age
//!     .build();
//! let actual = Entity::new("Person")
//!     .field("name", "Alice")
//!     .field("age", 32)
//!     .build();
//!
//! assert_lenient_equals(&expected, &actual).unwrap();
//! ```
//!
//! Mocking runs through a context that records every invocation:
//!
//! ```
//! use attest::{not_null, MockContext};
//!
//! # fn main() -> attest::AttestResult<()> {
//! let ctx = MockContext::new();
//! let service = ctx.mock("service");
//! service.returns(42).on("find").with(not_null()).define()?;
//!
//! let outcome = service.invoke("find", vec!["jim".into()])?;
//! assert_eq!(outcome.into_value(), Some(42.into()));
//! service.assert_invoked("find").arg("jim").verify()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The workspace is split in three layers: `attest-core` holds the value
//! model, errors, formatting, and configuration; `attest-compare` holds the
//! reflection comparator, difference trees, reports, and dataset tables;
//! `attest-mock` holds mocks, matchers, and scenario verification. This crate
//! re-exports the public API of all three.

// Re-export the public API of the three layers
pub use attest_core::{
    AttestError, AttestResult, CompareConfig, Config, Entity, EntityRef, MockConfig, ReportConfig,
    Value, ValueFormatter, ValueKind, CONFIG_FILE_NAME,
};

pub use attest_compare::{
    assert_equals, assert_lenient_equals, assert_reflect_equals, assert_schema_contents,
    assert_table_contents, Column, ColumnDifference, CompositeDifference, DiffKey, DiffValue,
    Difference, DifferenceReport, Mode, Modes, ReflectionComparator, Row, RowDifference, Schema,
    SchemaDifference, Table, TableDifference, ValueDifference,
};

pub use attest_mock::{
    any, capture, eq, is_null, len_eq, not_null, ref_eq, ref_eq_with, same, Argument,
    ArgumentMatcher, BehaviorOutcome, CallSite, Capture, InvocationOutcome, MatchResult,
    MatcherSpec, MatchingInvocation, Mock, MockBehavior, MockContext, ObservedInvocation,
    ProxyInvocation, Scenario, Verifier,
};
