//! Mock objects for attest.
//!
//! This crate provides the mocking half of the library:
//!
//! - **Mocks and contexts**: a [`MockContext`] per test, mocks created
//!   from it, behavior defined through fluent builders
//! - **Argument matchers**: graded matching with identity awareness,
//!   explicit matcher slots, capture support
//! - **Scenario**: every call recorded with arguments frozen at
//!   invocation time, pure assertions plus a consuming [`Verifier`]
//! - **Chained mocks**: definitions spanning several hops of an
//!   object graph, intermediate mocks created and cached on demand
//!
//! Failure messages carry a numbered transcript of the observed
//! scenario, rendered with the configured formatter caps.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod behavior;
pub mod invocation;
pub mod matcher;
pub mod mock;
pub mod proxy;
pub mod repository;
pub mod report;
pub mod scenario;

pub use behavior::{
    BehaviorDefiningInvocation, BehaviorOutcome, BehaviorStore, MockBehavior, ResolvedBehavior,
};
pub use invocation::{InvocationOutcome, MatchingInvocation, ObservedInvocation};
pub use matcher::{
    any, capture, eq, is_null, len_eq, not_null, ref_eq, ref_eq_with, same, ArgumentMatcher,
    Capture, MatchResult, MatcherSpec,
};
pub use mock::{AssertBuilder, BehaviorBuilder, InvocationQuery, Mock, MockContext};
pub use proxy::{Argument, CallSite, ProxyInvocation};
pub use repository::{ArgSlot, ArgumentMatcherRepository, MatcherToken};
pub use scenario::{Scenario, Verifier};
