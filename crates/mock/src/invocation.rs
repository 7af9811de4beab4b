//! Matching and observed invocations.
//!
//! A [`MatchingInvocation`] is the pattern side: mock name, method
//! name, and one matcher per argument slot. It judges observed calls
//! for behavior resolution and for scenario assertions. An
//! [`ObservedInvocation`] is the history side: the call itself plus
//! what came of it.

use attest_core::Value;

use crate::matcher::{ArgumentMatcher, MatchResult};
use crate::proxy::{CallSite, ProxyInvocation};

/// Pattern matching a family of invocations on one mock method.
pub struct MatchingInvocation {
    mock_name: String,
    method: String,
    matchers: Vec<Box<dyn ArgumentMatcher>>,
}

impl MatchingInvocation {
    /// Builds a pattern from resolved argument matchers.
    pub fn new(
        mock_name: impl Into<String>,
        method: impl Into<String>,
        matchers: Vec<Box<dyn ArgumentMatcher>>,
    ) -> Self {
        MatchingInvocation {
            mock_name: mock_name.into(),
            method: method.into(),
            matchers,
        }
    }

    /// The mock this pattern belongs to.
    pub fn mock_name(&self) -> &str {
        &self.mock_name
    }

    /// The method this pattern matches.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// True when the invocation fits this pattern.
    pub fn matches(&self, invocation: &ProxyInvocation) -> bool {
        self.match_score(invocation).is_some()
    }

    /// Total match score of the invocation against this pattern, or
    /// `None` when any slot rejects. Identity matches score higher
    /// than equality matches.
    pub fn match_score(&self, invocation: &ProxyInvocation) -> Option<u32> {
        if invocation.mock_name() != self.mock_name || invocation.method() != self.method {
            return None;
        }
        if invocation.arguments().len() != self.matchers.len() {
            return None;
        }
        let mut total = 0u32;
        for (matcher, argument) in self.matchers.iter().zip(invocation.arguments()) {
            match matcher.matches(argument).score() {
                Some(score) => total += score,
                None => return None,
            }
        }
        Some(total)
    }

    /// Fires the `matched` hook of every slot against the selected
    /// invocation. Capturing matchers record their argument here.
    pub fn fire_matched(&self, invocation: &ProxyInvocation) {
        for (matcher, argument) in self.matchers.iter().zip(invocation.arguments()) {
            if matcher.matches(argument) != MatchResult::NoMatch {
                matcher.matched(argument);
            }
        }
    }

    /// Renders the pattern as `mock.method(matcher, ...)`.
    pub fn description(&self) -> String {
        let slots: Vec<String> = self.matchers.iter().map(|m| m.description()).collect();
        format!("{}.{}({})", self.mock_name, self.method, slots.join(", "))
    }
}

/// What came of an observed invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    /// A defined behavior returned this value.
    Returned(Value),
    /// No behavior applied; the default null value was returned.
    DefaultReturned,
    /// A raising behavior fired with this message.
    Raised(String),
    /// A chained mock with this name was returned.
    ChainedMock(String),
}

/// One call recorded in the scenario, with its outcome once known.
///
/// The call is recorded before its behavior runs, so a behavior that
/// itself fails still leaves a trace. The outcome is filled in
/// afterwards.
#[derive(Debug, Clone)]
pub struct ObservedInvocation {
    invocation: ProxyInvocation,
    behavior_defined_at: Option<CallSite>,
    outcome: Option<InvocationOutcome>,
}

impl ObservedInvocation {
    /// Records a call, optionally noting where the behavior that will
    /// handle it was defined.
    pub fn new(invocation: ProxyInvocation, behavior_defined_at: Option<CallSite>) -> Self {
        ObservedInvocation {
            invocation,
            behavior_defined_at,
            outcome: None,
        }
    }

    /// The recorded call.
    pub fn invocation(&self) -> &ProxyInvocation {
        &self.invocation
    }

    /// Where the selected behavior was defined, if any matched.
    pub fn behavior_defined_at(&self) -> Option<CallSite> {
        self.behavior_defined_at
    }

    /// The outcome, once the behavior has run.
    pub fn outcome(&self) -> Option<&InvocationOutcome> {
        self.outcome.as_ref()
    }

    pub(crate) fn set_outcome(&mut self, outcome: InvocationOutcome) {
        self.outcome = Some(outcome);
    }
}
