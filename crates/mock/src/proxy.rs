//! Invocation records and call sites.
//!
//! Every call on a mocked method is reified as a [`ProxyInvocation`]:
//! the mock and method name, the argument list, and the source
//! location of the caller. Arguments carry two views of the value,
//! the live handle and a deep clone frozen at invocation time, so
//! later mutation of a shared entity cannot rewrite history.

use std::fmt;
use std::panic::Location;

use attest_core::Value;

/// Source location of a call, captured through `#[track_caller]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Captures the location of the nearest caller outside any
    /// `#[track_caller]` chain.
    #[track_caller]
    pub fn capture() -> Self {
        let location = Location::caller();
        CallSite {
            file: location.file(),
            line: location.line(),
        }
    }

    /// Source file of the call.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line number of the call.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single argument as seen by a mocked method.
///
/// `value` is the handle the caller passed in. Entity handles stay
/// live, so a matcher that cares about identity can still see it.
/// `at_invocation` is a deep clone taken the moment the call was
/// made, for matchers that must compare against the state the value
/// had back then.
#[derive(Debug, Clone)]
pub struct Argument {
    value: Value,
    at_invocation: Value,
}

impl Argument {
    /// Wraps a call argument, snapshotting its invocation-time state.
    pub fn new(value: Value) -> Self {
        let at_invocation = value.deep_clone();
        Argument {
            value,
            at_invocation,
        }
    }

    /// The argument as passed, sharing entity nodes with the caller.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Deep clone of the argument taken when the call happened.
    pub fn value_at_invocation(&self) -> &Value {
        &self.at_invocation
    }
}

/// One call on a mocked method.
#[derive(Debug, Clone)]
pub struct ProxyInvocation {
    mock_name: String,
    method: String,
    arguments: Vec<Argument>,
    call_site: CallSite,
}

impl ProxyInvocation {
    /// Builds an invocation record.
    pub fn new(
        mock_name: impl Into<String>,
        method: impl Into<String>,
        arguments: Vec<Argument>,
        call_site: CallSite,
    ) -> Self {
        ProxyInvocation {
            mock_name: mock_name.into(),
            method: method.into(),
            arguments,
            call_site,
        }
    }

    /// Name of the mock the call was made on.
    pub fn mock_name(&self) -> &str {
        &self.mock_name
    }

    /// Name of the invoked method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The arguments of the call.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Where the call was made.
    pub fn call_site(&self) -> CallSite {
        self.call_site
    }

    /// Renders the call as `mock.method(arg, ...)` using the
    /// invocation-time argument values.
    pub fn description(&self) -> String {
        let args: Vec<String> = self
            .arguments
            .iter()
            .map(|a| a.value_at_invocation().to_string())
            .collect();
        format!("{}.{}({})", self.mock_name, self.method, args.join(", "))
    }
}
