//! Mock behaviors and their resolution.
//!
//! A behavior says what a mocked method does when a matching call
//! arrives: return a value, raise an error, run a custom action, or
//! hand out a chained mock. Definitions are kept in two lists, one
//! time and always. Resolution tries unused one-time definitions
//! first, then always definitions, both in registration order, and
//! selects the first whose pattern matches.

use std::fmt;
use std::rc::Rc;

use attest_core::{AttestError, AttestResult, Value};

use crate::invocation::MatchingInvocation;
use crate::mock::Mock;
use crate::proxy::{CallSite, ProxyInvocation};

/// What a behavior produced for one invocation.
pub enum BehaviorOutcome {
    /// A plain return value.
    Value(Value),
    /// A chained mock standing in for an intermediate return value.
    Mock(Mock),
}

impl BehaviorOutcome {
    /// The returned value, if this outcome is one.
    pub fn value(&self) -> Option<&Value> {
        match self {
            BehaviorOutcome::Value(value) => Some(value),
            BehaviorOutcome::Mock(_) => None,
        }
    }

    /// The chained mock, if this outcome is one.
    pub fn mock(&self) -> Option<&Mock> {
        match self {
            BehaviorOutcome::Value(_) => None,
            BehaviorOutcome::Mock(mock) => Some(mock),
        }
    }

    /// Consumes the outcome into its return value.
    pub fn into_value(self) -> Option<Value> {
        match self {
            BehaviorOutcome::Value(value) => Some(value),
            BehaviorOutcome::Mock(_) => None,
        }
    }

    /// Consumes the outcome into its chained mock.
    pub fn into_mock(self) -> Option<Mock> {
        match self {
            BehaviorOutcome::Value(_) => None,
            BehaviorOutcome::Mock(mock) => Some(mock),
        }
    }
}

impl fmt::Debug for BehaviorOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorOutcome::Value(value) => f.debug_tuple("Value").field(value).finish(),
            BehaviorOutcome::Mock(mock) => f.debug_tuple("Mock").field(&mock.name()).finish(),
        }
    }
}

/// What a mocked method does for a matching call.
pub trait MockBehavior {
    /// Runs the behavior for the given invocation.
    fn execute(&self, invocation: &ProxyInvocation) -> AttestResult<BehaviorOutcome>;

    /// Human readable form used in reports, e.g. `returns 5`.
    fn description(&self) -> String;
}

/// Returns the same value for every matching call.
///
/// The value is shared, not cloned, so a returned entity handle is
/// the one the definition captured.
pub struct ValueReturningBehavior {
    value: Value,
}

impl ValueReturningBehavior {
    /// Behavior returning `value`.
    pub fn new(value: Value) -> Self {
        ValueReturningBehavior { value }
    }
}

impl MockBehavior for ValueReturningBehavior {
    fn execute(&self, _invocation: &ProxyInvocation) -> AttestResult<BehaviorOutcome> {
        Ok(BehaviorOutcome::Value(self.value.clone()))
    }

    fn description(&self) -> String {
        format!("returns {}", self.value)
    }
}

/// Raises an error for every matching call.
pub struct ErrorRaisingBehavior {
    message: String,
}

impl ErrorRaisingBehavior {
    /// Behavior raising an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        ErrorRaisingBehavior {
            message: message.into(),
        }
    }
}

impl MockBehavior for ErrorRaisingBehavior {
    fn execute(&self, invocation: &ProxyInvocation) -> AttestResult<BehaviorOutcome> {
        Err(AttestError::Raised {
            mock: invocation.mock_name().to_string(),
            method: invocation.method().to_string(),
            message: self.message.clone(),
        })
    }

    fn description(&self) -> String {
        format!("raises \"{}\"", self.message)
    }
}

/// Runs a custom action for every matching call.
pub struct PerformsBehavior {
    action: Box<dyn Fn(&ProxyInvocation) -> AttestResult<Value>>,
}

impl PerformsBehavior {
    /// Behavior delegating to `action`.
    pub fn new(action: impl Fn(&ProxyInvocation) -> AttestResult<Value> + 'static) -> Self {
        PerformsBehavior {
            action: Box::new(action),
        }
    }
}

impl MockBehavior for PerformsBehavior {
    fn execute(&self, invocation: &ProxyInvocation) -> AttestResult<BehaviorOutcome> {
        (self.action)(invocation).map(BehaviorOutcome::Value)
    }

    fn description(&self) -> String {
        "performs custom action".to_string()
    }
}

/// Returns a chained mock, letting a definition span several hops of
/// an object graph.
pub struct ChainedMockBehavior {
    mock: Mock,
}

impl ChainedMockBehavior {
    /// Behavior returning the given chained mock.
    pub fn new(mock: Mock) -> Self {
        ChainedMockBehavior { mock }
    }
}

impl MockBehavior for ChainedMockBehavior {
    fn execute(&self, _invocation: &ProxyInvocation) -> AttestResult<BehaviorOutcome> {
        Ok(BehaviorOutcome::Mock(self.mock.clone()))
    }

    fn description(&self) -> String {
        format!("returns chained mock {}", self.mock.name())
    }
}

/// A behavior bound to the invocation pattern it applies to.
pub struct BehaviorDefiningInvocation {
    matching: MatchingInvocation,
    behavior: Rc<dyn MockBehavior>,
    one_time: bool,
    used: bool,
    defined_at: CallSite,
}

impl BehaviorDefiningInvocation {
    /// Binds a behavior to its pattern.
    pub fn new(
        matching: MatchingInvocation,
        behavior: Rc<dyn MockBehavior>,
        one_time: bool,
        defined_at: CallSite,
    ) -> Self {
        BehaviorDefiningInvocation {
            matching,
            behavior,
            one_time,
            used: false,
            defined_at,
        }
    }

    /// The pattern this behavior applies to.
    pub fn matching(&self) -> &MatchingInvocation {
        &self.matching
    }

    /// True for a one-time definition, consumed by its first match.
    pub fn is_one_time(&self) -> bool {
        self.one_time
    }

    /// Where the definition was written.
    pub fn defined_at(&self) -> CallSite {
        self.defined_at
    }

    /// Renders the definition as `pattern -> behavior`.
    pub fn description(&self) -> String {
        format!(
            "{} -> {}",
            self.matching.description(),
            self.behavior.description()
        )
    }
}

/// A behavior selected for an invocation, ready to execute after all
/// bookkeeping borrows are released.
pub struct ResolvedBehavior {
    /// The selected behavior.
    pub behavior: Rc<dyn MockBehavior>,
    /// Where its definition was written.
    pub defined_at: CallSite,
}

/// Registered behavior definitions of one mock.
#[derive(Default)]
pub struct BehaviorStore {
    one_time: Vec<BehaviorDefiningInvocation>,
    always: Vec<BehaviorDefiningInvocation>,
}

impl BehaviorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        BehaviorStore::default()
    }

    /// Registers a definition, keeping registration order within its
    /// list.
    pub fn add(&mut self, definition: BehaviorDefiningInvocation) {
        if definition.is_one_time() {
            self.one_time.push(definition);
        } else {
            self.always.push(definition);
        }
    }

    /// Selects the behavior for an invocation.
    ///
    /// Unused one-time definitions win over always definitions; within
    /// each list the first registered match wins. A selected one-time
    /// definition is consumed. The capture hooks of the winning
    /// pattern fire here.
    pub fn resolve(&mut self, invocation: &ProxyInvocation) -> Option<ResolvedBehavior> {
        for definition in self.one_time.iter_mut() {
            if !definition.used && definition.matching.matches(invocation) {
                definition.used = true;
                definition.matching.fire_matched(invocation);
                return Some(ResolvedBehavior {
                    behavior: definition.behavior.clone(),
                    defined_at: definition.defined_at,
                });
            }
        }
        for definition in self.always.iter() {
            if definition.matching.matches(invocation) {
                definition.matching.fire_matched(invocation);
                return Some(ResolvedBehavior {
                    behavior: definition.behavior.clone(),
                    defined_at: definition.defined_at,
                });
            }
        }
        None
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.one_time.len() + self.always.len()
    }

    /// True when nothing has been defined.
    pub fn is_empty(&self) -> bool {
        self.one_time.is_empty() && self.always.is_empty()
    }

    /// Drops all definitions.
    pub fn reset(&mut self) {
        self.one_time.clear();
        self.always.clear();
    }
}
