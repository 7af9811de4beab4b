//! Mock context and mock handles.
//!
//! A [`MockContext`] owns everything one test needs: the scenario
//! recording every call, the matcher repository correlating explicit
//! matchers with argument slots, and the configuration. Mocks are
//! created from the context and share it; a fresh context per test
//! keeps histories isolated.
//!
//! ## Defining behavior
//!
//! Definitions start from the result side and name the method after
//! it, mirroring how the expectation reads:
//!
//! ```
//! use attest_mock::MockContext;
//!
//! # fn main() -> attest_core::AttestResult<()> {
//! let ctx = MockContext::new();
//! let service = ctx.mock("service");
//! service.returns(42).on("find").arg("jim").define()?;
//!
//! let outcome = service.invoke("find", vec!["jim".into()])?;
//! assert_eq!(outcome.into_value(), Some(42.into()));
//! # Ok(())
//! # }
//! ```
//!
//! `chain()` spans a definition over several hops of an object
//! graph. Intermediate hops return chained mocks, named
//! `parent.method` and cached per method, so every definition
//! through the same hop talks to the same chained mock.
//!
//! ## Verifying
//!
//! `assert_invoked`, `assert_not_invoked`, and `times` are pure
//! queries over the scenario. Consuming verification, including
//! in-sequence checks, goes through [`MockContext::verifier`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use attest_core::{AttestError, AttestResult, Config, MockConfig, Value};

use crate::behavior::{
    BehaviorDefiningInvocation, BehaviorOutcome, BehaviorStore, ChainedMockBehavior,
    ErrorRaisingBehavior, MockBehavior, PerformsBehavior, ValueReturningBehavior,
};
use crate::invocation::{InvocationOutcome, MatchingInvocation, ObservedInvocation};
use crate::matcher::{ArgumentMatcher, MatcherSpec};
use crate::proxy::{Argument, CallSite, ProxyInvocation};
use crate::repository::{ArgSlot, ArgumentMatcherRepository};
use crate::scenario::{Scenario, Verifier};

struct ContextCore {
    scenario: Scenario,
    repository: ArgumentMatcherRepository,
    config: MockConfig,
    mocks: Vec<Weak<RefCell<MockCore>>>,
}

/// Shared state of one test's mocks.
#[derive(Clone)]
pub struct MockContext {
    inner: Rc<RefCell<ContextCore>>,
}

impl MockContext {
    /// Creates a context with the globally configured mock settings.
    pub fn new() -> Self {
        MockContext::with_config(Config::global().mock.clone())
    }

    /// Creates a context with explicit mock settings.
    pub fn with_config(config: MockConfig) -> Self {
        let core = ContextCore {
            scenario: Scenario::new(),
            repository: ArgumentMatcherRepository::new(config.lenient_defaults),
            config,
            mocks: Vec::new(),
        };
        MockContext {
            inner: Rc::new(RefCell::new(core)),
        }
    }

    /// Creates a named mock bound to this context.
    pub fn mock(&self, name: impl Into<String>) -> Mock {
        let core = Rc::new(RefCell::new(MockCore::default()));
        self.inner.borrow_mut().mocks.push(Rc::downgrade(&core));
        Mock {
            name: name.into(),
            ctx: self.clone(),
            core,
        }
    }

    /// Snapshots the scenario for consuming verification.
    pub fn verifier(&self) -> Verifier {
        Verifier::new(&self.inner.borrow().scenario)
    }

    /// Numbered transcript of everything observed so far.
    pub fn scenario_report(&self) -> String {
        self.inner.borrow().scenario.report()
    }

    /// The mock settings this context runs with.
    pub fn config(&self) -> MockConfig {
        self.inner.borrow().config.clone()
    }

    /// Clears the scenario, any open matcher window, and the
    /// behaviors of every mock created from this context.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.scenario.reset();
        inner.repository.reset();
        inner.mocks.retain(|weak| weak.upgrade().is_some());
        for core in inner.mocks.iter().filter_map(Weak::upgrade) {
            core.borrow_mut().reset();
        }
        tracing::debug!(
            target: "attest::mock",
            scenario = %inner.scenario.id(),
            "Context reset"
        );
    }

    fn start_window(&self, opened_at: CallSite) -> AttestResult<()> {
        self.inner.borrow_mut().repository.start(opened_at)
    }

    fn register_matcher(&self, spec: MatcherSpec) -> AttestResult<ArgSlot> {
        let token = self
            .inner
            .borrow_mut()
            .repository
            .register(spec.into_inner())?;
        Ok(ArgSlot::Matcher(token))
    }

    fn finish_window(&self, slots: Vec<ArgSlot>) -> AttestResult<Vec<Box<dyn ArgumentMatcher>>> {
        self.inner.borrow_mut().repository.finish(slots)
    }

    fn reset_window(&self) {
        self.inner.borrow_mut().repository.reset();
    }
}

impl Default for MockContext {
    fn default() -> Self {
        MockContext::new()
    }
}

#[derive(Default)]
struct MockCore {
    behaviors: BehaviorStore,
    chained: FxHashMap<String, Mock>,
}

impl MockCore {
    fn reset(&mut self) {
        self.behaviors.reset();
    }
}

/// Handle to one named mock. Cloning shares the underlying mock.
#[derive(Clone)]
pub struct Mock {
    name: String,
    ctx: MockContext,
    core: Rc<RefCell<MockCore>>,
}

impl Mock {
    /// Name of this mock. Chained mocks are named `parent.method`.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ==== Behavior definition entry points ====

    /// Defines a behavior returning `value` on every matching call.
    #[track_caller]
    pub fn returns(&self, value: impl Into<Value>) -> BehaviorBuilder {
        BehaviorBuilder::new(self.clone(), Payload::Returns(value.into()), false)
    }

    /// Defines a behavior returning `value` on the first matching
    /// call only.
    #[track_caller]
    pub fn once_returns(&self, value: impl Into<Value>) -> BehaviorBuilder {
        BehaviorBuilder::new(self.clone(), Payload::Returns(value.into()), true)
    }

    /// Defines a behavior raising an error on every matching call.
    #[track_caller]
    pub fn raises(&self, message: impl Into<String>) -> BehaviorBuilder {
        BehaviorBuilder::new(self.clone(), Payload::Raises(message.into()), false)
    }

    /// Defines a behavior raising an error on the first matching
    /// call only.
    #[track_caller]
    pub fn once_raises(&self, message: impl Into<String>) -> BehaviorBuilder {
        BehaviorBuilder::new(self.clone(), Payload::Raises(message.into()), true)
    }

    /// Defines a behavior running a custom action on every matching
    /// call.
    #[track_caller]
    pub fn performs(
        &self,
        action: impl Fn(&ProxyInvocation) -> AttestResult<Value> + 'static,
    ) -> BehaviorBuilder {
        BehaviorBuilder::new(self.clone(), Payload::Performs(Box::new(action)), false)
    }

    /// Defines a behavior running a custom action on the first
    /// matching call only.
    #[track_caller]
    pub fn once_performs(
        &self,
        action: impl Fn(&ProxyInvocation) -> AttestResult<Value> + 'static,
    ) -> BehaviorBuilder {
        BehaviorBuilder::new(self.clone(), Payload::Performs(Box::new(action)), true)
    }

    // ==== Invocation ====

    /// Invokes a mocked method.
    ///
    /// The call is recorded in the scenario before its behavior
    /// runs, so even a raising behavior leaves a trace. Without a
    /// matching behavior the call returns the default null value.
    #[track_caller]
    pub fn invoke(
        &self,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> AttestResult<BehaviorOutcome> {
        let call_site = CallSite::capture();
        let arguments: Vec<Argument> = args.into_iter().map(Argument::new).collect();
        let invocation =
            ProxyInvocation::new(self.name.clone(), method.into(), arguments, call_site);

        let resolved = self.core.borrow_mut().behaviors.resolve(&invocation);
        let observed = ObservedInvocation::new(
            invocation.clone(),
            resolved.as_ref().map(|r| r.defined_at),
        );
        let index = self.ctx.inner.borrow_mut().scenario.record(observed);

        // No borrows are held here, so a performs behavior may call
        // back into this or any other mock of the context.
        let (result, outcome) = match resolved {
            Some(resolved) => {
                let result = resolved.behavior.execute(&invocation);
                let outcome = match &result {
                    Ok(BehaviorOutcome::Value(value)) => {
                        InvocationOutcome::Returned(value.clone())
                    }
                    Ok(BehaviorOutcome::Mock(mock)) => {
                        InvocationOutcome::ChainedMock(mock.name().to_string())
                    }
                    Err(AttestError::Raised { message, .. }) => {
                        InvocationOutcome::Raised(message.clone())
                    }
                    Err(error) => InvocationOutcome::Raised(error.to_string()),
                };
                (result, outcome)
            }
            None => (
                Ok(BehaviorOutcome::Value(Value::Null)),
                InvocationOutcome::DefaultReturned,
            ),
        };
        self.ctx
            .inner
            .borrow_mut()
            .scenario
            .set_outcome(index, outcome);
        tracing::trace!(
            target: "attest::mock",
            mock = %self.name,
            method = %invocation.method(),
            "Invocation handled"
        );
        result
    }

    // ==== Assertions ====

    /// Starts an assertion that the method was invoked.
    #[track_caller]
    pub fn assert_invoked(&self, method: impl Into<String>) -> AssertBuilder {
        AssertBuilder::new(self.clone(), method.into(), true)
    }

    /// Starts an assertion that the method was never invoked.
    #[track_caller]
    pub fn assert_not_invoked(&self, method: impl Into<String>) -> AssertBuilder {
        AssertBuilder::new(self.clone(), method.into(), false)
    }

    /// Starts building an invocation pattern for use with a
    /// [`Verifier`].
    #[track_caller]
    pub fn invocation_of(&self, method: impl Into<String>) -> InvocationQuery {
        InvocationQuery::new(self.clone(), method.into())
    }

    /// The chained mock behind a method, if a chained definition
    /// created one.
    pub fn chained(&self, method: &str) -> Option<Mock> {
        self.core.borrow().chained.get(method).cloned()
    }

    /// Drops all behavior definitions of this mock. The shared
    /// scenario is left alone, see [`MockContext::reset`].
    pub fn reset(&self) {
        self.core.borrow_mut().reset();
    }

    fn chained_mock_for(&self, method: &str) -> Mock {
        if let Some(existing) = self.core.borrow().chained.get(method) {
            return existing.clone();
        }
        let mock = self.ctx.mock(format!("{}.{}", self.name, method));
        self.core
            .borrow_mut()
            .chained
            .insert(method.to_string(), mock.clone());
        mock
    }

    fn install(
        &self,
        matching: MatchingInvocation,
        behavior: Rc<dyn MockBehavior>,
        one_time: bool,
        defined_at: CallSite,
    ) {
        self.core.borrow_mut().behaviors.add(BehaviorDefiningInvocation::new(
            matching, behavior, one_time, defined_at,
        ));
    }
}

enum Payload {
    Returns(Value),
    Raises(String),
    Performs(Box<dyn Fn(&ProxyInvocation) -> AttestResult<Value>>),
}

impl Payload {
    fn into_behavior(self) -> Rc<dyn MockBehavior> {
        match self {
            Payload::Returns(value) => Rc::new(ValueReturningBehavior::new(value)),
            Payload::Raises(message) => Rc::new(ErrorRaisingBehavior::new(message)),
            Payload::Performs(action) => Rc::new(PerformsBehavior::new(action)),
        }
    }
}

struct OpenHop {
    method: String,
    slots: Vec<ArgSlot>,
}

struct ClosedHop {
    method: String,
    matchers: Vec<Box<dyn ArgumentMatcher>>,
}

/// Builder for one behavior definition.
///
/// Errors made along the way poison the builder; the first one is
/// returned by [`BehaviorBuilder::define`] and nothing is installed.
pub struct BehaviorBuilder {
    mock: Mock,
    payload: Payload,
    one_time: bool,
    defined_at: CallSite,
    hops: Vec<ClosedHop>,
    current: Option<OpenHop>,
    error: Option<AttestError>,
}

impl BehaviorBuilder {
    #[track_caller]
    fn new(mock: Mock, payload: Payload, one_time: bool) -> Self {
        BehaviorBuilder {
            mock,
            payload,
            one_time,
            defined_at: CallSite::capture(),
            hops: Vec::new(),
            current: None,
            error: None,
        }
    }

    /// Names the method this definition applies to and opens its
    /// matcher window.
    pub fn on(mut self, method: impl Into<String>) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.current.is_some() {
            self.poison(AttestError::usage(
                "on() called while a method is already open; use chain() to span methods",
            ));
            return self;
        }
        if let Err(error) = self.mock.ctx.start_window(self.defined_at) {
            self.error = Some(error);
            return self;
        }
        self.current = Some(OpenHop {
            method: method.into(),
            slots: Vec::new(),
        });
        self
    }

    /// Adds a plain value argument slot, matched with the default
    /// matcher.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.current.as_mut() {
            Some(hop) => hop.slots.push(ArgSlot::Plain(value.into())),
            None => self.poison(AttestError::usage("arg() used before on()")),
        }
        self
    }

    /// Adds an explicit matcher argument slot.
    pub fn with(mut self, matcher: MatcherSpec) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.current.is_none() {
            self.poison(AttestError::usage("with() used before on()"));
            return self;
        }
        match self.mock.ctx.register_matcher(matcher) {
            Ok(slot) => {
                if let Some(hop) = self.current.as_mut() {
                    hop.slots.push(slot);
                }
            }
            Err(error) => self.poison(error),
        }
        self
    }

    /// Closes the current hop; the next `on` names a method on the
    /// chained mock returned by this one.
    pub fn chain(mut self) -> Self {
        if self.error.is_some() {
            return self;
        }
        let hop = match self.current.take() {
            Some(hop) => hop,
            None => {
                self.poison(AttestError::usage("chain() used before on()"));
                return self;
            }
        };
        match self.mock.ctx.finish_window(hop.slots) {
            Ok(matchers) => self.hops.push(ClosedHop {
                method: hop.method,
                matchers,
            }),
            Err(error) => self.error = Some(error),
        }
        self
    }

    /// Validates the definition and installs it.
    pub fn define(self) -> AttestResult<()> {
        let BehaviorBuilder {
            mock,
            payload,
            one_time,
            defined_at,
            mut hops,
            current,
            error,
        } = self;
        if let Some(error) = error {
            return Err(error);
        }
        let open = match current {
            Some(hop) => hop,
            None => {
                return Err(AttestError::usage(if hops.is_empty() {
                    "a behavior definition needs on(method)"
                } else {
                    "chain() must be followed by another on(method)"
                }))
            }
        };
        let matchers = mock.ctx.finish_window(open.slots)?;
        hops.push(ClosedHop {
            method: open.method,
            matchers,
        });

        let last = match hops.pop() {
            Some(hop) => hop,
            None => return Err(AttestError::usage("a behavior definition needs on(method)")),
        };
        let mut target = mock.clone();
        for hop in hops {
            let chained = target.chained_mock_for(&hop.method);
            target.install(
                MatchingInvocation::new(target.name.clone(), hop.method, hop.matchers),
                Rc::new(ChainedMockBehavior::new(chained.clone())),
                false,
                defined_at,
            );
            target = chained;
        }
        tracing::debug!(
            target: "attest::mock",
            mock = %target.name,
            method = %last.method,
            one_time,
            "Behavior defined"
        );
        target.install(
            MatchingInvocation::new(target.name.clone(), last.method, last.matchers),
            payload.into_behavior(),
            one_time,
            defined_at,
        );
        Ok(())
    }

    fn poison(&mut self, error: AttestError) {
        self.mock.ctx.reset_window();
        self.error = Some(error);
    }
}

/// Builder for an invocation assertion on one mock method.
pub struct AssertBuilder {
    mock: Mock,
    method: String,
    positive: bool,
    times: Option<usize>,
    slots: Vec<ArgSlot>,
    error: Option<AttestError>,
}

impl AssertBuilder {
    #[track_caller]
    fn new(mock: Mock, method: String, positive: bool) -> Self {
        let error = mock.ctx.start_window(CallSite::capture()).err();
        AssertBuilder {
            mock,
            method,
            positive,
            times: None,
            slots: Vec::new(),
            error,
        }
    }

    /// Adds a plain value argument slot.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        if self.error.is_none() {
            self.slots.push(ArgSlot::Plain(value.into()));
        }
        self
    }

    /// Adds an explicit matcher argument slot.
    pub fn with(mut self, matcher: MatcherSpec) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.mock.ctx.register_matcher(matcher) {
            Ok(slot) => self.slots.push(slot),
            Err(error) => self.poison(error),
        }
        self
    }

    /// Requires exactly `times` matching invocations. Only valid for
    /// a positive assertion.
    pub fn times(mut self, times: usize) -> Self {
        if self.error.is_some() {
            return self;
        }
        if !self.positive {
            self.poison(AttestError::usage(
                "times() cannot be combined with assert_not_invoked()",
            ));
            return self;
        }
        self.times = Some(times);
        self
    }

    /// Runs the assertion against the scenario.
    pub fn verify(self) -> AttestResult<()> {
        let AssertBuilder {
            mock,
            method,
            positive,
            times,
            slots,
            error,
        } = self;
        if let Some(error) = error {
            return Err(error);
        }
        let matchers = mock.ctx.finish_window(slots)?;
        let matching = MatchingInvocation::new(mock.name.clone(), method, matchers);
        let inner = mock.ctx.inner.borrow();
        match (positive, times) {
            (true, None) => inner.scenario.assert_invoked(&matching),
            (true, Some(times)) => inner.scenario.assert_invoked_times(&matching, times),
            (false, _) => inner.scenario.assert_not_invoked(&matching),
        }
    }

    fn poison(&mut self, error: AttestError) {
        self.mock.ctx.reset_window();
        self.error = Some(error);
    }
}

/// Builder for a standalone invocation pattern, used with a
/// [`Verifier`].
pub struct InvocationQuery {
    mock: Mock,
    method: String,
    slots: Vec<ArgSlot>,
    error: Option<AttestError>,
}

impl InvocationQuery {
    #[track_caller]
    fn new(mock: Mock, method: String) -> Self {
        let error = mock.ctx.start_window(CallSite::capture()).err();
        InvocationQuery {
            mock,
            method,
            slots: Vec::new(),
            error,
        }
    }

    /// Adds a plain value argument slot.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        if self.error.is_none() {
            self.slots.push(ArgSlot::Plain(value.into()));
        }
        self
    }

    /// Adds an explicit matcher argument slot.
    pub fn with(mut self, matcher: MatcherSpec) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.mock.ctx.register_matcher(matcher) {
            Ok(slot) => self.slots.push(slot),
            Err(error) => {
                self.mock.ctx.reset_window();
                self.error = Some(error);
            }
        }
        self
    }

    /// Resolves the pattern.
    pub fn build(self) -> AttestResult<MatchingInvocation> {
        let InvocationQuery {
            mock,
            method,
            slots,
            error,
        } = self;
        if let Some(error) = error {
            return Err(error);
        }
        let matchers = mock.ctx.finish_window(slots)?;
        Ok(MatchingInvocation::new(mock.name.clone(), method, matchers))
    }
}
