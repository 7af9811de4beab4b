//! Matcher window bookkeeping.
//!
//! A behavior definition or assertion opens a window, registers its
//! explicit matchers (each registration hands back a token), then
//! closes the window with the full argument slot list. Plain value
//! slots are wrapped in a default matcher at close time; token slots
//! must consume the registered matchers exactly once and in
//! registration order. Anything else is a usage error, reported
//! rather than silently accepted.
//!
//! One repository serves a whole mock context, so two definitions
//! cannot interleave: the second `start` fails while the first
//! window is still open.

use attest_core::{AttestError, AttestResult, Value};

use crate::matcher::{default_matcher, ArgumentMatcher};
use crate::proxy::CallSite;

/// Handle to a matcher registered in the currently open window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherToken(usize);

/// One argument slot of a definition: either a plain value or a
/// token referring to an explicitly registered matcher.
pub enum ArgSlot {
    /// A literal value, wrapped in the default matcher at close time.
    Plain(Value),
    /// A matcher registered in the open window.
    Matcher(MatcherToken),
}

struct Window {
    opened_at: CallSite,
    pending: Vec<Option<Box<dyn ArgumentMatcher>>>,
}

/// Collects the matchers of one definition at a time.
pub struct ArgumentMatcherRepository {
    window: Option<Window>,
    lenient_defaults: bool,
}

impl ArgumentMatcherRepository {
    /// Creates a repository. `lenient_defaults` controls how plain
    /// structured values are matched, see the mock configuration.
    pub fn new(lenient_defaults: bool) -> Self {
        ArgumentMatcherRepository {
            window: None,
            lenient_defaults,
        }
    }

    /// True while a definition window is open.
    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    /// Opens a window for one definition. The opening call site is
    /// kept so a later misuse can name the definition that was left
    /// unfinished.
    pub fn start(&mut self, opened_at: CallSite) -> AttestResult<()> {
        if let Some(window) = &self.window {
            return Err(AttestError::usage(format!(
                "a matcher window is already open (opened at {}); a previous behavior \
                 definition or assertion was probably not completed",
                window.opened_at
            )));
        }
        self.window = Some(Window {
            opened_at,
            pending: Vec::new(),
        });
        Ok(())
    }

    /// Registers a matcher in the open window and returns its token.
    pub fn register(&mut self, matcher: Box<dyn ArgumentMatcher>) -> AttestResult<MatcherToken> {
        let window = self.window.as_mut().ok_or_else(|| {
            AttestError::usage(
                "argument matcher used outside a behavior definition or assertion",
            )
        })?;
        window.pending.push(Some(matcher));
        Ok(MatcherToken(window.pending.len() - 1))
    }

    /// Closes the window, resolving the slot list into one matcher
    /// per argument.
    ///
    /// Tokens must appear in registration order and every registered
    /// matcher must be consumed. The window is closed even when
    /// validation fails, so a broken definition does not wedge the
    /// next one.
    pub fn finish(
        &mut self,
        slots: Vec<ArgSlot>,
    ) -> AttestResult<Vec<Box<dyn ArgumentMatcher>>> {
        let mut window = self.window.take().ok_or_else(|| {
            AttestError::usage("no matcher window is open for this definition")
        })?;

        let registered = window.pending.len();
        let mut next = 0usize;
        let mut matchers = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                ArgSlot::Plain(value) => {
                    matchers.push(default_matcher(value, self.lenient_defaults));
                }
                ArgSlot::Matcher(token) => {
                    if token.0 != next {
                        return Err(AttestError::usage(
                            "argument matchers must be used in the order they were \
                             created, each exactly once",
                        ));
                    }
                    let matcher = window
                        .pending
                        .get_mut(token.0)
                        .and_then(Option::take)
                        .ok_or_else(|| {
                            AttestError::usage(
                                "argument matcher token does not belong to this definition",
                            )
                        })?;
                    matchers.push(matcher);
                    next += 1;
                }
            }
        }
        if next != registered {
            return Err(AttestError::usage(format!(
                "{} argument matcher(s) were created but never bound to an argument",
                registered - next
            )));
        }
        Ok(matchers)
    }

    /// Discards any open window.
    pub fn reset(&mut self) {
        self.window = None;
    }
}
