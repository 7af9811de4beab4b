//! Error types for attest
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The taxonomy follows the three failure categories of the library:
//! - configuration errors (broken comparator chains, unreadable config files)
//! - user-usage errors (matcher window misuse, malformed builder sequences)
//! - assertion failures (carrying a rendered difference report or scenario
//!   transcript)
//!
//! A fourth variant, [`AttestError::Raised`], is produced when a mock was
//! explicitly configured to raise on a matching invocation.

use std::io;
use thiserror::Error;

/// Result type alias for attest operations
pub type AttestResult<T> = std::result::Result<T, AttestError>;

/// Error type for all attest operations
#[derive(Debug, Error)]
pub enum AttestError {
    /// Internal configuration error. Always fatal, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No comparator in the chain accepts the value pair. This indicates the
    /// chain is incomplete for a value category, not a failing test.
    #[error("Unable to compare values: no comparator accepts the pair ({left}, {right})")]
    UnsupportedComparison {
        /// Type name of the left value
        left: String,
        /// Type name of the right value
        right: String,
    },

    /// The library was used incorrectly (for example a matcher constructed
    /// outside of a behavior definition or assertion). Fails fast.
    #[error("Invalid usage: {0}")]
    Usage(String),

    /// A test assertion did not hold. The message carries the rendered
    /// difference report or scenario transcript.
    #[error("Assertion failed. {0}")]
    AssertionFailed(String),

    /// A mock behavior configured with `raises` was executed.
    #[error("{mock}.{method} raised: {message}")]
    Raised {
        /// Name of the mock that raised
        mock: String,
        /// Method that was invoked
        method: String,
        /// Message the behavior was configured with
        message: String,
    },

    /// I/O error (config file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AttestError {
    /// Create a configuration error from any displayable message.
    pub fn configuration(msg: impl Into<String>) -> Self {
        AttestError::Configuration(msg.into())
    }

    /// Create a usage error from any displayable message.
    pub fn usage(msg: impl Into<String>) -> Self {
        AttestError::Usage(msg.into())
    }

    /// Create an assertion failure carrying an already-rendered report.
    pub fn assertion(report: impl Into<String>) -> Self {
        AttestError::AssertionFailed(report.into())
    }

    /// True if this error is an assertion failure (as opposed to a
    /// configuration or usage error).
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, AttestError::AssertionFailed(_))
    }
}
