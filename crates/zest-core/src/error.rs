//! Error type shared by every part of the object model.
//!
//! Configuration problems (bad type strings, unsupported versions, malformed
//! patterns, zero loop steps) are reported at the setter or constructor that
//! received them. Execution problems are only produced while a runner drives
//! a script. Lookups that simply find nothing return `Option` instead.

use thiserror::Error;

/// Errors raised by the Zest object model and the reference runner.
#[derive(Error, Debug)]
pub enum ZestError {
    /// A script type string did not name one of the known types.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The script declares a Zest version this library does not implement.
    #[error("Version {0} not supported by this library")]
    UnsupportedVersion(String),

    /// A regular expression failed to compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// The compiler's diagnostic.
        #[source]
        source: regex::Error,
    },

    /// An integer loop was given a step of zero.
    #[error("Loop step must not be zero")]
    InvalidStep,

    /// A child position lies outside the container's list.
    #[error("Position {position} out of range for container of {len} statements")]
    PositionOutOfRange {
        /// The requested position.
        position: usize,
        /// The number of children in the container.
        len: usize,
    },

    /// No statement has the given global index.
    #[error("No statement at index {0}")]
    StatementNotFound(usize),

    /// An integer-only loop operation was applied to another statement.
    #[error("Statement {0} is not an integer loop")]
    NotAnIntegerLoop(usize),

    /// A fail action was executed.
    #[error("Action failed: {0}")]
    ActionFailed(String),

    /// A request assertion evaluated to false.
    #[error("Assertion failed for {url}: {expression}")]
    AssertionFailed {
        /// The request the assertion belongs to.
        url: String,
        /// A short description of the failing expression.
        expression: String,
    },

    /// An assignment could not compute a value.
    #[error("Failed to assign '{variable}': {message}")]
    AssignFailed {
        /// The variable being assigned.
        variable: String,
        /// Why the value could not be computed.
        message: String,
    },

    /// The host application reported a failure.
    #[error("Host error: {0}")]
    Host(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ZestError {
    /// Returns true for errors caused by invalid configuration of the model,
    /// as opposed to failures while running a script.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ZestError::UnsupportedType(_)
                | ZestError::UnsupportedVersion(_)
                | ZestError::InvalidPattern { .. }
                | ZestError::InvalidStep
        )
    }
}
