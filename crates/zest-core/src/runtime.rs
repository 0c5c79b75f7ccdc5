//! The runtime contract consumed by expressions and loops.
//!
//! The object model never executes HTTP traffic itself. Whatever drives a
//! script (the bundled [`ScriptRunner`](crate::runner::ScriptRunner) or a
//! host's own engine) implements [`ZestRuntime`] so that expressions can read
//! the last response and variables, and loops can bind their token and run
//! their bodies.

use crate::error::ZestError;
use crate::http::ZestResponse;
use crate::statement::Statement;

/// What should happen after a statement has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Carry on with the next statement.
    Continue,
    /// Leave the innermost loop.
    Break,
    /// Skip to the next iteration of the innermost loop.
    Next,
    /// Stop the whole script, optionally with a value.
    Return(Option<String>),
}

impl Flow {
    pub fn is_continue(&self) -> bool {
        matches!(self, Flow::Continue)
    }
}

/// Execution context handed to expressions and loops.
pub trait ZestRuntime {
    /// The response to the most recent request, if any was made.
    fn last_response(&self) -> Option<&ZestResponse>;

    /// The current value of a variable.
    fn variable(&self, name: &str) -> Option<&str>;

    /// Bind a variable, overwriting any earlier value.
    fn set_variable(&mut self, name: &str, value: &str);

    /// Substitute variable references inside `text`.
    fn replace_variables(&self, text: &str) -> String;

    /// Execute one statement (and anything nested inside it).
    fn run_statement(&mut self, statement: &mut Statement) -> Result<Flow, ZestError>;
}
