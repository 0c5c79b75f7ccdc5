//! Loops: a token set, a cursor over it, and a body of statements.
//!
//! A loop moves through three phases:
//!
//! - **Initial**: the cursor sits at index 0 and nothing has been bound yet;
//! - **Active**: the loop variable holds the token under the cursor;
//! - **Exhausted**: the cursor index has reached the size of the set.
//!
//! [`ZestLoop::run`] drives the whole thing against a [`ZestRuntime`]:
//! it resets the cursor, then for each token binds the loop variable, runs
//! the body and advances. `break` ends the loop early through
//! [`ZestLoop::end_loop`], `next` skips the rest of the current body.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ZestError;
use crate::runtime::{Flow, ZestRuntime};
use crate::statement::Statement;
use crate::token_set::{IntegerTokenSet, StringTokenSet, ZestLoopTokenSet};

/// Loop over an integer progression.
pub type ZestLoopInteger = ZestLoop<IntegerTokenSet>;

/// Loop over a list of strings.
pub type ZestLoopString = ZestLoop<StringTokenSet>;

/// Where a loop's cursor currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Initial,
    Active,
    Exhausted,
}

/// Cursor over a token set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopState {
    current_index: usize,
    #[serde(default)]
    current_token: Option<String>,
    #[serde(default)]
    started: bool,
}

impl LoopState {
    /// A cursor at the first token of `set`.
    pub fn first<S: ZestLoopTokenSet>(set: &S) -> Self {
        Self {
            current_index: 0,
            current_token: set.token(0),
            started: false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_token(&self) -> Option<&str> {
        self.current_token.as_deref()
    }

    /// Advance by one token. Returns false when already exhausted.
    pub fn increase<S: ZestLoopTokenSet>(&mut self, set: &S) -> bool {
        if self.current_index >= set.size() {
            return false;
        }
        self.current_index += 1;
        self.current_token = set.token(self.current_index);
        true
    }

    /// Jump straight past the last token.
    pub fn to_last_state<S: ZestLoopTokenSet>(&mut self, set: &S) {
        self.current_index = set.size();
        self.current_token = None;
    }
}

/// Result of [`ZestLoop::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopRun {
    /// How many times the body was entered.
    pub iterations: usize,
    /// [`Flow::Return`] if the body returned from the script, otherwise
    /// [`Flow::Continue`].
    pub flow: Flow,
}

impl LoopRun {
    /// True if at least one iteration executed.
    pub fn executed(&self) -> bool {
        self.iterations > 0
    }
}

/// A loop statement binding `variable_name` to each token of `set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZestLoop<S> {
    variable_name: String,
    set: S,
    #[serde(default)]
    state: LoopState,
    #[serde(default)]
    pub(crate) statements: Vec<Statement>,
}

impl<S: ZestLoopTokenSet> ZestLoop<S> {
    pub fn new(variable_name: impl Into<String>, set: S) -> Self {
        let state = LoopState::first(&set);
        Self {
            variable_name: variable_name.into(),
            set,
            state,
            statements: Vec::new(),
        }
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    pub fn set_variable_name(&mut self, variable_name: impl Into<String>) {
        self.variable_name = variable_name.into();
    }

    pub fn token_set(&self) -> &S {
        &self.set
    }

    /// Swap in a new token set. The cursor index is kept; if it now lies
    /// past the end the loop is exhausted.
    pub fn replace_token_set(&mut self, set: S) {
        self.set = set;
        self.state.current_token = self.set.token(self.state.current_index);
    }

    pub fn size(&self) -> usize {
        self.set.size()
    }

    pub fn current_state(&self) -> &LoopState {
        &self.state
    }

    pub fn set_current_state(&mut self, state: LoopState) {
        self.state = state;
    }

    pub fn phase(&self) -> LoopPhase {
        if self.is_last_state() {
            LoopPhase::Exhausted
        } else if self.state.started {
            LoopPhase::Active
        } else {
            LoopPhase::Initial
        }
    }

    /// True once the cursor index has reached the size of the set.
    pub fn is_last_state(&self) -> bool {
        self.state.current_index >= self.set.size()
    }

    /// Advance the cursor. Does nothing once exhausted.
    pub fn increase(&mut self) -> bool {
        let moved = self.state.increase(&self.set);
        if moved {
            self.state.started = true;
        }
        moved
    }

    /// Skip every remaining token.
    pub fn to_last_state(&mut self) {
        self.state.to_last_state(&self.set);
    }

    /// Put the cursor back on the first token.
    pub fn reset(&mut self) {
        self.state = LoopState::first(&self.set);
    }

    /// Abandon the loop: the cursor is exhausted and no token is current.
    pub fn end_loop(&mut self) {
        debug!(variable = %self.variable_name, index = self.state.current_index, "loop ended");
        self.to_last_state();
        self.state.started = true;
    }

    /// Run the loop from its first token.
    ///
    /// Each iteration binds the loop variable to the current token, runs the
    /// body through `runtime`, then advances. Errors from the body abort the
    /// loop and are returned unchanged.
    pub fn run<R: ZestRuntime + ?Sized>(&mut self, runtime: &mut R) -> Result<LoopRun, ZestError> {
        self.reset();
        let mut iterations = 0;
        while !self.is_last_state() {
            let Some(token) = self.set.token(self.state.current_index) else {
                break;
            };
            self.state.started = true;
            self.state.current_token = Some(token.clone());
            runtime.set_variable(&self.variable_name, &token);
            iterations += 1;
            debug!(variable = %self.variable_name, token = %token, iteration = iterations, "loop iteration");

            let mut flow = Flow::Continue;
            for stmt in self.statements.iter_mut() {
                match runtime.run_statement(stmt)? {
                    Flow::Continue => {}
                    other => {
                        flow = other;
                        break;
                    }
                }
            }

            match flow {
                Flow::Break => {
                    self.end_loop();
                    break;
                }
                Flow::Return(value) => {
                    self.end_loop();
                    return Ok(LoopRun {
                        iterations,
                        flow: Flow::Return(value),
                    });
                }
                Flow::Continue | Flow::Next => {
                    self.increase();
                }
            }
        }
        Ok(LoopRun {
            iterations,
            flow: Flow::Continue,
        })
    }

    /// A fully independent copy, including the cursor.
    pub fn deep_copy(&self) -> Self
    where
        S: Clone,
    {
        self.clone()
    }
}

impl ZestLoop<IntegerTokenSet> {
    /// Loop `variable_name` over `[start, end)` in steps of one.
    pub fn integer(variable_name: impl Into<String>, start: i64, end: i64) -> Self {
        Self::new(variable_name, IntegerTokenSet::new(start, end))
    }

    /// Loop `variable_name` over `[start, end)` stepped by `step`.
    pub fn integer_stepped(
        variable_name: impl Into<String>,
        start: i64,
        end: i64,
        step: i64,
    ) -> Result<Self, ZestError> {
        Ok(Self::new(variable_name, IntegerTokenSet::with_step(start, end, step)?))
    }

    pub fn start(&self) -> i64 {
        self.set.start()
    }

    pub fn end(&self) -> i64 {
        self.set.end()
    }

    pub fn step(&self) -> i64 {
        self.set.step()
    }

    pub fn set_start(&mut self, start: i64) {
        self.replace_bounds(start, self.end(), self.step());
    }

    pub fn set_end(&mut self, end: i64) {
        self.replace_bounds(self.start(), end, self.step());
    }

    /// Change the step. Zero is rejected and leaves the loop unchanged.
    pub fn set_step(&mut self, step: i64) -> Result<(), ZestError> {
        let set = IntegerTokenSet::with_step(self.start(), self.end(), step)?;
        self.replace_token_set(set);
        Ok(())
    }

    fn replace_bounds(&mut self, start: i64, end: i64, step: i64) {
        // step is non-zero: it came from an existing set
        if let Ok(set) = IntegerTokenSet::with_step(start, end, step) {
            self.replace_token_set(set);
        }
    }
}

impl ZestLoop<StringTokenSet> {
    /// Loop `variable_name` over `tokens`.
    pub fn strings<I, T>(variable_name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(variable_name, StringTokenSet::new(tokens))
    }

    pub fn add_token(&mut self, token: impl Into<String>) {
        let set = self.set.with_token(token);
        self.replace_token_set(set);
    }
}
