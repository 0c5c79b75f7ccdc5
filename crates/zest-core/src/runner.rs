//! Reference runner: executes a script against a [`ScriptHost`].
//!
//! The runner owns the variable store and the last request/response, and
//! implements [`ZestRuntime`] so expressions, assignments and loops can be
//! evaluated against it. Everything that leaves the process (HTTP traffic,
//! browser automation, printing, sleeping) is delegated to the host.
//!
//! Every executed statement is recorded as a [`RunLog`] entry, available
//! from [`ScriptRunner::log`] after the run.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::ZestConfig;
use crate::container::ZestContainer;
use crate::error::ZestError;
use crate::http::{ZestRequest, ZestResponse};
use crate::runtime::{Flow, ZestRuntime};
use crate::script::ZestScript;
use crate::statement::{Statement, StatementKind};
use crate::variables::ZestVariables;

/// The application a script runs inside.
pub trait ScriptHost {
    /// Issue an HTTP request. Variables have already been substituted.
    fn send(&mut self, request: &ZestRequest) -> Result<ZestResponse, ZestError>;

    /// Perform a browser statement. A returned value is bound to the
    /// statement's variable, if it has one.
    fn client_action(&mut self, statement: &Statement) -> Result<Option<String>, ZestError>;

    /// Show a message from a print action.
    fn print(&mut self, message: &str) {
        info!(text = message, "print");
    }

    fn sleep(&mut self, milliseconds: u64) {
        std::thread::sleep(Duration::from_millis(milliseconds));
    }
}

/// Outcome of one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepResult {
    Success,
    Failure(String),
}

/// A logged statement execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    /// Unique identifier for this log entry.
    pub id: Uuid,

    /// When the statement finished.
    pub timestamp: DateTime<Utc>,

    /// Kind of statement, see [`Statement::name`].
    pub statement: String,

    pub result: StepResult,

    /// Wall time spent, nested statements included.
    pub duration_ms: u64,
}

impl RunLog {
    fn new(statement: &str, result: StepResult, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            statement: statement.to_string(),
            result,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Drives a [`ZestScript`] statement by statement.
pub struct ScriptRunner<H> {
    host: H,
    config: ZestConfig,
    variables: ZestVariables,
    last_request: Option<ZestRequest>,
    last_response: Option<ZestResponse>,
    log: Vec<RunLog>,
}

impl<H: ScriptHost> ScriptRunner<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, ZestConfig::default())
    }

    pub fn with_config(host: H, config: ZestConfig) -> Self {
        let variables = ZestVariables::with_delimiters(config.token_start.clone(), config.token_end.clone());
        Self {
            host,
            config,
            variables,
            last_request: None,
            last_response: None,
            log: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn variables(&self) -> &ZestVariables {
        &self.variables
    }

    pub fn last_request(&self) -> Option<&ZestRequest> {
        self.last_request.as_ref()
    }

    pub fn log(&self) -> &[RunLog] {
        &self.log
    }

    /// Run `script` from the top.
    ///
    /// Variables start from the script's parameters with `overrides`
    /// applied on top. Returns the value of a `return` statement, if one
    /// was reached.
    pub fn run(&mut self, script: &mut ZestScript, overrides: &[(String, String)]) -> Result<Option<String>, ZestError> {
        let span = info_span!("script", title = %script.title);
        let _enter = span.enter();

        self.variables = ZestVariables::with_delimiters(self.config.token_start.clone(), self.config.token_end.clone());
        self.variables.extend_from(&script.parameters);
        for (name, value) in overrides {
            self.variables.set(name.clone(), value.clone());
        }
        self.last_request = None;
        self.last_response = None;
        self.log.clear();

        info!(statements = script.statement_count(), "script started");
        for stmt in script.children_mut().iter_mut() {
            match self.run_statement(stmt)? {
                Flow::Return(value) => {
                    info!(value = ?value, "script returned");
                    return Ok(value);
                }
                Flow::Break | Flow::Next => {
                    debug!("loop control outside a loop ignored");
                }
                Flow::Continue => {}
            }
        }
        info!("script finished");
        Ok(None)
    }

    fn execute(&mut self, stmt: &mut Statement) -> Result<Flow, ZestError> {
        if stmt.is_client_action() {
            let value = self.host.client_action(stmt)?;
            if let (Some(value), Some(name)) = (value, stmt.variable_name()) {
                self.variables.set(name, value);
            }
            return Ok(Flow::Continue);
        }

        match &mut stmt.kind {
            StatementKind::Request(request) => {
                self.send(request)?;
            }
            StatementKind::Assignment(assignment) => {
                let value = assignment.compute(&*self)?;
                debug!(variable = %assignment.variable_name, "assigned");
                self.variables.set(assignment.variable_name.clone(), value);
            }
            StatementKind::Conditional(cond) => {
                let branch = if cond.expression.is_true(&*self) {
                    &mut cond.if_branch
                } else {
                    &mut cond.else_branch
                };
                for child in branch.children_mut().iter_mut() {
                    let flow = self.run_statement(child)?;
                    if !flow.is_continue() {
                        return Ok(flow);
                    }
                }
            }
            StatementKind::LoopInteger(lp) => return Ok(lp.run(self)?.flow),
            StatementKind::LoopString(lp) => return Ok(lp.run(self)?.flow),
            StatementKind::ActionFail { message } => {
                return Err(ZestError::ActionFailed(self.replace_variables(message)));
            }
            StatementKind::ActionPrint { message } => {
                let message = self.replace_variables(message);
                self.host.print(&message);
            }
            StatementKind::ActionSleep { milliseconds } => {
                let ms = self.config.effective_sleep_ms(*milliseconds);
                debug!(requested = *milliseconds, actual = ms, "sleep");
                if ms > 0 {
                    self.host.sleep(ms);
                }
            }
            StatementKind::ControlReturn { value } => {
                return Ok(Flow::Return(Some(self.replace_variables(value))));
            }
            StatementKind::ControlLoopBreak => return Ok(Flow::Break),
            StatementKind::ControlLoopNext => return Ok(Flow::Next),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn send(&mut self, template: &ZestRequest) -> Result<(), ZestError> {
        let mut request = template.clone();
        request.url = self.replace_variables(&template.url);
        request.headers = self.replace_variables(&template.headers);
        request.data = self.replace_variables(&template.data);
        request.assertions.clear();

        info!(method = %request.method, url = %request.url, "request");
        let response = self.host.send(&request)?;
        debug!(status = response.status_code, time_ms = response.response_time_ms, "response");

        self.variables.set_standard_variables(Some(&request), Some(&response));
        let url = request.url.clone();
        self.last_request = Some(request);
        self.last_response = Some(response);

        for assertion in &template.assertions {
            if !assertion.is_true(&*self) {
                let expression = assertion.to_string();
                warn!(url = %url, expression = %expression, "assertion failed");
                return Err(ZestError::AssertionFailed { url, expression });
            }
        }
        Ok(())
    }
}

impl<H: ScriptHost> ZestRuntime for ScriptRunner<H> {
    fn last_response(&self) -> Option<&ZestResponse> {
        self.last_response.as_ref()
    }

    fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name)
    }

    fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.set(name, value);
    }

    fn replace_variables(&self, text: &str) -> String {
        self.variables.replace_in_string(text)
    }

    fn run_statement(&mut self, statement: &mut Statement) -> Result<Flow, ZestError> {
        if !statement.enabled {
            debug!(kind = statement.name(), "skipping disabled statement");
            return Ok(Flow::Continue);
        }
        let started = Instant::now();
        let outcome = self.execute(statement);
        let result = match &outcome {
            Ok(_) => StepResult::Success,
            Err(e) => StepResult::Failure(e.to_string()),
        };
        self.log.push(RunLog::new(statement.name(), result, started.elapsed()));
        outcome
    }
}
