//! Boolean expression trees used by conditionals and request assertions.
//!
//! An [`Expression`] is either a leaf predicate over the runtime (a regex
//! match against a variable, a status code check, ...) or a combinator over
//! child expressions. Every node carries an `inverse` flag which negates
//! whatever the node computed, so "not" is expressed by inverting a node
//! rather than by a dedicated combinator.
//!
//! Leaves fail closed: a predicate that needs the last response returns
//! `false` when no request has been made yet, and a predicate over a variable
//! returns `false` when the variable is unset.
//!
//! # Example
//!
//! ```
//! use zest_core::expression::Expression;
//!
//! let has_digits = Expression::regex("response.body", r"\d+").unwrap();
//! let not_found = Expression::status_code(404).inverted();
//! let both = Expression::and(vec![has_digits, not_found]);
//! assert!(!both.is_leaf());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ZestError;
use crate::pattern::Pattern;
use crate::runtime::ZestRuntime;

/// A boolean node: a leaf predicate or a combinator, plus its inverse flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    #[serde(default)]
    inverse: bool,
    kind: ExpressionKind,
}

/// The closed set of expression kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Regex search inside a variable's value.
    Regex(RegexExpression),
    /// Variable equals a (substituted) value.
    Equals(EqualsExpression),
    /// Variable length within `approx` of `length`.
    Length(LengthExpression),
    /// Last response has the given status code.
    StatusCode(u16),
    /// Last response was faster or slower than a threshold.
    ResponseTime(ResponseTimeExpression),
    /// Variable parses as an integer.
    IsInteger(String),
    /// All children hold. An empty list holds.
    And(Vec<Expression>),
    /// At least one child holds. An empty list does not.
    Or(Vec<Expression>),
}

/// Regex leaf: searches for `pattern` anywhere in the named variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexExpression {
    variable_name: String,
    regex: Pattern,
}

impl RegexExpression {
    pub fn new(variable_name: impl Into<String>, regex: &str) -> Result<Self, ZestError> {
        Ok(Self {
            variable_name: variable_name.into(),
            regex: Pattern::new(regex)?,
        })
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    pub fn set_variable_name(&mut self, variable_name: impl Into<String>) {
        self.variable_name = variable_name.into();
    }

    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }

    /// Replace the pattern. On error the previous pattern is kept.
    pub fn set_regex(&mut self, regex: &str) -> Result<(), ZestError> {
        self.regex = Pattern::new(regex)?;
        Ok(())
    }

    fn matches<R: ZestRuntime + ?Sized>(&self, runtime: &R) -> bool {
        if runtime.last_response().is_none() {
            return false;
        }
        match runtime.variable(&self.variable_name) {
            Some(value) => self.regex.is_found(value),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EqualsExpression {
    pub variable_name: String,
    pub value: String,
    #[serde(default)]
    pub case_exact: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthExpression {
    pub variable_name: String,
    pub length: usize,
    #[serde(default)]
    pub approx: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeExpression {
    pub time_ms: u64,
    /// When true the response must be slower than `time_ms`, otherwise faster.
    #[serde(default = "default_true")]
    pub greater_than: bool,
}

fn default_true() -> bool {
    true
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Self { inverse: false, kind }
    }

    /// Regex search of `regex` inside variable `variable_name`.
    pub fn regex(variable_name: impl Into<String>, regex: &str) -> Result<Self, ZestError> {
        Ok(Self::new(ExpressionKind::Regex(RegexExpression::new(variable_name, regex)?)))
    }

    pub fn equals(variable_name: impl Into<String>, value: impl Into<String>, case_exact: bool) -> Self {
        Self::new(ExpressionKind::Equals(EqualsExpression {
            variable_name: variable_name.into(),
            value: value.into(),
            case_exact,
        }))
    }

    pub fn length(variable_name: impl Into<String>, length: usize, approx: usize) -> Self {
        Self::new(ExpressionKind::Length(LengthExpression {
            variable_name: variable_name.into(),
            length,
            approx,
        }))
    }

    pub fn status_code(code: u16) -> Self {
        Self::new(ExpressionKind::StatusCode(code))
    }

    pub fn response_time(time_ms: u64, greater_than: bool) -> Self {
        Self::new(ExpressionKind::ResponseTime(ResponseTimeExpression { time_ms, greater_than }))
    }

    pub fn is_integer(variable_name: impl Into<String>) -> Self {
        Self::new(ExpressionKind::IsInteger(variable_name.into()))
    }

    pub fn and(children: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::And(children))
    }

    pub fn or(children: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::Or(children))
    }

    /// Builder form of [`set_inverse(true)`](Self::set_inverse).
    pub fn inverted(mut self) -> Self {
        self.inverse = true;
        self
    }

    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ExpressionKind {
        &mut self.kind
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    pub fn set_inverse(&mut self, inverse: bool) {
        self.inverse = inverse;
    }

    /// True for predicates, false for combinators (even empty ones).
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, ExpressionKind::And(_) | ExpressionKind::Or(_))
    }

    /// Child expressions of a combinator; empty for leaves.
    pub fn children(&self) -> &[Expression] {
        match &self.kind {
            ExpressionKind::And(children) | ExpressionKind::Or(children) => children,
            _ => &[],
        }
    }

    /// Mutable access to a combinator's children.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Expression>> {
        match &mut self.kind {
            ExpressionKind::And(children) | ExpressionKind::Or(children) => Some(children),
            _ => None,
        }
    }

    /// A fully independent copy of the tree.
    pub fn deep_copy(&self) -> Expression {
        self.clone()
    }

    /// Evaluate the node and apply its inverse flag.
    pub fn is_true<R: ZestRuntime + ?Sized>(&self, runtime: &R) -> bool {
        let raw = self.evaluate_raw(runtime);
        if self.inverse {
            !raw
        } else {
            raw
        }
    }

    fn evaluate_raw<R: ZestRuntime + ?Sized>(&self, runtime: &R) -> bool {
        match &self.kind {
            ExpressionKind::Regex(regex) => regex.matches(runtime),
            ExpressionKind::Equals(eq) => {
                let Some(actual) = runtime.variable(&eq.variable_name) else {
                    return false;
                };
                let expected = runtime.replace_variables(&eq.value);
                if eq.case_exact {
                    actual == expected
                } else {
                    actual.to_lowercase() == expected.to_lowercase()
                }
            }
            ExpressionKind::Length(len) => match runtime.variable(&len.variable_name) {
                Some(value) => value.chars().count().abs_diff(len.length) <= len.approx,
                None => false,
            },
            ExpressionKind::StatusCode(code) => runtime
                .last_response()
                .map(|resp| resp.status_code == *code)
                .unwrap_or(false),
            ExpressionKind::ResponseTime(rt) => match runtime.last_response() {
                Some(resp) if rt.greater_than => resp.response_time_ms > rt.time_ms,
                Some(resp) => resp.response_time_ms < rt.time_ms,
                None => false,
            },
            ExpressionKind::IsInteger(name) => runtime
                .variable(name)
                .map(|value| value.trim().parse::<i64>().is_ok())
                .unwrap_or(false),
            ExpressionKind::And(children) => children.iter().all(|c| c.is_true(runtime)),
            ExpressionKind::Or(children) => children.iter().any(|c| c.is_true(runtime)),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "NOT ")?;
        }
        match &self.kind {
            ExpressionKind::Regex(r) => write!(f, "{} ~ /{}/", r.variable_name, r.regex),
            ExpressionKind::Equals(eq) => write!(f, "{} == {:?}", eq.variable_name, eq.value),
            ExpressionKind::Length(len) => {
                write!(f, "len({}) == {} +/- {}", len.variable_name, len.length, len.approx)
            }
            ExpressionKind::StatusCode(code) => write!(f, "status == {code}"),
            ExpressionKind::ResponseTime(rt) => {
                let op = if rt.greater_than { ">" } else { "<" };
                write!(f, "time {op} {}ms", rt.time_ms)
            }
            ExpressionKind::IsInteger(name) => write!(f, "isInteger({name})"),
            ExpressionKind::And(children) | ExpressionKind::Or(children) => {
                let sep = if matches!(self.kind, ExpressionKind::And(_)) { " AND " } else { " OR " };
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sep)?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
