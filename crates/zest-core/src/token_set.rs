//! Token sets: the finite sequences of values a loop iterates over.
//!
//! A token set is an immutable value. Changing the bounds of an integer
//! loop builds a new [`IntegerTokenSet`] rather than patching the old one,
//! so a set's size can never go stale.

use serde::{Deserialize, Serialize};

use crate::error::ZestError;

/// An ordered, finite sequence of loop tokens.
pub trait ZestLoopTokenSet {
    /// Number of tokens in the set.
    fn size(&self) -> usize;

    /// The token at `index`, rendered as the string bound to the loop
    /// variable. `None` past the end.
    fn token(&self, index: usize) -> Option<String>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// The arithmetic progression `start, start + step, ...` stopping before `end`.
///
/// A negative step counts down from `start` to just above `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIntegerTokenSet")]
pub struct IntegerTokenSet {
    start: i64,
    end: i64,
    step: i64,
}

#[derive(Deserialize)]
struct RawIntegerTokenSet {
    start: i64,
    end: i64,
    #[serde(default = "default_step")]
    step: i64,
}

fn default_step() -> i64 {
    1
}

impl TryFrom<RawIntegerTokenSet> for IntegerTokenSet {
    type Error = ZestError;

    fn try_from(raw: RawIntegerTokenSet) -> Result<Self, Self::Error> {
        IntegerTokenSet::with_step(raw.start, raw.end, raw.step)
    }
}

impl Default for IntegerTokenSet {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl IntegerTokenSet {
    /// `[start, end)` with a step of one.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end, step: 1 }
    }

    /// `[start, end)` stepped by `step`. A zero step never terminates and is
    /// rejected.
    pub fn with_step(start: i64, end: i64, step: i64) -> Result<Self, ZestError> {
        if step == 0 {
            return Err(ZestError::InvalidStep);
        }
        Ok(Self { start, end, step })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// The numeric value at `index`.
    pub fn value(&self, index: usize) -> Option<i64> {
        if index >= self.size() {
            return None;
        }
        let value = self.start as i128 + index as i128 * self.step as i128;
        i64::try_from(value).ok()
    }

    /// Every value of the progression in order.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.size()).filter_map(move |i| self.value(i))
    }
}

impl ZestLoopTokenSet for IntegerTokenSet {
    fn size(&self) -> usize {
        let span = if self.step > 0 {
            self.end as i128 - self.start as i128
        } else {
            self.start as i128 - self.end as i128
        };
        if span <= 0 {
            return 0;
        }
        let step = (self.step as i128).abs();
        let count = (span + step - 1) / step;
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    fn token(&self, index: usize) -> Option<String> {
        self.value(index).map(|v| v.to_string())
    }
}

/// An explicit list of string tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTokenSet {
    tokens: Vec<String>,
}

impl StringTokenSet {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// A new set with `token` appended.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == token)
    }
}

impl ZestLoopTokenSet for StringTokenSet {
    fn size(&self) -> usize {
        self.tokens.len()
    }

    fn token(&self, index: usize) -> Option<String> {
        self.tokens.get(index).cloned()
    }
}
