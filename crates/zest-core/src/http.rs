//! HTTP request and response values carried by scripts.
//!
//! These are plain data. Issuing a request is the job of the host
//! application (see [`ScriptHost`](crate::runner::ScriptHost)).

use serde::{Deserialize, Serialize};

use crate::expression::Expression;

fn default_follow_redirects() -> bool {
    true
}

/// A recorded HTTP request plus the assertions checked against its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZestRequest {
    pub url: String,
    pub method: String,
    /// Raw header block, one `Name: value` per line.
    #[serde(default)]
    pub headers: String,
    /// Request body.
    #[serde(default)]
    pub data: String,
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
    /// Expressions that must all hold for the response.
    #[serde(default)]
    pub assertions: Vec<Expression>,
}

impl ZestRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: String::new(),
            data: String::new(),
            follow_redirects: true,
            assertions: Vec::new(),
        }
    }

    pub fn with_headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = headers.into();
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_assertion(mut self, expression: Expression) -> Self {
        self.assertions.push(expression);
        self
    }

    /// Swap a leading `old_prefix` of the URL for `new_prefix`.
    ///
    /// Returns true if the URL was rewritten.
    pub fn set_prefix(&mut self, old_prefix: &str, new_prefix: &str) -> bool {
        rewrite_prefix(&mut self.url, old_prefix, new_prefix)
    }
}

/// Rewrite `url` in place when it starts with a non-empty `old_prefix`.
pub(crate) fn rewrite_prefix(url: &mut String, old_prefix: &str, new_prefix: &str) -> bool {
    if old_prefix.is_empty() || !url.starts_with(old_prefix) {
        return false;
    }
    let rest = url[old_prefix.len()..].to_string();
    *url = format!("{new_prefix}{rest}");
    true
}

/// The response a host received for a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZestResponse {
    pub url: String,
    #[serde(default)]
    pub headers: String,
    #[serde(default)]
    pub body: String,
    pub status_code: u16,
    /// How long the request took in milliseconds.
    #[serde(default)]
    pub response_time_ms: u64,
}
