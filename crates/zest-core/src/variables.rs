//! Named variables and `{{name}}` substitution.
//!
//! A [`ZestVariables`] store is used twice: as the declared parameter set of
//! a script (names with default values) and as the live variable bindings of
//! a runner. Insertion order is preserved so parameters list in the order
//! they were declared.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::http::{ZestRequest, ZestResponse};

/// The URL of the last request.
pub const REQUEST_URL: &str = "request.url";
/// The method of the last request.
pub const REQUEST_METHOD: &str = "request.method";
/// The headers of the last request.
pub const REQUEST_HEADER: &str = "request.header";
/// The body of the last request.
pub const REQUEST_BODY: &str = "request.body";
/// The URL of the last response.
pub const RESPONSE_URL: &str = "response.url";
/// The headers of the last response.
pub const RESPONSE_HEADER: &str = "response.header";
/// The body of the last response.
pub const RESPONSE_BODY: &str = "response.body";

/// Every variable a runner maintains on its own.
pub const STANDARD_VARIABLES: [&str; 7] = [
    REQUEST_URL,
    REQUEST_METHOD,
    REQUEST_HEADER,
    REQUEST_BODY,
    RESPONSE_URL,
    RESPONSE_HEADER,
    RESPONSE_BODY,
];

/// Default opening delimiter of a variable reference.
pub const DEFAULT_TOKEN_START: &str = "{{";
/// Default closing delimiter of a variable reference.
pub const DEFAULT_TOKEN_END: &str = "}}";

fn default_token_start() -> String {
    DEFAULT_TOKEN_START.to_string()
}

fn default_token_end() -> String {
    DEFAULT_TOKEN_END.to_string()
}

/// An ordered mapping from variable name to string value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZestVariables {
    #[serde(default = "default_token_start")]
    token_start: String,
    #[serde(default = "default_token_end")]
    token_end: String,
    #[serde(default)]
    variables: IndexMap<String, String>,
}

impl Default for ZestVariables {
    fn default() -> Self {
        Self {
            token_start: default_token_start(),
            token_end: default_token_end(),
            variables: IndexMap::new(),
        }
    }
}

impl ZestVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store using custom delimiters.
    pub fn with_delimiters(token_start: impl Into<String>, token_end: impl Into<String>) -> Self {
        Self {
            token_start: token_start.into(),
            token_end: token_end.into(),
            variables: IndexMap::new(),
        }
    }

    pub fn token_start(&self) -> &str {
        &self.token_start
    }

    pub fn token_end(&self) -> &str {
        &self.token_end
    }

    pub fn set_token_start(&mut self, token_start: impl Into<String>) {
        self.token_start = token_start.into();
    }

    pub fn set_token_end(&mut self, token_end: impl Into<String>) {
        self.token_end = token_end.into();
    }

    /// Set (or overwrite) a variable. An existing name keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Remove a variable, returning its value if it existed.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.variables.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variable names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Copy every variable of `other` into this store, overwriting clashes.
    pub fn extend_from(&mut self, other: &ZestVariables) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    /// Replace each `{{name}}` reference to a known variable with its value.
    ///
    /// References to unknown names are left as they are. Values are inserted
    /// verbatim and are not scanned again.
    pub fn replace_in_string(&self, text: &str) -> String {
        if self.variables.is_empty() || self.token_start.is_empty() || self.token_end.is_empty() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find(&self.token_start) {
            let after_open = &rest[open + self.token_start.len()..];
            let Some(close) = after_open.find(&self.token_end) else {
                break;
            };
            out.push_str(&rest[..open]);
            match self.get(&after_open[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after_open[close + self.token_end.len()..];
                }
                None => {
                    // keep scanning from just past this opening delimiter
                    out.push_str(&self.token_start);
                    rest = after_open;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Record the last request and response under the standard names.
    pub fn set_standard_variables(&mut self, request: Option<&ZestRequest>, response: Option<&ZestResponse>) {
        if let Some(req) = request {
            self.set(REQUEST_URL, req.url.clone());
            self.set(REQUEST_METHOD, req.method.clone());
            self.set(REQUEST_HEADER, req.headers.clone());
            self.set(REQUEST_BODY, req.data.clone());
        }
        if let Some(resp) = response {
            self.set(RESPONSE_URL, resp.url.clone());
            self.set(RESPONSE_HEADER, resp.headers.clone());
            self.set(RESPONSE_BODY, resp.body.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_original_position() {
        let mut vars = ZestVariables::new();
        vars.set("a", "1");
        vars.set("b", "2");
        vars.set("a", "3");
        assert_eq!(vars.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(vars.get("a"), Some("3"));
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let mut vars = ZestVariables::new();
        vars.set("a", "1");
        vars.set("b", "2");
        vars.set("c", "3");
        assert_eq!(vars.remove("b").as_deref(), Some("2"));
        assert_eq!(vars.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(vars.remove("zzz"), None);
    }

    #[test]
    fn replaces_known_tokens_only() {
        let mut vars = ZestVariables::new();
        vars.set("host", "example.com");
        vars.set("id", "42");
        assert_eq!(
            vars.replace_in_string("https://{{host}}/users/{{id}}?x={{unknown}}"),
            "https://example.com/users/42?x={{unknown}}"
        );
    }

    #[test]
    fn unterminated_token_is_left_alone() {
        let mut vars = ZestVariables::new();
        vars.set("a", "1");
        assert_eq!(vars.replace_in_string("x {{a}} {{a"), "x 1 {{a");
    }

    #[test]
    fn known_token_after_stray_opening_is_replaced() {
        let mut vars = ZestVariables::new();
        vars.set("a", "1");
        assert_eq!(vars.replace_in_string("{{x {{a}}"), "{{x 1");
        assert_eq!(vars.replace_in_string("{{{{a}}}}"), "{{1}}");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut vars = ZestVariables::new();
        vars.set("a", "{{b}}");
        vars.set("b", "oops");
        assert_eq!(vars.replace_in_string("{{a}}"), "{{b}}");
    }

    #[test]
    fn custom_delimiters() {
        let mut vars = ZestVariables::with_delimiters("${", "}");
        vars.set("user", "alice");
        assert_eq!(vars.replace_in_string("hi ${user}"), "hi alice");
        assert_eq!(vars.replace_in_string("hi {{user}}"), "hi {{user}}");
    }

    #[test]
    fn standard_variables_are_populated() {
        let mut vars = ZestVariables::new();
        let req = ZestRequest::new("GET", "http://example.com/");
        let resp = ZestResponse {
            url: "http://example.com/".into(),
            headers: "HTTP/1.1 200 OK".into(),
            body: "<html/>".into(),
            status_code: 200,
            response_time_ms: 5,
        };
        vars.set_standard_variables(Some(&req), Some(&resp));
        for name in STANDARD_VARIABLES {
            assert!(vars.contains(name), "missing {name}");
        }
        assert_eq!(vars.get(RESPONSE_BODY), Some("<html/>"));
        assert_eq!(vars.get(REQUEST_METHOD), Some("GET"));
    }

    #[test]
    fn deserializes_with_default_delimiters() {
        let vars: ZestVariables = serde_json::from_str(r#"{"variables":{"x":"1"}}"#).unwrap();
        assert_eq!(vars.token_start(), "{{");
        assert_eq!(vars.get("x"), Some("1"));
    }
}
