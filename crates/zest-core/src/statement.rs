//! Statements: the steps a script is made of.
//!
//! Statement kinds form a closed set ([`StatementKind`]). Capabilities that
//! only some kinds have (binding a variable, defining a browser window
//! handle, carrying a URL prefix) are exposed as methods that return
//! `None`/`false` for the kinds without them, so callers never need to
//! inspect the kind themselves.
//!
//! Statements do not store their index or neighbours. Both are derived from
//! their position in the owning containers, see [`crate::container`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::container::{Branch, ZestContainer};
use crate::error::ZestError;
use crate::expression::Expression;
use crate::http::{rewrite_prefix, ZestRequest};
use crate::loops::{ZestLoopInteger, ZestLoopString};
use crate::pattern::Pattern;
use crate::runtime::ZestRuntime;

fn default_enabled() -> bool {
    true
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Disabled statements are kept in the tree but skipped when run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub kind: StatementKind,
}

/// Every kind of statement a script may contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatementKind {
    /// Issue an HTTP request and check its assertions.
    Request(ZestRequest),
    /// Compute a value and bind it to a variable.
    Assignment(Assignment),
    /// Run one of two branches depending on an expression.
    Conditional(Conditional),
    /// Loop over an integer progression.
    LoopInteger(ZestLoopInteger),
    /// Loop over a list of strings.
    LoopString(ZestLoopString),
    /// Stop the script with an error.
    ActionFail { message: String },
    /// Print a message through the host.
    ActionPrint { message: String },
    /// Pause execution.
    ActionSleep { milliseconds: u64 },
    /// Stop the script, yielding a value.
    ControlReturn { value: String },
    /// Leave the innermost loop.
    ControlLoopBreak,
    /// Skip to the next iteration of the innermost loop.
    ControlLoopNext,
    /// A note with no effect.
    Comment { comment: String },
    /// Open a browser window.
    #[serde(rename_all = "camelCase")]
    ClientLaunch {
        window_handle: String,
        browser_type: String,
        url: String,
    },
    /// Name an already open window, found by URL.
    #[serde(rename_all = "camelCase")]
    ClientWindowHandle {
        window_handle: String,
        url: String,
        /// Treat `url` as a regex rather than a literal.
        #[serde(default)]
        regex: bool,
    },
    /// Close a browser window.
    #[serde(rename_all = "camelCase")]
    ClientWindowClose { window_handle: String },
    /// Read a cookie from a browser window into a variable.
    #[serde(rename_all = "camelCase")]
    ClientAssignCookie {
        window_handle: String,
        variable_name: String,
        cookie_name: String,
    },
    /// Read an element's text or attribute into a variable.
    #[serde(rename_all = "camelCase")]
    ClientElementAssign {
        window_handle: String,
        variable_name: String,
        element: ClientElement,
        #[serde(default)]
        attribute: Option<String>,
    },
    /// Click an element.
    #[serde(rename_all = "camelCase")]
    ClientElementClick {
        window_handle: String,
        element: ClientElement,
    },
    /// Type into an element.
    #[serde(rename_all = "camelCase")]
    ClientElementSendKeys {
        window_handle: String,
        element: ClientElement,
        value: String,
    },
}

/// How a browser element is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementLocator {
    Id,
    Name,
    ClassName,
    CssSelector,
    LinkText,
    XPath,
}

/// A browser element reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientElement {
    pub by: ElementLocator,
    pub value: String,
}

impl ClientElement {
    pub fn new(by: ElementLocator, value: impl Into<String>) -> Self {
        Self { by, value: value.into() }
    }
}

/// Which part of the last response an assignment reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Head,
    Body,
}

/// Binds the result of an [`AssignSource`] to a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub variable_name: String,
    pub source: AssignSource,
}

/// Where an assignment's value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignSource {
    /// A fixed string, with variable references substituted.
    Value(String),
    /// A random integer in `[min, max)`.
    RandomInteger { min: i64, max: i64 },
    /// The text between two literal delimiters.
    StringDelimiters {
        location: Location,
        prefix: String,
        postfix: String,
    },
    /// The text between two regex matches.
    RegexDelimiters {
        location: Location,
        prefix: Pattern,
        postfix: Pattern,
    },
    /// Another variable's value with every match of `pattern` replaced.
    #[serde(rename_all = "camelCase")]
    Replace {
        variable_name: String,
        pattern: Pattern,
        replacement: String,
    },
}

impl AssignSource {
    /// Regex delimiters, compiled up front.
    pub fn regex_delimiters(location: Location, prefix: &str, postfix: &str) -> Result<Self, ZestError> {
        Ok(AssignSource::RegexDelimiters {
            location,
            prefix: Pattern::new(prefix)?,
            postfix: Pattern::new(postfix)?,
        })
    }

    /// Replace `find` in `variable_name`'s value with `replacement`.
    ///
    /// `find` is a regex when `regex` is set, a literal otherwise.
    pub fn replace(
        variable_name: impl Into<String>,
        find: &str,
        replacement: impl Into<String>,
        regex: bool,
        case_exact: bool,
    ) -> Result<Self, ZestError> {
        let src = if regex { find.to_string() } else { regex::escape(find) };
        let pattern = if case_exact {
            Pattern::new(src)?
        } else {
            Pattern::case_insensitive(&src)?
        };
        Ok(AssignSource::Replace {
            variable_name: variable_name.into(),
            pattern,
            replacement: replacement.into(),
        })
    }
}

impl Assignment {
    pub fn new(variable_name: impl Into<String>, source: AssignSource) -> Self {
        Self {
            variable_name: variable_name.into(),
            source,
        }
    }

    /// Compute the value to assign.
    pub fn compute<R: ZestRuntime + ?Sized>(&self, runtime: &R) -> Result<String, ZestError> {
        let fail = |message: &str| ZestError::AssignFailed {
            variable: self.variable_name.clone(),
            message: message.to_string(),
        };
        match &self.source {
            AssignSource::Value(value) => Ok(runtime.replace_variables(value)),
            AssignSource::RandomInteger { min, max } => {
                if min >= max {
                    return Err(fail("empty random range"));
                }
                Ok(rand::thread_rng().gen_range(*min..*max).to_string())
            }
            AssignSource::StringDelimiters { location, prefix, postfix } => {
                let text = response_text(runtime, *location).ok_or_else(|| fail("no response"))?;
                let start = text
                    .find(prefix.as_str())
                    .map(|i| i + prefix.len())
                    .ok_or_else(|| fail("prefix not found"))?;
                let len = text[start..]
                    .find(postfix.as_str())
                    .ok_or_else(|| fail("postfix not found"))?;
                Ok(text[start..start + len].to_string())
            }
            AssignSource::RegexDelimiters { location, prefix, postfix } => {
                let text = response_text(runtime, *location).ok_or_else(|| fail("no response"))?;
                let (_, start) = prefix.find(text).ok_or_else(|| fail("prefix not found"))?;
                let (end, _) = postfix
                    .find_at(text, start)
                    .ok_or_else(|| fail("postfix not found"))?;
                Ok(text[start..end].to_string())
            }
            AssignSource::Replace {
                variable_name,
                pattern,
                replacement,
            } => {
                let value = runtime
                    .variable(variable_name)
                    .ok_or_else(|| fail(&format!("variable '{variable_name}' not set")))?;
                Ok(pattern.replace_all(value, &runtime.replace_variables(replacement)))
            }
        }
    }
}

fn response_text<R: ZestRuntime + ?Sized>(runtime: &R, location: Location) -> Option<&str> {
    let response = runtime.last_response()?;
    Some(match location {
        Location::Head => response.headers.as_str(),
        Location::Body => response.body.as_str(),
    })
}

/// An if/else over an [`Expression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditional {
    pub expression: Expression,
    #[serde(default)]
    pub if_branch: Branch,
    #[serde(default)]
    pub else_branch: Branch,
}

impl Conditional {
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            if_branch: Branch::default(),
            else_branch: Branch::default(),
        }
    }

    pub fn add_if(&mut self, stmt: Statement) {
        self.if_branch.add(stmt);
    }

    pub fn add_else(&mut self, stmt: Statement) {
        self.else_branch.add(stmt);
    }
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self { enabled: true, kind }
    }

    /// Builder form of `enabled = false`.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn request(request: ZestRequest) -> Self {
        Self::new(StatementKind::Request(request))
    }

    pub fn assign(variable_name: impl Into<String>, source: AssignSource) -> Self {
        Self::new(StatementKind::Assignment(Assignment::new(variable_name, source)))
    }

    pub fn conditional(conditional: Conditional) -> Self {
        Self::new(StatementKind::Conditional(conditional))
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Self::new(StatementKind::Comment { comment: comment.into() })
    }

    pub fn action_fail(message: impl Into<String>) -> Self {
        Self::new(StatementKind::ActionFail { message: message.into() })
    }

    pub fn action_print(message: impl Into<String>) -> Self {
        Self::new(StatementKind::ActionPrint { message: message.into() })
    }

    pub fn action_sleep(milliseconds: u64) -> Self {
        Self::new(StatementKind::ActionSleep { milliseconds })
    }

    pub fn control_return(value: impl Into<String>) -> Self {
        Self::new(StatementKind::ControlReturn { value: value.into() })
    }

    pub fn control_loop_break() -> Self {
        Self::new(StatementKind::ControlLoopBreak)
    }

    pub fn control_loop_next() -> Self {
        Self::new(StatementKind::ControlLoopNext)
    }

    pub fn client_launch(
        window_handle: impl Into<String>,
        browser_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::new(StatementKind::ClientLaunch {
            window_handle: window_handle.into(),
            browser_type: browser_type.into(),
            url: url.into(),
        })
    }

    pub fn client_window_handle(window_handle: impl Into<String>, url: impl Into<String>, regex: bool) -> Self {
        Self::new(StatementKind::ClientWindowHandle {
            window_handle: window_handle.into(),
            url: url.into(),
            regex,
        })
    }

    pub fn client_window_close(window_handle: impl Into<String>) -> Self {
        Self::new(StatementKind::ClientWindowClose {
            window_handle: window_handle.into(),
        })
    }

    pub fn client_assign_cookie(
        window_handle: impl Into<String>,
        variable_name: impl Into<String>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self::new(StatementKind::ClientAssignCookie {
            window_handle: window_handle.into(),
            variable_name: variable_name.into(),
            cookie_name: cookie_name.into(),
        })
    }

    pub fn client_element_assign(
        window_handle: impl Into<String>,
        variable_name: impl Into<String>,
        element: ClientElement,
        attribute: Option<String>,
    ) -> Self {
        Self::new(StatementKind::ClientElementAssign {
            window_handle: window_handle.into(),
            variable_name: variable_name.into(),
            element,
            attribute,
        })
    }

    /// A short, static name for this statement's kind, for logs.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            StatementKind::Request(_) => "request",
            StatementKind::Assignment(_) => "assignment",
            StatementKind::Conditional(_) => "conditional",
            StatementKind::LoopInteger(_) => "loop_integer",
            StatementKind::LoopString(_) => "loop_string",
            StatementKind::ActionFail { .. } => "action_fail",
            StatementKind::ActionPrint { .. } => "action_print",
            StatementKind::ActionSleep { .. } => "action_sleep",
            StatementKind::ControlReturn { .. } => "control_return",
            StatementKind::ControlLoopBreak => "control_loop_break",
            StatementKind::ControlLoopNext => "control_loop_next",
            StatementKind::Comment { .. } => "comment",
            StatementKind::ClientLaunch { .. } => "client_launch",
            StatementKind::ClientWindowHandle { .. } => "client_window_handle",
            StatementKind::ClientWindowClose { .. } => "client_window_close",
            StatementKind::ClientAssignCookie { .. } => "client_assign_cookie",
            StatementKind::ClientElementAssign { .. } => "client_element_assign",
            StatementKind::ClientElementClick { .. } => "client_element_click",
            StatementKind::ClientElementSendKeys { .. } => "client_element_send_keys",
        }
    }

    /// The variable this statement binds, if it binds one.
    pub fn variable_name(&self) -> Option<&str> {
        match &self.kind {
            StatementKind::Assignment(a) => Some(&a.variable_name),
            StatementKind::LoopInteger(l) => Some(l.variable_name()),
            StatementKind::LoopString(l) => Some(l.variable_name()),
            StatementKind::ClientAssignCookie { variable_name, .. }
            | StatementKind::ClientElementAssign { variable_name, .. } => Some(variable_name),
            _ => None,
        }
    }

    /// The browser window handle this statement defines, if any.
    pub fn window_handle_defined(&self) -> Option<&str> {
        match &self.kind {
            StatementKind::ClientLaunch { window_handle, .. }
            | StatementKind::ClientWindowHandle { window_handle, .. } => Some(window_handle),
            _ => None,
        }
    }

    /// True for statements that drive a browser window.
    pub fn is_client_action(&self) -> bool {
        matches!(
            self.kind,
            StatementKind::ClientLaunch { .. }
                | StatementKind::ClientWindowHandle { .. }
                | StatementKind::ClientWindowClose { .. }
                | StatementKind::ClientAssignCookie { .. }
                | StatementKind::ClientElementAssign { .. }
                | StatementKind::ClientElementClick { .. }
                | StatementKind::ClientElementSendKeys { .. }
        )
    }

    /// True if running this statement causes no traffic or browser activity.
    pub fn is_passive(&self) -> bool {
        match &self.kind {
            StatementKind::Request(_) | StatementKind::ActionSleep { .. } => false,
            _ if self.is_client_action() => false,
            _ => self
                .child_lists()
                .into_iter()
                .all(|list| list.iter().all(Statement::is_passive)),
        }
    }

    /// Rewrite URLs starting with `old_prefix` to start with `new_prefix`,
    /// here and in every nested statement.
    pub fn set_prefix(&mut self, old_prefix: &str, new_prefix: &str) {
        match &mut self.kind {
            StatementKind::Request(req) => {
                req.set_prefix(old_prefix, new_prefix);
            }
            StatementKind::ClientLaunch { url, .. } => {
                rewrite_prefix(url, old_prefix, new_prefix);
            }
            _ => {}
        }
        for list in self.child_lists_mut() {
            for stmt in list.iter_mut() {
                stmt.set_prefix(old_prefix, new_prefix);
            }
        }
    }

    /// The ordered child lists of a container statement, in document order
    /// (a conditional's if-branch comes before its else-branch).
    pub fn child_lists(&self) -> Vec<&[Statement]> {
        match &self.kind {
            StatementKind::Conditional(c) => vec![c.if_branch.children(), c.else_branch.children()],
            StatementKind::LoopInteger(l) => vec![l.children()],
            StatementKind::LoopString(l) => vec![l.children()],
            _ => Vec::new(),
        }
    }

    pub fn child_lists_mut(&mut self) -> Vec<&mut Vec<Statement>> {
        match &mut self.kind {
            StatementKind::Conditional(c) => {
                vec![c.if_branch.children_mut(), c.else_branch.children_mut()]
            }
            StatementKind::LoopInteger(l) => vec![l.children_mut()],
            StatementKind::LoopString(l) => vec![l.children_mut()],
            _ => Vec::new(),
        }
    }

    /// True for statements that hold other statements.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            StatementKind::Conditional(_) | StatementKind::LoopInteger(_) | StatementKind::LoopString(_)
        )
    }

    /// Number of statements in this subtree, this one included.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .child_lists()
            .into_iter()
            .map(list_size)
            .sum::<usize>()
    }

    /// A fully independent copy of this subtree.
    pub fn deep_copy(&self) -> Statement {
        self.clone()
    }
}

/// Number of statements in `list` including everything nested.
pub fn list_size(list: &[Statement]) -> usize {
    list.iter().map(Statement::subtree_size).sum()
}

impl From<ZestRequest> for Statement {
    fn from(request: ZestRequest) -> Self {
        Statement::request(request)
    }
}

impl From<Assignment> for Statement {
    fn from(assignment: Assignment) -> Self {
        Statement::new(StatementKind::Assignment(assignment))
    }
}

impl From<Conditional> for Statement {
    fn from(conditional: Conditional) -> Self {
        Statement::conditional(conditional)
    }
}

impl From<ZestLoopInteger> for Statement {
    fn from(lp: ZestLoopInteger) -> Self {
        Statement::new(StatementKind::LoopInteger(lp))
    }
}

impl From<ZestLoopString> for Statement {
    fn from(lp: ZestLoopString) -> Self {
        Statement::new(StatementKind::LoopString(lp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ZestResponse;
    use crate::loops::ZestLoop;
    use crate::runtime::testing::FixtureRuntime;

    fn runtime_with_body(body: &str) -> FixtureRuntime {
        let mut rt = FixtureRuntime::new();
        rt.response = Some(ZestResponse {
            url: "http://example.com/".into(),
            headers: "HTTP/1.1 200 OK\r\nSet-Cookie: sid=abc123; Path=/".into(),
            body: body.into(),
            status_code: 200,
            response_time_ms: 3,
        });
        rt
    }

    #[test]
    fn capabilities_by_kind() {
        let assign = Statement::assign("token", AssignSource::Value("x".into()));
        let lp: Statement = ZestLoop::integer("i", 0, 3).into();
        let cookie = Statement::client_assign_cookie("win", "sid", "JSESSIONID");
        let launch = Statement::client_launch("win", "firefox", "http://a/");
        let comment = Statement::comment("hi");

        assert_eq!(assign.variable_name(), Some("token"));
        assert_eq!(lp.variable_name(), Some("i"));
        assert_eq!(cookie.variable_name(), Some("sid"));
        assert_eq!(comment.variable_name(), None);

        assert_eq!(launch.window_handle_defined(), Some("win"));
        assert_eq!(cookie.window_handle_defined(), None);
        assert_eq!(lp.name(), "loop_integer");
    }

    #[test]
    fn passivity_follows_children() {
        let mut cond = Conditional::new(Expression::status_code(200));
        cond.add_if(Statement::comment("ok"));
        assert!(Statement::conditional(cond.clone()).is_passive());
        cond.add_else(Statement::request(ZestRequest::new("GET", "http://a/")));
        assert!(!Statement::conditional(cond).is_passive());
        assert!(!Statement::action_sleep(10).is_passive());
    }

    #[test]
    fn set_prefix_recurses_into_containers() {
        let mut lp = ZestLoop::integer("i", 0, 2);
        lp.add(Statement::request(ZestRequest::new("GET", "http://old/a")));
        lp.add(Statement::client_launch("w", "firefox", "http://old/b"));
        let mut stmt: Statement = lp.into();
        stmt.set_prefix("http://old", "https://new");

        let children = stmt.child_lists()[0];
        assert!(matches!(&children[0].kind, StatementKind::Request(r) if r.url == "https://new/a"));
        assert!(matches!(&children[1].kind, StatementKind::ClientLaunch { url, .. } if url == "https://new/b"));
    }

    #[test]
    fn subtree_size_counts_nested() {
        let mut cond = Conditional::new(Expression::status_code(200));
        cond.add_if(Statement::comment("a"));
        let mut inner = ZestLoop::strings("s", ["x"]);
        inner.add(Statement::comment("b"));
        cond.add_else(inner.into());
        assert_eq!(Statement::conditional(cond).subtree_size(), 4);
    }

    #[test]
    fn assign_value_substitutes_variables() {
        let mut rt = FixtureRuntime::new();
        rt.vars.set("name", "zest");
        let a = Assignment::new("greeting", AssignSource::Value("hello {{name}}".into()));
        assert_eq!(a.compute(&rt).unwrap(), "hello zest");
    }

    #[test]
    fn assign_random_integer_in_range() {
        let rt = FixtureRuntime::new();
        let a = Assignment::new("n", AssignSource::RandomInteger { min: 5, max: 8 });
        for _ in 0..20 {
            let n: i64 = a.compute(&rt).unwrap().parse().unwrap();
            assert!((5..8).contains(&n));
        }
        let empty = Assignment::new("n", AssignSource::RandomInteger { min: 3, max: 3 });
        assert!(matches!(empty.compute(&rt), Err(ZestError::AssignFailed { .. })));
    }

    #[test]
    fn assign_string_delimiters() {
        let rt = runtime_with_body("<input name=\"csrf\" value=\"t0k3n\">");
        let a = Assignment::new(
            "csrf",
            AssignSource::StringDelimiters {
                location: Location::Body,
                prefix: "value=\"".into(),
                postfix: "\"".into(),
            },
        );
        assert_eq!(a.compute(&rt).unwrap(), "t0k3n");

        let head = Assignment::new(
            "sid",
            AssignSource::StringDelimiters {
                location: Location::Head,
                prefix: "sid=".into(),
                postfix: ";".into(),
            },
        );
        assert_eq!(head.compute(&rt).unwrap(), "abc123");
    }

    #[test]
    fn assign_regex_delimiters() {
        let rt = runtime_with_body("id: 1234 end");
        let a = Assignment::new(
            "id",
            AssignSource::regex_delimiters(Location::Body, r"id:\s*", r"\s+end").unwrap(),
        );
        assert_eq!(a.compute(&rt).unwrap(), "1234");
    }

    #[test]
    fn assign_delimiters_fail_without_match_or_response() {
        let rt = runtime_with_body("nothing here");
        let a = Assignment::new(
            "x",
            AssignSource::StringDelimiters {
                location: Location::Body,
                prefix: "<".into(),
                postfix: ">".into(),
            },
        );
        assert!(matches!(a.compute(&rt), Err(ZestError::AssignFailed { .. })));
        assert!(a.compute(&FixtureRuntime::new()).is_err());
        assert!(AssignSource::regex_delimiters(Location::Body, "(", "x").is_err());
    }

    #[test]
    fn assign_replace_literal_and_regex() {
        let mut rt = FixtureRuntime::new();
        rt.vars.set("path", "/A/b/a.c");
        let literal = Assignment::new("p", AssignSource::replace("path", "a.c", "x", false, true).unwrap());
        assert_eq!(literal.compute(&rt).unwrap(), "/A/b/x");

        let nocase = Assignment::new("p", AssignSource::replace("path", "a", "_", false, false).unwrap());
        assert_eq!(nocase.compute(&rt).unwrap(), "/_/b/_.c");

        let re = Assignment::new("p", AssignSource::replace("path", "[ab]", "-", true, true).unwrap());
        assert_eq!(re.compute(&rt).unwrap(), "/A/-/-.c");

        let missing = Assignment::new("p", AssignSource::replace("nope", "a", "b", false, true).unwrap());
        assert!(missing.compute(&rt).is_err());
    }

    #[test]
    fn case_insensitive_replace_survives_json() {
        let mut rt = FixtureRuntime::new();
        rt.vars.set("path", "/A/b");
        let stmt = Statement::assign("p", AssignSource::replace("path", "a", "_", false, false).unwrap());
        let json = serde_json::to_string(&stmt).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();

        let compute = |s: &Statement| match &s.kind {
            StatementKind::Assignment(a) => a.compute(&rt).unwrap(),
            _ => unreachable!(),
        };
        assert_eq!(compute(&stmt), "/_/b");
        assert_eq!(compute(&back), "/_/b");

        let exact = Statement::assign("p", AssignSource::replace("path", "a", "_", false, true).unwrap());
        assert_ne!(exact, stmt);
    }

    #[test]
    fn serde_uses_type_tag() {
        let stmt = Statement::client_element_assign(
            "w",
            "v",
            ClientElement::new(ElementLocator::Id, "user"),
            Some("value".into()),
        );
        let json = serde_json::to_value(&stmt).unwrap();
        assert_eq!(json["kind"]["type"], "ClientElementAssign");
        assert_eq!(json["kind"]["variableName"], "v");
        let back: Statement = serde_json::from_value(json).unwrap();
        assert_eq!(back, stmt);

        let plain: Statement = serde_json::from_str(r#"{"kind":{"type":"ControlLoopBreak"}}"#).unwrap();
        assert!(plain.enabled);
    }
}
