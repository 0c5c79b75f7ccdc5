//! Shared test helpers for zest-core integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use zest_core::container::ZestContainer;
use zest_core::error::ZestError;
use zest_core::expression::Expression;
use zest_core::http::{ZestRequest, ZestResponse};
use zest_core::loops::ZestLoop;
use zest_core::runner::ScriptHost;
use zest_core::script::{ScriptType, ZestScript};
use zest_core::statement::{Conditional, Statement};

// ---------------------------------------------------------------------------
// Mock host
// ---------------------------------------------------------------------------

/// A host answering requests from a fixed table keyed by URL.
///
/// Unknown URLs get a 404 with an empty body.
#[derive(Default)]
pub struct MockHost {
    pub routes: HashMap<String, (u16, String)>,
    pub sent: Vec<ZestRequest>,
    pub printed: Vec<String>,
    pub client_calls: Vec<&'static str>,
}

impl MockHost {
    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn sent_urls(&self) -> Vec<&str> {
        self.sent.iter().map(|r| r.url.as_str()).collect()
    }
}

impl ScriptHost for MockHost {
    fn send(&mut self, request: &ZestRequest) -> Result<ZestResponse, ZestError> {
        self.sent.push(request.clone());
        let (status, body) = self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(ZestResponse {
            url: request.url.clone(),
            headers: format!("HTTP/1.1 {status}\r\nContent-Type: text/html"),
            body,
            status_code: status,
            response_time_ms: 1,
        })
    }

    fn client_action(&mut self, statement: &Statement) -> Result<Option<String>, ZestError> {
        self.client_calls.push(statement.name());
        Ok(None)
    }

    fn print(&mut self, message: &str) {
        self.printed.push(message.to_string());
    }

    fn sleep(&mut self, _milliseconds: u64) {}
}

// ---------------------------------------------------------------------------
// Script builders
// ---------------------------------------------------------------------------

/// A loop holding two comments.
pub fn small_loop(variable: &str) -> Statement {
    let mut lp = ZestLoop::integer(variable, 0, 2);
    lp.add(Statement::comment(format!("{variable} a")));
    lp.add(Statement::comment(format!("{variable} b")));
    lp.into()
}

/// A conditional with one comment per branch.
pub fn small_conditional(label: &str) -> Statement {
    let mut cond = Conditional::new(Expression::status_code(200));
    cond.add_if(Statement::comment(format!("{label} if")));
    cond.add_else(Statement::comment(format!("{label} else")));
    cond.into()
}

/// Independent depth-first walk over the child lists.
pub fn collect_dfs<'a>(list: &'a [Statement], out: &mut Vec<&'a Statement>) {
    for stmt in list {
        out.push(stmt);
        for child_list in stmt.child_lists() {
            collect_dfs(child_list, out);
        }
    }
}

pub fn empty_script() -> ZestScript {
    ZestScript::new("test", "integration test script", ScriptType::StandAlone)
}
