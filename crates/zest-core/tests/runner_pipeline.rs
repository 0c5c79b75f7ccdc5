//! End-to-end runs of the reference runner against a mock host.

mod common;

use zest_core::container::ZestContainer;
use zest_core::error::ZestError;
use zest_core::expression::Expression;
use zest_core::http::ZestRequest;
use zest_core::loops::ZestLoop;
use zest_core::runner::{ScriptRunner, StepResult};
use zest_core::script::ZestScript;
use zest_core::statement::{AssignSource, Conditional, Location, Statement};

use common::{empty_script, MockHost};

fn login_script() -> ZestScript {
    let mut script = empty_script();
    script.parameters.set("base", "http://app.test");
    script.parameters.set("user", "alice");

    let login = ZestRequest::new("POST", "{{base}}/login")
        .with_data("user={{user}}")
        .with_assertion(Expression::status_code(200))
        .with_assertion(Expression::regex("response.body", "csrf=").unwrap());
    script.add(Statement::request(login));
    script.add(Statement::assign(
        "csrf",
        AssignSource::StringDelimiters {
            location: Location::Body,
            prefix: "csrf=".into(),
            postfix: ";".into(),
        },
    ));

    let mut pages = ZestLoop::strings("page", ["home", "admin", "missing"]);
    pages.add(Statement::request(ZestRequest::new(
        "GET",
        "{{base}}/{{page}}?t={{csrf}}",
    )));
    let mut cond = Conditional::new(Expression::status_code(404));
    cond.add_if(Statement::action_print("{{page}} not found"));
    cond.add_if(Statement::control_loop_break());
    cond.add_else(Statement::action_print("{{page}} ok"));
    pages.add(cond.into());
    script.add(pages.into());
    script.add(Statement::control_return("{{csrf}}"));
    script.add(Statement::action_print("unreachable"));
    script
}

fn app_host() -> MockHost {
    MockHost::default()
        .route("http://app.test/login", 200, "welcome csrf=tok42; bye")
        .route("http://app.test/home?t=tok42", 200, "home")
        .route("http://app.test/admin?t=tok42", 200, "admin")
}

#[test]
fn login_flow_runs_end_to_end() {
    let mut script = login_script();
    let mut runner = ScriptRunner::new(app_host());

    let returned = runner.run(&mut script, &[]).unwrap();

    assert_eq!(returned.as_deref(), Some("tok42"));
    let host = runner.host();
    assert_eq!(
        host.sent_urls(),
        vec![
            "http://app.test/login",
            "http://app.test/home?t=tok42",
            "http://app.test/admin?t=tok42",
            "http://app.test/missing?t=tok42",
        ]
    );
    assert_eq!(host.sent[0].data, "user=alice");
    assert_eq!(host.printed, vec!["home ok", "admin ok", "missing not found"]);
    assert!(runner.log().iter().all(|entry| entry.result == StepResult::Success));
}

#[test]
fn overrides_win_over_parameters() {
    let mut script = login_script();
    let host = app_host().route("http://app.test/login", 200, "csrf=other;");
    let mut runner = ScriptRunner::new(host);
    let overrides = vec![("user".to_string(), "mallory".to_string())];
    runner.run(&mut script, &overrides).unwrap();
    assert_eq!(runner.host().sent[0].data, "user=mallory");
    assert_eq!(runner.variables().get("csrf"), Some("other"));
}

#[test]
fn failing_assertion_is_reported_and_logged() {
    let mut script = login_script();
    let mut runner = ScriptRunner::new(MockHost::default());
    let err = runner.run(&mut script, &[]).unwrap_err();
    match err {
        ZestError::AssertionFailed { url, expression } => {
            assert_eq!(url, "http://app.test/login");
            assert_eq!(expression, "status == 200");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(runner.log().len(), 1);
    assert!(matches!(runner.log()[0].result, StepResult::Failure(_)));
}

#[test]
fn script_survives_json_and_runs_the_same() {
    let script = login_script();
    let json = script.to_json_pretty().unwrap();
    let mut reloaded = ZestScript::from_json(&json).unwrap();
    assert_eq!(reloaded, script);

    let mut runner = ScriptRunner::new(app_host());
    assert_eq!(runner.run(&mut reloaded, &[]).unwrap().as_deref(), Some("tok42"));
}

#[test]
fn client_statements_go_to_the_host() {
    let mut script = empty_script();
    script.add(Statement::client_launch("w", "firefox", "http://app.test/"));
    script.add(Statement::client_window_close("w"));
    let mut runner = ScriptRunner::new(MockHost::default());
    runner.run(&mut script, &[]).unwrap();
    assert_eq!(runner.host().client_calls, vec!["client_launch", "client_window_close"]);
    assert!(runner.host().sent.is_empty());
}
