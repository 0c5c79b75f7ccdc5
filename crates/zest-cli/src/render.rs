use serde::Serialize;

use zest_core::container::ZestContainer;
use zest_core::expression::Expression;
use zest_core::script::ZestScript;
use zest_core::statement::{AssignSource, Statement, StatementKind};
use zest_core::token_set::ZestLoopTokenSet;

/// Text renderings of a script for the `zest` subcommands.
pub struct ScriptRenderer;

/// What `zest check` reports about a valid script.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub title: String,
    #[serde(rename = "type")]
    pub script_type: Option<String>,
    pub zest_version: String,
    pub statements: usize,
    pub passive: bool,
    pub parameters: usize,
}

impl ScriptRenderer {
    /// One line per statement: global index, indentation by depth, label.
    pub fn tree(script: &ZestScript) -> String {
        let mut lines = Vec::new();
        let mut next_index = 1;
        Self::walk(script.children(), 0, &mut next_index, &mut lines);
        lines.join("\n") + "\n"
    }

    fn walk(list: &[Statement], depth: usize, next_index: &mut usize, lines: &mut Vec<String>) {
        for stmt in list {
            let indent = "  ".repeat(depth);
            let disabled = if stmt.enabled { "" } else { " [disabled]" };
            lines.push(format!("{:>4}  {}{}{}", next_index, indent, Self::label(stmt), disabled));
            *next_index += 1;

            let child_lists = stmt.child_lists();
            let is_conditional = matches!(stmt.kind, StatementKind::Conditional(_));
            for (branch, child_list) in child_lists.into_iter().enumerate() {
                if is_conditional {
                    let marker = if branch == 0 { "then" } else { "else" };
                    lines.push(format!("      {}  {}:", indent, marker));
                }
                Self::walk(child_list, depth + 1, next_index, lines);
            }
        }
    }

    pub fn label(stmt: &Statement) -> String {
        match &stmt.kind {
            StatementKind::Request(req) => format!("request {} {}", req.method, req.url),
            StatementKind::Assignment(a) => {
                format!("assign {} = {}", a.variable_name, Self::source(&a.source))
            }
            StatementKind::Conditional(c) => format!("if {}", Self::expression(&c.expression)),
            StatementKind::LoopInteger(lp) => {
                let set = lp.token_set();
                if set.step() == 1 {
                    format!("loop {} in [{}, {})", lp.variable_name(), set.start(), set.end())
                } else {
                    format!(
                        "loop {} in [{}, {}) step {}",
                        lp.variable_name(),
                        set.start(),
                        set.end(),
                        set.step()
                    )
                }
            }
            StatementKind::LoopString(lp) => format!(
                "loop {} in [{}] ({} tokens)",
                lp.variable_name(),
                lp.token_set().tokens().join(", "),
                lp.token_set().size()
            ),
            StatementKind::ActionFail { message } => format!("fail {message:?}"),
            StatementKind::ActionPrint { message } => format!("print {message:?}"),
            StatementKind::ActionSleep { milliseconds } => format!("sleep {milliseconds}ms"),
            StatementKind::ControlReturn { value } => format!("return {value:?}"),
            StatementKind::ControlLoopBreak => "break".to_string(),
            StatementKind::ControlLoopNext => "next".to_string(),
            StatementKind::Comment { comment } => format!("# {comment}"),
            StatementKind::ClientLaunch {
                window_handle,
                browser_type,
                url,
            } => format!("launch {browser_type} as {window_handle} at {url}"),
            _ => match stmt.window_handle_defined().or(stmt.variable_name()) {
                Some(name) => format!("{} {}", stmt.name(), name),
                None => stmt.name().to_string(),
            },
        }
    }

    fn source(source: &AssignSource) -> String {
        match source {
            AssignSource::Value(value) => format!("{value:?}"),
            AssignSource::RandomInteger { min, max } => format!("random [{min}, {max})"),
            AssignSource::StringDelimiters { prefix, postfix, .. } => {
                format!("between {prefix:?} and {postfix:?}")
            }
            AssignSource::RegexDelimiters { prefix, postfix, .. } => {
                format!("between /{prefix}/ and /{postfix}/")
            }
            AssignSource::Replace {
                variable_name, pattern, ..
            } => format!("{variable_name} with /{pattern}/ replaced"),
        }
    }

    fn expression(expression: &Expression) -> String {
        expression.to_string()
    }

    /// Sorted, one per line.
    pub fn names<I: IntoIterator<Item = String>>(names: I) -> Vec<String> {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        names
    }

    pub fn summary(script: &ZestScript) -> CheckSummary {
        CheckSummary {
            title: script.title.clone(),
            script_type: script.type_name().map(str::to_string),
            zest_version: script.zest_version().to_string(),
            statements: script.statement_count(),
            passive: script.is_passive(),
            parameters: script.parameters.len(),
        }
    }
}
