mod common;

use proptest::prelude::*;

use zest_core::container::ZestContainer;
use zest_core::loops::ZestLoop;
use zest_core::script::ZestScript;
use zest_core::statement::Statement;
use zest_core::token_set::ZestLoopTokenSet;

use common::{collect_dfs, empty_script, small_conditional, small_loop};

#[derive(Debug, Clone)]
enum Op {
    AddComment,
    AddLoop,
    AddConditional,
    Remove(u16),
    Move(u16, u16),
    Nest(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddComment),
        Just(Op::AddLoop),
        Just(Op::AddConditional),
        any::<u16>().prop_map(Op::Remove),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::Move(a, b)),
        any::<u16>().prop_map(Op::Nest),
    ]
}

fn apply(script: &mut ZestScript, op: &Op, serial: &mut usize) {
    *serial += 1;
    let count = script.statement_count();
    match op {
        Op::AddComment => script.add(Statement::comment(format!("c{serial}"))),
        Op::AddLoop => script.add(small_loop(&format!("v{serial}"))),
        Op::AddConditional => script.add(small_conditional(&format!("k{serial}"))),
        Op::Remove(a) if count > 0 => {
            let index = 1 + *a as usize % count;
            assert!(script.remove(index).is_some());
        }
        Op::Move(a, b) if count > 0 => {
            let index = 1 + *a as usize % count;
            let position = *b as usize % (script.child_count() + 1);
            // out-of-range moves are rejected without changes
            let _ = script.move_statement(index, position);
        }
        Op::Nest(a) if count > 0 => {
            let index = 1 + *a as usize % count;
            if let Some(stmt) = script.statement_mut(index) {
                if let Some(list) = stmt.child_lists_mut().into_iter().next() {
                    list.push(Statement::comment(format!("n{serial}")));
                }
            }
        }
        _ => {}
    }
}

fn assert_chain_consistent(script: &ZestScript) -> Result<(), TestCaseError> {
    let mut expected = Vec::new();
    collect_dfs(script.children(), &mut expected);
    let chain: Vec<(usize, &Statement)> = script.chain().collect();

    prop_assert_eq!(chain.len(), expected.len());
    prop_assert_eq!(script.statement_count(), expected.len());
    for (pos, ((index, stmt), want)) in chain.iter().zip(expected.iter()).enumerate() {
        prop_assert_eq!(*index, pos + 1);
        prop_assert!(std::ptr::eq(*stmt, *want));
        prop_assert!(script.statement(*index).map_or(false, |s| std::ptr::eq(s, *want)));
        let next = script.next(*index);
        match expected.get(pos + 1) {
            Some(after) => prop_assert!(next.map_or(false, |s| std::ptr::eq(s, *after))),
            None => prop_assert!(next.is_none()),
        }
    }
    prop_assert!(script.statement(expected.len() + 1).is_none());
    Ok(())
}

proptest! {
    /// Any sequence of edits leaves the chain equal to a depth-first walk
    /// of the child lists, with every statement visited exactly once.
    #[test]
    fn chain_matches_document_order(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut script = empty_script();
        let mut serial = 0;
        for op in &ops {
            apply(&mut script, op, &mut serial);
            assert_chain_consistent(&script)?;
        }
    }
}

proptest! {
    /// Edits to a deep copy never reach the original.
    #[test]
    fn deep_copy_is_isolated(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let mut original = empty_script();
        original.add(small_loop("outer"));
        original.add(small_conditional("top"));
        let snapshot = original.clone();

        let mut copy = original.deep_copy();
        let mut serial = 0;
        for op in &ops {
            apply(&mut copy, op, &mut serial);
        }
        copy.title.push_str(" (copy)");
        prop_assert_eq!(&original, &snapshot);
    }
}

proptest! {
    /// `size()` increases reach the last state, and no fewer do.
    #[test]
    fn integer_loop_reaches_last_state_after_size_steps(
        start in -50i64..50,
        end in -50i64..50,
        step in prop_oneof![-7i64..=-1, 1i64..=7],
    ) {
        let mut lp = ZestLoop::integer_stepped("i", start, end, step).unwrap();
        let expected = if step > 0 {
            (start..end).step_by(step as usize).count()
        } else {
            (end + 1..=start).rev().step_by((-step) as usize).count()
        };
        prop_assert_eq!(lp.size(), expected);
        prop_assert_eq!(lp.token_set().size(), expected);
        for _ in 0..expected {
            prop_assert!(!lp.is_last_state());
            lp.increase();
        }
        prop_assert!(lp.is_last_state());
    }

    /// `to_last_state()` works from any cursor position.
    #[test]
    fn to_last_state_from_any_position(end in 0i64..30, steps in 0usize..40) {
        let mut lp = ZestLoop::integer("i", 0, end);
        for _ in 0..steps {
            lp.increase();
        }
        lp.to_last_state();
        prop_assert!(lp.is_last_state());
    }
}
