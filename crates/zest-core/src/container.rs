//! Containers and the derived statement order.
//!
//! A script is a tree: the script holds a list of statements, and loops and
//! conditional branches hold lists of their own. The tree is the only
//! storage; a statement's global index is its position in a depth-first,
//! pre-order walk of the script (the script itself is index 0, its first
//! statement is 1). Because nothing is cached, indexes, `next` and `prev`
//! are always consistent with the tree, whatever edits were made.

use serde::{Deserialize, Serialize};

use crate::error::ZestError;
use crate::loops::ZestLoop;
use crate::statement::{list_size, Statement};
use crate::token_set::ZestLoopTokenSet;

/// Anything that owns an ordered list of child statements.
pub trait ZestContainer {
    fn children(&self) -> &[Statement];

    fn children_mut(&mut self) -> &mut Vec<Statement>;

    fn child_count(&self) -> usize {
        self.children().len()
    }

    fn child(&self, position: usize) -> Option<&Statement> {
        self.children().get(position)
    }

    /// The sibling immediately before `position`.
    fn child_before(&self, position: usize) -> Option<&Statement> {
        position.checked_sub(1).and_then(|p| self.child(p))
    }

    fn last_child(&self) -> Option<&Statement> {
        self.children().last()
    }

    /// Append a statement.
    fn add(&mut self, stmt: Statement) {
        self.children_mut().push(stmt);
    }

    /// Insert a statement before `position`; `position == len` appends.
    fn insert(&mut self, position: usize, stmt: Statement) -> Result<(), ZestError> {
        let len = self.child_count();
        if position > len {
            return Err(ZestError::PositionOutOfRange { position, len });
        }
        self.children_mut().insert(position, stmt);
        Ok(())
    }

    /// Remove and return the child at `position`.
    fn remove_child(&mut self, position: usize) -> Option<Statement> {
        if position < self.child_count() {
            Some(self.children_mut().remove(position))
        } else {
            None
        }
    }

    /// Move a child to a new position, counted after its removal.
    fn move_child(&mut self, from: usize, to: usize) -> Result<(), ZestError> {
        let len = self.child_count();
        if from >= len {
            return Err(ZestError::PositionOutOfRange { position: from, len });
        }
        if to >= len {
            return Err(ZestError::PositionOutOfRange { position: to, len: len - 1 });
        }
        let stmt = self.children_mut().remove(from);
        self.children_mut().insert(to, stmt);
        Ok(())
    }

    /// Every statement below this container in document order, numbered
    /// from 1.
    fn descendants(&self) -> Chain<'_> {
        Chain::new(self.children(), 1)
    }

    /// Total number of statements below this container.
    fn descendant_count(&self) -> usize {
        list_size(self.children())
    }
}

/// One branch of a conditional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branch(Vec<Statement>);

impl Branch {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self(statements)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ZestContainer for Branch {
    fn children(&self) -> &[Statement] {
        &self.0
    }

    fn children_mut(&mut self) -> &mut Vec<Statement> {
        &mut self.0
    }
}

impl<S: ZestLoopTokenSet> ZestContainer for ZestLoop<S> {
    fn children(&self) -> &[Statement] {
        &self.statements
    }

    fn children_mut(&mut self) -> &mut Vec<Statement> {
        &mut self.statements
    }
}

/// Depth-first iterator over a statement list and everything nested in it,
/// yielding `(index, statement)` pairs.
pub struct Chain<'a> {
    stack: Vec<std::slice::Iter<'a, Statement>>,
    next_index: usize,
}

impl<'a> Chain<'a> {
    pub fn new(list: &'a [Statement], first_index: usize) -> Self {
        Self {
            stack: vec![list.iter()],
            next_index: first_index,
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = (usize, &'a Statement);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(stmt) => {
                    // last list pushed is visited first
                    for list in stmt.child_lists().into_iter().rev() {
                        self.stack.push(list.iter());
                    }
                    let index = self.next_index;
                    self.next_index += 1;
                    return Some((index, stmt));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// The statement with global index `target`, where `list[0]` has index `first`.
pub fn find_in(list: &[Statement], first: usize, target: usize) -> Option<&Statement> {
    let mut start = first;
    for stmt in list {
        if target == start {
            return Some(stmt);
        }
        let size = stmt.subtree_size();
        if target < start + size {
            let mut child_start = start + 1;
            for child_list in stmt.child_lists() {
                let child_size = list_size(child_list);
                if target < child_start + child_size {
                    return find_in(child_list, child_start, target);
                }
                child_start += child_size;
            }
            return None;
        }
        start += size;
    }
    None
}

/// The list holding global index `target` and the position inside it.
pub(crate) fn locate_mut(
    list: &mut Vec<Statement>,
    first: usize,
    target: usize,
) -> Option<(&mut Vec<Statement>, usize)> {
    let mut start = first;
    let mut hit = None;
    for (pos, stmt) in list.iter().enumerate() {
        let size = stmt.subtree_size();
        if target < start + size {
            hit = Some((pos, start));
            break;
        }
        start += size;
    }
    let (pos, start) = hit?;
    if target == start {
        return Some((list, pos));
    }
    let mut child_start = start + 1;
    for child_list in list[pos].child_lists_mut() {
        let child_size = list_size(child_list);
        if target < child_start + child_size {
            return locate_mut(child_list, child_start, target);
        }
        child_start += child_size;
    }
    None
}
