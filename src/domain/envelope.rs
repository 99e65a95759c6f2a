//! Copy-on-write envelope around structural edits.
//!
//! An edit runs against a private deep copy. The copy is handed back only if
//! the edit succeeded; otherwise it is dropped and the caller keeps the
//! original. A half-applied edit is never observable.

use std::borrow::Cow;

use tracing::debug;

use crate::domain::error::DomainResult;
use crate::domain::node::Tree;

impl<T: Clone> Tree<T> {
    /// Run `f` on a deep copy and return the copy if `f` succeeded.
    pub fn edit<F>(&self, f: F) -> DomainResult<Tree<T>>
    where
        F: FnOnce(&mut Tree<T>) -> DomainResult<()>,
    {
        let mut copy = self.clone();
        f(&mut copy)?;
        debug_assert_eq!(copy.node_count(), self.node_count());
        Ok(copy)
    }
}

/// Collapse an edit outcome into the no-op contract: the new tree on
/// success, the untouched original otherwise.
pub fn settle<'t, T: Clone>(
    original: &'t Tree<T>,
    operation: &str,
    outcome: DomainResult<Tree<T>>,
) -> Cow<'t, Tree<T>> {
    match outcome {
        Ok(tree) => Cow::Owned(tree),
        Err(e) => {
            debug!(operation, error = %e, "relocation skipped");
            Cow::Borrowed(original)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::node::{Node, NodePath};

    fn sample() -> Tree<()> {
        Tree::new(Node::new("root", ()).with_children([Node::new("a", ()), Node::new("b", ())])).unwrap()
    }

    #[test]
    fn given_failing_edit_when_applied_then_original_untouched() {
        let tree = sample();
        let result = tree.edit(|copy| {
            copy.remove_child(&NodePath::root(), 0)?;
            // Second step fails after the first already changed the copy
            copy.remove_child(&NodePath::root(), 7)?;
            Ok(())
        });
        assert!(matches!(result, Err(DomainError::InvalidPath(_))));
        assert_eq!(tree.ids(), vec!["root", "a", "b"]);
    }

    #[test]
    fn given_error_outcome_when_settling_then_borrows_original() {
        let tree = sample();
        let settled = settle(&tree, "test", Err(DomainError::NotFound("x".into())));
        assert!(matches!(settled, Cow::Borrowed(_)));
        assert!(std::ptr::eq(settled.as_ref(), &tree));
    }
}
