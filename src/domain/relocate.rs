//! Move and nest operators.
//!
//! Both operators locate the dragged and hovered nodes on the caller's tree,
//! decide on a [`Splice`], notify the observer and then apply the splice to a
//! private copy inside the envelope. Unresolvable or self-referencing
//! requests leave the caller's tree as it was.

use std::borrow::Cow;

use tracing::{debug, instrument};

use crate::domain::envelope::settle;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::locate::{locate_pair, Found, LocateScope};
use crate::domain::node::{NodePath, Tree};
use crate::domain::observer::{NoopObserver, RelocationObserver};

/// Detach the node at `from` and attach it under `to_parent` at `index`.
///
/// `to_parent` is given in terms of the tree before the removal; `apply`
/// re-targets it. `index` is used as is, clamped to the child count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub from: NodePath,
    pub to_parent: NodePath,
    pub index: usize,
}

impl Splice {
    pub fn apply<T>(&self, tree: &mut Tree<T>) -> DomainResult<()> {
        let (from_parent, from_index) = self
            .from
            .split_last()
            .ok_or_else(|| DomainError::InvalidPath(self.from.to_string()))?;
        let node = tree.remove_child(&from_parent, from_index)?;
        let to_parent = self.to_parent.after_removal(&self.from);
        let used = tree.insert_child(&to_parent, self.index, node)?;
        debug!(from = %self.from, to = %to_parent, index = used, "spliced");
        Ok(())
    }
}

/// Runs move and nest requests, reporting them to an observer.
#[derive(Debug, Default)]
pub struct Relocator<O = NoopObserver> {
    observer: O,
}

impl Relocator<NoopObserver> {
    pub fn new() -> Self {
        Self {
            observer: NoopObserver,
        }
    }
}

impl<O> Relocator<O> {
    pub fn with_observer(observer: O) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Move `dragged` next to `hover`, or return the original tree.
    pub fn move_node<'t, T: Clone>(
        &mut self,
        tree: &'t Tree<T>,
        dragged: &str,
        hover: &str,
    ) -> Cow<'t, Tree<T>>
    where
        O: RelocationObserver<T>,
    {
        settle(tree, "move", self.try_move(tree, dragged, hover))
    }

    /// Nest `dragged` under `hover` at `index` (default 0), or return the
    /// original tree.
    pub fn nest_node<'t, T: Clone>(
        &mut self,
        tree: &'t Tree<T>,
        dragged: &str,
        hover: &str,
        index: Option<usize>,
    ) -> Cow<'t, Tree<T>>
    where
        O: RelocationObserver<T>,
    {
        settle(tree, "nest", self.try_nest(tree, dragged, hover, index))
    }

    /// Move, reporting why nothing happened instead of returning the original.
    ///
    /// If `hover` is the current parent of `dragged`, the dragged node is
    /// lifted out and placed directly before its former parent. Otherwise it
    /// is taken out of its list and inserted into the hovered node's list at
    /// the hovered node's index.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn try_move<T: Clone>(
        &mut self,
        tree: &Tree<T>,
        dragged: &str,
        hover: &str,
    ) -> DomainResult<Tree<T>>
    where
        O: RelocationObserver<T>,
    {
        let splice = self.plan_move(tree, dragged, hover)?;
        tree.edit(|copy| splice.apply(copy))
    }

    /// Nest, reporting why nothing happened instead of returning the original.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn try_nest<T: Clone>(
        &mut self,
        tree: &Tree<T>,
        dragged: &str,
        hover: &str,
        index: Option<usize>,
    ) -> DomainResult<Tree<T>>
    where
        O: RelocationObserver<T>,
    {
        let splice = self.plan_nest(tree, dragged, hover, index.unwrap_or(0))?;
        tree.edit(|copy| splice.apply(copy))
    }

    fn plan_move<T>(&mut self, tree: &Tree<T>, dragged: &str, hover: &str) -> DomainResult<Splice>
    where
        O: RelocationObserver<T>,
    {
        let pair = locate_pair(tree, dragged, hover, LocateScope::Children);
        let (d, h) = resolve(pair.first, pair.second, dragged, hover)?;
        reject_self_reference(&d, &h)?;

        let to_parent = h
            .parent_path()
            .ok_or_else(|| DomainError::InvalidPath(h.path.to_string()))?;

        // Dragging a child out over its own parent is not reported
        if d.parent_path().as_ref() == Some(&h.path) {
            debug!(dragged, parent = hover, "lifting child above its parent");
        } else {
            self.observer.on_moved(&d, &h);
        }
        Ok(Splice {
            from: d.path,
            to_parent,
            index: h.index,
        })
    }

    fn plan_nest<T>(
        &mut self,
        tree: &Tree<T>,
        dragged: &str,
        hover: &str,
        index: usize,
    ) -> DomainResult<Splice>
    where
        O: RelocationObserver<T>,
    {
        let pair = locate_pair(tree, dragged, hover, LocateScope::WithRoot);
        let (d, h) = resolve(pair.first, pair.second, dragged, hover)?;
        // The root's path contains every other path, so it can never be nested
        reject_self_reference(&d, &h)?;

        self.observer.on_nested(&d, &h);
        Ok(Splice {
            from: d.path,
            to_parent: h.path,
            index,
        })
    }
}

/// Free-standing move without an observer.
pub fn move_node<'t, T: Clone>(tree: &'t Tree<T>, dragged: &str, hover: &str) -> Cow<'t, Tree<T>> {
    Relocator::new().move_node(tree, dragged, hover)
}

/// Free-standing nest without an observer.
pub fn nest_node<'t, T: Clone>(
    tree: &'t Tree<T>,
    dragged: &str,
    hover: &str,
    index: Option<usize>,
) -> Cow<'t, Tree<T>> {
    Relocator::new().nest_node(tree, dragged, hover, index)
}

fn resolve<'a, T>(
    first: Option<Found<'a, T>>,
    second: Option<Found<'a, T>>,
    dragged: &str,
    hover: &str,
) -> DomainResult<(Found<'a, T>, Found<'a, T>)> {
    let d = first.ok_or_else(|| DomainError::NotFound(dragged.to_string()))?;
    let h = second.ok_or_else(|| DomainError::NotFound(hover.to_string()))?;
    Ok((d, h))
}

/// The hovered node must lie outside the dragged node's subtree.
fn reject_self_reference<T>(d: &Found<'_, T>, h: &Found<'_, T>) -> DomainResult<()> {
    if d.path.contains(&h.path) {
        return Err(DomainError::SelfReference {
            dragged: d.id().to_string(),
            target: h.id().to_string(),
        });
    }
    Ok(())
}
