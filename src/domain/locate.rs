//! Resolve node ids to structural positions.
//!
//! `locate_pair` finds two nodes in a single walk; `locate_one` reports the
//! direct parent and sibling index of a single node.

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::domain::node::{Node, NodePath, Tree};

/// Where a pair search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateScope {
    /// Walk the root's children; the root itself never matches.
    Children,
    /// Walk from the root as a single-element list so it can match too.
    WithRoot,
}

/// A located node: its containing parent, its index there, and the node.
#[derive(Debug)]
pub struct Found<'a, T> {
    /// `None` only for the root, which has no parent
    pub parent: Option<&'a Node<T>>,
    pub index: usize,
    pub node: &'a Node<T>,
    pub path: NodePath,
}

impl<'a, T> Found<'a, T> {
    pub fn id(&self) -> &'a str {
        &self.node.id
    }

    pub fn parent_id(&self) -> Option<&'a str> {
        self.parent.map(|p| p.id.as_str())
    }

    /// Path of the list holding this node; `None` for the root.
    pub fn parent_path(&self) -> Option<NodePath> {
        self.path.split_last().map(|(parent, _)| parent)
    }
}

impl<T> Clone for Found<'_, T> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent,
            index: self.index,
            node: self.node,
            path: self.path.clone(),
        }
    }
}

/// Result of a pair search. Either side may be absent.
#[derive(Debug)]
pub struct LocatedPair<'a, T> {
    pub first: Option<Found<'a, T>>,
    pub second: Option<Found<'a, T>>,
}

impl<'a, T> LocatedPair<'a, T> {
    /// Both results, or `None` if either id was not found.
    pub fn both(self) -> Option<(Found<'a, T>, Found<'a, T>)> {
        Some((self.first?, self.second?))
    }
}

/// Progress of a pair search.
enum Search<'a, T> {
    Neither,
    First(Found<'a, T>),
    Second(Found<'a, T>),
    Both(Found<'a, T>, Found<'a, T>),
}

impl<'a, T> Search<'a, T> {
    /// Record a match. Earlier matches for the same slot win.
    fn record(self, found: Found<'a, T>, first: bool, second: bool) -> Self {
        match self {
            Search::Neither => match (first, second) {
                (true, true) => Search::Both(found.clone(), found),
                (true, false) => Search::First(found),
                (false, true) => Search::Second(found),
                (false, false) => Search::Neither,
            },
            Search::First(a) if second => Search::Both(a, found),
            Search::Second(b) if first => Search::Both(found, b),
            other => other,
        }
    }

    fn is_complete(&self) -> bool {
        matches!(self, Search::Both(..))
    }

    fn into_pair(self) -> LocatedPair<'a, T> {
        let (first, second) = match self {
            Search::Neither => (None, None),
            Search::First(a) => (Some(a), None),
            Search::Second(b) => (None, Some(b)),
            Search::Both(a, b) => (Some(a), Some(b)),
        };
        LocatedPair { first, second }
    }
}

/// Find the nodes with ids `first` and `second` in one pre-order walk.
///
/// The walk stops as soon as both are found. If both ids are equal, both
/// slots hold the same node.
#[instrument(level = "debug", skip(tree))]
pub fn locate_pair<'a, T>(
    tree: &'a Tree<T>,
    first: &str,
    second: &str,
    scope: LocateScope,
) -> LocatedPair<'a, T> {
    let root = tree.root();
    // Pre-order; `trail` is the path of the node being visited
    let mut trail: Vec<usize> = Vec::new();
    let mut stack: Vec<(usize, Option<&'a Node<T>>, usize, &'a Node<T>)> = match scope {
        LocateScope::WithRoot => vec![(0, None, 0, root)],
        LocateScope::Children => root
            .children
            .iter()
            .enumerate()
            .rev()
            .map(|(index, child)| (1, Some(root), index, child))
            .collect(),
    };

    let mut search = Search::Neither;
    while let Some((depth, parent, index, node)) = stack.pop() {
        if depth > 0 {
            trail.truncate(depth - 1);
            trail.push(index);
        }
        let is_first = node.id == first;
        let is_second = node.id == second;
        if is_first || is_second {
            let path = NodePath::from(trail.clone());
            trace!(id = %node.id, %path, "matched");
            let found = Found {
                parent,
                index,
                node,
                path,
            };
            search = search.record(found, is_first, is_second);
            if search.is_complete() {
                break;
            }
        }
        for (child_index, child) in node.children.iter().enumerate().rev() {
            stack.push((depth + 1, Some(node), child_index, child));
        }
    }
    search.into_pair()
}

/// Direct parent id and sibling index of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub parent_id: String,
    pub index: usize,
}

/// Report where `id` sits. `None` if it is absent or is the root.
#[instrument(level = "debug", skip(tree))]
pub fn locate_one<T>(tree: &Tree<T>, id: &str) -> Option<Placement> {
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        // Check direct children first so the parent reported is never a grandparent
        if let Some(index) = node.child_index(id) {
            return Some(Placement {
                parent_id: node.id.clone(),
                index,
            });
        }
        stack.extend(node.children.iter().rev());
    }
    None
}
