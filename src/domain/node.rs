//! Tree model: owned nodes, the rooted tree and structural paths.
//!
//! Nodes own their children directly. Every walk over the tree uses an
//! explicit stack so user-built trees of any depth never exhaust the call
//! stack.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// A tree node: opaque id, caller-defined payload and ordered children.
///
/// `Clone`, `PartialEq` and `Drop` walk the subtree with an explicit stack.
#[derive(Debug, Eq, Serialize, Deserialize)]
pub struct Node<T> {
    /// Unique identifier within the tree
    pub id: String,
    /// Caller payload, never inspected by the engine
    pub data: T,
    /// Ordered children; order is display order
    #[serde(default = "Vec::new")]
    pub children: Vec<Node<T>>,
}

impl<T> Node<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node<T>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the direct child with the given id.
    pub fn child_index(&self, id: &str) -> Option<usize> {
        self.children.iter().position(|c| c.id == id)
    }
}

impl<T: Clone> Clone for Node<T> {
    fn clone(&self) -> Self {
        // Finished copies wait here until their parent is rebuilt
        let mut done: Vec<Node<T>> = Vec::new();
        let mut stack: Vec<(&Node<T>, bool)> = self.children.iter().rev().map(|c| (c, false)).collect();
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let children = done.split_off(done.len() - node.children.len());
                done.push(Node {
                    id: node.id.clone(),
                    data: node.data.clone(),
                    children,
                });
            } else {
                stack.push((node, true));
                stack.extend(node.children.iter().rev().map(|c| (c, false)));
            }
        }
        Node {
            id: self.id.clone(),
            data: self.data.clone(),
            children: done,
        }
    }
}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.id != b.id || a.data != b.data || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        // Flatten so each node drops with no children left
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Position of a node as child indices from the root.
///
/// The root has the empty path. `[1, 0]` is the first child of the root's
/// second child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent and this node's index in it; `None` for the root.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (&last, rest) = self.0.split_last()?;
        Some((Self(rest.to_vec()), last))
    }

    /// True if `other` is this node or lies in its subtree.
    pub fn contains(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Where this path points after the node at `removed` was taken out.
    ///
    /// Paths routed through a later sibling of the removed node shift one
    /// slot left. Paths inside the removed subtree have no meaning
    /// afterwards; callers must rule them out first.
    pub fn after_removal(&self, removed: &NodePath) -> NodePath {
        let Some((list, index)) = removed.split_last() else {
            return self.clone();
        };
        let depth = list.depth();
        if self.0.len() > depth && self.0.starts_with(list.indices()) && self.0[depth] > index {
            let mut shifted = self.0.clone();
            shifted[depth] -= 1;
            return Self(shifted);
        }
        self.clone()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

/// A rooted, ordered tree with unique node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<T> {
    root: Node<T>,
}

impl<T> Tree<T> {
    /// Build a tree, rejecting duplicate ids.
    #[instrument(level = "debug", skip_all, fields(root = %root.id))]
    pub fn new(root: Node<T>) -> DomainResult<Self> {
        {
            let mut seen = HashSet::new();
            let mut stack = vec![&root];
            while let Some(node) = stack.pop() {
                if !seen.insert(node.id.as_str()) {
                    return Err(DomainError::DuplicateId(node.id.clone()));
                }
                stack.extend(node.children.iter().rev());
            }
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    pub fn into_root(self) -> Node<T> {
        self.root
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Number of levels; a lone root has depth 1.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(&self.root, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: &str) -> Option<&Node<T>> {
        self.nodes().find(|node| node.id == id)
    }

    /// All ids in pre-order.
    pub fn ids(&self) -> Vec<&str> {
        self.nodes().map(|node| node.id.as_str()).collect()
    }

    /// Ids of nodes without children, in pre-order.
    pub fn leaf_ids(&self) -> Vec<&str> {
        self.nodes()
            .filter(|node| node.is_leaf())
            .map(|node| node.id.as_str())
            .collect()
    }

    /// Compact one-line shape of the tree, e.g. `root[a[b, c], d]`.
    pub fn outline(&self) -> String {
        enum Step<'a, T> {
            Enter(&'a Node<T>, bool),
            Leave,
        }

        let mut out = String::new();
        let mut stack = vec![Step::Enter(&self.root, true)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Leave => out.push(']'),
                Step::Enter(node, first) => {
                    if !first {
                        out.push_str(", ");
                    }
                    out.push_str(&node.id);
                    if !node.children.is_empty() {
                        out.push('[');
                        stack.push(Step::Leave);
                        for (index, child) in node.children.iter().enumerate().rev() {
                            stack.push(Step::Enter(child, index == 0));
                        }
                    }
                }
            }
        }
        out
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&Node<T>> {
        let mut node = &self.root;
        for &index in path.indices() {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut Node<T>> {
        let mut node = &mut self.root;
        for &index in path.indices() {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Detach the child at `index` of the node at `parent`.
    pub(crate) fn remove_child(&mut self, parent: &NodePath, index: usize) -> DomainResult<Node<T>> {
        let node = self
            .node_at_mut(parent)
            .ok_or_else(|| DomainError::InvalidPath(parent.to_string()))?;
        if index >= node.children.len() {
            return Err(DomainError::InvalidPath(parent.child(index).to_string()));
        }
        Ok(node.children.remove(index))
    }

    /// Insert `child` under the node at `parent`, clamping `index` to the
    /// child count. Returns the index actually used.
    pub(crate) fn insert_child(
        &mut self,
        parent: &NodePath,
        index: usize,
        child: Node<T>,
    ) -> DomainResult<usize> {
        let node = self
            .node_at_mut(parent)
            .ok_or_else(|| DomainError::InvalidPath(parent.to_string()))?;
        let index = index.min(node.children.len());
        node.children.insert(index, child);
        Ok(index)
    }

    /// Pre-order walk over the nodes alone, without building paths.
    fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }
}

impl<T> TryFrom<Node<T>> for Tree<T> {
    type Error = DomainError;

    fn try_from(root: Node<T>) -> Result<Self, Self::Error> {
        Tree::new(root)
    }
}

impl<T: Serialize> Serialize for Tree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tree<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let root = Node::<T>::deserialize(deserializer)?;
        Tree::new(root).map_err(serde::de::Error::custom)
    }
}

/// Pre-order walk yielding each node with its path.
pub struct TreeIterator<'a, T> {
    stack: Vec<(NodePath, &'a Node<T>)>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        Self {
            stack: vec![(NodePath::root(), &tree.root)],
        }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (NodePath, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for (index, child) in node.children.iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, node))
    }
}

/// Post-order walk: children before their parent.
pub struct PostOrderIterator<'a, T> {
    stack: Vec<(NodePath, &'a Node<T>, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        Self {
            stack: vec![(NodePath::root(), &tree.root, false)],
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodePath, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((path, node, visited)) = self.stack.pop() {
            if visited {
                return Some((path, node));
            }
            let children: Vec<_> = node
                .children
                .iter()
                .enumerate()
                .rev()
                .map(|(index, child)| (path.child(index), child, false))
                .collect();
            self.stack.push((path, node, true));
            self.stack.extend(children);
        }
        None
    }
}
