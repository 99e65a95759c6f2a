/*
Rendering lives behind a trait so callers can ask any tree-shaped value for its
display form without the domain depending on termtree.
 */
use termtree::Tree as DisplayTree;
use tracing::instrument;

use crate::domain::Tree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> DisplayTree<String>;
}

impl<T> TreeNodeConvert for Tree<T> {
    /// Builds bottom-up from a post-order walk: when a node is visited, its
    /// children are the finished subtrees one level deeper on top of the stack.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> DisplayTree<String> {
        let mut built: Vec<(usize, DisplayTree<String>)> = Vec::new();

        for (path, node) in self.iter_postorder() {
            let depth = path.depth();
            let first_child = built
                .iter()
                .rposition(|(d, _)| *d <= depth)
                .map_or(0, |i| i + 1);
            let leaves: Vec<_> = built.drain(first_child..).map(|(_, t)| t).collect();
            built.push((depth, DisplayTree::new(node.id.clone()).with_leaves(leaves)));
        }

        match built.pop() {
            Some((_, root)) => root,
            None => DisplayTree::new(self.root().id.clone()),
        }
    }
}
