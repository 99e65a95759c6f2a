//! Structural properties of move and nest over generated trees.

use std::borrow::Cow;

use proptest::prelude::*;
use proptest::sample::Index;

use sortree::{locate_one, move_node, nest_node, Node, NodePath, Tree};

/// Random tree of up to 25 nodes `n0..nK`, `n0` being the root. Each node
/// picks its parent among the nodes created before it.
fn arb_tree() -> impl Strategy<Value = Tree<()>> {
    prop::collection::vec(any::<Index>(), 0..24).prop_map(|choices| {
        let parent_of: Vec<usize> = choices.iter().enumerate().map(|(k, ix)| ix.index(k + 1)).collect();
        let mut nodes: Vec<Node<()>> = (0..=parent_of.len()).map(|i| Node::new(format!("n{i}"), ())).collect();
        // Parents always have smaller numbers, so children are complete when attached
        for i in (1..nodes.len()).rev() {
            if let Some(node) = nodes.pop() {
                nodes[parent_of[i - 1]].children.insert(0, node);
            }
        }
        Tree::new(nodes.pop().unwrap()).unwrap()
    })
}

fn pick<'t>(tree: &'t Tree<()>, ix: &Index) -> &'t str {
    let ids = tree.ids();
    ids[ix.index(ids.len())]
}

fn path_of(tree: &Tree<()>, id: &str) -> NodePath {
    tree.iter()
        .find(|(_, node)| node.id == id)
        .map(|(path, _)| path)
        .unwrap()
}

fn sorted_ids(tree: &Tree<()>) -> Vec<String> {
    let mut ids: Vec<String> = tree.ids().into_iter().map(str::to_string).collect();
    ids.sort();
    ids
}

proptest! {
    /// Moving or nesting never adds, drops or duplicates a node.
    #[test]
    fn relocation_preserves_node_set(tree in arb_tree(), d in any::<Index>(), h in any::<Index>(), i in 0usize..4) {
        let (dragged, hover) = (pick(&tree, &d), pick(&tree, &h));
        let before = sorted_ids(&tree);

        let moved = move_node(&tree, dragged, hover);
        let nested = nest_node(&tree, dragged, hover, Some(i));

        for result in [&*moved, &*nested] {
            prop_assert_eq!(result.node_count(), tree.node_count());
            prop_assert_eq!(sorted_ids(result), before.clone());
            prop_assert!(Tree::new(result.root().clone()).is_ok());
        }
    }

    /// The caller's tree is never modified.
    #[test]
    fn relocation_leaves_input_untouched(tree in arb_tree(), d in any::<Index>(), h in any::<Index>()) {
        let snapshot = tree.clone();
        let (dragged, hover) = (pick(&tree, &d), pick(&tree, &h));

        let _ = move_node(&tree, dragged, hover);
        let _ = nest_node(&tree, dragged, hover, None);

        prop_assert_eq!(tree, snapshot);
    }

    #[test]
    fn unknown_id_is_a_no_op(tree in arb_tree(), h in any::<Index>()) {
        let hover = pick(&tree, &h);

        prop_assert!(matches!(move_node(&tree, "ghost", hover), Cow::Borrowed(_)));
        prop_assert!(matches!(move_node(&tree, hover, "ghost"), Cow::Borrowed(_)));
        prop_assert!(matches!(nest_node(&tree, "ghost", hover, None), Cow::Borrowed(_)));
        prop_assert!(matches!(nest_node(&tree, hover, "ghost", None), Cow::Borrowed(_)));
    }

    #[test]
    fn self_relocation_is_a_no_op(tree in arb_tree(), d in any::<Index>()) {
        let id = pick(&tree, &d);

        prop_assert!(matches!(move_node(&tree, id, id), Cow::Borrowed(_)));
        prop_assert!(matches!(nest_node(&tree, id, id, None), Cow::Borrowed(_)));
    }

    /// A node can never end up inside its own subtree.
    #[test]
    fn descendant_target_is_refused(tree in arb_tree(), d in any::<Index>(), h in any::<Index>()) {
        let dragged = pick(&tree, &d);
        let dragged_path = path_of(&tree, dragged);
        let subtree: Vec<&str> = tree
            .iter()
            .filter(|(path, _)| dragged_path.contains(path))
            .map(|(_, node)| node.id.as_str())
            .collect();
        let hover = subtree[h.index(subtree.len())];

        prop_assert!(matches!(move_node(&tree, dragged, hover), Cow::Borrowed(_)));
        prop_assert!(matches!(nest_node(&tree, dragged, hover, None), Cow::Borrowed(_)));
    }

    /// Every non-root node is found again at the placement reported for it.
    #[test]
    fn locate_round_trips_for_every_node(tree in arb_tree()) {
        let root_id = tree.root().id.as_str();
        prop_assert!(locate_one(&tree, root_id).is_none());

        for id in tree.ids().into_iter().filter(|id| *id != root_id) {
            let placement = locate_one(&tree, id).unwrap();
            let parent = tree.find(&placement.parent_id).unwrap();
            prop_assert_eq!(parent.children[placement.index].id.as_str(), id);
            prop_assert_eq!(path_of(&tree, id).split_last().map(|(_, index)| index), Some(placement.index));
        }
    }

    /// After a nest, the placement reports the new parent and the clamped index.
    #[test]
    fn nest_round_trips_through_locate(tree in arb_tree(), d in any::<Index>(), h in any::<Index>(), i in 0usize..6) {
        let (dragged, hover) = (pick(&tree, &d), pick(&tree, &h));
        let nested = nest_node(&tree, dragged, hover, Some(i));

        if let Cow::Owned(result) = nested {
            let siblings = result.find(hover).map(|n| n.children.len()).unwrap();
            let placement = locate_one(&result, dragged).unwrap();
            prop_assert_eq!(placement.parent_id.as_str(), hover);
            prop_assert_eq!(placement.index, i.min(siblings - 1));
        }
    }

    #[test]
    fn renesting_at_same_index_is_idempotent(tree in arb_tree(), d in any::<Index>(), h in any::<Index>(), i in 0usize..4) {
        let (dragged, hover) = (pick(&tree, &d), pick(&tree, &h));

        let once = nest_node(&tree, dragged, hover, Some(i)).into_owned();
        let twice = nest_node(&once, dragged, hover, Some(i)).into_owned();

        prop_assert_eq!(once, twice);
    }

    /// A moved node always joins the list its hover target was in.
    #[test]
    fn move_lands_in_hovered_parent_list(tree in arb_tree(), d in any::<Index>(), h in any::<Index>()) {
        let (dragged, hover) = (pick(&tree, &d), pick(&tree, &h));
        let hover_parent = locate_one(&tree, hover).map(|p| p.parent_id);

        if let Cow::Owned(result) = move_node(&tree, dragged, hover) {
            let placement = locate_one(&result, dragged).unwrap();
            prop_assert_eq!(Some(placement.parent_id), hover_parent);
        }
    }
}
