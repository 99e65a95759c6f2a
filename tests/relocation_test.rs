//! Integration tests for the move and nest operators through the public API.

use std::borrow::Cow;

use rstest::rstest;

use sortree::domain::{EventLog, RelocationKind};
use sortree::util::testing::{init_test_setup, tree_from_outline};
use sortree::{
    locate_one, locate_pair, move_node, nest_node, DomainError, LocateScope, Node, Placement, Relocator, Tree,
};

fn outline_after_move(before: &str, dragged: &str, hover: &str) -> String {
    let tree = tree_from_outline(before).unwrap();
    move_node(&tree, dragged, hover).outline()
}

fn outline_after_nest(before: &str, dragged: &str, hover: &str, index: Option<usize>) -> String {
    let tree = tree_from_outline(before).unwrap();
    nest_node(&tree, dragged, hover, index).outline()
}

// ============================================================
// Move
// ============================================================

#[rstest]
#[case::cross_sibling("root[a, b, c]", "c", "a", "root[c, a, b]")]
#[case::forward_lands_after("root[a, b, c]", "a", "c", "root[b, c, a]")]
#[case::same_parent_lifts_child("root[a[b, c]]", "b", "a", "root[b, a[c]]")]
#[case::into_other_list("root[a[x, y], b[z]]", "z", "y", "root[a[x, z, y], b]")]
#[case::grandparent_hover("root[a[b[c]], d]", "c", "a", "root[c, a[b], d]")]
#[case::subtree_travels("root[a[b, c], d]", "a", "d", "root[d, a[b, c]]")]
fn given_tree_when_moving_then_reorders(
    #[case] before: &str,
    #[case] dragged: &str,
    #[case] hover: &str,
    #[case] expected: &str,
) {
    init_test_setup();
    assert_eq!(outline_after_move(before, dragged, hover), expected);
}

#[rstest]
#[case::unknown_dragged("root[a, b]", "ghost", "a")]
#[case::unknown_hover("root[a, b]", "a", "ghost")]
#[case::onto_itself("root[a, b]", "a", "a")]
#[case::into_own_child("root[a[b], c]", "a", "b")]
#[case::into_own_grandchild("root[a[b[c]], d]", "a", "c")]
#[case::root_dragged("root[a, b]", "root", "a")]
#[case::root_hovered("root[a, b]", "a", "root")]
fn given_refused_move_when_moving_then_returns_original(
    #[case] before: &str,
    #[case] dragged: &str,
    #[case] hover: &str,
) {
    let tree = tree_from_outline(before).unwrap();

    let result = move_node(&tree, dragged, hover);

    assert!(matches!(result, Cow::Borrowed(_)));
    assert_eq!(result.outline(), before);
}

#[test]
fn given_successful_move_when_done_then_input_tree_is_untouched() {
    let tree = tree_from_outline("root[a, b, c]").unwrap();
    let snapshot = tree.clone();

    let moved = move_node(&tree, "c", "a");

    assert!(matches!(moved, Cow::Owned(_)));
    assert_eq!(tree, snapshot);
}

#[test]
fn given_descendant_target_when_trying_move_then_reports_self_reference() {
    let tree = tree_from_outline("root[a[b]]").unwrap();

    let err = Relocator::new().try_move(&tree, "a", "b").unwrap_err();

    assert_eq!(
        err,
        DomainError::SelfReference {
            dragged: "a".into(),
            target: "b".into()
        }
    );
}

#[test]
fn given_unknown_id_when_trying_move_then_reports_not_found() {
    let tree = tree_from_outline("root[a]").unwrap();
    let err = Relocator::new().try_move(&tree, "a", "ghost").unwrap_err();
    assert_eq!(err, DomainError::NotFound("ghost".into()));
}

// ============================================================
// Nest
// ============================================================

#[rstest]
#[case::default_index("root[a, b]", "b", "a", None, "root[a[b]]")]
#[case::front_of_children("root[a[x, y], b]", "b", "a", None, "root[a[b, x, y]]")]
#[case::explicit_index("root[a[x, y], b]", "b", "a", Some(1), "root[a[x, b, y]]")]
#[case::clamped_index("root[a[x], b]", "b", "a", Some(9), "root[a[x, b]]")]
#[case::under_root("root[a[b]]", "b", "root", Some(1), "root[a, b]")]
#[case::into_leaf_of_other_branch("root[a[b], c]", "c", "b", None, "root[a[b[c]]]")]
fn given_tree_when_nesting_then_reparents(
    #[case] before: &str,
    #[case] dragged: &str,
    #[case] hover: &str,
    #[case] index: Option<usize>,
    #[case] expected: &str,
) {
    assert_eq!(outline_after_nest(before, dragged, hover, index), expected);
}

#[rstest]
#[case::unknown("root[a, b]", "ghost", "a")]
#[case::onto_itself("root[a, b]", "b", "b")]
#[case::under_own_child("root[a[b]]", "a", "b")]
#[case::under_own_grandchild("root[a[b[c]]]", "a", "c")]
#[case::root_dragged("root[a]", "root", "a")]
fn given_refused_nest_when_nesting_then_returns_original(
    #[case] before: &str,
    #[case] dragged: &str,
    #[case] hover: &str,
) {
    let tree = tree_from_outline(before).unwrap();

    let result = nest_node(&tree, dragged, hover, None);

    assert!(matches!(result, Cow::Borrowed(_)));
    assert_eq!(result.outline(), before);
}

#[test]
fn given_nested_node_when_nesting_again_then_structure_is_stable() {
    let tree = tree_from_outline("root[a, b]").unwrap();

    let once = nest_node(&tree, "b", "a", Some(0)).into_owned();
    let twice = nest_node(&once, "b", "a", Some(0)).into_owned();

    assert_eq!(once, twice);
    assert_eq!(twice.outline(), "root[a[b]]");
}

// ============================================================
// Observers
// ============================================================

#[test]
fn given_event_log_when_relocating_then_records_positions_before_splice() {
    let tree = tree_from_outline("root[a, b, c]").unwrap();
    let mut relocator = Relocator::with_observer(EventLog::new());

    let moved = relocator.move_node(&tree, "c", "a").into_owned();
    let _ = relocator.nest_node(&moved, "b", "c", None);

    let events = relocator.into_observer().take();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, RelocationKind::Moved);
    assert_eq!(events[0].dragged.id, "c");
    assert_eq!(events[0].dragged.index, 2);
    assert_eq!(events[0].hovered.id, "a");
    assert_eq!(events[0].hovered.parent_id.as_deref(), Some("root"));
    assert_eq!(events[1].kind, RelocationKind::Nested);
    assert_eq!(events[1].hovered.id, "c");
    assert_eq!(events[1].hovered.index, 0);
}

#[test]
fn given_refused_request_when_relocating_then_observer_is_silent() {
    let tree = tree_from_outline("root[a[b]]").unwrap();
    let mut relocator = Relocator::with_observer(EventLog::new());

    let _ = relocator.move_node(&tree, "a", "b");
    let _ = relocator.nest_node(&tree, "ghost", "a", None);
    // Lifting a child over its own parent is not reported
    let _ = relocator.move_node(&tree, "b", "a");

    assert!(relocator.observer().events().is_empty());
}

// ============================================================
// Locators
// ============================================================

#[test]
fn given_relocated_node_when_locating_then_placement_matches() {
    let tree = tree_from_outline("root[a[x, y], b]").unwrap();

    let nested = nest_node(&tree, "b", "a", Some(1));

    assert_eq!(
        locate_one(&nested, "b"),
        Some(Placement {
            parent_id: "a".into(),
            index: 1
        })
    );
}

#[test]
fn given_root_scope_when_locating_pair_then_root_has_no_parent() {
    let tree = tree_from_outline("root[a[b]]").unwrap();

    let with_root = locate_pair(&tree, "root", "b", LocateScope::WithRoot);
    let children = locate_pair(&tree, "root", "b", LocateScope::Children);

    let root = with_root.first.unwrap();
    assert_eq!(root.parent_id(), None);
    assert_eq!(with_root.second.unwrap().parent_id(), Some("a"));
    assert!(children.first.is_none());
    assert!(children.second.is_some());
}

// ============================================================
// Deep trees
// ============================================================

const CHAIN_DEPTH: usize = 200_000;

/// `root[n1[n2[...]], x]`
fn deep_chain() -> Tree<()> {
    let mut chain = Node::new(format!("n{CHAIN_DEPTH}"), ());
    for i in (1..CHAIN_DEPTH).rev() {
        chain = Node::new(format!("n{i}"), ()).with_children([chain]);
    }
    Tree::new(Node::new("root", ()).with_children([chain, Node::new("x", ())])).unwrap()
}

#[test]
fn given_deep_chain_when_relocating_then_completes() {
    // Arrange
    let tree = deep_chain();
    let deepest = format!("n{CHAIN_DEPTH}");
    assert_eq!(tree.depth(), CHAIN_DEPTH + 1);

    // Act
    let moved = move_node(&tree, "x", "n1");
    let nested = nest_node(&*moved, "x", &deepest, None);

    // Assert
    assert_eq!(moved.root().children[0].id, "x");
    assert_eq!(
        locate_one(&*nested, "x"),
        Some(Placement {
            parent_id: deepest,
            index: 0
        })
    );
    assert_eq!(nested.node_count(), tree.node_count());
    assert_eq!(nested.depth(), CHAIN_DEPTH + 2);
}
