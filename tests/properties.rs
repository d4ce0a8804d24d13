#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;
use vdom_patch::{arena::ArenaTree, diff, h, load::load_node, patch_root, AttributePatch, Attributes, LiveTree, Materialize, Node, Patch, Value};

fn value() -> impl Strategy<Value = Value> {
	prop_oneof![
		"[a-c]{0,2}".prop_map(Value::from),
		any::<bool>().prop_map(Value::from),
		(0..3_i32).prop_map(Value::from),
	]
}

fn attributes() -> impl Strategy<Value = Attributes> {
	prop::collection::vec((prop::sample::select(vec!["id", "class", "href", "disabled"]), value()), 0..4).prop_map(|pairs| pairs.into_iter().collect())
}

fn node() -> impl Strategy<Value = Node> {
	let leaf = "[a-c]{0,2}".prop_map(Node::from);
	leaf.prop_recursive(4, 32, 4, |inner| {
		(prop::sample::select(vec!["div", "p", "span"]), attributes(), prop::collection::vec(inner, 0..4)).prop_map(|(name, attributes, children)| h(name, attributes, children))
	})
}

/// Materializes `vdom` into a fresh tree and reads it back.
fn rendered(vdom: &Node) -> Node {
	let mut tree = ArenaTree::new();
	let live = tree.materialize(vdom).unwrap();
	load_node(&tree, &live).unwrap()
}

/// Falsy attributes are removed even when unchanged, which never alters the rendered tree.
fn has_no_visible_changes(patch: &Patch) -> bool {
	match patch {
		Patch::Create(_) | Patch::Remove | Patch::Replace(_) => false,
		Patch::Update { attributes, children } => {
			attributes.iter().all(|attribute| match attribute {
				AttributePatch::Remove { old_value, .. } => !old_value.as_ref().map_or(false, Value::is_truthy),
				AttributePatch::Set { .. } => false,
			}) && children.iter().flatten().all(has_no_visible_changes)
		}
	}
}

proptest! {
	#[test]
	fn identical_trees_diff_to_no_changes(x in node()) {
		match diff(Some(&x), Some(&x.clone())) {
			None => prop_assert!(matches!(x, Node::Text(_))),
			Some(patch) => prop_assert!(has_no_visible_changes(&patch)),
		}
	}

	#[test]
	fn absent_counterparts_create_and_remove(x in node()) {
		prop_assert_eq!(diff(None, Some(&x)), Some(Patch::Create(x.clone())));
		prop_assert_eq!(diff(Some(&x), None), Some(Patch::Remove));
	}

	#[test]
	fn child_patches_span_both_child_lists(old in node(), new in node()) {
		if let (Node::Element(o), Node::Element(n)) = (&old, &new) {
			if o.name() == n.name() {
				match diff(Some(&old), Some(&new)) {
					Some(Patch::Update { children, .. }) => prop_assert_eq!(children.len(), o.children().len().max(n.children().len())),
					other => prop_assert!(false, "Expected an update but got {:?}", other),
				}
			}
		}
	}

	#[test]
	fn patching_matches_rendering_from_scratch(old in node(), new in node()) {
		let mut tree = ArenaTree::new();
		let container = tree.root();
		let mounted = tree.materialize(&old).unwrap();
		tree.append_child(&container, mounted).unwrap();

		patch_root(&mut tree, &container, diff(Some(&old), Some(&new)).as_ref()).unwrap();

		prop_assert_eq!(tree.child_count(&container).unwrap(), 1);
		let patched = tree.child(&container, 0).unwrap().unwrap();
		prop_assert_eq!(load_node(&tree, &patched).unwrap(), rendered(&new));
	}
}
