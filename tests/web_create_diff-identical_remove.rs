#![cfg(all(target_arch = "wasm32", feature = "web"))]

use vdom_patch::{h, load::load_child_nodes, text, LiveTree, Node, Root};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

use web_util_::container;

#[wasm_bindgen_test]
fn text_node() {
	test_create_diff_identical_remove(text("Hello vdom-patch text!"));
}

#[wasm_bindgen_test]
fn minimal_div() {
	test_create_diff_identical_remove(h("div", (), []));
}

#[wasm_bindgen_test]
fn nested() {
	test_create_diff_identical_remove(h(
		"div",
		[("id", "app")],
		[h("h1", (), [text("Title")]), h("p", [("class", "lead")], [text("Hello "), h("b", (), [text("nested")]), text(" nodes!")])],
	));
}

#[wasm_bindgen_test]
fn minimal_svg() {
	test_create_diff_identical_remove(h("svg", (), []));
}

fn test_create_diff_identical_remove(vdom: Node) {
	let (mut tree, container) = container();

	let mut root = Root::mount(&mut tree, container.clone(), vdom.clone()).unwrap();
	assert_eq!(load_child_nodes(&tree, &container).unwrap(), [vdom.clone()]);
	let mounted = tree.child(&container, 0).unwrap().unwrap();

	let stats = root.update(&mut tree, vdom.clone()).unwrap();
	assert_eq!(stats.mutations(), 0);
	assert!(tree.child(&container, 0).unwrap().unwrap().is_same_node(Some(&mounted)));

	assert_eq!(root.unmount(&mut tree).unwrap(), vdom);
	assert_eq!(tree.child_count(&container).unwrap(), 0);
}
