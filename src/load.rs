//! Reads live trees back into VDOM [`Node`]s.
//!
//! This can be used to adopt existing (for example server-rendered) content as the initial tree to diff against.
//! Attribute values are loaded as [`Value::Str`]s, since live trees don't retain their original types.

use crate::{
	live::LiveTree,
	node::{Attributes, Element, Node, NodeError, Value},
};
use thiserror::Error;
use tracing::trace_span;

/// Read access to a live tree's content.
///
/// # Errors
///
/// Implementations return [`Materialize::Error`](`crate::live::Materialize::Error`)
/// for handles they don't recognise or that aren't of the expected kind.
#[allow(clippy::missing_errors_doc)]
pub trait Load: LiveTree {
	/// `Ok(None)` iff `handle` is not a text unit.
	fn text(&self, handle: &Self::Handle) -> Result<Option<String>, Self::Error>;

	fn tag_name(&self, element: &Self::Handle) -> Result<String, Self::Error>;

	/// Attribute key-value pairs in the live tree's order.
	fn attributes(&self, element: &Self::Handle) -> Result<Vec<(String, String)>, Self::Error>;
}

#[derive(Debug, Error)]
pub enum LoadError<E: std::error::Error + 'static> {
	#[error("live tree operation failed: {0}")]
	Backend(#[source] E),
	#[error("invalid live element: {0}")]
	Node(#[source] NodeError),
}

/// Loads the live node at `handle`, recursively.
///
/// # Errors
///
/// Iff the live tree fails or contains an element without tag name.
pub fn load_node<T: Load + ?Sized>(tree: &T, handle: &T::Handle) -> Result<Node, LoadError<T::Error>> {
	if let Some(text) = tree.text(handle).map_err(LoadError::Backend)? {
		return Ok(Node::Text(text));
	}

	let name = tree.tag_name(handle).map_err(LoadError::Backend)?;
	let span = trace_span!("Loading element", tag = name.as_str());
	let _enter = span.enter();
	let attributes: Attributes = tree
		.attributes(handle)
		.map_err(LoadError::Backend)?
		.into_iter()
		.map(|(key, value)| (key, Value::Str(value)))
		.collect();
	let children = load_child_nodes(tree, handle)?;
	Element::try_new(name, attributes, children).map(Node::Element).map_err(LoadError::Node)
}

/// Loads all children of the live element `parent`, recursively.
///
/// # Errors
///
/// See [`load_node`].
pub fn load_child_nodes<T: Load + ?Sized>(tree: &T, parent: &T::Handle) -> Result<Vec<Node>, LoadError<T::Error>> {
	let len = tree.child_count(parent).map_err(LoadError::Backend)?;
	(0..len)
		.filter_map(|i| tree.child(parent, i).transpose())
		.map(|child| load_node(tree, &child.map_err(LoadError::Backend)?))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		arena::ArenaTree,
		live::Materialize,
		node::{h, text},
	};

	#[test]
	fn loads_attributes_as_strings() {
		let mut tree = ArenaTree::new();
		let input = tree.materialize(&h("input", [("max", Value::Number(3.0)), ("required", Value::Bool(true))], [])).unwrap();
		assert_eq!(load_node(&tree, &input).unwrap(), h("input", [("max", "3"), ("required", "true")], []));
	}

	#[test]
	fn loads_children_in_order() {
		let mut tree = ArenaTree::new();
		let root = tree.root();
		for content in &["a", "b", "c"] {
			let child = tree.materialize(&text(*content)).unwrap();
			tree.append_child(&root, child).unwrap();
		}
		assert_eq!(load_child_nodes(&tree, &root).unwrap(), [text("a"), text("b"), text("c")]);
	}
}
