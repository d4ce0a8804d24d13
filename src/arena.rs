//! An in-memory [`LiveTree`] that stores its nodes in a flat table.
//!
//! Nodes are addressed by generational [`NodeId`]s. Removed or replaced subtrees are freed immediately,
//! and their slots are reused by later materializations. Stale ids are detected and rejected.

use crate::{
	live::{LiveTree, Materialize},
	load::Load,
	logging::Content,
	node::{Node, Value},
};
use core::{
	convert::TryFrom,
	fmt::{self, Display, Formatter},
};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	index: u32,
	generation: u32,
}

impl Display for NodeId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "#{}v{}", self.index, self.generation)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
	#[error("unknown or freed node {0}")]
	UnknownNode(NodeId),
	#[error("node {0} is not an element")]
	NotAnElement(NodeId),
	#[error("child index {index} out of bounds for {len} child(ren)")]
	IndexOutOfBounds { index: usize, len: usize },
	#[error("node {0} is already attached")]
	AlreadyAttached(NodeId),
	#[error("node {child} is an ancestor of {parent}")]
	WouldCycle { parent: NodeId, child: NodeId },
	#[error("the arena is full")]
	Full,
}

#[derive(Debug)]
enum LiveNode {
	Element {
		name: String,
		attributes: Vec<(String, String)>,
		children: Vec<NodeId>,
	},
	Text(String),
}

#[derive(Debug)]
struct Slot {
	generation: u32,
	parent: Option<NodeId>,
	node: Option<LiveNode>,
}

#[derive(Debug)]
pub struct ArenaTree {
	slots: Vec<Slot>,
	free: Vec<u32>,
	root: NodeId,
}

impl Default for ArenaTree {
	fn default() -> Self {
		Self::new()
	}
}

impl ArenaTree {
	/// Creates a tree with an empty `<root>` element.
	#[must_use]
	pub fn new() -> Self {
		Self::with_root("root")
	}

	/// Creates a tree with an empty root element named `name`.
	#[must_use]
	pub fn with_root(name: &str) -> Self {
		Self {
			slots: vec![Slot {
				generation: 0,
				parent: None,
				node: Some(LiveNode::Element {
					name: name.to_owned(),
					attributes: Vec::new(),
					children: Vec::new(),
				}),
			}],
			free: Vec::new(),
			root: NodeId { index: 0, generation: 0 },
		}
	}

	#[must_use]
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// The number of live nodes, including the root and detached ones.
	#[must_use]
	pub fn node_count(&self) -> usize {
		self.slots.len() - self.free.len()
	}

	fn slot(&self, id: NodeId) -> Result<&Slot, ArenaError> {
		self.slots
			.get(id.index as usize)
			.filter(|slot| slot.generation == id.generation && slot.node.is_some())
			.ok_or(ArenaError::UnknownNode(id))
	}

	fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot, ArenaError> {
		self.slots
			.get_mut(id.index as usize)
			.filter(|slot| slot.generation == id.generation && slot.node.is_some())
			.ok_or(ArenaError::UnknownNode(id))
	}

	fn node(&self, id: NodeId) -> Result<&LiveNode, ArenaError> {
		self.slot(id)?.node.as_ref().ok_or(ArenaError::UnknownNode(id))
	}

	fn node_mut(&mut self, id: NodeId) -> Result<&mut LiveNode, ArenaError> {
		self.slot_mut(id)?.node.as_mut().ok_or(ArenaError::UnknownNode(id))
	}

	fn children(&self, id: NodeId) -> Result<&[NodeId], ArenaError> {
		match self.node(id)? {
			LiveNode::Element { children, .. } => Ok(children),
			LiveNode::Text(_) => Err(ArenaError::NotAnElement(id)),
		}
	}

	fn children_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, ArenaError> {
		match self.node_mut(id)? {
			LiveNode::Element { children, .. } => Ok(children),
			LiveNode::Text(_) => Err(ArenaError::NotAnElement(id)),
		}
	}

	fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Vec<(String, String)>, ArenaError> {
		match self.node_mut(id)? {
			LiveNode::Element { attributes, .. } => Ok(attributes),
			LiveNode::Text(_) => Err(ArenaError::NotAnElement(id)),
		}
	}

	fn allocate(&mut self, node: LiveNode) -> Result<NodeId, ArenaError> {
		match self.free.pop() {
			Some(index) => {
				let slot = &mut self.slots[index as usize];
				slot.parent = None;
				slot.node = Some(node);
				Ok(NodeId { index, generation: slot.generation })
			}
			None => {
				let index = u32::try_from(self.slots.len()).map_err(|_| ArenaError::Full)?;
				self.slots.push(Slot { generation: 0, parent: None, node: Some(node) });
				Ok(NodeId { index, generation: 0 })
			}
		}
	}

	/// Frees `id` and all its descendants.
	fn free_subtree(&mut self, id: NodeId) -> Result<(), ArenaError> {
		let mut pending = vec![id];
		while let Some(id) = pending.pop() {
			let slot = self.slot_mut(id)?;
			if let Some(LiveNode::Element { children, .. }) = slot.node.take() {
				pending.extend(children);
			}
			slot.parent = None;
			slot.generation = slot.generation.wrapping_add(1);
			self.free.push(id.index);
		}
		trace!("Freed subtree {}. {} node(s) remain.", id, self.node_count());
		Ok(())
	}

	fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), ArenaError> {
		if child == self.root || child == parent {
			return Err(ArenaError::AlreadyAttached(child));
		}
		if self.slot(child)?.parent.is_some() {
			return Err(ArenaError::AlreadyAttached(child));
		}

		// `child` must not be an ancestor of `parent`.
		let mut ancestor = self.slot(parent)?.parent;
		while let Some(id) = ancestor {
			if id == child {
				return Err(ArenaError::WouldCycle { parent, child });
			}
			ancestor = self.slot(id)?.parent;
		}

		self.slot_mut(child)?.parent = Some(parent);
		Ok(())
	}
}

impl Materialize for ArenaTree {
	type Handle = NodeId;
	type Error = ArenaError;

	fn materialize(&mut self, node: &Node) -> Result<NodeId, ArenaError> {
		match node {
			Node::Text(text) => {
				trace!(text = %Content(text.as_str()), "Materializing text.");
				self.allocate(LiveNode::Text(text.clone()))
			}
			Node::Element(element) => {
				trace!(tag = element.name(), "Materializing element.");
				let attributes = element
					.attributes()
					.iter()
					.filter(|(_, value)| value.is_truthy())
					.map(|(key, value)| (key.to_owned(), value.to_string()))
					.collect();
				let id = self.allocate(LiveNode::Element {
					name: element.name().to_owned(),
					attributes,
					children: Vec::with_capacity(element.children().len()),
				})?;
				for child in element.children() {
					let child = self.materialize(child)?;
					self.append_child(&id, child)?;
				}
				Ok(id)
			}
		}
	}
}

impl LiveTree for ArenaTree {
	fn child_count(&self, parent: &NodeId) -> Result<usize, ArenaError> {
		Ok(self.children(*parent)?.len())
	}

	fn child(&self, parent: &NodeId, index: usize) -> Result<Option<NodeId>, ArenaError> {
		Ok(self.children(*parent)?.get(index).copied())
	}

	fn is_element(&self, handle: &NodeId) -> bool {
		matches!(self.node(*handle), Ok(LiveNode::Element { .. }))
	}

	fn append_child(&mut self, parent: &NodeId, child: NodeId) -> Result<(), ArenaError> {
		self.children(*parent)?;
		self.attach(*parent, child)?;
		self.children_mut(*parent)?.push(child);
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, index: usize) -> Result<(), ArenaError> {
		let children = self.children_mut(*parent)?;
		let len = children.len();
		if index >= len {
			return Err(ArenaError::IndexOutOfBounds { index, len });
		}
		let removed = children.remove(index);
		self.free_subtree(removed)
	}

	fn replace_child(&mut self, parent: &NodeId, index: usize, new_child: NodeId) -> Result<(), ArenaError> {
		let len = self.child_count(parent)?;
		if index >= len {
			return Err(ArenaError::IndexOutOfBounds { index, len });
		}
		self.attach(*parent, new_child)?;
		let replaced = core::mem::replace(&mut self.children_mut(*parent)?[index], new_child);
		self.free_subtree(replaced)
	}

	fn attribute(&self, element: &NodeId, key: &str) -> Result<Option<String>, ArenaError> {
		match self.node(*element)? {
			LiveNode::Element { attributes, .. } => Ok(attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())),
			LiveNode::Text(_) => Err(ArenaError::NotAnElement(*element)),
		}
	}

	fn set_attribute(&mut self, element: &NodeId, key: &str, value: &Value) -> Result<(), ArenaError> {
		let attributes = self.attributes_mut(*element)?;
		let value = value.to_string();
		match attributes.iter_mut().find(|(k, _)| k == key) {
			Some((_, existing)) => *existing = value,
			None => attributes.push((key.to_owned(), value)),
		}
		Ok(())
	}

	fn remove_attribute(&mut self, element: &NodeId, key: &str) -> Result<(), ArenaError> {
		self.attributes_mut(*element)?.retain(|(k, _)| k != key);
		Ok(())
	}
}

impl Load for ArenaTree {
	fn text(&self, handle: &NodeId) -> Result<Option<String>, ArenaError> {
		match self.node(*handle)? {
			LiveNode::Text(text) => Ok(Some(text.clone())),
			LiveNode::Element { .. } => Ok(None),
		}
	}

	fn tag_name(&self, element: &NodeId) -> Result<String, ArenaError> {
		match self.node(*element)? {
			LiveNode::Element { name, .. } => Ok(name.clone()),
			LiveNode::Text(_) => Err(ArenaError::NotAnElement(*element)),
		}
	}

	fn attributes(&self, element: &NodeId) -> Result<Vec<(String, String)>, ArenaError> {
		match self.node(*element)? {
			LiveNode::Element { attributes, .. } => Ok(attributes.clone()),
			LiveNode::Text(_) => Err(ArenaError::NotAnElement(*element)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		load::load_node,
		node::{h, text},
	};

	#[test]
	fn materializes_recursively() {
		let mut tree = ArenaTree::new();
		let root = tree.root();
		let vdom = h("div", [("id", "app")], [h("h1", (), [text("Title")]), text("body")]);

		let div = tree.materialize(&vdom).unwrap();
		tree.append_child(&root, div).unwrap();

		assert_eq!(tree.node_count(), 5);
		assert_eq!(tree.child_count(&div).unwrap(), 2);
		assert!(tree.is_element(&tree.child(&div, 0).unwrap().unwrap()));
		assert!(!tree.is_element(&tree.child(&div, 1).unwrap().unwrap()));
		assert_eq!(load_node(&tree, &div).unwrap(), vdom);
	}

	#[test]
	fn falsy_attributes_are_not_rendered() {
		let mut tree = ArenaTree::new();
		let input = tree.materialize(&h("input", [("disabled", Value::Bool(false)), ("value", Value::Number(0.0)), ("max", Value::Number(3.0))], [])).unwrap();
		assert_eq!(tree.attributes(&input).unwrap(), [("max".to_owned(), "3".to_owned())]);
	}

	#[test]
	fn freed_slots_are_reused_and_stale_ids_rejected() {
		let mut tree = ArenaTree::new();
		let root = tree.root();
		let first = tree.materialize(&text("a")).unwrap();
		tree.append_child(&root, first).unwrap();
		tree.remove_child(&root, 0).unwrap();
		assert_eq!(tree.node_count(), 1);

		let second = tree.materialize(&text("b")).unwrap();
		assert_ne!(first, second);
		assert_eq!(tree.text(&first), Err(ArenaError::UnknownNode(first)));
		assert_eq!(tree.text(&second).unwrap().as_deref(), Some("b"));
	}

	#[test]
	fn attached_nodes_cannot_be_appended_again() {
		let mut tree = ArenaTree::new();
		let root = tree.root();
		let child = tree.materialize(&text("a")).unwrap();
		tree.append_child(&root, child).unwrap();
		assert_eq!(tree.append_child(&root, child), Err(ArenaError::AlreadyAttached(child)));
		assert_eq!(tree.append_child(&child, root), Err(ArenaError::NotAnElement(child)));
	}

	#[test]
	fn detached_subtrees_cannot_be_appended_below_themselves() {
		let mut tree = ArenaTree::new();
		let div = tree.materialize(&h("div", (), [h("section", (), [h("p", (), [text("a")])])])).unwrap();
		let section = tree.child(&div, 0).unwrap().unwrap();
		let p = tree.child(&section, 0).unwrap().unwrap();

		assert_eq!(tree.append_child(&p, div), Err(ArenaError::WouldCycle { parent: p, child: div }));
		assert_eq!(tree.append_child(&section, div), Err(ArenaError::WouldCycle { parent: section, child: div }));
		assert_eq!(tree.child_count(&p).unwrap(), 1);
		assert_eq!(load_node(&tree, &div).unwrap(), h("div", (), [h("section", (), [h("p", (), [text("a")])])]));

		let root = tree.root();
		tree.append_child(&root, div).unwrap();
		tree.remove_child(&root, 0).unwrap();
		assert_eq!(tree.node_count(), 1);
	}

	#[test]
	fn out_of_bounds_removal_is_rejected() {
		let mut tree = ArenaTree::with_root("body");
		let root = tree.root();
		assert_eq!(tree.remove_child(&root, 0), Err(ArenaError::IndexOutOfBounds { index: 0, len: 0 }));
		assert_eq!(tree.tag_name(&root).unwrap(), "body");
	}
}
