//! The index-aligned tree differ.
//!
//! Children are compared strictly by position. Inserting or removing a child in the middle of a list
//! causes every following sibling to be diffed against the wrong counterpart, which usually results in a cascade of [`Patch::Replace`]s.
//! There is no keyed reconciliation.

use crate::{
	logging::Content,
	node::{Attributes, Element, Node},
	patch::{AttributePatch, Patch},
};
use hashbrown::HashSet;
use tracing::{instrument, trace, trace_span};

/// Computes the descriptor that transforms `old` into `new` at one position.
///
/// | `old`   | `new`   | result                                              |
/// |---------|---------|-----------------------------------------------------|
/// | `None`  | `None`  | `None`                                              |
/// | `None`  | `Some`  | [`Patch::Create`]                                   |
/// | `Some`  | `None`  | [`Patch::Remove`]                                   |
/// | `Some`  | `Some`  | [`Patch::Replace`] if changed, otherwise see below  |
///
/// Two nodes are *changed* if one is text and the other an element, if both are texts with different content,
/// or if both are elements with different tag names.
/// Equal texts result in `None`, elements with the same tag name in a [`Patch::Update`],
/// even if neither their attributes nor their children differ.
///
/// ```
/// use vdom_patch::{diff, h, text, Patch};
///
/// let old = h("div", (), [h("h1", (), [text("Title")])]);
/// let new = h("div", (), [h("h1", (), [text("Title")]), h("p", (), [text("p")])]);
///
/// match diff(Some(&old), Some(&new)) {
///     Some(Patch::Update { attributes, children }) => {
///         assert!(attributes.is_empty());
///         assert_eq!(children[1], Some(Patch::Create(h("p", (), [text("p")]))));
///     }
///     other => panic!("Unexpected patch: {:?}", other),
/// }
/// ```
#[must_use]
#[instrument(skip(old, new))]
pub fn diff(old: Option<&Node>, new: Option<&Node>) -> Option<Patch> {
	diff_position(old, new)
}

fn diff_position(old: Option<&Node>, new: Option<&Node>) -> Option<Patch> {
	match (old, new) {
		(None, None) => None,
		(None, Some(new)) => {
			trace!("Creating.");
			Some(Patch::Create(new.clone()))
		}
		(Some(_), None) => {
			trace!("Removing.");
			Some(Patch::Remove)
		}
		(Some(old), Some(new)) => {
			if changed(old, new) {
				trace!("Replacing.");
				Some(Patch::Replace(new.clone()))
			} else if let (Node::Element(old), Node::Element(new)) = (old, new) {
				Some(diff_element(old, new))
			} else {
				None
			}
		}
	}
}

/// Whether `old` can't be updated in place to become `new`.
///
/// Attribute and child differences never count.
fn changed(old: &Node, new: &Node) -> bool {
	match (old, new) {
		(Node::Text(old), Node::Text(new)) => old != new,
		(Node::Element(old), Node::Element(new)) => old.name() != new.name(),
		(Node::Text(_), Node::Element(_)) | (Node::Element(_), Node::Text(_)) => true,
	}
}

fn diff_element(old: &Element, new: &Element) -> Patch {
	let span = trace_span!("Diffing element", tag = old.name());
	let _enter = span.enter();
	Patch::Update {
		attributes: diff_attributes(old.attributes(), new.attributes()),
		children: diff_children(old.children(), new.children()),
	}
}

/// Keys are visited in the old attributes' order, followed by keys that only appear in `new`.
///
/// A falsy new value always results in a removal, even if that value was given explicitly.
fn diff_attributes(old: &Attributes, new: &Attributes) -> Vec<AttributePatch> {
	let mut seen = HashSet::with_capacity(old.len() + new.len());
	let keys = old.keys().chain(new.keys()).filter(|key| seen.insert(*key));

	let mut patches = Vec::new();
	for key in keys {
		let old_value = old.get(key);
		match new.get(key).filter(|value| value.is_truthy()) {
			None => {
				trace!(key, old_value = ?old_value.map(Content), "Removing attribute.");
				patches.push(AttributePatch::Remove {
					key: key.to_owned(),
					old_value: old_value.cloned(),
				});
			}
			Some(new_value) if old_value.map_or(true, |old_value| !old_value.is_truthy() || old_value != new_value) => {
				trace!(key, value = %Content(new_value), "Setting attribute.");
				patches.push(AttributePatch::Set {
					key: key.to_owned(),
					value: new_value.clone(),
				});
			}
			Some(_) => (),
		}
	}
	patches
}

/// The result always has `max(old.len(), new.len())` entries.
fn diff_children(old: &[Node], new: &[Node]) -> Vec<Option<Patch>> {
	(0..old.len().max(new.len())).map(|i| diff_position(old.get(i), new.get(i))).collect()
}
