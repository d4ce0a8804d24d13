//! A [`LiveTree`] over the browser DOM, via [`web_sys`].
//!
//! Handles are [`web_sys::Node`]s. Child indices address a parent's [***childNodes***](https://developer.mozilla.org/en-US/docs/Web/API/Node/childNodes),
//! which includes comments and whitespace-only text, so patch only containers whose content was produced from VDOM.

use crate::{
	live::{LiveTree, Materialize},
	load::Load,
	logging::Content,
	node::{Node, Value},
};
use core::convert::TryFrom;
use thiserror::Error;
use tracing::{error, trace};
use wasm_bindgen::{JsCast, JsValue};

/// A failed DOM operation, usually a JavaScript exception.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("DOM operation failed: {0}")]
pub struct DomError(String);

impl DomError {
	#[must_use]
	pub fn message(&self) -> &str {
		&self.0
	}
}

impl From<JsValue> for DomError {
	fn from(value: JsValue) -> Self {
		if let Some(error) = value.dyn_ref::<js_sys::Error>() {
			Self(String::from(error.message()))
		} else if let Some(message) = value.as_string() {
			Self(message)
		} else {
			Self(format!("{:?}", value))
		}
	}
}

/// Creates and mutates nodes owned by one [`web_sys::Document`].
#[derive(Debug, Clone)]
pub struct DomTree {
	document: web_sys::Document,
}

impl DomTree {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	/// Uses the document that owns `element`.
	///
	/// # Errors
	///
	/// Iff `element` has no owner document.
	pub fn for_element(element: &web_sys::Element) -> Result<Self, DomError> {
		element.owner_document().map(Self::new).ok_or_else(|| DomError("No owner document found for element.".to_owned()))
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	fn element<'a>(handle: &'a web_sys::Node) -> Result<&'a web_sys::Element, DomError> {
		handle.dyn_ref::<web_sys::Element>().ok_or_else(|| {
			error!("Expected `web_sys::Element` but found {:?}.", handle);
			DomError(format!("Expected an element but found node type {}.", handle.node_type()))
		})
	}

	fn child_at(parent: &web_sys::Node, index: usize) -> Option<web_sys::Node> {
		u32::try_from(index).ok().and_then(|index| parent.child_nodes().item(index))
	}

	fn existing_child_at(parent: &web_sys::Node, index: usize) -> Result<web_sys::Node, DomError> {
		Self::child_at(parent, index).ok_or_else(|| DomError(format!("No child node at index {} (of {}).", index, parent.child_nodes().length())))
	}
}

impl Materialize for DomTree {
	type Handle = web_sys::Node;
	type Error = DomError;

	fn materialize(&mut self, node: &Node) -> Result<web_sys::Node, DomError> {
		match node {
			Node::Text(text) => {
				trace!(text = %Content(text.as_str()), "Creating text node.");
				Ok(self.document.create_text_node(text).into())
			}
			Node::Element(element) => {
				trace!(tag = element.name(), "Creating element.");
				let dom_element = self.document.create_element(element.name())?;
				for (key, value) in element.attributes().iter().filter(|(_, value)| value.is_truthy()) {
					dom_element.set_attribute(key, &value.to_string())?;
				}
				for child in element.children() {
					let dom_child = self.materialize(child)?;
					dom_element.append_child(&dom_child)?;
				}
				Ok(dom_element.into())
			}
		}
	}
}

impl LiveTree for DomTree {
	fn child_count(&self, parent: &web_sys::Node) -> Result<usize, DomError> {
		Ok(parent.child_nodes().length() as usize)
	}

	fn child(&self, parent: &web_sys::Node, index: usize) -> Result<Option<web_sys::Node>, DomError> {
		Ok(Self::child_at(parent, index))
	}

	fn is_element(&self, handle: &web_sys::Node) -> bool {
		handle.dyn_ref::<web_sys::Element>().is_some()
	}

	fn append_child(&mut self, parent: &web_sys::Node, child: web_sys::Node) -> Result<(), DomError> {
		parent.append_child(&child)?;
		Ok(())
	}

	fn remove_child(&mut self, parent: &web_sys::Node, index: usize) -> Result<(), DomError> {
		let child = Self::existing_child_at(parent, index)?;
		parent.remove_child(&child)?;
		Ok(())
	}

	fn replace_child(&mut self, parent: &web_sys::Node, index: usize, new_child: web_sys::Node) -> Result<(), DomError> {
		let child = Self::existing_child_at(parent, index)?;
		parent.replace_child(&new_child, &child)?;
		Ok(())
	}

	fn attribute(&self, element: &web_sys::Node, key: &str) -> Result<Option<String>, DomError> {
		Ok(Self::element(element)?.get_attribute(key))
	}

	fn set_attribute(&mut self, element: &web_sys::Node, key: &str, value: &Value) -> Result<(), DomError> {
		Self::element(element)?.set_attribute(key, &value.to_string())?;
		Ok(())
	}

	fn remove_attribute(&mut self, element: &web_sys::Node, key: &str) -> Result<(), DomError> {
		Self::element(element)?.remove_attribute(key)?;
		Ok(())
	}
}

impl Load for DomTree {
	fn text(&self, handle: &web_sys::Node) -> Result<Option<String>, DomError> {
		Ok(handle.dyn_ref::<web_sys::Text>().map(|text| text.data()))
	}

	/// The element's local name, which, unlike its ***tagName***, isn't upper-cased for HTML elements.
	fn tag_name(&self, element: &web_sys::Node) -> Result<String, DomError> {
		Ok(Self::element(element)?.local_name())
	}

	fn attributes(&self, element: &web_sys::Node) -> Result<Vec<(String, String)>, DomError> {
		let attributes = Self::element(element)?.attributes();
		Ok((0..attributes.length()).filter_map(|i| attributes.item(i)).map(|attribute| (attribute.name(), attribute.value())).collect())
	}
}
