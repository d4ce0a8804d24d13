//! The boundary between the patcher and a rendering environment.
//!
//! A live tree is addressed through cheap handles. Child positions are plain indices into a parent's current child list,
//! so the same descriptor must never be applied twice.

use crate::node::{Node, Value};

/// Turns VDOM nodes into renderable objects.
pub trait Materialize {
	type Handle: Clone;
	type Error: std::error::Error + 'static;

	/// Recursively realizes `node`, including all attributes and children in order, as a detached renderable.
	///
	/// Falsy attribute values are not rendered.
	///
	/// # Errors
	///
	/// Iff the rendering environment fails.
	fn materialize(&mut self, node: &Node) -> Result<Self::Handle, Self::Error>;
}

/// A mutable rendered tree.
///
/// # Errors
///
/// Implementations return [`Materialize::Error`] for handles they don't recognise
/// and for failures of the underlying rendering environment.
#[allow(clippy::missing_errors_doc)]
pub trait LiveTree: Materialize {
	fn child_count(&self, parent: &Self::Handle) -> Result<usize, Self::Error>;

	/// `Ok(None)` iff `index` is out of bounds.
	fn child(&self, parent: &Self::Handle, index: usize) -> Result<Option<Self::Handle>, Self::Error>;

	/// Whether `handle` refers to an element (as opposed to a text unit).
	fn is_element(&self, handle: &Self::Handle) -> bool;

	/// Appends a detached `child` to `parent`'s children.
	fn append_child(&mut self, parent: &Self::Handle, child: Self::Handle) -> Result<(), Self::Error>;

	fn remove_child(&mut self, parent: &Self::Handle, index: usize) -> Result<(), Self::Error>;

	/// Substitutes a detached `new_child` for the child at `index`, which is discarded.
	fn replace_child(&mut self, parent: &Self::Handle, index: usize, new_child: Self::Handle) -> Result<(), Self::Error>;

	fn attribute(&self, element: &Self::Handle, key: &str) -> Result<Option<String>, Self::Error>;

	/// Renders `value` as string, replacing any previous value of the attribute.
	fn set_attribute(&mut self, element: &Self::Handle, key: &str, value: &Value) -> Result<(), Self::Error>;

	/// Removing an attribute that isn't set is not an error.
	fn remove_attribute(&mut self, element: &Self::Handle, key: &str) -> Result<(), Self::Error>;
}
