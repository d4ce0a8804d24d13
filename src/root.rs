use crate::{
	apply::{patch, PatchError},
	diff::diff,
	live::LiveTree,
	node::Node,
	patch::{Patch, PatchStats},
};
use tracing::{debug, instrument};

/// A VDOM tree mounted into a live container, which can be re-rendered by diffing against the previous tree.
///
/// ```
/// use vdom_patch::{arena::ArenaTree, h, text, Root};
///
/// let mut tree = ArenaTree::new();
/// let container = tree.root();
///
/// let mut root = Root::mount(&mut tree, container, h("div", (), [h("h1", (), [text("Title")])])).unwrap();
/// let stats = root.update(&mut tree, h("div", (), [h("h1", (), [text("Title")]), h("p", (), [text("p")])])).unwrap();
/// assert_eq!(stats.creates, 1);
/// ```
///
/// # Correct Use
///
/// The container's children at and before the mounted node's index must not be changed by other code while mounted.
#[derive(Debug)]
pub struct Root<H> {
	container: H,
	index: usize,
	current: Node,
}

impl<H: Clone> Root<H> {
	/// Materializes `node` and appends it to `container`'s children.
	///
	/// # Errors
	///
	/// Iff the live tree fails.
	#[instrument(skip(tree, container, node))]
	pub fn mount<T: LiveTree<Handle = H> + ?Sized>(tree: &mut T, container: H, node: Node) -> Result<Self, PatchError<T::Error>> {
		let index = tree.child_count(&container).map_err(PatchError::Backend)?;
		let child = tree.materialize(&node).map_err(PatchError::Backend)?;
		tree.append_child(&container, child).map_err(PatchError::Backend)?;
		debug!("Mounted at index {}.", index);
		Ok(Self { container, index, current: node })
	}

	/// Diffs the current tree against `new`, patches the live tree accordingly and makes `new` current.
	///
	/// # Errors
	///
	/// Iff patching fails, in which case the current tree is kept.
	/// The live tree may then be partially updated, so consider remounting.
	#[instrument(skip(self, tree, new))]
	pub fn update<T: LiveTree<Handle = H> + ?Sized>(&mut self, tree: &mut T, new: Node) -> Result<PatchStats, PatchError<T::Error>> {
		let descriptor = diff(Some(&self.current), Some(&new));
		let stats = descriptor.as_ref().map(Patch::stats).unwrap_or_default();
		patch(tree, &self.container, descriptor.as_ref(), self.index)?;
		self.current = new;
		debug!(
			creates = stats.creates,
			removes = stats.removes,
			replaces = stats.replaces,
			attribute_sets = stats.attribute_sets,
			attribute_removals = stats.attribute_removals,
			"Updated."
		);
		Ok(stats)
	}

	/// Removes the mounted node from the container and returns the last rendered tree.
	///
	/// # Errors
	///
	/// Iff the live tree fails or the mounted node is missing.
	#[instrument(skip(self, tree))]
	pub fn unmount<T: LiveTree<Handle = H> + ?Sized>(self, tree: &mut T) -> Result<Node, PatchError<T::Error>> {
		patch(tree, &self.container, Some(&Patch::Remove), self.index)?;
		Ok(self.current)
	}

	#[must_use]
	pub fn current(&self) -> &Node {
		&self.current
	}

	#[must_use]
	pub fn container(&self) -> &H {
		&self.container
	}

	/// The mounted node's index among the container's children.
	#[must_use]
	pub fn index(&self) -> usize {
		self.index
	}
}
