//! Patch descriptors, as produced by [`diff`](`crate::diff()`) and consumed by [`patch`](`crate::patch()`).
//!
//! A descriptor tree mirrors the live tree it was computed for:
//! The `i`-th entry of [`Patch::Update::children`] addresses the `i`-th live child of the updated element.
//! No-ops are represented by the absence of a descriptor (`None`).

use crate::node::{Node, Value};
use core::{
	fmt::{self, Display, Formatter},
	ops::AddAssign,
};

/// Describes how to transform one position of a live tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
	/// Materialize the node and append it to the parent.
	Create(Node),
	/// Remove the live child.
	Remove,
	/// Materialize the node and substitute it for the live child.
	Replace(Node),
	/// Incrementally update a live element in place.
	Update {
		attributes: Vec<AttributePatch>,
		children: Vec<Option<Patch>>,
	},
}

/// Describes how to change one attribute of a live element.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributePatch {
	Set { key: String, value: Value },
	/// `old_value` is informational only.
	Remove { key: String, old_value: Option<Value> },
}

impl AttributePatch {
	#[must_use]
	pub fn key(&self) -> &str {
		match self {
			AttributePatch::Set { key, .. } | AttributePatch::Remove { key, .. } => key,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
	Create,
	Remove,
	Replace,
	Update,
}

impl Display for PatchKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			PatchKind::Create => "CREATE",
			PatchKind::Remove => "REMOVE",
			PatchKind::Replace => "REPLACE",
			PatchKind::Update => "UPDATE",
		})
	}
}

/// Descriptor counts by kind, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchStats {
	pub creates: usize,
	pub removes: usize,
	pub replaces: usize,
	pub updates: usize,
	pub attribute_sets: usize,
	pub attribute_removals: usize,
}

impl PatchStats {
	/// The number of live tree mutations, not counting updates themselves.
	#[must_use]
	pub fn mutations(&self) -> usize {
		self.creates + self.removes + self.replaces + self.attribute_sets + self.attribute_removals
	}
}

impl AddAssign for PatchStats {
	fn add_assign(&mut self, rhs: Self) {
		self.creates += rhs.creates;
		self.removes += rhs.removes;
		self.replaces += rhs.replaces;
		self.updates += rhs.updates;
		self.attribute_sets += rhs.attribute_sets;
		self.attribute_removals += rhs.attribute_removals;
	}
}

impl Patch {
	#[must_use]
	pub fn kind(&self) -> PatchKind {
		match self {
			Patch::Create(_) => PatchKind::Create,
			Patch::Remove => PatchKind::Remove,
			Patch::Replace(_) => PatchKind::Replace,
			Patch::Update { .. } => PatchKind::Update,
		}
	}

	/// Counts the descriptors in this tree, recursively.
	#[must_use]
	pub fn stats(&self) -> PatchStats {
		let mut stats = PatchStats::default();
		match self {
			Patch::Create(_) => stats.creates += 1,
			Patch::Remove => stats.removes += 1,
			Patch::Replace(_) => stats.replaces += 1,
			Patch::Update { attributes, children } => {
				stats.updates += 1;
				for attribute in attributes {
					match attribute {
						AttributePatch::Set { .. } => stats.attribute_sets += 1,
						AttributePatch::Remove { .. } => stats.attribute_removals += 1,
					}
				}
				for child in children.iter().flatten() {
					stats += child.stats();
				}
			}
		}
		stats
	}

	/// Whether applying this descriptor would mutate the live tree.
	///
	/// [`Patch::Update`]s without attribute patches whose children are all absent or ineffective are not.
	#[must_use]
	pub fn is_effective(&self) -> bool {
		match self {
			Patch::Create(_) | Patch::Remove | Patch::Replace(_) => true,
			Patch::Update { attributes, children } => !attributes.is_empty() || children.iter().flatten().any(Patch::is_effective),
		}
	}
}
