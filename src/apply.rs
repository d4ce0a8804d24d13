//! Applies patch descriptors to a [`LiveTree`].

use crate::{
	live::LiveTree,
	logging::Content,
	patch::{AttributePatch, Patch},
};
use thiserror::Error;
use tracing::{error, instrument, trace, trace_span};

/// A descriptor did not match the live tree it was applied to, or the live tree failed.
///
/// Mutations that were applied before the error are not rolled back.
/// Recompute the descriptor from a known-consistent state instead of retrying.
#[derive(Debug, Error)]
pub enum PatchError<E: std::error::Error + 'static> {
	#[error("expected a live child at index {index}, but the parent has {len} child(ren)")]
	MissingChild { index: usize, len: usize },
	#[error("expected a live element at index {index} to update its attributes or children, but found a text unit")]
	NotAnElement { index: usize },
	#[error("live tree operation failed: {0}")]
	Backend(#[source] E),
}

/// Applies `patch` to the child at `index` of `parent`.
///
/// - `None` does nothing.
/// - [`Patch::Create`] materializes its node and appends it to `parent`. `index` is not consulted.
/// - [`Patch::Remove`] removes the child at `index`.
/// - [`Patch::Replace`] materializes its node and substitutes it for the child at `index`.
/// - [`Patch::Update`] applies its attribute patches to the child at `index`,
///   then recursively patches that child's children with the child descriptors, aligned by index.
///
/// Child descriptors are applied depth-first in two passes:
/// First all except [`Patch::Remove`] in ascending index order, then the removals in descending index order,
/// so that removals don't shift the live children that later descriptors address.
///
/// # Errors
///
/// If the descriptor doesn't match the shape of the live tree (see [`PatchError`]),
/// or if the live tree fails.
#[instrument(skip(tree, parent, patch))]
pub fn patch<T: LiveTree + ?Sized>(tree: &mut T, parent: &T::Handle, patch: Option<&Patch>, index: usize) -> Result<(), PatchError<T::Error>> {
	match patch {
		None => Ok(()),
		Some(patch) => apply(tree, parent, patch, index),
	}
}

/// Like [`patch()`], at index 0.
///
/// # Errors
///
/// See [`patch()`].
pub fn patch_root<T: LiveTree + ?Sized>(tree: &mut T, parent: &T::Handle, patch: Option<&Patch>) -> Result<(), PatchError<T::Error>> {
	self::patch(tree, parent, patch, 0)
}

fn apply<T: LiveTree + ?Sized>(tree: &mut T, parent: &T::Handle, patch: &Patch, index: usize) -> Result<(), PatchError<T::Error>> {
	match patch {
		Patch::Create(node) => {
			let span = trace_span!("Applying create", index);
			let _enter = span.enter();
			let child = tree.materialize(node).map_err(PatchError::Backend)?;
			tree.append_child(parent, child).map_err(PatchError::Backend)
		}
		Patch::Remove => {
			let span = trace_span!("Applying remove", index);
			let _enter = span.enter();
			locate(tree, parent, index)?;
			tree.remove_child(parent, index).map_err(PatchError::Backend)
		}
		Patch::Replace(node) => {
			let span = trace_span!("Applying replace", index);
			let _enter = span.enter();
			locate(tree, parent, index)?;
			let child = tree.materialize(node).map_err(PatchError::Backend)?;
			tree.replace_child(parent, index, child).map_err(PatchError::Backend)
		}
		Patch::Update { attributes, children } => {
			let span = trace_span!("Applying update", index, attributes = attributes.len(), children = children.len());
			let _enter = span.enter();
			if attributes.is_empty() && children.is_empty() {
				trace!("Nothing to do.");
				return Ok(());
			}

			let element = locate(tree, parent, index)?;
			if !tree.is_element(&element) {
				error!("Expected to update an element at index {}, but found a text unit.", index);
				return Err(PatchError::NotAnElement { index });
			}

			for attribute in attributes {
				match attribute {
					AttributePatch::Set { key, value } => {
						trace!(key = key.as_str(), value = %Content(value), "Setting attribute.");
						tree.set_attribute(&element, key, value).map_err(PatchError::Backend)?;
					}
					AttributePatch::Remove { key, .. } => {
						trace!(key = key.as_str(), "Removing attribute.");
						tree.remove_attribute(&element, key).map_err(PatchError::Backend)?;
					}
				}
			}

			for (i, child) in children.iter().enumerate() {
				match child {
					Some(Patch::Remove) | None => (),
					Some(child) => apply(tree, &element, child, i)?,
				}
			}
			for (i, child) in children.iter().enumerate().rev() {
				if let Some(Patch::Remove) = child {
					apply(tree, &element, &Patch::Remove, i)?;
				}
			}
			Ok(())
		}
	}
}

fn locate<T: LiveTree + ?Sized>(tree: &T, parent: &T::Handle, index: usize) -> Result<T::Handle, PatchError<T::Error>> {
	match tree.child(parent, index).map_err(PatchError::Backend)? {
		Some(child) => Ok(child),
		None => {
			let len = tree.child_count(parent).map_err(PatchError::Backend)?;
			error!("Expected a live child at index {}, but the parent has {} child(ren).", index, len);
			Err(PatchError::MissingChild { index, len })
		}
	}
}
