#![doc(html_root_url = "https://docs.rs/vdom-patch/0.1.0")]
#![warn(clippy::pedantic)]

//! A minimal index-aligned VDOM differ.
//!
//! [`diff()`] compares two [`Node`] trees and produces a [`Patch`] descriptor (or nothing),
//! which [`patch()`] then applies to a [`LiveTree`]: either the in-memory [`arena::ArenaTree`]
//! or, with the `web` feature, the browser DOM through [`dom::DomTree`].
//! [`Root`] ties both together for repeated rendering.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod apply;
pub mod arena;
pub mod diff;
#[cfg(feature = "web")]
pub mod dom;
pub mod live;
pub mod load;
mod logging;
pub mod node;
pub mod patch;
pub mod root;

pub use crate::{
	apply::{patch, patch_root, PatchError},
	diff::diff,
	live::{LiveTree, Materialize},
	node::{h, text, Attributes, Element, Node, NodeError, Value},
	patch::{AttributePatch, Patch, PatchKind, PatchStats},
	root::Root,
};
