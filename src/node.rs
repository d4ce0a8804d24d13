//! The immutable VDOM tree that is diffed.
//!
//! A [`Node`] is either an [`Element`] (tag name, [`Attributes`], ordered children) or a text leaf.
//! Trees are built fresh for each render pass, for example with [`h`] and [`text`],
//! and only their shape and values matter to the differ.

use core::{
	fmt::{self, Display, Formatter},
	iter::FromIterator,
};
use thiserror::Error;

/// A scalar attribute value.
///
/// Values are compared strictly: `Value::Str("1".into())` and `Value::Number(1.0)` are different.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Str(String),
	Number(f64),
	Bool(bool),
}

impl Value {
	/// Whether this value counts as present.
	///
	/// The empty string, `0`, NaN and `false` are falsy.
	/// Falsy attribute values are never rendered and are diffed as removals.
	#[must_use]
	pub fn is_truthy(&self) -> bool {
		match self {
			Value::Str(s) => !s.is_empty(),
			Value::Number(n) => *n != 0.0 && !n.is_nan(),
			Value::Bool(b) => *b,
		}
	}
}

/// Renders the value the way it appears in markup.
///
/// Numbers are formatted like JavaScript's `Number.prototype.toString()`:
/// The shortest round-tripping digits, in exponent notation (`1e+21`, `1.5e-7`) outside of `1e-6..1e21`.
impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Str(s) => f.write_str(s),
			Value::Number(n) => fmt_number(*n, f),
			Value::Bool(b) => write!(f, "{}", b),
		}
	}
}

fn fmt_number(n: f64, f: &mut Formatter<'_>) -> fmt::Result {
	if n.is_nan() {
		return f.write_str("NaN");
	}
	if n.is_infinite() {
		return f.write_str(if n.is_sign_positive() { "Infinity" } else { "-Infinity" });
	}
	if n == 0.0 {
		// Also for -0.
		return f.write_str("0");
	}

	let magnitude = n.abs();
	if (1e-6..1e21).contains(&magnitude) {
		return write!(f, "{}", n);
	}
	let exponential = format!("{:e}", n);
	match exponential.split_once('e') {
		Some((mantissa, exponent)) if !exponent.starts_with('-') => write!(f, "{}e+{}", mantissa, exponent),
		_ => f.write_str(&exponential),
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_owned())
	}
}
impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}
impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Number(n)
	}
}
impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Value::Number(n.into())
	}
}
impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

/// An attribute mapping with unique keys.
///
/// Iteration follows insertion order, but equality does not depend on it.
#[derive(Debug, Clone, Default)]
pub struct Attributes(Vec<(String, Value)>);

impl Attributes {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key` to `value`, keeping the key's original position if it was already present.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		let key = key.into();
		let value = value.into();
		match self.0.iter_mut().find(|(k, _)| *k == key) {
			Some((_, existing)) => *existing = value,
			None => self.0.push((key, value)),
		}
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(k, _)| k.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl PartialEq for Attributes {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attributes = Self::new();
		for (k, v) in iter {
			attributes.insert(k, v);
		}
		attributes
	}
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Attributes {
	fn from(pairs: [(K, V); N]) -> Self {
		IntoIterator::into_iter(pairs).collect()
	}
}

/// No attributes.
impl From<()> for Attributes {
	fn from((): ()) -> Self {
		Self::new()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
	#[error("element tag names must not be empty")]
	EmptyTagName,
}

/// A structured VDOM node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	name: String,
	attributes: Attributes,
	children: Vec<Node>,
}

impl Element {
	/// # Errors
	///
	/// Iff `name` is empty.
	pub fn try_new(name: impl Into<String>, attributes: impl Into<Attributes>, children: impl IntoIterator<Item = Node>) -> Result<Self, NodeError> {
		let name = name.into();
		if name.is_empty() {
			return Err(NodeError::EmptyTagName);
		}
		Ok(Self {
			name,
			attributes: attributes.into(),
			children: children.into_iter().collect(),
		})
	}

	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	#[must_use]
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	#[must_use]
	pub fn children(&self) -> &[Node] {
		&self.children
	}
}

/// One position in a VDOM tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Element(Element),
	Text(String),
}

impl Node {
	#[must_use]
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(element) => Some(element),
			Node::Text(_) => None,
		}
	}

	#[must_use]
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Node::Element(_) => None,
			Node::Text(text) => Some(text),
		}
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}
impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Node::Text(text.to_owned())
	}
}
impl From<String> for Node {
	fn from(text: String) -> Self {
		Node::Text(text)
	}
}

/// Builds an element node.
///
/// ```
/// use vdom_patch::{h, text};
///
/// let vdom = h("a", [("href", "/x")], [text("link")]);
/// assert_eq!(vdom.as_element().unwrap().attributes().len(), 1);
/// ```
///
/// # Panics
///
/// Iff `name` is empty. Use [`Element::try_new`] for names that aren't known to be valid.
#[must_use]
pub fn h(name: &str, attributes: impl Into<Attributes>, children: impl IntoIterator<Item = Node>) -> Node {
	match Element::try_new(name, attributes, children) {
		Ok(element) => element.into(),
		Err(error) => panic!("Invalid element: {}", error),
	}
}

/// Builds a text node.
#[must_use]
pub fn text(text: impl Into<String>) -> Node {
	Node::Text(text.into())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn falsy_values() {
		assert!(!Value::from("").is_truthy());
		assert!(!Value::from(0_i32).is_truthy());
		assert!(!Value::from(f64::NAN).is_truthy());
		assert!(!Value::from(false).is_truthy());

		assert!(Value::from("0").is_truthy());
		assert!(Value::from(-1_i32).is_truthy());
		assert!(Value::from(true).is_truthy());
	}

	#[test]
	fn values_render_like_markup() {
		assert_eq!(Value::from(true).to_string(), "true");
		assert_eq!(Value::from(2_i32).to_string(), "2");
		assert_eq!(Value::from(1.5).to_string(), "1.5");
		assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
		assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
		assert_eq!(Value::from(-0.0).to_string(), "0");
		assert_eq!(Value::from("/x").to_string(), "/x");
	}

	#[test]
	fn large_and_small_numbers_use_exponents() {
		assert_eq!(Value::from(1e20).to_string(), "100000000000000000000");
		assert_eq!(Value::from(1e21).to_string(), "1e+21");
		assert_eq!(Value::from(-2.5e30).to_string(), "-2.5e+30");
		assert_eq!(Value::from(0.000_001).to_string(), "0.000001");
		assert_eq!(Value::from(1e-7).to_string(), "1e-7");
		assert_eq!(Value::from(1.5e-7).to_string(), "1.5e-7");
	}

	#[test]
	fn attribute_equality_ignores_order() {
		let a: Attributes = [("id", "a"), ("class", "b")].into();
		let b: Attributes = [("class", "b"), ("id", "a")].into();
		assert_eq!(a, b);
		assert_ne!(a, Attributes::from([("id", "a")]));
	}

	#[test]
	fn insert_keeps_keys_unique() {
		let mut attributes = Attributes::new();
		attributes.insert("id", "a");
		attributes.insert("class", "b");
		attributes.insert("id", "c");
		assert_eq!(attributes.keys().collect::<Vec<_>>(), ["id", "class"]);
		assert_eq!(attributes.get("id"), Some(&Value::from("c")));
	}

	#[test]
	fn empty_tag_name_is_rejected() {
		assert_eq!(Element::try_new("", (), []), Err(NodeError::EmptyTagName));
	}

	#[test]
	#[should_panic(expected = "Invalid element")]
	fn h_panics_on_empty_tag_name() {
		let _ = h("", (), []);
	}
}
