//! Scope modeling helpers used by authorization requests.

// std
use std::{collections::HashSet, slice::Iter};
// crates.io
use serde::{Deserializer, Serializer, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Ordered, deduplicated set of OAuth scopes.
///
/// Unlike a sorted set, the first occurrence of each scope keeps its position so the joined
/// `scope`/`user_scope` parameters preserve the order callers configured. Values are not
/// validated; malformed scopes simply end up in the authorize URL.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet {
	scopes: Vec<String>,
}
impl ScopeSet {
	/// Creates a deduplicated scope set from any iterator.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut set = Self::default();

		set.extend(scopes);

		set
	}

	/// Appends scopes that are not yet present.
	pub fn extend<I, S>(&mut self, scopes: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut seen = self.scopes.iter().cloned().collect::<HashSet<_>>();

		for scope in scopes {
			let owned: String = scope.into();

			if seen.insert(owned.clone()) {
				self.scopes.push(owned);
			}
		}
	}

	/// Returns a copy with `scope` appended (no-op when already present).
	pub fn with(mut self, scope: impl Into<String>) -> Self {
		self.extend([scope]);

		self
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the set contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Joins scopes with the provider's delimiter; empty sets yield an empty string.
	pub fn join(&self, delimiter: char) -> String {
		let mut buf = String::new();

		for (idx, value) in self.scopes.iter().enumerate() {
			if idx > 0 {
				buf.push(delimiter);
			}

			buf.push_str(value);
		}

		buf
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.scopes
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.scopes).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.join(' '))
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeSet {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.scopes.iter() }
	}
}
impl<S> FromIterator<S> for ScopeSet
where
	S: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self::new(iter)
	}
}
impl From<Vec<String>> for ScopeSet {
	fn from(value: Vec<String>) -> Self {
		Self::new(value)
	}
}
impl From<&[&str]> for ScopeSet {
	fn from(value: &[&str]) -> Self {
		Self::new(value.iter().copied())
	}
}
impl FromStr for ScopeSet {
	type Err = std::convert::Infallible;

	/// Parses comma- or whitespace-separated scopes, skipping empty segments.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::new(
			s.split(|c: char| c == ',' || c.is_whitespace()).filter(|scope| !scope.is_empty()),
		))
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in self.scopes.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		Ok(ScopeSet::new(values))
	}
}
