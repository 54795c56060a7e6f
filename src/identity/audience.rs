//! Audience list modeling for signed-token claims.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating audience entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AudienceValidationError {
	/// Empty audience entries are not allowed.
	#[error("Audience entries cannot be empty.")]
	Empty,
	/// Audiences cannot contain embedded whitespace characters.
	#[error("Audience contains whitespace: {audience}.")]
	ContainsWhitespace {
		/// The offending audience string.
		audience: String,
	},
}

/// Ordered, deduplicated set of token audiences.
///
/// Unlike OAuth scope sets, the configured order is preserved because the `aud`
/// claim mirrors the audience list exactly as the operator wrote it; only exact
/// duplicates are dropped.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct AudienceSet(Arc<[String]>);
impl AudienceSet {
	/// Creates a validated audience set from any iterator, preserving order.
	pub fn new<I, S>(audiences: I) -> Result<Self, AudienceValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut seen = Vec::new();

		for audience in audiences {
			let owned: String = audience.into();

			if owned.is_empty() {
				return Err(AudienceValidationError::Empty);
			}
			if owned.chars().any(char::is_whitespace) {
				return Err(AudienceValidationError::ContainsWhitespace { audience: owned });
			}
			if !seen.contains(&owned) {
				seen.push(owned);
			}
		}

		Ok(Self(Arc::from(seen)))
	}

	/// Number of distinct audiences.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if no audiences are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns `true` if the set contains the provided audience.
	pub fn contains(&self, audience: &str) -> bool {
		self.0.iter().any(|candidate| candidate == audience)
	}

	/// Iterator over audience strings in configured order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Returns the underlying slice of audience strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for AudienceSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AudienceSet").field(&self.0).finish()
	}
}
impl Display for AudienceSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0.join(" "))
	}
}
impl TryFrom<Vec<String>> for AudienceSet {
	type Error = AudienceValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl TryFrom<&[String]> for AudienceSet {
	type Error = AudienceValidationError;

	fn try_from(value: &[String]) -> Result<Self, Self::Error> {
		Self::new(value.to_vec())
	}
}

/// Iterator over audience strings.
pub struct AudienceIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for AudienceIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a AudienceSet {
	type IntoIter = AudienceIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		AudienceIter { inner: self.0.iter() }
	}
}
impl Serialize for AudienceSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for audience in self.0.iter() {
			seq.serialize_element(audience)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for AudienceSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		AudienceSet::new(values).map_err(DeError::custom)
	}
}
