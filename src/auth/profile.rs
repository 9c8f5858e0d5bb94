//! Raw identity payloads returned by `users.identity`.

// self
use crate::{_prelude::*, json};

/// Decoded JSON object returned by the identity endpoint.
///
/// Empty when the endpoint reported `missing_scope`; the token was valid but lacked the
/// `identity.*` scopes needed to read the profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProfile(JsonMap<String, JsonValue>);
impl RawProfile {
	/// Wraps an already-decoded JSON object.
	pub fn new(fields: JsonMap<String, JsonValue>) -> Self {
		Self(fields)
	}

	/// Empty profile used for the `missing_scope` recovery path.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Returns true when no fields were returned.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Dotted-path lookup (e.g. `user.image_192`).
	pub fn get(&self, path: &str) -> Option<&JsonValue> {
		json::get_in(&self.0, path)
	}

	/// Dotted-path lookup that only yields JSON strings.
	pub fn get_str(&self, path: &str) -> Option<&str> {
		self.get(path).and_then(JsonValue::as_str)
	}

	/// Borrows the underlying JSON object.
	pub fn as_map(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}

	/// Consumes the profile and returns the underlying JSON object.
	pub fn into_inner(self) -> JsonMap<String, JsonValue> {
		self.0
	}
}
impl From<JsonMap<String, JsonValue>> for RawProfile {
	fn from(value: JsonMap<String, JsonValue>) -> Self {
		Self(value)
	}
}
impl TryFrom<JsonValue> for RawProfile {
	type Error = JsonValue;

	fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
		match value {
			JsonValue::Object(map) => Ok(Self(map)),
			other => Err(other),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_json_objects_become_profiles() {
		let profile = RawProfile::try_from(serde_json::json!({"user":{"id":"U1"},"team":{"id":"T1"}}))
			.expect("Objects should convert.");

		assert_eq!(profile.get_str("user.id"), Some("U1"));
		assert_eq!(profile.as_map().len(), 2);
		assert!(profile.as_map().contains_key("team"));
		assert!(RawProfile::try_from(serde_json::json!(["U1"])).is_err());
		assert!(RawProfile::empty().is_empty());
	}

	#[test]
	fn into_inner_returns_the_decoded_object() {
		let mut fields = JsonMap::new();

		fields.insert("ok".into(), JsonValue::Bool(true));

		let profile = RawProfile::from(fields.clone());

		assert_eq!(profile.get("ok"), Some(&JsonValue::Bool(true)));
		assert_eq!(profile.into_inner(), fields);
	}
}
