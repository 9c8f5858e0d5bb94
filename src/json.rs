//! Dotted-path lookups over JSON trees.
//!
//! Slack nests the fields this crate consumes (`authed_user.access_token`, `user.image_192`,
//! `team.id`), so every read goes through [`get`], which returns `None` as soon as an
//! intermediate key is missing or an intermediate value is not an object.

// self
use crate::_prelude::*;

/// Resolves `path` (segments separated by `.`) against `value`.
///
/// A key that literally contains the full dotted path wins over the nested interpretation, and an
/// empty path returns `value` itself.
pub fn get<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
	if path.is_empty() {
		return Some(value);
	}

	get_in(value.as_object()?, path)
}

/// Same as [`get`], starting from an object.
pub fn get_in<'a>(object: &'a JsonMap<String, JsonValue>, path: &str) -> Option<&'a JsonValue> {
	if let Some(hit) = object.get(path) {
		return Some(hit);
	}

	let mut segments = path.split('.');
	let mut current = object.get(segments.next()?)?;

	for segment in segments {
		current = current.as_object()?.get(segment)?;
	}

	Some(current)
}

/// Resolves `path` and returns the value only when it is a JSON string.
pub fn get_str<'a>(value: &'a JsonValue, path: &str) -> Option<&'a str> {
	get(value, path).and_then(JsonValue::as_str)
}

/// Loose truthiness used for Slack's `ok` envelope flag.
///
/// `null`, `false`, `0`, `""`, `"0"`, and empty arrays/objects are falsy.
pub fn is_truthy(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null => false,
		JsonValue::Bool(b) => *b,
		JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		JsonValue::String(s) => !s.is_empty() && s != "0",
		JsonValue::Array(items) => !items.is_empty(),
		JsonValue::Object(map) => !map.is_empty(),
	}
}
