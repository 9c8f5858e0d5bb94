//! Client settings supplied by the host application.

// crates.io
use serde::{
	de::{MapAccess, Visitor},
	ser::SerializeMap,
};
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenSecret},
};

/// Slack app credentials plus the per-app authorize options.
///
/// Deserializes from configuration files; only `client_id`, `client_secret`, and `redirect_uri`
/// are required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Slack app client id.
	pub client_id: String,
	/// Slack app client secret (redacted in `Debug`).
	pub client_secret: TokenSecret,
	/// Redirect URI registered with the Slack app.
	///
	/// Sent exactly as configured; Slack compares it byte for byte with the registered value.
	pub redirect_uri: String,
	/// App (bot) scopes sent as `scope`.
	#[serde(default)]
	pub scopes: ScopeSet,
	/// User scopes sent as `user_scope`.
	#[serde(default)]
	pub user_scopes: ScopeSet,
	/// Emit and verify a CSRF `state` parameter.
	#[serde(default = "default_use_state")]
	pub use_state: bool,
	/// Emit a PKCE challenge and send the verifier during the exchange.
	#[serde(default)]
	pub use_pkce: bool,
	/// Extra authorize parameters; they override built-in parameters with the same name.
	#[serde(default)]
	pub extra_params: ExtraParams,
}
impl ClientConfig {
	/// Creates a config with state enabled, PKCE disabled, and no scopes.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			redirect_uri: redirect_uri.into(),
			scopes: ScopeSet::default(),
			user_scopes: ScopeSet::default(),
			use_state: default_use_state(),
			use_pkce: false,
			extra_params: ExtraParams::default(),
		}
	}

	/// Replaces the app scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = ScopeSet::new(scopes);

		self
	}

	/// Replaces the user scopes.
	pub fn with_user_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.user_scopes = ScopeSet::new(scopes);

		self
	}

	/// Enables or disables the CSRF `state` parameter.
	pub fn with_state(mut self, enabled: bool) -> Self {
		self.use_state = enabled;

		self
	}

	/// Enables or disables PKCE.
	pub fn with_pkce(mut self, enabled: bool) -> Self {
		self.use_pkce = enabled;

		self
	}

	/// Adds (or replaces) an extra authorize parameter.
	pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_params.insert(key.into(), value.into());

		self
	}
}

fn default_use_state() -> bool {
	true
}

/// Extra authorize parameters in insertion order.
///
/// Inserting an existing key replaces its value without moving it. Serializes as a map and keeps
/// the document order when deserialized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtraParams(Vec<(String, String)>);
impl ExtraParams {
	/// Inserts `key`, replacing the value in place when it already exists.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		match self.0.iter_mut().find(|(existing, _)| *existing == key) {
			Some(slot) => slot.1 = value,
			None => self.0.push((key, value)),
		}
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	/// Iterates over the parameters in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no parameters are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> Extend<(K, V)> for ExtraParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = (K, V)>,
	{
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}
impl<K, V> FromIterator<(K, V)> for ExtraParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut params = Self::default();

		params.extend(iter);

		params
	}
}
impl Serialize for ExtraParams {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.0.len()))?;

		for (key, value) in &self.0 {
			map.serialize_entry(key, value)?;
		}

		map.end()
	}
}
impl<'de> Deserialize<'de> for ExtraParams {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		struct ExtraParamsVisitor;
		impl<'de> Visitor<'de> for ExtraParamsVisitor {
			type Value = ExtraParams;

			fn expecting(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("a map of string parameters")
			}

			fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
			where
				A: MapAccess<'de>,
			{
				let mut params = ExtraParams::default();

				while let Some((key, value)) = access.next_entry::<String, String>()? {
					params.insert(key, value);
				}

				Ok(params)
			}
		}

		deserializer.deserialize_map(ExtraParamsVisitor)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn minimal_config_deserializes_with_defaults() {
		let config: ClientConfig = serde_json::from_str(
			r#"{"client_id":"123.456","client_secret":"shh","redirect_uri":"https://app.example.com/cb"}"#,
		)
		.expect("Minimal config should deserialize.");

		assert!(config.use_state);
		assert!(!config.use_pkce);
		assert!(config.scopes.is_empty() && config.user_scopes.is_empty());
		assert_eq!(config.redirect_uri, "https://app.example.com/cb");
		assert!(config.extra_params.is_empty());
		assert!(!format!("{config:?}").contains("shh"));
	}

	#[test]
	fn redirect_uri_is_kept_as_configured() {
		let config = ClientConfig::new("id", "secret", "https://app.example.com");

		assert_eq!(config.redirect_uri, "https://app.example.com");

		let config: ClientConfig = serde_json::from_str(
			r#"{"client_id":"id","client_secret":"s","redirect_uri":"https://app.example.com"}"#,
		)
		.expect("Config should deserialize.");

		assert_eq!(config.redirect_uri, "https://app.example.com");
	}

	#[test]
	fn extra_params_keep_insertion_order() {
		let mut params = ExtraParams::default();

		params.insert("zeta", "1");
		params.insert("alpha", "2");
		params.insert("zeta", "3");

		assert_eq!(params.iter().collect::<Vec<_>>(), [("zeta", "3"), ("alpha", "2")]);
		assert_eq!(params.len(), 2);
		assert_eq!(params.get("alpha"), Some("2"));
		assert_eq!(params.get("missing"), None);
	}

	#[test]
	fn extra_params_deserialize_in_document_order() {
		let params: ExtraParams = serde_json::from_str(r#"{"zeta":"1","alpha":"2","mid":"3"}"#)
			.expect("Extra params should deserialize.");

		assert_eq!(params.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
		assert_eq!(
			serde_json::to_string(&params).expect("Extra params should serialize."),
			r#"{"zeta":"1","alpha":"2","mid":"3"}"#
		);
		assert!(serde_json::from_str::<ExtraParams>(r#"["zeta"]"#).is_err());
	}

	#[test]
	fn setters_replace_fields() {
		let config = ClientConfig::new("id", "secret", "https://app.example.com/cb")
			.with_scopes(["chat:write"])
			.with_user_scopes(["identity.basic", "identity.basic"])
			.with_state(false)
			.with_pkce(true)
			.with_extra_param("team", "T1");

		assert_eq!(config.scopes.as_slice(), ["chat:write"]);
		assert_eq!(config.user_scopes.as_slice(), ["identity.basic"]);
		assert!(!config.use_state);
		assert!(config.use_pkce);
		assert_eq!(config.extra_params.get("team"), Some("T1"));
	}
}
