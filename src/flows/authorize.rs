//! Authorize URL construction.
//!
//! Parameters are emitted in a fixed order (`client_id`, `redirect_uri`, `scope`, `user_scope`,
//! `response_type`, `granular_bot_scope`, then `state` and the PKCE pair when present). Extra
//! parameters are merged last: a key that matches a built-in parameter replaces its value in
//! place, anything else is appended.

// self
use crate::{
	_prelude::*,
	auth::ScopeSet,
	flows::{ExtraParams, SlackProvider},
	http::{ApiHttpClient, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// User scopes requested when neither app nor user scopes are configured.
pub const DEFAULT_USER_SCOPES: [&str; 4] =
	["identity.basic", "identity.email", "identity.team", "identity.avatar"];

/// Supported PKCE challenge methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Public half of a PKCE pair: the challenge and how it was derived.
///
/// Keeping both in one value means a URL never carries one without the other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkceChallenge {
	/// Encoded challenge.
	pub challenge: String,
	/// Derivation method.
	pub method: PkceCodeChallengeMethod,
}
impl PkceChallenge {
	/// Wraps an already-computed challenge.
	pub fn new(challenge: impl Into<String>, method: PkceCodeChallengeMethod) -> Self {
		Self { challenge: challenge.into(), method }
	}
}

/// Immutable description of one authorize redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	client_id: String,
	redirect_uri: String,
	scopes: ScopeSet,
	user_scopes: ScopeSet,
	state: Option<String>,
	pkce: Option<PkceChallenge>,
	extra_params: ExtraParams,
}
impl AuthorizationRequest {
	/// Starts a builder for the given client and redirect URI.
	pub fn builder(
		client_id: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> AuthorizationRequestBuilder {
		AuthorizationRequestBuilder::new(client_id, redirect_uri)
	}

	/// Client id.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Redirect URI, exactly as configured.
	pub fn redirect_uri(&self) -> &str {
		&self.redirect_uri
	}

	/// App scopes.
	pub fn scopes(&self) -> &ScopeSet {
		&self.scopes
	}

	/// User scopes, after default substitution.
	pub fn user_scopes(&self) -> &ScopeSet {
		&self.user_scopes
	}

	/// CSRF state, when enabled.
	pub fn state(&self) -> Option<&str> {
		self.state.as_deref()
	}

	/// PKCE challenge, when enabled.
	pub fn pkce(&self) -> Option<&PkceChallenge> {
		self.pkce.as_ref()
	}

	/// Extra parameters in insertion order.
	pub fn extra_params(&self) -> &ExtraParams {
		&self.extra_params
	}

	/// Query parameters in emission order, with scopes joined by `delimiter`.
	pub fn query_pairs(&self, delimiter: char) -> Vec<(String, String)> {
		let mut pairs = vec![
			("client_id".to_owned(), self.client_id.clone()),
			("redirect_uri".to_owned(), self.redirect_uri.clone()),
			("scope".to_owned(), self.scopes.join(delimiter)),
			("user_scope".to_owned(), self.user_scopes.join(delimiter)),
			("response_type".to_owned(), "code".to_owned()),
			("granular_bot_scope".to_owned(), "true".to_owned()),
		];

		if let Some(state) = &self.state {
			pairs.push(("state".into(), state.clone()));
		}
		if let Some(pkce) = &self.pkce {
			pairs.push(("code_challenge".into(), pkce.challenge.clone()));
			pairs.push(("code_challenge_method".into(), pkce.method.as_str().into()));
		}

		for (key, value) in self.extra_params.iter() {
			match pairs.iter_mut().find(|(existing, _)| existing == key) {
				Some(slot) => slot.1 = value.to_owned(),
				None => pairs.push((key.to_owned(), value.to_owned())),
			}
		}

		pairs
	}

	/// Appends the query parameters to `endpoint`.
	pub fn to_url(&self, endpoint: &Url, delimiter: char) -> Url {
		let mut url = endpoint.clone();

		url.query_pairs_mut().extend_pairs(self.query_pairs(delimiter));

		url
	}
}

/// Builder for [`AuthorizationRequest`].
#[derive(Clone, Debug)]
pub struct AuthorizationRequestBuilder {
	request: AuthorizationRequest,
}
impl AuthorizationRequestBuilder {
	/// Creates a builder with no scopes, no state, and no PKCE.
	pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
		Self {
			request: AuthorizationRequest {
				client_id: client_id.into(),
				redirect_uri: redirect_uri.into(),
				scopes: ScopeSet::default(),
				user_scopes: ScopeSet::default(),
				state: None,
				pkce: None,
				extra_params: ExtraParams::default(),
			},
		}
	}

	/// Sets the app scopes.
	pub fn scopes(mut self, scopes: ScopeSet) -> Self {
		self.request.scopes = scopes;

		self
	}

	/// Sets the user scopes.
	pub fn user_scopes(mut self, scopes: ScopeSet) -> Self {
		self.request.user_scopes = scopes;

		self
	}

	/// Sets (or clears) the CSRF state.
	pub fn state(mut self, state: Option<String>) -> Self {
		self.request.state = state;

		self
	}

	/// Sets (or clears) the PKCE challenge.
	pub fn pkce(mut self, pkce: Option<PkceChallenge>) -> Self {
		self.request.pkce = pkce;

		self
	}

	/// Adds (or replaces) one extra parameter.
	pub fn extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.request.extra_params.insert(key, value);

		self
	}

	/// Adds (or replaces) several extra parameters.
	pub fn extra_params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.request.extra_params.extend(params);

		self
	}

	/// Finalizes the request, substituting [`DEFAULT_USER_SCOPES`] when both scope sets are empty.
	pub fn build(self) -> AuthorizationRequest {
		let mut request = self.request;

		if request.scopes.is_empty() && request.user_scopes.is_empty() {
			request.user_scopes = ScopeSet::new(DEFAULT_USER_SCOPES);
		}

		request
	}
}

impl<C, M> SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the request described by the client config.
	///
	/// `state` is dropped unless [`ClientConfig::use_state`](crate::flows::ClientConfig::use_state)
	/// is set, and `pkce` unless [`ClientConfig::use_pkce`](crate::flows::ClientConfig::use_pkce)
	/// is set.
	pub fn authorization_request(
		&self,
		state: Option<&str>,
		pkce: Option<&PkceChallenge>,
	) -> AuthorizationRequest {
		let config = self.config();

		AuthorizationRequest::builder(config.client_id.clone(), config.redirect_uri.clone())
			.scopes(config.scopes.clone())
			.user_scopes(config.user_scopes.clone())
			.state(state.filter(|_| config.use_state).map(ToOwned::to_owned))
			.pkce(pkce.filter(|_| config.use_pkce).cloned())
			.extra_params(config.extra_params.iter())
			.build()
	}

	/// Builds the authorize URL users are redirected to.
	pub fn authorization_url(&self, state: Option<&str>, pkce: Option<&PkceChallenge>) -> Url {
		const KIND: FlowKind = FlowKind::Authorize;

		let _guard = FlowSpan::new(KIND, "authorization_url").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let descriptor = self.descriptor();
		let url = self
			.authorization_request(state, pkce)
			.to_url(&descriptor.endpoints.authorization, descriptor.quirks.scope_delimiter);

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		url
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn redirect() -> &'static str {
		"https://app.example.com/callback"
	}

	fn endpoint() -> Url {
		Url::parse("https://slack.com/oauth/v2/authorize").expect("Endpoint URL should parse.")
	}

	fn pair<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
		pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	#[test]
	fn default_user_scopes_fill_empty_sets() {
		let pairs = AuthorizationRequest::builder("cid", redirect()).build().query_pairs(',');

		assert_eq!(pair(&pairs, "scope"), Some(""));
		assert_eq!(
			pair(&pairs, "user_scope"),
			Some("identity.basic,identity.email,identity.team,identity.avatar")
		);
	}

	#[test]
	fn app_scopes_alone_suppress_defaults() {
		let request = AuthorizationRequest::builder("cid", redirect())
			.scopes(ScopeSet::new(["chat:write"]))
			.build();

		assert!(request.user_scopes().is_empty());
		assert_eq!(pair(&request.query_pairs(','), "user_scope"), Some(""));
	}

	#[test]
	fn parameters_follow_fixed_order() {
		let pairs = AuthorizationRequest::builder("cid", redirect())
			.user_scopes(ScopeSet::new(["identity.basic"]))
			.state(Some("s".into()))
			.pkce(Some(PkceChallenge::new("c", PkceCodeChallengeMethod::S256)))
			.build()
			.query_pairs(' ');
		let keys = pairs.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>();

		assert_eq!(
			keys,
			[
				"client_id",
				"redirect_uri",
				"scope",
				"user_scope",
				"response_type",
				"granular_bot_scope",
				"state",
				"code_challenge",
				"code_challenge_method",
			]
		);
		assert_eq!(pair(&pairs, "redirect_uri"), Some("https://app.example.com/callback"));
		assert_eq!(pair(&pairs, "code_challenge_method"), Some("S256"));
	}

	#[test]
	fn extras_override_in_place_and_append() {
		let pairs = AuthorizationRequest::builder("cid", redirect())
			.extra_param("response_type", "token")
			.extra_param("team", "T1")
			.build()
			.query_pairs(',');

		assert_eq!(pairs[4], ("response_type".into(), "token".into()));
		assert_eq!(pairs.last(), Some(&("team".into(), "T1".into())));
		assert_eq!(pairs.iter().filter(|(k, _)| k == "response_type").count(), 1);
	}

	#[test]
	fn new_extras_are_appended_in_insertion_order() {
		let request = AuthorizationRequest::builder("cid", redirect())
			.extra_param("zeta", "1")
			.extra_params([("alpha", "2"), ("state", "override"), ("zeta", "3")])
			.state(Some("s".into()))
			.build();
		let pairs = request.query_pairs(',');
		let tail = pairs[pairs.len() - 2..].iter().map(|(k, v)| (k.as_str(), v.as_str()));

		assert_eq!(tail.collect::<Vec<_>>(), [("zeta", "3"), ("alpha", "2")]);
		assert_eq!(pair(&pairs, "state"), Some("override"));
		assert_eq!(request.extra_params().len(), 3);
	}

	#[test]
	fn redirect_uri_is_emitted_as_configured() {
		let request = AuthorizationRequest::builder("cid", "https://app.example.com").build();

		assert_eq!(request.redirect_uri(), "https://app.example.com");
		assert_eq!(pair(&request.query_pairs(','), "redirect_uri"), Some("https://app.example.com"));
		assert!(
			request
				.to_url(&endpoint(), ',')
				.as_str()
				.contains("redirect_uri=https%3A%2F%2Fapp.example.com&")
		);
	}

	#[test]
	fn to_url_encodes_pairs() {
		let url = AuthorizationRequest::builder("cid", redirect())
			.state(Some("abc".into()))
			.build()
			.to_url(&endpoint(), ',');

		assert_eq!(url.path(), "/oauth/v2/authorize");
		assert!(url.as_str().contains(
			"user_scope=identity.basic%2Cidentity.email%2Cidentity.team%2Cidentity.avatar"
		));
		assert!(url.as_str().contains("granular_bot_scope=true&state=abc"));
		assert!(url.as_str().contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback"));
	}
}
