//! Sign in with Slack, one step per module.
//!
//! [`SlackProvider`] owns the shared [`ApiTransport`], the endpoint descriptor, the error
//! strategy, and the [`ClientConfig`]. The steps run strictly in order: build the authorize URL
//! ([`authorize`]), send the user away, then on the callback exchange the code
//! ([`SlackProvider::exchange_code`]), fetch `users.identity` ([`SlackProvider::fetch_profile`]),
//! and map the payload ([`SlackProvider::map_profile`]). [`session`] bundles the state/PKCE
//! bookkeeping and the end-to-end [`SlackProvider::complete_authorization`].

pub mod authorize;
pub mod config;
pub mod session;

mod common;
mod exchange;
mod profile;

pub use authorize::*;
pub use config::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::{Identity, ProviderId, RawProfile, SLACK_PROVIDER_ID, TokenSecret},
	http::{ApiHttpClient, ApiTransport, ResponseInterceptor, TransportErrorMapper},
	provider::{ProviderDescriptor, ProviderStrategy, SlackStrategy},
};
#[cfg(feature = "reqwest")]
use crate::{
	error::ConfigError,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
};

/// Boxed future returned by [`IdentityProvider`] methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestSlackProvider = SlackProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// The four login operations a host framework needs from a social-login provider.
///
/// Hosts that register several providers can hold `Arc<dyn IdentityProvider>` and stay unaware of
/// the transport behind each one.
pub trait IdentityProvider: Send + Sync {
	/// Identifier the host registers the provider under.
	fn provider_id(&self) -> &ProviderId;

	/// Builds the authorize URL; `state` and `pkce` are only emitted when the provider enables them.
	fn authorization_url(&self, state: Option<&str>, pkce: Option<&PkceChallenge>) -> Url;

	/// Exchanges an authorization code for the user access token, if the response carries one.
	fn exchange_code<'a>(
		&'a self,
		code: &'a str,
		code_verifier: Option<&'a str>,
	) -> ProviderFuture<'a, Option<TokenSecret>>;

	/// Fetches the raw profile for `access_token`.
	fn fetch_profile<'a>(&'a self, access_token: &'a TokenSecret) -> ProviderFuture<'a, RawProfile>;

	/// Normalizes a raw profile.
	fn map_profile(&self, raw: RawProfile) -> Identity;
}

/// Slack "Sign in with Slack" (OAuth 2.0 v2) client.
///
/// One instance serves any number of logins; it keeps no per-login state. The HTTP client is
/// created with the provider and shared by the token exchange and the identity fetch.
pub struct SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	transport: ApiTransport<C, M>,
	descriptor: ProviderDescriptor,
	strategy: Arc<dyn ProviderStrategy>,
	config: ClientConfig,
}
impl<C, M> SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Identifier Slack logins are registered under.
	pub const IDENTIFIER: &'static str = SLACK_PROVIDER_ID;

	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	///
	/// The transport comes with [`SlackApiErrorInterceptor`](crate::http::SlackApiErrorInterceptor)
	/// installed; push additional middleware with [`SlackProvider::with_interceptor`].
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			transport: ApiTransport::slack(http_client, mapper),
			descriptor,
			strategy: Arc::new(SlackStrategy),
			config,
		}
	}

	/// Replaces the strategy that decides which profile failures are recoverable.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Appends a response interceptor after the ones already installed.
	pub fn with_interceptor(mut self, interceptor: impl 'static + ResponseInterceptor) -> Self {
		self.transport = self.transport.with_interceptor(interceptor);

		self
	}

	/// Endpoint descriptor in use.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	/// Client configuration in use.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Shared transport used for every API call.
	pub fn transport(&self) -> &ApiTransport<C, M> {
		&self.transport
	}

	/// Normalizes a raw profile into an [`Identity`].
	pub fn map_profile(&self, raw: RawProfile) -> Identity {
		Identity::from_profile(raw)
	}
}
#[cfg(feature = "reqwest")]
impl SlackProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider for the production Slack endpoints.
	///
	/// The provider provisions its own reqwest client; use [`SlackProvider::with_http_client`] to
	/// supply a configured one (timeouts, proxies) or a different descriptor.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let descriptor = ProviderDescriptor::slack().map_err(ConfigError::from)?;

		Ok(Self::with_http_client(
			descriptor,
			config,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		))
	}
}
impl<C, M> IdentityProvider for SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn provider_id(&self) -> &ProviderId {
		&self.descriptor.id
	}

	fn authorization_url(&self, state: Option<&str>, pkce: Option<&PkceChallenge>) -> Url {
		SlackProvider::authorization_url(self, state, pkce)
	}

	fn exchange_code<'a>(
		&'a self,
		code: &'a str,
		code_verifier: Option<&'a str>,
	) -> ProviderFuture<'a, Option<TokenSecret>> {
		Box::pin(SlackProvider::exchange_code(self, code, code_verifier))
	}

	fn fetch_profile<'a>(&'a self, access_token: &'a TokenSecret) -> ProviderFuture<'a, RawProfile> {
		Box::pin(SlackProvider::fetch_profile(self, access_token))
	}

	fn map_profile(&self, raw: RawProfile) -> Identity {
		SlackProvider::map_profile(self, raw)
	}
}
impl<C, M> Clone for SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			descriptor: self.descriptor.clone(),
			strategy: self.strategy.clone(),
			config: self.config.clone(),
		}
	}
}
impl<C, M> Debug for SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SlackProvider")
			.field("descriptor", &self.descriptor)
			.field("config", &self.config)
			.field("transport", &self.transport)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::_preludet::{build_reqwest_test_provider, mock_slack_descriptor};

	fn config() -> ClientConfig {
		ClientConfig::new("client-unit", "secret-unit", "https://app.example.com/cb")
	}

	async fn exchange_with_body(body: &'static str) -> Result<Option<String>> {
		let server = MockServer::start_async().await;
		let provider =
			build_reqwest_test_provider(mock_slack_descriptor(&server.base_url()), config());
		let mock = server
			.mock_async(|when, then| {
				when.method(POST).path("/api/oauth.v2.access");
				then.status(200).header("content-type", "application/json").body(body);
			})
			.await;
		let token = provider.exchange_code("code-unit", None).await;

		mock.assert_async().await;

		token.map(|token| token.map(|t| t.expose().to_owned()))
	}

	#[tokio::test]
	async fn reqwest_provider_shares_one_transport_for_both_calls() {
		let server = MockServer::start_async().await;
		let provider =
			build_reqwest_test_provider(mock_slack_descriptor(&server.base_url()), config());
		let token_mock = server
			.mock_async(|when, then| {
				when.method(POST).path("/api/oauth.v2.access");
				then.status(200).body(r#"{"ok":1,"authed_user":{"access_token":"xoxp-unit"}}"#);
			})
			.await;
		let identity_mock = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/api/users.identity")
					.header("authorization", "Bearer xoxp-unit");
				then.status(200).body(r#"{"ok":true,"user":{"id":"U9"},"team":{"id":"T9"}}"#);
			})
			.await;
		let token = provider
			.exchange_code("code-unit", None)
			.await
			.expect("Exchange should succeed.")
			.expect("Token should be present.");
		let identity = provider.map_profile(
			provider.fetch_profile(&token).await.expect("Profile fetch should succeed."),
		);

		token_mock.assert_async().await;
		identity_mock.assert_async().await;

		assert_eq!(identity.id.as_deref(), Some("U9"));
		assert_eq!(identity.organization_id.as_deref(), Some("T9"));
		assert_eq!(provider.transport().interceptor_count(), 1);
		assert_eq!(provider.descriptor().endpoints.token.path(), "/api/oauth.v2.access");
	}

	#[tokio::test]
	async fn exchange_returns_t1_for_minimal_body() {
		let token = exchange_with_body(r#"{"authed_user":{"access_token":"T1"}}"#)
			.await
			.expect("A body without `ok` should not be rejected.");

		assert_eq!(token.as_deref(), Some("T1"));
	}

	#[tokio::test]
	async fn exchange_returns_none_for_body_without_path() {
		let token = exchange_with_body("{}").await.expect("An empty object is a valid response.");

		assert!(token.is_none());
	}

	#[test]
	fn code_fields_send_redirect_uri_as_configured() {
		let provider = build_reqwest_test_provider(
			mock_slack_descriptor("http://127.0.0.1:1"),
			ClientConfig::new("client-unit", "secret-unit", "https://app.example.com"),
		);
		let fields = provider.code_fields("code-unit", None);

		assert!(fields.contains(&("redirect_uri", "https://app.example.com")));
		assert!(
			provider
				.authorization_url(None, None)
				.as_str()
				.contains("redirect_uri=https%3A%2F%2Fapp.example.com&")
		);
	}

	#[test]
	fn debug_output_redacts_client_secret() {
		let provider =
			build_reqwest_test_provider(mock_slack_descriptor("http://127.0.0.1:1"), config());
		let rendered = format!("{provider:?}");

		assert!(rendered.contains("SlackProvider"));
		assert!(!rendered.contains("secret-unit"));
	}
}
