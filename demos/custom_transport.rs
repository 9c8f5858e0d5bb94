//! Demonstrates plugging a custom HTTP client and mapper into [`SlackProvider`].
//!
//! 1. Implement [`ApiHttpClient`] with a handle that answers requests (here from canned Slack
//!    responses instead of the network).
//! 2. Provide a [`TransportErrorMapper`] for the client's own error type.
//! 3. Pass both to [`SlackProvider::with_http_client`] and run the usual steps; the Slack
//!    interceptor and the `missing_scope` recovery apply unchanged.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use slack_oauth2_login::{
	auth::{ProviderId, SLACK_PROVIDER_ID, TokenSecret},
	error::{Error, TransportError},
	flows::{ClientConfig, SlackProvider},
	http::{
		ApiHttpClient, TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
	provider::{Endpoint, ProviderDescriptor},
};

const TOKEN_BODY: &str = r#"{"ok":true,"authed_user":{"id":"U1","access_token":"xoxp-demo"}}"#;
const PROFILE_BODY: &str = r#"{"ok":true,"user":{"id":"U1","name":"Ann","email":"a@x.com","image_192":"https://img.example.com/ann.png"},"team":{"id":"T1"}}"#;
const MISSING_SCOPE_BODY: &str = r#"{"ok":false,"error":"missing_scope"}"#;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let descriptor = ProviderDescriptor::builder(ProviderId::new(SLACK_PROVIDER_ID)?)
		.authorization_endpoint(Url::parse("https://slack.example.com/oauth/v2/authorize")?)
		.token_endpoint(Url::parse("https://slack.example.com/api/oauth.v2.access")?)
		.identity_endpoint(Url::parse("https://slack.example.com/api/users.identity")?)
		.build()?;
	let config = ClientConfig::new("demo-client", "demo-secret", "https://app.example.com/callback");
	let provider: SlackProvider<CannedHttpClient, CannedErrorMapper> =
		SlackProvider::with_http_client(
			descriptor.clone(),
			config.clone(),
			CannedHttpClient { identity_body: PROFILE_BODY },
			CannedErrorMapper,
		);
	let token = provider
		.exchange_code("demo-code", None)
		.await?
		.ok_or_else(|| eyre!("The canned token response should carry a user token."))?;
	let identity = provider.map_profile(provider.fetch_profile(&token).await?);

	println!("Identity from the canned transport: {identity:#?}.");

	let narrow: SlackProvider<CannedHttpClient, CannedErrorMapper> =
		SlackProvider::with_http_client(
			descriptor,
			config,
			CannedHttpClient { identity_body: MISSING_SCOPE_BODY },
			CannedErrorMapper,
		);
	let raw = narrow.fetch_profile(&TokenSecret::new("xoxp-narrow")).await?;

	println!("Profile without identity scopes is empty: {}.", raw.is_empty());

	Ok(())
}

#[derive(Debug)]
struct CannedTransportError;
impl Display for CannedTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("No canned response for this request.")
	}
}
impl StdError for CannedTransportError {}

#[derive(Clone, Copy, Debug)]
struct CannedHttpClient {
	identity_body: &'static str,
}
impl ApiHttpClient for CannedHttpClient {
	type Handle = CannedHttpClient;
	type TransportError = CannedTransportError;

	fn handle(&self) -> Self::Handle {
		*self
	}
}
impl<'c> AsyncHttpClient<'c> for CannedHttpClient {
	type Error = HttpClientError<CannedTransportError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let body = match request.uri().path() {
			"/api/oauth.v2.access" => Some(TOKEN_BODY),
			"/api/users.identity" => Some(self.identity_body),
			_ => None,
		};

		Box::pin(async move {
			let body = body.ok_or_else(|| HttpClientError::Reqwest(Box::new(CannedTransportError)))?;

			Ok(HttpResponse::new(body.as_bytes().to_vec()))
		})
	}
}

struct CannedErrorMapper;
impl TransportErrorMapper<CannedTransportError> for CannedErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		error: HttpClientError<CannedTransportError>,
	) -> Error {
		TransportError::network(endpoint, error).into()
	}
}
