//! Authorization code exchange against `oauth.v2.access`.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::{SlackProvider, common},
	http::{ApiHttpClient, RequestOptions, TransportErrorMapper},
	json,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::Endpoint,
};

const ACCESS_TOKEN_PATH: &str = "authed_user.access_token";

impl<C, M> SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges an authorization code for the user access token.
	///
	/// Returns `Ok(None)` when the response has no string at `authed_user.access_token`; whether
	/// that is fatal is the caller's decision. Transport failures, including `ok: false` bodies,
	/// propagate as [`Error::Transport`].
	pub async fn exchange_code(
		&self,
		code: &str,
		code_verifier: Option<&str>,
	) -> Result<Option<TokenSecret>> {
		const KIND: FlowKind = FlowKind::TokenExchange;

		let span = FlowSpan::new(KIND, "exchange_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = common::form_post(
					&self.descriptor().endpoints.token,
					self.code_fields(code, code_verifier),
				)?;
				let response =
					self.transport().execute(Endpoint::Token, request, RequestOptions::strict()).await?;
				let body = common::decode_json::<JsonValue>(Endpoint::Token, &response)?;

				Ok(json::get_str(&body, ACCESS_TOKEN_PATH).map(TokenSecret::new))
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Form fields sent to the token endpoint.
	pub fn code_fields<'a>(
		&'a self,
		code: &'a str,
		code_verifier: Option<&'a str>,
	) -> Vec<(&'a str, &'a str)> {
		let config = self.config();
		let mut fields = vec![
			("grant_type", "authorization_code"),
			("client_id", config.client_id.as_str()),
			("client_secret", config.client_secret.expose()),
			("code", code),
			("redirect_uri", config.redirect_uri.as_str()),
		];

		if let Some(verifier) = code_verifier {
			fields.push(("code_verifier", verifier));
		}

		fields
	}
}
