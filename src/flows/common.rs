//! Request builders and body decoding shared by the network steps.

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, DecodeError},
	provider::Endpoint,
};

const APPLICATION_JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Builds a form-encoded POST that asks for a JSON response.
pub(crate) fn form_post<'a, I>(url: &Url, fields: I) -> Result<HttpRequest>
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(fields).finish();

	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(ACCEPT, APPLICATION_JSON)
		.header(CONTENT_TYPE, FORM_URLENCODED)
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

/// Builds a GET authenticated with `token` as a bearer credential.
pub(crate) fn bearer_get(url: &Url, token: &TokenSecret) -> Result<HttpRequest> {
	Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(ACCEPT, APPLICATION_JSON)
		.header(AUTHORIZATION, format!("Bearer {}", token.expose()))
		.body(Vec::new())
		.map_err(|e| ConfigError::from(e).into())
}

/// Decodes a JSON body, reporting the failing path on mismatch.
pub(crate) fn decode_json<T>(endpoint: Endpoint, response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		DecodeError::Json { endpoint, status: response.status().as_u16(), source }.into()
	})
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::Response;
	// self
	use super::*;

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("URL fixture should parse.")
	}

	#[test]
	fn form_post_encodes_fields_in_order() {
		let request = form_post(
			&url("https://slack.com/api/oauth.v2.access"),
			[("code", "a b"), ("redirect_uri", "https://app.example.com/cb")],
		)
		.expect("Form request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.headers()[CONTENT_TYPE], FORM_URLENCODED);
		assert_eq!(request.headers()[ACCEPT], APPLICATION_JSON);
		assert_eq!(request.body(), b"code=a+b&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb");
	}

	#[test]
	fn bearer_get_sets_authorization() {
		let request =
			bearer_get(&url("https://slack.com/api/users.identity"), &TokenSecret::new("xoxp-1"))
				.expect("Bearer request should build.");

		assert_eq!(request.method(), Method::GET);
		assert_eq!(request.headers()[AUTHORIZATION], "Bearer xoxp-1");
		assert!(request.body().is_empty());
	}

	#[test]
	fn decode_errors_report_endpoint_and_status() {
		let response = Response::new(b"[1,2]".to_vec());
		let err = decode_json::<JsonMap<String, JsonValue>>(Endpoint::Identity, &response)
			.expect_err("Arrays are not profiles.");

		assert!(matches!(
			err,
			Error::Decode(DecodeError::Json { endpoint: Endpoint::Identity, status: 200, .. })
		));
	}
}
