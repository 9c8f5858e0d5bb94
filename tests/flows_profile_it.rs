#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use slack_oauth2_login::{
	_preludet::*,
	auth::TokenSecret,
	error::{DecodeError, TransportError},
	flows::{ClientConfig, ReqwestSlackProvider},
	provider::Endpoint,
};

const CLIENT_ID: &str = "client-profile";
const CLIENT_SECRET: &str = "secret-profile";
const IDENTITY_PATH: &str = "/api/users.identity";
const PROFILE_BODY: &str = r#"{"ok":true,"user":{"id":"U1","name":"Ann","email":"a@x.com","image_192":"http://img"},"team":{"id":"T1"}}"#;

fn build_provider(server: &MockServer) -> ReqwestSlackProvider {
	let config = ClientConfig::new(CLIENT_ID, CLIENT_SECRET, "https://app.example.com/callback");

	build_reqwest_test_provider(mock_slack_descriptor(&server.base_url()), config)
}

#[tokio::test]
async fn profile_fetch_sends_bearer_and_maps_identity() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(IDENTITY_PATH)
				.header("authorization", "Bearer xoxp-user")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;
	let raw = provider
		.fetch_profile(&TokenSecret::new("xoxp-user"))
		.await
		.expect("Profile fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(raw.get_str("user.email"), Some("a@x.com"));

	let identity = provider.map_profile(raw.clone());

	assert_eq!(identity.id.as_deref(), Some("U1"));
	assert_eq!(identity.name.as_deref(), Some("Ann"));
	assert_eq!(identity.email.as_deref(), Some("a@x.com"));
	assert_eq!(identity.avatar_url.as_deref(), Some("http://img"));
	assert_eq!(identity.organization_id.as_deref(), Some("T1"));
	assert_eq!(identity.raw, raw);
}

#[tokio::test]
async fn missing_scope_yields_empty_profile() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(IDENTITY_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"ok":false,"error":"missing_scope","needed":"identity.basic"}"#);
		})
		.await;
	let raw = provider
		.fetch_profile(&TokenSecret::new("xoxp-user"))
		.await
		.expect("missing_scope must be recovered.");

	mock.assert_async().await;

	assert!(raw.is_empty());

	let identity = provider.map_profile(raw);

	assert!(identity.id.is_none() && identity.email.is_none() && identity.organization_id.is_none());
	assert!(identity.raw.is_empty());
}

#[tokio::test]
async fn missing_scope_on_error_status_is_recovered_too() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(IDENTITY_PATH);
			then.status(403)
				.header("content-type", "application/json")
				.body(r#"{"ok":false,"error":"missing_scope"}"#);
		})
		.await;
	let raw = provider
		.fetch_profile(&TokenSecret::new("xoxp-user"))
		.await
		.expect("missing_scope must be recovered regardless of status.");

	mock.assert_async().await;

	assert!(raw.is_empty());
}

#[tokio::test]
async fn other_api_errors_propagate() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(IDENTITY_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"ok":false,"error":"invalid_auth"}"#);
		})
		.await;
	let err = provider
		.fetch_profile(&TokenSecret::new("xoxp-revoked"))
		.await
		.expect_err("invalid_auth must propagate.");

	mock.assert_async().await;

	match &err {
		Error::Transport(TransportError::Api { error, exchange, .. }) => {
			assert_eq!(error, "invalid_auth");
			assert_eq!(
				exchange.request.headers.get("authorization").map(|v| v.as_bytes()),
				Some(&b"<redacted>"[..])
			);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
	assert!(!format!("{err:?}").contains("xoxp-revoked"));
}

#[tokio::test]
async fn non_json_bodies_fail_to_decode() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(IDENTITY_PATH);
			then.status(200).body("<html>maintenance</html>");
		})
		.await;
	let err = provider
		.fetch_profile(&TokenSecret::new("xoxp-user"))
		.await
		.expect_err("HTML must not become a profile.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Decode(DecodeError::Json { endpoint: Endpoint::Identity, status: 200, .. })
	));
}

#[tokio::test]
async fn bodies_without_ok_are_accepted() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(IDENTITY_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"user":{"id":"U1"},"team":{"id":"T1"}}"#);
		})
		.await;
	let raw = provider
		.fetch_profile(&TokenSecret::new("xoxp-user"))
		.await
		.expect("A body without `ok` should not be rejected.");

	mock.assert_async().await;

	let identity = provider.map_profile(raw);

	assert_eq!(identity.id.as_deref(), Some("U1"));
	assert_eq!(identity.organization_id.as_deref(), Some("T1"));
}

#[tokio::test]
async fn unreachable_endpoints_are_network_errors() {
	let config = ClientConfig::new(CLIENT_ID, CLIENT_SECRET, "https://app.example.com/callback");
	let provider = build_reqwest_test_provider(mock_slack_descriptor("http://127.0.0.1:1"), config);
	let err = provider
		.fetch_profile(&TokenSecret::new("xoxp-user"))
		.await
		.expect_err("Nothing listens on port 1.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert!(err.response().is_none());
}
