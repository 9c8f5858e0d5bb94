//! Sign in with Slack over OAuth 2.0 v2.
//!
//! The crate builds authorize URLs, exchanges the callback code for a user token, fetches
//! `users.identity`, and maps the payload into a normalized [`auth::Identity`]. Every API call
//! goes through [`http::ApiTransport`], a pluggable HTTP client with response interceptors.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod json;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ProviderId, SLACK_PROVIDER_ID},
		flows::{ClientConfig, ReqwestSlackProvider, SlackProvider},
		http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
		provider::ProviderDescriptor,
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor whose endpoints mirror Slack's paths under `base`.
	pub fn mock_slack_descriptor(base: &str) -> ProviderDescriptor {
		let base = base.trim_end_matches('/');
		let parse = |path: &str| {
			Url::parse(&format!("{base}{path}")).expect("Mock endpoint URL should parse.")
		};

		let id = ProviderId::new(SLACK_PROVIDER_ID).expect("Slack provider id should be valid.");

		ProviderDescriptor::builder(id)
			.authorization_endpoint(parse("/oauth/v2/authorize"))
			.token_endpoint(parse("/api/oauth.v2.access"))
			.identity_endpoint(parse("/api/users.identity"))
			.scope_delimiter(',')
			.build()
			.expect("Mock Slack descriptor should build successfully.")
	}

	/// Constructs a [`SlackProvider`] backed by the insecure test transport.
	pub fn build_reqwest_test_provider(
		descriptor: ProviderDescriptor,
		config: ClientConfig,
	) -> ReqwestSlackProvider {
		SlackProvider::with_http_client(
			descriptor,
			config,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
