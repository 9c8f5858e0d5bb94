//! Provider strategy hooks that classify upstream failures.
//!
//! Implementations decide which failures a flow may absorb without tying flows to any particular
//! HTTP client.

// self
use crate::{_prelude::*, error::TransportError, provider::Endpoint};

/// Slack `error` code returned when a token lacks the `identity.*` scopes.
pub const MISSING_SCOPE: &str = "missing_scope";

/// Strategy hook that allows providers to classify errors.
///
/// Implementors are required to be `Send + Sync`, and the hooks use crate-owned data types so
/// downstream crates never depend on reqwest-specific structures.
pub trait ProviderStrategy: Send + Sync {
	/// Classifies a failed identity fetch.
	fn classify_profile_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// The token is valid but may not read the profile; continue with an empty profile.
	MissingScope,
	/// Surface the error to the caller.
	Fatal,
}

/// Context passed to provider strategies when classifying errors.
///
/// The struct keeps only primitive data (status code, Slack `error` field) so strategies stay
/// decoupled from any HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Endpoint associated with the failing request.
	pub endpoint: Endpoint,
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied `error` field from the JSON body.
	pub api_error: Option<String>,
	/// Indicates whether the failure originated from the network/transport layer.
	pub network_error: bool,
}
impl ProviderErrorContext {
	/// Creates a new context scoped to the provided endpoint.
	pub fn new(endpoint: Endpoint) -> Self {
		Self { endpoint, http_status: None, api_error: None, network_error: false }
	}

	/// Builds a context from a transport failure, reading the response body when one exists.
	pub fn from_transport_error(endpoint: Endpoint, err: &TransportError) -> Self {
		let Some(response) = err.response() else {
			return Self::new(endpoint).with_network_error(true);
		};
		let mut ctx = Self::new(endpoint).with_http_status(response.status);

		if let Some(code) = response.api_error() {
			ctx = ctx.with_api_error(code);
		}

		ctx
	}

	/// Overrides the network error flag.
	pub fn with_network_error(mut self, network_error: bool) -> Self {
		self.network_error = network_error;

		self
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the Slack `error` code.
	pub fn with_api_error(mut self, error: impl Into<String>) -> Self {
		self.api_error = Some(error.into());

		self
	}
}

/// Slack strategy: only `missing_scope` on the identity endpoint is recoverable.
#[derive(Debug, Default)]
pub struct SlackStrategy;
impl Display for SlackStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("slack-strategy")
	}
}
impl ProviderStrategy for SlackStrategy {
	fn classify_profile_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if ctx.network_error {
			return ProviderErrorKind::Fatal;
		}

		match ctx.api_error.as_deref() {
			Some(MISSING_SCOPE) => ProviderErrorKind::MissingScope,
			_ => ProviderErrorKind::Fatal,
		}
	}
}
