//! Crate-level error types shared across flows, providers, and transports.

// self
use crate::{
	_prelude::*,
	http::{FailedExchange, ResponseSnapshot},
	provider::{Endpoint, ProviderDescriptorError},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure, including non-2xx statuses and `ok: false` API responses.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// The `state` returned by the redirect does not match the issued one.
	#[error("Authorization state mismatch.")]
	InvalidState,
	/// The token endpoint answered without `authed_user.access_token`.
	#[error("Token endpoint response did not include a user access token.")]
	MissingAccessToken,
}
impl Error {
	/// Returns the captured upstream response when the error carries one.
	pub fn response(&self) -> Option<&ResponseSnapshot> {
		match self {
			Self::Transport(e) => e.response(),
			_ => None,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] ProviderDescriptorError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, HTTP status, API envelope).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint that was being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
	/// HTTP client failed without a structured error.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint that was being called.
		endpoint: Endpoint,
		/// Client-supplied description.
		message: String,
	},
	/// Endpoint answered with a non-success HTTP status.
	#[error("The {endpoint} endpoint returned HTTP {}.", .exchange.response.status)]
	Status {
		/// Endpoint that was being called.
		endpoint: Endpoint,
		/// Request and response captured for diagnostics.
		exchange: Box<FailedExchange>,
	},
	/// Endpoint answered successfully at the HTTP layer but reported `ok: false`.
	#[error("The {endpoint} endpoint reported an API error: {error}.")]
	Api {
		/// Endpoint that was being called.
		endpoint: Endpoint,
		/// Slack `error` code, or `unknown` when the body omits it.
		error: String,
		/// Request and response captured for diagnostics.
		exchange: Box<FailedExchange>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Returns the failed exchange, when an HTTP response was received.
	pub fn exchange(&self) -> Option<&FailedExchange> {
		match self {
			Self::Status { exchange, .. } | Self::Api { exchange, .. } => Some(exchange),
			_ => None,
		}
	}

	/// Returns the captured response, when an HTTP response was received.
	pub fn response(&self) -> Option<&ResponseSnapshot> {
		self.exchange().map(|exchange| &exchange.response)
	}
}

/// Response bodies that could not be decoded into the expected shape.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not the expected JSON document.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Json {
		/// Endpoint whose body failed to decode.
		endpoint: Endpoint,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
