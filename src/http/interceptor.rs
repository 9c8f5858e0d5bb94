//! Response interceptors executed by [`ApiTransport`](crate::http::ApiTransport).

// crates.io
use oauth2::HttpResponse;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{FailedExchange, RequestSnapshot},
	json,
	provider::Endpoint,
};

/// Per-request options consulted by the transport and its interceptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestOptions {
	/// Reject non-2xx statuses and let interceptors validate the body.
	pub strict: bool,
}
impl RequestOptions {
	/// Strict error checking (the default).
	pub const fn strict() -> Self {
		Self { strict: true }
	}

	/// Hands every response back untouched.
	pub const fn lenient() -> Self {
		Self { strict: false }
	}
}
impl Default for RequestOptions {
	fn default() -> Self {
		Self::strict()
	}
}

/// Data available to an interceptor besides the response itself.
#[derive(Clone, Copy, Debug)]
pub struct InterceptContext<'a> {
	/// Endpoint the request targeted.
	pub endpoint: Endpoint,
	/// Request snapshot captured before dispatch.
	pub request: &'a RequestSnapshot,
	/// Options the call site requested.
	pub options: RequestOptions,
}

/// Hook that inspects (and may reject or rewrite) a response before callers see it.
///
/// Functions and closures with the matching signature implement the trait, so ad-hoc middleware can be pushed
/// with [`ApiTransport::with_interceptor`](crate::http::ApiTransport::with_interceptor).
pub trait ResponseInterceptor: Send + Sync {
	/// Returns the (possibly rewritten) response or the failure replacing it.
	fn intercept(
		&self,
		ctx: &InterceptContext<'_>,
		response: HttpResponse,
	) -> Result<HttpResponse, TransportError>;
}
impl<F> ResponseInterceptor for F
where
	F: Send + Sync + Fn(&InterceptContext<'_>, HttpResponse) -> Result<HttpResponse, TransportError>,
{
	fn intercept(
		&self,
		ctx: &InterceptContext<'_>,
		response: HttpResponse,
	) -> Result<HttpResponse, TransportError> {
		self(ctx, response)
	}
}

/// Rejects strict responses whose JSON body carries a falsy `ok` flag.
///
/// Slack reports most API failures with HTTP 200 and `{"ok": false, "error": "..."}`. Bodies that
/// are not JSON, or omit `ok`, pass through untouched; decoding them is the caller's job.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlackApiErrorInterceptor;
impl ResponseInterceptor for SlackApiErrorInterceptor {
	fn intercept(
		&self,
		ctx: &InterceptContext<'_>,
		response: HttpResponse,
	) -> Result<HttpResponse, TransportError> {
		if !ctx.options.strict {
			return Ok(response);
		}

		let rejected = serde_json::from_slice::<JsonValue>(response.body())
			.ok()
			.and_then(|body| json::get(&body, "ok").map(|ok| !json::is_truthy(ok)))
			.unwrap_or(false);

		if !rejected {
			return Ok(response);
		}

		let exchange = FailedExchange::new(ctx.request.clone(), &response);
		let error = exchange.response.api_error().unwrap_or_else(|| "unknown".into());

		Err(TransportError::Api { endpoint: ctx.endpoint, error, exchange: Box::new(exchange) })
	}
}
