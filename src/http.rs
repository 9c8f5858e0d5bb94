//! Transport primitives for Slack API calls.
//!
//! [`ApiHttpClient`] is the crate's only dependency on an HTTP stack; it hands out
//! [`AsyncHttpClient`] handles that execute a single request. [`ApiTransport`] wraps a client with
//! a [`TransportErrorMapper`] and an ordered list of [`ResponseInterceptor`]s. Each strict
//! response runs through every interceptor after the HTTP status check, which is where
//! [`SlackApiErrorInterceptor`] turns `{"ok": false}` bodies into [`TransportError::Api`]
//! failures.
//!
//! [`TransportError::Api`]: crate::error::TransportError::Api

pub mod interceptor;
pub mod mapper;
pub mod snapshot;
pub mod transport;

pub use interceptor::*;
pub use mapper::*;
pub use oauth2;
pub use snapshot::*;
pub use transport::*;

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing Slack API requests.
///
/// Callers provide an implementation (typically behind `Arc<T>` where `T: ApiHttpClient`) and the
/// transport requests a short-lived [`AsyncHttpClient`] handle for every call. Implementations must
/// be `Send + Sync + 'static` so they can be shared across provider instances, and the handles they
/// return must own whatever state is required so their request futures remain `Send` for the
/// lifetime of the in-flight operation.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single request.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for the next request.
	fn handle(&self) -> Self::Handle;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapped client pools connections, so the token exchange and the identity fetch of one
/// provider instance reuse the same connections. Configure timeouts on the client you pass to
/// [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`ApiHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
