//! Request execution with status checks and response interceptors.

// crates.io
use oauth2::{AsyncHttpClient, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{
		ApiHttpClient, FailedExchange, InterceptContext, RequestOptions, RequestSnapshot,
		ResponseInterceptor, SlackApiErrorInterceptor, TransportErrorMapper,
	},
	provider::Endpoint,
};

/// HTTP client, error mapper, and interceptor chain used for every Slack API call.
///
/// For strict requests the transport first rejects non-2xx statuses
/// ([`TransportError::Status`]) and then hands the response to each interceptor in the order they
/// were added. Lenient requests skip the status check; interceptors still run and decide for
/// themselves via [`InterceptContext::options`].
pub struct ApiTransport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	error_mapper: Arc<M>,
	interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}
impl<C, M> ApiTransport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a transport without interceptors.
	pub fn new(http_client: impl Into<Arc<C>>, error_mapper: impl Into<Arc<M>>) -> Self {
		Self {
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
			interceptors: Vec::new(),
		}
	}

	/// Creates a transport with [`SlackApiErrorInterceptor`] installed.
	pub fn slack(http_client: impl Into<Arc<C>>, error_mapper: impl Into<Arc<M>>) -> Self {
		Self::new(http_client, error_mapper).with_interceptor(SlackApiErrorInterceptor)
	}

	/// Appends an interceptor to the chain.
	pub fn with_interceptor(mut self, interceptor: impl 'static + ResponseInterceptor) -> Self {
		self.interceptors.push(Arc::new(interceptor));

		self
	}

	/// Number of installed interceptors.
	pub fn interceptor_count(&self) -> usize {
		self.interceptors.len()
	}

	/// Borrows the wrapped HTTP client.
	pub fn http_client(&self) -> &C {
		&self.http_client
	}

	/// Dispatches `request` and runs the response through the status check and interceptors.
	pub async fn execute(
		&self,
		endpoint: Endpoint,
		request: HttpRequest,
		options: RequestOptions,
	) -> Result<HttpResponse> {
		let snapshot = RequestSnapshot::capture(&request);
		let handle = self.http_client.handle();
		let mut response = handle
			.call(request)
			.await
			.map_err(|e| self.error_mapper.map_transport_error(endpoint, e))?;

		if options.strict && !response.status().is_success() {
			let exchange = FailedExchange::new(snapshot, &response);

			return Err(TransportError::Status { endpoint, exchange: Box::new(exchange) }.into());
		}

		let ctx = InterceptContext { endpoint, request: &snapshot, options };

		for interceptor in &self.interceptors {
			response = interceptor.intercept(&ctx, response)?;
		}

		Ok(response)
	}
}
impl<C, M> Clone for ApiTransport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			error_mapper: self.error_mapper.clone(),
			interceptors: self.interceptors.clone(),
		}
	}
}
impl<C, M> Debug for ApiTransport<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiTransport").field("interceptors", &self.interceptors.len()).finish()
	}
}
