//! `users.identity` fetch with `missing_scope` recovery.

// self
use crate::{
	_prelude::*,
	auth::{RawProfile, TokenSecret},
	flows::{SlackProvider, common},
	http::{ApiHttpClient, RequestOptions, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{Endpoint, ProviderErrorContext, ProviderErrorKind},
};

impl<C, M> SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches the raw profile for `access_token`.
	///
	/// A failure whose body carries `"error": "missing_scope"` means the token is valid but lacks
	/// the `identity.*` scopes; the call then returns an empty [`RawProfile`]. Every other failure
	/// propagates.
	pub async fn fetch_profile(&self, access_token: &TokenSecret) -> Result<RawProfile> {
		const KIND: FlowKind = FlowKind::ProfileFetch;

		let span = FlowSpan::new(KIND, "fetch_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let request =
					common::bearer_get(&self.descriptor().endpoints.identity, access_token)?;
				let response = match self
					.transport()
					.execute(Endpoint::Identity, request, RequestOptions::strict())
					.await
				{
					Ok(response) => response,
					Err(Error::Transport(e)) => {
						let ctx = ProviderErrorContext::from_transport_error(Endpoint::Identity, &e);

						return match self.strategy.classify_profile_error(&ctx) {
							ProviderErrorKind::MissingScope => {
								span.note("identity scopes missing, returning an empty profile");
								obs::record_flow_outcome(KIND, FlowOutcome::Recovered);

								Ok(RawProfile::empty())
							},
							ProviderErrorKind::Fatal => Err(e.into()),
						};
					},
					Err(e) => return Err(e),
				};

				common::decode_json::<JsonMap<String, JsonValue>>(Endpoint::Identity, &response)
					.map(RawProfile::new)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
