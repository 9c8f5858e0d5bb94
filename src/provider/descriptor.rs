//! Provider descriptor data structures and helpers shared by all flows.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Endpoint labels used for diagnostics.
pub mod endpoint;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use endpoint::*;
pub use quirks::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, SLACK_PROVIDER_ID},
};

/// Slack's OAuth v2 authorize endpoint.
pub const SLACK_AUTHORIZATION_URL: &str = "https://slack.com/oauth/v2/authorize";
/// Slack's OAuth v2 token endpoint.
pub const SLACK_TOKEN_URL: &str = "https://slack.com/api/oauth.v2.access";
/// Slack's identity endpoint for Sign in with Slack tokens.
pub const SLACK_IDENTITY_URL: &str = "https://slack.com/api/users.identity";

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint end-users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// Identity endpoint queried with the user access token.
	pub identity: Url,
}
impl ProviderEndpoints {
	/// Returns the URL registered for `endpoint`.
	pub fn url(&self, endpoint: Endpoint) -> &Url {
		match endpoint {
			Endpoint::Authorization => &self.authorization,
			Endpoint::Token => &self.token,
			Endpoint::Identity => &self.identity,
		}
	}
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Provider-specific quirks.
	#[serde(default)]
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Descriptor for the production Slack endpoints, registered as [`SLACK_PROVIDER_ID`].
	pub fn slack() -> Result<Self, ProviderDescriptorError> {
		let id = ProviderId::new(SLACK_PROVIDER_ID)?;
		let parse = |endpoint: Endpoint, raw: &str| {
			Url::parse(raw).map_err(|e| ProviderDescriptorError::InvalidUrl {
				endpoint,
				reason: e.to_string(),
			})
		};

		Self::builder(id)
			.authorization_endpoint(parse(Endpoint::Authorization, SLACK_AUTHORIZATION_URL)?)
			.token_endpoint(parse(Endpoint::Token, SLACK_TOKEN_URL)?)
			.identity_endpoint(parse(Endpoint::Identity, SLACK_IDENTITY_URL)?)
			.quirks(ProviderQuirks::slack())
			.build()
	}
}
