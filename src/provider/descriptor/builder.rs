// crates.io
use url::Host;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ProviderId},
	provider::{Endpoint, ProviderDescriptor, ProviderEndpoints, ProviderQuirks},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Descriptor identifier failed validation.
	#[error(transparent)]
	InvalidId(#[from] IdentifierError),
	/// A required endpoint was not configured.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: Endpoint,
	},
	/// An endpoint URL could not be parsed.
	#[error("The {endpoint} endpoint URL is invalid: {reason}.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: Endpoint,
		/// Parser message.
		reason: String,
	},
	/// Endpoints must use HTTPS (loopback hosts excepted).
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: Endpoint,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Reject scope delimiters that are control characters.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Authorize endpoint end-users are sent to.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint used for the code exchange.
	pub token_endpoint: Option<Url>,
	/// Identity endpoint queried with the user token.
	pub identity_endpoint: Option<Url>,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			authorization_endpoint: None,
			token_endpoint: None,
			identity_endpoint: None,
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the identity endpoint.
	pub fn identity_endpoint(mut self, url: Url) -> Self {
		self.identity_endpoint = Some(url);

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Overrides only the scope delimiter.
	pub fn scope_delimiter(mut self, delimiter: char) -> Self {
		self.quirks.scope_delimiter = delimiter;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let required = |url: Option<Url>, endpoint| {
			url.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint })
		};
		let endpoints = ProviderEndpoints {
			authorization: required(self.authorization_endpoint, Endpoint::Authorization)?,
			token: required(self.token_endpoint, Endpoint::Token)?,
			identity: required(self.identity_endpoint, Endpoint::Identity)?,
		};
		let descriptor = ProviderDescriptor { id: self.id, endpoints, quirks: self.quirks };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	pub fn validate(&self) -> Result<(), ProviderDescriptorError> {
		for endpoint in [Endpoint::Authorization, Endpoint::Token, Endpoint::Identity] {
			validate_endpoint(endpoint, self.endpoints.url(endpoint))?;
		}

		validate_scope_delimiter(self.quirks.scope_delimiter)?;

		Ok(())
	}
}

fn validate_endpoint(endpoint: Endpoint, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

fn validate_scope_delimiter(delimiter: char) -> Result<(), ProviderDescriptorError> {
	if delimiter.is_control() {
		Err(ProviderDescriptorError::InvalidScopeDelimiter { delimiter })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::SLACK_PROVIDER_ID;

	fn id() -> ProviderId {
		ProviderId::new(SLACK_PROVIDER_ID).expect("Slack provider id should be valid.")
	}

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("URL fixture should parse.")
	}

	fn complete(base: &str) -> ProviderDescriptorBuilder {
		ProviderDescriptor::builder(id())
			.authorization_endpoint(url(&format!("{base}/oauth/v2/authorize")))
			.token_endpoint(url(&format!("{base}/api/oauth.v2.access")))
			.identity_endpoint(url(&format!("{base}/api/users.identity")))
	}

	#[test]
	fn slack_descriptor_uses_production_endpoints() {
		let descriptor = ProviderDescriptor::slack().expect("Slack descriptor should build.");

		assert_eq!(descriptor.id.as_ref(), "SLACK2");
		assert_eq!(descriptor.endpoints.token.as_str(), "https://slack.com/api/oauth.v2.access");
		assert_eq!(descriptor.quirks.scope_delimiter, ',');
	}

	#[test]
	fn missing_endpoints_are_reported() {
		let err = ProviderDescriptor::builder(id())
			.authorization_endpoint(url("https://slack.com/oauth/v2/authorize"))
			.build()
			.expect_err("Token endpoint is missing.");

		assert_eq!(err, ProviderDescriptorError::MissingEndpoint { endpoint: Endpoint::Token });
	}

	#[test]
	fn plain_http_is_only_allowed_on_loopback() {
		assert!(complete("http://127.0.0.1:8080").build().is_ok());
		assert!(complete("http://localhost:8080").build().is_ok());
		assert!(complete("http://[::1]:8080").build().is_ok());

		let err = complete("http://slack.example.com").build().expect_err("Plain HTTP is insecure.");

		assert!(matches!(
			err,
			ProviderDescriptorError::InsecureEndpoint { endpoint: Endpoint::Authorization, .. }
		));
	}

	#[test]
	fn control_delimiters_are_rejected() {
		let err = complete("https://slack.com")
			.scope_delimiter('\n')
			.build()
			.expect_err("Newline is not a usable delimiter.");

		assert_eq!(err, ProviderDescriptorError::InvalidScopeDelimiter { delimiter: '\n' });
	}

	#[test]
	fn descriptors_deserialize_with_default_quirks() {
		let descriptor: ProviderDescriptor = serde_json::from_str(
			r#"{
				"id": "SLACK2",
				"endpoints": {
					"authorization": "https://slack.com/oauth/v2/authorize",
					"token": "https://slack.com/api/oauth.v2.access",
					"identity": "https://slack.com/api/users.identity"
				}
			}"#,
		)
		.expect("Descriptor JSON should deserialize.");

		assert_eq!(descriptor.quirks, ProviderQuirks::slack());
		assert!(descriptor.validate().is_ok());
	}
}
