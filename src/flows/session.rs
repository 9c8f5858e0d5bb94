//! State + PKCE bookkeeping between the authorize redirect and the callback.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{Identity, TokenSecret},
	flows::{PkceChallenge, PkceCodeChallengeMethod, SlackProvider},
	http::{ApiHttpClient, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const STATE_LEN: usize = 40;
const PKCE_VERIFIER_LEN: usize = 96;

/// Handshake data returned by [`SlackProvider::start_authorization`].
///
/// Keep it (e.g. in the user's session) until Slack redirects back, then hand it to
/// [`SlackProvider::complete_authorization`].
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizationSession {
	/// URL the user should be redirected to.
	pub authorize_url: Url,
	state: Option<String>,
	pkce: Option<PkcePair>,
}
impl AuthorizationSession {
	/// Expected `state`, when state is enabled.
	pub fn state(&self) -> Option<&str> {
		self.state.as_deref()
	}

	/// PKCE challenge sent with the authorize URL, when PKCE is enabled.
	pub fn pkce_challenge(&self) -> Option<PkceChallenge> {
		self.pkce.as_ref().map(PkcePair::challenge)
	}

	/// PKCE verifier to send with the code exchange, when PKCE is enabled.
	pub fn code_verifier(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.verifier.expose())
	}

	/// Validates the `state` returned with the callback.
	///
	/// Sessions created without state accept anything.
	pub fn validate_state(&self, returned_state: Option<&str>) -> Result<()> {
		match self.state.as_deref() {
			None => Ok(()),
			Some(expected) if returned_state == Some(expected) => Ok(()),
			Some(_) => Err(Error::InvalidState),
		}
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("authorize_url", &self.authorize_url)
			.field("state", &self.state)
			.field("code_challenge", &self.pkce.as_ref().map(|pkce| &pkce.challenge))
			.finish()
	}
}

/// Result of a completed login.
#[derive(Clone, Debug)]
pub struct AuthenticatedIdentity {
	/// Normalized user record (with the raw profile attached).
	pub identity: Identity,
	/// User access token returned by the exchange.
	pub access_token: TokenSecret,
}

#[derive(Clone, Serialize, Deserialize)]
struct PkcePair {
	verifier: TokenSecret,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier: TokenSecret::new(verifier), challenge, method: PkceCodeChallengeMethod::S256 }
	}

	fn challenge(&self) -> PkceChallenge {
		PkceChallenge::new(self.challenge.clone(), self.method)
	}
}

impl<C, M> SlackProvider<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Generates state/PKCE material as configured and builds the authorize URL.
	pub fn start_authorization(&self) -> AuthorizationSession {
		let config = self.config();
		let state = config.use_state.then(|| random_string(STATE_LEN));
		let pkce = config.use_pkce.then(PkcePair::generate);
		let challenge = pkce.as_ref().map(PkcePair::challenge);
		let authorize_url = self.authorization_url(state.as_deref(), challenge.as_ref());

		AuthorizationSession { authorize_url, state, pkce }
	}

	/// Handles the redirect back from Slack.
	///
	/// Validates `returned_state`, exchanges `code` (with the PKCE verifier, if any), fetches the
	/// profile, and maps it. A token response without a user access token fails with
	/// [`Error::MissingAccessToken`].
	pub async fn complete_authorization(
		&self,
		session: &AuthorizationSession,
		returned_state: Option<&str>,
		code: &str,
	) -> Result<AuthenticatedIdentity> {
		const KIND: FlowKind = FlowKind::Complete;

		let span = FlowSpan::new(KIND, "complete_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				session.validate_state(returned_state)?;

				let access_token = self
					.exchange_code(code, session.code_verifier())
					.await?
					.filter(|token| !token.is_empty())
					.ok_or(Error::MissingAccessToken)?;
				let raw = self.fetch_profile(&access_token).await?;

				Ok(AuthenticatedIdentity { identity: self.map_profile(raw), access_token })
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	let digest = Sha256::digest(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(digest)
}
