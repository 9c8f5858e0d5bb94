//! Normalized identity records derived from Slack profiles.

// self
use crate::{_prelude::*, auth::RawProfile};

const ID_PATH: &str = "user.id";
const NAME_PATH: &str = "user.name";
const EMAIL_PATH: &str = "user.email";
const AVATAR_URL_PATH: &str = "user.image_192";
const ORGANIZATION_ID_PATH: &str = "team.id";

/// Normalized user record.
///
/// Every field is optional: a missing source path leaves the field unset. The source
/// [`RawProfile`] is retained so consumers can read anything the mapping does not cover.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Slack user id (`user.id`).
	pub id: Option<String>,
	/// Display name (`user.name`).
	pub name: Option<String>,
	/// Email address (`user.email`).
	pub email: Option<String>,
	/// 192px avatar URL (`user.image_192`).
	pub avatar_url: Option<String>,
	/// Workspace id (`team.id`).
	pub organization_id: Option<String>,
	/// Payload the record was mapped from.
	pub raw: RawProfile,
}
impl Identity {
	/// Maps a raw `users.identity` payload into the normalized record.
	pub fn from_profile(raw: RawProfile) -> Self {
		let field = |path: &str| raw.get_str(path).map(ToOwned::to_owned);

		Self {
			id: field(ID_PATH),
			name: field(NAME_PATH),
			email: field(EMAIL_PATH),
			avatar_url: field(AVATAR_URL_PATH),
			organization_id: field(ORGANIZATION_ID_PATH),
			raw,
		}
	}
}
impl From<RawProfile> for Identity {
	fn from(value: RawProfile) -> Self {
		Self::from_profile(value)
	}
}
