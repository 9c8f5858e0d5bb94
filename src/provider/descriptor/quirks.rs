// self
use crate::_prelude::*;

/// Provider-specific quirks that influence how flows behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Character used to join scopes when constructing `scope`/`user_scope` parameters.
	pub scope_delimiter: char,
}
impl ProviderQuirks {
	/// Slack joins scopes with commas.
	pub const fn slack() -> Self {
		Self { scope_delimiter: ',' }
	}
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self::slack()
	}
}
