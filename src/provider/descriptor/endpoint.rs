// self
use crate::_prelude::*;

/// Upstream endpoints the flows talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
	/// Browser-facing authorize endpoint.
	Authorization,
	/// Code-exchange endpoint (`oauth.v2.access`).
	Token,
	/// Profile endpoint (`users.identity`).
	Identity,
}
impl Endpoint {
	/// Returns a stable label suitable for messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Authorization => "authorization",
			Endpoint::Token => "token",
			Endpoint::Identity => "identity",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
