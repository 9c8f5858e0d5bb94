//! Auth-domain identifiers, scope sets, secrets, and identity models.

pub mod id;
pub mod identity;
pub mod profile;
pub mod scope;
pub mod secret;

pub use id::*;
pub use identity::*;
pub use profile::*;
pub use scope::*;
pub use secret::*;
