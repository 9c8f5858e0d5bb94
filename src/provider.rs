//! Provider-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata ([`ProviderDescriptor`]) covering the authorization,
//! token, and identity endpoints plus provider quirks such as the scope delimiter.
//! `strategy` defines [`ProviderStrategy`], an HTTP-client-agnostic hook used by flows to decide
//! which upstream failures are recoverable.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
