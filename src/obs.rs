//! Optional observability helpers for token provisioning.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `asap_token.provision` with the `stage`
//!   (call site) field.
//! - Enable `metrics` to increment the `asap_token_provision_total` counter for every
//!   attempt/cache hit/mint/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each provisioning attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProvisionOutcome {
	/// Entry to the provisioner.
	Attempt,
	/// Attempt served from the cache.
	CacheHit,
	/// Attempt that signed a fresh token.
	Minted,
	/// Failure propagated back to the caller.
	Failure,
}
impl ProvisionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProvisionOutcome::Attempt => "attempt",
			ProvisionOutcome::CacheHit => "cache_hit",
			ProvisionOutcome::Minted => "minted",
			ProvisionOutcome::Failure => "failure",
		}
	}
}
impl Display for ProvisionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
