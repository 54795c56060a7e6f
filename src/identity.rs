//! Signer identity: who signs, for whom, and for how long.

pub mod audience;

pub use audience::*;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Asymmetric signing algorithms supported for token issuance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningAlgorithm {
	/// RSASSA-PKCS1-v1_5 with SHA-256.
	#[default]
	Rs256,
}
impl SigningAlgorithm {
	/// Returns the stable JOSE label for the algorithm.
	pub const fn as_str(self) -> &'static str {
		match self {
			SigningAlgorithm::Rs256 => "RS256",
		}
	}

	/// Maps the algorithm into its `jsonwebtoken` counterpart.
	pub const fn jwt(self) -> jsonwebtoken::Algorithm {
		match self {
			SigningAlgorithm::Rs256 => jsonwebtoken::Algorithm::RS256,
		}
	}
}
impl Display for SigningAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable identity asserted by every token the signer produces.
///
/// Built once from validated configuration; the caching provisioner derives its
/// cache key from the identity so distinct identities never share tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerIdentity {
	/// Key identifier placed in the token header so verifiers can select the
	/// matching public key.
	pub kid: String,
	/// Issuer asserted in the `iss` (and `sub`) claims.
	pub issuer: String,
	/// Intended recipients asserted in the `aud` claim.
	pub audiences: AudienceSet,
	/// Token lifetime; expiry is always issued-at plus this duration.
	pub ttl: Duration,
	/// Signing algorithm recorded in the token header.
	pub algorithm: SigningAlgorithm,
}
impl SignerIdentity {
	/// Creates an identity signing RS256 tokens.
	pub fn new(
		kid: impl Into<String>,
		issuer: impl Into<String>,
		audiences: AudienceSet,
		ttl: Duration,
	) -> Self {
		Self {
			kid: kid.into(),
			issuer: issuer.into(),
			audiences,
			ttl,
			algorithm: SigningAlgorithm::Rs256,
		}
	}

	/// Deterministic cache key derived from every identity component.
	///
	/// The key is a base64 (no padding) SHA-256 digest so two identities collide
	/// only when kid, issuer, audiences, TTL, and algorithm all match.
	pub fn cache_key(&self) -> CacheKey {
		let mut hasher = Sha256::new();

		hasher.update(self.kid.as_bytes());
		hasher.update([0]);
		hasher.update(self.issuer.as_bytes());

		for audience in &self.audiences {
			hasher.update([0]);
			hasher.update(audience.as_bytes());
		}

		hasher.update([0]);
		hasher.update(self.ttl.whole_nanoseconds().to_le_bytes());
		hasher.update(self.algorithm.as_str().as_bytes());

		CacheKey(STANDARD_NO_PAD.encode(hasher.finalize()))
	}
}

/// Unique key identifying a cached token slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);
impl CacheKey {
	/// Returns the fingerprint string backing the key.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn identity(kid: &str, issuer: &str, audiences: &[&str], ttl: Duration) -> SignerIdentity {
		let audiences = AudienceSet::new(audiences.iter().copied())
			.expect("Audience fixture should be valid.");

		SignerIdentity::new(kid, issuer, audiences, ttl)
	}

	#[test]
	fn cache_keys_are_deterministic() {
		let lhs = identity("kid-1", "issuer", &["svc-a"], Duration::hours(1));
		let rhs = identity("kid-1", "issuer", &["svc-a"], Duration::hours(1));

		assert_eq!(lhs.cache_key(), rhs.cache_key());
	}

	#[test]
	fn cache_keys_cover_every_component() {
		let base = identity("kid-1", "issuer", &["svc-a"], Duration::hours(1));

		assert_ne!(
			base.cache_key(),
			identity("kid-2", "issuer", &["svc-a"], Duration::hours(1)).cache_key()
		);
		assert_ne!(
			base.cache_key(),
			identity("kid-1", "other", &["svc-a"], Duration::hours(1)).cache_key()
		);
		assert_ne!(
			base.cache_key(),
			identity("kid-1", "issuer", &["svc-a", "svc-b"], Duration::hours(1)).cache_key()
		);
		assert_ne!(
			base.cache_key(),
			identity("kid-1", "issuer", &["svc-a"], Duration::minutes(30)).cache_key()
		);
	}

	#[test]
	fn component_boundaries_do_not_collide() {
		// "ab" + "c" must hash differently from "a" + "bc".
		let lhs = identity("ab", "c", &["svc"], Duration::hours(1));
		let rhs = identity("a", "bc", &["svc"], Duration::hours(1));

		assert_ne!(lhs.cache_key(), rhs.cache_key());
	}

	#[test]
	fn algorithm_labels_are_stable() {
		assert_eq!(SigningAlgorithm::Rs256.as_str(), "RS256");
		assert_eq!(SigningAlgorithm::Rs256.jwt(), jsonwebtoken::Algorithm::RS256);
	}
}
