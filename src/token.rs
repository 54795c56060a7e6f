//! Immutable signed-token model and the redacting secret wrapper.

// self
use crate::_prelude::*;

/// Signed compact JWT that renders as `<redacted>` in every formatter.
///
/// A leaked token is a usable bearer credential until it expires, so the raw
/// string is only reachable through [`expose`](Self::expose).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a freshly signed compact token.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw compact token, for attaching to a request or verifying
	/// its claims. Never log the result.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Immutable signed token produced by the signer.
///
/// The expiry always equals `issued_at` plus the identity's TTL; the caching
/// provisioner relies on that invariant when it evaluates freshness.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
	/// Compact signed token string; callers must avoid logging it.
	pub value: TokenSecret,
	/// Wall-clock instant at signing.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from `issued_at` plus the configured TTL.
	pub expires_at: OffsetDateTime,
}
impl Token {
	/// Creates a token from a compact value and its signing instant + TTL.
	pub fn new(value: impl Into<String>, issued_at: OffsetDateTime, ttl: Duration) -> Self {
		Self { value: TokenSecret::new(value), issued_at, expires_at: issued_at + ttl }
	}

	/// Returns `true` when the token remains usable at `now` with `margin` to spare.
	///
	/// The check is strict: a token whose remaining lifetime equals the margin is
	/// already considered stale so it never expires mid-flight.
	pub fn is_fresh_at(&self, now: OffsetDateTime, margin: Duration) -> bool {
		self.expires_at - now > margin
	}

	/// Returns `true` when the expiry instant has passed at `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("value", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
