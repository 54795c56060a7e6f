//! Crate-level error types shared across configuration, key loading, signing, and transport.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Missing or invalid configuration field; fatal at construction time.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Undecodable private key material; fatal at construction time.
	#[error(transparent)]
	KeyFormat(#[from] crate::key::KeyFormatError),
	/// Claim serialization or cryptographic signing failure.
	#[error(transparent)]
	Signing(#[from] crate::sign::SigningError),
	/// Failure raised by the decorated transport.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration validation failures raised before any signing machinery is built.
///
/// The variant for the first missing field is returned in a fixed check order
/// (private key, issuer, audiences, kid) so callers can rely on stable messages.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No private key material was supplied.
	#[error("Private key value is empty.")]
	MissingPrivateKey,
	/// No issuer was supplied.
	#[error("Issuer value is empty.")]
	MissingIssuer,
	/// The audience list was empty.
	#[error("Audience list is empty.")]
	MissingAudiences,
	/// No key identifier was supplied.
	#[error("Kid value is empty.")]
	MissingKid,
	/// The configured token TTL was zero or negative.
	#[error("Token TTL must be positive.")]
	NonPositiveTtl,
	/// An audience entry failed validation.
	#[error("Audience list is invalid.")]
	InvalidAudience(#[from] crate::identity::AudienceValidationError),
}

/// Transport-level failures surfaced by the decorator.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying request sender reported a failure.
	#[error("Network error occurred while sending the decorated request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The token value could not be encoded as an authorization header.
	#[error("Bearer token could not be encoded as a header value.")]
	Header {
		/// Header encoding failure from the HTTP stack.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a header encoding error.
	pub fn header(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Header { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
