//! Claim construction and RS256 compact token signing.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Header, errors::ErrorKind};
use rand::RngCore;
// self
use crate::{_prelude::*, identity::SignerIdentity, key::PrivateKey, token::Token};

/// Errors raised while minting a signed token.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// The key material cannot be used with the requested algorithm.
	#[error("Signing key is incompatible with the {algorithm} algorithm.")]
	IncompatibleKey {
		/// JOSE label of the requested algorithm.
		algorithm: &'static str,
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The claim set could not be serialized.
	#[error("Token claims could not be serialized.")]
	Claims {
		/// Underlying serialization failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Claim set asserted by every minted token.
///
/// `sub` mirrors `iss` and `jti` is unique per token, matching the ASAP profile
/// for service-to-service authentication.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
	/// Issuer of the token.
	pub iss: String,
	/// Subject; equal to the issuer for service tokens.
	pub sub: String,
	/// Intended recipients.
	pub aud: crate::identity::AudienceSet,
	/// Issued-at instant as unix seconds.
	pub iat: i64,
	/// Expiry instant as unix seconds.
	pub exp: i64,
	/// Unique token identifier.
	pub jti: String,
}

/// Signing seam between the caching provisioner and the cryptographic signer.
///
/// The provisioner only depends on this trait so tests can count invocations
/// with a fake implementation.
pub trait SignToken
where
	Self: Send + Sync,
{
	/// Mints a token asserting `identity` with `now` as the issued-at instant.
	fn sign(&self, identity: &SignerIdentity, now: OffsetDateTime) -> Result<Token, SigningError>;
}

/// RS256 signer over an exclusively owned private key.
#[derive(Clone, Debug)]
pub struct RsaSigner {
	key: PrivateKey,
}
impl RsaSigner {
	/// Creates a signer owning the parsed private key.
	pub fn new(key: PrivateKey) -> Self {
		Self { key }
	}
}
impl SignToken for RsaSigner {
	fn sign(&self, identity: &SignerIdentity, now: OffsetDateTime) -> Result<Token, SigningError> {
		let claims = Claims {
			iss: identity.issuer.clone(),
			sub: identity.issuer.clone(),
			aud: identity.audiences.clone(),
			iat: now.unix_timestamp(),
			exp: (now + identity.ttl).unix_timestamp(),
			jti: new_jti(),
		};
		let mut header = Header::new(identity.algorithm.jwt());

		header.kid = Some(identity.kid.clone());

		let value = jsonwebtoken::encode(&header, &claims, self.key.encoding()).map_err(|e| {
			match e.kind() {
				ErrorKind::Json(_) => SigningError::Claims { source: e },
				_ => SigningError::IncompatibleKey {
					algorithm: identity.algorithm.as_str(),
					source: e,
				},
			}
		})?;

		Ok(Token::new(value, now, identity.ttl))
	}
}

fn new_jti() -> String {
	let mut bytes = [0_u8; 16];

	rand::rng().fill_bytes(&mut bytes);

	URL_SAFE_NO_PAD.encode(bytes)
}
