//! Configuration surface and the construction entry point for decorated transports.

// crates.io
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	identity::{AudienceSet, SignerIdentity},
	key::PrivateKey,
	provision::CachingProvisioner,
	sign::RsaSigner,
	transport::{AsapTransport, RequestSender},
};

/// Token issuance configuration, typically deserialized by an external
/// config-loading host.
#[derive(Clone, Deserialize)]
pub struct AsapConfig {
	/// RSA private key to use when signing tokens; raw PEM or a `data:` URI.
	pub private_key: String,
	/// Key identifier included in token headers.
	pub kid: String,
	/// Lifetime of a token, configured in whole seconds.
	#[serde(deserialize_with = "ttl_secs")]
	pub ttl: Duration,
	/// Issuer value included in tokens.
	pub issuer: String,
	/// Audience values included in tokens.
	pub audiences: Vec<String>,
}
impl AsapConfig {
	/// Identifier keying this configuration root in an external plugin registry.
	pub const NAME: &'static str = "asaptoken";

	/// Returns the registry identifier for this configuration root.
	pub const fn name(&self) -> &'static str {
		Self::NAME
	}

	/// Validates required fields before any signing machinery is built.
	///
	/// The check order (private key, issuer, audiences, kid) is a compatibility
	/// contract; callers rely on which missing field is reported first.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.private_key.is_empty() {
			return Err(ConfigError::MissingPrivateKey);
		}
		if self.issuer.is_empty() {
			return Err(ConfigError::MissingIssuer);
		}
		if self.audiences.is_empty() {
			return Err(ConfigError::MissingAudiences);
		}
		if self.kid.is_empty() {
			return Err(ConfigError::MissingKid);
		}
		if !self.ttl.is_positive() {
			return Err(ConfigError::NonPositiveTtl);
		}

		Ok(())
	}

	/// Builds the immutable signer identity from validated fields.
	pub fn identity(&self) -> Result<SignerIdentity, ConfigError> {
		self.validate()?;

		let audiences = AudienceSet::new(self.audiences.iter().cloned())?;

		Ok(SignerIdentity::new(&self.kid, &self.issuer, audiences, self.ttl))
	}

	/// Builds the shared caching provisioner: validated identity, parsed key,
	/// RS256 signer.
	pub fn provisioner(&self) -> Result<Arc<CachingProvisioner>> {
		let identity = self.identity()?;
		let key = PrivateKey::parse(&self.private_key)?;
		let signer = Arc::new(RsaSigner::new(key));

		Ok(Arc::new(CachingProvisioner::new(signer, identity)))
	}

	/// Construction entry point: returns a function that decorates an inner
	/// request sender with token provisioning.
	///
	/// Every decorated sender produced by one call shares a single provisioner,
	/// so tokens are cached across all of them. This is the sole construction
	/// surface exposed to the surrounding host.
	pub fn decorator<S>(&self) -> Result<impl Fn(S) -> AsapTransport<S> + Clone + use<S>>
	where
		S: RequestSender,
	{
		let provisioner = self.provisioner()?;

		Ok(move |inner: S| AsapTransport::new(inner, provisioner.clone()))
	}
}
impl Default for AsapConfig {
	fn default() -> Self {
		Self {
			private_key: String::new(),
			kid: String::new(),
			ttl: Duration::ZERO,
			issuer: String::new(),
			audiences: Vec::new(),
		}
	}
}
impl Debug for AsapConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AsapConfig")
			.field("private_key", &"<redacted>")
			.field("kid", &self.kid)
			.field("ttl", &self.ttl)
			.field("issuer", &self.issuer)
			.field("audiences", &self.audiences)
			.finish()
	}
}

fn ttl_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
	D: Deserializer<'de>,
{
	i64::deserialize(deserializer).map(Duration::seconds)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::test_config;

	#[test]
	fn config_root_name_is_stable() {
		assert_eq!(AsapConfig::default().name(), "asaptoken");
	}

	#[test]
	fn valid_config_passes_validation() {
		test_config().validate().expect("Config fixture should validate.");
	}

	#[test]
	fn each_missing_field_is_named() {
		let missing_key = AsapConfig { private_key: String::new(), ..test_config() };

		assert!(matches!(missing_key.validate(), Err(ConfigError::MissingPrivateKey)));

		let missing_issuer = AsapConfig { issuer: String::new(), ..test_config() };

		assert!(matches!(missing_issuer.validate(), Err(ConfigError::MissingIssuer)));

		let missing_audiences = AsapConfig { audiences: Vec::new(), ..test_config() };

		assert!(matches!(missing_audiences.validate(), Err(ConfigError::MissingAudiences)));

		let missing_kid = AsapConfig { kid: String::new(), ..test_config() };

		assert!(matches!(missing_kid.validate(), Err(ConfigError::MissingKid)));
	}

	#[test]
	fn check_order_reports_private_key_first() {
		let err = AsapConfig::default().validate().expect_err("Empty config must be rejected.");

		assert!(matches!(err, ConfigError::MissingPrivateKey));
		assert_eq!(err.to_string(), "Private key value is empty.");
	}

	#[test]
	fn non_positive_ttl_is_rejected_after_field_checks() {
		let zero_ttl = AsapConfig { ttl: Duration::ZERO, ..test_config() };

		assert!(matches!(zero_ttl.validate(), Err(ConfigError::NonPositiveTtl)));

		// The four field checks still win over the TTL check.
		let empty_kid = AsapConfig { kid: String::new(), ttl: Duration::ZERO, ..test_config() };

		assert!(matches!(empty_kid.validate(), Err(ConfigError::MissingKid)));
	}

	#[test]
	fn invalid_audience_entries_are_rejected() {
		let config = AsapConfig { audiences: vec!["with space".into()], ..test_config() };
		let err = config.identity().expect_err("Whitespace audience must be rejected.");

		assert!(matches!(err, ConfigError::InvalidAudience(_)));
	}

	#[test]
	fn config_deserializes_with_ttl_seconds() {
		let config: AsapConfig = serde_json::from_str(
			r#"{
				"private_key": "pem",
				"kid": "kid-1",
				"ttl": 3600,
				"issuer": "svc",
				"audiences": ["svc-a"]
			}"#,
		)
		.expect("Config JSON should deserialize.");

		assert_eq!(config.ttl, Duration::hours(1));
		assert_eq!(config.kid, "kid-1");
	}

	#[test]
	fn debug_redacts_the_private_key() {
		let rendered = format!("{:?}", test_config());

		assert!(!rendered.contains("PRIVATE KEY"));
		assert!(rendered.contains("<redacted>"));
	}

	#[test]
	fn identity_mirrors_validated_fields() {
		let config = test_config();
		let identity = config.identity().expect("Identity should build from the fixture.");

		assert_eq!(identity.kid, config.kid);
		assert_eq!(identity.issuer, config.issuer);
		assert_eq!(identity.ttl, config.ttl);
		assert_eq!(
			identity.audiences.iter().collect::<Vec<_>>(),
			config.audiences.iter().map(String::as_str).collect::<Vec<_>>()
		);
	}
}
