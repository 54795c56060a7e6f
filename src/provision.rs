//! Token caching and single-flight provisioning over a signer.
//!
//! [`CachingProvisioner::provision`] serves a cached token while it stays fresh
//! past the safety margin and otherwise mints a replacement through the signer.
//! Concurrent callers racing a stale or cold cache serialize on a per-cache-key
//! guard so the signer runs exactly once and every waiter observes the same
//! freshly minted token.

mod metrics;

pub use metrics::ProvisionMetrics;

// self
use crate::{
	_prelude::*,
	identity::{CacheKey, SignerIdentity},
	obs::{self, ProvisionOutcome, ProvisionSpan},
	sign::SignToken,
	token::Token,
};

/// Caching wrapper around a signer and a fixed identity.
pub struct CachingProvisioner {
	signer: Arc<dyn SignToken>,
	identity: SignerIdentity,
	safety_margin: Duration,
	cache: RwLock<HashMap<CacheKey, Token>>,
	flight_guards: Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>,
	metrics: ProvisionMetrics,
}
impl CachingProvisioner {
	/// Buffer subtracted from a token's nominal expiry so a cached token is
	/// refreshed before it can expire mid-flight.
	pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::seconds(10);

	/// Creates a provisioner for the identity with the default safety margin.
	pub fn new(signer: Arc<dyn SignToken>, identity: SignerIdentity) -> Self {
		Self {
			signer,
			identity,
			safety_margin: Self::DEFAULT_SAFETY_MARGIN,
			cache: RwLock::default(),
			flight_guards: Mutex::default(),
			metrics: ProvisionMetrics::default(),
		}
	}

	/// Overrides the safety margin; negative values clamp to zero.
	pub fn with_safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Identity asserted by every token this provisioner hands out.
	pub fn identity(&self) -> &SignerIdentity {
		&self.identity
	}

	/// Safety margin applied to freshness checks.
	pub fn safety_margin(&self) -> Duration {
		self.safety_margin
	}

	/// Counters describing cache behavior since construction.
	pub fn metrics(&self) -> &ProvisionMetrics {
		&self.metrics
	}

	/// Returns a token that stays valid for at least the safety margin.
	///
	/// Fresh cache reads proceed without blocking each other; a miss or stale
	/// entry serializes on the per-key guard so exactly one signing pass serves
	/// all concurrent waiters. Signer errors propagate without retry.
	pub async fn provision(&self) -> Result<Token> {
		self.metrics.record_attempt();
		obs::record_provision_outcome(ProvisionOutcome::Attempt);

		let span = ProvisionSpan::new("provision");
		let result = span.instrument(self.provision_inner()).await;

		if result.is_err() {
			self.metrics.record_failure();
			obs::record_provision_outcome(ProvisionOutcome::Failure);
		}

		result
	}

	/// Drops the cached token so the next call mints a fresh one.
	pub fn invalidate(&self) {
		self.cache.write().remove(&self.identity.cache_key());
	}

	async fn provision_inner(&self) -> Result<Token> {
		let key = self.identity.cache_key();

		if let Some(token) = self.cached(&key, OffsetDateTime::now_utc()) {
			self.record_cache_hit();

			return Ok(token);
		}

		let guard = self.flight_guard(&key);
		let _flight = guard.lock().await;
		// Re-check after winning the guard; callers that lost the race observe the
		// winner's token here instead of signing again.
		let now = OffsetDateTime::now_utc();

		if let Some(token) = self.cached(&key, now) {
			self.record_cache_hit();

			return Ok(token);
		}

		// Signing is CPU-bound and runs while holding only the flight guard, never
		// the cache lock.
		let token = self.signer.sign(&self.identity, now)?;

		self.cache.write().insert(key, token.clone());
		self.metrics.record_mint();
		obs::record_provision_outcome(ProvisionOutcome::Minted);

		Ok(token)
	}

	fn cached(&self, key: &CacheKey, now: OffsetDateTime) -> Option<Token> {
		self.cache.read().get(key).filter(|token| token.is_fresh_at(now, self.safety_margin)).cloned()
	}

	fn record_cache_hit(&self) {
		self.metrics.record_cache_hit();
		obs::record_provision_outcome(ProvisionOutcome::CacheHit);
	}

	/// Returns (and creates on demand) the single-flight guard for a cache key.
	fn flight_guard(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.flight_guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl Debug for CachingProvisioner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachingProvisioner")
			.field("identity", &self.identity)
			.field("safety_margin", &self.safety_margin)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{CountingSigner, test_identity};

	fn provisioner(signer: &Arc<CountingSigner>) -> CachingProvisioner {
		CachingProvisioner::new(signer.clone() as Arc<dyn SignToken>, test_identity())
	}

	#[tokio::test]
	async fn second_call_within_margin_is_a_cache_hit() {
		let signer = Arc::new(CountingSigner::default());
		let provisioner = provisioner(&signer);
		let first = provisioner.provision().await.expect("First provision should succeed.");
		let second = provisioner.provision().await.expect("Second provision should succeed.");

		assert_eq!(first.value.expose(), second.value.expose());
		assert_eq!(signer.calls(), 1);
		assert_eq!(provisioner.metrics().mints(), 1);
		assert_eq!(provisioner.metrics().cache_hits(), 1);
	}

	#[tokio::test]
	async fn margin_wider_than_ttl_forces_a_mint_every_call() {
		let signer = Arc::new(CountingSigner::default());
		let provisioner = provisioner(&signer).with_safety_margin(Duration::hours(2));

		provisioner.provision().await.expect("First provision should succeed.");
		provisioner.provision().await.expect("Second provision should succeed.");

		assert_eq!(signer.calls(), 2);
	}

	#[tokio::test]
	async fn invalidate_forces_a_fresh_mint() {
		let signer = Arc::new(CountingSigner::default());
		let provisioner = provisioner(&signer);
		let first = provisioner.provision().await.expect("First provision should succeed.");

		provisioner.invalidate();

		let second = provisioner.provision().await.expect("Post-invalidate provision should succeed.");

		assert_ne!(first.value.expose(), second.value.expose());
		assert_eq!(signer.calls(), 2);
	}

	#[tokio::test]
	async fn signer_failures_propagate_without_retry() {
		let signer = Arc::new(CountingSigner::failing());
		let provisioner = provisioner(&signer);
		let err = provisioner.provision().await.expect_err("Signer failure should propagate.");

		assert!(matches!(err, Error::Signing(_)));
		assert_eq!(signer.calls(), 1);
		assert_eq!(provisioner.metrics().failures(), 1);
	}

	#[test]
	fn negative_margin_clamps_to_zero() {
		let signer = Arc::new(CountingSigner::default());
		let provisioner = provisioner(&signer).with_safety_margin(Duration::seconds(-5));

		assert_eq!(provisioner.safety_margin(), Duration::ZERO);
	}
}
