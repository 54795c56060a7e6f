// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for provisioning outcomes.
#[derive(Debug, Default)]
pub struct ProvisionMetrics {
	attempts: AtomicU64,
	cache_hits: AtomicU64,
	mints: AtomicU64,
	failures: AtomicU64,
}
impl ProvisionMetrics {
	/// Returns the total number of provisioning attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of attempts served from the cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of freshly signed tokens.
	pub fn mints(&self) -> u64 {
		self.mints.load(Ordering::Relaxed)
	}

	/// Returns the number of failed provisioning attempts.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_mint(&self) {
		self.mints.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
