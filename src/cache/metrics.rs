// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for cache lookups and refreshes.
#[derive(Debug, Default)]
pub struct CacheMetrics {
	cache_hits: AtomicU64,
	refresh_attempts: AtomicU64,
	refresh_successes: AtomicU64,
	failures: AtomicU64,
	self_heals: AtomicU64,
}
impl CacheMetrics {
	/// Returns the number of lookups served from cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh sequences started.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh sequences that completed without error.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_successes.load(Ordering::Relaxed)
	}

	/// Returns the number of lookups that ended in an error.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Returns the number of unreadable records cleared from the store.
	pub fn self_heals(&self) -> u64 {
		self.self_heals.load(Ordering::Relaxed)
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_self_heal(&self) {
		self.self_heals.fetch_add(1, Ordering::Relaxed);
	}
}
