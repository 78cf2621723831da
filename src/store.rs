//! Storage contracts and built-in key-value store implementations for cached token maps.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, token::TokenMap};

/// Well-known key under which the cached token map lives.
pub const DEFAULT_STORE_KEY: &str = "Token";

/// Persistent key-value contract used by [`TokenCache`](crate::TokenCache).
///
/// Calls are synchronous, matching device-local defaults stores. There is no locking discipline
/// across callers: the last writer wins.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the map stored under `key`, if present.
	fn get(&self, key: &str) -> Result<Option<TokenMap>, StoreError>;

	/// Persists or replaces the map stored under `key`.
	fn set(&self, key: &str, map: TokenMap) -> Result<(), StoreError>;

	/// Removes whatever is stored under `key`.
	fn clear(&self, key: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
