//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{StoreError, TokenStore},
	token::TokenMap,
};

type StoreMap = Arc<RwLock<HashMap<String, TokenMap>>>;

/// Storage backend that keeps maps in-process. Clones share the same contents.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of keys currently stored.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl TokenStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<TokenMap>, StoreError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn set(&self, key: &str, map: TokenMap) -> Result<(), StoreError> {
		self.0.write().insert(key.to_owned(), map);

		Ok(())
	}

	fn clear(&self, key: &str) -> Result<(), StoreError> {
		self.0.write().remove(key);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn set_get_clear() {
		let store = MemoryStore::default();
		let mut map = TokenMap::new();

		map.insert("accessToken".into(), "abc123".into());
		store.set("Token", map.clone()).expect("Memory store writes should succeed.");

		assert_eq!(store.get("Token").expect("Memory store reads should succeed."), Some(map));
		assert_eq!(store.get("Other").expect("Memory store reads should succeed."), None);

		store.clear("Token").expect("Memory store clears should succeed.");

		assert!(store.is_empty());
	}

	#[test]
	fn clones_share_contents() {
		let store = MemoryStore::default();
		let clone = store.clone();

		clone.set("Token", TokenMap::new()).expect("Memory store writes should succeed.");

		assert_eq!(store.len(), 1);
	}
}
