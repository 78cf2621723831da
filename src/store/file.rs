//! Simple file-backed [`TokenStore`] that survives process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::Path,
};
// self
use crate::{
	_prelude::*,
	store::{StoreError, TokenStore},
	token::TokenMap,
};

/// Persists token maps to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<String, TokenMap>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<String, TokenMap>, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<String, TokenMap>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn get(&self, key: &str) -> Result<Option<TokenMap>, StoreError> {
		Ok(self.inner.read().get(key).cloned())
	}

	fn set(&self, key: &str, map: TokenMap) -> Result<(), StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();

		next.insert(key.to_owned(), map);
		self.persist_locked(&next)?;

		*guard = next;

		Ok(())
	}

	fn clear(&self, key: &str) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		if !guard.contains_key(key) {
			return Ok(());
		}

		let mut next = guard.clone();

		next.remove(key);
		self.persist_locked(&next)?;

		*guard = next;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn temp_path(label: &str) -> PathBuf {
		let unique = format!(
			"bearer_token_cache_file_store_{label}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn fixture() -> TokenMap {
		let mut map = TokenMap::new();

		map.insert("accessToken".into(), "abc123".into());
		map.insert("expireTime".into(), "2099-01-01T00:00:00+0000".into());

		map
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path("reload");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");

		store.set("Token", fixture()).expect("Failed to save fixture map to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = reopened
			.get("Token")
			.expect("Failed to read fixture map from file store.")
			.expect("File store lost map after reopen.");

		assert_eq!(fetched, fixture());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn clear_is_persisted() {
		let path = temp_path("clear");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");

		store.set("Token", fixture()).expect("Failed to save fixture map to file store.");
		store.clear("Token").expect("Failed to clear fixture map from file store.");

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert_eq!(reopened.get("Token").expect("Reading a cleared key should succeed."), None);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn failed_writes_leave_memory_untouched() {
		let path = temp_path("blocked");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");

		store.set("Token", fixture()).expect("Failed to save fixture map to file store.");

		let blocker = store.path().with_extension("tmp");

		fs::create_dir(&blocker).expect("Failed to block the temporary snapshot path.");

		let mut replacement = fixture();

		replacement.insert("accessToken".into(), "ghost".into());

		let err = store
			.set("Token", replacement)
			.expect_err("Writes should fail while the temporary path is a directory.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert_eq!(
			store.get("Token").expect("Reading after a failed write should succeed."),
			Some(fixture())
		);

		store.clear("Token").expect_err("Clears should fail while the temporary path is a directory.");

		assert_eq!(
			store.get("Token").expect("Reading after a failed clear should succeed."),
			Some(fixture())
		);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert_eq!(
			reopened.get("Token").expect("Reading the persisted snapshot should succeed."),
			Some(fixture())
		);

		fs::remove_dir(&blocker).unwrap_or_else(|e| {
			panic!("Failed to remove temporary directory {}: {e}", blocker.display())
		});
		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_is_reported() {
		let path = temp_path("corrupt");

		fs::write(&path, b"{not json").expect("Failed to write corrupt snapshot fixture.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshots should fail to load.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
