//! Cache configuration: device identity, store location, and refresh coordination.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	store::{DEFAULT_STORE_KEY, FileStore, MemoryStore, StoreError, TokenStore},
};

/// Validated settings consumed by [`TokenCache`](crate::TokenCache).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderConfig {
	/// Device identifier sent with every token request.
	pub device_id: String,
	/// Key under which the token map is stored.
	#[serde(default = "default_store_key")]
	pub store_key: String,
	/// Serialises concurrent refreshes behind one async lock when enabled.
	#[serde(default)]
	pub single_flight: bool,
	/// Backing file for [`FileStore`]; an in-memory store is used when unset.
	#[serde(default)]
	pub store_path: Option<PathBuf>,
}
impl ProviderConfig {
	/// Returns a builder seeded with the provided device identifier.
	pub fn builder(device_id: impl Into<String>) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(device_id)
	}

	/// Parses and validates a JSON document.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);
		let config: Self = serde_path_to_error::deserialize(de)
			.map_err(|source| ConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Opens the store described by this configuration.
	pub fn open_store(&self) -> Result<Arc<dyn TokenStore>, StoreError> {
		let store: Arc<dyn TokenStore> = match &self.store_path {
			Some(path) => Arc::new(FileStore::open(path)?),
			None => Arc::new(MemoryStore::default()),
		};

		Ok(store)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.device_id.trim().is_empty() {
			return Err(ConfigError::EmptyDeviceId);
		}
		if self.store_key.trim().is_empty() {
			return Err(ConfigError::EmptyStoreKey);
		}

		Ok(())
	}
}

fn default_store_key() -> String {
	DEFAULT_STORE_KEY.into()
}

/// Builder for [`ProviderConfig`].
#[derive(Clone, Debug)]
pub struct ProviderConfigBuilder {
	config: ProviderConfig,
}
impl ProviderConfigBuilder {
	fn new(device_id: impl Into<String>) -> Self {
		Self {
			config: ProviderConfig {
				device_id: device_id.into(),
				store_key: default_store_key(),
				single_flight: false,
				store_path: None,
			},
		}
	}

	/// Overrides the store key (defaults to `"Token"`).
	pub fn store_key(mut self, key: impl Into<String>) -> Self {
		self.config.store_key = key.into();

		self
	}

	/// Enables or disables single-flight refreshes (disabled by default).
	pub fn single_flight(mut self, enabled: bool) -> Self {
		self.config.single_flight = enabled;

		self
	}

	/// Persists tokens to a JSON file at `path`.
	pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.config.store_path = Some(path.into());

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}
