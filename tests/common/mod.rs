#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use serde_json::Value as JsonValue;
// self
use bearer_token_cache::{
	TokenCache,
	backend::{AuthBackend, BackendFuture, TokenIssuer},
	config::ProviderConfig,
	error::BoxError,
	store::{MemoryStore, StoreError, TokenStore},
	token::TokenMap,
};

pub const DEVICE_ID: &str = "device-test";

/// Anonymous sign-in fake that counts calls and optionally fails.
#[derive(Debug, Default)]
pub struct FakeAuth {
	calls: AtomicUsize,
	failure: Option<&'static str>,
}
impl FakeAuth {
	pub fn ok() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn failing(message: &'static str) -> Arc<Self> {
		Arc::new(Self { calls: AtomicUsize::new(0), failure: Some(message) })
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl AuthBackend for FakeAuth {
	fn sign_in_anonymously(&self) -> BackendFuture<'_, ()> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let failure = self.failure;

		Box::pin(async move {
			match failure {
				Some(message) => Err(BoxError::from(message)),
				None => Ok(()),
			}
		})
	}
}

/// What the fake issuer answers with.
#[derive(Clone, Debug)]
pub enum IssueOutcome {
	Accept,
	NoResult,
	Fail(&'static str),
}

/// Token issuer fake that records device identifiers and can push a token into a store,
/// standing in for the out-of-band delivery channel.
pub struct FakeIssuer {
	calls: AtomicUsize,
	devices: parking_lot::Mutex<Vec<String>>,
	outcome: IssueOutcome,
	delivery: Option<(Arc<dyn TokenStore>, TokenMap)>,
	delay: Option<StdDuration>,
}
impl FakeIssuer {
	pub fn new(outcome: IssueOutcome) -> Self {
		Self {
			calls: AtomicUsize::new(0),
			devices: Default::default(),
			outcome,
			delivery: None,
			delay: None,
		}
	}

	pub fn delivering(mut self, store: Arc<dyn TokenStore>, map: TokenMap) -> Self {
		self.delivery = Some((store, map));

		self
	}

	pub fn delayed(mut self, delay: StdDuration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn devices(&self) -> Vec<String> {
		self.devices.lock().clone()
	}

	async fn issue(&self) -> Result<Option<JsonValue>, BoxError> {
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}

		match &self.outcome {
			IssueOutcome::Accept => {
				if let Some((store, map)) = &self.delivery {
					store.set("Token", map.clone())?;
				}

				Ok(Some(serde_json::json!({ "accepted": true })))
			},
			IssueOutcome::NoResult => Ok(None),
			IssueOutcome::Fail(message) => Err(BoxError::from(*message)),
		}
	}
}
impl TokenIssuer for FakeIssuer {
	fn request_token<'a>(&'a self, device_id: &'a str) -> BackendFuture<'a, Option<JsonValue>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.devices.lock().push(device_id.to_owned());

		Box::pin(self.issue())
	}
}

/// Store fake whose every operation fails with a backend error.
#[derive(Debug, Default)]
pub struct FailingStore;
impl FailingStore {
	fn failure() -> StoreError {
		StoreError::Backend { message: "token store offline".into() }
	}
}
impl TokenStore for FailingStore {
	fn get(&self, _: &str) -> Result<Option<TokenMap>, StoreError> {
		Err(Self::failure())
	}

	fn set(&self, _: &str, _: TokenMap) -> Result<(), StoreError> {
		Err(Self::failure())
	}

	fn clear(&self, _: &str) -> Result<(), StoreError> {
		Err(Self::failure())
	}
}

pub fn token_map(access: &str, expire_time: &str) -> TokenMap {
	let mut map = TokenMap::new();

	map.insert("accessToken".into(), access.into());
	map.insert("expireTime".into(), expire_time.into());

	map
}

pub fn build_cache(
	config: ProviderConfig,
	store: &Arc<MemoryStore>,
	auth: &Arc<FakeAuth>,
	issuer: &Arc<FakeIssuer>,
) -> TokenCache {
	TokenCache::new(config, store.clone(), auth.clone(), issuer.clone())
}

pub fn build_cache_over(
	store: Arc<dyn TokenStore>,
	auth: &Arc<FakeAuth>,
	issuer: &Arc<FakeIssuer>,
) -> TokenCache {
	TokenCache::new(default_config(), store, auth.clone(), issuer.clone())
}

pub fn default_config() -> ProviderConfig {
	ProviderConfig::builder(DEVICE_ID).build().expect("Default test config should be valid.")
}
