//! Token cache orchestration: expiry checks, self-healing lookups, and the two-step refresh.
//!
//! [`TokenCache::get_token`] serves `Bearer <token>` straight from the store while the cached
//! record is valid. Once it is missing or expired the cache announces
//! [`TokenEvent::RetrievingToken`], signs in anonymously, and asks the [`TokenIssuer`] for a new
//! token. The issuer delivers that token out of band via [`TokenCache::receive_token`], so a
//! successful refresh resolves to `Ok(None)` and callers ask again for the value.
//!
//! Concurrent lookups are not coordinated unless [`ProviderConfig::single_flight`] is set; two
//! callers observing an expired cache both run the refresh sequence.

mod metrics;

pub use metrics::CacheMetrics;

// self
use crate::{
	_prelude::*,
	backend::{AuthBackend, TokenIssuer},
	config::ProviderConfig,
	events::{Observers, TokenEvent, TokenObserver},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::TokenStore,
	token::{self, CacheState, Token, TokenMap, TokenRecord},
};

/// Sentinel returned by [`TokenCache::cached_token`] when nothing usable is stored.
pub const TOKEN_NOT_FOUND: &str = "Token is not there in user defaults";

/// Serves cached bearer tokens and refreshes them through the configured backends.
#[derive(Clone)]
pub struct TokenCache {
	/// Anonymous sign-in backend.
	pub auth: Arc<dyn AuthBackend>,
	/// Remote token-issuing callable.
	pub issuer: Arc<dyn TokenIssuer>,
	/// Persistent key-value store holding the token map.
	pub store: Arc<dyn TokenStore>,
	/// Device identity and refresh settings.
	pub config: ProviderConfig,
	/// Shared counters for lookups and refreshes.
	pub metrics: Arc<CacheMetrics>,
	observers: Observers,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl TokenCache {
	/// Creates a cache over the provided store and backends.
	pub fn new(
		config: ProviderConfig,
		store: Arc<dyn TokenStore>,
		auth: Arc<dyn AuthBackend>,
		issuer: Arc<dyn TokenIssuer>,
	) -> Self {
		Self {
			auth,
			issuer,
			store,
			config,
			metrics: Default::default(),
			observers: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Creates a cache whose store is opened from [`ProviderConfig::store_path`].
	pub fn from_config(
		config: ProviderConfig,
		auth: Arc<dyn AuthBackend>,
		issuer: Arc<dyn TokenIssuer>,
	) -> Result<Self> {
		let store = config.open_store()?;

		Ok(Self::new(config, store, auth, issuer))
	}

	/// Registers an observer for [`TokenEvent`]s.
	pub fn subscribe(&self, observer: impl 'static + TokenObserver) {
		self.observers.subscribe(Arc::new(observer));
	}

	/// Device identifier sent with token requests.
	pub fn device_id(&self) -> &str {
		&self.config.device_id
	}

	/// Returns the cached bearer token, or refreshes when the cache cannot serve one.
	///
	/// - `Ok(Some(bearer))`: the cached record is valid; no remote calls were made.
	/// - `Ok(None)`: sign-in and the token request succeeded. The new token arrives through
	///   [`TokenCache::receive_token`], so call again to read it.
	/// - `Err(_)`: the store, sign-in, or token request failed. Nothing is retried.
	pub async fn get_token(&self) -> Result<Option<String>> {
		const KIND: FlowKind = FlowKind::GetToken;

		let span = FlowSpan::new(KIND, "get_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if let Some(bearer) = self.lookup()? {
					return Ok(Some(bearer));
				}
				if !self.config.single_flight {
					return self.refresh().await;
				}

				let _singleflight = self.refresh_guard.lock().await;

				// Another caller may have received a token while this one waited.
				if let Some(bearer) = self.lookup()? {
					return Ok(Some(bearer));
				}

				self.refresh().await
			})
			.await;

		match &result {
			Ok(Some(_)) => obs::record_flow_outcome(KIND, FlowOutcome::CacheHit),
			Ok(None) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => {
				self.metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	/// Adapts [`TokenCache::get_token`] into a [`Token`] value.
	pub async fn with_token(&self) -> Result<Option<Token>> {
		Ok(self.get_token().await?.map(Token::new))
	}

	/// Overwrites the cached map with a delivered token, without validating its shape.
	pub fn receive_token(&self, map: TokenMap) -> Result<()> {
		self.store.set(&self.config.store_key, map)?;
		self.observers.emit(TokenEvent::TokenReceived);

		Ok(())
	}

	/// Typed variant of [`TokenCache::receive_token`].
	pub fn receive_record(&self, record: &TokenRecord) -> Result<()> {
		self.receive_token(record.to_map()?)
	}

	/// Best-effort read of the stored token, ignoring expiry.
	///
	/// Returns [`TOKEN_NOT_FOUND`] when the store is empty, unreadable, or holds no string access
	/// token.
	pub fn cached_token(&self) -> String {
		self.cached_bearer().unwrap_or_else(|| TOKEN_NOT_FOUND.into())
	}

	/// Typed variant of [`TokenCache::cached_token`].
	pub fn cached_bearer(&self) -> Option<String> {
		match self.store.get(&self.config.store_key) {
			Ok(entry) => entry.as_ref().and_then(token::read_access_token).map(token::bearer),
			Err(e) => {
				obs::flow_warning(FlowKind::GetToken, "token store read failed", &e);

				None
			},
		}
	}

	// At most one self-clear per lookup; the pass after a clear sees an absent record.
	fn lookup(&self) -> Result<Option<String>> {
		let key = &self.config.store_key;
		let mut healed = false;

		loop {
			let entry = self.store.get(key)?;

			match CacheState::classify(entry.as_ref(), OffsetDateTime::now_utc()) {
				CacheState::Valid(record) => {
					self.metrics.record_cache_hit();
					obs::flow_event(FlowKind::GetToken, "serving cached token");

					return Ok(Some(record.bearer()));
				},
				CacheState::Unreadable if !healed => {
					obs::flow_event(FlowKind::GetToken, "clearing unreadable token record");
					self.store.clear(key)?;
					self.metrics.record_self_heal();

					healed = true;
				},
				_ => return Ok(None),
			}
		}
	}

	async fn refresh(&self) -> Result<Option<String>> {
		self.metrics.record_refresh_attempt();
		obs::flow_event(FlowKind::GetToken, "cached token missing or expired; refreshing");
		self.observers.emit(TokenEvent::RetrievingToken);

		self.sign_in().await?;
		self.request_token().await?;
		self.metrics.record_refresh_success();

		Ok(None)
	}

	async fn sign_in(&self) -> Result<()> {
		observe(FlowKind::SignIn, "sign_in_anonymously", async {
			self.auth.sign_in_anonymously().await.map_err(Error::sign_in)
		})
		.await
	}

	async fn request_token(&self) -> Result<()> {
		observe(FlowKind::TokenRequest, "request_token", async {
			self.issuer
				.request_token(self.device_id())
				.await
				.map_err(Error::token_request)?
				.filter(|result| !result.is_null())
				.ok_or(Error::NoResult)?;

			Ok(())
		})
		.await
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("config", &self.config)
			.field("observers", &self.observers)
			.field("metrics", &self.metrics)
			.finish()
	}
}

async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	obs::record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
	}

	result
}
