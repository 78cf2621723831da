//! Token models: the stored map shape, typed records, and the redacting secret wrapper.

pub mod record;
pub mod secret;

pub use record::*;
pub use secret::*;

// self
use crate::_prelude::*;

/// Untyped map persisted under the store key, as written by the delivery callback.
pub type TokenMap = BTreeMap<String, JsonValue>;

/// Sub-key holding the raw access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Sub-key holding the expiry timestamp string.
pub const EXPIRE_TIME_KEY: &str = "expireTime";
/// Prefix prepended to access tokens handed to callers.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Formats a raw access token as an `Authorization` header value.
pub fn bearer(access_token: &str) -> String {
	format!("{BEARER_PREFIX}{access_token}")
}

/// Access token handed out by [`TokenCache::with_token`](crate::TokenCache::with_token).
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
	/// Bearer-formatted access token; callers must avoid logging it.
	pub access_token: String,
}
impl Token {
	/// Wraps a bearer-formatted access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self { access_token: access_token.into() }
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token").field("access_token", &"<redacted>").finish()
	}
}
