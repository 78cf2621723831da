//! Contracts for the external collaborators driven by the refresh flow.
//!
//! [`AuthBackend`] performs anonymous sign-in and [`TokenIssuer`] invokes the remote callable that
//! mints a new token. Neither returns the token itself: issuers deliver it out of band through
//! [`TokenCache::receive_token`](crate::TokenCache::receive_token).

// self
use crate::_prelude::*;

/// Name of the remote callable that issues access tokens.
pub const GET_TOKEN_CALLABLE: &str = "getOAuthToken";
/// Parameter carrying the device identifier in token requests.
pub const DEVICE_ID_PARAM: &str = "deviceID";

/// Boxed future returned by backend calls.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + 'a + Send>>;

/// Anonymous sign-in backend.
pub trait AuthBackend
where
	Self: Send + Sync,
{
	/// Establishes an anonymous session; only success or failure is observable.
	fn sign_in_anonymously(&self) -> BackendFuture<'_, ()>;
}

/// Remote token-issuing callable.
pub trait TokenIssuer
where
	Self: Send + Sync,
{
	/// Requests a new token for `device_id`.
	///
	/// `Ok(None)` means the call completed without a usable result.
	fn request_token<'a>(&'a self, device_id: &'a str) -> BackendFuture<'a, Option<JsonValue>>;
}

/// Builds the callable payload `{"deviceID": <device_id>}`.
pub fn token_request_params(device_id: &str) -> JsonValue {
	serde_json::json!({ DEVICE_ID_PARAM: device_id })
}
