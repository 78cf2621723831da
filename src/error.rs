//! Cache-level error types shared by the refresh flow, stores, and configuration.

// self
use crate::_prelude::*;

/// Cache-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Opaque error produced by external collaborators (sign-in backends, token issuers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error handed back to callers of [`TokenCache`](crate::TokenCache).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Anonymous sign-in was rejected or could not be performed.
	#[error("Anonymous sign-in failed.")]
	SignIn {
		/// Backend-specific failure.
		#[source]
		source: BoxError,
	},
	/// The remote token-issuing call failed.
	#[error("Token request failed.")]
	TokenRequest {
		/// Issuer-specific failure.
		#[source]
		source: BoxError,
	},
	/// The token-issuing call completed without a usable result.
	#[error("Token issuer returned no result.")]
	NoResult,
}
impl Error {
	/// Wraps a sign-in backend failure.
	pub fn sign_in(src: impl Into<BoxError>) -> Self {
		Self::SignIn { source: src.into() }
	}

	/// Wraps a token issuer failure.
	pub fn token_request(src: impl Into<BoxError>) -> Self {
		Self::TokenRequest { source: src.into() }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Device identifier was empty.
	#[error("Device identifier must not be empty.")]
	EmptyDeviceId,
	/// Store key was empty.
	#[error("Store key must not be empty.")]
	EmptyStoreKey,
	/// Configuration document could not be parsed.
	#[error("Configuration is malformed.")]
	Parse {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Backend endpoint URL cannot be parsed or joined.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Expiry instant cannot be rendered with the record date pattern.
	#[error("Expiry instant cannot be formatted.")]
	ExpiryFormat(#[from] time::error::Format),
}
