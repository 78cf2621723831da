//! Reqwest-backed implementations of [`AuthBackend`] and [`TokenIssuer`].
//!
//! [`HttpAnonymousAuth`] posts an anonymous sign-up request and keeps the returned ID token in a
//! [`SessionSlot`]. [`HttpTokenIssuer`] speaks the callable-function protocol: the request body is
//! `{"data": <params>}` and a successful response carries `{"result": <value>}`. When the slot
//! holds an ID token, the issuer forwards it as `Authorization: Bearer <idToken>` so the callable
//! can attribute the request to the anonymous session.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	backend::{self, AuthBackend, BackendFuture, GET_TOKEN_CALLABLE, TokenIssuer},
	error::ConfigError,
	token::TokenSecret,
};

/// Transport-level failures raised by the HTTP backends.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Backend answered with a non-success status.
	#[error("Backend responded with HTTP {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, trimmed.
		message: String,
	},
	/// Backend responded with malformed JSON.
	#[error("Backend returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Thread-safe slot sharing the anonymous session's ID token between sign-in and issuer.
#[derive(Clone, Debug, Default)]
pub struct SessionSlot(Arc<Mutex<Option<TokenSecret>>>);
impl SessionSlot {
	/// Stores the ID token from the latest sign-in.
	pub fn store(&self, id_token: impl Into<String>) {
		*self.0.lock() = Some(TokenSecret::new(id_token));
	}

	/// Returns a copy of the current ID token, if any.
	pub fn current(&self) -> Option<TokenSecret> {
		self.0.lock().clone()
	}

	/// Forgets the current ID token.
	pub fn clear(&self) {
		self.0.lock().take();
	}
}

/// Anonymous sign-in over HTTP.
#[derive(Clone, Debug)]
pub struct HttpAnonymousAuth {
	client: ReqwestClient,
	endpoint: Url,
	session: SessionSlot,
}
impl HttpAnonymousAuth {
	/// Creates a backend that posts to `endpoint` with a default reqwest client.
	pub fn new(endpoint: Url, session: SessionSlot) -> Self {
		Self::with_client(ReqwestClient::default(), endpoint, session)
	}

	/// Creates a backend that reuses the caller-provided client.
	pub fn with_client(client: ReqwestClient, endpoint: Url, session: SessionSlot) -> Self {
		Self { client, endpoint, session }
	}

	async fn sign_in(&self) -> Result<(), TransportError> {
		let response = self
			.client
			.post(self.endpoint.clone())
			.json(&serde_json::json!({ "returnSecureToken": true }))
			.send()
			.await?;
		let body = read_success(response).await?;
		let parsed = if body.is_empty() {
			SignInResponse::default()
		} else {
			decode::<SignInResponse>(&body)?
		};

		match parsed.id_token {
			Some(id_token) => self.session.store(id_token),
			None => self.session.clear(),
		}

		Ok(())
	}
}
impl AuthBackend for HttpAnonymousAuth {
	fn sign_in_anonymously(&self) -> BackendFuture<'_, ()> {
		Box::pin(async move { self.sign_in().await.map_err(BoxError::from) })
	}
}

/// Callable-protocol client for the token-issuing function.
#[derive(Clone, Debug)]
pub struct HttpTokenIssuer {
	client: ReqwestClient,
	endpoint: Url,
	session: SessionSlot,
}
impl HttpTokenIssuer {
	/// Creates an issuer that posts to `endpoint` with a default reqwest client.
	pub fn new(endpoint: Url, session: SessionSlot) -> Self {
		Self::with_client(ReqwestClient::default(), endpoint, session)
	}

	/// Creates an issuer for the `getOAuthToken` callable hosted under `base`.
	pub fn from_base_url(base: &Url, session: SessionSlot) -> Result<Self, ConfigError> {
		let endpoint = base
			.join(GET_TOKEN_CALLABLE)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self::new(endpoint, session))
	}

	/// Creates an issuer that reuses the caller-provided client.
	pub fn with_client(client: ReqwestClient, endpoint: Url, session: SessionSlot) -> Self {
		Self { client, endpoint, session }
	}

	/// Endpoint the issuer posts to.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	async fn call(&self, device_id: &str) -> Result<Option<JsonValue>, TransportError> {
		let mut request = self
			.client
			.post(self.endpoint.clone())
			.json(&serde_json::json!({ "data": backend::token_request_params(device_id) }));

		if let Some(id_token) = self.session.current() {
			request = request.bearer_auth(id_token.expose());
		}

		let body = read_success(request.send().await?).await?;
		let parsed = decode::<CallableResponse>(&body)?;

		Ok(parsed.result)
	}
}
impl TokenIssuer for HttpTokenIssuer {
	fn request_token<'a>(&'a self, device_id: &'a str) -> BackendFuture<'a, Option<JsonValue>> {
		Box::pin(async move { self.call(device_id).await.map_err(BoxError::from) })
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
	#[serde(default)]
	id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallableResponse {
	#[serde(default)]
	result: Option<JsonValue>,
}

async fn read_success(response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
	let status = response.status();
	let body = response.bytes().await?;

	if !status.is_success() {
		return Err(TransportError::Status {
			status: status.as_u16(),
			message: String::from_utf8_lossy(&body).trim().to_owned(),
		});
	}

	Ok(body.to_vec())
}

fn decode<T>(body: &[u8]) -> Result<T, TransportError>
where
	T: DeserializeOwned,
{
	let de = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(de).map_err(|source| TransportError::Decode { source })
}
