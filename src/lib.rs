//! Bearer token cache that serves cached access tokens and refreshes them through anonymous
//! sign-in plus a remote callable token issuer.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
#[cfg(feature = "reqwest")] pub mod http;
pub mod obs;
pub mod store;
pub mod token;

pub use cache::TokenCache;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::PathBuf,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
