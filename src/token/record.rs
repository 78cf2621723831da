//! Typed token records, expiry parsing, and cache-entry classification.

// crates.io
use time::{format_description::BorrowedFormatItem, macros};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	token::{ACCESS_TOKEN_KEY, EXPIRE_TIME_KEY, TokenMap, bearer, secret::TokenSecret},
};

/// `yyyy-MM-dd'T'HH:mm:ssZ`, where `Z` is a signed `HHMM` offset such as `+0000`.
pub const EXPIRE_TIME_FORMAT: &[BorrowedFormatItem<'static>] = macros::format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
);

/// Parses an `expireTime` string, returning `None` when it does not match the record pattern.
pub fn parse_expire_time(raw: &str) -> Option<OffsetDateTime> {
	OffsetDateTime::parse(raw, EXPIRE_TIME_FORMAT).ok()
}

/// Renders an instant using the record pattern. Sub-second precision is dropped.
pub fn format_expire_time(instant: OffsetDateTime) -> Result<String, ConfigError> {
	Ok(instant.format(EXPIRE_TIME_FORMAT)?)
}

/// Typed view over a stored token map.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRecord {
	/// Raw access token; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant after which the token is no longer served from cache.
	pub expire_time: OffsetDateTime,
}
impl TokenRecord {
	/// Builds a record from its parts.
	pub fn new(access_token: impl Into<String>, expire_time: OffsetDateTime) -> Self {
		Self { access_token: TokenSecret::new(access_token), expire_time }
	}

	/// Reads both fields from a stored map; any missing or malformed field yields `None`.
	pub fn from_map(map: &TokenMap) -> Option<Self> {
		let expire_time = read_expire_time(map)?;
		let access_token = read_access_token(map)?;

		Some(Self { access_token: TokenSecret::new(access_token), expire_time })
	}

	/// Renders the record into the map shape persisted by the store.
	pub fn to_map(&self) -> Result<TokenMap, ConfigError> {
		let mut map = TokenMap::new();

		map.insert(ACCESS_TOKEN_KEY.into(), self.access_token.expose().into());
		map.insert(EXPIRE_TIME_KEY.into(), format_expire_time(self.expire_time)?.into());

		Ok(map)
	}

	/// Returns `true` once `instant` is strictly past the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant > self.expire_time
	}

	/// Returns the `Bearer <token>` header value.
	pub fn bearer(&self) -> String {
		bearer(self.access_token.expose())
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("access_token", &"<redacted>")
			.field("expire_time", &self.expire_time)
			.finish()
	}
}

/// Classification of whatever is stored under the token key at a given instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheState {
	/// Nothing is stored.
	Absent,
	/// The expiry is past, missing, or does not match the record pattern.
	Expired,
	/// The expiry is in the future but the access token cannot be read.
	Unreadable,
	/// A servable record.
	Valid(TokenRecord),
}
impl CacheState {
	/// Classifies a stored entry relative to `now`.
	pub fn classify(entry: Option<&TokenMap>, now: OffsetDateTime) -> Self {
		let Some(map) = entry else {
			return Self::Absent;
		};
		let Some(expire_time) = read_expire_time(map) else {
			return Self::Expired;
		};

		match read_access_token(map).map(|token| TokenRecord::new(token, expire_time)) {
			Some(record) if record.is_expired_at(now) => Self::Expired,
			Some(record) => Self::Valid(record),
			None if now > expire_time => Self::Expired,
			None => Self::Unreadable,
		}
	}
}

/// Reads the access token sub-key, accepting string values only.
pub fn read_access_token(map: &TokenMap) -> Option<&str> {
	map.get(ACCESS_TOKEN_KEY).and_then(JsonValue::as_str)
}

fn read_expire_time(map: &TokenMap) -> Option<OffsetDateTime> {
	map.get(EXPIRE_TIME_KEY).and_then(JsonValue::as_str).and_then(parse_expire_time)
}
