//! Demonstrates the full refresh cycle against mocked HTTP backends: the first lookup signs in
//! and triggers the callable, the pushed token is delivered into the cache, and the second lookup
//! serves it from the file-backed store.

// std
use std::{env, fs, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use bearer_token_cache::{
	TokenCache,
	config::ProviderConfig,
	events::TokenEvent,
	http::{HttpAnonymousAuth, HttpTokenIssuer, SessionSlot},
	store::FileStore,
	token::TokenRecord,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let sign_in = server
		.mock_async(|when, then| {
			when.method(POST).path("/signup");
			then.status(200).json_body(serde_json::json!({ "idToken": "demo-session" }));
		})
		.await;
	let callable = server
		.mock_async(|when, then| {
			when.method(POST).path("/getOAuthToken").header("authorization", "Bearer demo-session");
			then.status(200).json_body(serde_json::json!({ "result": { "status": "queued" } }));
		})
		.await;
	let session = SessionSlot::default();
	let auth = HttpAnonymousAuth::new(Url::parse(&server.url("/signup"))?, session.clone());
	let issuer = HttpTokenIssuer::from_base_url(&Url::parse(&server.url("/"))?, session)?;
	let store_path = env::temp_dir().join("bearer_token_cache_demo.json");

	// Start from an empty cache so the first lookup always refreshes.
	let _ = fs::remove_file(&store_path);

	let config = ProviderConfig::builder("demo-device").build()?;
	let store = Arc::new(FileStore::open(&store_path)?);

	println!("Snapshot file: {}.", store.path().display());

	let cache = TokenCache::new(config, store, Arc::new(auth), Arc::new(issuer));

	cache.subscribe(|event: TokenEvent| println!("Event: {event}."));

	match cache.get_token().await? {
		Some(bearer) => println!("Served from cache: {bearer}."),
		None => println!("Refresh requested; waiting for delivery."),
	}

	// Stand-in for the push channel that carries the issued token.
	cache.receive_record(&TokenRecord::new(
		"demo-access",
		OffsetDateTime::now_utc() + Duration::hours(1),
	))?;

	if let Some(bearer) = cache.get_token().await? {
		println!("Served from cache: {bearer}.");
	}

	sign_in.assert_async().await;
	callable.assert_async().await;

	Ok(())
}
