//! # Modelsync Core
//!
//! Resilient fetch-and-cache service for a remote catalog of model providers.
//!
//! ## Overview
//!
//! The service pulls a provider catalog from one HTTP endpoint, keeps only
//! allow-listed providers, and degrades through three tiers:
//!
//! - **Fresh remote data**, persisted to the cache on success
//! - **Stale cached data**, returned together with the remote error
//! - **Explicit failure** when neither tier has data
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapter`] | Wire catalog to normalized entries, allow-list filtering |
//! | [`cache`] | Snapshot persistence over a key-value store |
//! | [`config`] | Service configuration and per-call options |
//! | [`domain`] | Wire and internal catalog types, UTC timestamps |
//! | [`error`] | Fetch error taxonomy and validation errors |
//! | [`http_client`] | HTTP transport abstraction and reqwest client |
//! | [`retry`] | Retry policy with exponential backoff |
//! | [`sync`] | Orchestrator with tiered fallback |
//! | [`timed_call`] | Single cancellable GET with a deadline |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use modelsync_core::{CatalogSync, FetchOptions, ReqwestHttpClient, SyncConfig};
//! use modelsync_store::JsonFileStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sync = CatalogSync::new(
//!         SyncConfig::default(),
//!         Arc::new(ReqwestHttpClient::new()),
//!         Arc::new(JsonFileStore::new("remote-cache.json")),
//!     )?;
//!
//!     let outcome = sync.fetch_and_sync(FetchOptions::new()).await?;
//!     for provider in &outcome.providers {
//!         println!("{} ({} models)", provider.provider_name, provider.models.len());
//!     }
//!     if let Some(error) = outcome.remote_error() {
//!         eprintln!("served cached data: {error}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CatalogSync    │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  RetryPolicy    │────▶│ timed_get        │──▶ HttpClient
//! └────────┬────────┘     └──────────────────┘
//!          │ ok / exhausted
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  adapt_catalog  │◀───▶│ CatalogCache     │──▶ KeyValueStore
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod adapter;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod retry;
pub mod sync;
pub mod timed_call;

pub use adapter::adapt_catalog;
pub use cache::{
    CachedSnapshot, CatalogCache, SnapshotMetadata, SnapshotSource, CACHE_KEY,
    DEFAULT_CACHE_EXPIRY,
};
pub use config::{FetchOptions, SyncConfig, DEFAULT_ALLOWED_PROVIDERS, DEFAULT_ENDPOINT};
pub use domain::{
    find_provider, ModelDetail, ProviderCatalogEntry, RawCatalogResponse, UtcDateTime,
    WireModel, WireProvider,
};
pub use error::{BoxError, FetchError, FetchErrorKind, SyncFailure, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use retry::{is_retryable, RetryPolicy};
pub use sync::{CatalogSync, DataSource, Freshness, SyncOutcome};
pub use timed_call::timed_get;

pub use modelsync_store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use tokio_util::sync::CancellationToken;
