//! Fetch-and-sync orchestration with tiered fallback.
//!
//! ```text
//! remote (retry + timeout) ──ok──▶ adapt ──▶ persist ──▶ Freshness::Remote
//!        │ failed
//!        ▼
//! cache snapshot ──hit──▶ adapt ──▶ Freshness::Cached { remote_error }
//!        │ miss
//!        ▼
//! SyncFailure
//! ```

use std::sync::Arc;

use modelsync_store::KeyValueStore;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::adapter::adapt_catalog;
use crate::cache::{CachedSnapshot, CatalogCache};
use crate::config::{FetchOptions, SyncConfig};
use crate::domain::{ProviderCatalogEntry, RawCatalogResponse, UtcDateTime};
use crate::error::{FetchError, SyncFailure, ValidationError};
use crate::http_client::HttpClient;
use crate::timed_call::timed_get;

/// Where the providers of a [`SyncOutcome`] came from.
#[derive(Debug)]
pub enum Freshness {
    /// Fetched from the remote endpoint during this call.
    Remote { last_remote_update: UtcDateTime },
    /// Served from the cache. `remote_error` is set when the remote tier was
    /// tried and failed, and is `None` when a fresh cache short-circuited it.
    Cached {
        last_remote_update: UtcDateTime,
        remote_error: Option<FetchError>,
    },
}

/// Origin label used in logs and rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Remote,
    Cache,
}

/// Successful (possibly degraded) result of a sync call.
#[derive(Debug)]
pub struct SyncOutcome {
    pub providers: Vec<ProviderCatalogEntry>,
    pub freshness: Freshness,
}

impl SyncOutcome {
    pub fn source(&self) -> DataSource {
        match self.freshness {
            Freshness::Remote { .. } => DataSource::Remote,
            Freshness::Cached { .. } => DataSource::Cache,
        }
    }

    pub fn last_remote_update(&self) -> UtcDateTime {
        match self.freshness {
            Freshness::Remote { last_remote_update }
            | Freshness::Cached {
                last_remote_update, ..
            } => last_remote_update,
        }
    }

    /// Error of the failed remote tier, if the data is a fallback.
    pub fn remote_error(&self) -> Option<&FetchError> {
        match &self.freshness {
            Freshness::Cached {
                remote_error: Some(error),
                ..
            } => Some(error),
            _ => None,
        }
    }

    /// True when the remote tier failed and cached data was served instead.
    pub fn is_degraded(&self) -> bool {
        self.remote_error().is_some()
    }
}

/// Remote catalog service: fetch, adapt, cache, fall back.
///
/// Calls are independent and may overlap. Overlapping calls race on the
/// single cache slot and the last writer wins.
pub struct CatalogSync {
    config: SyncConfig,
    client: Arc<dyn HttpClient>,
    cache: CatalogCache,
}

impl CatalogSync {
    pub fn new(
        config: SyncConfig,
        client: Arc<dyn HttpClient>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        let cache = CatalogCache::new(store).with_expiry(config.cache_expiry);
        Ok(Self {
            config,
            client,
            cache,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Fetches the remote catalog and persists it, falling back to the cache
    /// when every remote attempt fails.
    pub async fn fetch_and_sync(&self, options: FetchOptions) -> Result<SyncOutcome, SyncFailure> {
        self.run(&options).await
    }

    /// Same as [`fetch_and_sync`](Self::fetch_and_sync), with `force_refresh` set.
    pub async fn refresh(&self, options: FetchOptions) -> Result<SyncOutcome, SyncFailure> {
        let options = FetchOptions {
            force_refresh: true,
            ..options
        };
        self.run(&options).await
    }

    /// Serves a fresh cache without touching the network. Stale, missing or
    /// unreadable caches, and `force_refresh`, go through
    /// [`fetch_and_sync`](Self::fetch_and_sync).
    pub async fn load_or_fetch(&self, options: FetchOptions) -> Result<SyncOutcome, SyncFailure> {
        if !options.force_refresh {
            match self.cache.load_snapshot().await {
                Ok(snapshot) => {
                    let last_remote_update = snapshot.metadata.last_remote_update;
                    if self.cache.is_remote_data_fresh(last_remote_update) {
                        debug!(%last_remote_update, "serving fresh provider cache");
                        return Ok(self.cached_outcome(snapshot, None));
                    }
                    debug!(%last_remote_update, "provider cache is stale");
                }
                Err(error) => debug!(code = error.code(), "provider cache unavailable: {error}"),
            }
        }

        self.run(&options).await
    }

    /// Retry-controlled remote fetch and parse, without fallback or caching.
    pub async fn fetch_remote(
        &self,
        options: &FetchOptions,
    ) -> Result<RawCatalogResponse, FetchError> {
        let policy = self.config.retry_policy(options);
        let timeout = self.config.effective_timeout(options);
        let cancel = options.cancel.as_ref();
        let client = self.client.as_ref();
        let endpoint = self.config.endpoint.as_str();

        policy
            .execute(cancel, |_| async move {
                let response = timed_get(client, endpoint, timeout, cancel).await?;
                RawCatalogResponse::from_json_slice(response.body.as_bytes()).map_err(|e| {
                    FetchError::parse("catalog response is not a valid provider map", e)
                })
            })
            .await
    }

    async fn run(&self, options: &FetchOptions) -> Result<SyncOutcome, SyncFailure> {
        let remote_error = match self.fetch_remote(options).await {
            Ok(raw) => return Ok(self.accept_remote(raw).await),
            Err(error) => error,
        };

        warn!(
            code = remote_error.code(),
            force_refresh = options.force_refresh,
            "remote catalog unavailable, falling back to cache: {remote_error}"
        );

        match self.cache.load_snapshot().await {
            Ok(snapshot) => Ok(self.cached_outcome(snapshot, Some(remote_error))),
            Err(cache_error) => {
                error!(
                    remote_code = remote_error.code(),
                    cache_code = cache_error.code(),
                    "no provider data from remote or cache"
                );
                Err(SyncFailure::new(remote_error, cache_error))
            }
        }
    }

    async fn accept_remote(&self, raw: RawCatalogResponse) -> SyncOutcome {
        let providers = adapt_catalog(&raw, &self.config.allowed_providers);
        let fetched_at = UtcDateTime::now();

        if let Err(error) = self
            .cache
            .save_snapshot(&CachedSnapshot::remote(raw, fetched_at))
            .await
        {
            warn!(code = error.code(), "failed to write provider cache: {error}");
        }

        info!(providers = providers.len(), "provider catalog synced from remote");
        SyncOutcome {
            providers,
            freshness: Freshness::Remote {
                last_remote_update: fetched_at,
            },
        }
    }

    fn cached_outcome(
        &self,
        snapshot: CachedSnapshot,
        remote_error: Option<FetchError>,
    ) -> SyncOutcome {
        SyncOutcome {
            providers: adapt_catalog(&snapshot.api_response, &self.config.allowed_providers),
            freshness: Freshness::Cached {
                last_remote_update: snapshot.metadata.last_remote_update,
                remote_error,
            },
        }
    }
}

impl std::fmt::Debug for CatalogSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSync")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
