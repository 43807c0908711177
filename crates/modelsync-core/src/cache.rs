//! Persistence of the last successful remote catalog.

use std::sync::Arc;
use std::time::Duration;

use modelsync_store::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::adapt_catalog;
use crate::domain::{ProviderCatalogEntry, RawCatalogResponse, UtcDateTime};
use crate::error::FetchError;

/// Store key holding the cached snapshot.
pub const CACHE_KEY: &str = "remoteModelCache";

/// Default age after which cached data counts as stale.
pub const DEFAULT_CACHE_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

/// Unfiltered remote response plus when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    pub api_response: RawCatalogResponse,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub last_remote_update: UtcDateTime,
    pub source: SnapshotSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Remote,
}

impl CachedSnapshot {
    pub fn remote(api_response: RawCatalogResponse, fetched_at: UtcDateTime) -> Self {
        Self {
            api_response,
            metadata: SnapshotMetadata {
                last_remote_update: fetched_at,
                source: SnapshotSource::Remote,
            },
        }
    }
}

/// Catalog cache over a [`KeyValueStore`].
///
/// The store always holds the unfiltered response; the allow-list is applied
/// on every read.
#[derive(Clone)]
pub struct CatalogCache {
    store: Arc<dyn KeyValueStore>,
    expiry: Duration,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            expiry: DEFAULT_CACHE_EXPIRY,
        }
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Persists `raw` stamped with the current time.
    pub async fn save_cached_provider_data(
        &self,
        raw: &RawCatalogResponse,
    ) -> Result<UtcDateTime, FetchError> {
        let fetched_at = UtcDateTime::now();
        self.save_snapshot(&CachedSnapshot::remote(raw.clone(), fetched_at))
            .await?;
        Ok(fetched_at)
    }

    /// Overwrites the cache slot with `snapshot`.
    pub async fn save_snapshot(&self, snapshot: &CachedSnapshot) -> Result<(), FetchError> {
        let value = serde_json::to_value(snapshot)
            .map_err(|e| FetchError::parse("failed to encode provider cache", e))?;

        self.store
            .init()
            .await
            .map_err(|e| FetchError::no_cache_with_source("provider cache is unavailable", e))?;
        self.store
            .set(CACHE_KEY, value)
            .await
            .map_err(|e| FetchError::no_cache_with_source("failed to stage provider cache", e))?;
        self.store
            .save()
            .await
            .map_err(|e| FetchError::no_cache_with_source("failed to persist provider cache", e))?;

        debug!(
            providers = snapshot.api_response.len(),
            last_remote_update = %snapshot.metadata.last_remote_update,
            "provider cache written"
        );
        Ok(())
    }

    /// Reads the raw snapshot without filtering.
    pub async fn load_snapshot(&self) -> Result<CachedSnapshot, FetchError> {
        self.store
            .init()
            .await
            .map_err(|e| FetchError::no_cache_with_source("provider cache is unavailable", e))?;
        let value = self
            .store
            .get(CACHE_KEY)
            .await
            .map_err(|e| FetchError::no_cache_with_source("provider cache is unreadable", e))?
            .ok_or_else(|| FetchError::no_cache("no cached provider data"))?;

        serde_json::from_value(value)
            .map_err(|e| FetchError::parse("cached provider data is malformed", e))
    }

    /// Loads the cached catalog adapted through `allow_list`.
    pub async fn load_cached_provider_data<S: AsRef<str>>(
        &self,
        allow_list: &[S],
    ) -> Result<Vec<ProviderCatalogEntry>, FetchError> {
        let snapshot = self.load_snapshot().await?;
        Ok(adapt_catalog(&snapshot.api_response, allow_list))
    }

    /// Whether data fetched at `last_remote_update` is still fresh now.
    pub fn is_remote_data_fresh(&self, last_remote_update: UtcDateTime) -> bool {
        self.is_fresh_at(last_remote_update, UtcDateTime::now())
    }

    /// Fresh iff less than the expiry has elapsed between the two instants.
    pub fn is_fresh_at(&self, last_remote_update: UtcDateTime, now: UtcDateTime) -> bool {
        last_remote_update.elapsed_until(now) < self.expiry
    }
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("key", &CACHE_KEY)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use modelsync_store::MemoryStore;
    use serde_json::json;

    use super::*;
    use crate::domain::WireProvider;
    use crate::error::FetchErrorKind;

    fn raw() -> RawCatalogResponse {
        RawCatalogResponse::new().with_provider(
            "moonshotai",
            WireProvider::new("moonshotai", "Moonshot AI")
                .with_api("https://api.moonshot.cn/v1")
                .with_model("kimi-k2", "Kimi K2"),
        )
    }

    #[test]
    fn snapshot_uses_camel_case_layout() {
        let fetched_at = UtcDateTime::parse("2024-05-01T12:00:00Z").expect("timestamp");
        let value = serde_json::to_value(CachedSnapshot::remote(raw(), fetched_at)).expect("encode");

        assert_eq!(value["metadata"]["lastRemoteUpdate"], "2024-05-01T12:00:00Z");
        assert_eq!(value["metadata"]["source"], "remote");
        assert_eq!(value["apiResponse"]["moonshotai"]["name"], "Moonshot AI");
    }

    #[tokio::test]
    async fn save_runs_init_set_save() {
        let store = MemoryStore::new();
        let cache = CatalogCache::new(Arc::new(store.clone()));

        cache.save_cached_provider_data(&raw()).await.expect("save");

        assert_eq!(store.init_calls().await, 1);
        assert_eq!(store.save_calls().await, 1);
        assert!(store.peek(CACHE_KEY).await.is_some());
    }

    #[tokio::test]
    async fn missing_entry_is_no_cache() {
        let cache = CatalogCache::new(Arc::new(MemoryStore::new()));

        let error = cache
            .load_cached_provider_data(&["moonshotai"])
            .await
            .expect_err("empty store");

        assert_eq!(error.kind(), FetchErrorKind::NoCache);
    }

    #[tokio::test]
    async fn malformed_entry_is_parse_error() {
        let store = MemoryStore::with_entry(CACHE_KEY, json!({ "apiResponse": 42 }));
        let cache = CatalogCache::new(Arc::new(store));

        let error = cache.load_snapshot().await.expect_err("malformed");

        assert_eq!(error.kind(), FetchErrorKind::ParseError);
    }

    #[test]
    fn freshness_is_strictly_less_than_expiry() {
        let cache = CatalogCache::new(Arc::new(MemoryStore::new()))
            .with_expiry(Duration::from_secs(60));
        let now = UtcDateTime::parse("2024-05-01T12:00:00Z").expect("timestamp");

        assert!(cache.is_fresh_at(now.saturating_sub(Duration::from_secs(59)), now));
        assert!(!cache.is_fresh_at(now.saturating_sub(Duration::from_secs(60)), now));
        assert!(cache.is_fresh_at(now, now));
    }
}
