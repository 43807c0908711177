//! In-memory key-value store.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::{KeyValueStore, StoreError};

#[derive(Debug, Default)]
struct MemoryInner {
    initialized: bool,
    entries: BTreeMap<String, Value>,
    init_calls: usize,
    save_calls: usize,
    fail_init: bool,
    fail_save: bool,
}

impl MemoryInner {
    fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.initialized {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }
}

/// Thread-safe in-memory store.
///
/// Clones share the same backing map, so a test can keep one handle for
/// inspection while the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<tokio::sync::RwLock<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` under `key`.
    ///
    /// The store still has to be initialized before `get` succeeds.
    pub fn with_entry(key: impl Into<String>, value: Value) -> Self {
        let mut inner = MemoryInner::default();
        inner.entries.insert(key.into(), value);
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(inner)),
        }
    }

    /// Read an entry without going through the `init`/`get` contract.
    pub async fn peek(&self, key: &str) -> Option<Value> {
        let inner = self.inner.read().await;
        inner.entries.get(key).cloned()
    }

    /// Number of `init` calls observed so far.
    pub async fn init_calls(&self) -> usize {
        self.inner.read().await.init_calls
    }

    /// Number of `save` calls observed so far.
    pub async fn save_calls(&self) -> usize {
        self.inner.read().await.save_calls
    }

    /// Make every subsequent `init` fail with an I/O error.
    pub async fn fail_on_init(&self, fail: bool) {
        self.inner.write().await.fail_init = fail;
    }

    /// Make every subsequent `save` fail with an I/O error.
    pub async fn fail_on_save(&self, fail: bool) {
        self.inner.write().await.fail_save = fail;
    }
}

fn injected_failure(operation: &str) -> StoreError {
    StoreError::Io(std::io::Error::other(format!("injected {operation} failure")))
}

impl KeyValueStore for MemoryStore {
    fn init<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            if inner.fail_init {
                return Err(injected_failure("init"));
            }
            inner.initialized = true;
            inner.init_calls += 1;
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            inner.ensure_initialized()?;
            Ok(inner.entries.get(key).cloned())
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.ensure_initialized()?;
            inner.entries.insert(key.to_owned(), value);
            Ok(())
        })
    }

    fn save<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            inner.ensure_initialized()?;
            inner.save_calls += 1;
            if inner.fail_save {
                return Err(injected_failure("save"));
            }
            Ok(())
        })
    }
}
