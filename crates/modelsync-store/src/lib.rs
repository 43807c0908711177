//! # Modelsync Store
//!
//! Persistent key-value store collaborators used by the catalog cache.
//!
//! ## Overview
//!
//! The catalog cache only ever talks to a store through the four-method
//! [`KeyValueStore`] contract:
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`init`](KeyValueStore::init) | Open the store (idempotent) |
//! | [`get`](KeyValueStore::get) | Read a JSON value by key |
//! | [`set`](KeyValueStore::set) | Stage a JSON value under a key |
//! | [`save`](KeyValueStore::save) | Flush staged values to durable storage |
//!
//! Callers are expected to `init` before every `get`/`set` and to `save` after
//! every `set` in the same logical operation.
//!
//! ## Implementations
//!
//! | Type | Backing | Typical use |
//! |------|---------|-------------|
//! | [`MemoryStore`] | `BTreeMap` behind a tokio `RwLock` | tests, ephemeral runs |
//! | [`JsonFileStore`] | single JSON document on disk | CLI / desktop cache file |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modelsync_store::{JsonFileStore, KeyValueStore};
//!
//! # async fn demo() -> Result<(), modelsync_store::StoreError> {
//! let store = JsonFileStore::new("remote-cache.json");
//! store.init().await?;
//! store.set("greeting", serde_json::json!({ "hello": "world" })).await?;
//! store.save().await?;
//! # Ok(())
//! # }
//! ```

mod json_file;
mod memory;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde_json::Value;
use thiserror::Error;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors raised by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while reading or writing the backing file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The backing document could not be encoded or decoded.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `get`/`set`/`save` was called before `init`.
    #[error("store must be initialized before use")]
    NotInitialized,

    /// The backing document is valid JSON but not an object.
    #[error("store document at '{}' is not a JSON object", path.display())]
    InvalidDocument { path: PathBuf },
}

/// Asynchronous key-value store contract consumed by the catalog cache.
///
/// Methods return boxed futures so the trait stays object safe and can be
/// shared as `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Opens the store. Calling it more than once is allowed.
    fn init<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;

    /// Reads the value stored under `key`, `None` when absent.
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, StoreError>> + Send + 'a>>;

    /// Stages `value` under `key`. Durable only after [`save`](KeyValueStore::save).
    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;

    /// Flushes staged values.
    fn save<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;
}
