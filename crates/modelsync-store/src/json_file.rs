//! Single-document JSON file store.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde_json::{Map, Value};

use crate::{KeyValueStore, StoreError};

/// Store backed by one JSON object on disk.
///
/// `init` loads the file (a missing file is an empty store), `set` only
/// touches memory and `save` rewrites the whole document through a temporary
/// file followed by a rename. Saves hold the write lock, so overlapping flushes
/// on one store run one at a time and the last one wins.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: tokio::sync::RwLock<Option<Map<String, Value>>>,
}

impl JsonFileStore {
    /// File name used when the caller does not pick one.
    pub const DEFAULT_FILE_NAME: &'static str = "remote-cache.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: tokio::sync::RwLock::new(None),
        }
    }

    /// Store located at `dir/remote-cache.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_document(&self) -> Result<Map<String, Value>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file missing, starting empty");
                return Ok(Map::new());
            }
            Err(error) => return Err(StoreError::Io(error)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::InvalidDocument {
                path: self.path.clone(),
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| Self::DEFAULT_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for JsonFileStore {
    fn init<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut document = self.document.write().await;
            if document.is_none() {
                *document = Some(self.load_document().await?);
            }
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let document = self.document.read().await;
            let map = document.as_ref().ok_or(StoreError::NotInitialized)?;
            Ok(map.get(key).cloned())
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut document = self.document.write().await;
            let map = document.as_mut().ok_or(StoreError::NotInitialized)?;
            map.insert(key.to_owned(), value);
            Ok(())
        })
    }

    fn save<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let document = self.document.write().await;
            let map = document.as_ref().ok_or(StoreError::NotInitialized)?;
            let bytes = serde_json::to_vec_pretty(map)?;

            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }

            let temp_path = self.temp_path();
            tokio::fs::write(&temp_path, &bytes).await?;
            tokio::fs::rename(&temp_path, &self.path).await?;

            tracing::debug!(
                path = %self.path.display(),
                bytes = bytes.len(),
                "store flushed to disk"
            );
            Ok(())
        })
    }
}
