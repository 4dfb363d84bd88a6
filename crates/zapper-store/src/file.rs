//! File-backed storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;
use zapper_protocols::{StoreError, ZapStore};

/// Key-value store persisted as a single JSON object:
///
/// ```text
/// {
///   "zapMode_12": true,
///   "zapped_https://news.example.com/a": ["#ad-123", "div.sponsor"]
/// }
/// ```
///
/// The whole object is cached in memory. Every write replaces the file
/// through a temporary sibling and a rename, so a crash mid-write leaves
/// the previous contents intact.
pub struct FileZapStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Value>>,
}

impl FileZapStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let values = Self::read_file(&path).await?;
        debug!("FileZapStore opened at {:?} with {} keys", path, values.len());

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
        if !fs::try_exists(path).await? {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            StoreError::SerializationError(format!("{}: {}", path.display(), e))
        })
    }

    /// Write `values` to disk. Called with the write lock held so file
    /// writes happen in the same order as cache updates. On failure the
    /// caller puts the cache back the way it was.
    async fn flush(&self, values: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ZapStore for FileZapStore {
    fn id(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        let previous = values.insert(key.to_string(), value);
        if let Err(e) = self.flush(&values).await {
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        let Some(old) = values.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(&values).await {
            values.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let values = self.values.read().await;
        Ok(values.keys().cloned().collect())
    }
}
