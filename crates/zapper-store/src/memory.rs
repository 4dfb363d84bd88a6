//! In-memory storage.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use zapper_protocols::{StoreError, ZapStore};

/// In-memory key-value store, used for tests and `backend = "memory"`.
pub struct MemoryZapStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryZapStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            values: RwLock::new(entries.into_iter().collect()),
        }
    }
}

impl Default for MemoryZapStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ZapStore for MemoryZapStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let values = self.values.read().await;
        let mut keys: Vec<String> = values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
