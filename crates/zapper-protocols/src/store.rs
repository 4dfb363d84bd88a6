//! Storage protocol definitions.
//!
//! The core never talks to a concrete storage API; it reads and writes JSON
//! values by key through [`ZapStore`], the way an extension uses its local
//! key-value area.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::record::{PageKey, TabModeKey, ZapRecord};

/// Core trait for key-value storage backends.
#[async_trait]
pub trait ZapStore: Send + Sync {
    /// Returns the backend ID.
    fn id(&self) -> &str;

    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove `key`; removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All stored keys, sorted.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Read a page's zap record, empty if none was ever written.
    async fn load_record(&self, page_key: &PageKey) -> Result<ZapRecord, StoreError> {
        let value = self.get(page_key.as_str()).await?;
        ZapRecord::from_value(page_key.clone(), value)
    }

    /// Write a page's zap record back in full.
    async fn save_record(&self, record: &ZapRecord) -> Result<(), StoreError> {
        self.set(record.page_key.as_str(), record.to_value()).await
    }

    /// Read a tab's zap-mode flag; absent means inactive.
    async fn tab_mode(&self, tab: TabModeKey) -> Result<bool, StoreError> {
        Ok(self
            .get(&tab.storage_key())
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn set_tab_mode(&self, tab: TabModeKey, active: bool) -> Result<(), StoreError> {
        self.set(&tab.storage_key(), Value::Bool(active)).await
    }
}
