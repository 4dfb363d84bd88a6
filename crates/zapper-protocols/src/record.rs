//! Persisted record shapes.
//!
//! A page's zaps live under `zapped_<full URL>` as a JSON array of selector
//! strings in zap order. Tab activation flags live under `zapMode_<tabId>`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

const PAGE_KEY_PREFIX: &str = "zapped_";
const TAB_MODE_PREFIX: &str = "zapMode_";

/// Storage key identifying one page's zap record.
///
/// Derived byte-for-byte from the full URL, query string and fragment
/// included, so two documents share a record only if their URLs are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
    pub fn from_url(url: &str) -> Self {
        Self(format!("{}{}", PAGE_KEY_PREFIX, url))
    }

    /// Parse a raw storage key, returning `None` for keys of other records.
    pub fn parse(key: &str) -> Option<Self> {
        key.starts_with(PAGE_KEY_PREFIX)
            .then(|| Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URL this key was derived from.
    pub fn url(&self) -> &str {
        &self.0[PAGE_KEY_PREFIX.len()..]
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage key of a tab's zap-mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabModeKey(pub u64);

impl TabModeKey {
    pub fn storage_key(&self) -> String {
        format!("{}{}", TAB_MODE_PREFIX, self.0)
    }
}

/// The selectors zapped on one page, in zap order and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZapRecord {
    pub page_key: PageKey,
    pub selectors: Vec<String>,
}

impl ZapRecord {
    pub fn empty(page_key: PageKey) -> Self {
        Self {
            page_key,
            selectors: Vec::new(),
        }
    }

    /// Decode a stored value. A missing value is an empty record.
    pub fn from_value(page_key: PageKey, value: Option<Value>) -> Result<Self, StoreError> {
        let selectors = match value {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<String>>(value).map_err(|e| {
                StoreError::InvalidValue {
                    key: page_key.to_string(),
                    message: e.to_string(),
                }
            })?,
        };
        Ok(Self {
            page_key,
            selectors,
        })
    }

    pub fn to_value(&self) -> Value {
        Value::from(self.selectors.clone())
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }

    /// Append `selector` unless already present. Returns whether it was added.
    pub fn insert(&mut self, selector: impl Into<String>) -> bool {
        let selector = selector.into();
        if self.contains(&selector) {
            return false;
        }
        self.selectors.push(selector);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}
