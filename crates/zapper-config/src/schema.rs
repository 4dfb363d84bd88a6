//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub targeting: TargetingConfig,

    #[serde(default)]
    pub selector: SelectorConfig,

    #[serde(default)]
    pub zap: ZapConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hover tracking and tooltip rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingConfig {
    /// Minimum spacing between processed pointer-move samples.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Gap between the highlighted element and the tooltip.
    #[serde(default = "default_tooltip_gap")]
    pub tooltip_gap_px: f64,

    /// Extra room required above the element before the tooltip goes there.
    #[serde(default = "default_tooltip_clearance")]
    pub tooltip_clearance_px: f64,

    /// Characters of element text shown in the tooltip.
    #[serde(default = "default_max_tooltip_text")]
    pub max_tooltip_text: usize,

    /// Class names shown in the tooltip label.
    #[serde(default = "default_max_tooltip_classes")]
    pub max_tooltip_classes: usize,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            tooltip_gap_px: default_tooltip_gap(),
            tooltip_clearance_px: default_tooltip_clearance(),
            max_tooltip_text: default_max_tooltip_text(),
            max_tooltip_classes: default_max_tooltip_classes(),
        }
    }
}

fn default_throttle_ms() -> u64 {
    16
}

fn default_tooltip_gap() -> f64 {
    8.0
}

fn default_tooltip_clearance() -> f64 {
    10.0
}

fn default_max_tooltip_text() -> usize {
    50
}

fn default_max_tooltip_classes() -> usize {
    3
}

/// Selector generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Ancestor levels walked by the positional fallback.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    10
}

/// Zap visual effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZapConfig {
    /// Opacity fade before the element is hidden.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

impl Default for ZapConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
        }
    }
}

fn default_transition_ms() -> u64 {
    200
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// JSON file backing the `file` backend.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_storage_path(),
        }
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_storage_path() -> PathBuf {
    zapper_dir().join("storage.json")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory receiving the daily rolling log files.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    zapper_dir().join("logs")
}

/// Base directory for zapper state (`~/.zapper`).
pub fn zapper_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".zapper"))
        .unwrap_or_else(|| PathBuf::from("/tmp/zapper"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.targeting.throttle_ms, 16);
        assert_eq!(config.targeting.tooltip_gap_px, 8.0);
        assert_eq!(config.targeting.tooltip_clearance_px, 10.0);
        assert_eq!(config.selector.max_depth, 10);
        assert_eq!(config.zap.transition_ms, 200);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.storage.path.ends_with("storage.json"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.selector.max_depth, config.selector.max_depth);
        assert_eq!(parsed.storage.backend, config.storage.backend);
    }

    #[test]
    fn test_backend_names() {
        let parsed: StorageConfig = toml::from_str("backend = \"memory\"").unwrap();
        assert_eq!(parsed.backend, StorageBackend::Memory);
        assert!(toml::from_str::<StorageConfig>("backend = \"redis\"").is_err());
    }
}
