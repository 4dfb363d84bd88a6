//! Storage backend errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Unexpected value under key {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error() {
        let err = StoreError::StorageError("quota exceeded".to_string());
        let display = err.to_string();
        assert!(display.contains("Storage error"));
        assert!(display.contains("quota exceeded"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = StoreError::InvalidValue {
            key: "zapped_https://a.test/".to_string(),
            message: "expected array".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("zapped_https://a.test/"));
        assert!(display.contains("expected array"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = StoreError::from(io_err);
        assert!(err.to_string().contains("read-only"));
    }
}
