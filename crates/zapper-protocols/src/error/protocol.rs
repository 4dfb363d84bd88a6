//! Top-level protocol error type.

use thiserror::Error;

use super::{StoreError, TransportError};

/// Top-level protocol error type.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_from() {
        let err = ProtocolError::from(StoreError::StorageError("x".to_string()));
        assert!(err.to_string().contains("Store error"));
    }

    #[test]
    fn test_transport_error_from() {
        let err = ProtocolError::from(TransportError::NoReceiver(1));
        assert!(err.to_string().contains("Transport error"));
    }

    #[test]
    fn test_serialization_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProtocolError::from(json_err);
        assert!(err.to_string().contains("Serialization error"));
    }
}
