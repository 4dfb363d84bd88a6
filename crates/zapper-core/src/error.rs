//! Core error types.

use thiserror::Error;
use zapper_dom::DomError;
use zapper_protocols::{StoreError, TransportError};

#[derive(Debug, Error)]
pub enum ZapError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Zap mode is unavailable on {0}")]
    RestrictedUrl(String),

    #[error("Tab {0} rejected the command")]
    Rejected(u64),

    #[error("Unknown context menu item: {0}")]
    UnknownMenuItem(String),
}
