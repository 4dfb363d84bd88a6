//! Tab messaging protocol.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::message::{ZapMessage, ZapResponse};

/// Delivers a [`ZapMessage`] to the page context running in a tab and
/// returns its reply.
#[async_trait]
pub trait TabTransport: Send + Sync {
    async fn send(&self, tab_id: u64, message: ZapMessage) -> Result<ZapResponse, TransportError>;

    /// Load the page context into a tab that has none yet, e.g. a tab opened
    /// before the extension was installed. Transports that cannot inject
    /// report [`TransportError::Injection`].
    async fn inject(&self, tab_id: u64) -> Result<(), TransportError> {
        Err(TransportError::Injection {
            tab_id,
            reason: "not supported by this transport".to_string(),
        })
    }
}
