//! Tab messaging errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("No receiver in tab {0}")]
    NoReceiver(u64),

    #[error("Tab {0} closed before responding")]
    Disconnected(u64),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Could not inject into tab {tab_id}: {reason}")]
    Injection { tab_id: u64, reason: String },
}
