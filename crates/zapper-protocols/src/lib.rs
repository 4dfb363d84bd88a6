//! # Zapper Protocols
//!
//! Shared shapes for the zapper core: the persisted record layout, the
//! messages exchanged with the coordinator, and the traits behind which
//! storage and tab messaging live.
//!
//! ## Core Traits
//!
//! - [`ZapStore`] - Key-value storage holding zap records and tab flags
//! - [`TabTransport`] - Delivery of core messages to a tab's page context

pub mod error;
pub mod message;
pub mod record;
pub mod store;
pub mod transport;

pub use error::{ProtocolError, StoreError, TransportError};
pub use message::{ZapMessage, ZapResponse};
pub use record::{PageKey, TabModeKey, ZapRecord};
pub use store::ZapStore;
pub use transport::TabTransport;
