//! Error types for the zapper protocol layer.

mod protocol;
mod store;
mod transport;

pub use protocol::*;
pub use store::*;
pub use transport::*;
