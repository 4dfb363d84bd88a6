//! # Zapper DOM
//!
//! The document the zapper core works against: a generational node arena
//! with attributes, inline styles and layout rectangles, plus coordinate hit
//! testing, a listener registry, a child-list mutation observer and a CSS
//! selector engine covering what generated and hand-written zap selectors use.
//!
//! Node handles ([`NodeId`]) are weak: once a subtree is removed every handle
//! into it stops resolving instead of pointing at a recycled node.

mod document;
mod error;
mod events;
mod geometry;
mod hit_test;
mod mutation;
mod node;
pub mod selector;
mod snapshot;

pub use document::{Document, ReadyState};
pub use error::DomError;
pub use events::{DomEvent, EventKind, EventOutcome, ListenerId, ListenerRegistry, Modifiers};
pub use geometry::{BoundingBox, ViewportInfo};
pub use mutation::MutationRecord;
pub use node::{ElementData, InlineStyle, NodeId, NodeKind};
pub use selector::{css_escape, SelectorError, SelectorList};
pub use snapshot::{ElementSnapshot, NodeSnapshot, PageSnapshot};
