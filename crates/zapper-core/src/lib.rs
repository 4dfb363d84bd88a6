//! # Zapper Core
//!
//! The page-context half of Zapper and the coordinator that drives it.
//!
//! - [`SelectorGenerator`] fingerprints an element as a selector string
//! - [`TargetingMachine`] tracks the pointer while zap mode is active,
//!   draws the highlight and turns clicks into zap requests
//! - [`PersistenceEngine`] records zapped selectors per page and re-applies
//!   them on load and after DOM mutations
//! - [`ZapAgent`] owns one document and wires the three together
//! - [`Coordinator`] keeps per-tab mode flags and relays commands to tabs

pub mod agent;
pub mod coordinator;
pub mod error;
pub mod generator;
pub mod persistence;
pub mod targeting;
pub mod timer;

pub use agent::{SharedAgent, ZapAgent};
pub use coordinator::{ContextMenuItem, Coordinator, LocalTabs, CONTEXT_MENU_ITEMS};
pub use error::ZapError;
pub use generator::SelectorGenerator;
pub use persistence::{record_zap, PersistenceEngine, RestoreReport, ZAPPED_ATTR};
pub use targeting::{TargetingMachine, TargetingState, TooltipPlacement, ZapTrigger};
pub use timer::{TimerId, TimerQueue, TimerTask};
