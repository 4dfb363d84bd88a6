//! Input events and the document's listener registry.
//!
//! Listeners are registrations, not closures: the component that installed
//! one is named by its owner tag and the host routes each dispatched event to
//! the owners registered for its kind, capture-phase registrations first.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Event types the zapper core listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    PointerMove,
    PointerDown,
    Click,
    KeyDown,
    ContextMenu,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::default()
        }
    }
}

/// A dispatched input event.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// The node the event was dispatched to.
    pub target: NodeId,
    pub client_x: f64,
    pub client_y: f64,
    /// Key name for keyboard events (`"Escape"`, `"a"`, ...).
    pub key: Option<String>,
    pub modifiers: Modifiers,
}

impl DomEvent {
    fn pointer(kind: EventKind, target: NodeId, x: f64, y: f64) -> Self {
        Self {
            kind,
            target,
            client_x: x,
            client_y: y,
            key: None,
            modifiers: Modifiers::default(),
        }
    }

    pub fn pointer_move(target: NodeId, x: f64, y: f64) -> Self {
        Self::pointer(EventKind::PointerMove, target, x, y)
    }

    pub fn pointer_down(target: NodeId, x: f64, y: f64) -> Self {
        Self::pointer(EventKind::PointerDown, target, x, y)
    }

    pub fn click(target: NodeId, x: f64, y: f64) -> Self {
        Self::pointer(EventKind::Click, target, x, y)
    }

    pub fn context_menu(target: NodeId, x: f64, y: f64) -> Self {
        Self::pointer(EventKind::ContextMenu, target, x, y)
    }

    pub fn key_down(target: NodeId, key: &str) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            client_x: 0.0,
            client_y: 0.0,
            key: Some(key.to_string()),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What the listeners did to an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    pub immediate_propagation_stopped: bool,
}

impl EventOutcome {
    /// Let the event continue untouched.
    pub fn pass() -> Self {
        Self::default()
    }

    /// `preventDefault` + `stopPropagation`.
    pub fn prevent_and_stop() -> Self {
        Self {
            default_prevented: true,
            propagation_stopped: true,
            immediate_propagation_stopped: false,
        }
    }

    /// `preventDefault` + `stopPropagation` + `stopImmediatePropagation`.
    pub fn suppress() -> Self {
        Self {
            default_prevented: true,
            propagation_stopped: true,
            immediate_propagation_stopped: true,
        }
    }

    pub fn merge(&mut self, other: EventOutcome) {
        self.default_prevented |= other.default_prevented;
        self.propagation_stopped |= other.propagation_stopped;
        self.immediate_propagation_stopped |= other.immediate_propagation_stopped;
    }

    /// Whether the page's own handlers still receive the event.
    pub fn reaches_page(&self) -> bool {
        !self.propagation_stopped
    }
}

/// Handle returned when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Registration {
    id: ListenerId,
    kind: EventKind,
    capture: bool,
    owner: &'static str,
}

/// Document-level listener registrations.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<Registration>,
}

impl ListenerRegistry {
    pub fn add(&mut self, kind: EventKind, capture: bool, owner: &'static str) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(Registration {
            id,
            kind,
            capture,
            owner,
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        before != self.entries.len()
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    /// Owners to notify for `kind`, capture phase first, each phase in
    /// registration order.
    pub fn dispatch_order(&self, kind: EventKind) -> Vec<(ListenerId, &'static str)> {
        let capture = self.entries.iter().filter(|r| r.kind == kind && r.capture);
        let bubble = self.entries.iter().filter(|r| r.kind == kind && !r.capture);
        capture.chain(bubble).map(|r| (r.id, r.owner)).collect()
    }

    pub fn count_for(&self, owner: &str) -> usize {
        self.entries.iter().filter(|r| r.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
