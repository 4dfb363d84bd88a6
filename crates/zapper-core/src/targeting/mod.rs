//! Targeting state machine.
//!
//! `Inactive -> Active` installs the body marker, the suppression style,
//! five document listeners and the three overlay nodes. `Active -> Inactive`
//! removes all of it and cancels the pending pointer sample. Both
//! transitions are no-ops when already in the target state.
//!
//! The machine never zaps by itself: event handlers return a [`ZapRequest`]
//! and the owning agent decides whether to act on it.

pub mod overlay;
mod session;

use tracing::{debug, info};
use zapper_config::TargetingConfig;
use zapper_dom::{Document, DomError, DomEvent, EventKind, EventOutcome, NodeId};

use crate::persistence::ZAPPED_ATTR;
use crate::timer::{TimerId, TimerQueue, TimerTask};

pub use overlay::TooltipPlacement;
pub use session::TargetingSession;

/// Listener owner tag for everything the machine registers.
pub const LISTENER_OWNER: &str = "targeting";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetingState {
    Inactive,
    Active,
}

/// What produced a zap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZapTrigger {
    /// Capture-phase pointer-down while active.
    PointerDown,
    /// Capture-phase click while active, resolved by coordinates.
    ClickBackup,
    /// Ctrl/Cmd-click, independent of mode.
    Legacy,
    /// A `zapElement` message.
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZapRequest {
    pub element: NodeId,
    pub trigger: ZapTrigger,
}

/// Result of routing one event through the machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handled {
    pub outcome: EventOutcome,
    pub zap: Option<ZapRequest>,
}

impl Handled {
    fn pass() -> Self {
        Self {
            outcome: EventOutcome::pass(),
            zap: None,
        }
    }
}

pub struct TargetingMachine {
    config: TargetingConfig,
    session: Option<TargetingSession>,
    style_node: Option<NodeId>,
}

impl TargetingMachine {
    pub fn new(config: &TargetingConfig) -> Self {
        Self {
            config: config.clone(),
            session: None,
            style_node: None,
        }
    }

    pub fn state(&self) -> TargetingState {
        if self.session.is_some() {
            TargetingState::Active
        } else {
            TargetingState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&TargetingSession> {
        self.session.as_ref()
    }

    /// The injected suppression style node, once created.
    pub fn style_node(&self) -> Option<NodeId> {
        self.style_node
    }

    /// Enter targeting mode. Returns false if already active.
    pub fn activate(&mut self, doc: &mut Document) -> Result<bool, DomError> {
        if self.session.is_some() {
            debug!("Zap mode already active");
            return Ok(false);
        }

        let body = doc.body();
        doc.set_style(body, "cursor", "crosshair")?;
        self.style_node = Some(overlay::ensure_style(doc, self.style_node)?);
        doc.set_attribute(body, overlay::MODE_ATTR, "true")?;

        let registry = doc.listeners_mut();
        let listeners = vec![
            registry.add(EventKind::PointerMove, true, LISTENER_OWNER),
            registry.add(EventKind::PointerDown, true, LISTENER_OWNER),
            registry.add(EventKind::Click, true, LISTENER_OWNER),
            registry.add(EventKind::KeyDown, false, LISTENER_OWNER),
            registry.add(EventKind::ContextMenu, true, LISTENER_OWNER),
        ];

        let highlight = overlay::create_highlight(doc)?;
        let tooltip = overlay::create_tooltip(doc)?;
        let indicator = overlay::create_indicator(doc)?;

        self.session = Some(TargetingSession {
            highlight,
            tooltip,
            indicator,
            listeners,
            pending_sample: None,
            hovered: None,
            placement: None,
        });
        info!("Zap mode activated on {}", doc.url());
        Ok(true)
    }

    /// Leave targeting mode. Returns false if already inactive.
    pub fn deactivate(&mut self, doc: &mut Document, timers: &mut TimerQueue) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        let body = doc.body();
        if let Err(e) = doc.set_style(body, "cursor", "") {
            debug!("Body cursor not reset: {}", e);
        }
        if let Err(e) = doc.remove_attribute(body, overlay::MODE_ATTR) {
            debug!("Zap mode marker not removed: {}", e);
        }

        for id in &session.listeners {
            doc.listeners_mut().remove(*id);
        }
        if let Some(timer) = session.pending_sample {
            timers.cancel(timer);
        }
        for node in session.owned_nodes() {
            overlay::discard(doc, node);
        }

        info!("Zap mode deactivated on {}", doc.url());
        true
    }

    /// Route one event registered under [`LISTENER_OWNER`].
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        timers: &mut TimerQueue,
        event: &DomEvent,
    ) -> Handled {
        if self.session.is_none() {
            return Handled::pass();
        }
        match event.kind {
            EventKind::PointerMove => {
                self.schedule_sample(timers, event.client_x, event.client_y);
                Handled::pass()
            }
            EventKind::PointerDown => self.on_pointer_down(doc, event),
            EventKind::Click => self.on_click(doc, event),
            EventKind::KeyDown => {
                if event.key.as_deref() == Some("Escape") {
                    self.deactivate(doc, timers);
                }
                Handled::pass()
            }
            EventKind::ContextMenu => {
                if overlay::is_own_node(doc, event.target) {
                    Handled::pass()
                } else {
                    Handled {
                        outcome: EventOutcome::prevent_and_stop(),
                        zap: None,
                    }
                }
            }
        }
    }

    /// Replace any pending sample with one for the latest position.
    fn schedule_sample(&mut self, timers: &mut TimerQueue, x: f64, y: f64) {
        let throttle_ms = self.config.throttle_ms;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(previous) = session.pending_sample.take() {
            timers.cancel(previous);
        }
        let timer = timers.schedule(throttle_ms, TimerTask::PointerSample { x, y });
        session.pending_sample = Some(timer);
    }

    /// Process a fired pointer sample.
    pub fn on_pointer_sample(&mut self, doc: &mut Document, timer: TimerId, x: f64, y: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.pending_sample != Some(timer) {
            return;
        }
        session.pending_sample = None;

        let Some(hit) = doc.element_from_point(x, y) else {
            self.hide_highlight(doc);
            return;
        };
        if overlay::is_own_node(doc, hit) {
            return;
        }

        let html = doc.document_element();
        let body = doc.body();
        let mut candidate = Some(hit);
        while let Some(node) = candidate {
            let skip = !doc.is_element(node) || node == body || node == html;
            if !skip {
                break;
            }
            candidate = doc.parent(node);
        }

        match candidate.filter(|n| doc.is_element(*n)) {
            Some(element) => self.show_highlight(doc, element),
            None => self.hide_highlight(doc),
        }
    }

    fn show_highlight(&mut self, doc: &mut Document, element: NodeId) {
        let Some(rect) = doc.bounding_rect(element) else {
            return;
        };
        if rect.is_empty() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let viewport = doc.viewport().clone();
        let label = overlay::describe(doc, element, self.config.max_tooltip_classes);
        let text = overlay::snippet(doc, element, self.config.max_tooltip_text);

        let drawn = overlay::place_highlight(doc, session.highlight, rect, &viewport)
            .and_then(|_| overlay::render_tooltip(doc, session.tooltip, &label, text.as_deref()))
            .and_then(|size| {
                overlay::place_tooltip(
                    doc,
                    session.tooltip,
                    rect,
                    size,
                    &viewport,
                    self.config.tooltip_gap_px,
                    self.config.tooltip_clearance_px,
                )
            });

        match drawn {
            Ok(placement) => {
                session.hovered = Some(element);
                session.placement = Some(placement);
            }
            Err(e) => debug!("Highlight not drawn: {}", e),
        }
    }

    pub fn hide_highlight(&mut self, doc: &mut Document) {
        if let Some(session) = self.session.as_mut() {
            overlay::hide(doc, session.highlight);
            overlay::hide(doc, session.tooltip);
            session.hovered = None;
        }
    }

    fn on_pointer_down(&mut self, doc: &mut Document, event: &DomEvent) -> Handled {
        if overlay::is_own_node(doc, event.target) {
            return Handled::pass();
        }

        let mut target = event.target;
        if !doc.is_element(target) {
            match doc.parent_element(target) {
                Some(parent) => target = parent,
                None => return Handled::pass(),
            }
        }

        if !overlay::is_interactive(doc, target) {
            let body = doc.body();
            while target != body && doc.attribute(target, ZAPPED_ATTR) == Some("true") {
                match doc.parent_element(target) {
                    Some(parent) => target = parent,
                    None => break,
                }
            }
        }

        let zap = self.zap_request(doc, target, ZapTrigger::PointerDown);
        Handled {
            outcome: EventOutcome::suppress(),
            zap,
        }
    }

    fn on_click(&mut self, doc: &mut Document, event: &DomEvent) -> Handled {
        if overlay::is_own_node(doc, event.target) {
            return Handled::pass();
        }
        let zap = doc
            .element_from_point(event.client_x, event.client_y)
            .filter(|hit| !overlay::is_own_node(doc, *hit))
            .and_then(|hit| self.zap_request(doc, hit, ZapTrigger::ClickBackup));
        Handled {
            outcome: EventOutcome::suppress(),
            zap,
        }
    }

    /// Turn a resolved element into a zap request, hiding the highlight.
    /// The body and the root element are never zapped.
    fn zap_request(
        &mut self,
        doc: &mut Document,
        element: NodeId,
        trigger: ZapTrigger,
    ) -> Option<ZapRequest> {
        if element == doc.body() || element == doc.document_element() {
            return None;
        }
        self.hide_highlight(doc);
        Some(ZapRequest { element, trigger })
    }
}

#[cfg(test)]
#[path = "targeting_tests.rs"]
mod tests;
