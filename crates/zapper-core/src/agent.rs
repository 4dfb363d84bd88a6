//! Page-context runtime.
//!
//! [`ZapAgent`] owns one document and everything the core keeps per page:
//! the targeting machine, the persistence engine, the virtual timer queue and
//! the legacy Ctrl/Cmd-click listener. The host feeds it events, mutation
//! notifications, messages and elapsed time.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zapper_config::Config;
use zapper_dom::{Document, DomEvent, EventKind, EventOutcome, ListenerId, NodeId, ReadyState};
use zapper_protocols::{ZapMessage, ZapResponse, ZapStore};

use crate::error::ZapError;
use crate::generator::SelectorGenerator;
use crate::persistence::{PersistenceEngine, RestoreReport, ZAPPED_ATTR};
use crate::targeting::{self, overlay, TargetingMachine, ZapRequest, ZapTrigger};
use crate::timer::{TimerQueue, TimerTask};

/// Listener owner tag for the always-on Ctrl/Cmd-click handler.
pub const LEGACY_OWNER: &str = "legacy";

/// An agent shared between the host and a tab transport.
pub type SharedAgent = Arc<Mutex<ZapAgent>>;

pub struct ZapAgent {
    document: Document,
    generator: SelectorGenerator,
    targeting: TargetingMachine,
    persistence: PersistenceEngine,
    timers: TimerQueue,
    legacy_listener: Option<ListenerId>,
    waiting_for_ready: bool,
}

impl ZapAgent {
    pub fn new(document: Document, store: Arc<dyn ZapStore>, config: &Config) -> Self {
        Self {
            document,
            generator: SelectorGenerator::new(&config.selector),
            targeting: TargetingMachine::new(&config.targeting),
            persistence: PersistenceEngine::new(store, &config.zap),
            timers: TimerQueue::new(),
            legacy_listener: None,
            waiting_for_ready: false,
        }
    }

    pub fn into_shared(self) -> SharedAgent {
        Arc::new(Mutex::new(self))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access for the host, e.g. to let page scripts edit the tree.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn targeting(&self) -> &TargetingMachine {
        &self.targeting
    }

    pub fn persistence(&self) -> &PersistenceEngine {
        &self.persistence
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn is_initialized(&self) -> bool {
        self.legacy_listener.is_some()
    }

    /// Install the legacy click listener and the body observer, then restore
    /// right away unless the document is still loading. Calling it again is
    /// a no-op.
    pub async fn init(&mut self) -> Result<Option<RestoreReport>, ZapError> {
        if self.is_initialized() {
            return Ok(None);
        }
        info!("Zap agent loaded on {}", self.document.url());

        self.legacy_listener = Some(
            self.document
                .listeners_mut()
                .add(EventKind::Click, true, LEGACY_OWNER),
        );
        self.document.observe_body_mutations();

        if self.document.ready_state() == ReadyState::Loading {
            debug!("document still loading, restore deferred");
            self.waiting_for_ready = true;
            return Ok(None);
        }
        self.restore().await.map(Some)
    }

    /// `DOMContentLoaded`: run the deferred restore, if any.
    pub async fn dom_content_loaded(&mut self) -> Result<Option<RestoreReport>, ZapError> {
        if self.document.ready_state() == ReadyState::Loading {
            self.document.set_ready_state(ReadyState::Interactive);
        }
        if !std::mem::take(&mut self.waiting_for_ready) {
            return Ok(None);
        }
        self.restore().await.map(Some)
    }

    /// One restoration pass against the current URL.
    pub async fn restore(&mut self) -> Result<RestoreReport, ZapError> {
        let report = self.persistence.restore(&mut self.document).await?;
        if report.hidden > 0 {
            info!(
                page_key = %report.page_key,
                hidden = report.hidden,
                "Restored zapped elements"
            );
        }
        Ok(report)
    }

    /// Drain pending child-list records and restore once if there were any.
    pub async fn process_mutations(&mut self) -> Result<Option<RestoreReport>, ZapError> {
        let records = self.document.take_mutation_records();
        if records.is_empty() {
            return Ok(None);
        }
        debug!(records = records.len(), "body mutated");
        self.restore().await.map(Some)
    }

    /// `pushState`-style navigation: the document stays, the page key moves.
    pub fn navigate(&mut self, url: impl Into<String>) {
        let url = url.into();
        debug!(from = self.document.url(), to = %url, "url changed");
        self.document.set_url(url);
    }

    /// Deliver an input event to every core listener registered for its kind.
    ///
    /// An event that zaps spawns the record write, so this must run inside a
    /// Tokio runtime.
    pub fn dispatch(&mut self, event: DomEvent) -> EventOutcome {
        let order = self.document.listeners().dispatch_order(event.kind);
        let mut outcome = EventOutcome::pass();

        for (id, owner) in order {
            // An earlier listener may have deactivated targeting.
            if !self.document.listeners().is_registered(id) {
                continue;
            }
            let step = match owner {
                LEGACY_OWNER => self.on_legacy_click(&event),
                targeting::LISTENER_OWNER => {
                    let handled = self
                        .targeting
                        .handle_event(&mut self.document, &mut self.timers, &event);
                    if let Some(request) = handled.zap {
                        self.perform(request);
                    }
                    handled.outcome
                }
                _ => EventOutcome::pass(),
            };
            outcome.merge(step);
            if outcome.immediate_propagation_stopped {
                break;
            }
        }
        outcome
    }

    fn on_legacy_click(&mut self, event: &DomEvent) -> EventOutcome {
        if event.kind != EventKind::Click || !(event.modifiers.ctrl || event.modifiers.meta) {
            return EventOutcome::pass();
        }
        let target = if self.document.is_element(event.target) {
            Some(event.target)
        } else {
            self.document.parent_element(event.target)
        };
        if let Some(element) = target {
            self.perform(ZapRequest {
                element,
                trigger: ZapTrigger::Legacy,
            });
        }
        EventOutcome::prevent_and_stop()
    }

    fn perform(&mut self, request: ZapRequest) {
        if request.trigger == ZapTrigger::ClickBackup {
            let already = self.persistence.is_pending(request.element)
                || self.document.attribute(request.element, ZAPPED_ATTR) == Some("true");
            if already {
                debug!(node = %request.element, "click backup skipped, already zapped");
                return;
            }
        }
        self.zap(request.element);
    }

    /// Zap `element`: generate its selector, start the fade and persist in
    /// the background. Returns the selector, or `None` for the body, the root
    /// element, overlay nodes and stale handles. Must run inside a Tokio
    /// runtime.
    pub fn zap(&mut self, element: NodeId) -> Option<String> {
        if !self.document.is_element(element)
            || element == self.document.body()
            || element == self.document.document_element()
            || overlay::is_own_node(&self.document, element)
        {
            return None;
        }
        let selector = self.generator.generate(&self.document, element);
        match self
            .persistence
            .begin_zap(&mut self.document, &mut self.timers, element, selector.clone())
        {
            Ok(()) => Some(selector),
            Err(e) => {
                warn!("Failed to zap {}: {}", element, e);
                None
            }
        }
    }

    /// Move the virtual clock forward, firing every timer that falls due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now_ms() + ms;
        while let Some((id, task)) = self.timers.pop_due(until) {
            match task {
                TimerTask::PointerSample { x, y } => {
                    self.targeting.on_pointer_sample(&mut self.document, id, x, y)
                }
                TimerTask::FinishZap { element } => {
                    self.persistence.finish_zap(&mut self.document, element)
                }
            }
        }
        self.timers.advance_clock(until);
    }

    /// Handle a message from the coordinator.
    pub async fn handle_message(&mut self, message: ZapMessage) -> ZapResponse {
        debug!(action = message.action(), "message received");
        match message {
            ZapMessage::ToggleZapMode { active: true } => {
                match self.targeting.activate(&mut self.document) {
                    Ok(_) => ZapResponse::ok(),
                    Err(e) => {
                        warn!("Failed to activate zap mode: {}", e);
                        ZapResponse::failed()
                    }
                }
            }
            ZapMessage::ToggleZapMode { active: false } => {
                self.targeting.deactivate(&mut self.document, &mut self.timers);
                ZapResponse::ok()
            }
            ZapMessage::ZapElement { x, y } => {
                let zapped = self
                    .document
                    .element_from_point(x, y)
                    .and_then(|element| self.zap(element));
                match zapped {
                    Some(_) => ZapResponse::ok(),
                    None => ZapResponse::failed(),
                }
            }
        }
    }

    /// Wait for background record writes. Returns how many failed.
    pub async fn settle(&mut self) -> usize {
        self.persistence.settle().await
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
