//! Control-surface side of Zapper.
//!
//! The coordinator owns the per-tab `zapMode_<tabId>` flags and relays
//! commands to page contexts through a [`TabTransport`]. It never touches a
//! document itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use zapper_config::Config;
use zapper_dom::Document;
use zapper_protocols::{
    TabModeKey, TabTransport, TransportError, ZapMessage, ZapResponse, ZapStore,
};

use crate::agent::{SharedAgent, ZapAgent};
use crate::error::ZapError;

/// URL schemes where page scripts cannot run.
const RESTRICTED_SCHEMES: [&str; 3] = ["chrome", "chrome-extension", "edge"];

/// Pause between injecting a page context and resending to it.
const INJECT_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenuItem {
    pub id: &'static str,
    pub title: &'static str,
}

pub const CONTEXT_MENU_ITEMS: [ContextMenuItem; 2] = [
    ContextMenuItem {
        id: "zap-element",
        title: "Zap this element",
    },
    ContextMenuItem {
        id: "activate-zap-mode",
        title: "Activate Zap Mode",
    },
];

pub struct Coordinator {
    store: Arc<dyn ZapStore>,
    transport: Arc<dyn TabTransport>,
}

impl Coordinator {
    pub fn new(store: Arc<dyn ZapStore>, transport: Arc<dyn TabTransport>) -> Self {
        Self { store, transport }
    }

    /// Browser-internal pages (`chrome://`, `chrome-extension://`,
    /// `edge://`). Unparseable URLs are not restricted.
    pub fn is_restricted_url(url: &str) -> bool {
        url::Url::parse(url)
            .map(|u| RESTRICTED_SCHEMES.contains(&u.scheme()))
            .unwrap_or(false)
    }

    /// The persisted mode flag for a tab.
    pub async fn is_active(&self, tab_id: u64) -> Result<bool, ZapError> {
        Ok(self.store.tab_mode(TabModeKey(tab_id)).await?)
    }

    /// Flip zap mode for the tab showing `url`. Returns the new state.
    pub async fn toggle(&self, tab_id: u64, url: &str) -> Result<bool, ZapError> {
        if Self::is_restricted_url(url) {
            warn!(tab_id, %url, "zap mode refused on browser page");
            return Err(ZapError::RestrictedUrl(url.to_string()));
        }
        let active = !self.is_active(tab_id).await?;
        self.set_mode(tab_id, active).await?;
        Ok(active)
    }

    /// Persist the flag, then deliver `toggleZapMode`. A tab with no page
    /// context gets one injected and the message is sent once more. If the
    /// tab still cannot be reached, or refuses, the previous flag is written
    /// back.
    pub async fn set_mode(&self, tab_id: u64, active: bool) -> Result<(), ZapError> {
        let key = TabModeKey(tab_id);
        let previous = self.store.tab_mode(key).await?;
        self.store.set_tab_mode(key, active).await?;

        let error = match self.deliver_toggle(tab_id, active).await {
            Ok(()) => {
                info!(tab_id, active, "Zap mode {}", if active { "enabled" } else { "disabled" });
                return Ok(());
            }
            Err(e) => e,
        };

        warn!(tab_id, "Failed to toggle zap mode: {}", error);
        if let Err(e) = self.store.set_tab_mode(key, previous).await {
            warn!(tab_id, "Failed to revert zap mode flag: {}", e);
        }
        Err(error)
    }

    async fn deliver_toggle(&self, tab_id: u64, active: bool) -> Result<(), ZapError> {
        let message = ZapMessage::ToggleZapMode { active };
        let response = match self.transport.send(tab_id, message.clone()).await {
            Ok(response) => response,
            Err(e) => {
                debug!(tab_id, "No page context answered ({}), injecting", e);
                self.transport.inject(tab_id).await?;
                tokio::time::sleep(INJECT_SETTLE).await;
                self.transport.send(tab_id, message).await?
            }
        };
        if response.success {
            Ok(())
        } else {
            Err(ZapError::Rejected(tab_id))
        }
    }

    /// Handle a click on one of [`CONTEXT_MENU_ITEMS`].
    pub async fn on_context_menu(
        &self,
        tab_id: u64,
        item_id: &str,
        page_x: f64,
        page_y: f64,
    ) -> Result<ZapResponse, ZapError> {
        debug!(tab_id, item_id, "context menu clicked");
        match item_id {
            "zap-element" => Ok(self
                .transport
                .send(
                    tab_id,
                    ZapMessage::ZapElement {
                        x: page_x,
                        y: page_y,
                    },
                )
                .await?),
            "activate-zap-mode" => {
                self.set_mode(tab_id, true).await?;
                Ok(ZapResponse::ok())
            }
            other => Err(ZapError::UnknownMenuItem(other.to_string())),
        }
    }
}

/// In-process transport: tabs are agents held in this process.
///
/// A tab may also hold a page that has no agent yet (see
/// [`LocalTabs::open_page`]). Injecting into it builds and initialises an
/// agent over the store and config given to [`LocalTabs::with_injection`].
#[derive(Default)]
pub struct LocalTabs {
    tabs: RwLock<HashMap<u64, SharedAgent>>,
    pages: Mutex<HashMap<u64, Document>>,
    runtime: Option<(Arc<dyn ZapStore>, Config)>,
}

impl LocalTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_injection(store: Arc<dyn ZapStore>, config: &Config) -> Self {
        Self {
            runtime: Some((store, config.clone())),
            ..Self::default()
        }
    }

    pub async fn attach(&self, tab_id: u64, agent: SharedAgent) {
        self.tabs.write().await.insert(tab_id, agent);
    }

    pub async fn detach(&self, tab_id: u64) -> Option<SharedAgent> {
        self.tabs.write().await.remove(&tab_id)
    }

    pub async fn get(&self, tab_id: u64) -> Option<SharedAgent> {
        self.tabs.read().await.get(&tab_id).cloned()
    }

    /// Load a page into a tab without running an agent in it.
    pub async fn open_page(&self, tab_id: u64, document: Document) {
        self.pages.lock().await.insert(tab_id, document);
    }
}

#[async_trait]
impl TabTransport for LocalTabs {
    async fn send(&self, tab_id: u64, message: ZapMessage) -> Result<ZapResponse, TransportError> {
        let agent = self
            .get(tab_id)
            .await
            .ok_or(TransportError::NoReceiver(tab_id))?;
        let mut agent = agent.lock().await;
        Ok(agent.handle_message(message).await)
    }

    async fn inject(&self, tab_id: u64) -> Result<(), TransportError> {
        if self.get(tab_id).await.is_some() {
            return Ok(());
        }
        let Some((store, config)) = &self.runtime else {
            return Err(TransportError::Injection {
                tab_id,
                reason: "no injection runtime".to_string(),
            });
        };
        let document = self
            .pages
            .lock()
            .await
            .remove(&tab_id)
            .ok_or(TransportError::NoReceiver(tab_id))?;

        let mut agent = ZapAgent::new(document, Arc::clone(store), config);
        agent.init().await.map_err(|e| TransportError::Injection {
            tab_id,
            reason: e.to_string(),
        })?;
        self.attach(tab_id, agent.into_shared()).await;
        debug!(tab_id, "page context injected");
        Ok(())
    }
}
