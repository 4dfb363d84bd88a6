//! Zap persistence and restoration.

use std::collections::HashSet;
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};
use zapper_config::ZapConfig;
use zapper_dom::{Document, DomError, NodeId};
use zapper_protocols::{PageKey, StoreError, ZapStore};

use crate::timer::{TimerQueue, TimerTask};

/// Attribute set on every hidden element.
pub const ZAPPED_ATTR: &str = "data-zapped";

/// Append `selector` to the page's record unless already present.
///
/// This is a plain read-modify-write: two overlapping calls for the same
/// page may both read the old list, and the later write then drops the
/// earlier append. Returns whether the selector was new.
pub async fn record_zap(
    store: &dyn ZapStore,
    page_key: &PageKey,
    selector: &str,
) -> Result<bool, StoreError> {
    let mut record = store.load_record(page_key).await?;
    if !record.insert(selector) {
        debug!(%page_key, selector, "selector already recorded");
        return Ok(false);
    }
    store.save_record(&record).await?;
    info!(%page_key, selector, "zap recorded");
    Ok(true)
}

/// Outcome of one restoration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub page_key: String,
    /// Selectors in the record.
    pub selectors: usize,
    /// Elements hidden by this pass, counting ones already hidden.
    pub hidden: usize,
    /// Valid selectors that matched nothing.
    pub unmatched: Vec<String>,
    /// Selectors that failed to parse.
    pub invalid: Vec<String>,
}

pub struct PersistenceEngine {
    store: Arc<dyn ZapStore>,
    transition_ms: u64,
    pending: HashSet<NodeId>,
    writes: Vec<JoinHandle<Result<bool, StoreError>>>,
    /// Failed writes already reaped but not yet reported by `settle`.
    failed: usize,
}

impl PersistenceEngine {
    pub fn new(store: Arc<dyn ZapStore>, config: &ZapConfig) -> Self {
        Self {
            store,
            transition_ms: config.transition_ms,
            pending: HashSet::new(),
            writes: Vec::new(),
            failed: 0,
        }
    }

    pub fn store(&self) -> &Arc<dyn ZapStore> {
        &self.store
    }

    /// Re-apply every recorded selector for the document's current URL.
    pub async fn restore(&self, doc: &mut Document) -> Result<RestoreReport, StoreError> {
        let page_key = PageKey::from_url(doc.url());
        let record = self.store.load_record(&page_key).await?;

        let mut report = RestoreReport {
            page_key: page_key.to_string(),
            selectors: record.selectors.len(),
            ..RestoreReport::default()
        };

        for selector in &record.selectors {
            let matches = match doc.query_selector_all(selector) {
                Ok(matches) => matches,
                Err(e) => {
                    warn!(%page_key, %selector, "Failed to restore zapped element: {}", e);
                    report.invalid.push(selector.clone());
                    continue;
                }
            };
            if matches.is_empty() {
                report.unmatched.push(selector.clone());
            }
            for element in matches {
                match hide(doc, element) {
                    Ok(()) => report.hidden += 1,
                    Err(e) => warn!(%selector, "Failed to hide {}: {}", element, e),
                }
            }
        }

        if report.selectors > 0 {
            debug!(
                %page_key,
                hidden = report.hidden,
                unmatched = report.unmatched.len(),
                invalid = report.invalid.len(),
                "restore pass complete"
            );
        }
        Ok(report)
    }

    /// Start zapping `element`: fade it out, schedule the hide for the end
    /// of the transition and persist `selector` in the background. The hide
    /// does not wait for the write.
    ///
    /// The write is spawned onto the current Tokio runtime, so this must be
    /// called from within one. Writes that already finished are reaped
    /// first, so a host that never settles does not accumulate handles.
    pub fn begin_zap(
        &mut self,
        doc: &mut Document,
        timers: &mut TimerQueue,
        element: NodeId,
        selector: String,
    ) -> Result<(), DomError> {
        let transition = format!("opacity {}s ease-out", self.transition_ms as f64 / 1000.0);
        doc.set_style(element, "transition", &transition)?;
        doc.set_style(element, "opacity", "0")?;
        timers.schedule(self.transition_ms, TimerTask::FinishZap { element });
        self.pending.insert(element);

        let store = Arc::clone(&self.store);
        let page_key = PageKey::from_url(doc.url());
        info!(%page_key, %selector, "Zapping element");
        self.reap_finished();
        self.writes.push(tokio::spawn(async move {
            record_zap(store.as_ref(), &page_key, &selector).await
        }));
        Ok(())
    }

    /// End the transition. Elements removed in the meantime are skipped.
    pub fn finish_zap(&mut self, doc: &mut Document, element: NodeId) {
        self.pending.remove(&element);
        if !doc.exists(element) {
            debug!(node = %element, "zapped element left the document before hiding");
            return;
        }
        if let Err(e) = hide(doc, element) {
            warn!("Failed to hide {}: {}", element, e);
        }
    }

    /// The element is mid-transition.
    pub fn is_pending(&self, element: NodeId) -> bool {
        self.pending.contains(&element)
    }

    pub fn pending_writes(&self) -> usize {
        self.writes.iter().filter(|w| !w.is_finished()).count()
    }

    /// Wait for every background write issued so far. Failures are logged
    /// and counted, including ones reaped earlier.
    pub async fn settle(&mut self) -> usize {
        let writes = std::mem::take(&mut self.writes);
        let mut failed = std::mem::take(&mut self.failed);
        for result in futures::future::join_all(writes).await {
            if !write_succeeded(result) {
                failed += 1;
            }
        }
        failed
    }

    fn reap_finished(&mut self) {
        let mut running = Vec::with_capacity(self.writes.len());
        for mut write in self.writes.drain(..) {
            if !write.is_finished() {
                running.push(write);
                continue;
            }
            match (&mut write).now_or_never() {
                Some(result) => {
                    if !write_succeeded(result) {
                        self.failed += 1;
                    }
                }
                None => running.push(write),
            }
        }
        self.writes = running;
    }
}

fn write_succeeded(result: Result<Result<bool, StoreError>, JoinError>) -> bool {
    match result {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            warn!("Failed to record zap: {}", e);
            false
        }
        Err(e) => {
            warn!("Zap write task aborted: {}", e);
            false
        }
    }
}

fn hide(doc: &mut Document, element: NodeId) -> Result<(), DomError> {
    doc.set_style(element, "display", "none")?;
    doc.set_attribute(element, ZAPPED_ATTR, "true")
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
