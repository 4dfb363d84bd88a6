//! Element to selector fingerprinting.

use tracing::trace;
use zapper_config::SelectorConfig;
use zapper_dom::{css_escape, Document, NodeId};

/// Builds a selector that re-locates one element.
///
/// Strategies, first success wins:
/// 1. `#id`, if it matches exactly this element.
/// 2. `tag.class1.class2...` over all classes except those containing `:`,
///    if it matches exactly this element.
/// 3. A `tag:nth-child(n)` path joined with `" > "`, walking up until the
///    body, an ancestor with an id (emitted as `tag#id`), or `max_depth`
///    levels.
#[derive(Debug, Clone)]
pub struct SelectorGenerator {
    max_depth: usize,
}

impl Default for SelectorGenerator {
    fn default() -> Self {
        Self::new(&SelectorConfig::default())
    }
}

impl SelectorGenerator {
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn generate(&self, doc: &Document, element: NodeId) -> String {
        let selector = self
            .by_id(doc, element)
            .or_else(|| self.by_classes(doc, element))
            .unwrap_or_else(|| self.by_path(doc, element));
        trace!(node = %element, %selector, "selector generated");
        selector
    }

    fn by_id(&self, doc: &Document, element: NodeId) -> Option<String> {
        let id = doc.element(element)?.id()?;
        let selector = format!("#{}", css_escape(id));
        is_unique(doc, &selector, element).then_some(selector)
    }

    fn by_classes(&self, doc: &Document, element: NodeId) -> Option<String> {
        let el = doc.element(element)?;
        let classes: Vec<String> = el
            .classes()
            .filter(|c| !c.contains(':'))
            .map(css_escape)
            .collect();
        if classes.is_empty() {
            return None;
        }
        let selector = format!("{}.{}", el.tag, classes.join("."));
        is_unique(doc, &selector, element).then_some(selector)
    }

    fn by_path(&self, doc: &Document, element: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = element;

        for _ in 0..self.max_depth {
            if current == doc.body() {
                break;
            }
            let Some(el) = doc.element(current) else {
                break;
            };
            if let Some(id) = el.id() {
                segments.push(format!("{}#{}", el.tag, css_escape(id)));
                break;
            }
            let Some(parent) = doc.parent_element(current) else {
                break;
            };
            if let Some(index) = doc.element_index(current) {
                segments.push(format!("{}:nth-child({})", el.tag, index + 1));
            }
            current = parent;
        }

        if segments.is_empty() {
            return doc.tag_name(element).unwrap_or("*").to_string();
        }
        segments.reverse();
        segments.join(" > ")
    }
}

/// The selector parses and matches `element` and nothing else.
fn is_unique(doc: &Document, selector: &str, element: NodeId) -> bool {
    match doc.query_selector_all(selector) {
        Ok(matches) => matches == [element],
        Err(e) => {
            trace!(%selector, error = %e, "candidate selector rejected");
            false
        }
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
