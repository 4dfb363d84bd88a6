//! Serializable page fixtures.
//!
//! A [`PageSnapshot`] is the JSON shape pages are loaded from and written
//! back to by the CLI:
//!
//! ```json
//! {
//!   "url": "https://news.example.com/a",
//!   "body": {
//!     "tag": "body",
//!     "children": [
//!       { "tag": "div", "attributes": { "id": "ad-123" },
//!         "rect": { "x": 0, "y": 0, "width": 300, "height": 250 } }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, ReadyState};
use crate::error::DomError;
use crate::geometry::{BoundingBox, ViewportInfo};
use crate::node::{NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub viewport: ViewportInfo,
    #[serde(default)]
    pub ready_state: ReadyState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<NodeSnapshot>,
    pub body: ElementSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSnapshot {
    Text(String),
    Element(ElementSnapshot),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<BoundingBox>,
    /// Inline style text; overrides a `style` entry in `attributes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// The element has a click handler attached.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub onclick: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl ElementSnapshot {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            rect: None,
            style: None,
            onclick: false,
            children: Vec::new(),
        }
    }
}

impl Document {
    /// Build a live document from a snapshot.
    ///
    /// The snapshot's body element supplies the body's attributes and
    /// children; its tag is ignored.
    pub fn from_snapshot(snapshot: &PageSnapshot) -> Result<Self, DomError> {
        let mut doc = Document::new(snapshot.url.clone());
        doc.set_viewport(snapshot.viewport.clone());
        doc.set_ready_state(snapshot.ready_state);

        let head = doc.head();
        for child in &snapshot.head {
            doc.build(head, child)?;
        }

        let body = doc.body();
        doc.apply(body, &snapshot.body)?;
        for child in &snapshot.body.children {
            doc.build(body, child)?;
        }
        Ok(doc)
    }

    /// Capture the current document as a snapshot.
    pub fn to_snapshot(&self) -> PageSnapshot {
        let head = self
            .children(self.head())
            .iter()
            .filter_map(|c| self.capture(*c))
            .collect();
        let body = match self.capture(self.body()) {
            Some(NodeSnapshot::Element(el)) => el,
            _ => ElementSnapshot::new("body"),
        };
        PageSnapshot {
            url: self.url().to_string(),
            viewport: self.viewport().clone(),
            ready_state: self.ready_state(),
            head,
            body,
        }
    }

    fn build(&mut self, parent: NodeId, snapshot: &NodeSnapshot) -> Result<(), DomError> {
        match snapshot {
            NodeSnapshot::Text(text) => {
                let node = self.create_text(text);
                self.append_child(parent, node)
            }
            NodeSnapshot::Element(el) => {
                let node = self.create_element(&el.tag);
                self.apply(node, el)?;
                self.append_child(parent, node)?;
                for child in &el.children {
                    self.build(node, child)?;
                }
                Ok(())
            }
        }
    }

    fn apply(&mut self, node: NodeId, snapshot: &ElementSnapshot) -> Result<(), DomError> {
        for (name, value) in &snapshot.attributes {
            self.set_attribute(node, name, value)?;
        }
        if let Some(style) = &snapshot.style {
            self.set_attribute(node, "style", style)?;
        }
        if let Some(rect) = snapshot.rect {
            self.set_rect(node, rect)?;
        }
        if snapshot.onclick {
            self.set_click_handler(node, true)?;
        }
        Ok(())
    }

    fn capture(&self, node: NodeId) -> Option<NodeSnapshot> {
        match self.kind(node)? {
            NodeKind::Text(text) => Some(NodeSnapshot::Text(text.clone())),
            NodeKind::Document => None,
            NodeKind::Element(el) => {
                let attributes = el
                    .attributes
                    .iter()
                    .filter(|(name, _)| name != "style")
                    .cloned()
                    .collect();
                Some(NodeSnapshot::Element(ElementSnapshot {
                    tag: el.tag.clone(),
                    attributes,
                    rect: (!el.rect.is_empty()).then_some(el.rect),
                    style: (!el.style.is_empty()).then(|| el.style.css_text()),
                    onclick: el.click_handler,
                    children: self
                        .children(node)
                        .iter()
                        .filter_map(|c| self.capture(*c))
                        .collect(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "url": "https://news.example.com/a",
        "viewport": { "width": 800, "height": 600 },
        "head": [ { "tag": "title", "children": ["News"] } ],
        "body": {
            "tag": "body",
            "attributes": { "class": "page" },
            "children": [
                { "tag": "div", "attributes": { "id": "ad-123", "class": "ad" },
                  "rect": { "x": 0, "y": 0, "width": 300, "height": 250 },
                  "style": "color: red",
                  "children": ["Buy now"] },
                { "tag": "button", "onclick": true }
            ]
        }
    }"#;

    #[test]
    fn test_from_snapshot_builds_tree() {
        let snapshot: PageSnapshot = serde_json::from_str(PAGE).unwrap();
        let doc = Document::from_snapshot(&snapshot).unwrap();

        assert_eq!(doc.url(), "https://news.example.com/a");
        assert_eq!(doc.viewport().width, 800.0);
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        assert_eq!(doc.attribute(doc.body(), "class"), Some("page"));

        let ad = doc.get_element_by_id("ad-123").unwrap();
        assert_eq!(doc.text_content(ad), "Buy now");
        assert_eq!(doc.style_property(ad, "color"), Some("red"));
        assert_eq!(doc.bounding_rect(ad).unwrap().width, 300.0);

        let button = doc.query_selector("button").unwrap().unwrap();
        assert!(doc.element(button).unwrap().click_handler);
        assert_eq!(doc.text_content(doc.head()), "News");
    }

    #[test]
    fn test_snapshot_preserves_modifications() {
        let snapshot: PageSnapshot = serde_json::from_str(PAGE).unwrap();
        let mut doc = Document::from_snapshot(&snapshot).unwrap();
        let ad = doc.get_element_by_id("ad-123").unwrap();
        doc.set_style(ad, "display", "none").unwrap();
        doc.set_attribute(ad, "data-zapped", "true").unwrap();

        let out = doc.to_snapshot();
        let NodeSnapshot::Element(div) = &out.body.children[0] else {
            panic!("expected element");
        };
        assert_eq!(div.style.as_deref(), Some("color: red; display: none;"));
        assert_eq!(div.attributes.get("data-zapped").map(String::as_str), Some("true"));
        assert!(!div.attributes.contains_key("style"));

        let reloaded = Document::from_snapshot(&out).unwrap();
        let ad = reloaded.get_element_by_id("ad-123").unwrap();
        assert_eq!(reloaded.style_property(ad, "display"), Some("none"));
    }

    #[test]
    fn test_minimal_snapshot_defaults() {
        let raw = r#"{ "url": "https://x.test/", "body": { "tag": "body" } }"#;
        let snapshot: PageSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.viewport, ViewportInfo::default());
        assert!(snapshot.head.is_empty());
        let doc = Document::from_snapshot(&snapshot).unwrap();
        assert!(doc.children(doc.body()).is_empty());
    }
}
