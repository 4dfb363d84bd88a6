//! Node storage types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// Generational handle to a node in a [`Document`](crate::Document).
///
/// Handles never keep a node alive. After the node is removed the slot's
/// generation moves on and the handle resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// What a node is.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in insertion order, names lowercased.
    pub attributes: Vec<(String, String)>,
    pub style: InlineStyle,
    /// Bounding client rect as laid out by the host.
    pub rect: BoundingBox,
    /// A script-assigned click handler (the `onclick` property).
    pub click_handler: bool,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: InlineStyle::default(),
            rect: BoundingBox::default(),
            click_handler: false,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name == "style" {
            self.style = InlineStyle::parse(value);
        }
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before != self.attributes.len()
    }

    /// The `id` attribute, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id").filter(|v| !v.is_empty())
    }

    /// Class tokens split on ASCII whitespace.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

/// Inline `style` declarations, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineStyle(Vec<(String, String)>);

impl InlineStyle {
    /// Parse `prop: value; prop: value` text. Malformed declarations are dropped.
    pub fn parse(text: &str) -> Self {
        let mut style = Self::default();
        for decl in text.split(';') {
            if let Some((prop, value)) = decl.split_once(':') {
                let prop = prop.trim();
                let value = value.trim();
                if !prop.is_empty() && !value.is_empty() {
                    style.set(prop, value);
                }
            }
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Set a property; an empty value removes it, as assigning `''` does.
    pub fn set(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.remove(property);
            return;
        }
        let property = property.to_ascii_lowercase();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self.0.push((property, value.to_string())),
        }
    }

    pub fn remove(&mut self, property: &str) {
        self.0.retain(|(p, _)| !p.eq_ignore_ascii_case(property));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized `cssText`.
    pub fn css_text(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Arena slot contents.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}
