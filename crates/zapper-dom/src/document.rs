//! The document tree.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::DomError;
use crate::events::ListenerRegistry;
use crate::geometry::{BoundingBox, ViewportInfo};
use crate::mutation::{MutationObserver, MutationRecord};
use crate::node::{ElementData, Node, NodeId, NodeKind};
use crate::selector::{SelectorError, SelectorList};

/// Document loading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A live document: `document > html > (head, body)`.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    html: NodeId,
    head: NodeId,
    body: NodeId,
    url: String,
    viewport: ViewportInfo,
    ready_state: ReadyState,
    listeners: ListenerRegistry,
    observer: MutationObserver,
}

impl Document {
    /// Create an empty, fully loaded document at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        let placeholder = NodeId {
            index: 0,
            generation: 0,
        };
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: placeholder,
            html: placeholder,
            head: placeholder,
            body: placeholder,
            url: url.into(),
            viewport: ViewportInfo::default(),
            ready_state: ReadyState::Complete,
            listeners: ListenerRegistry::default(),
            observer: MutationObserver::default(),
        };

        doc.root = doc.alloc(Node::new(NodeKind::Document));
        doc.html = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.link(doc.root, doc.html, None);
        doc.link(doc.html, doc.head, None);
        doc.link(doc.html, doc.body, None);
        doc.fit_root_to_viewport();
        doc
    }

    // ------------------------------------------------------------------
    // Page state
    // ------------------------------------------------------------------

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Change the URL without reloading, as history navigation in a
    /// single-page app does.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn viewport(&self) -> &ViewportInfo {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportInfo) {
        self.viewport = viewport;
        self.fit_root_to_viewport();
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    fn fit_root_to_viewport(&mut self) {
        let rect = BoundingBox::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        for id in [self.html, self.body] {
            if let Some(el) = self.element_mut(id) {
                el.rect = rect;
            }
        }
    }

    // ------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    fn release(&mut self, id: NodeId) {
        let children = self.node(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.release(child);
        }
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.node.is_some() {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    /// Whether the handle still resolves to a live node.
    pub fn exists(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn document_element(&self) -> NodeId {
        self.html
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::new(NodeKind::Element(ElementData::new(tag))))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node::new(NodeKind::Text(text.to_string())))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element(_)))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_or_err(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        if !self.exists(id) {
            return Err(DomError::StaleNode(id));
        }
        self.element_mut(id).ok_or(DomError::NotAnElement(id))
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Parent if it is an element (the document node is not).
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.is_element(*p))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Zero-based position among the parent's element children.
    pub fn element_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.element_children(parent).iter().position(|c| *c == id)
    }

    /// Ancestors from the parent up to the document node.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    /// Inclusive containment, like `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        (node == ancestor && self.exists(node)) || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is attached under the document node.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// All nodes below `id` in tree order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every connected element in tree order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|n| self.is_element(*n))
            .collect()
    }

    fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            let at = before
                .and_then(|b| node.children.iter().position(|c| *c == b))
                .unwrap_or(node.children.len());
            node.children.insert(at, child);
        }
    }

    fn unlink(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.parent(child)?;
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        Some(parent)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference`, or last if `None`.
    /// A child that already has a parent is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        if !self.exists(parent) {
            return Err(DomError::StaleNode(parent));
        }
        if !self.exists(child) {
            return Err(DomError::StaleNode(child));
        }
        if self.is_text(parent) {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "text nodes cannot have children",
            });
        }
        if child == self.root || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "node would become its own ancestor",
            });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::HierarchyRequest {
                    parent,
                    child,
                    reason: "reference node is not a child of parent",
                });
            }
        }

        if let Some(old_parent) = self.unlink(child) {
            self.record(old_parent, Vec::new(), vec![child]);
        }
        self.link(parent, child, reference);
        self.record(parent, vec![child], Vec::new());
        Ok(())
    }

    /// Detach `id` and destroy its subtree. Every handle into the subtree
    /// stops resolving.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if !self.exists(id) {
            return Err(DomError::StaleNode(id));
        }
        if [self.root, self.html, self.head, self.body].contains(&id) {
            return Err(DomError::HierarchyRequest {
                parent: self.parent(id).unwrap_or(self.root),
                child: id,
                reason: "document structure cannot be removed",
            });
        }
        if let Some(parent) = self.unlink(id) {
            self.record(parent, Vec::new(), vec![id]);
        }
        self.release(id);
        trace!(node = %id, "node removed");
        Ok(())
    }

    /// Remove and destroy every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), DomError> {
        if !self.exists(id) {
            return Err(DomError::StaleNode(id));
        }
        for child in self.children(id).to_vec() {
            self.remove(child)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Attributes, style, text
    // ------------------------------------------------------------------

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_or_err(id)?.set_attribute(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        Ok(self.element_or_err(id)?.remove_attribute(name))
    }

    pub fn set_click_handler(&mut self, id: NodeId, installed: bool) -> Result<(), DomError> {
        self.element_or_err(id)?.click_handler = installed;
        Ok(())
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.style.get(property))
    }

    /// Set an inline style property; an empty value clears it.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        self.element_or_err(id)?.style.set(property, value);
        Ok(())
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(NodeKind::Text(text)) = self.kind(id) {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match self.kind(n) {
                Some(NodeKind::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.clear_children(id)?;
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    pub fn bounding_rect(&self, id: NodeId) -> Option<BoundingBox> {
        self.element(id).map(|el| el.rect)
    }

    pub fn set_rect(&mut self, id: NodeId, rect: BoundingBox) -> Result<(), DomError> {
        self.element_or_err(id)?.rect = rect;
        Ok(())
    }

    /// Connected and not inside a `display: none` subtree.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.is_connected(id)
            && std::iter::once(id)
                .chain(self.ancestors(id))
                .all(|n| self.style_property(n, "display") != Some("none"))
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// First connected element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.elements()
            .into_iter()
            .find(|n| self.attribute(*n, "id") == Some(id))
    }

    /// Every connected element matching `selector`, in tree order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .elements()
            .into_iter()
            .filter(|n| list.matches(self, *n))
            .collect())
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.elements().into_iter().find(|n| list.matches(self, *n)))
    }

    // ------------------------------------------------------------------
    // Mutation observation
    // ------------------------------------------------------------------

    /// Start recording child-list changes anywhere under the body.
    pub fn observe_body_mutations(&mut self) {
        let body = self.body;
        self.observer.observe(body);
    }

    pub fn disconnect_observer(&mut self) {
        self.observer.disconnect();
    }

    pub fn is_observing(&self) -> bool {
        self.observer.target().is_some()
    }

    pub fn has_pending_mutations(&self) -> bool {
        self.observer.has_records()
    }

    pub fn take_mutation_records(&mut self) -> Vec<MutationRecord> {
        self.observer.take()
    }

    fn record(&mut self, target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) {
        let Some(observed) = self.observer.target() else {
            return;
        };
        if self.contains(observed, target) {
            self.observer.push(MutationRecord {
                target,
                added,
                removed,
            });
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
