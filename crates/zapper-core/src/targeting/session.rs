//! State of one activation.

use zapper_dom::{Document, ListenerId, NodeId};

use super::overlay::TooltipPlacement;
use crate::timer::TimerId;

/// Everything an activation creates, dropped as a unit on deactivation.
#[derive(Debug)]
pub struct TargetingSession {
    pub(crate) highlight: NodeId,
    pub(crate) tooltip: NodeId,
    pub(crate) indicator: NodeId,
    pub(crate) listeners: Vec<ListenerId>,
    pub(crate) pending_sample: Option<TimerId>,
    pub(crate) hovered: Option<NodeId>,
    pub(crate) placement: Option<TooltipPlacement>,
}

impl TargetingSession {
    pub fn highlight(&self) -> NodeId {
        self.highlight
    }

    pub fn tooltip(&self) -> NodeId {
        self.tooltip
    }

    pub fn indicator(&self) -> NodeId {
        self.indicator
    }

    pub fn owned_nodes(&self) -> [NodeId; 3] {
        [self.highlight, self.tooltip, self.indicator]
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    pub fn pending_sample(&self) -> Option<TimerId> {
        self.pending_sample
    }

    /// The highlighted element, if it is still in the document.
    pub fn hovered(&self, doc: &Document) -> Option<NodeId> {
        self.hovered.filter(|n| doc.is_connected(*n))
    }

    /// Placement of the last drawn tooltip.
    pub fn placement(&self) -> Option<TooltipPlacement> {
        self.placement
    }
}
