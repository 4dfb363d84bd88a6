//! Child-list mutation observation.
//!
//! Only structural changes are recorded: nodes added to or removed from
//! a parent inside the observed subtree. Attribute and style writes are not,
//! so hiding elements never feeds back into another restoration pass.

use crate::node::NodeId;

/// One structural change under the observed subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// The parent whose child list changed.
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub(crate) struct MutationObserver {
    target: Option<NodeId>,
    records: Vec<MutationRecord>,
}

impl MutationObserver {
    pub fn observe(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub fn disconnect(&mut self) {
        self.target = None;
        self.records.clear();
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn push(&mut self, record: MutationRecord) {
        self.records.push(record);
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn take(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }
}
