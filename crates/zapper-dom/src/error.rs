//! Document operation errors.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Node {0} is no longer in the document")]
    StaleNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child} under {parent}: {reason}")]
    HierarchyRequest {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },
}
