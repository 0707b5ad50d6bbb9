use thiserror::Error;

use crate::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("Node not found: {id:?}")]
    NodeNotFound { id: NodeId },
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("Node {id:?} is detached, context: {context}")]
    Detached { id: NodeId, context: String },
    #[error("Cannot insert {child:?} under {parent:?}: it is an ancestor")]
    Hierarchy { parent: NodeId, child: NodeId },
    #[error("Element id already in use: {id}")]
    DuplicateId { id: String },
}

impl DomError {
    pub fn detached(id: NodeId, context: impl Into<String>) -> Self {
        Self::Detached {
            id,
            context: context.into(),
        }
    }
}

pub type DomResult<T> = Result<T, DomError>;
