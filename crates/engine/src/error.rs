//! Engine-level error types.

use nodes::NodeError;
use thiserror::Error;

use crate::models::EdgeSpec;

/// Errors produced by the workflow engine (validation + execution).
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Validation errors ------

    /// `compile` was called before `set_entry_point`.
    #[error("graph has no entry point")]
    MissingEntryPoint,

    /// The entry point names a node that was never registered.
    #[error("entry point '{0}' is not a registered node")]
    UnknownEntryPoint(String),

    /// An edge references a node ID that was never registered.
    #[error("edge references unknown node '{node_id}' ({side} side)")]
    UnknownNodeReference {
        node_id: String,
        side: &'static str,
    },

    /// A node is the source of more than one outgoing transition.
    #[error("node '{node_id}' has more than one outgoing transition")]
    ConflictingTransitions { node_id: String },

    /// An edge starts at the terminal node, which never routes anywhere.
    #[error("edge {edge} starts at the terminal node and can never be taken")]
    EdgeFromTerminal { edge: EdgeSpec },

    // ------ Handler errors ------

    /// A node handler returned an error; traversal stopped at this node.
    #[error("node '{node_id}' failed: {source}")]
    NodeFailed {
        node_id: String,
        #[source]
        source: NodeError,
    },

    /// A conditional edge's predicate returned an error.
    #[error("branch predicate after node '{node_id}' failed: {source}")]
    PredicateFailed {
        node_id: String,
        #[source]
        source: NodeError,
    },

    // ------ Structural runtime errors ------

    /// Traversal reached a node with no registered handler.
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    /// Traversal reached a non-terminal node with no outgoing transition.
    #[error("node '{0}' has no outgoing edge")]
    DeadEnd(String),

    /// The configured step limit was hit before reaching the terminal node.
    #[error("step limit of {limit} reached before the terminal node")]
    StepLimitExceeded { limit: usize },

    // ------ Cancellation ------

    /// The execution context was cancelled.
    #[error("execution cancelled")]
    Cancelled,

    /// The execution context's deadline elapsed.
    #[error("execution deadline exceeded")]
    DeadlineExceeded,
}

impl EngineError {
    /// True for [`Cancelled`](Self::Cancelled) and
    /// [`DeadlineExceeded`](Self::DeadlineExceeded): the caller asked the run
    /// to stop, as opposed to the workflow failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// True for errors raised while validating a graph in `compile`.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingEntryPoint
                | Self::UnknownEntryPoint(_)
                | Self::UnknownNodeReference { .. }
                | Self::ConflictingTransitions { .. }
                | Self::EdgeFromTerminal { .. }
        )
    }

    /// The handler or predicate error behind this failure, if any.
    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            Self::NodeFailed { source, .. } | Self::PredicateFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
