//! Node-level error type.

use thiserror::Error;

/// Errors returned by a node handler or an edge predicate.
///
/// The engine never retries or translates these: it wraps them with the
/// originating node id and hands them straight back to the caller.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The handler gave up with a human-readable reason.
    #[error("{0}")]
    Failed(String),

    /// Any other error raised inside the handler body.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NodeError {
    /// Shorthand for [`NodeError::Failed`].
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
