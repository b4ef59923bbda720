//! `nodes` crate — the handler contracts graph nodes are written against.
//!
//! Node and predicate authors depend on this crate only: [`NodeHandler`],
//! [`EdgePredicate`], the [`ExecutionContext`] passed to every call and the
//! [`NodeError`] they return. The engine crate drives execution through
//! these traits.

pub mod context;
pub mod error;
pub mod mock;
pub mod traits;

pub use context::ExecutionContext;
pub use error::NodeError;
pub use traits::{
    node_fn, predicate_fn, EdgePredicate, FnNode, FnPredicate, GraphState, NodeHandler,
};

/// Reserved node id marking successful completion of a traversal.
pub const END: &str = "END";
