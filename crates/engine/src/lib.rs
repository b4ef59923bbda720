//! `engine` crate — graph definition, compile-time validation, and the
//! execution engine.

pub mod compile;
pub mod error;
pub mod executor;
pub mod graph;
pub mod models;

pub use error::EngineError;
pub use executor::{ExecutionResult, ExecutorConfig, Runnable};
pub use graph::StateGraph;
pub use models::{ConditionalEdge, Edge, EdgeRule, EdgeSpec, GraphTopology, Transition};
pub use nodes::{ExecutionContext, END};
