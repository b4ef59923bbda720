//! `MockNode` — a test double for `NodeHandler`.
//!
//! Useful in unit and integration tests where the node body is irrelevant
//! and only the traversal is under test.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{ExecutionContext, GraphState, NodeError, NodeHandler};

/// Behaviour injected into `MockNode` at construction time.
pub enum MockBehaviour<S> {
    /// Return the input unchanged.
    Passthrough,
    /// Ignore the input and return a clone of this value.
    ReturnValue(S),
    /// Map the input through a function.
    Apply(Arc<dyn Fn(S) -> S + Send + Sync>),
    /// Fail with [`NodeError::Failed`].
    Fail(String),
}

/// A mock node that records every call it receives and returns a
/// programmer-specified result.
///
/// Clones share their call log, so a test can keep one clone for assertions
/// and hand the other to the graph.
pub struct MockNode<S> {
    /// Label pushed to the shared trace on every call.
    pub name: String,
    /// What the node will do when `run` is called.
    pub behaviour: Arc<MockBehaviour<S>>,
    /// All inputs seen by this node (in call order).
    pub calls: Arc<Mutex<Vec<S>>>,
    /// Optional log shared between several mocks to assert visiting order.
    pub trace: Option<Arc<Mutex<Vec<String>>>>,
}

impl<S> Clone for MockNode<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            behaviour: Arc::clone(&self.behaviour),
            calls: Arc::clone(&self.calls),
            trace: self.trace.clone(),
        }
    }
}

impl<S> MockNode<S> {
    fn with_behaviour(name: impl Into<String>, behaviour: MockBehaviour<S>) -> Self {
        Self {
            name: name.into(),
            behaviour: Arc::new(behaviour),
            calls: Arc::new(Mutex::new(Vec::new())),
            trace: None,
        }
    }

    /// A mock that returns its input unchanged.
    pub fn passthrough(name: impl Into<String>) -> Self {
        Self::with_behaviour(name, MockBehaviour::Passthrough)
    }

    /// A mock that always succeeds with the given value.
    pub fn returning(name: impl Into<String>, value: S) -> Self {
        Self::with_behaviour(name, MockBehaviour::ReturnValue(value))
    }

    /// A mock that transforms its input with `f`.
    pub fn applying(
        name: impl Into<String>,
        f: impl Fn(S) -> S + Send + Sync + 'static,
    ) -> Self {
        Self::with_behaviour(name, MockBehaviour::Apply(Arc::new(f)))
    }

    /// A mock that always fails.
    pub fn failing(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with_behaviour(name, MockBehaviour::Fail(msg.into()))
    }

    /// Record this node's name into `trace` on every call.
    pub fn traced(mut self, trace: &Arc<Mutex<Vec<String>>>) -> Self {
        self.trace = Some(Arc::clone(trace));
        self
    }

    /// Number of times this node has been executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl<S: Clone> MockNode<S> {
    /// Inputs seen so far, in call order.
    pub fn inputs(&self) -> Vec<S> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<S: GraphState + Clone> NodeHandler<S> for MockNode<S> {
    async fn run(&self, _ctx: &ExecutionContext, state: S) -> Result<S, NodeError> {
        self.calls.lock().unwrap().push(state.clone());
        if let Some(trace) = &self.trace {
            trace.lock().unwrap().push(self.name.clone());
        }

        match self.behaviour.as_ref() {
            MockBehaviour::Passthrough => Ok(state),
            MockBehaviour::ReturnValue(v) => Ok(v.clone()),
            MockBehaviour::Apply(f) => Ok(f(state)),
            MockBehaviour::Fail(msg) => Err(NodeError::Failed(msg.clone())),
        }
    }
}
