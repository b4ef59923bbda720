//! Graph definition — the mutable builder a workflow is described with
//! before it is compiled into a [`Runnable`](crate::Runnable).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use nodes::{EdgePredicate, GraphState, NodeHandler};

use crate::models::{ConditionalEdge, Edge, EdgeRule};

/// A workflow under construction.
///
/// Nothing is validated while building; edges may name nodes that are added
/// later. All checks happen in [`StateGraph::compile`].
pub struct StateGraph<S: GraphState> {
    pub(crate) nodes: HashMap<String, Arc<dyn NodeHandler<S>>>,
    pub(crate) edges: Vec<EdgeRule<S>>,
    pub(crate) entry_point: Option<String>,
}

impl<S: GraphState> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphState> fmt::Debug for StateGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("nodes", &self.node_ids())
            .field("edges", &self.edges)
            .field("entry_point", &self.entry_point)
            .finish()
    }
}

impl<S: GraphState> StateGraph<S> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            entry_point: None,
        }
    }

    /// Register `handler` under `id`, replacing any handler already there.
    pub fn add_node<H>(&mut self, id: impl Into<String>, handler: H) -> &mut Self
    where
        H: NodeHandler<S> + 'static,
    {
        self.nodes.insert(id.into(), Arc::new(handler));
        self
    }

    /// Append an unconditional edge `from → to`.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push(EdgeRule::Plain(Edge {
            from: from.into(),
            to: to.into(),
        }));
        self
    }

    /// Append a conditional edge: after `from` runs, `predicate` picks
    /// `on_true` or `on_false`.
    pub fn add_conditional_edge<P>(
        &mut self,
        from: impl Into<String>,
        on_true: impl Into<String>,
        on_false: impl Into<String>,
        predicate: P,
    ) -> &mut Self
    where
        P: EdgePredicate<S> + 'static,
    {
        self.edges.push(EdgeRule::Conditional(ConditionalEdge {
            from: from.into(),
            on_true: on_true.into(),
            on_false: on_false.into(),
            predicate: Arc::new(predicate),
        }));
        self
    }

    /// Set the node traversal starts from. Overwrites any previous value.
    pub fn set_entry_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.entry_point = Some(id.into());
        self
    }

    pub fn entry_point(&self) -> Option<&str> {
        self.entry_point.as_deref()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Registered node ids, sorted.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Edges in the order they were added.
    pub fn edges(&self) -> &[EdgeRule<S>] {
        &self.edges
    }
}
