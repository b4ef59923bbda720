//! Core graph models: edges as added to the builder, the compiled per-node
//! transition, and a serialisable topology snapshot for diagnostics.

use std::fmt;
use std::sync::Arc;

use nodes::{EdgePredicate, GraphState};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// Directed unconditional edge from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// Edge whose target is picked at runtime by a predicate over the state.
pub struct ConditionalEdge<S: GraphState> {
    pub from: String,
    pub on_true: String,
    pub on_false: String,
    pub predicate: Arc<dyn EdgePredicate<S>>,
}

impl<S: GraphState> Clone for ConditionalEdge<S> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            on_true: self.on_true.clone(),
            on_false: self.on_false.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: GraphState> fmt::Debug for ConditionalEdge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalEdge")
            .field("from", &self.from)
            .field("on_true", &self.on_true)
            .field("on_false", &self.on_false)
            .finish_non_exhaustive()
    }
}

/// One outgoing rule, in the order it was added to the graph.
pub enum EdgeRule<S: GraphState> {
    Plain(Edge),
    Conditional(ConditionalEdge<S>),
}

impl<S: GraphState> fmt::Debug for EdgeRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(e) => e.fmt(f),
            Self::Conditional(c) => c.fmt(f),
        }
    }
}

impl<S: GraphState> Clone for EdgeRule<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(e) => Self::Plain(e.clone()),
            Self::Conditional(c) => Self::Conditional(c.clone()),
        }
    }
}

impl<S: GraphState> EdgeRule<S> {
    /// Source node of the rule.
    pub fn from_node(&self) -> &str {
        match self {
            Self::Plain(e) => &e.from,
            Self::Conditional(c) => &c.from,
        }
    }

    /// Serialisable description, without the predicate.
    pub fn spec(&self) -> EdgeSpec {
        match self {
            Self::Plain(e) => EdgeSpec::Unconditional {
                from: e.from.clone(),
                to: e.to.clone(),
            },
            Self::Conditional(c) => EdgeSpec::Conditional {
                from: c.from.clone(),
                on_true: c.on_true.clone(),
                on_false: c.on_false.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// The single outgoing rule of a compiled node.
pub enum Transition<S: GraphState> {
    /// No outgoing edge. Reaching such a node other than `END` is a
    /// [`DeadEnd`](crate::EngineError::DeadEnd).
    None,
    Unconditional(String),
    Conditional {
        on_true: String,
        on_false: String,
        predicate: Arc<dyn EdgePredicate<S>>,
    },
}

impl<S: GraphState> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Unconditional(to) => f.debug_tuple("Unconditional").field(to).finish(),
            Self::Conditional { on_true, on_false, .. } => f
                .debug_struct("Conditional")
                .field("on_true", on_true)
                .field("on_false", on_false)
                .finish_non_exhaustive(),
        }
    }
}

impl<S: GraphState> From<&EdgeRule<S>> for Transition<S> {
    fn from(rule: &EdgeRule<S>) -> Self {
        match rule {
            EdgeRule::Plain(e) => Self::Unconditional(e.to.clone()),
            EdgeRule::Conditional(c) => Self::Conditional {
                on_true: c.on_true.clone(),
                on_false: c.on_false.clone(),
                predicate: Arc::clone(&c.predicate),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

/// Predicate-free description of one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeSpec {
    Unconditional {
        from: String,
        to: String,
    },
    Conditional {
        from: String,
        on_true: String,
        on_false: String,
    },
}

impl fmt::Display for EdgeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconditional { from, to } => write!(f, "'{from}' -> '{to}'"),
            Self::Conditional {
                from,
                on_true,
                on_false,
            } => write!(f, "'{from}' -> '{on_true}' | '{on_false}'"),
        }
    }
}

/// Shape of a compiled graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphTopology {
    pub entry_point: String,
    /// Registered node ids, sorted.
    pub nodes: Vec<String>,
    /// Edges in insertion order.
    pub edges: Vec<EdgeSpec>,
}
