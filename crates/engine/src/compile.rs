//! Graph validation and compilation — run this once the graph is built.
//!
//! Rules enforced:
//! 1. An entry point must be set and must name a registered node.
//! 2. Every edge must reference registered node IDs (`END` is always a
//!    valid target) and must not start at `END`.
//! 3. Each node may be the source of at most one outgoing transition.
//!
//! Checks run in a fixed order (entry point, then edges in insertion order),
//! so the same broken graph always reports the same error.

use std::collections::HashMap;

use nodes::{GraphState, END};
use tracing::debug;

use crate::executor::{ExecutorConfig, Runnable};
use crate::graph::StateGraph;
use crate::models::{EdgeRule, Transition};
use crate::EngineError;

impl<S: GraphState> StateGraph<S> {
    /// Validate the graph and snapshot it into an immutable [`Runnable`]
    /// with the default [`ExecutorConfig`].
    ///
    /// # Errors
    /// - [`EngineError::MissingEntryPoint`] if no entry point was set.
    /// - [`EngineError::UnknownEntryPoint`] if the entry point is not a node.
    /// - [`EngineError::EdgeFromTerminal`] if an edge starts at `END`.
    /// - [`EngineError::UnknownNodeReference`] if an edge names a missing node.
    /// - [`EngineError::ConflictingTransitions`] if a node has two outgoing rules.
    pub fn compile(&self) -> Result<Runnable<S>, EngineError> {
        self.compile_with(ExecutorConfig::default())
    }

    /// Like [`compile`](Self::compile), with explicit executor settings.
    pub fn compile_with(&self, config: ExecutorConfig) -> Result<Runnable<S>, EngineError> {
        // -------------------------------------------------------------------
        // 1. Entry point
        // -------------------------------------------------------------------
        let entry_point = self
            .entry_point
            .as_deref()
            .ok_or(EngineError::MissingEntryPoint)?;
        if !self.nodes.contains_key(entry_point) {
            return Err(EngineError::UnknownEntryPoint(entry_point.to_owned()));
        }

        // Every registered node starts out with no outgoing rule.
        let mut transitions: HashMap<String, Transition<S>> = self
            .nodes
            .keys()
            .map(|id| (id.clone(), Transition::None))
            .collect();

        for rule in &self.edges {
            let from = rule.from_node();

            // ---------------------------------------------------------------
            // 2. Edge endpoints
            // ---------------------------------------------------------------
            if from == END {
                return Err(EngineError::EdgeFromTerminal { edge: rule.spec() });
            }
            let targets: Vec<(&str, &'static str)> = match rule {
                EdgeRule::Plain(e) => vec![(e.to.as_str(), "to")],
                EdgeRule::Conditional(c) => {
                    vec![(c.on_true.as_str(), "true"), (c.on_false.as_str(), "false")]
                }
            };
            for (target, side) in targets {
                if target != END && !self.nodes.contains_key(target) {
                    return Err(EngineError::UnknownNodeReference {
                        node_id: target.to_owned(),
                        side,
                    });
                }
            }

            // ---------------------------------------------------------------
            // 3. At most one outgoing rule per node
            // ---------------------------------------------------------------
            let slot = transitions
                .get_mut(from)
                .ok_or_else(|| EngineError::UnknownNodeReference {
                    node_id: from.to_owned(),
                    side: "from",
                })?;
            if !matches!(slot, Transition::None) {
                return Err(EngineError::ConflictingTransitions {
                    node_id: from.to_owned(),
                });
            }
            *slot = Transition::from(rule);
        }

        debug!(
            entry_point,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph compiled"
        );

        Ok(Runnable::new(
            entry_point.to_owned(),
            self.nodes.clone(),
            transitions,
            self.edges.iter().map(EdgeRule::spec).collect(),
            config,
        ))
    }
}
