//! Graph execution engine.
//!
//! `Runnable` is the compiled, immutable form of a [`StateGraph`]:
//! 1. Starts at the entry point with the caller's initial state.
//! 2. Before every step, checks the `ExecutionContext` for cancellation or
//!    an elapsed deadline.
//! 3. Runs the current node's handler and replaces the state with its output.
//! 4. Stops after the `END` node; otherwise follows the node's single
//!    transition, evaluating the branch predicate for conditional edges.
//!
//! Any error aborts the run immediately and no partial state is returned.
//!
//! [`StateGraph`]: crate::StateGraph

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use nodes::{ExecutionContext, GraphState, NodeHandler, END};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::models::{EdgeSpec, GraphTopology, Transition};
use crate::EngineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Abort with [`EngineError::StepLimitExceeded`] instead of running a
    /// handler beyond this many. Stopping at an unregistered `END` runs no
    /// handler and is not counted. `None` lets cyclic graphs run until
    /// cancelled.
    pub max_steps: Option<usize>,
    /// Per-run timeout, combined with any deadline already on the caller's
    /// context (the earlier one wins).
    pub timeout: Option<Duration>,
}

// ---------------------------------------------------------------------------
// Output of a completed execution
// ---------------------------------------------------------------------------

/// The result of running a graph to completion.
#[derive(Debug, Clone)]
pub struct ExecutionResult<S> {
    /// Run id taken from the execution context.
    pub run_id: Uuid,
    /// State returned by the last node executed.
    pub output: S,
    /// Node ids in the order they were visited, ending with `END`.
    pub path: Vec<String>,
    /// Handler executions, the quantity bounded by `max_steps`.
    pub steps: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Runnable
// ---------------------------------------------------------------------------

struct Plan<S: GraphState> {
    entry_point: String,
    nodes: HashMap<String, Arc<dyn NodeHandler<S>>>,
    transitions: HashMap<String, Transition<S>>,
    edges: Vec<EdgeSpec>,
}

/// A compiled graph.
///
/// Cheap to clone; clones share the same read-only plan, so one `Runnable`
/// can serve any number of concurrent [`invoke`](Self::invoke) calls.
pub struct Runnable<S: GraphState> {
    plan: Arc<Plan<S>>,
    config: ExecutorConfig,
}

impl<S: GraphState> Clone for Runnable<S> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            config: self.config.clone(),
        }
    }
}

impl<S: GraphState> fmt::Debug for Runnable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runnable")
            .field("entry_point", &self.plan.entry_point)
            .field("nodes", &self.plan.nodes.len())
            .field("transitions", &self.plan.transitions)
            .field("config", &self.config)
            .finish()
    }
}

impl<S: GraphState> Runnable<S> {
    pub(crate) fn new(
        entry_point: String,
        nodes: HashMap<String, Arc<dyn NodeHandler<S>>>,
        transitions: HashMap<String, Transition<S>>,
        edges: Vec<EdgeSpec>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            plan: Arc::new(Plan {
                entry_point,
                nodes,
                transitions,
                edges,
            }),
            config,
        }
    }

    pub fn entry_point(&self) -> &str {
        &self.plan.entry_point
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Replace the executor settings. The graph structure is unaffected.
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// The compiled outgoing rule of `node_id`, if it is a registered node.
    pub fn transition(&self, node_id: &str) -> Option<&Transition<S>> {
        self.plan.transitions.get(node_id)
    }

    /// Predicate-free snapshot of the graph's shape.
    pub fn topology(&self) -> GraphTopology {
        let mut nodes: Vec<String> = self.plan.nodes.keys().cloned().collect();
        nodes.sort_unstable();
        GraphTopology {
            entry_point: self.plan.entry_point.clone(),
            nodes,
            edges: self.plan.edges.clone(),
        }
    }

    /// Run the graph and return the final state.
    ///
    /// Unlike [`run`](Self::run) no path is recorded, so a long-lived cycle
    /// does not accumulate per-step bookkeeping.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub async fn invoke(&self, ctx: &ExecutionContext, state: S) -> Result<S, EngineError> {
        self.traverse(ctx, state, None).await.map(|(output, _)| output)
    }

    /// Run the graph and return the final state together with the path taken.
    ///
    /// # Errors
    /// - [`EngineError::Cancelled`] / [`EngineError::DeadlineExceeded`] when
    ///   the context stops the run between steps.
    /// - [`EngineError::NodeFailed`] / [`EngineError::PredicateFailed`] when
    ///   a handler or branch predicate returns an error.
    /// - [`EngineError::DeadEnd`], [`EngineError::NodeNotFound`] or
    ///   [`EngineError::StepLimitExceeded`] for structural failures.
    pub async fn run(
        &self,
        ctx: &ExecutionContext,
        initial_state: S,
    ) -> Result<ExecutionResult<S>, EngineError> {
        let started_at = Utc::now();
        let mut path = Vec::new();
        let (output, steps) = self.traverse(ctx, initial_state, Some(&mut path)).await?;

        Ok(ExecutionResult {
            run_id: ctx.run_id(),
            output,
            path,
            steps,
            started_at,
            finished_at: Utc::now(),
        })
    }

    // -----------------------------------------------------------------------
    // Internal: the traversal loop shared by `invoke` and `run`.
    // Returns the final state and the number of handler executions.
    // -----------------------------------------------------------------------

    #[instrument(skip_all, fields(run_id = %ctx.run_id(), entry_point = %self.plan.entry_point))]
    async fn traverse(
        &self,
        ctx: &ExecutionContext,
        initial_state: S,
        mut path: Option<&mut Vec<String>>,
    ) -> Result<(S, usize), EngineError> {
        let ctx = match self.config.timeout {
            Some(timeout) => ctx.clone().with_timeout(timeout),
            None => ctx.clone(),
        };

        let mut current = self.plan.entry_point.clone();
        let mut state = initial_state;
        let mut steps = 0usize;

        loop {
            if ctx.is_cancelled() {
                warn!(node = %current, steps, "run cancelled");
                return Err(EngineError::Cancelled);
            }
            if ctx.is_past_deadline() {
                warn!(node = %current, steps, "run deadline exceeded");
                return Err(EngineError::DeadlineExceeded);
            }

            // An unregistered END is a plain stop marker and runs nothing.
            let handler = self.plan.nodes.get(&current);
            if handler.is_none() && current != END {
                return Err(EngineError::NodeNotFound(current));
            }

            if let Some(handler) = handler {
                if let Some(limit) = self.config.max_steps {
                    if steps >= limit {
                        warn!(node = %current, limit, "step limit reached");
                        return Err(EngineError::StepLimitExceeded { limit });
                    }
                }

                debug!(node = %current, step = steps, "executing node");
                state = handler.run(&ctx, state).await.map_err(|source| {
                    error!(node = %current, error = %source, "node failed");
                    EngineError::NodeFailed {
                        node_id: current.clone(),
                        source,
                    }
                })?;
                steps += 1;
            }
            if let Some(path) = path.as_mut() {
                path.push(current.clone());
            }

            if current == END {
                break;
            }
            current = self.next_node(&ctx, &current, &state).await?;
        }

        info!(steps, "run completed");
        Ok((state, steps))
    }

    // -----------------------------------------------------------------------
    // Internal: resolve the node after `current`.
    // -----------------------------------------------------------------------

    async fn next_node(
        &self,
        ctx: &ExecutionContext,
        current: &str,
        state: &S,
    ) -> Result<String, EngineError> {
        match self.plan.transitions.get(current) {
            Some(Transition::Unconditional(to)) => Ok(to.clone()),
            Some(Transition::Conditional {
                on_true,
                on_false,
                predicate,
            }) => {
                let taken = predicate.evaluate(ctx, state).await.map_err(|source| {
                    error!(node = %current, error = %source, "branch predicate failed");
                    EngineError::PredicateFailed {
                        node_id: current.to_owned(),
                        source,
                    }
                })?;
                let next = if taken { on_true } else { on_false };
                debug!(node = %current, taken, next = %next, "branch resolved");
                Ok(next.clone())
            }
            Some(Transition::None) | None => {
                error!(node = %current, "no outgoing edge");
                Err(EngineError::DeadEnd(current.to_owned()))
            }
        }
    }
}
