//! The reference agent loop used by the `run` and `describe` sub-commands.
//!
//! ```text
//! agent ──(needs tool?)──▶ tool ──▶ agent
//!       └───────────────▶ respond ──▶ END
//! ```

use std::time::Duration;

use engine::StateGraph;
use nodes::{node_fn, predicate_fn, ExecutionContext, END};
use serde::Serialize;
use tracing::info;

/// State threaded through the demo graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DemoState {
    pub question: String,
    /// Tool rounds the agent asks for before answering.
    pub tool_rounds: u32,
    pub tool_calls: u32,
    pub transcript: Vec<String>,
    pub answer: Option<String>,
}

impl DemoState {
    pub fn new(question: impl Into<String>, tool_rounds: u32) -> Self {
        Self {
            question: question.into(),
            tool_rounds,
            ..Self::default()
        }
    }

    fn needs_tool(&self) -> bool {
        self.tool_calls < self.tool_rounds
    }
}

/// Build the demo graph. `tool_delay` simulates a slow external call.
pub fn build_graph(tool_delay: Duration) -> StateGraph<DemoState> {
    let mut graph = StateGraph::new();
    graph
        .add_node(
            "agent",
            node_fn(|_ctx, mut s: DemoState| async move {
                let line = if s.needs_tool() {
                    format!("agent: calling tool (round {})", s.tool_calls + 1)
                } else {
                    "agent: ready to answer".to_owned()
                };
                s.transcript.push(line);
                Ok(s)
            }),
        )
        .add_node(
            "tool",
            node_fn(move |ctx: ExecutionContext, mut s: DemoState| async move {
                if !tool_delay.is_zero() {
                    tokio::select! {
                        _ = tokio::time::sleep(tool_delay) => {}
                        _ = ctx.cancelled() => info!("tool call interrupted"),
                    }
                }
                s.tool_calls += 1;
                s.transcript.push(format!("tool: result #{}", s.tool_calls));
                Ok(s)
            }),
        )
        .add_node(
            "respond",
            node_fn(|_ctx, mut s: DemoState| async move {
                let answer = format!(
                    "answered '{}' after {} tool call(s)",
                    s.question, s.tool_calls
                );
                s.transcript.push(format!("respond: {answer}"));
                s.answer = Some(answer);
                Ok(s)
            }),
        )
        .add_conditional_edge(
            "agent",
            "tool",
            "respond",
            predicate_fn(|_, s: &DemoState| Ok(s.needs_tool())),
        )
        .add_edge("tool", "agent")
        .add_edge("respond", END)
        .set_entry_point("agent");
    graph
}
