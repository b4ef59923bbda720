//! `stepgraph` CLI entry-point.
//!
//! Available sub-commands:
//! - `run`      — compile and run the demo agent graph.
//! - `describe` — print the demo graph's topology as JSON.

mod demo;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use engine::{ExecutionContext, ExecutorConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stepgraph",
    about = "Run and inspect directed-graph workflows",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the demo agent graph and print the final state.
    Run {
        /// Question handed to the agent.
        #[arg(long, default_value = "what is a state graph?")]
        question: String,
        /// Number of tool rounds before the agent answers.
        #[arg(long, default_value_t = 2)]
        tool_rounds: u32,
        /// Simulated latency of each tool call.
        #[arg(long, default_value_t = 0)]
        tool_delay_ms: u64,
        /// Abort the run after this many milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Abort the run after this many node executions.
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Print the demo graph's nodes and edges as JSON.
    Describe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            question,
            tool_rounds,
            tool_delay_ms,
            timeout_ms,
            max_steps,
        } => {
            let config = ExecutorConfig {
                max_steps,
                timeout: timeout_ms.map(Duration::from_millis),
            };
            let runnable = demo::build_graph(Duration::from_millis(tool_delay_ms))
                .compile_with(config)
                .context("demo graph failed validation")?;

            let ctx = ExecutionContext::new();
            let token = ctx.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, cancelling run");
                    token.cancel();
                }
            });

            info!(run_id = %ctx.run_id(), "starting demo run");
            let result = runnable
                .run(&ctx, demo::DemoState::new(question, tool_rounds))
                .await
                .context("demo run failed")?;

            info!(path = ?result.path, "demo run finished");
            println!("{}", serde_json::to_string_pretty(&result.output)?);
        }
        Command::Describe => {
            let runnable = demo::build_graph(Duration::ZERO)
                .compile()
                .context("demo graph failed validation")?;
            println!("{}", serde_json::to_string_pretty(&runnable.topology())?);
        }
    }

    Ok(())
}
