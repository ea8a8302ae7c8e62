//! Compass CLI Application
//!
//! Command-line interface for the compass workflow guidance tool.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use compass_core::{OrchestratorBuilder, PlanManager};
use log::info;
use mcp::{run_stdio_server, CompassMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        data_dir,
        definitions_dir,
        plan_file,
        no_color,
        command,
    } = Args::parse();

    let orchestrator = OrchestratorBuilder::new()
        .with_data_dir(data_dir)
        .with_definitions_dir(definitions_dir)
        .build()
        .await
        .context("Failed to initialize orchestrator")?;

    let plan_path = match plan_file {
        Some(path) => path,
        None => PlanManager::default_path().context("Failed to resolve plan location")?,
    };
    let plan = PlanManager::new(plan_path).context("Failed to initialize plan manager")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Compass started");

    match command {
        Some(Session { command }) => {
            Cli::new(orchestrator, plan, renderer)
                .handle_session_command(command)
                .await
        }
        Some(Workflow { command }) => {
            Cli::new(orchestrator, plan, renderer)
                .handle_workflow_command(command)
                .await
        }
        Some(Plan { command }) => {
            Cli::new(orchestrator, plan, renderer)
                .handle_plan_command(command)
                .await
        }
        Some(Serve) => {
            info!("Starting Compass MCP server");
            run_stdio_server(CompassMcpServer::new(orchestrator, plan))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(orchestrator, plan, renderer)
                .list_sessions()
                .await
        }
    }
}
