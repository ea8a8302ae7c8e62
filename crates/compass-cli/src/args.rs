use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{PlanCommands, SessionCommands, WorkflowCommands};

/// Main command-line interface for the Compass guidance tool
///
/// Compass turns declarative workflow and checklist definitions into
/// step-by-step guidance sessions for coding agents, and keeps an
/// independent persistent plan tree for tracking task breakdowns. It can be
/// driven directly from the command line or exposed to AI assistants as an
/// MCP (Model Context Protocol) server.
#[derive(Parser)]
#[command(version, about, name = "compass")]
pub struct Args {
    /// Directory for session records. Defaults to
    /// $XDG_DATA_HOME/compass/sessions
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding workflow and checklist definitions. Defaults to
    /// $XDG_CONFIG_HOME/compass/definitions
    #[arg(long, global = true)]
    pub definitions_dir: Option<PathBuf>,

    /// Path to the plan document. Defaults to
    /// $XDG_DATA_HOME/compass/plan.json
    #[arg(long, global = true)]
    pub plan_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Compass CLI
///
/// The CLI is organized into four main command categories:
/// - `session`: Start and navigate guidance sessions
/// - `workflow`: Inspect available definitions and trigger matching
/// - `plan`: Manage the persistent plan tree
/// - `serve`: Start the MCP server for AI assistant integration
#[derive(Subcommand)]
pub enum Commands {
    /// Manage guidance sessions
    #[command(alias = "s")]
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Inspect workflow and checklist definitions
    #[command(alias = "w")]
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
    /// Manage the plan tree
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Start the MCP server
    Serve,
}
