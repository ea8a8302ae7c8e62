//! Command definitions and handlers using clap
//!
//! This module defines the CLI argument structures with clap's derive API
//! and the [`Cli`] handler that executes them, implementing the parameter
//! wrapper pattern for clean separation between CLI framework concerns and
//! core domain logic.
//!
//! ## Parameter Wrapper Pattern
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Business Logic
//! ```
//!
//! Each command defines a clap `Args` struct with CLI-specific attributes
//! (flags, aliases, help text) and a `From` conversion into the matching
//! core parameter type. Core parameter types stay free of clap derives, so
//! the same types serve the MCP interface with schemars derives instead.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use compass_core::{
    params::{
        AddPlanItem, CleanupSessions, ExpandPlanItem, MatchPrompt, PushWorkflow, StartSession,
    },
    DefinitionCatalog, OperationStatus, Orchestrator, PlanManager, PlanOutline, SessionSummaries,
    TriggerMatches,
};

use crate::renderer::TerminalRenderer;

/// Start a new guidance session
#[derive(Args)]
pub struct StartSessionArgs {
    /// The task being worked on, in free text
    pub prompt: String,
    /// Workflows or checklists to activate, in order. When omitted, the
    /// prompt is matched against every definition's triggers instead.
    #[arg(short, long = "workflow")]
    pub workflows: Vec<String>,
}

impl From<StartSessionArgs> for StartSession {
    fn from(val: StartSessionArgs) -> Self {
        StartSession {
            prompt: val.prompt,
            workflows: val.workflows,
        }
    }
}

/// Identify a session by its ID
#[derive(Args)]
pub struct SessionIdArgs {
    /// ID of the session to operate on
    pub id: String,
}

/// Push a nested workflow onto an open session
#[derive(Args)]
pub struct PushWorkflowArgs {
    /// ID of the session to push onto
    pub id: String,
    /// Name of the workflow or checklist to activate
    pub workflow: String,
}

impl From<PushWorkflowArgs> for PushWorkflow {
    fn from(val: PushWorkflowArgs) -> Self {
        PushWorkflow {
            id: val.id,
            workflow: val.workflow,
        }
    }
}

/// Expire inactive sessions
#[derive(Args)]
pub struct CleanupSessionsArgs {
    /// Remove sessions inactive for longer than this many minutes.
    /// Defaults to one week.
    #[arg(long)]
    pub max_age_minutes: Option<i64>,
}

impl From<CleanupSessionsArgs> for CleanupSessions {
    fn from(val: CleanupSessionsArgs) -> Self {
        CleanupSessions {
            max_age_minutes: val.max_age_minutes,
        }
    }
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a new guidance session
    #[command(alias = "s")]
    Start(StartSessionArgs),
    /// Show the state of a session
    Status(SessionIdArgs),
    /// Mark the current step done and move forward
    #[command(alias = "a")]
    Advance(SessionIdArgs),
    /// Move one step backwards
    Back(SessionIdArgs),
    /// Restart the active workflow from its first step
    Restart(SessionIdArgs),
    /// Abandon the active workflow regardless of progress
    Break(SessionIdArgs),
    /// Activate a nested workflow on top of a session
    Push(PushWorkflowArgs),
    /// List all open sessions
    #[command(aliases = ["l", "ls"])]
    List,
    /// Remove sessions that have been inactive too long
    Cleanup(CleanupSessionsArgs),
}

/// Identify a definition by name
#[derive(Args)]
pub struct DefinitionNameArgs {
    /// Name of the workflow or checklist
    pub name: String,
}

/// Match a prompt against definition triggers
#[derive(Args)]
pub struct MatchPromptArgs {
    /// Free text to match against every definition's triggers
    pub prompt: String,
}

impl From<MatchPromptArgs> for MatchPrompt {
    fn from(val: MatchPromptArgs) -> Self {
        MatchPrompt { prompt: val.prompt }
    }
}

#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// List every available workflow and checklist
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show the full definition of a workflow or checklist
    #[command(alias = "s")]
    Show(DefinitionNameArgs),
    /// Show which definitions a prompt would trigger
    #[command(alias = "m")]
    Match(MatchPromptArgs),
}

/// Add a task to the plan
#[derive(Args)]
pub struct AddPlanItemArgs {
    /// Task text for the new item
    pub text: String,
    /// ID of the parent item to append under; a new root when omitted
    #[arg(short, long)]
    pub parent: Option<String>,
}

impl From<AddPlanItemArgs> for AddPlanItem {
    fn from(val: AddPlanItemArgs) -> Self {
        AddPlanItem {
            text: val.text,
            parent_id: val.parent,
        }
    }
}

/// Identify a plan item by its ID
#[derive(Args)]
pub struct PlanItemIdArgs {
    /// ID of the plan item to operate on
    pub id: String,
}

/// Break a plan item down into child tasks
#[derive(Args)]
pub struct ExpandPlanItemArgs {
    /// ID of the item to expand
    pub id: String,
    /// One pending child is appended per text, in order
    #[arg(required = true)]
    pub texts: Vec<String>,
}

impl From<ExpandPlanItemArgs> for ExpandPlanItem {
    fn from(val: ExpandPlanItemArgs) -> Self {
        ExpandPlanItem {
            id: val.id,
            texts: val.texts,
        }
    }
}

/// Clear the whole plan
#[derive(Args)]
pub struct ClearPlanArgs {
    /// Confirm the clear (required to prevent accidental data loss)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Add a task to the plan
    #[command(alias = "a")]
    Add(AddPlanItemArgs),
    /// Mark a plan item complete
    #[command(alias = "c")]
    Complete(PlanItemIdArgs),
    /// Break a plan item down into child tasks
    #[command(alias = "e")]
    Expand(ExpandPlanItemArgs),
    /// Show the plan as an outline
    #[command(alias = "s")]
    Show,
    /// Show aggregate plan statistics
    Stats,
    /// Remove every item from the plan
    Clear(ClearPlanArgs),
}

/// Command handler tying the orchestrator, plan manager, and renderer
/// together.
pub struct Cli {
    orchestrator: Orchestrator,
    plan: PlanManager,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(orchestrator: Orchestrator, plan: PlanManager, renderer: TerminalRenderer) -> Self {
        Self {
            orchestrator,
            plan,
            renderer,
        }
    }

    pub async fn handle_session_command(mut self, command: SessionCommands) -> Result<()> {
        match command {
            SessionCommands::Start(args) => {
                let started = self
                    .orchestrator
                    .start(&args.into())
                    .await
                    .context("Failed to start session")?;
                self.renderer.render(&started.to_string())
            }
            SessionCommands::Status(args) => {
                let status = self
                    .orchestrator
                    .status(&args.id)
                    .await
                    .context("Failed to get session status")?;
                self.renderer.render(&status.to_string())
            }
            SessionCommands::Advance(args) => {
                let outcome = self
                    .orchestrator
                    .advance(&args.id)
                    .await
                    .context("Failed to advance session")?;
                self.renderer.render(&outcome.to_string())
            }
            SessionCommands::Back(args) => {
                let step = self
                    .orchestrator
                    .back(&args.id)
                    .await
                    .context("Failed to step back")?;
                self.renderer.render(&step.to_string())
            }
            SessionCommands::Restart(args) => {
                let step = self
                    .orchestrator
                    .restart(&args.id)
                    .await
                    .context("Failed to restart workflow")?;
                self.renderer.render(&step.to_string())
            }
            SessionCommands::Break(args) => {
                let outcome = self
                    .orchestrator
                    .break_workflow(&args.id)
                    .await
                    .context("Failed to break out of workflow")?;
                self.renderer.render(&outcome.to_string())
            }
            SessionCommands::Push(args) => {
                let step = self
                    .orchestrator
                    .push(&args.into())
                    .await
                    .context("Failed to push workflow")?;
                self.renderer.render(&step.to_string())
            }
            SessionCommands::List => self.list_sessions().await,
            SessionCommands::Cleanup(args) => {
                let removed = self
                    .orchestrator
                    .cleanup(&args.into())
                    .await
                    .context("Failed to clean up sessions")?;
                let status =
                    OperationStatus::success(format!("Removed {removed} expired sessions"));
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn handle_workflow_command(mut self, command: WorkflowCommands) -> Result<()> {
        match command {
            WorkflowCommands::List => {
                let registry = self.orchestrator.registry_mut();
                let catalog = DefinitionCatalog {
                    workflows: registry.workflows(),
                    checklists: registry.checklists(),
                };
                self.renderer.render(&catalog.to_string())
            }
            WorkflowCommands::Show(args) => {
                let registry = self.orchestrator.registry_mut();
                if let Some(workflow) = registry.get_workflow(&args.name) {
                    return self.renderer.render(&workflow.to_string());
                }
                if let Some(checklist) = registry.get_checklist(&args.name) {
                    return self.renderer.render(&checklist.to_string());
                }
                bail!("No workflow or checklist named '{}'", args.name)
            }
            WorkflowCommands::Match(args) => {
                let params: MatchPrompt = args.into();
                let matches = self
                    .orchestrator
                    .match_prompt(&params.prompt)
                    .await
                    .context("Failed to match prompt")?;
                self.renderer.render(&TriggerMatches(matches).to_string())
            }
        }
    }

    pub async fn handle_plan_command(self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Add(args) => {
                let item = self
                    .plan
                    .add_item(&args.into())
                    .await
                    .context("Failed to add plan item")?;
                let status =
                    OperationStatus::success(format!("Added plan item {}: {}", item.id, item.text));
                self.renderer.render(&status.to_string())
            }
            PlanCommands::Complete(args) => {
                let completed = self
                    .plan
                    .complete_item(&args.id)
                    .await
                    .context("Failed to complete plan item")?;
                let status = if completed {
                    OperationStatus::success(format!("Completed plan item {}", args.id))
                } else {
                    OperationStatus::failure(format!("No plan item with ID '{}'", args.id))
                };
                self.renderer.render(&status.to_string())
            }
            PlanCommands::Expand(args) => {
                let children = self
                    .plan
                    .expand_item(&args.into())
                    .await
                    .context("Failed to expand plan item")?;
                let status =
                    OperationStatus::success(format!("Added {} child items", children.len()));
                self.renderer.render(&status.to_string())
            }
            PlanCommands::Show => {
                let doc = self.plan.outline().await.context("Failed to load plan")?;
                self.renderer.render(&PlanOutline(doc).to_string())
            }
            PlanCommands::Stats => {
                let stats = self.plan.stats().await.context("Failed to load plan")?;
                self.renderer.render(&stats.to_string())
            }
            PlanCommands::Clear(args) => {
                self.plan
                    .clear(args.confirm)
                    .await
                    .context("Failed to clear plan")?;
                let status = OperationStatus::success("Cleared the plan".to_string());
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn list_sessions(&mut self) -> Result<()> {
        let sessions = self
            .orchestrator
            .list()
            .await
            .context("Failed to list sessions")?;
        self.renderer.render(&SessionSummaries(sessions).to_string())
    }
}
