//! MCP server implementation for Compass
//!
//! This module implements the Model Context Protocol server for Compass,
//! giving AI agents a standardized interface to guidance sessions, the
//! definition registry, and the plan tree.

use std::sync::Arc;

use anyhow::Result;
use compass_core::{Orchestrator, PlanManager};
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;

pub use errors::to_mcp_error;
pub use handlers::{
    AddPlanItem, AddPlanItems, CleanupSessions, ClearPlan, ExpandPlanItem, MatchPrompt, McpResult,
    PlanItemId, PushWorkflow, SessionId, StartSession,
};

/// MCP server for Compass
#[derive(Clone)]
pub struct CompassMcpServer {
    orchestrator: Arc<Mutex<Orchestrator>>,
    plan: Arc<PlanManager>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CompassMcpServer {
    /// Create a new Compass MCP server
    pub fn new(orchestrator: Orchestrator, plan: PlanManager) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            plan: Arc::new(plan),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.orchestrator.clone(), self.plan.clone())
    }

    #[tool(
        name = "start_session",
        description = "Start a step-by-step guidance session for a task. Provide the task prompt (required) and optionally the workflow/checklist names to follow; with no names given, the prompt is matched against every definition's triggers and the matching ones are activated. Returns the session ID and the first step to act on."
    )]
    async fn start_session(&self, params: Parameters<StartSession>) -> McpResult {
        self.handlers().start_session(params).await
    }

    #[tool(
        name = "session_status",
        description = "Show the current state of a guidance session: the original prompt, the workflow stack, and the step currently being worked on. Use the session ID returned by start_session."
    )]
    async fn session_status(&self, params: Parameters<SessionId>) -> McpResult {
        self.handlers().session_status(params).await
    }

    #[tool(
        name = "advance_session",
        description = "Mark the current step done and move to the next one. When the last step of a workflow is passed, the workflow closes: a nested workflow returns to its parent, and closing the last workflow completes the whole session."
    )]
    async fn advance_session(&self, params: Parameters<SessionId>) -> McpResult {
        self.handlers().advance_session(params).await
    }

    #[tool(
        name = "back_session",
        description = "Move one step backwards in the active workflow, for revisiting a step that needs more work. Already at the first step this is a no-op."
    )]
    async fn back_session(&self, params: Parameters<SessionId>) -> McpResult {
        self.handlers().back_session(params).await
    }

    #[tool(
        name = "restart_session",
        description = "Restart the active workflow from its first step. Only the workflow on top of the stack is reset; suspended parent workflows keep their positions."
    )]
    async fn restart_session(&self, params: Parameters<SessionId>) -> McpResult {
        self.handlers().restart_session(params).await
    }

    #[tool(
        name = "break_workflow",
        description = "Abandon the active workflow regardless of its progress. A nested workflow returns control to its parent at the step it was suspended on; breaking the last workflow closes the session."
    )]
    async fn break_workflow(&self, params: Parameters<SessionId>) -> McpResult {
        self.handlers().break_workflow(params).await
    }

    #[tool(
        name = "push_workflow",
        description = "Activate a nested workflow or checklist on top of an open session, suspending the current one at its position. Use for sub-tasks discovered mid-workflow; the parent resumes when the pushed workflow completes or is broken out of."
    )]
    async fn push_workflow(&self, params: Parameters<PushWorkflow>) -> McpResult {
        self.handlers().push_workflow(params).await
    }

    #[tool(
        name = "list_sessions",
        description = "List every open guidance session with its ID, prompt, active workflow, and current position. Use to rediscover a session ID or check for abandoned sessions."
    )]
    async fn list_sessions(&self) -> McpResult {
        self.handlers().list_sessions().await
    }

    #[tool(
        name = "cleanup_sessions",
        description = "Remove sessions that have been inactive for longer than max_age_minutes (default: one week). Returns how many sessions were removed."
    )]
    async fn cleanup_sessions(&self, params: Parameters<CleanupSessions>) -> McpResult {
        self.handlers().cleanup_sessions(params).await
    }

    #[tool(
        name = "match_workflows",
        description = "Show which workflow and checklist definitions a prompt would trigger, without starting a session. Matching is a case-insensitive substring check of each trigger against the prompt."
    )]
    async fn match_workflows(&self, params: Parameters<MatchPrompt>) -> McpResult {
        self.handlers().match_workflows(params).await
    }

    #[tool(
        name = "plan_add_item",
        description = "Add one task to the persistent plan. Provide the task text and optionally a parent_id to nest it under an existing item; without a parent it becomes a new root task. Returns the new item's ID."
    )]
    async fn plan_add_item(&self, params: Parameters<AddPlanItem>) -> McpResult {
        self.handlers().plan_add_item(params).await
    }

    #[tool(
        name = "plan_add_items",
        description = "Add several tasks to the plan in one atomic batch, preserving order. Each item has its own text and optional parent_id. Prefer this over repeated plan_add_item calls when adding a whole breakdown at once."
    )]
    async fn plan_add_items(&self, params: Parameters<AddPlanItems>) -> McpResult {
        self.handlers().plan_add_items(params).await
    }

    #[tool(
        name = "plan_complete_item",
        description = "Mark a plan item complete by ID. Completion does not cascade: children and parents keep their own status. Reports whether an item with that ID existed."
    )]
    async fn plan_complete_item(&self, params: Parameters<PlanItemId>) -> McpResult {
        self.handlers().plan_complete_item(params).await
    }

    #[tool(
        name = "plan_expand_item",
        description = "Break an existing plan item into child tasks. Provide the item ID and a list of texts; one pending child is appended per text, in order. Use when a task turns out to need several sub-steps."
    )]
    async fn plan_expand_item(&self, params: Parameters<ExpandPlanItem>) -> McpResult {
        self.handlers().plan_expand_item(params).await
    }

    #[tool(
        name = "plan_clear",
        description = "Remove every item from the plan. This cannot be undone, so confirmed=true is required; without it the call fails and nothing is changed."
    )]
    async fn plan_clear(&self, params: Parameters<ClearPlan>) -> McpResult {
        self.handlers().plan_clear(params).await
    }

    #[tool(
        name = "plan_show",
        description = "Show the whole plan as an indented outline with completion markers and item IDs. Use the IDs with plan_complete_item and plan_expand_item."
    )]
    async fn plan_show(&self) -> McpResult {
        self.handlers().plan_show().await
    }

    #[tool(
        name = "plan_stats",
        description = "Show aggregate plan statistics: total items, completed items, completion rate, and maximum nesting depth."
    )]
    async fn plan_stats(&self) -> McpResult {
        self.handlers().plan_stats().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for CompassMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "compass".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::default()
            },
            instructions: Some(r#"Compass provides step-by-step workflow guidance for coding tasks, plus a persistent plan tree for tracking task breakdowns.

## Core Concepts
- **Workflows**: Named sequences of guidance steps, defined in YAML and matched to prompts via trigger keywords
- **Checklists**: Named lists of verification items that run the same way as workflows
- **Sessions**: Your progress through one or more workflows; workflows nest as a stack, so a sub-task can run its own workflow and return
- **Plan**: A persistent tree of tasks, independent of sessions

## Workflow Examples

### Following guidance for a task
1. Call `start_session` with the task prompt - matching workflows activate automatically, or name them explicitly
2. Act on the returned step, then call `advance_session` to move on
3. When a sub-task appears, `push_workflow` nests another workflow; finishing it resumes the parent
4. The session closes itself after its last step

### Tracking a task breakdown
1. Add tasks with `plan_add_item` / `plan_add_items` (batch)
2. Break tasks down with `plan_expand_item` as details emerge
3. Mark work done with `plan_complete_item` and review with `plan_show` / `plan_stats`

## Best Practices
- Let trigger matching pick workflows: describe the task naturally in the prompt
- Advance only after actually doing the step; use `back_session` to revisit
- Keep the plan tree current - complete items as you finish them, not in bulk at the end

## Tool Categories
- **Sessions**: start_session, session_status, advance_session, back_session, restart_session, break_workflow, push_workflow, list_sessions, cleanup_sessions
- **Definitions**: match_workflows
- **Plan**: plan_add_item, plan_add_items, plan_complete_item, plan_expand_item, plan_clear, plan_show, plan_stats"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: CompassMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Compass MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    // Set up signal handlers for graceful shutdown
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
