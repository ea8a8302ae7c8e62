//! MCP tool handlers implementation

use std::sync::Arc;

use compass_core::{
    params as core, OperationStatus, Orchestrator, PlanManager, PlanOutline, SessionSummaries,
    TriggerMatches,
};
use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::to_mcp_error;

/// Generic MCP wrapper for core parameter types with serde integration
///
/// Wraps a core parameter type in a transparent serde container, adding the
/// MCP-specific derives (Deserialize, JsonSchema) without putting framework
/// dependencies on the core types themselves. `#[serde(transparent)]`
/// passes deserialization straight through to the wrapped type.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

// Type aliases for cleaner usage in function signatures
pub type StartSession = McpParams<core::StartSession>;
pub type SessionId = McpParams<core::SessionId>;
pub type PushWorkflow = McpParams<core::PushWorkflow>;
pub type CleanupSessions = McpParams<core::CleanupSessions>;
pub type MatchPrompt = McpParams<core::MatchPrompt>;
pub type AddPlanItem = McpParams<core::AddPlanItem>;
pub type AddPlanItems = McpParams<core::AddPlanItems>;
pub type PlanItemId = McpParams<core::PlanItemId>;
pub type ExpandPlanItem = McpParams<core::ExpandPlanItem>;
pub type ClearPlan = McpParams<core::ClearPlan>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text_result(text: impl Into<String>) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    orchestrator: Arc<Mutex<Orchestrator>>,
    plan: Arc<PlanManager>,
}

impl McpHandlers {
    pub fn new(orchestrator: Arc<Mutex<Orchestrator>>, plan: Arc<PlanManager>) -> Self {
        Self { orchestrator, plan }
    }

    pub async fn start_session(&self, Parameters(params): Parameters<StartSession>) -> McpResult {
        debug!("start_session: {:?}", params);

        let started = self
            .orchestrator
            .lock()
            .await
            .start(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to start session", &e))?;

        text_result(started.to_string())
    }

    pub async fn session_status(&self, Parameters(params): Parameters<SessionId>) -> McpResult {
        debug!("session_status: {:?}", params);

        let status = self
            .orchestrator
            .lock()
            .await
            .status(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to get session status", &e))?;

        text_result(status.to_string())
    }

    pub async fn advance_session(&self, Parameters(params): Parameters<SessionId>) -> McpResult {
        debug!("advance_session: {:?}", params);

        let outcome = self
            .orchestrator
            .lock()
            .await
            .advance(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to advance session", &e))?;

        text_result(outcome.to_string())
    }

    pub async fn back_session(&self, Parameters(params): Parameters<SessionId>) -> McpResult {
        debug!("back_session: {:?}", params);

        let step = self
            .orchestrator
            .lock()
            .await
            .back(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to step back", &e))?;

        text_result(step.to_string())
    }

    pub async fn restart_session(&self, Parameters(params): Parameters<SessionId>) -> McpResult {
        debug!("restart_session: {:?}", params);

        let step = self
            .orchestrator
            .lock()
            .await
            .restart(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to restart workflow", &e))?;

        text_result(step.to_string())
    }

    pub async fn break_workflow(&self, Parameters(params): Parameters<SessionId>) -> McpResult {
        debug!("break_workflow: {:?}", params);

        let outcome = self
            .orchestrator
            .lock()
            .await
            .break_workflow(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to break out of workflow", &e))?;

        text_result(outcome.to_string())
    }

    pub async fn push_workflow(&self, Parameters(params): Parameters<PushWorkflow>) -> McpResult {
        debug!("push_workflow: {:?}", params);

        let step = self
            .orchestrator
            .lock()
            .await
            .push(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to push workflow", &e))?;

        text_result(step.to_string())
    }

    pub async fn list_sessions(&self) -> McpResult {
        debug!("list_sessions");

        let sessions = self
            .orchestrator
            .lock()
            .await
            .list()
            .await
            .map_err(|e| to_mcp_error("Failed to list sessions", &e))?;

        text_result(SessionSummaries(sessions).to_string())
    }

    pub async fn cleanup_sessions(
        &self,
        Parameters(params): Parameters<CleanupSessions>,
    ) -> McpResult {
        debug!("cleanup_sessions: {:?}", params);

        let removed = self
            .orchestrator
            .lock()
            .await
            .cleanup(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to clean up sessions", &e))?;

        let status = OperationStatus::success(format!("Removed {removed} expired sessions"));
        text_result(status.to_string())
    }

    pub async fn match_workflows(&self, Parameters(params): Parameters<MatchPrompt>) -> McpResult {
        debug!("match_workflows: {:?}", params);

        let matches = self
            .orchestrator
            .lock()
            .await
            .match_prompt(&params.as_ref().prompt)
            .await
            .map_err(|e| to_mcp_error("Failed to match prompt", &e))?;

        text_result(TriggerMatches(matches).to_string())
    }

    pub async fn plan_add_item(&self, Parameters(params): Parameters<AddPlanItem>) -> McpResult {
        debug!("plan_add_item: {:?}", params);

        let item = self
            .plan
            .add_item(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add plan item", &e))?;

        let status = OperationStatus::success(format!("Added plan item {}: {}", item.id, item.text));
        text_result(status.to_string())
    }

    pub async fn plan_add_items(&self, Parameters(params): Parameters<AddPlanItems>) -> McpResult {
        debug!("plan_add_items: {:?}", params);

        let created = self
            .plan
            .add_items(&params.as_ref().items)
            .await
            .map_err(|e| to_mcp_error("Failed to add plan items", &e))?;

        let ids: Vec<&str> = created.iter().map(|i| i.id.as_str()).collect();
        let status = OperationStatus::success(format!(
            "Added {} plan items: {}",
            created.len(),
            ids.join(", ")
        ));
        text_result(status.to_string())
    }

    pub async fn plan_complete_item(
        &self,
        Parameters(params): Parameters<PlanItemId>,
    ) -> McpResult {
        debug!("plan_complete_item: {:?}", params);

        let id = &params.as_ref().id;
        let completed = self
            .plan
            .complete_item(id)
            .await
            .map_err(|e| to_mcp_error("Failed to complete plan item", &e))?;

        // A missing ID is reported in-band, not as a protocol error
        let status = if completed {
            OperationStatus::success(format!("Completed plan item {id}"))
        } else {
            OperationStatus::failure(format!("No plan item with ID '{id}'"))
        };
        text_result(status.to_string())
    }

    pub async fn plan_expand_item(
        &self,
        Parameters(params): Parameters<ExpandPlanItem>,
    ) -> McpResult {
        debug!("plan_expand_item: {:?}", params);

        let children = self
            .plan
            .expand_item(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to expand plan item", &e))?;

        let ids: Vec<&str> = children.iter().map(|i| i.id.as_str()).collect();
        let status = OperationStatus::success(format!(
            "Added {} child items: {}",
            children.len(),
            ids.join(", ")
        ));
        text_result(status.to_string())
    }

    pub async fn plan_clear(&self, Parameters(params): Parameters<ClearPlan>) -> McpResult {
        debug!("plan_clear: {:?}", params);

        self.plan
            .clear(params.as_ref().confirmed)
            .await
            .map_err(|e| to_mcp_error("Failed to clear plan", &e))?;

        let status = OperationStatus::success("Cleared the plan".to_string());
        text_result(status.to_string())
    }

    pub async fn plan_show(&self) -> McpResult {
        debug!("plan_show");

        let doc = self
            .plan
            .outline()
            .await
            .map_err(|e| to_mcp_error("Failed to load plan", &e))?;

        text_result(PlanOutline(doc).to_string())
    }

    pub async fn plan_stats(&self) -> McpResult {
        debug!("plan_stats");

        let stats = self
            .plan
            .stats()
            .await
            .map_err(|e| to_mcp_error("Failed to load plan", &e))?;

        text_result(stats.to_string())
    }
}
