//! Parameter structures for compass operations
//!
//! Shared parameter structures used across interfaces (CLI, MCP) without
//! framework-specific derives. Interface layers wrap these types to add
//! their own derives (clap arguments, JSON schemas) and convert into the
//! core shapes, keeping the domain logic framework-free.
//!
//! JSON schema generation is gated behind the `schema` feature so that the
//! core stays lightweight for consumers that do not speak MCP.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for starting a new guidance session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StartSession {
    /// The free-text task description that triggered the session
    pub prompt: String,
    /// Workflow or checklist names to activate. When empty, the prompt is
    /// matched against every definition's triggers instead.
    #[serde(default)]
    pub workflows: Vec<String>,
}

/// Generic parameters for operations addressing a session by ID.
///
/// Used for status, advance, back, restart, and break.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SessionId {
    /// The ID of the session to operate on
    pub id: String,
}

/// Parameters for pushing a nested workflow onto an open session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PushWorkflow {
    /// The ID of the session to push onto
    pub id: String,
    /// Name of the workflow or checklist to activate
    pub workflow: String,
}

/// Parameters for expiring inactive sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CleanupSessions {
    /// Remove sessions inactive for longer than this many minutes.
    /// Defaults to one week.
    pub max_age_minutes: Option<i64>,
}

impl CleanupSessions {
    /// Default inactivity threshold: one week.
    pub const DEFAULT_MAX_AGE_MINUTES: i64 = 7 * 24 * 60;

    /// The configured threshold in milliseconds.
    pub fn max_age_ms(&self) -> i64 {
        self.max_age_minutes
            .unwrap_or(Self::DEFAULT_MAX_AGE_MINUTES)
            .saturating_mul(60_000)
    }
}

/// Parameters for matching a prompt against definition triggers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct MatchPrompt {
    /// Free text to match against every definition's triggers
    pub prompt: String,
}

/// Parameters for adding one plan item.
///
/// Also the element type of the batched [`AddPlanItems`] path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddPlanItem {
    /// Task text for the new item
    pub text: String,
    /// ID of the parent item to append under; a new root when omitted
    pub parent_id: Option<String>,
}

/// Parameters for adding several plan items in one load/save cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddPlanItems {
    /// Items to add, applied in order
    pub items: Vec<AddPlanItem>,
}

/// Generic parameters for operations addressing a plan item by ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PlanItemId {
    /// The ID of the plan item to operate on
    pub id: String,
}

/// Parameters for expanding a plan item into child tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ExpandPlanItem {
    /// ID of the item to expand
    pub id: String,
    /// One pending child is appended per text, preserving order
    pub texts: Vec<String>,
}

/// Parameters for clearing the whole plan.
///
/// Clearing is irreversible, so it requires explicit confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ClearPlan {
    /// Must be true for the clear to proceed
    #[serde(default)]
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_defaults_to_one_week() {
        let params = CleanupSessions::default();
        assert_eq!(params.max_age_ms(), 7 * 24 * 60 * 60_000);
    }

    #[test]
    fn cleanup_converts_minutes_to_ms() {
        let params = CleanupSessions {
            max_age_minutes: Some(30),
        };
        assert_eq!(params.max_age_ms(), 30 * 60_000);
    }
}
