//! Workflow and checklist definition models.

use serde::{Deserialize, Serialize};

/// A single advisory step within a workflow.
///
/// Definition files may write a step as a bare string or as a map with
/// command metadata; the registry normalizes both shapes into this one at
/// load time so no downstream code branches on shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// Guidance text for the agent
    pub text: String,

    /// Optional command the step suggests running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Optional working directory for the suggested command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

impl Step {
    /// Creates a plain guidance step with no command metadata.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            command: None,
            working_dir: None,
        }
    }
}

/// A named, ordered sequence of advisory steps activated by trigger phrases.
///
/// Immutable once loaded; sessions snapshot the steps at frame-push time so
/// registry reloads cannot mutate in-progress sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowDefinition {
    /// Unique name identifying this workflow
    pub name: String,

    /// Human-readable description of what the workflow covers
    pub description: String,

    /// Patterns matched case-insensitively against free-text prompts
    #[serde(default)]
    pub triggers: Vec<String>,

    /// Ordered advisory steps
    pub steps: Vec<Step>,

    /// Tools or packages the workflow assumes are available
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Project types this workflow applies to (matched externally)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_types: Vec<String>,

    /// Free-form conditions that must hold for the workflow to apply
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

/// A named set of unordered validation statements activated by triggers.
///
/// Checklists share the workflow shape but their items carry no ordering
/// semantics. When a checklist is activated as a session frame its items are
/// treated as advisory steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistDefinition {
    /// Unique name identifying this checklist
    pub name: String,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Patterns matched case-insensitively against free-text prompts
    #[serde(default)]
    pub triggers: Vec<String>,

    /// Unordered validation statements
    pub items: Vec<String>,

    /// Tools or packages the checklist assumes are available
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Project types this checklist applies to (matched externally)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_types: Vec<String>,

    /// Free-form conditions that must hold for the checklist to apply
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

impl ChecklistDefinition {
    /// Converts the checklist's items into advisory steps for a session
    /// frame.
    pub fn items_as_steps(&self) -> Vec<Step> {
        self.items.iter().map(|item| Step::text(item.as_str())).collect()
    }
}

/// Which kind of definition a trigger match came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Workflow,
    Checklist,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Workflow => "workflow",
            DefinitionKind::Checklist => "checklist",
        }
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
