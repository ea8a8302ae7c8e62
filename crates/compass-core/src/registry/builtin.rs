//! Built-in default definitions.
//!
//! Served when the definitions directory yields no valid records at all, so
//! a fresh install still produces guidance. Users override these simply by
//! dropping their own YAML files into the definitions directory.

use std::collections::HashMap;

use crate::models::{ChecklistDefinition, Step, WorkflowDefinition};

/// The built-in workflow and checklist sets, keyed by name.
pub fn defaults() -> (
    HashMap<String, WorkflowDefinition>,
    HashMap<String, ChecklistDefinition>,
) {
    let workflows = [analysis(), implementation(), quality()]
        .into_iter()
        .map(|w| (w.name.clone(), w))
        .collect();
    let checklists = [pre_commit()]
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect();
    (workflows, checklists)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

fn analysis() -> WorkflowDefinition {
    WorkflowDefinition {
        name: "analysis".to_string(),
        description: "Codebase exploration, pattern identification, and research".to_string(),
        triggers: strings(&[
            "analyze",
            "explore",
            "understand",
            "investigate",
            "research",
            "review",
            "examine",
        ]),
        steps: vec![
            Step::text("Identify the entry points and main modules relevant to the request"),
            Step::text("Read the existing code paths the change will touch and note conventions"),
            Step::text("Summarize findings: affected files, constraints, and open questions"),
        ],
        dependencies: Vec::new(),
        project_types: Vec::new(),
        conditions: Vec::new(),
    }
}

fn implementation() -> WorkflowDefinition {
    WorkflowDefinition {
        name: "implementation".to_string(),
        description: "Feature development, bug fixes, and code changes".to_string(),
        triggers: strings(&[
            "implement", "add", "create", "build", "develop", "fix", "refactor",
        ]),
        steps: vec![
            Step::text("Sketch the change: list the files to modify and the new surface area"),
            Step::text("Make the smallest coherent change first and keep the build green"),
            Step::text("Write or update tests covering the changed behavior"),
            Step {
                text: "Run the test suite and fix any regressions".to_string(),
                command: Some("cargo test".to_string()),
                working_dir: None,
            },
        ],
        dependencies: strings(&["analysis"]),
        project_types: Vec::new(),
        conditions: Vec::new(),
    }
}

fn quality() -> WorkflowDefinition {
    WorkflowDefinition {
        name: "quality".to_string(),
        description: "Code quality, linting, formatting, and compliance".to_string(),
        triggers: strings(&["lint", "format", "audit", "quality", "clean up"]),
        steps: vec![
            Step {
                text: "Format the codebase".to_string(),
                command: Some("cargo fmt".to_string()),
                working_dir: None,
            },
            Step {
                text: "Run the linter and resolve every warning".to_string(),
                command: Some("cargo clippy --all-targets".to_string()),
                working_dir: None,
            },
            Step::text("Re-read the diff for naming, dead code, and missing docs"),
        ],
        dependencies: Vec::new(),
        project_types: Vec::new(),
        conditions: Vec::new(),
    }
}

fn pre_commit() -> ChecklistDefinition {
    ChecklistDefinition {
        name: "pre-commit".to_string(),
        description: Some("Sanity checks before committing work".to_string()),
        triggers: strings(&["commit", "ready to ship", "before push"]),
        items: strings(&[
            "All tests pass locally",
            "No debug prints or commented-out code remain",
            "Commit message describes the why, not just the what",
            "No secrets or credentials are staged",
        ]),
        dependencies: Vec::new(),
        project_types: Vec::new(),
        conditions: Vec::new(),
    }
}
