#![allow(dead_code)]

use std::{fs, path::Path};

use compass_core::{Orchestrator, OrchestratorBuilder};
use tempfile::TempDir;

/// Writes a workflow definition file with plain-text steps.
pub fn write_workflow(dir: &Path, name: &str, triggers: &[&str], steps: &[&str]) {
    fs::create_dir_all(dir).expect("create definitions dir");
    let triggers: String = triggers.iter().map(|t| format!("  - {t}\n")).collect();
    let steps: String = steps.iter().map(|s| format!("  - {s}\n")).collect();
    let body = format!(
        "name: {name}\ndescription: Test workflow {name}\ntriggers:\n{triggers}steps:\n{steps}"
    );
    fs::write(dir.join(format!("{name}.yaml")), body).expect("write workflow");
}

/// Writes a checklist definition file under `checklists/`.
pub fn write_checklist(dir: &Path, name: &str, triggers: &[&str], items: &[&str]) {
    let checklists = dir.join("checklists");
    fs::create_dir_all(&checklists).expect("create checklists dir");
    let triggers: String = triggers.iter().map(|t| format!("  - {t}\n")).collect();
    let items: String = items.iter().map(|i| format!("  - {i}\n")).collect();
    let body = format!(
        "name: {name}\ndescription: Test checklist {name}\ntriggers:\n{triggers}items:\n{items}"
    );
    fs::write(checklists.join(format!("{name}.yaml")), body).expect("write checklist");
}

/// Helper function to create a test orchestrator with a few known
/// definitions: `demo` (3 steps), `alpha` (2 steps), `beta` (2 steps), and
/// the `ship` checklist (2 items).
pub async fn create_test_orchestrator() -> (TempDir, Orchestrator) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let definitions = temp_dir.path().join("definitions");
    write_workflow(
        &definitions,
        "demo",
        &["demo"],
        &["First step", "Second step", "Third step"],
    );
    write_workflow(&definitions, "alpha", &["alpha"], &["Alpha one", "Alpha two"]);
    write_workflow(&definitions, "beta", &["beta"], &["Beta one", "Beta two"]);
    write_checklist(&definitions, "ship", &["ship"], &["Tests pass", "Docs updated"]);

    let orchestrator = OrchestratorBuilder::new()
        .with_data_dir(Some(temp_dir.path().join("sessions")))
        .with_definitions_dir(Some(definitions))
        .build()
        .await
        .expect("Failed to create orchestrator");
    (temp_dir, orchestrator)
}
