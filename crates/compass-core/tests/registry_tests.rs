//! Definition registry tests: loading, validation, caching, matching.

mod common;

use std::fs;

use compass_core::{DefinitionKind, Registry};
use tempfile::TempDir;

use common::{write_checklist, write_workflow};

fn registry() -> (TempDir, Registry) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = Registry::new(temp_dir.path().join("definitions"));
    (temp_dir, registry)
}

#[test]
fn invalid_files_are_skipped_but_valid_ones_load() {
    let (temp_dir, mut registry) = registry();
    let dir = temp_dir.path().join("definitions");
    write_workflow(&dir, "good", &["good"], &["One step"]);
    fs::write(dir.join("broken.yaml"), "name: [unclosed").expect("write broken");
    // Parses but fails validation: no steps
    fs::write(
        dir.join("stepless.yaml"),
        "name: stepless\ndescription: No steps here\n",
    )
    .expect("write stepless");

    let workflows = registry.workflows();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0].name, "good");
    assert!(registry.get_workflow("stepless").is_none());
}

#[test]
fn builtin_defaults_serve_an_empty_directory() {
    let (_temp_dir, mut registry) = registry();

    let workflows = registry.workflows();
    assert!(!workflows.is_empty());
    assert!(registry.get_workflow("analysis").is_some());
    assert!(!registry.checklists().is_empty());
}

#[test]
fn a_single_valid_definition_disables_the_builtins() {
    let (temp_dir, mut registry) = registry();
    write_workflow(
        &temp_dir.path().join("definitions"),
        "mine",
        &["mine"],
        &["Only step"],
    );

    let workflows = registry.workflows();
    assert_eq!(workflows.len(), 1);
    assert!(registry.get_workflow("analysis").is_none());
}

#[test]
fn new_files_are_picked_up_on_the_next_access() {
    let (temp_dir, mut registry) = registry();
    let dir = temp_dir.path().join("definitions");
    write_workflow(&dir, "first", &["first"], &["One step"]);
    assert_eq!(registry.workflows().len(), 1);

    write_workflow(&dir, "second", &["second"], &["Another step"]);
    let names: Vec<String> = registry.workflows().into_iter().map(|w| w.name).collect();
    assert_eq!(names, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn checklists_load_from_their_subdirectory() {
    let (temp_dir, mut registry) = registry();
    let dir = temp_dir.path().join("definitions");
    write_workflow(&dir, "flow", &["flow"], &["One step"]);
    write_checklist(&dir, "ship", &["ship"], &["Tests pass", "Docs updated"]);

    let checklist = registry.get_checklist("ship").expect("checklist");
    assert_eq!(checklist.items.len(), 2);

    let (name, steps) = registry.resolve_steps("ship").expect("resolve");
    assert_eq!(name, "ship");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].text, "Tests pass");
    assert!(steps[0].command.is_none());
}

#[test]
fn matching_is_case_insensitive_and_sorted_by_name() {
    let (temp_dir, mut registry) = registry();
    let dir = temp_dir.path().join("definitions");
    write_workflow(&dir, "zeta", &["deploy"], &["One step"]);
    write_workflow(&dir, "acme", &["deploy", "release"], &["One step"]);
    write_checklist(&dir, "ship", &["DEPLOY"], &["Check it"]);

    let matches = registry.match_prompt("time to DePloY the service");
    let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["acme", "ship", "zeta"]);
    assert_eq!(matches[1].kind, DefinitionKind::Checklist);

    assert!(registry.match_prompt("nothing relevant here").is_empty());
}

#[test]
fn detailed_steps_carry_command_metadata() {
    let (temp_dir, mut registry) = registry();
    let dir = temp_dir.path().join("definitions");
    fs::create_dir_all(&dir).expect("create dir");
    let body = concat!(
        "name: build\n",
        "description: Build workflow\n",
        "triggers:\n",
        "  - build\n",
        "steps:\n",
        "  - Plan the change\n",
        "  - text: Run the suite\n",
        "    command: cargo test\n",
        "    working_dir: crates/core\n",
    );
    fs::write(dir.join("build.yaml"), body).expect("write workflow");

    let workflow = registry.get_workflow("build").expect("workflow");
    assert_eq!(workflow.steps.len(), 2);
    assert!(workflow.steps[0].command.is_none());
    assert_eq!(workflow.steps[1].command.as_deref(), Some("cargo test"));
    assert_eq!(
        workflow.steps[1].working_dir.as_deref(),
        Some("crates/core")
    );
}
