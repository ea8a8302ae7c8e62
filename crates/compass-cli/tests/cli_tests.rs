use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    write_demo_definitions(&temp_dir.path().join("definitions"));
    temp_dir
}

/// Writes a `demo` workflow (3 steps) and a `ship` checklist.
fn write_demo_definitions(dir: &Path) {
    fs::create_dir_all(dir.join("checklists")).expect("Failed to create definitions dir");
    fs::write(
        dir.join("demo.yaml"),
        concat!(
            "name: demo\n",
            "description: Demo workflow\n",
            "triggers:\n  - demo\n",
            "steps:\n  - First step\n  - Second step\n  - Third step\n",
        ),
    )
    .expect("Failed to write workflow");
    fs::write(
        dir.join("checklists").join("ship.yaml"),
        concat!(
            "name: ship\n",
            "description: Shipping checklist\n",
            "triggers:\n  - ship\n",
            "items:\n  - Tests pass\n  - Docs updated\n",
        ),
    )
    .expect("Failed to write checklist");
}

/// Helper function to create a Command pointed at a test environment
fn compass_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("compass").expect("Failed to find compass binary");
    cmd.arg("--no-color")
        .arg("--data-dir")
        .arg(temp_dir.path().join("sessions"))
        .arg("--definitions-dir")
        .arg(temp_dir.path().join("definitions"))
        .arg("--plan-file")
        .arg(temp_dir.path().join("plan.json"));
    cmd
}

/// Extracts the session ID from `# Session <id>` output
fn extract_session_id(output: &str) -> String {
    for line in output.lines() {
        if let Some(id) = line.strip_prefix("# Session ") {
            return id.trim().to_string();
        }
    }
    panic!("Could not extract session ID from output: {output}");
}

/// Extracts the item ID from `Added plan item <id>: <text>` output
fn extract_plan_item_id(output: &str) -> String {
    let start = output
        .find("Added plan item ")
        .expect("no plan item in output")
        + "Added plan item ".len();
    let rest = &output[start..];
    let end = rest.find(':').expect("malformed plan item line");
    rest[..end].to_string()
}

#[test]
fn session_list_is_empty_initially() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open sessions."));
}

#[test]
fn start_session_with_named_workflow() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["session", "start", "walk me through it", "-w", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Session "))
        .stdout(predicate::str::contains("demo (step 1/3)"))
        .stdout(predicate::str::contains("First step"));
}

#[test]
fn start_session_matches_prompt_triggers() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["session", "start", "please demo the feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflows: demo"));
}

#[test]
fn advancing_through_a_session_closes_it() {
    let temp_dir = create_cli_test_environment();

    let output = compass_cmd(&temp_dir)
        .args(["session", "start", "demo run", "-w", "demo"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let session_id = extract_session_id(&String::from_utf8(output).expect("Invalid UTF-8"));

    compass_cmd(&temp_dir)
        .args(["session", "advance", &session_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("step 2/3"));
    compass_cmd(&temp_dir)
        .args(["session", "advance", &session_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("step 3/3"));
    compass_cmd(&temp_dir)
        .args(["session", "advance", &session_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));

    compass_cmd(&temp_dir)
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open sessions."));
}

#[test]
fn push_and_break_nest_workflows() {
    let temp_dir = create_cli_test_environment();

    let output = compass_cmd(&temp_dir)
        .args(["session", "start", "demo run", "-w", "demo"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let session_id = extract_session_id(&String::from_utf8(output).expect("Invalid UTF-8"));

    compass_cmd(&temp_dir)
        .args(["session", "push", &session_id, "ship"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ship (step 1/2)"));

    compass_cmd(&temp_dir)
        .args(["session", "break", &session_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("'ship' closed"))
        .stdout(predicate::str::contains("demo (step 1/3)"));
}

#[test]
fn status_of_unknown_session_fails() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["session", "status", "nope1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn workflow_list_shows_definitions() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["workflow", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Workflows"))
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("# Checklists"))
        .stdout(predicate::str::contains("ship"));
}

#[test]
fn workflow_show_renders_steps() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["workflow", "show", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo workflow"))
        .stdout(predicate::str::contains("1. First step"));

    compass_cmd(&temp_dir)
        .args(["workflow", "show", "missing"])
        .assert()
        .failure();
}

#[test]
fn workflow_match_reports_triggered_definitions() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["workflow", "match", "time to SHIP this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ship"));

    compass_cmd(&temp_dir)
        .args(["workflow", "match", "nothing relevant"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No definitions matched."));
}

#[test]
fn plan_add_complete_and_show() {
    let temp_dir = create_cli_test_environment();

    let output = compass_cmd(&temp_dir)
        .args(["plan", "add", "Write the parser"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added plan item"))
        .get_output()
        .stdout
        .clone();
    let item_id = extract_plan_item_id(&String::from_utf8(output).expect("Invalid UTF-8"));

    compass_cmd(&temp_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- [ ] Write the parser"));

    compass_cmd(&temp_dir)
        .args(["plan", "complete", &item_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed plan item"));

    compass_cmd(&temp_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- [x] Write the parser"));
}

#[test]
fn plan_expand_nests_children() {
    let temp_dir = create_cli_test_environment();

    let output = compass_cmd(&temp_dir)
        .args(["plan", "add", "Parent task"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let item_id = extract_plan_item_id(&String::from_utf8(output).expect("Invalid UTF-8"));

    compass_cmd(&temp_dir)
        .args(["plan", "expand", &item_id, "Child one", "Child two"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 child items"));

    compass_cmd(&temp_dir)
        .args(["plan", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total items: 3"))
        .stdout(predicate::str::contains("Max depth: 2"));
}

#[test]
fn plan_clear_requires_confirmation() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["plan", "add", "Keep me"])
        .assert()
        .success();

    compass_cmd(&temp_dir)
        .args(["plan", "clear"])
        .assert()
        .failure();

    compass_cmd(&temp_dir)
        .args(["plan", "clear", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared the plan"));

    compass_cmd(&temp_dir)
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The plan is empty."));
}

#[test]
fn help_lists_command_categories() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("workflow"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn version_output() {
    let temp_dir = create_cli_test_environment();

    compass_cmd(&temp_dir)
        .args(["--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compass"));
}
