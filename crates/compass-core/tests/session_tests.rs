//! End-to-end session lifecycle tests against a real file store.

mod common;

use compass_core::{
    params::{CleanupSessions, PushWorkflow, StartSession},
    AdvanceOutcome, CompassError, Session,
};

use common::create_test_orchestrator;

fn start_params(prompt: &str, workflows: &[&str]) -> StartSession {
    StartSession {
        prompt: prompt.to_string(),
        workflows: workflows.iter().map(|w| (*w).to_string()).collect(),
    }
}

#[tokio::test]
async fn start_returns_first_step_of_named_workflow() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;

    let started = orchestrator
        .start(&start_params("try the demo", &["demo"]))
        .await
        .expect("start");

    assert_eq!(started.workflows, vec!["demo".to_string()]);
    assert_eq!(started.step.workflow, "demo");
    assert_eq!(started.step.step_number, 1);
    assert_eq!(started.step.total_steps, 3);
    assert_eq!(started.step.depth, 1);
    assert_eq!(started.step.text, "First step");
}

#[tokio::test]
async fn start_matches_prompt_triggers_when_no_workflow_named() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;

    let started = orchestrator
        .start(&start_params("please DEMO the new feature", &[]))
        .await
        .expect("start");

    assert_eq!(started.workflows, vec!["demo".to_string()]);
}

#[tokio::test]
async fn start_with_unknown_workflow_fails() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;

    let err = orchestrator
        .start(&start_params("anything", &["does-not-exist"]))
        .await
        .expect_err("should fail");
    assert!(matches!(err, CompassError::DefinitionNotFound { .. }));
}

#[tokio::test]
async fn advancing_past_last_step_closes_the_session() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;
    let started = orchestrator
        .start(&start_params("demo", &["demo"]))
        .await
        .expect("start");

    for expected in [2, 3] {
        match orchestrator.advance(&started.id).await.expect("advance") {
            AdvanceOutcome::NextStep(step) => assert_eq!(step.step_number, expected),
            other => panic!("expected next step, got {other:?}"),
        }
    }

    match orchestrator.advance(&started.id).await.expect("advance") {
        AdvanceOutcome::SessionComplete { session_id } => assert_eq!(session_id, started.id),
        other => panic!("expected completion, got {other:?}"),
    }

    // Closed sessions are removed from the store
    let err = orchestrator.status(&started.id).await.expect_err("gone");
    assert!(matches!(err, CompassError::SessionNotFound { .. }));
}

#[tokio::test]
async fn breaking_the_top_workflow_resumes_the_one_below() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;
    let started = orchestrator
        .start(&start_params("layered", &["alpha", "beta"]))
        .await
        .expect("start");
    assert_eq!(started.step.workflow, "beta");

    match orchestrator
        .break_workflow(&started.id)
        .await
        .expect("break")
    {
        AdvanceOutcome::ReturnedToParent { closed, step } => {
            assert_eq!(closed, "beta");
            assert_eq!(step.workflow, "alpha");
            assert_eq!(step.step_number, 1);
        }
        other => panic!("expected return to parent, got {other:?}"),
    }
}

#[tokio::test]
async fn back_reverses_advance_and_stops_at_the_first_step() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;
    let started = orchestrator
        .start(&start_params("demo", &["demo"]))
        .await
        .expect("start");

    orchestrator.advance(&started.id).await.expect("advance");
    orchestrator.advance(&started.id).await.expect("advance");

    let step = orchestrator.back(&started.id).await.expect("back");
    assert_eq!(step.step_number, 2);
    let step = orchestrator.back(&started.id).await.expect("back");
    assert_eq!(step.step_number, 1);

    // Already at the first step: no-op, not an error
    let step = orchestrator.back(&started.id).await.expect("back");
    assert_eq!(step.step_number, 1);
}

#[tokio::test]
async fn restart_resets_only_the_active_workflow() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;
    let started = orchestrator
        .start(&start_params("nested work", &["alpha"]))
        .await
        .expect("start");

    // Move alpha to its second step, then nest beta on top
    orchestrator.advance(&started.id).await.expect("advance");
    let step = orchestrator
        .push(&PushWorkflow {
            id: started.id.clone(),
            workflow: "beta".to_string(),
        })
        .await
        .expect("push");
    assert_eq!(step.workflow, "beta");
    assert_eq!(step.depth, 2);

    orchestrator.advance(&started.id).await.expect("advance");
    let step = orchestrator.restart(&started.id).await.expect("restart");
    assert_eq!(step.workflow, "beta");
    assert_eq!(step.step_number, 1);

    // The suspended frame kept its position
    match orchestrator
        .break_workflow(&started.id)
        .await
        .expect("break")
    {
        AdvanceOutcome::ReturnedToParent { step, .. } => {
            assert_eq!(step.workflow, "alpha");
            assert_eq!(step.step_number, 2);
        }
        other => panic!("expected return to parent, got {other:?}"),
    }
}

#[tokio::test]
async fn checklists_run_as_sessions() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;

    let started = orchestrator
        .start(&start_params("ready to ship", &["ship"]))
        .await
        .expect("start");
    assert_eq!(started.step.total_steps, 2);
    assert_eq!(started.step.text, "Tests pass");
}

#[tokio::test]
async fn push_with_unknown_workflow_fails() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;
    let started = orchestrator
        .start(&start_params("demo", &["demo"]))
        .await
        .expect("start");

    let err = orchestrator
        .push(&PushWorkflow {
            id: started.id.clone(),
            workflow: "does-not-exist".to_string(),
        })
        .await
        .expect_err("should fail");
    assert!(matches!(err, CompassError::DefinitionNotFound { .. }));
}

#[tokio::test]
async fn list_reports_every_open_session() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;
    orchestrator
        .start(&start_params("first", &["demo"]))
        .await
        .expect("start");
    orchestrator
        .start(&start_params("second", &["alpha"]))
        .await
        .expect("start");

    let sessions = orchestrator.list().await.expect("list");
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn cleanup_removes_only_stale_sessions() {
    let (temp_dir, mut orchestrator) = create_test_orchestrator().await;
    let stale = orchestrator
        .start(&start_params("old work", &["demo"]))
        .await
        .expect("start");
    let fresh = orchestrator
        .start(&start_params("new work", &["alpha"]))
        .await
        .expect("start");

    // Backdate the first session's record past the default threshold
    let record = temp_dir
        .path()
        .join("sessions")
        .join(format!("{}.json", stale.id));
    let mut session: Session =
        serde_json::from_str(&std::fs::read_to_string(&record).expect("read record"))
            .expect("parse record");
    session.last_accessed_at =
        jiff::Timestamp::now() - jiff::SignedDuration::from_hours(8 * 24);
    std::fs::write(&record, serde_json::to_vec_pretty(&session).expect("serialize"))
        .expect("write record");

    let removed = orchestrator
        .cleanup(&CleanupSessions::default())
        .await
        .expect("cleanup");
    assert_eq!(removed, 1);

    let remaining = orchestrator.list().await.expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, fresh.id);
}

#[tokio::test]
async fn status_reports_stack_and_position() {
    let (_temp_dir, mut orchestrator) = create_test_orchestrator().await;
    let started = orchestrator
        .start(&start_params("demo it", &["demo"]))
        .await
        .expect("start");
    orchestrator
        .push(&PushWorkflow {
            id: started.id.clone(),
            workflow: "beta".to_string(),
        })
        .await
        .expect("push");

    let status = orchestrator.status(&started.id).await.expect("status");
    assert_eq!(status.workflow, "beta");
    assert_eq!(status.stack, vec!["demo".to_string(), "beta".to_string()]);
    assert_eq!(status.step_number, 1);
    assert!(!status.complete);
}
